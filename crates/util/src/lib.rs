//! Shared helpers for the dynform crates: configuration loading, tracing
//! setup, path expansion, and display-width text utilities.

pub mod config;
pub mod logging;
mod path_processing;
pub mod text_width;

pub use config::{CONFIG_PATH_ENV, ConfigError, default_config_path, default_log_path, load_form_settings, load_form_settings_from};
pub use logging::{init_file_tracing, init_tracing};
pub use path_processing::expand_tilde;
pub use text_width::{display_width, truncate_to_width};
