//! # Dynform TUI
//!
//! Interactive terminal host for a rendered form: draws the rows with
//! ratatui, routes keys to the focused editor, resolves dependency fills in
//! the background, and returns the submitted values.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use dynform_engine::{FormContainer, FormSettings, NullSchemaProvider, render};
//! use dynform_tui::{FormApp, run_form};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let descriptors = Vec::new();
//!     let mut container = FormContainer::new(FormSettings::default());
//!     render(&mut container, &descriptors, &[])?;
//!     let exit = run_form(FormApp::new("Empty", descriptors, container), Arc::new(NullSchemaProvider)).await?;
//!     println!("{exit:?}");
//!     Ok(())
//! }
//! ```

mod app;
mod runtime;
mod theme;
mod view;

pub use app::{Effect, FormApp, FormExit, StatusLine};
pub use runtime::run_form;
pub use view::draw;
