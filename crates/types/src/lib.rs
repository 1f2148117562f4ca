//! Shared models for server-described forms.
//!
//! A schema provider describes a form as an ordered list of
//! [`FieldDescriptor`]s. The engine turns those into editors, and eventually
//! hands a list of [`FieldValue`]s back to a value sink. Both shapes mirror
//! the broker's wire format so they can be deserialized straight from the
//! JSON or YAML the provider emits.

pub mod descriptor;
pub mod settings;
pub mod value;

pub use descriptor::{DescriptorValue, FieldDependency, FieldDescriptor, FieldKind, GuiMeta, UnknownFieldKind};
pub use settings::FormSettings;
pub use value::{Choice, FieldPayload, FieldValue, bool_to_str, str_to_bool};

use serde::{Deserialize, Serialize};

/// Preferred size of an editor or a whole form, in layout units
/// (terminal cells for the bundled host).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Returns a copy whose width does not exceed `max_width`.
    pub fn clamp_width(self, max_width: u16) -> Self {
        Self {
            width: self.width.min(max_width),
            height: self.height,
        }
    }
}
