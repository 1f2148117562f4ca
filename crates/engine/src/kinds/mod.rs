//! Per-kind editor state and behavior.
//!
//! Each module pairs the editable state of one [`FieldKind`](dynform_types::FieldKind)
//! with the [`FieldBehavior`](crate::registry::FieldBehavior) implementation
//! the registry dispatches to.

pub mod checkbox;
pub mod choice;
pub mod editable_list;
pub mod hidden;
pub mod multi_choice;
pub mod numeric;
pub mod text;

use dynform_types::{FieldDescriptor, FormSettings};

use crate::{
    editor::EditorState,
    error::{FormError, ValidationError, ValidationReason},
};

/// Declared length in characters, or the configured default.
pub(crate) fn declared_length(descriptor: &FieldDescriptor, settings: &FormSettings) -> usize {
    descriptor
        .gui
        .max_length
        .filter(|length| *length > 0)
        .unwrap_or(settings.default_length)
}

/// `count * unit`, saturating into layout cells.
pub(crate) fn scaled(count: usize, unit: u16) -> u16 {
    (count.min(u16::MAX as usize) as u16).saturating_mul(unit.max(1))
}

pub(crate) fn required_failure(descriptor: &FieldDescriptor, reason: ValidationReason) -> FormError {
    FormError::Validation(ValidationError {
        field: descriptor.name.clone(),
        label: descriptor.display_label().to_string(),
        reason,
    })
}

pub(crate) fn mismatch(descriptor: &FieldDescriptor, editor: &EditorState) -> FormError {
    FormError::configuration(
        &descriptor.name,
        format!("editor holds {} state but the field is declared as '{}'", editor.kind_name(), descriptor.gui.field_type),
    )
}
