//! Type behavior registry.
//!
//! The set of field kinds is closed, so the registry is a static table: one
//! immutable behavior object per [`FieldKind`], reachable through
//! [`behavior_for`]. Nothing is registered at runtime.

use dynform_types::{FieldDescriptor, FieldKind, FieldPayload, FormSettings, Size};

use crate::{
    editor::EditorState,
    error::FormError,
    kinds::{
        checkbox::CheckboxBehavior, choice::ChoiceBehavior, editable_list::EditableListBehavior, hidden::HiddenBehavior,
        multi_choice::MultiChoiceBehavior, numeric::NumericBehavior, text::TextBehavior,
    },
};

/// The five operations every field kind provides.
pub trait FieldBehavior: Sync {
    fn kind(&self) -> FieldKind;

    /// Builds editor state seeded from the raw value, else the default value,
    /// with the kind's constraints applied.
    fn construct(&self, descriptor: &FieldDescriptor, settings: &FormSettings) -> EditorState;

    /// Reads the editor. With `validate`, a required field that is empty
    /// (unselected, or zero for numbers) yields a validation error.
    fn extract(&self, editor: &EditorState, descriptor: &FieldDescriptor, validate: bool) -> Result<FieldPayload, FormError>;

    /// Overwrites the available options and value; used by dependency refills.
    fn write(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError>;

    /// Sets the current value without touching the available options; used
    /// when populating a form from stored values.
    fn select(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError>;

    /// Preferred editor size, clamped to the configured maximum width.
    fn measure(&self, descriptor: &FieldDescriptor, settings: &FormSettings) -> Size;
}

static TEXT: TextBehavior = TextBehavior { masked: false };
static PASSWORD: TextBehavior = TextBehavior { masked: true };
static NUMERIC: NumericBehavior = NumericBehavior;
static HIDDEN: HiddenBehavior = HiddenBehavior;
static CHOICE: ChoiceBehavior = ChoiceBehavior;
static MULTI_CHOICE: MultiChoiceBehavior = MultiChoiceBehavior;
static EDITABLE_LIST: EditableListBehavior = EditableListBehavior;
static CHECKBOX: CheckboxBehavior = CheckboxBehavior;

/// Returns the behavior entry for `kind`.
pub fn behavior_for(kind: FieldKind) -> &'static dyn FieldBehavior {
    match kind {
        FieldKind::Text => &TEXT,
        FieldKind::Password => &PASSWORD,
        FieldKind::Numeric => &NUMERIC,
        FieldKind::Hidden => &HIDDEN,
        FieldKind::Choice => &CHOICE,
        FieldKind::MultiChoice => &MULTI_CHOICE,
        FieldKind::EditableList => &EDITABLE_LIST,
        FieldKind::Checkbox => &CHECKBOX,
    }
}
