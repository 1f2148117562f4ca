//! Non-visual value holder for hidden fields.
//!
//! Hidden fields never occupy a row and are never validated, since the user
//! has no way to correct them, but they always take part in extraction.

use dynform_types::{DescriptorValue, FieldDescriptor, FieldKind, FieldPayload, FormSettings, Size};

use crate::{editor::EditorState, error::FormError, kinds::mismatch, registry::FieldBehavior};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HiddenValue {
    payload: FieldPayload,
}

impl HiddenValue {
    pub fn payload(&self) -> &FieldPayload {
        &self.payload
    }
}

pub struct HiddenBehavior;

impl FieldBehavior for HiddenBehavior {
    fn kind(&self) -> FieldKind {
        FieldKind::Hidden
    }

    fn construct(&self, descriptor: &FieldDescriptor, _settings: &FormSettings) -> EditorState {
        let payload = match descriptor.initial_value() {
            DescriptorValue::Text(text) => FieldPayload::Text(text.clone()),
            DescriptorValue::List(items) => FieldPayload::Choices(items.clone()),
        };
        EditorState::Hidden(HiddenValue { payload })
    }

    fn extract(&self, editor: &EditorState, descriptor: &FieldDescriptor, _validate: bool) -> Result<FieldPayload, FormError> {
        let EditorState::Hidden(hidden) = editor else {
            return Err(mismatch(descriptor, editor));
        };
        Ok(hidden.payload.clone())
    }

    fn write(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError> {
        self.select(editor, descriptor, payload)
    }

    fn select(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError> {
        let EditorState::Hidden(hidden) = editor else {
            return Err(mismatch(descriptor, editor));
        };
        hidden.payload = payload.clone();
        Ok(())
    }

    fn measure(&self, _descriptor: &FieldDescriptor, _settings: &FormSettings) -> Size {
        Size::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_hidden_fields_are_not_validated() {
        let mut descriptor = FieldDescriptor::new("vc", "hidden");
        descriptor.gui.required = true;
        let editor = HiddenBehavior.construct(&descriptor, &FormSettings::default());
        assert_eq!(HiddenBehavior.extract(&editor, &descriptor, true).expect("value"), FieldPayload::Text(String::new()));
    }

    #[test]
    fn seeded_from_default_when_raw_value_is_empty() {
        let mut descriptor = FieldDescriptor::new("ev", "hidden");
        descriptor.gui.default_value = "env-1".into();
        let editor = HiddenBehavior.construct(&descriptor, &FormSettings::default());
        assert_eq!(HiddenBehavior.extract(&editor, &descriptor, false).expect("value"), FieldPayload::Text("env-1".into()));
    }
}
