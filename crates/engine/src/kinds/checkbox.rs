use dynform_types::{FieldDescriptor, FieldKind, FieldPayload, FormSettings, Size, bool_to_str, str_to_bool};

use crate::{editor::EditorState, error::FormError, kinds::mismatch, registry::FieldBehavior};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckboxEditor {
    checked: bool,
}

impl CheckboxEditor {
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn toggle(&mut self) {
        self.checked = !self.checked;
    }
}

pub struct CheckboxBehavior;

impl FieldBehavior for CheckboxBehavior {
    fn kind(&self) -> FieldKind {
        FieldKind::Checkbox
    }

    fn construct(&self, descriptor: &FieldDescriptor, _settings: &FormSettings) -> EditorState {
        EditorState::Checkbox(CheckboxEditor {
            checked: str_to_bool(descriptor.initial_value().as_text()),
        })
    }

    // A checkbox always holds a value, so `required` never fails.
    fn extract(&self, editor: &EditorState, descriptor: &FieldDescriptor, _validate: bool) -> Result<FieldPayload, FormError> {
        let EditorState::Checkbox(checkbox) = editor else {
            return Err(mismatch(descriptor, editor));
        };
        Ok(FieldPayload::Text(bool_to_str(checkbox.checked).to_string()))
    }

    fn write(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError> {
        self.select(editor, descriptor, payload)
    }

    fn select(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError> {
        let EditorState::Checkbox(checkbox) = editor else {
            return Err(mismatch(descriptor, editor));
        };
        checkbox.checked = str_to_bool(payload.as_text());
        Ok(())
    }

    fn measure(&self, _descriptor: &FieldDescriptor, settings: &FormSettings) -> Size {
        Size::new(settings.checkbox_width, settings.line_height.max(1)).clamp_width(settings.max_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_strings_map_to_state() {
        let mut descriptor = FieldDescriptor::new("ssl", "checkbox");
        descriptor.gui.default_value = "True".into();
        descriptor.gui.required = true;
        let mut editor = CheckboxBehavior.construct(&descriptor, &FormSettings::default());
        assert_eq!(CheckboxBehavior.extract(&editor, &descriptor, true).expect("value"), FieldPayload::Text("true".into()));

        CheckboxBehavior.select(&mut editor, &descriptor, &FieldPayload::Text("no".into())).expect("select");
        assert_eq!(CheckboxBehavior.extract(&editor, &descriptor, true).expect("value"), FieldPayload::Text("false".into()));
    }
}
