//! Editable list of free-form strings (IPs, MACs, names...).
//!
//! Items have no separate display text: the payload carries each item as a
//! choice whose id is the item and whose text is blank.

use dynform_types::{Choice, DescriptorValue, FieldDescriptor, FieldKind, FieldPayload, FormSettings, Size};

use crate::{
    editor::EditorState,
    error::{FormError, ValidationReason},
    kinds::{declared_length, mismatch, required_failure, scaled},
    registry::FieldBehavior,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditableListEditor {
    items: Vec<String>,
    cursor: usize,
}

impl EditableListEditor {
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_items(&mut self, items: Vec<String>) {
        self.items = items;
        self.cursor = self.cursor.min(self.items.len().saturating_sub(1));
    }

    /// Appends a trimmed, non-empty item.
    pub fn push_item(&mut self, item: &str) -> bool {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.items.push(trimmed.to_string());
        self.cursor = self.items.len() - 1;
        true
    }

    pub fn remove_at_cursor(&mut self) -> Option<String> {
        if self.cursor >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(self.cursor);
        self.cursor = self.cursor.min(self.items.len().saturating_sub(1));
        Some(removed)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        let last = self.items.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }
}

fn payload_items(payload: &FieldPayload) -> Vec<String> {
    payload.to_choices().into_iter().map(|choice| choice.id).collect()
}

pub struct EditableListBehavior;

impl FieldBehavior for EditableListBehavior {
    fn kind(&self) -> FieldKind {
        FieldKind::EditableList
    }

    fn construct(&self, descriptor: &FieldDescriptor, _settings: &FormSettings) -> EditorState {
        // Lists are usually shipped in `values`; the raw value wins when present.
        let source: Vec<Choice> = match descriptor.initial_value() {
            DescriptorValue::List(items) if !items.is_empty() => items.clone(),
            DescriptorValue::Text(text) if !text.is_empty() => vec![Choice::bare(text.clone())],
            _ => descriptor.gui.choices.clone(),
        };
        let mut editor = EditableListEditor::default();
        editor.set_items(source.into_iter().map(|choice| choice.id).collect());
        EditorState::EditableList(editor)
    }

    fn extract(&self, editor: &EditorState, descriptor: &FieldDescriptor, validate: bool) -> Result<FieldPayload, FormError> {
        let EditorState::EditableList(list) = editor else {
            return Err(mismatch(descriptor, editor));
        };
        if validate && descriptor.gui.required && list.items().is_empty() {
            return Err(required_failure(descriptor, ValidationReason::Empty));
        }
        Ok(FieldPayload::Choices(list.items().iter().map(Choice::bare).collect()))
    }

    fn write(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError> {
        self.select(editor, descriptor, payload)
    }

    fn select(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError> {
        let EditorState::EditableList(list) = editor else {
            return Err(mismatch(descriptor, editor));
        };
        list.set_items(payload_items(payload));
        Ok(())
    }

    fn measure(&self, descriptor: &FieldDescriptor, settings: &FormSettings) -> Size {
        let width = scaled(declared_length(descriptor, settings), settings.char_width);
        let height = settings.line_height.max(1).saturating_mul(settings.editable_list_rows.max(1));
        Size::new(width, height).clamp_width(settings.max_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_round_trip_with_blank_display_text() {
        let descriptor = FieldDescriptor::new("ips", "editlist");
        let mut editor = EditableListBehavior.construct(&descriptor, &FormSettings::default());
        let payload = FieldPayload::Choices(vec![Choice::bare("10.0.0.1"), Choice::bare("10.0.0.2")]);
        EditableListBehavior.select(&mut editor, &descriptor, &payload).expect("select");
        let extracted = EditableListBehavior.extract(&editor, &descriptor, false).expect("value");
        assert_eq!(extracted, payload);
        let FieldPayload::Choices(items) = extracted else { panic!("choices") };
        assert!(items.iter().all(|item| item.text.is_empty()));
    }

    #[test]
    fn seeded_from_values_when_no_raw_value() {
        let mut descriptor = FieldDescriptor::new("macs", "editlist");
        descriptor.gui.choices = vec![Choice::bare("aa:bb"), Choice::bare("cc:dd")];
        let editor = EditableListBehavior.construct(&descriptor, &FormSettings::default());
        let EditorState::EditableList(list) = &editor else { panic!("list editor") };
        assert_eq!(list.items(), ["aa:bb", "cc:dd"]);
    }

    #[test]
    fn push_and_remove_items() {
        let mut editor = EditableListEditor::default();
        assert!(!editor.push_item("   "));
        assert!(editor.push_item(" a "));
        assert!(editor.push_item("b"));
        editor.move_cursor(-5);
        assert_eq!(editor.remove_at_cursor().as_deref(), Some("a"));
        assert_eq!(editor.items(), ["b"]);
    }

    #[test]
    fn required_empty_list_fails() {
        let mut descriptor = FieldDescriptor::new("ips", "editlist");
        descriptor.gui.required = true;
        let editor = EditableListBehavior.construct(&descriptor, &FormSettings::default());
        assert!(matches!(EditableListBehavior.extract(&editor, &descriptor, true), Err(FormError::Validation(_))));
    }
}
