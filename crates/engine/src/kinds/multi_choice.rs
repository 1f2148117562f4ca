//! Multi-selection list editor.

use std::collections::HashSet;

use dynform_types::{Choice, FieldDescriptor, FieldKind, FieldPayload, FormSettings, Size};

use crate::{
    editor::EditorState,
    error::{FormError, ValidationReason},
    kinds::{choice::choice_content_width, mismatch, required_failure},
    registry::FieldBehavior,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultiChoiceEditor {
    choices: Vec<Choice>,
    /// Parallel to `choices`.
    selected: Vec<bool>,
    cursor: usize,
}

impl MultiChoiceEditor {
    pub fn new(choices: Vec<Choice>) -> Self {
        let selected = vec![false; choices.len()];
        Self {
            choices,
            selected,
            cursor: 0,
        }
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    /// Selected choices in option order.
    pub fn selected(&self) -> Vec<Choice> {
        self.choices
            .iter()
            .zip(&self.selected)
            .filter(|(_, selected)| **selected)
            .map(|(choice, _)| choice.clone())
            .collect()
    }

    /// Marks exactly the choices whose id is in `ids`.
    pub fn select_ids<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let wanted: HashSet<&str> = ids.into_iter().collect();
        for (choice, selected) in self.choices.iter().zip(self.selected.iter_mut()) {
            *selected = wanted.contains(choice.id.as_str());
        }
    }

    /// Replaces the options and clears the selection.
    pub fn replace_choices(&mut self, choices: Vec<Choice>) {
        self.selected = vec![false; choices.len()];
        self.choices = choices;
        self.cursor = 0;
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.choices.is_empty() {
            return;
        }
        let len = self.choices.len() as isize;
        self.cursor = (self.cursor as isize + delta).rem_euclid(len) as usize;
    }

    pub fn toggle_at_cursor(&mut self) -> bool {
        match self.selected.get_mut(self.cursor) {
            Some(selected) => {
                *selected = !*selected;
                true
            }
            None => false,
        }
    }
}

fn visible_rows(descriptor: &FieldDescriptor, settings: &FormSettings) -> u16 {
    descriptor.gui.rows.filter(|rows| *rows > 0).unwrap_or(settings.multi_choice_rows).max(1)
}

pub struct MultiChoiceBehavior;

impl FieldBehavior for MultiChoiceBehavior {
    fn kind(&self) -> FieldKind {
        FieldKind::MultiChoice
    }

    fn construct(&self, descriptor: &FieldDescriptor, _settings: &FormSettings) -> EditorState {
        let mut editor = MultiChoiceEditor::new(descriptor.gui.choices.clone());
        let initial = descriptor.initial_value().to_choices();
        editor.select_ids(initial.iter().map(|choice| choice.id.as_str()));
        EditorState::MultiChoice(editor)
    }

    fn extract(&self, editor: &EditorState, descriptor: &FieldDescriptor, validate: bool) -> Result<FieldPayload, FormError> {
        let EditorState::MultiChoice(multi) = editor else {
            return Err(mismatch(descriptor, editor));
        };
        let selected = multi.selected();
        if validate && descriptor.gui.required && selected.is_empty() {
            return Err(required_failure(descriptor, ValidationReason::Unselected));
        }
        Ok(FieldPayload::Choices(selected))
    }

    fn write(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError> {
        let EditorState::MultiChoice(multi) = editor else {
            return Err(mismatch(descriptor, editor));
        };
        multi.replace_choices(payload.to_choices());
        Ok(())
    }

    fn select(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError> {
        let EditorState::MultiChoice(multi) = editor else {
            return Err(mismatch(descriptor, editor));
        };
        let wanted = payload.to_choices();
        multi.select_ids(wanted.iter().map(|choice| choice.id.as_str()));
        Ok(())
    }

    fn measure(&self, descriptor: &FieldDescriptor, settings: &FormSettings) -> Size {
        // Room for the "[x] " marker in front of each entry.
        let width = choice_content_width(descriptor, settings).saturating_add(4);
        let height = settings.line_height.max(1).saturating_mul(visible_rows(descriptor, settings));
        Size::new(width, height).clamp_width(settings.max_width)
    }
}
