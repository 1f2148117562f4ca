//! Single-choice drop-down editor.

use dynform_types::{Choice, FieldDescriptor, FieldKind, FieldPayload, FormSettings, Size};
use dynform_util::display_width;
use tracing::debug;

use crate::{
    editor::EditorState,
    error::{FormError, ValidationReason},
    kinds::{declared_length, mismatch, required_failure, scaled},
    registry::FieldBehavior,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChoiceEditor {
    choices: Vec<Choice>,
    selected: Option<usize>,
}

impl ChoiceEditor {
    pub fn new(choices: Vec<Choice>) -> Self {
        Self { choices, selected: None }
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Choice> {
        self.selected.and_then(|index| self.choices.get(index))
    }

    /// Selects the choice with `id`; an unknown id clears the selection.
    pub fn select_id(&mut self, id: &str) -> bool {
        self.selected = self.choices.iter().position(|choice| choice.id == id);
        self.selected.is_some()
    }

    /// Replaces the available choices and resets the selection to the first entry.
    pub fn replace_choices(&mut self, choices: Vec<Choice>) {
        self.selected = if choices.is_empty() { None } else { Some(0) };
        self.choices = choices;
    }

    pub fn select_next(&mut self) {
        if self.choices.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(index) => (index + 1) % self.choices.len(),
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        if self.choices.is_empty() {
            return;
        }
        let last = self.choices.len() - 1;
        self.selected = Some(match self.selected {
            Some(0) | None => last,
            Some(index) => index - 1,
        });
    }
}

/// Width of the widest choice label, or the declared length when there are no choices.
pub(crate) fn choice_content_width(descriptor: &FieldDescriptor, settings: &FormSettings) -> u16 {
    let widest = descriptor.gui.choices.iter().map(|choice| display_width(choice.label())).max();
    match widest {
        Some(width) => width.saturating_mul(settings.char_width.max(1)),
        None => scaled(declared_length(descriptor, settings), settings.char_width),
    }
}

pub struct ChoiceBehavior;

impl FieldBehavior for ChoiceBehavior {
    fn kind(&self) -> FieldKind {
        FieldKind::Choice
    }

    fn construct(&self, descriptor: &FieldDescriptor, _settings: &FormSettings) -> EditorState {
        let mut editor = ChoiceEditor::new(descriptor.gui.choices.clone());
        let initial = descriptor.initial_value().as_text();
        if !initial.is_empty() && !editor.select_id(initial) {
            debug!(field = %descriptor.name, value = %initial, "initial choice is not among the available options");
        }
        EditorState::Choice(editor)
    }

    fn extract(&self, editor: &EditorState, descriptor: &FieldDescriptor, validate: bool) -> Result<FieldPayload, FormError> {
        let EditorState::Choice(choice) = editor else {
            return Err(mismatch(descriptor, editor));
        };
        match choice.selected() {
            Some(selected) => Ok(FieldPayload::Text(selected.id.clone())),
            None if validate && descriptor.gui.required => Err(required_failure(descriptor, ValidationReason::Unselected)),
            None => Ok(FieldPayload::Text(String::new())),
        }
    }

    /// A choice list replaces the options; a bare id only moves the selection.
    fn write(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError> {
        match payload {
            FieldPayload::Choices(items) => {
                let EditorState::Choice(choice) = editor else {
                    return Err(mismatch(descriptor, editor));
                };
                choice.replace_choices(items.clone());
                Ok(())
            }
            FieldPayload::Text(_) => self.select(editor, descriptor, payload),
        }
    }

    fn select(&self, editor: &mut EditorState, descriptor: &FieldDescriptor, payload: &FieldPayload) -> Result<(), FormError> {
        let EditorState::Choice(choice) = editor else {
            return Err(mismatch(descriptor, editor));
        };
        let id = payload.as_text();
        if !choice.select_id(id) && !id.is_empty() {
            debug!(field = %descriptor.name, value = %id, "selected id is not among the available options");
        }
        Ok(())
    }

    fn measure(&self, descriptor: &FieldDescriptor, settings: &FormSettings) -> Size {
        let width = choice_content_width(descriptor, settings).saturating_add(settings.spinner_width);
        Size::new(width, settings.line_height.max(1)).clamp_width(settings.max_width)
    }
}
