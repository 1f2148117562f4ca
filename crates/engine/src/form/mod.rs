//! The rendered form: rows for visible fields plus every live editor, keyed
//! by field name.

mod extract;
mod measure;
mod render;

use dynform_types::{FormSettings, Size};
use indexmap::IndexMap;
use tracing::debug;

pub use extract::{SubmitOutcome, extract_all, submit};
pub use measure::SizeAccumulator;
pub use render::render;

use crate::{
    dependency::{DependencyBroker, FillRequest},
    editor::{EditorInstance, EditorState},
    error::FormError,
};

/// Label shown next to an editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLabel {
    pub text: String,
    pub tooltip: String,
    pub enabled: bool,
}

/// One visual row. Hidden fields never get one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRow {
    pub field: String,
    pub label: FieldLabel,
    /// Measured editor size.
    pub size: Size,
    pub tab: Option<String>,
}

/// Owns everything one rendered form instance needs. Nothing in here is
/// shared with other forms.
#[derive(Debug, Default)]
pub struct FormContainer {
    pub(crate) settings: FormSettings,
    pub(crate) rows: Vec<FormRow>,
    pub(crate) editors: IndexMap<String, EditorInstance>,
    pub(crate) row_count: usize,
    pub(crate) preferred_size: Size,
    pub(crate) modify_flow: bool,
    pub(crate) broker: DependencyBroker,
}

impl FormContainer {
    pub fn new(settings: FormSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    /// Rows in ascending `order`.
    pub fn rows(&self) -> &[FormRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn preferred_size(&self) -> Size {
        self.preferred_size
    }

    /// True when the form was rendered with prior values.
    pub fn is_modify_flow(&self) -> bool {
        self.modify_flow
    }

    pub fn editor(&self, name: &str) -> Option<&EditorInstance> {
        self.editors.get(name)
    }

    /// Editors in row order, hidden holders included.
    pub fn editors(&self) -> impl Iterator<Item = &EditorInstance> {
        self.editors.values()
    }

    pub fn broker(&self) -> &DependencyBroker {
        &self.broker
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// Drops every row and editor, keeping the settings.
    pub fn clear(&mut self) {
        let settings = std::mem::take(&mut self.settings);
        *self = Self::new(settings);
    }

    /// Applies a user edit to the named editor.
    ///
    /// Disabled editors ignore edits. When the editor is a trigger and the
    /// edit changed its value, the returned request must be resolved by the
    /// host (see [`FormContainer::complete_fill`]).
    pub fn edit<F>(&mut self, name: &str, apply: F) -> Result<Option<FillRequest>, FormError>
    where
        F: FnOnce(&mut EditorState),
    {
        let editor = self
            .editors
            .get_mut(name)
            .ok_or_else(|| FormError::configuration(name, "no such field in this form"))?;
        if !editor.is_enabled() {
            debug!(field = name, "ignoring edit on a disabled field");
            return Ok(None);
        }
        if !editor.is_trigger() {
            apply(editor.state_mut());
            return Ok(None);
        }

        let before = editor.extract(false)?;
        apply(editor.state_mut());
        let after = editor.extract(false)?;
        if before == after {
            return Ok(None);
        }
        self.begin_fill(name, Default::default()).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynform_types::{FieldDescriptor, FieldValue};

    fn descriptors() -> Vec<FieldDescriptor> {
        let mut name = FieldDescriptor::new("name", "text");
        name.gui.read_only = true;
        let mut note = FieldDescriptor::new("note", "text");
        note.gui.order = 1;
        vec![name, note]
    }

    #[test]
    fn disabled_editors_ignore_edits() {
        let mut container = FormContainer::new(FormSettings::default());
        render(&mut container, &descriptors(), &[FieldValue::text("name", "pool")]).expect("render");

        let request = container
            .edit("name", |state| {
                if let EditorState::Text(text) = state {
                    text.set_text("changed");
                }
            })
            .expect("edit");
        assert!(request.is_none());
        assert_eq!(container.editor("name").expect("editor").extract(false).expect("value").payload.as_text(), "pool");
    }

    #[test]
    fn edits_on_plain_fields_never_request_fills() {
        let mut container = FormContainer::new(FormSettings::default());
        render(&mut container, &descriptors(), &[]).expect("render");
        let request = container
            .edit("note", |state| {
                if let EditorState::Text(text) = state {
                    text.insert_char('x');
                }
            })
            .expect("edit");
        assert!(request.is_none());
        assert!(container.edit("missing", |_| {}).is_err());
    }

    #[test]
    fn clear_keeps_settings() {
        let settings = FormSettings {
            max_width: 40,
            ..FormSettings::default()
        };
        let mut container = FormContainer::new(settings);
        render(&mut container, &descriptors(), &[]).expect("render");
        container.clear();
        assert!(container.is_empty());
        assert_eq!(container.settings().max_width, 40);
    }
}
