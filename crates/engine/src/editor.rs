//! Editor instances bound to their originating descriptor.

use dynform_types::{FieldDependency, FieldDescriptor, FieldKind, FieldPayload, FieldValue, FormSettings, Size};
use tracing::debug;

use crate::{
    error::FormError,
    kinds::{
        checkbox::CheckboxEditor, choice::ChoiceEditor, editable_list::EditableListEditor, hidden::HiddenValue,
        multi_choice::MultiChoiceEditor, numeric::NumericEditor, text::TextEditor,
    },
    registry::{FieldBehavior, behavior_for},
};

/// Live editor state, one variant per editor shape. Password fields use
/// [`EditorState::Text`] with masking enabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorState {
    Text(TextEditor),
    Numeric(NumericEditor),
    Hidden(HiddenValue),
    Choice(ChoiceEditor),
    MultiChoice(MultiChoiceEditor),
    EditableList(EditableListEditor),
    Checkbox(CheckboxEditor),
}

impl EditorState {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            EditorState::Text(_) => "text",
            EditorState::Numeric(_) => "numeric",
            EditorState::Hidden(_) => "hidden",
            EditorState::Choice(_) => "choice",
            EditorState::MultiChoice(_) => "multichoice",
            EditorState::EditableList(_) => "editlist",
            EditorState::Checkbox(_) => "checkbox",
        }
    }
}

/// An editor tagged with the descriptor that produced it, so later passes
/// (extraction, dependency refills) dispatch to the right behavior without
/// re-reading the schema.
#[derive(Clone, Debug)]
pub struct EditorInstance {
    descriptor: FieldDescriptor,
    kind: FieldKind,
    state: EditorState,
    enabled: bool,
}

impl EditorInstance {
    /// Resolves the descriptor's kind and constructs its editor.
    ///
    /// Fails when the type tag is unknown or when a dependency is declared on
    /// a kind that cannot trigger one.
    pub fn construct(descriptor: &FieldDescriptor, settings: &FormSettings) -> Result<Self, FormError> {
        let kind = descriptor
            .kind()
            .map_err(|error| FormError::configuration(&descriptor.name, error.to_string()))?;
        if descriptor.gui.dependency.is_some() && !kind.supports_dependency() {
            return Err(FormError::configuration(
                &descriptor.name,
                format!("fields of type '{kind}' cannot declare a dependency callback"),
            ));
        }

        let state = behavior_for(kind).construct(descriptor, settings);
        debug!(field = %descriptor.name, kind = %kind, "constructed editor");
        Ok(Self {
            descriptor: descriptor.clone(),
            kind,
            state,
            enabled: true,
        })
    }

    fn behavior(&self) -> &'static dyn FieldBehavior {
        behavior_for(self.kind)
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_hidden(&self) -> bool {
        self.kind == FieldKind::Hidden
    }

    pub fn dependency(&self) -> Option<&FieldDependency> {
        self.descriptor.gui.dependency.as_ref()
    }

    /// True when a user change on this editor must invoke a fill callback.
    pub fn is_trigger(&self) -> bool {
        self.dependency().is_some()
    }

    pub fn extract(&self, validate: bool) -> Result<FieldValue, FormError> {
        let payload = self.behavior().extract(&self.state, &self.descriptor, validate)?;
        Ok(FieldValue {
            name: self.descriptor.name.clone(),
            payload,
        })
    }

    pub fn write(&mut self, payload: &FieldPayload) -> Result<(), FormError> {
        self.behavior().write(&mut self.state, &self.descriptor, payload)
    }

    pub fn select(&mut self, payload: &FieldPayload) -> Result<(), FormError> {
        self.behavior().select(&mut self.state, &self.descriptor, payload)
    }

    pub fn measure(&self, settings: &FormSettings) -> Size {
        self.behavior().measure(&self.descriptor, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynform_types::FieldDependency;

    #[test]
    fn unknown_type_is_a_configuration_error() {
        let descriptor = FieldDescriptor::new("when", "date");
        let error = EditorInstance::construct(&descriptor, &FormSettings::default()).expect_err("unknown type");
        assert!(matches!(error, FormError::Configuration { ref field, .. } if field == "when"));
    }

    #[test]
    fn dependencies_are_rejected_on_non_trigger_kinds() {
        let mut descriptor = FieldDescriptor::new("vc", "hidden");
        descriptor.gui.dependency = Some(FieldDependency {
            callback_name: "fill".into(),
            parameters: vec![],
        });
        assert!(EditorInstance::construct(&descriptor, &FormSettings::default()).is_err());

        descriptor.gui.field_type = "choice".into();
        let editor = EditorInstance::construct(&descriptor, &FormSettings::default()).expect("choice trigger");
        assert!(editor.is_trigger());
    }
}
