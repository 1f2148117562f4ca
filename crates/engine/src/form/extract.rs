use anyhow::{Context, Result};
use dynform_types::{FieldDescriptor, FieldValue};
use tracing::{info, warn};

use super::FormContainer;
use crate::{
    error::{FormError, ValidationError},
    provider::ValueSink,
};

/// Reads every descriptor's editor, validating, in descriptor order.
///
/// Stops at the first required field that is empty; no partial list is
/// returned. Hidden holders are read but never validated.
pub fn extract_all(container: &FormContainer, descriptors: &[FieldDescriptor]) -> Result<Vec<FieldValue>, FormError> {
    descriptors
        .iter()
        .map(|descriptor| {
            let editor = container
                .editor(&descriptor.name)
                .ok_or_else(|| FormError::configuration(&descriptor.name, "field was not rendered in this form"))?;
            editor.extract(true)
        })
        .collect()
}

/// What a submit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(Vec<FieldValue>),
    /// The form stays open; the sink was told why.
    Rejected(ValidationError),
}

/// Extracts the form and hands the result to `sink`.
///
/// # Errors
///
/// Configuration errors and sink failures. Validation failures are not
/// errors here: they are reported to the sink and returned as
/// [`SubmitOutcome::Rejected`].
pub fn submit(container: &FormContainer, descriptors: &[FieldDescriptor], sink: &mut dyn ValueSink) -> Result<SubmitOutcome> {
    match extract_all(container, descriptors) {
        Ok(values) => {
            sink.accept(&values).context("value sink refused the submitted values")?;
            info!(fields = values.len(), "form submitted");
            Ok(SubmitOutcome::Accepted(values))
        }
        Err(FormError::Validation(error)) => {
            warn!(field = %error.field, reason = %error.reason, "submit rejected");
            sink.reject(&error);
            Ok(SubmitOutcome::Rejected(error))
        }
        Err(other) => Err(other.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ValidationReason, form::render, provider::CollectingSink};
    use dynform_types::FormSettings;

    fn descriptors() -> Vec<FieldDescriptor> {
        let mut name = FieldDescriptor::new("name", "text");
        name.gui.required = true;
        name.gui.label = "Name".into();
        name.gui.order = 1;
        let mut token = FieldDescriptor::new("token", "hidden");
        token.raw_value = "abc".into();
        token.gui.required = true;
        let mut comments = FieldDescriptor::new("comments", "text");
        comments.gui.order = 0;
        vec![name, token, comments]
    }

    #[test]
    fn values_follow_descriptor_order_not_row_order() {
        let descriptors = descriptors();
        let mut container = FormContainer::new(FormSettings::default());
        render(&mut container, &descriptors, &[FieldValue::text("name", "pool")]).expect("render");

        let values = extract_all(&container, &descriptors).expect("values");
        let names: Vec<&str> = values.iter().map(|value| value.name.as_str()).collect();
        assert_eq!(names, ["name", "token", "comments"]);
        assert_eq!(values[1].payload.as_text(), "abc");
        assert_eq!(values[2].payload.as_text(), "");
    }

    #[test]
    fn rejected_submit_reaches_the_sink() {
        let descriptors = descriptors();
        let mut container = FormContainer::new(FormSettings::default());
        render(&mut container, &descriptors, &[]).expect("render");

        let mut sink = CollectingSink::default();
        let outcome = submit(&container, &descriptors, &mut sink).expect("submit");
        let SubmitOutcome::Rejected(error) = outcome else { panic!("expected rejection") };
        assert_eq!(error.label, "Name");
        assert_eq!(error.reason, ValidationReason::Empty);
        assert_eq!(sink.rejected, vec![error]);
        assert!(sink.accepted.is_none());
    }

    #[test]
    fn descriptors_that_were_not_rendered_are_configuration_errors() {
        let container = FormContainer::new(FormSettings::default());
        let error = extract_all(&container, &descriptors()).expect_err("not rendered");
        assert!(matches!(error, FormError::Configuration { .. }));
    }
}
