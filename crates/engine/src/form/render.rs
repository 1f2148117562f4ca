use std::collections::HashSet;

use dynform_types::{FieldDescriptor, FieldValue, Size};
use tracing::{debug, info};

use super::{FieldLabel, FormContainer, FormRow, SizeAccumulator};
use crate::{editor::EditorInstance, error::FormError};

/// Builds editors for `descriptors` into `container` and returns the form's
/// preferred size.
///
/// Rows follow ascending `order`, ties keeping their original sequence.
/// Hidden fields get a value holder but no row. Non-empty `prior_values`
/// mark a modify flow: read-only fields are locked and the values are
/// applied through `select` once every editor exists.
///
/// # Errors
///
/// Any [`FormError::Configuration`] (unknown type tag, duplicate name,
/// dependency on an unsupported kind or naming a missing parameter) aborts
/// the whole render and leaves `container` empty.
pub fn render(container: &mut FormContainer, descriptors: &[FieldDescriptor], prior_values: &[FieldValue]) -> Result<Size, FormError> {
    container.clear();
    if let Err(error) = populate(container, descriptors, prior_values) {
        container.clear();
        return Err(error);
    }
    info!(
        fields = container.editors.len(),
        rows = container.row_count,
        width = container.preferred_size.width,
        height = container.preferred_size.height,
        modify = container.modify_flow,
        "rendered form"
    );
    Ok(container.preferred_size)
}

fn populate(container: &mut FormContainer, descriptors: &[FieldDescriptor], prior_values: &[FieldValue]) -> Result<(), FormError> {
    let mut seen = HashSet::with_capacity(descriptors.len());
    for descriptor in descriptors {
        if !seen.insert(descriptor.name.as_str()) {
            return Err(FormError::configuration(&descriptor.name, "field name declared more than once"));
        }
    }

    let mut ordered: Vec<&FieldDescriptor> = descriptors.iter().collect();
    ordered.sort_by_key(|descriptor| descriptor.gui.order);

    container.row_count = ordered.iter().filter(|descriptor| !descriptor.is_hidden()).count();
    container.modify_flow = !prior_values.is_empty();

    for descriptor in ordered {
        let mut editor = EditorInstance::construct(descriptor, &container.settings)?;
        if !editor.is_hidden() {
            let locked = descriptor.gui.read_only && container.modify_flow;
            editor.set_enabled(!locked);
            container.rows.push(FormRow {
                field: descriptor.name.clone(),
                label: FieldLabel {
                    text: descriptor.display_label().to_string(),
                    tooltip: descriptor.gui.tooltip.clone(),
                    enabled: !locked,
                },
                size: editor.measure(&container.settings),
                tab: descriptor.gui.tab.clone(),
            });
        }
        container.editors.insert(descriptor.name.clone(), editor);
    }

    check_dependency_parameters(container)?;

    // Dependency wiring exists now, so selecting cannot be mistaken for "unset".
    for value in prior_values {
        match container.editors.get_mut(&value.name) {
            Some(editor) => editor.select(&value.payload)?,
            None => debug!(field = %value.name, "ignoring prior value for a field the form does not have"),
        }
    }

    let mut accumulator = SizeAccumulator::new(&container.settings);
    for row in &container.rows {
        accumulator.add_row(&row.label.text, row.size);
    }
    container.preferred_size = accumulator.finish();
    Ok(())
}

fn check_dependency_parameters(container: &FormContainer) -> Result<(), FormError> {
    for editor in container.editors.values() {
        let Some(dependency) = editor.dependency() else { continue };
        if let Some(missing) = dependency.parameters.iter().find(|name| !container.editors.contains_key(name.as_str())) {
            return Err(FormError::configuration(
                editor.name(),
                format!("callback '{}' names unknown parameter field '{missing}'", dependency.callback_name),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynform_types::{FieldDependency, FormSettings};

    fn field(name: &str, field_type: &str, order: i64) -> FieldDescriptor {
        let mut descriptor = FieldDescriptor::new(name, field_type);
        descriptor.gui.order = order;
        descriptor
    }

    #[test]
    fn rows_follow_order_and_skip_hidden_fields() {
        let descriptors = vec![
            field("c", "text", 2),
            field("token", "hidden", 0),
            field("a", "numeric", 0),
            field("b", "checkbox", 1),
            field("a2", "text", 0),
        ];
        let mut container = FormContainer::new(FormSettings::default());
        render(&mut container, &descriptors, &[]).expect("render");

        let rows: Vec<&str> = container.rows().iter().map(|row| row.field.as_str()).collect();
        assert_eq!(rows, ["a", "a2", "b", "c"]);
        assert_eq!(container.row_count(), 4);
        assert!(container.editor("token").is_some());
    }

    #[test]
    fn unknown_type_aborts_and_empties_the_container() {
        let mut container = FormContainer::new(FormSettings::default());
        render(&mut container, &[field("ok", "text", 0)], &[]).expect("render");

        let error = render(&mut container, &[field("ok", "text", 0), field("bad", "calendar", 1)], &[]).expect_err("unknown type");
        assert_eq!(error.field(), Some("bad"));
        assert!(container.is_empty());
        assert!(container.rows().is_empty());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut container = FormContainer::new(FormSettings::default());
        let error = render(&mut container, &[field("x", "text", 0), field("x", "numeric", 1)], &[]).expect_err("duplicate");
        assert!(matches!(error, FormError::Configuration { .. }));
    }

    #[test]
    fn dangling_dependency_parameters_are_rejected() {
        let mut trigger = field("service", "choice", 0);
        trigger.gui.dependency = Some(FieldDependency {
            callback_name: "fill".into(),
            parameters: vec!["service".into(), "provider".into()],
        });
        let mut container = FormContainer::new(FormSettings::default());
        let error = render(&mut container, &[trigger], &[]).expect_err("dangling parameter");
        assert_eq!(error.field(), Some("service"));
    }

    #[test]
    fn read_only_locks_only_in_modify_flow() {
        let mut name = field("name", "text", 0);
        name.gui.read_only = true;
        let descriptors = vec![name, field("comments", "text", 1)];

        let mut container = FormContainer::new(FormSettings::default());
        render(&mut container, &descriptors, &[]).expect("create flow");
        assert!(container.editor("name").expect("name").is_enabled());
        assert!(!container.is_modify_flow());

        render(&mut container, &descriptors, &[FieldValue::text("name", "pool-a"), FieldValue::text("gone", "x")]).expect("modify flow");
        let editor = container.editor("name").expect("name");
        assert!(!editor.is_enabled());
        assert!(!container.rows()[0].label.enabled);
        assert_eq!(editor.extract(true).expect("value").payload.as_text(), "pool-a");
        assert!(container.editor("comments").expect("comments").is_enabled());
    }

    #[test]
    fn preferred_size_respects_max_width() {
        let settings = FormSettings {
            max_width: 30,
            ..FormSettings::default()
        };
        let mut container = FormContainer::new(settings);
        let size = render(&mut container, &[field("long", "text", 0), field("flag", "checkbox", 1)], &[]).expect("render");
        assert_eq!(size.width, 30);
        assert_eq!(size.height, 2);
    }
}
