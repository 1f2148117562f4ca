use dynform_engine::{
    CollectingSink, EditorState, FieldDescriptor, FieldPayload, FieldValue, FormContainer, FormError, FormSettings, SubmitOutcome,
    ValidationReason, extract_all, render, submit,
};

fn host_and_port() -> Vec<FieldDescriptor> {
    let mut host = FieldDescriptor::new("host", "text");
    host.gui.required = true;
    host.gui.label = "Host".into();
    host.gui.order = 0;

    let mut port = FieldDescriptor::new("port", "numeric");
    port.gui.required = true;
    port.gui.label = "Port".into();
    port.gui.default_value = "0".into();
    port.gui.order = 1;

    vec![host, port]
}

fn type_text(container: &mut FormContainer, field: &str, text: &str) {
    container
        .edit(field, |state| match state {
            EditorState::Text(editor) => editor.set_text(text),
            EditorState::Numeric(editor) => editor.set_text(field, text),
            other => panic!("unexpected editor {other:?}"),
        })
        .expect("edit");
}

#[test]
fn host_and_port_submission() {
    let descriptors = host_and_port();
    let mut container = FormContainer::new(FormSettings::default());
    render(&mut container, &descriptors, &[]).expect("render");

    let error = extract_all(&container, &descriptors).expect_err("empty host");
    let FormError::Validation(validation) = error else { panic!("validation error") };
    assert_eq!(validation.label, "Host");
    assert_eq!(validation.reason, ValidationReason::Empty);

    type_text(&mut container, "host", "uds1");
    let error = extract_all(&container, &descriptors).expect_err("zero port");
    let FormError::Validation(validation) = error else { panic!("validation error") };
    assert_eq!(validation.label, "Port");
    assert_eq!(validation.reason, ValidationReason::Zero);

    type_text(&mut container, "port", "443");
    let values = extract_all(&container, &descriptors).expect("values");
    assert_eq!(values, vec![FieldValue::text("host", "uds1"), FieldValue::text("port", "443")]);
    assert_eq!(
        serde_json::to_value(&values).expect("json"),
        serde_json::json!([{"name": "host", "value": "uds1"}, {"name": "port", "value": "443"}])
    );
}

#[test]
fn required_text_without_values_fails_and_optional_succeeds() {
    let mut descriptor = FieldDescriptor::new("comments", "text");
    descriptor.gui.label = "Comments".into();
    descriptor.gui.required = true;

    let mut container = FormContainer::new(FormSettings::default());
    render(&mut container, std::slice::from_ref(&descriptor), &[]).expect("render");
    let error = extract_all(&container, std::slice::from_ref(&descriptor)).expect_err("required");
    assert_eq!(error.to_string(), "Comments: a value is required");

    descriptor.gui.required = false;
    render(&mut container, std::slice::from_ref(&descriptor), &[]).expect("render");
    let values = extract_all(&container, std::slice::from_ref(&descriptor)).expect("optional");
    assert_eq!(values, vec![FieldValue::text("comments", "")]);
}

#[test]
fn multiline_text_survives_repeated_writes() {
    let mut descriptor = FieldDescriptor::new("script", "text");
    descriptor.gui.multiline_count = 3;
    let mut container = FormContainer::new(FormSettings::default());
    render(&mut container, std::slice::from_ref(&descriptor), &[]).expect("render");

    let mut editor = container.editor("script").expect("editor").clone();
    for _ in 0..3 {
        editor.write(&FieldPayload::Text("a\nb\nc".into())).expect("write");
        let value = editor.extract(false).expect("value");
        editor.select(&value.payload).expect("select");
    }
    assert_eq!(editor.extract(false).expect("value").payload.as_text(), "a\nb\nc");
}

#[test]
fn modify_flow_round_trips_every_kind() {
    let schema = r#"
- name: name
  gui: { type: text, label: Name, required: true, rdonly: true, order: 0 }
- name: secret
  gui: { type: password, order: 1 }
- name: port
  gui: { type: numeric, length: 5, order: 2 }
- name: uuid
  value: 1234-abcd
  gui: { type: hidden }
- name: os
  gui: { type: choice, values: [{id: linux, text: Linux}, {id: win, text: Windows}], order: 3 }
- name: groups
  gui: { type: multichoice, values: [{id: g1, text: Admins}, {id: g2, text: Users}, {id: g3, text: Guests}], order: 4 }
- name: ips
  gui: { type: editlist, order: 5 }
- name: ssl
  gui: { type: checkbox, order: 6 }
"#;
    let descriptors: Vec<FieldDescriptor> = serde_yaml::from_str(schema).expect("schema");
    let stored = vec![
        FieldValue::text("name", "pool-a"),
        FieldValue::text("secret", "hunter2"),
        FieldValue::text("port", "8443"),
        FieldValue::text("uuid", "1234-abcd"),
        FieldValue::text("os", "win"),
        FieldValue::choices("groups", vec![dynform_engine::Choice::bare("g1"), dynform_engine::Choice::bare("g3")]),
        FieldValue::choices("ips", vec![dynform_engine::Choice::bare("10.0.0.1")]),
        FieldValue::text("ssl", "true"),
    ];

    let mut container = FormContainer::new(FormSettings::default());
    render(&mut container, &descriptors, &stored).expect("render");
    assert_eq!(container.row_count(), 7);
    assert!(!container.editor("name").expect("name").is_enabled());

    let mut sink = CollectingSink::default();
    let outcome = submit(&container, &descriptors, &mut sink).expect("submit");
    let SubmitOutcome::Accepted(values) = outcome else { panic!("accepted") };
    assert_eq!(values, stored);
    assert_eq!(sink.accepted, Some(stored));

    let groups = values.iter().find(|value| value.name == "groups").expect("groups");
    let FieldPayload::Choices(selected) = &groups.payload else { panic!("choices") };
    assert_eq!(selected[1].text, "Guests");
}
