use anyhow::bail;
use dynform_engine::{
    BrokerState, Choice, EditorState, FieldDependency, FieldDescriptor, FieldPayload, FieldValue, FillOutcome, FormContainer, FormError, FormSettings, SchemaProvider,
    StaticSchemaProvider, parse_fill_table_file, render,
};

fn choice(name: &str, order: i64, ids: &[&str]) -> FieldDescriptor {
    let mut descriptor = FieldDescriptor::new(name, "choice");
    descriptor.gui.order = order;
    descriptor.gui.choices = ids.iter().map(|id| Choice::new(*id, id.to_uppercase())).collect();
    descriptor
}

fn with_fill(mut descriptor: FieldDescriptor, callback: &str, parameters: &[&str]) -> FieldDescriptor {
    descriptor.gui.dependency = Some(FieldDependency {
        callback_name: callback.into(),
        parameters: parameters.iter().map(|name| name.to_string()).collect(),
    });
    descriptor
}

fn selected(container: &FormContainer, field: &str) -> String {
    container.editor(field).expect("editor").extract(false).expect("value").payload.as_text().to_string()
}

fn options(container: &FormContainer, field: &str) -> Vec<String> {
    match container.editor(field).expect("editor").state() {
        EditorState::Choice(editor) => editor.choices().iter().map(|choice| choice.id.clone()).collect(),
        other => panic!("not a choice editor: {other:?}"),
    }
}

/// Provider scripted with closures, recording every call.
struct ScriptedProvider<F> {
    answer: F,
    calls: std::sync::Mutex<Vec<(String, Vec<FieldValue>)>>,
}

impl<F> ScriptedProvider<F> {
    fn new(answer: F) -> Self {
        Self {
            answer,
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, Vec<FieldValue>)> {
        self.calls.lock().expect("calls").clone()
    }
}

impl<F> SchemaProvider for ScriptedProvider<F>
where
    F: Fn(&str, &[FieldValue]) -> anyhow::Result<Vec<FieldValue>> + Send + Sync,
{
    fn descriptors(&self) -> anyhow::Result<Vec<FieldDescriptor>> {
        Ok(Vec::new())
    }

    fn fill(&self, callback_name: &str, parameters: &[FieldValue]) -> anyhow::Result<Vec<FieldValue>> {
        self.calls.lock().expect("calls").push((callback_name.to_string(), parameters.to_vec()));
        (self.answer)(callback_name, parameters)
    }
}

fn service_form() -> (Vec<FieldDescriptor>, FormContainer) {
    let descriptors = vec![
        with_fill(choice("service", 0, &["kvm", "xen"]), "serviceFill", &["service"]),
        choice("b", 1, &["b1", "b2"]),
        choice("c", 2, &["c1", "c2"]),
    ];
    let mut container = FormContainer::new(FormSettings::default());
    render(&mut container, &descriptors, &[FieldValue::text("service", "kvm"), FieldValue::text("c", "c2")]).expect("render");
    (descriptors, container)
}

#[test]
fn refill_leaves_untouched_fields_alone() {
    let (_, mut container) = service_form();
    let provider = ScriptedProvider::new(|_: &str, _: &[FieldValue]| -> anyhow::Result<Vec<FieldValue>> {
        Ok(vec![FieldValue::choices("b", vec![Choice::new("n1", "New 1"), Choice::new("n2", "New 2")])])
    });

    let written = container.trigger_dependency("service", &provider).expect("fill");
    assert_eq!(written, ["b"]);
    assert_eq!(options(&container, "b"), ["n1", "n2"]);
    assert_eq!(selected(&container, "b"), "n1");
    assert_eq!(selected(&container, "c"), "c2");
    assert_eq!(options(&container, "c"), ["c1", "c2"]);
}

#[test]
fn user_change_gathers_parameters_and_applies_the_answer() {
    let (_, mut container) = service_form();
    let request = container
        .edit("service", |state| {
            if let EditorState::Choice(editor) = state {
                editor.select_next();
            }
        })
        .expect("edit")
        .expect("trigger changed");
    assert_eq!(request.parameters, vec![FieldValue::text("service", "xen")]);

    let outcome = container
        .complete_fill(request, Ok(vec![FieldValue::choices("b", Vec::new())]))
        .expect("applied");
    assert!(matches!(outcome, FillOutcome::Applied { ref cascade, .. } if cascade.is_empty()));
    assert!(options(&container, "b").is_empty());
    assert_eq!(selected(&container, "b"), "");
}

#[test]
fn failed_or_partial_answers_change_nothing() {
    let (_, mut container) = service_form();
    let failing = ScriptedProvider::new(|_: &str, _: &[FieldValue]| -> anyhow::Result<Vec<FieldValue>> { bail!("timeout") });
    let error = container.trigger_dependency("service", &failing).expect_err("remote failure");
    assert!(matches!(error, FormError::Dependency(_)));
    assert_eq!(options(&container, "b"), ["b1", "b2"]);

    let unknown_target = ScriptedProvider::new(|_: &str, _: &[FieldValue]| -> anyhow::Result<Vec<FieldValue>> {
        Ok(vec![
            FieldValue::choices("b", vec![Choice::new("n1", "New")]),
            FieldValue::text("nope", "x"),
        ])
    });
    let error = container.trigger_dependency("service", &unknown_target).expect_err("unknown target");
    assert_eq!(error.field(), Some("nope"));
    assert_eq!(options(&container, "b"), ["b1", "b2"]);
    assert_eq!(selected(&container, "b"), "");
}

#[test]
fn cascades_fire_each_trigger_once() {
    let descriptors = vec![
        with_fill(choice("a", 0, &["a1", "a2"]), "fillB", &["a"]),
        with_fill(choice("b", 1, &["b1"]), "fillA", &["b"]),
    ];
    let mut container = FormContainer::new(FormSettings::default());
    render(&mut container, &descriptors, &[]).expect("render");

    let provider = ScriptedProvider::new(|callback: &str, _: &[FieldValue]| -> anyhow::Result<Vec<FieldValue>> {
        Ok(match callback {
            "fillB" => vec![FieldValue::choices("b", vec![Choice::new("b2", "B2")])],
            _ => vec![FieldValue::choices("a", vec![Choice::new("a9", "A9")])],
        })
    });

    let written = container.trigger_dependency("a", &provider).expect("fill");
    assert_eq!(written, ["b", "a"]);
    let callbacks: Vec<String> = provider.calls().into_iter().map(|(callback, _)| callback).collect();
    assert_eq!(callbacks, ["fillB", "fillA"]);
    assert_eq!(selected(&container, "a"), "a9");
    assert_eq!(selected(&container, "b"), "b2");
}

#[test]
fn failed_cascade_still_resolves_sibling_triggers() {
    let descriptors = vec![
        with_fill(choice("a", 0, &["a1", "a2"]), "fillA", &["a"]),
        with_fill(choice("b", 1, &["b1"]), "fillB", &["b"]),
        with_fill(choice("c", 2, &["c1"]), "fillC", &["c"]),
        choice("d", 3, &["d1"]),
    ];
    let mut container = FormContainer::new(FormSettings::default());
    render(&mut container, &descriptors, &[]).expect("render");

    let provider = ScriptedProvider::new(|callback: &str, _: &[FieldValue]| -> anyhow::Result<Vec<FieldValue>> {
        match callback {
            "fillA" => Ok(vec![
                FieldValue::choices("b", vec![Choice::new("b2", "B2")]),
                FieldValue::choices("c", vec![Choice::new("c2", "C2")]),
            ]),
            "fillB" => bail!("remote down"),
            _ => Ok(vec![FieldValue::choices("d", vec![Choice::new("d2", "D2")])]),
        }
    });

    let error = container.trigger_dependency("a", &provider).expect_err("fillB fails");
    let FormError::Dependency(failure) = error else { panic!("dependency failure") };
    assert_eq!(failure.callback, "fillB");

    for trigger in ["a", "b", "c"] {
        assert_eq!(container.broker().state(trigger), BrokerState::Idle, "{trigger}");
    }
    assert_eq!(container.broker().pending(), 0);
    assert_eq!(selected(&container, "b"), "b2");
    assert_eq!(selected(&container, "d"), "d2");
    let callbacks: Vec<String> = provider.calls().into_iter().map(|(callback, _)| callback).collect();
    assert_eq!(callbacks, ["fillA", "fillB", "fillC"]);
}

#[test]
fn fill_table_provider_drives_refills() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let fills_path = temp_dir.path().join("fills.yaml");
    std::fs::write(
        &fills_path,
        r#"
callbacks:
  serviceFill:
    - when: { service: kvm }
      fill:
        - name: b
          values: [{ id: vm1, text: "Machine 1" }]
"#,
    )
    .expect("write");
    let provider = StaticSchemaProvider::new(Vec::new(), parse_fill_table_file(&fills_path).expect("fill table"));

    let (_, mut container) = service_form();
    container.trigger_dependency("service", &provider).expect("fill");
    let value = container.editor("b").expect("b").extract(false).expect("value");
    assert_eq!(value.payload, FieldPayload::Text("vm1".into()));
}
