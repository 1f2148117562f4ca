//! Values exchanged with the schema provider and the value sink.

use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap};
use serde_json::Value as JsonValue;

/// Canonical strings used for boolean payloads.
pub const TRUE_STR: &str = "true";
pub const FALSE_STR: &str = "false";

/// An `(id, text)` pair. Only `id` identifies the choice; `text` is for display.
#[derive(Debug, Clone, Eq, Serialize)]
pub struct Choice {
    pub id: String,
    pub text: String,
}

impl Choice {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// A choice whose display text is not meaningful (editable list items).
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
        }
    }

    /// Text to show for this choice, falling back to the id when blank.
    pub fn label(&self) -> &str {
        if self.text.is_empty() { &self.id } else { &self.text }
    }
}

impl PartialEq for Choice {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl std::hash::Hash for Choice {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<'de> Deserialize<'de> for Choice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonValue::deserialize(deserializer)?;
        choice_from_json(raw).map_err(serde::de::Error::custom)
    }
}

fn scalar_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(text) => Some(text.clone()),
        JsonValue::Number(number) => Some(number.to_string()),
        JsonValue::Bool(flag) => Some(bool_to_str(*flag).to_string()),
        _ => None,
    }
}

fn choice_from_json(raw: JsonValue) -> Result<Choice, String> {
    match raw {
        JsonValue::Object(map) => {
            let id = map
                .get("id")
                .and_then(scalar_to_string)
                .ok_or_else(|| "choice object is missing an 'id'".to_string())?;
            let text = map.get("text").and_then(scalar_to_string).unwrap_or_default();
            Ok(Choice { id, text })
        }
        other => scalar_to_string(&other)
            .map(|text| Choice::new(text.clone(), text))
            .ok_or_else(|| format!("unsupported choice value: {other}")),
    }
}

/// Converts a JSON list (or `{id: text}` object, or single scalar) into choices.
pub(crate) fn choices_from_json(raw: JsonValue) -> Result<Vec<Choice>, String> {
    match raw {
        JsonValue::Null => Ok(Vec::new()),
        JsonValue::Array(items) => items.into_iter().map(choice_from_json).collect(),
        JsonValue::Object(map) if !map.contains_key("id") => Ok(map
            .into_iter()
            .map(|(id, text)| {
                let text = scalar_to_string(&text).unwrap_or_default();
                Choice { id, text }
            })
            .collect()),
        other => Ok(vec![choice_from_json(other)?]),
    }
}

/// Payload of a [`FieldValue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPayload {
    Text(String),
    Choices(Vec<Choice>),
}

impl FieldPayload {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldPayload::Text(text) => text.is_empty(),
            FieldPayload::Choices(items) => items.is_empty(),
        }
    }

    /// Text view; a choice list yields its first id.
    pub fn as_text(&self) -> &str {
        match self {
            FieldPayload::Text(text) => text,
            FieldPayload::Choices(items) => items.first().map(|choice| choice.id.as_str()).unwrap_or(""),
        }
    }

    /// Choice view; a non-empty text becomes a single bare choice.
    pub fn to_choices(&self) -> Vec<Choice> {
        match self {
            FieldPayload::Text(text) if text.is_empty() => Vec::new(),
            FieldPayload::Text(text) => vec![Choice::new(text.clone(), text.clone())],
            FieldPayload::Choices(items) => items.clone(),
        }
    }
}

/// A named value as read from, or written to, an editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub name: String,
    pub payload: FieldPayload,
}

impl FieldValue {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: FieldPayload::Text(value.into()),
        }
    }

    pub fn choices(name: impl Into<String>, values: Vec<Choice>) -> Self {
        Self {
            name: name.into(),
            payload: FieldPayload::Choices(values),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("name", &self.name)?;
        match &self.payload {
            FieldPayload::Text(text) => map.serialize_entry("value", text)?,
            FieldPayload::Choices(items) => map.serialize_entry("values", items)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let JsonValue::Object(mut map) = JsonValue::deserialize(deserializer)? else {
            return Err(serde::de::Error::custom("field value must be an object"));
        };
        let name = map
            .remove("name")
            .and_then(|name| scalar_to_string(&name))
            .ok_or_else(|| serde::de::Error::custom("field value is missing a 'name'"))?;

        let payload = if let Some(values) = map.remove("values") {
            FieldPayload::Choices(choices_from_json(values).map_err(serde::de::Error::custom)?)
        } else {
            match map.remove("value").unwrap_or(JsonValue::Null) {
                JsonValue::Null => FieldPayload::Text(String::new()),
                list @ JsonValue::Array(_) => FieldPayload::Choices(choices_from_json(list).map_err(serde::de::Error::custom)?),
                scalar => FieldPayload::Text(
                    scalar_to_string(&scalar).ok_or_else(|| serde::de::Error::custom(format!("unsupported value for '{name}'")))?,
                ),
            }
        };

        Ok(FieldValue { name, payload })
    }
}

/// Interprets a stored boolean string; only `true` (any case) is truthy.
pub fn str_to_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(TRUE_STR)
}

pub fn bool_to_str(value: bool) -> &'static str {
    if value { TRUE_STR } else { FALSE_STR }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_identity_ignores_display_text() {
        assert_eq!(Choice::new("a", "Alpha"), Choice::new("a", "Other"));
        assert_ne!(Choice::new("a", "Alpha"), Choice::new("b", "Alpha"));
        assert_eq!(Choice::bare("10.0.0.1").label(), "10.0.0.1");
    }

    #[test]
    fn field_value_wire_shapes() {
        let single = FieldValue::text("host", "uds1");
        assert_eq!(serde_json::to_string(&single).expect("json"), r#"{"name":"host","value":"uds1"}"#);

        let multi = FieldValue::choices("groups", vec![Choice::new("g1", "Group 1")]);
        assert_eq!(
            serde_json::to_string(&multi).expect("json"),
            r#"{"name":"groups","values":[{"id":"g1","text":"Group 1"}]}"#
        );
    }

    #[test]
    fn fill_results_accept_loose_shapes() {
        let json = r#"[
            {"name": "machine", "values": [{"id": "m1", "text": "Machine 1"}, "m2"]},
            {"name": "port", "value": 443},
            {"name": "note"}
        ]"#;
        let values: Vec<FieldValue> = serde_json::from_str(json).expect("values");
        assert_eq!(values[0].payload.to_choices().len(), 2);
        assert_eq!(values[1].payload, FieldPayload::Text("443".into()));
        assert!(values[2].payload.is_empty());
    }

    #[test]
    fn id_text_maps_become_choices() {
        let choices = choices_from_json(serde_json::json!({"1": "One", "2": "Two"})).expect("choices");
        assert_eq!(choices, vec![Choice::new("1", "One"), Choice::new("2", "Two")]);
    }

    #[test]
    fn boolean_strings() {
        assert!(str_to_bool("TRUE"));
        assert!(str_to_bool("true"));
        assert!(!str_to_bool("yes"));
        assert_eq!(bool_to_str(false), "false");
    }
}
