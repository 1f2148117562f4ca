//! Field descriptors as declared by the schema provider.
//!
//! The broker has accumulated several spellings for the same keys over time
//! (`defvalue` / `defaultValue`, `rdonly` / `readOnly`, ...). Every alias is
//! accepted on input; serialization always uses the canonical camelCase name.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::value::{Choice, choices_from_json};

/// Closed set of editor kinds the engine knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Password,
    Numeric,
    Hidden,
    Choice,
    MultiChoice,
    EditableList,
    Checkbox,
}

impl FieldKind {
    pub const ALL: [FieldKind; 8] = [
        FieldKind::Text,
        FieldKind::Password,
        FieldKind::Numeric,
        FieldKind::Hidden,
        FieldKind::Choice,
        FieldKind::MultiChoice,
        FieldKind::EditableList,
        FieldKind::Checkbox,
    ];

    /// Canonical wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Password => "password",
            FieldKind::Numeric => "numeric",
            FieldKind::Hidden => "hidden",
            FieldKind::Choice => "choice",
            FieldKind::MultiChoice => "multichoice",
            FieldKind::EditableList => "editlist",
            FieldKind::Checkbox => "checkbox",
        }
    }

    /// Kinds whose payload is a list of choices rather than a single string.
    pub fn is_multi_valued(self) -> bool {
        matches!(self, FieldKind::MultiChoice | FieldKind::EditableList)
    }

    /// Kinds that may declare a dependency callback.
    pub fn supports_dependency(self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Numeric | FieldKind::Choice | FieldKind::Checkbox)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a descriptor carries a type tag outside [`FieldKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldKind(pub String);

impl fmt::Display for UnknownFieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field type '{}'", self.0)
    }
}

impl std::error::Error for UnknownFieldKind {}

impl FromStr for FieldKind {
    type Err = UnknownFieldKind;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "text" | "textbox" | "text-autocomplete" => Ok(FieldKind::Text),
            "password" => Ok(FieldKind::Password),
            "numeric" => Ok(FieldKind::Numeric),
            "hidden" => Ok(FieldKind::Hidden),
            "choice" | "imgchoice" => Ok(FieldKind::Choice),
            "multichoice" => Ok(FieldKind::MultiChoice),
            "editlist" => Ok(FieldKind::EditableList),
            "checkbox" => Ok(FieldKind::Checkbox),
            other => Err(UnknownFieldKind(other.to_string())),
        }
    }
}

/// Raw or default value attached to a descriptor.
///
/// Single-valued kinds carry text; multi-valued kinds carry a list. Scalars
/// other than strings (numbers, booleans) are stringified on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DescriptorValue {
    Text(String),
    List(Vec<Choice>),
}

impl Default for DescriptorValue {
    fn default() -> Self {
        DescriptorValue::Text(String::new())
    }
}

impl DescriptorValue {
    pub fn is_empty(&self) -> bool {
        match self {
            DescriptorValue::Text(text) => text.is_empty(),
            DescriptorValue::List(items) => items.is_empty(),
        }
    }

    /// Text view of the value. Lists yield the id of their first entry.
    pub fn as_text(&self) -> &str {
        match self {
            DescriptorValue::Text(text) => text,
            DescriptorValue::List(items) => items.first().map(|choice| choice.id.as_str()).unwrap_or(""),
        }
    }

    /// List view of the value. A non-empty text becomes a single entry.
    pub fn to_choices(&self) -> Vec<Choice> {
        match self {
            DescriptorValue::Text(text) if text.is_empty() => Vec::new(),
            DescriptorValue::Text(text) => vec![Choice::new(text.clone(), text.clone())],
            DescriptorValue::List(items) => items.clone(),
        }
    }
}

impl From<&str> for DescriptorValue {
    fn from(value: &str) -> Self {
        DescriptorValue::Text(value.to_string())
    }
}

impl<'de> Deserialize<'de> for DescriptorValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonValue::deserialize(deserializer)?;
        Ok(match raw {
            JsonValue::Null => DescriptorValue::default(),
            JsonValue::String(text) => DescriptorValue::Text(text),
            JsonValue::Array(_) => DescriptorValue::List(choices_from_json(raw).map_err(serde::de::Error::custom)?),
            JsonValue::Object(_) => DescriptorValue::List(choices_from_json(JsonValue::Array(vec![raw])).map_err(serde::de::Error::custom)?),
            other => DescriptorValue::Text(other.to_string()),
        })
    }
}

/// Dependency declaration: changing this field invokes `callback_name` with
/// the current values of `parameters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDependency {
    pub callback_name: String,
    #[serde(default, alias = "parameterNames")]
    pub parameters: Vec<String>,
}

/// Presentation and validation metadata of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuiMeta {
    /// Type tag exactly as received; resolved with [`GuiMeta::kind`].
    #[serde(rename = "type", default = "default_type_tag")]
    pub field_type: String,
    #[serde(default, alias = "defvalue", alias = "defValue")]
    pub default_value: DescriptorValue,
    /// Maximum length in characters (digits for numeric fields).
    #[serde(default, alias = "length")]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub label: String,
    #[serde(default, alias = "rdonly", alias = "readonly")]
    pub read_only: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub tooltip: String,
    #[serde(default, alias = "values", deserialize_with = "deserialize_choices")]
    pub choices: Vec<Choice>,
    #[serde(default, alias = "fills")]
    pub dependency: Option<FieldDependency>,
    /// Visible row hint for multi-choice lists.
    #[serde(default)]
    pub rows: Option<u16>,
    /// Line count for text fields; 0 or 1 means single line.
    #[serde(default, alias = "multiline", deserialize_with = "deserialize_line_count")]
    pub multiline_count: u16,
    #[serde(default, alias = "minvalue")]
    pub min_value: Option<i64>,
    #[serde(default, alias = "maxvalue")]
    pub max_value: Option<i64>,
    /// Optional tab group the field belongs to.
    #[serde(default)]
    pub tab: Option<String>,
}

impl Default for GuiMeta {
    fn default() -> Self {
        Self {
            field_type: default_type_tag(),
            default_value: DescriptorValue::default(),
            max_length: None,
            required: false,
            label: String::new(),
            read_only: false,
            order: 0,
            tooltip: String::new(),
            choices: Vec::new(),
            dependency: None,
            rows: None,
            multiline_count: 0,
            min_value: None,
            max_value: None,
            tab: None,
        }
    }
}

impl GuiMeta {
    /// Resolves the type tag into a [`FieldKind`].
    pub fn kind(&self) -> Result<FieldKind, UnknownFieldKind> {
        self.field_type.parse()
    }
}

/// One form field as received from the schema provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// Current value; empty means "use the default".
    #[serde(default, rename = "value")]
    pub raw_value: DescriptorValue,
    #[serde(default)]
    pub gui: GuiMeta,
}

impl FieldDescriptor {
    /// Creates a descriptor with the given name and type tag and default metadata.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_value: DescriptorValue::default(),
            gui: GuiMeta {
                field_type: field_type.into(),
                ..GuiMeta::default()
            },
        }
    }

    pub fn kind(&self) -> Result<FieldKind, UnknownFieldKind> {
        self.gui.kind()
    }

    /// The value editors are seeded with: the raw value when present, else the default.
    pub fn initial_value(&self) -> &DescriptorValue {
        if self.raw_value.is_empty() { &self.gui.default_value } else { &self.raw_value }
    }

    /// Human readable name used in validation messages; falls back to the field name.
    pub fn display_label(&self) -> &str {
        if self.gui.label.trim().is_empty() { &self.name } else { &self.gui.label }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self.kind(), Ok(FieldKind::Hidden))
    }
}

fn default_type_tag() -> String {
    FieldKind::Text.as_str().to_string()
}

fn deserialize_choices<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Choice>, D::Error> {
    let raw = JsonValue::deserialize(deserializer)?;
    choices_from_json(raw).map_err(serde::de::Error::custom)
}

fn deserialize_line_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    // The broker sends either a count or a boolean flag.
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Bool(true) => 2,
        JsonValue::Number(number) => number.as_u64().map(|count| count.min(u16::MAX as u64) as u16).unwrap_or(0),
        JsonValue::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    })
}
