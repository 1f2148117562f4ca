//! Loading form descriptions, stored values and fill tables from disk.
//!
//! All three loaders accept YAML or JSON; JSON parses as YAML, so no
//! extension sniffing is needed.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use dynform_types::{FieldDescriptor, FieldValue};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::provider::FillTable;

/// A form description: an optional title and its ordered fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

fn read_document(file_path: &Path, what: &str) -> Result<String> {
    let file_content = fs::read(file_path).with_context(|| format!("Failed to read {what} file: {}", file_path.display()))?;
    Ok(String::from_utf8_lossy(&file_content).into_owned())
}

fn parse_document<T: DeserializeOwned>(file_path: &Path, what: &str) -> Result<T> {
    let content = read_document(file_path, what)?;
    serde_yaml::from_str(&content).with_context(|| format!("Invalid {what} file: {}", file_path.display()))
}

/// Loads a form description.
///
/// The document is either a bare list of descriptors or a mapping with
/// `fields` (and optionally `title`).
///
/// # Examples
///
/// ```rust
/// use dynform_engine::parse_schema_file;
///
/// let temp_dir = tempfile::tempdir()?;
/// let schema_path = temp_dir.path().join("pool.yaml");
/// std::fs::write(&schema_path, r#"
/// title: Service pool
/// fields:
///   - name: name
///     gui: { type: text, label: Name, required: true }
/// "#)?;
///
/// let schema = parse_schema_file(&schema_path)?;
/// assert_eq!(schema.fields.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_schema_file(file_path: impl AsRef<Path>) -> Result<FormSchema> {
    let file_path = file_path.as_ref();
    let content = read_document(file_path, "schema")?;

    if let Ok(fields) = serde_yaml::from_str::<Vec<FieldDescriptor>>(&content) {
        return Ok(FormSchema { title: None, fields });
    }
    serde_yaml::from_str::<FormSchema>(&content).with_context(|| {
        format!(
            "Unsupported schema document {}. Expected a list of fields or a mapping with a 'fields' list",
            file_path.display()
        )
    })
}

/// Loads a list of stored field values, as used for modify flows.
pub fn parse_values_file(file_path: impl AsRef<Path>) -> Result<Vec<FieldValue>> {
    parse_document(file_path.as_ref(), "values")
}

/// Loads a fill table answering dependency callbacks.
pub fn parse_fill_table_file(file_path: impl AsRef<Path>) -> Result<FillTable> {
    parse_document(file_path.as_ref(), "fill table")
}
