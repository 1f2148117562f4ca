use anyhow::Result;
use dynform_types::{FieldDescriptor, FieldValue};

use super::SchemaProvider;

/// Provider with no fields whose callbacks never fill anything.
pub struct NullSchemaProvider;

impl SchemaProvider for NullSchemaProvider {
    fn descriptors(&self) -> Result<Vec<FieldDescriptor>> {
        Ok(Vec::new())
    }

    fn fill(&self, _callback_name: &str, _parameters: &[FieldValue]) -> Result<Vec<FieldValue>> {
        Ok(Vec::new())
    }
}
