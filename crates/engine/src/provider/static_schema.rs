use anyhow::Result;
use dynform_types::{FieldDescriptor, FieldValue};
use tracing::info;

use super::{FillTable, SchemaProvider};

/// Serves a descriptor list and fill table that were loaded once, typically
/// from files.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaProvider {
    descriptors: Vec<FieldDescriptor>,
    fills: FillTable,
}

impl StaticSchemaProvider {
    pub fn new(descriptors: Vec<FieldDescriptor>, fills: FillTable) -> Self {
        Self { descriptors, fills }
    }
}

impl SchemaProvider for StaticSchemaProvider {
    fn descriptors(&self) -> Result<Vec<FieldDescriptor>> {
        Ok(self.descriptors.clone())
    }

    fn fill(&self, callback_name: &str, parameters: &[FieldValue]) -> Result<Vec<FieldValue>> {
        info!(callback = callback_name, parameters = parameters.len(), "invoking fill callback");
        self.fills.resolve(callback_name, parameters)
    }
}
