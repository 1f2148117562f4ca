use anyhow::Result;
use dynform_types::FieldValue;

use super::ValueSink;
use crate::error::ValidationError;

/// Sink that records the last accepted value list and every rejection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub accepted: Option<Vec<FieldValue>>,
    pub rejected: Vec<ValidationError>,
}

impl ValueSink for CollectingSink {
    fn accept(&mut self, values: &[FieldValue]) -> Result<()> {
        self.accepted = Some(values.to_vec());
        Ok(())
    }

    fn reject(&mut self, error: &ValidationError) {
        self.rejected.push(error.clone());
    }
}
