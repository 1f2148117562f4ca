//! Boundary contracts between the engine and the outside world.
//!
//! Modules:
//! - `fill_table`: declarative fill callback results loaded from a file
//! - `static_schema`: provider serving a fixed descriptor list and fill table
//! - `sink`: value sink that keeps whatever it receives
//! - `null`: no-op provider for tests and disabled scenarios

mod fill_table;
mod null;
mod sink;
mod static_schema;

use std::sync::Arc;

use anyhow::Result;
use dynform_types::{FieldDescriptor, FieldValue};

use crate::error::ValidationError;

pub use fill_table::{FillCase, FillTable};
pub use null::NullSchemaProvider;
pub use sink::CollectingSink;
pub use static_schema::StaticSchemaProvider;

/// Supplies a form's descriptors and answers its fill callbacks.
///
/// Both calls either succeed or fail as a whole; transport concerns (retries,
/// authentication) live behind the implementation.
pub trait SchemaProvider: Send + Sync {
    /// Ordered field descriptors for one form-open operation.
    fn descriptors(&self) -> Result<Vec<FieldDescriptor>>;

    /// Invokes the named fill callback with the gathered parameter values and
    /// returns replacement values keyed by target field name.
    fn fill(&self, callback_name: &str, parameters: &[FieldValue]) -> Result<Vec<FieldValue>>;
}

impl<T: SchemaProvider + ?Sized> SchemaProvider for Arc<T> {
    fn descriptors(&self) -> Result<Vec<FieldDescriptor>> {
        (**self).descriptors()
    }

    fn fill(&self, callback_name: &str, parameters: &[FieldValue]) -> Result<Vec<FieldValue>> {
        (**self).fill(callback_name, parameters)
    }
}

/// Receives the outcome of a submit: the full ordered value list, or the
/// validation failure the host has to present.
pub trait ValueSink {
    fn accept(&mut self, values: &[FieldValue]) -> Result<()>;

    fn reject(&mut self, error: &ValidationError);
}
