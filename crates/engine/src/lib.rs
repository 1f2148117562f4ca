//! # Dynform Engine
//!
//! Turns a server-supplied, declarative form description (an ordered list of
//! typed [`FieldDescriptor`]s) into live editors, reads edited values back
//! in the same wire format, validates required fields, and runs the
//! dependency callbacks that let one field repopulate others.
//!
//! ## Usage
//!
//! ```rust
//! use dynform_engine::{FormContainer, extract_all, render};
//! use dynform_types::{FieldDescriptor, FieldValue, FormSettings};
//!
//! let mut host = FieldDescriptor::new("host", "text");
//! host.gui.required = true;
//! let descriptors = vec![host];
//!
//! let mut container = FormContainer::new(FormSettings::default());
//! render(&mut container, &descriptors, &[FieldValue::text("host", "uds1")])?;
//! let values = extract_all(&container, &descriptors)?;
//! assert_eq!(values, vec![FieldValue::text("host", "uds1")]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`registry`**: static table of per-kind behaviors (`construct`,
//!   `extract`, `write`, `select`, `measure`)
//! - **`kinds`**: editor state and behavior of each field kind
//! - **`editor`**: editor instances bound to their descriptor
//! - **`form`**: rendering, extraction/validation, size accumulation
//! - **`dependency`**: the fill callback broker
//! - **`provider`**: schema provider and value sink contracts
//! - **`schema`**: loading descriptions, values and fill tables from files

pub mod dependency;
pub mod editor;
pub mod error;
pub mod form;
pub mod kinds;
pub mod provider;
pub mod registry;
pub mod schema;

pub use dependency::{BrokerState, DependencyBroker, FillOutcome, FillRequest};
pub use dynform_types::{Choice, FieldDependency, FieldDescriptor, FieldKind, FieldPayload, FieldValue, FormSettings, Size};
pub use editor::{EditorInstance, EditorState};
pub use error::{DependencyFailure, FormError, ValidationError, ValidationReason};
pub use form::{FieldLabel, FormContainer, FormRow, SizeAccumulator, SubmitOutcome, extract_all, render, submit};
pub use provider::{CollectingSink, FillCase, FillTable, NullSchemaProvider, SchemaProvider, StaticSchemaProvider, ValueSink};
pub use registry::{FieldBehavior, behavior_for};
pub use schema::{FormSchema, parse_fill_table_file, parse_schema_file, parse_values_file};
