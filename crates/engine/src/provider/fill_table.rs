//! Fill callback results declared up front.
//!
//! ```yaml
//! callbacks:
//!   osmanagerFill:
//!     - when: { service: kvm }
//!       fill:
//!         - name: osmanager
//!           values: [{ id: linux, text: Linux }, { id: win, text: Windows }]
//!     - when: { service: broken }
//!       error: "service unavailable"
//! ```

use anyhow::{Result, anyhow, bail};
use dynform_types::{FieldPayload, FieldValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillTable {
    #[serde(default)]
    pub callbacks: IndexMap<String, Vec<FillCase>>,
}

/// One candidate answer of a callback. Matches when every `when` entry equals
/// the gathered value of the parameter it names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillCase {
    #[serde(default)]
    pub when: IndexMap<String, String>,
    #[serde(default)]
    pub fill: Vec<FieldValue>,
    /// Simulates a remote failure when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FillCase {
    fn matches(&self, parameters: &[FieldValue]) -> bool {
        self.when.iter().all(|(name, expected)| {
            parameters
                .iter()
                .find(|parameter| &parameter.name == name)
                .is_some_and(|parameter| parameter_text(&parameter.payload) == *expected)
        })
    }
}

/// Multi-valued parameters compare as their ids joined with commas.
fn parameter_text(payload: &FieldPayload) -> String {
    match payload {
        FieldPayload::Text(text) => text.clone(),
        FieldPayload::Choices(items) => items.iter().map(|choice| choice.id.as_str()).collect::<Vec<_>>().join(","),
    }
}

impl FillTable {
    /// Answers `callback_name` with the first matching case.
    ///
    /// # Errors
    ///
    /// Unknown callbacks and matching cases that carry an `error`.
    pub fn resolve(&self, callback_name: &str, parameters: &[FieldValue]) -> Result<Vec<FieldValue>> {
        let cases = self
            .callbacks
            .get(callback_name)
            .ok_or_else(|| anyhow!("unknown fill callback '{callback_name}'"))?;

        let Some(case) = cases.iter().find(|case| case.matches(parameters)) else {
            debug!(callback = callback_name, "no fill case matched; returning no values");
            return Ok(Vec::new());
        };
        if let Some(message) = &case.error {
            bail!("{message}");
        }
        Ok(case.fill.clone())
    }
}
