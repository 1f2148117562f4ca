//! Dependency callback broker.
//!
//! A user change on a trigger editor snapshots the trigger's parameter
//! fields into a [`FillRequest`]. The host resolves the request against a
//! [`SchemaProvider`], either inline ([`FormContainer::trigger_dependency`])
//! or off the UI loop, and hands the result back to
//! [`FormContainer::complete_fill`].
//!
//! Each trigger moves `Idle -> AwaitingRemote -> Idle`. Every request is
//! stamped with a per-trigger generation; issuing a new request for the same
//! trigger supersedes the old one, whose completion is then discarded.
//!
//! Writes applied by a completion may hit fields that are triggers
//! themselves. Those fire in turn, but each trigger fires at most once per
//! user change, which stops circular declarations from looping.

use std::collections::{BTreeSet, HashMap, VecDeque};

use dynform_types::FieldValue;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::{
    editor::EditorInstance,
    error::{DependencyFailure, FormError},
    form::FormContainer,
    provider::SchemaProvider,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrokerState {
    #[default]
    Idle,
    AwaitingRemote {
        generation: u64,
    },
}

/// Per-trigger broker state of one form.
#[derive(Debug, Default)]
pub struct DependencyBroker {
    states: HashMap<String, BrokerState>,
    generations: HashMap<String, u64>,
}

impl DependencyBroker {
    pub fn state(&self, trigger: &str) -> BrokerState {
        self.states.get(trigger).copied().unwrap_or_default()
    }

    /// Number of triggers waiting on a remote answer.
    pub fn pending(&self) -> usize {
        self.states.values().filter(|state| matches!(state, BrokerState::AwaitingRemote { .. })).count()
    }

    fn issue(&mut self, trigger: &str) -> u64 {
        let generation = self.generations.entry(trigger.to_string()).or_default();
        *generation += 1;
        let generation = *generation;
        self.states.insert(trigger.to_string(), BrokerState::AwaitingRemote { generation });
        generation
    }

    /// Returns the trigger to `Idle` when `generation` is the live one.
    fn settle(&mut self, trigger: &str, generation: u64) -> bool {
        if self.state(trigger) != (BrokerState::AwaitingRemote { generation }) {
            return false;
        }
        self.states.insert(trigger.to_string(), BrokerState::Idle);
        true
    }
}

/// A fill callback waiting to be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillRequest {
    pub trigger: String,
    pub callback_name: String,
    /// Parameter values gathered without validation, in declaration order.
    pub parameters: Vec<FieldValue>,
    pub generation: u64,
    // Triggers already fired for the originating user change.
    visited: BTreeSet<String>,
}

/// Result of [`FormContainer::complete_fill`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillOutcome {
    Applied {
        /// Fields that were written, in response order.
        updated: Vec<String>,
        /// Follow-up requests for written fields that are triggers themselves.
        cascade: Vec<FillRequest>,
    },
    /// A newer request for the same trigger exists; nothing was applied.
    Stale,
}

impl FormContainer {
    /// Snapshots the trigger's parameters and moves it to `AwaitingRemote`.
    pub(crate) fn begin_fill(&mut self, trigger: &str, mut visited: BTreeSet<String>) -> Result<FillRequest, FormError> {
        let editor = self
            .editors
            .get(trigger)
            .ok_or_else(|| FormError::configuration(trigger, "no such field in this form"))?;
        let dependency = editor
            .dependency()
            .ok_or_else(|| FormError::configuration(trigger, "field does not declare a dependency callback"))?;

        let parameters = dependency
            .parameters
            .iter()
            .map(|name| {
                self.editors
                    .get(name)
                    .ok_or_else(|| FormError::configuration(trigger, format!("unknown parameter field '{name}'")))?
                    .extract(false)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let callback_name = dependency.callback_name.clone();

        visited.insert(trigger.to_string());
        let generation = self.broker.issue(trigger);
        debug!(trigger, callback = %callback_name, generation, "dependency callback requested");
        Ok(FillRequest {
            trigger: trigger.to_string(),
            callback_name,
            parameters,
            generation,
            visited,
        })
    }

    /// Applies the provider's answer to `request`.
    ///
    /// The trigger returns to `Idle` whatever the result. Writes are
    /// all-or-nothing: they run on copies of the targets, and live editors
    /// only change once every write succeeded.
    ///
    /// # Errors
    ///
    /// [`FormError::Dependency`] when the callback failed, named a field the
    /// form does not have, or returned a value a target refused. No field is
    /// modified in that case.
    pub fn complete_fill(&mut self, request: FillRequest, result: anyhow::Result<Vec<FieldValue>>) -> Result<FillOutcome, FormError> {
        if !self.broker.settle(&request.trigger, request.generation) {
            warn!(
                trigger = %request.trigger,
                generation = request.generation,
                "discarding stale dependency response"
            );
            return Ok(FillOutcome::Stale);
        }

        let failure = |field: Option<&str>, message: String| {
            FormError::Dependency(DependencyFailure {
                trigger: request.trigger.clone(),
                callback: request.callback_name.clone(),
                field: field.map(str::to_string),
                message,
            })
        };

        let values = result.map_err(|error| failure(None, format!("{error:#}")))?;

        let mut staged: IndexMap<String, EditorInstance> = IndexMap::new();
        for value in &values {
            if !staged.contains_key(&value.name) {
                let live = self
                    .editors
                    .get(&value.name)
                    .ok_or_else(|| failure(Some(&value.name), "callback returned a value for a field the form does not have".into()))?;
                staged.insert(value.name.clone(), live.clone());
            }
            if let Some(editor) = staged.get_mut(&value.name) {
                editor.write(&value.payload).map_err(|error| failure(Some(&value.name), error.to_string()))?;
            }
        }

        let mut updated = Vec::with_capacity(staged.len());
        let mut changed = Vec::new();
        for (name, editor) in staged {
            if let Some(live) = self.editors.get_mut(&name) {
                if live.is_trigger() && live.extract(false).ok() != editor.extract(false).ok() {
                    changed.push(name.clone());
                }
                *live = editor;
            }
            updated.push(name);
        }
        info!(
            trigger = %request.trigger,
            callback = %request.callback_name,
            updated = updated.len(),
            "dependency fill applied"
        );

        let mut cascade: Vec<FillRequest> = Vec::new();
        for name in changed {
            if request.visited.contains(&name) {
                warn!(trigger = %name, origin = %request.trigger, "dependency cycle detected; not firing trigger again");
                continue;
            }
            match self.begin_fill(&name, request.visited.clone()) {
                Ok(next) => cascade.push(next),
                Err(error) => {
                    for issued in &cascade {
                        self.abandon_fill(issued);
                    }
                    return Err(error);
                }
            }
        }
        Ok(FillOutcome::Applied { updated, cascade })
    }

    /// Returns the request's trigger to `Idle` without applying anything.
    ///
    /// For hosts that drop a request instead of resolving it. Does nothing
    /// when a newer request for the trigger is live.
    pub fn abandon_fill(&mut self, request: &FillRequest) {
        if self.broker.settle(&request.trigger, request.generation) {
            debug!(trigger = %request.trigger, generation = request.generation, "dependency request abandoned");
        }
    }

    /// Fires the named trigger's callback and resolves it, and any cascade
    /// it causes, by calling `provider` inline.
    ///
    /// Returns the names of every field written, in application order.
    /// Each fill is atomic; a failure part way through a cascade keeps the
    /// fills that already landed. Requests queued beside a failed one are
    /// still resolved, so every trigger ends `Idle`, and the first failure
    /// is returned.
    pub fn trigger_dependency(&mut self, trigger: &str, provider: &dyn SchemaProvider) -> Result<Vec<String>, FormError> {
        let mut queue = VecDeque::from([self.begin_fill(trigger, BTreeSet::new())?]);
        let mut written = Vec::new();
        let mut first_error = None;
        while let Some(request) = queue.pop_front() {
            let result = provider.fill(&request.callback_name, &request.parameters);
            match self.complete_fill(request, result) {
                Ok(FillOutcome::Applied { updated, cascade }) => {
                    written.extend(updated);
                    queue.extend(cascade);
                }
                Ok(FillOutcome::Stale) => {}
                Err(error) => {
                    first_error.get_or_insert(error);
                }
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(written),
        }
    }
}
