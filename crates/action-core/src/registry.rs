//! Registry for actions keyed by namespace and event
//!
//! Registration happens once, at startup, before any invocation is
//! dispatched; the registry is immutable afterwards and shared behind an
//! `Arc` by transports. Uniqueness of the `(namespace, event)` pair is
//! enforced at registration time, never at dispatch time.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::action::Action;
use crate::context::Invocation;
use crate::error::{Error, Result};

/// Discovery metadata for one registered action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionInfo {
    /// Namespace path
    pub namespace: String,
    /// Event name
    pub event: String,
    /// Input tuple description
    pub input_schema: Value,
    /// Output tuple description, for actions that acknowledge with values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
}

/// Registry of actions, keyed by `(namespace, event)`.
#[derive(Default)]
pub struct ActionRegistry {
    actions: IndexMap<String, Arc<Action>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn key(namespace: &str, event: &str) -> String {
        format!("{}#{}", namespace, event)
    }

    /// Register an action.
    ///
    /// Fails with [`Error::DuplicateAction`] when an action with the same
    /// namespace and event is already present.
    pub fn register(&mut self, action: Action) -> Result<()> {
        let key = Self::key(action.namespace(), action.event());
        if self.actions.contains_key(&key) {
            return Err(Error::duplicate_action(action.namespace(), action.event()));
        }

        debug!("Registered action '{}'", action.qualified_event());
        self.actions.insert(key, Arc::new(action));
        Ok(())
    }

    /// Look up an action by namespace and event.
    pub fn get(&self, namespace: &str, event: &str) -> Option<Arc<Action>> {
        self.actions.get(&Self::key(namespace, event)).cloned()
    }

    /// Whether an action is registered for the namespace and event.
    pub fn has_action(&self, namespace: &str, event: &str) -> bool {
        self.actions.contains_key(&Self::key(namespace, event))
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Dispatch an invocation to the action registered for the namespace
    /// and event.
    ///
    /// Fails with [`Error::ActionNotFound`] when nothing is registered for
    /// the pair; any other failure comes from the action's own pipeline.
    pub async fn dispatch(
        &self,
        namespace: &str,
        event: &str,
        invocation: Invocation,
    ) -> Result<()> {
        let action = self
            .get(namespace, event)
            .ok_or_else(|| Error::not_found(namespace, event))?;
        action.execute(invocation).await
    }

    /// List registered actions in registration order.
    pub fn list(&self) -> Vec<ActionInfo> {
        self.actions
            .values()
            .map(|action| ActionInfo {
                namespace: action.namespace().to_string(),
                event: action.event().to_string(),
                input_schema: action.describe_input(),
                output_schema: action.describe_output(),
            })
            .collect()
    }
}
