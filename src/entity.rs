//! entity state snapshot
//!
//! the entity-state source is external; the engine only reads it. states are
//! refreshed by the caller and passed into every filter/evaluation pass.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// current state record for one entity
///
/// `state` is always text; numeric sensor values arrive as their decimal
/// string form (e.g. `"21.5"`) and are parsed on demand by numeric
/// conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityState {
    pub state: String,
    /// remaining fields of the state record (attributes, timestamps, ...)
    /// are opaque to the engine and passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

impl EntityState {
    /// create a state record with no extra fields
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// lookup from entity id to its current state, externally owned
pub type EntityStates = HashMap<String, EntityState>;
