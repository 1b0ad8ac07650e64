//! dashboard section/item model
//!
//! only the fields the visibility engine consults are typed; everything
//! else a section or item carries for rendering is passed through untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::conditions::Condition;

/// section type whose nested sections are filtered individually
pub const HORIZONTAL_STACK: &str = "horizontal-stack";

/// a renderable dashboard block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub section_type: String,
    /// implicit AND over the array; empty/absent means always visible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Vec<Condition>>,
    /// shared per-item condition template, kept as raw JSON so the entity
    /// placeholder survives until expansion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_visibility_template: Option<Vec<JsonValue>>,
    /// nested sections of a stack container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
    /// list items of this section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
    /// render fields opaque to the engine
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

impl Section {
    /// whether this section is a stack container with nested sections
    pub fn is_stack(&self) -> bool {
        self.section_type == HORIZONTAL_STACK && self.sections.is_some()
    }
}

/// an element within a list-like section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// entity binding used for template expansion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// implicit AND over the array; empty/absent means always visible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Vec<Condition>>,
    /// render fields opaque to the engine
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}
