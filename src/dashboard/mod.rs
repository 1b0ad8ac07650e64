//! dashboard model and visibility filtering

mod schema;
mod visibility;

pub use schema::{Item, Section, HORIZONTAL_STACK};
pub use visibility::{
    filter_items, filter_sections, item_self_visible, section_visible,
};

use anyhow::{Context, Result};

/// parse a dashboard section list from JSON text
pub fn sections_from_json(json: &str) -> Result<Vec<Section>> {
    serde_json::from_str(json).context("Failed to parse dashboard sections")
}

/// parse an item list from JSON text
pub fn items_from_json(json: &str) -> Result<Vec<Item>> {
    serde_json::from_str(json).context("Failed to parse dashboard items")
}
