//! item visibility template expansion
//!
//! a section may carry one shared condition template for all items of its
//! list. each item gets its own concrete copy with the entity placeholder
//! substituted; the template itself is never mutated.

use serde_json::Value as JsonValue;

/// sentinel standing for "this item's entity id" inside a template
pub const ENTITY_PLACEHOLDER: &str = "{item.entity_id}";

/// expand a condition template for one item
///
/// returns `None` when the item has no entity id or the template is empty -
/// callers fall back to the item's own visibility. otherwise returns a deep
/// copy of the template with every `entity` field holding the placeholder
/// replaced by the item's entity id. all other fields are copied unchanged.
pub fn expand_template(
    entity_id: Option<&str>,
    template: &[JsonValue],
) -> Option<Vec<JsonValue>> {
    let entity_id = entity_id.filter(|id| !id.is_empty())?;
    if template.is_empty() {
        return None;
    }

    Some(
        template
            .iter()
            .map(|entry| substitute_entity(entry, entity_id))
            .collect(),
    )
}

fn substitute_entity(value: &JsonValue, entity_id: &str) -> JsonValue {
    match value {
        JsonValue::Object(obj) => {
            let mut out = serde_json::Map::with_capacity(obj.len());
            for (key, field) in obj {
                if key == "entity" && field.as_str() == Some(ENTITY_PLACEHOLDER) {
                    out.insert(key.clone(), JsonValue::String(entity_id.to_string()));
                } else {
                    out.insert(key.clone(), substitute_entity(field, entity_id));
                }
            }
            JsonValue::Object(out)
        }
        JsonValue::Array(items) => JsonValue::Array(
            items
                .iter()
                .map(|item| substitute_entity(item, entity_id))
                .collect(),
        ),
        other => other.clone(),
    }
}
