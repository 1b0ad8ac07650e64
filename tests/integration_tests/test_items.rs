// integration tests for item filtering and template expansion

use dashvis::conditions::{expand_template, ENTITY_PLACEHOLDER};
use dashvis::dashboard::{filter_items, items_from_json, sections_from_json};
use serde_json::json;

use crate::common::{make_registry, make_states};

fn list_section(template: serde_json::Value) -> dashvis::dashboard::Section {
    let mut sections = sections_from_json(&format!(
        r#"[ {{ "id": "list", "type": "entities", "item_visibility_template": {} }} ]"#,
        template
    ))
    .unwrap();
    sections.remove(0)
}

/// entity-bound items are filtered through the shared template, one
/// concrete expansion per item
#[test]
fn test_template_applies_per_item() {
    let section = list_section(json!([
        { "condition": "state", "entity": ENTITY_PLACEHOLDER, "state": "on" }
    ]));
    let items = items_from_json(
        r#"[
            { "id": "i1", "entity_id": "light.a" },
            { "id": "i2", "entity_id": "light.b" },
            { "id": "i3", "entity_id": "light.c" }
        ]"#,
    )
    .unwrap();
    let (_viewport, registry) = make_registry(1280, 800);
    let states = make_states(&[("light.a", "on"), ("light.b", "off"), ("light.c", "on")]);

    let out = filter_items(false, &items, &states, Some(&section), &registry);
    let ids: Vec<&str> = out.iter().filter_map(|i| i.id.as_deref()).collect();
    assert_eq!(ids, vec!["i1", "i3"]);
}

/// template entries are OR'd: any one matching entry shows the item
#[test]
fn test_template_entries_or_semantics() {
    let section = list_section(json!([
        { "condition": "state", "entity": ENTITY_PLACEHOLDER, "state": "playing" },
        { "condition": "state", "entity": ENTITY_PLACEHOLDER, "state": "paused" }
    ]));
    let items = items_from_json(
        r#"[
            { "id": "i1", "entity_id": "media.tv" },
            { "id": "i2", "entity_id": "media.radio" }
        ]"#,
    )
    .unwrap();
    let (_viewport, registry) = make_registry(1280, 800);
    let states = make_states(&[("media.tv", "paused"), ("media.radio", "idle")]);

    let out = filter_items(false, &items, &states, Some(&section), &registry);
    let ids: Vec<&str> = out.iter().filter_map(|i| i.id.as_deref()).collect();
    assert_eq!(ids, vec!["i1"]);
}

/// an item's own visibility stacks on top of the template
#[test]
fn test_template_plus_own_visibility() {
    let section = list_section(json!([
        { "condition": "state", "entity": ENTITY_PLACEHOLDER, "state": "on" }
    ]));
    let items = items_from_json(
        r#"[
            {
                "id": "i1",
                "entity_id": "light.a",
                "visibility": [
                    { "condition": "state", "entity": "input_boolean.advanced", "state": "on" }
                ]
            }
        ]"#,
    )
    .unwrap();
    let (_viewport, registry) = make_registry(1280, 800);

    let states = make_states(&[("light.a", "on"), ("input_boolean.advanced", "off")]);
    assert!(filter_items(false, &items, &states, Some(&section), &registry).is_empty());

    let states = make_states(&[("light.a", "on"), ("input_boolean.advanced", "on")]);
    assert_eq!(
        filter_items(false, &items, &states, Some(&section), &registry).len(),
        1
    );
}

/// items without an entity binding skip the template and use their own rule
#[test]
fn test_items_without_entity_skip_template() {
    let section = list_section(json!([
        { "condition": "state", "entity": ENTITY_PLACEHOLDER, "state": "on" }
    ]));
    let items = items_from_json(
        r#"[
            { "id": "plain" },
            {
                "id": "ruled",
                "visibility": [
                    { "condition": "state", "entity": "light.a", "state": "on" }
                ]
            }
        ]"#,
    )
    .unwrap();
    let (_viewport, registry) = make_registry(1280, 800);
    let states = make_states(&[("light.a", "off")]);

    let out = filter_items(false, &items, &states, Some(&section), &registry);
    let ids: Vec<&str> = out.iter().filter_map(|i| i.id.as_deref()).collect();
    assert_eq!(ids, vec!["plain"]);
}

/// the shared template survives expansion for many items unchanged
#[test]
fn test_template_not_mutated_across_expansions() {
    let template = vec![json!({
        "condition": "and",
        "conditions": [
            { "condition": "state", "entity": ENTITY_PLACEHOLDER, "state": "on" },
            { "condition": "numeric_state", "entity": ENTITY_PLACEHOLDER, "above": 0 }
        ]
    })];
    let saved = template.clone();

    for entity_id in ["light.a", "light.b", "sensor.c"] {
        let expanded = expand_template(Some(entity_id), &template).unwrap();
        assert_eq!(expanded[0]["conditions"][0]["entity"], json!(entity_id));
        assert_eq!(expanded[0]["conditions"][1]["entity"], json!(entity_id));
    }

    assert_eq!(template, saved);
}

/// absent item lists produce empty output
#[test]
fn test_empty_item_list() {
    let (_viewport, registry) = make_registry(1280, 800);
    let states = make_states(&[]);

    assert!(filter_items(false, &[], &states, None, &registry).is_empty());
}
