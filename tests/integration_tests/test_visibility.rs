// integration tests for section filtering over a full dashboard document

use dashvis::dashboard::{filter_sections, sections_from_json};

use crate::common::{make_registry, make_states};

const DASHBOARD: &str = r#"[
    {
        "id": "header",
        "type": "grid",
        "title": "Home"
    },
    {
        "id": "climate",
        "type": "grid",
        "visibility": [
            { "condition": "state", "entity": "input_boolean.show_climate", "state": "on" }
        ]
    },
    {
        "id": "stack",
        "type": "horizontal-stack",
        "sections": [
            {
                "id": "lights",
                "type": "grid",
                "visibility": [
                    { "condition": "state", "entity": "light.any", "state_not": "off" }
                ]
            },
            {
                "id": "power",
                "type": "grid",
                "visibility": [
                    { "condition": "numeric_state", "entity": "sensor.power", "above": 100 }
                ]
            }
        ]
    }
]"#;

/// sections without visibility are always shown; conditional ones follow
/// the entity snapshot
#[test]
fn test_filter_sections_from_json() {
    let sections = sections_from_json(DASHBOARD).unwrap();
    let (_viewport, registry) = make_registry(1280, 800);
    let states = make_states(&[
        ("input_boolean.show_climate", "on"),
        ("light.any", "on"),
        ("sensor.power", "50"),
    ]);

    let out = filter_sections(false, &sections, &states, &registry);
    let ids: Vec<&str> = out.iter().filter_map(|s| s.id.as_deref()).collect();
    assert_eq!(ids, vec!["header", "climate", "stack"]);

    // the stack shrank to its passing member
    let nested = out[2].sections.as_ref().unwrap();
    assert_eq!(nested.len(), 1);
    assert_eq!(nested[0].id.as_deref(), Some("lights"));
}

/// a stack whose members are all hidden disappears entirely
#[test]
fn test_stack_disappears_when_all_members_hidden() {
    let sections = sections_from_json(DASHBOARD).unwrap();
    let (_viewport, registry) = make_registry(1280, 800);
    let states = make_states(&[
        ("input_boolean.show_climate", "off"),
        ("light.any", "off"),
        ("sensor.power", "50"),
    ]);

    let out = filter_sections(false, &sections, &states, &registry);
    let ids: Vec<&str> = out.iter().filter_map(|s| s.id.as_deref()).collect();
    assert_eq!(ids, vec!["header"]);
}

/// render fields the engine does not understand survive filtering
#[test]
fn test_opaque_fields_pass_through() {
    let sections = sections_from_json(DASHBOARD).unwrap();
    let (_viewport, registry) = make_registry(1280, 800);
    let states = make_states(&[]);

    let out = filter_sections(false, &sections, &states, &registry);
    let header = &out[0];
    assert_eq!(
        header.extra.get("title").and_then(|v| v.as_str()),
        Some("Home")
    );
}

/// the input list is not consumed or reordered; re-filtering with a changed
/// snapshot flips outcomes
#[test]
fn test_refilter_after_state_change() {
    let sections = sections_from_json(DASHBOARD).unwrap();
    let (_viewport, registry) = make_registry(1280, 800);

    let states = make_states(&[("input_boolean.show_climate", "off")]);
    let out = filter_sections(false, &sections, &states, &registry);
    assert!(!out.iter().any(|s| s.id.as_deref() == Some("climate")));

    let states = make_states(&[("input_boolean.show_climate", "on")]);
    let out = filter_sections(false, &sections, &states, &registry);
    assert!(out.iter().any(|s| s.id.as_deref() == Some("climate")));
}

/// malformed conditions hide their section but never error
#[test]
fn test_malformed_condition_hides_section() {
    let sections = sections_from_json(
        r#"[
            { "id": "a", "type": "grid", "visibility": [ { "condition": "sun" } ] },
            { "id": "b", "type": "grid", "visibility": [] }
        ]"#,
    )
    .unwrap();
    let (_viewport, registry) = make_registry(1280, 800);
    let states = make_states(&[]);

    let out = filter_sections(false, &sections, &states, &registry);
    let ids: Vec<&str> = out.iter().filter_map(|s| s.id.as_deref()).collect();
    // empty visibility array still means visible
    assert_eq!(ids, vec!["b"]);
}
