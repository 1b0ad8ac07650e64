//! section and item visibility filters
//!
//! the two callers of the condition evaluator. both run on every
//! re-evaluation pass (state change, viewport flip, edit-mode toggle) and
//! return fresh filtered copies; the input lists are never mutated.

use tracing::debug;

use super::schema::{Item, Section};
use crate::conditions::{evaluate, expand_template, parse_condition, Condition, EvalContext};
use crate::entity::EntityStates;
use crate::screen::MediaQueryRegistry;

/// filter top-level sections by their visibility rules
///
/// a kept `horizontal-stack` has its nested sections filtered by the same
/// rule; a stack whose nested sections are all hidden is itself hidden.
/// surviving sections keep their input order.
pub fn filter_sections(
    edit_mode: bool,
    sections: &[Section],
    states: &EntityStates,
    registry: &MediaQueryRegistry,
) -> Vec<Section> {
    let mut visible = Vec::new();

    for section in sections {
        if !section_visible(edit_mode, states, section, registry) {
            debug!(id = section.id.as_deref().unwrap_or(""), "section hidden");
            continue;
        }

        if section.is_stack() {
            let nested = section.sections.as_deref().unwrap_or(&[]);
            let stack: Vec<Section> = nested
                .iter()
                .filter(|n| section_visible(edit_mode, states, n, registry))
                .cloned()
                .collect();

            // a stack with zero visible members is itself invisible
            if stack.is_empty() {
                continue;
            }
            let mut section = section.clone();
            section.sections = Some(stack);
            visible.push(section);
        } else {
            visible.push(section.clone());
        }
    }

    visible
}

/// filter the items of a list section
///
/// when the owning section defines an item visibility template and the item
/// is entity-bound, the expanded template entries are OR'd - one matching
/// entry shows the item - and any item-level visibility must pass on top.
/// without an applicable template the item's own visibility decides.
pub fn filter_items(
    edit_mode: bool,
    items: &[Item],
    states: &EntityStates,
    section: Option<&Section>,
    registry: &MediaQueryRegistry,
) -> Vec<Item> {
    items
        .iter()
        .filter(|item| item_visible(edit_mode, states, item, section, registry))
        .cloned()
        .collect()
}

/// check a section's own visibility rule (implicit AND, default visible)
pub fn section_visible(
    edit_mode: bool,
    states: &EntityStates,
    section: &Section,
    registry: &MediaQueryRegistry,
) -> bool {
    // absence of a rule means "always show"
    let Some(visibility) = &section.visibility else {
        return true;
    };

    let ctx = EvalContext::new(edit_mode, states, registry).with_owner(section.id.as_deref());
    all_pass(visibility, &ctx)
}

/// check an item's own visibility rule (implicit AND, default visible)
pub fn item_self_visible(
    edit_mode: bool,
    states: &EntityStates,
    item: &Item,
    registry: &MediaQueryRegistry,
) -> bool {
    let Some(visibility) = &item.visibility else {
        return true;
    };

    let ctx = EvalContext::new(edit_mode, states, registry).with_owner(item.id.as_deref());
    all_pass(visibility, &ctx)
}

fn item_visible(
    edit_mode: bool,
    states: &EntityStates,
    item: &Item,
    section: Option<&Section>,
    registry: &MediaQueryRegistry,
) -> bool {
    let template = section.and_then(|s| s.item_visibility_template.as_deref());
    if let Some(template) = template {
        if let Some(expanded) = expand_template(item.entity_id.as_deref(), template) {
            let ctx =
                EvalContext::new(edit_mode, states, registry).with_owner(item.id.as_deref());

            // template entries are OR'd, unlike the implicit AND of a
            // visibility array
            let mut meets_template = false;
            for entry in &expanded {
                let condition = parse_condition(entry);
                if evaluate(&condition, &ctx) {
                    meets_template = true;
                }
            }

            // an item-level rule stacks on top of the template
            if item.visibility.is_some() {
                return meets_template && item_self_visible(edit_mode, states, item, registry);
            }
            return meets_template;
        }
    }

    item_self_visible(edit_mode, states, item, registry)
}

/// implicit AND over a visibility array; empty arrays pass
///
/// every entry is evaluated so screen conditions keep their registry
/// entries fresh across passes.
fn all_pass(conditions: &[Condition], ctx: &EvalContext) -> bool {
    let mut all = true;
    for condition in conditions {
        if !evaluate(condition, ctx) {
            all = false;
        }
    }
    all
}
