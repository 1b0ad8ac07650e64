//! condition evaluator
//!
//! evaluates a condition tree against the current entity-state snapshot.
//! pure except for screen conditions, which register themselves with the
//! media-query registry as a side effect.

use tracing::debug;

use super::types::{Condition, NumericStateCondition, ScreenCondition, StateCondition};
use crate::entity::EntityStates;
use crate::screen::MediaQueryRegistry;

/// context for evaluating conditions
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    /// edit-mode flag, externally owned; switches screen conditions to
    /// stateless probing
    pub edit_mode: bool,
    /// entity-state snapshot, externally owned and read-only
    pub states: &'a EntityStates,
    /// id of the section/item this evaluation runs for; keys screen
    /// condition registry entries
    pub owner_id: Option<&'a str>,
    /// media-query registry shared across all evaluations
    pub registry: &'a MediaQueryRegistry,
}

impl<'a> EvalContext<'a> {
    /// create a new evaluation context with no owner
    pub fn new(
        edit_mode: bool,
        states: &'a EntityStates,
        registry: &'a MediaQueryRegistry,
    ) -> Self {
        Self {
            edit_mode,
            states,
            owner_id: None,
            registry,
        }
    }

    /// set the owning section/item id
    pub fn with_owner(mut self, id: Option<&'a str>) -> Self {
        self.owner_id = id;
        self
    }
}

/// evaluate a condition against the given context
///
/// never errors: malformed or unresolvable conditions evaluate to false.
pub fn evaluate(condition: &Condition, ctx: &EvalContext) -> bool {
    match condition {
        Condition::And(conditions) => evaluate_and(conditions, ctx),
        Condition::Or(conditions) => evaluate_or(conditions, ctx),
        Condition::State(c) => evaluate_state(c, ctx.states),
        Condition::NumericState(c) => evaluate_numeric_state(c, ctx.states),
        Condition::Screen(c) => evaluate_screen(c, ctx),
        Condition::Unknown { tag } => {
            debug!(tag = tag.as_deref().unwrap_or("<missing>"), "unknown condition fails closed");
            false
        }
    }
}

/// convenience entry point matching the caller-facing contract: evaluate one
/// condition for the section/item with the given id
pub fn evaluate_for(
    edit_mode: bool,
    states: &EntityStates,
    registry: &MediaQueryRegistry,
    owner_id: Option<&str>,
    condition: &Condition,
) -> bool {
    let ctx = EvalContext::new(edit_mode, states, registry).with_owner(owner_id);
    evaluate(condition, &ctx)
}

fn evaluate_and(conditions: &[Condition], ctx: &EvalContext) -> bool {
    // empty AND fails closed, deliberately not the vacuous-truth identity
    if conditions.is_empty() {
        return false;
    }

    // every clause runs, left to right, so screen clauses keep their
    // registry entries fresh even after an earlier clause has failed
    let mut all = true;
    for condition in conditions {
        if !evaluate(condition, ctx) {
            all = false;
        }
    }
    all
}

fn evaluate_or(conditions: &[Condition], ctx: &EvalContext) -> bool {
    // empty OR fails closed
    if conditions.is_empty() {
        return false;
    }

    let mut any = false;
    for condition in conditions {
        if evaluate(condition, ctx) {
            any = true;
        }
    }
    any
}

fn evaluate_state(c: &StateCondition, states: &EntityStates) -> bool {
    if c.entity.is_empty() {
        return false;
    }
    let Some(entity) = states.get(&c.entity) else {
        return false;
    };

    // `state` wins over `state_not`; an empty target string counts as unset
    if let Some(expected) = c.state.as_deref().filter(|s| !s.is_empty()) {
        entity.state == expected
    } else if let Some(rejected) = c.state_not.as_deref().filter(|s| !s.is_empty()) {
        entity.state != rejected
    } else {
        false
    }
}

fn evaluate_numeric_state(c: &NumericStateCondition, states: &EntityStates) -> bool {
    if c.entity.is_empty() {
        return false;
    }
    let Some(entity) = states.get(&c.entity) else {
        return false;
    };

    let Ok(value) = entity.state.trim().parse::<f64>() else {
        return false;
    };
    if !value.is_finite() {
        return false;
    }

    match (c.above, c.below) {
        // exclusive on both ends
        (Some(above), Some(below)) => above < value && value < below,
        (Some(above), None) => value > above,
        (None, Some(below)) => value < below,
        (None, None) => false,
    }
}

fn evaluate_screen(c: &ScreenCondition, ctx: &EvalContext) -> bool {
    let Some(id) = ctx.owner_id.filter(|id| !id.is_empty()) else {
        debug!("screen condition without an owning id fails closed");
        return false;
    };
    if c.media_query.is_empty() {
        return false;
    }

    ctx.registry.evaluate(ctx.edit_mode, id, &c.media_query)
}
