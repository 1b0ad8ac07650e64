//! condition evaluation system for dashboard visibility rules
//!
//! provides the condition tree supporting:
//! - logical operators: and, or (empty lists fail closed)
//! - state equality/inequality against the entity snapshot
//! - numeric range checks with exclusive bounds
//! - viewport media-query checks via the media-query registry
//!
//! conditions appear in section/item `visibility` arrays and in per-section
//! item visibility templates.

mod eval;
mod parser;
mod template;
mod types;

pub use eval::{evaluate, evaluate_for, EvalContext};
pub use parser::{condition_to_value, parse_condition, parse_conditions};
pub use template::{expand_template, ENTITY_PLACEHOLDER};
pub use types::{Condition, NumericStateCondition, ScreenCondition, StateCondition};
