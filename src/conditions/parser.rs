//! condition parser - converts JSON to condition AST
//!
//! parsing never fails: a node with a missing or unrecognized `condition`
//! tag becomes [`Condition::Unknown`], which evaluates to false. visibility
//! defaults to hidden on any ambiguity, so malformed rules hide rather than
//! error. fields belonging to other tags are ignored.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use tracing::warn;

use super::types::{Condition, NumericStateCondition, ScreenCondition, StateCondition};

/// parse a JSON value into a condition AST
///
/// dispatches on the `condition` tag field. anything that is not an object
/// with a known tag parses to [`Condition::Unknown`].
pub fn parse_condition(json: &JsonValue) -> Condition {
    let Some(obj) = json.as_object() else {
        return Condition::Unknown { tag: None };
    };

    match obj.get("condition").and_then(JsonValue::as_str) {
        Some("and") => Condition::And(parse_sub_conditions(obj)),
        Some("or") => Condition::Or(parse_sub_conditions(obj)),
        Some("state") => Condition::State(StateCondition {
            entity: string_field(obj, "entity"),
            state: optional_string_field(obj, "state"),
            state_not: optional_string_field(obj, "state_not"),
        }),
        Some("numeric_state") => Condition::NumericState(NumericStateCondition {
            entity: string_field(obj, "entity"),
            above: number_field(obj, "above"),
            below: number_field(obj, "below"),
        }),
        Some("screen") => Condition::Screen(ScreenCondition {
            media_query: string_field(obj, "media_query"),
        }),
        tag => {
            warn!(tag = tag.unwrap_or("<missing>"), "unknown condition tag");
            Condition::Unknown {
                tag: tag.map(str::to_string),
            }
        }
    }
}

/// parse a visibility array into a condition list
pub fn parse_conditions(values: &[JsonValue]) -> Vec<Condition> {
    values.iter().map(parse_condition).collect()
}

/// serialize a condition back into its tagged JSON form
pub fn condition_to_value(condition: &Condition) -> JsonValue {
    match condition {
        Condition::And(conditions) => json!({
            "condition": "and",
            "conditions": conditions.iter().map(condition_to_value).collect::<Vec<_>>(),
        }),
        Condition::Or(conditions) => json!({
            "condition": "or",
            "conditions": conditions.iter().map(condition_to_value).collect::<Vec<_>>(),
        }),
        Condition::State(c) => {
            let mut obj = Map::new();
            obj.insert("condition".to_string(), json!("state"));
            obj.insert("entity".to_string(), json!(c.entity));
            if let Some(state) = &c.state {
                obj.insert("state".to_string(), json!(state));
            }
            if let Some(state_not) = &c.state_not {
                obj.insert("state_not".to_string(), json!(state_not));
            }
            JsonValue::Object(obj)
        }
        Condition::NumericState(c) => {
            let mut obj = Map::new();
            obj.insert("condition".to_string(), json!("numeric_state"));
            obj.insert("entity".to_string(), json!(c.entity));
            if let Some(above) = c.above {
                obj.insert("above".to_string(), json!(above));
            }
            if let Some(below) = c.below {
                obj.insert("below".to_string(), json!(below));
            }
            JsonValue::Object(obj)
        }
        Condition::Screen(c) => json!({
            "condition": "screen",
            "media_query": c.media_query,
        }),
        Condition::Unknown { tag } => match tag {
            Some(tag) => json!({ "condition": tag }),
            None => JsonValue::Object(Map::new()),
        },
    }
}

fn parse_sub_conditions(obj: &Map<String, JsonValue>) -> Vec<Condition> {
    // absent or non-array `conditions` yields an empty list, which the
    // evaluator fails closed
    obj.get("conditions")
        .and_then(JsonValue::as_array)
        .map(|arr| parse_conditions(arr))
        .unwrap_or_default()
}

fn string_field(obj: &Map<String, JsonValue>, key: &str) -> String {
    obj.get(key)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}

fn optional_string_field(obj: &Map<String, JsonValue>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(JsonValue::as_str)
        .map(str::to_string)
}

fn number_field(obj: &Map<String, JsonValue>, key: &str) -> Option<f64> {
    obj.get(key).and_then(JsonValue::as_f64)
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        Ok(parse_condition(&value))
    }
}

impl Serialize for Condition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        condition_to_value(self).serialize(serializer)
    }
}
