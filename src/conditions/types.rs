//! core types for the condition system

use std::fmt;

/// a state equality/inequality check against one entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateCondition {
    /// entity id to look up
    pub entity: String,
    /// exact-match target; takes priority over `state_not` when both are set
    pub state: Option<String>,
    /// negative-match target
    pub state_not: Option<String>,
}

/// a numeric range check against one entity's parsed state
///
/// bounds are exclusive: with both set the condition reads
/// `above < value < below`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericStateCondition {
    /// entity id to look up
    pub entity: String,
    /// exclusive lower bound
    pub above: Option<f64>,
    /// exclusive upper bound
    pub below: Option<f64>,
}

/// a viewport media-query check, keyed by the owning section/item id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenCondition {
    /// CSS media query string, matched by the viewport backend
    pub media_query: String,
}

/// the condition tree - one node per visibility rule
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// every sub-condition must be true; an empty list fails
    And(Vec<Condition>),
    /// at least one sub-condition must be true; an empty list fails
    Or(Vec<Condition>),
    /// entity state equality/inequality
    State(StateCondition),
    /// entity state numeric range
    NumericState(NumericStateCondition),
    /// viewport media-query match
    Screen(ScreenCondition),
    /// unrecognized or missing tag; always evaluates false
    Unknown {
        /// the tag string as authored, if there was one
        tag: Option<String>,
    },
}

impl Condition {
    /// create an AND condition
    pub fn and(conditions: Vec<Condition>) -> Self {
        Condition::And(conditions)
    }

    /// create an OR condition
    pub fn or(conditions: Vec<Condition>) -> Self {
        Condition::Or(conditions)
    }

    /// create an exact state match
    pub fn state(entity: impl Into<String>, state: impl Into<String>) -> Self {
        Condition::State(StateCondition {
            entity: entity.into(),
            state: Some(state.into()),
            state_not: None,
        })
    }

    /// create a negative state match
    pub fn state_not(entity: impl Into<String>, state_not: impl Into<String>) -> Self {
        Condition::State(StateCondition {
            entity: entity.into(),
            state: None,
            state_not: Some(state_not.into()),
        })
    }

    /// create a numeric range check; either bound may be absent
    pub fn numeric_state(
        entity: impl Into<String>,
        above: Option<f64>,
        below: Option<f64>,
    ) -> Self {
        Condition::NumericState(NumericStateCondition {
            entity: entity.into(),
            above,
            below,
        })
    }

    /// create a screen condition
    pub fn screen(media_query: impl Into<String>) -> Self {
        Condition::Screen(ScreenCondition {
            media_query: media_query.into(),
        })
    }

    /// the tag string this condition would carry in JSON form
    pub fn tag(&self) -> Option<&str> {
        match self {
            Condition::And(_) => Some("and"),
            Condition::Or(_) => Some("or"),
            Condition::State(_) => Some("state"),
            Condition::NumericState(_) => Some("numeric_state"),
            Condition::Screen(_) => Some("screen"),
            Condition::Unknown { tag } => tag.as_deref(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::And(conditions) => {
                write!(f, "and(")?;
                for (i, c) in conditions.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, ")")
            }
            Condition::Or(conditions) => {
                write!(f, "or(")?;
                for (i, c) in conditions.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, ")")
            }
            Condition::State(c) => {
                if let Some(state) = &c.state {
                    write!(f, "{} == \"{}\"", c.entity, state)
                } else if let Some(state_not) = &c.state_not {
                    write!(f, "{} != \"{}\"", c.entity, state_not)
                } else {
                    write!(f, "{} == ?", c.entity)
                }
            }
            Condition::NumericState(c) => match (c.above, c.below) {
                (Some(above), Some(below)) => {
                    write!(f, "{} < {} < {}", above, c.entity, below)
                }
                (Some(above), None) => write!(f, "{} > {}", c.entity, above),
                (None, Some(below)) => write!(f, "{} < {}", c.entity, below),
                (None, None) => write!(f, "{} in ?", c.entity),
            },
            Condition::Screen(c) => write!(f, "screen({})", c.media_query),
            Condition::Unknown { tag } => {
                write!(f, "unknown({})", tag.as_deref().unwrap_or("?"))
            }
        }
    }
}
