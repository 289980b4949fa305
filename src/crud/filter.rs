//! List filters parsed from a query-string map against a schema.
//!
//! Keys are interpreted as:
//! - `field=v` on a filterable field: equality
//! - `field__gte=v` / `field__lte=v` on a filterable field: inclusive range bound
//! - `field=v` on a searchable-only field: case-insensitive substring
//! - `search=v`: substring across every searchable field
//!
//! Anything else is ignored so callers stay decoupled from schema changes.

use crate::crud::Schema;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

pub const SEARCH_KEY: &str = "search";
const GTE_SUFFIX: &str = "__gte";
const LTE_SUFFIX: &str = "__lte";

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Condition {
    Eq { field: String, value: String },
    Gte { field: String, value: String },
    Lte { field: String, value: String },
    Contains { field: String, needle: String },
    Search { fields: Vec<String>, needle: String },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListFilters {
    conditions: Vec<Condition>,
}

impl ListFilters {
    pub fn from_query(schema: &Schema, query: &HashMap<String, String>) -> Self {
        let mut conditions = Vec::new();
        for (key, value) in query {
            match classify(schema, key, value) {
                Some(cond) => conditions.push(cond),
                None => tracing::debug!(model = %schema.name, key = %key, "ignoring filter key"),
            }
        }
        // HashMap order is arbitrary; keep evaluation order stable.
        conditions.sort();
        Self { conditions }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// True when `record` satisfies every condition.
    pub fn matches(&self, record: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}

fn classify(schema: &Schema, key: &str, value: &str) -> Option<Condition> {
    if schema.is_filterable(key) {
        return Some(Condition::Eq {
            field: key.to_string(),
            value: value.to_string(),
        });
    }
    if schema.is_searchable(key) {
        return Some(Condition::Contains {
            field: key.to_string(),
            needle: value.to_lowercase(),
        });
    }
    if let Some(field) = key.strip_suffix(GTE_SUFFIX).filter(|f| schema.is_filterable(f)) {
        return Some(Condition::Gte {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    if let Some(field) = key.strip_suffix(LTE_SUFFIX).filter(|f| schema.is_filterable(f)) {
        return Some(Condition::Lte {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    if key == SEARCH_KEY && !schema.searchable.is_empty() && !value.trim().is_empty() {
        return Some(Condition::Search {
            fields: schema.searchable.clone(),
            needle: value.trim().to_lowercase(),
        });
    }
    None
}

impl Condition {
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Condition::Eq { field, value } => match record.get(field) {
                Some(Value::Bool(b)) => value.eq_ignore_ascii_case(if *b { "true" } else { "false" }),
                Some(Value::Number(n)) => match (n.as_f64(), value.trim().parse::<f64>()) {
                    (Some(lhs), Ok(rhs)) => lhs == rhs,
                    _ => n.to_string() == *value,
                },
                Some(v) => scalar_text(v).is_some_and(|t| t == *value),
                None => false,
            },
            Condition::Gte { field, value } => {
                compare(record.get(field), value).is_some_and(|o| o != Ordering::Less)
            }
            Condition::Lte { field, value } => {
                compare(record.get(field), value).is_some_and(|o| o != Ordering::Greater)
            }
            Condition::Contains { field, needle } => contains(record.get(field), needle),
            Condition::Search { fields, needle } => {
                fields.iter().any(|f| contains(record.get(f), needle))
            }
        }
    }
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn contains(v: Option<&Value>, needle: &str) -> bool {
    v.and_then(scalar_text)
        .is_some_and(|t| t.to_lowercase().contains(needle))
}

/// Numeric when both sides parse as numbers, lexicographic otherwise.
fn compare(v: Option<&Value>, bound: &str) -> Option<Ordering> {
    let v = v?;
    if let (Some(lhs), Ok(rhs)) = (v.as_f64(), bound.trim().parse::<f64>()) {
        return lhs.partial_cmp(&rhs);
    }
    match v {
        Value::String(s) => {
            if let (Ok(lhs), Ok(rhs)) = (s.trim().parse::<f64>(), bound.trim().parse::<f64>()) {
                return lhs.partial_cmp(&rhs);
            }
            Some(s.as_str().cmp(bound))
        }
        _ => None,
    }
}
