//! Normalization of persisted fields whose shape is not guaranteed.
//!
//! List-typed columns may come back from the data store as a JSON array, as a
//! JSON-encoded string, or as a bare scalar. Everything in here resolves those
//! shapes once, at deserialization time, so the rest of the crate only ever
//! sees `Vec<String>` or `Vec<IngredientRow>`. Nothing in this module fails.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::IngredientRow;

pub const NOT_AVAILABLE: &str = "N/A";

/// The shapes a list-typed column is known to arrive in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    List(Vec<Value>),
    Text(String),
    Other(Value),
}

impl From<&Value> for RawField {
    fn from(value: &Value) -> Self {
        match value {
            Value::Array(items) => RawField::List(items.clone()),
            Value::String(s) => RawField::Text(s.clone()),
            other => RawField::Other(other.clone()),
        }
    }
}

impl RawField {
    pub fn into_list(self) -> Vec<String> {
        match self {
            RawField::List(items) => items.iter().filter_map(scalar_to_string).collect(),
            RawField::Text(s) => {
                if s.trim().is_empty() {
                    return Vec::new();
                }
                match serde_json::from_str::<Value>(&s) {
                    Ok(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
                    _ => vec![s],
                }
            }
            RawField::Other(_) => Vec::new(),
        }
    }

    pub fn into_ingredients(self) -> Vec<IngredientRow> {
        let items = match self {
            RawField::List(items) => items,
            RawField::Text(s) => match serde_json::from_str::<Value>(&s) {
                Ok(Value::Array(items)) => items,
                _ => return Vec::new(),
            },
            RawField::Other(_) => return Vec::new(),
        };
        // One malformed element discards the whole list.
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(_) => serde_json::from_value::<IngredientRow>(item).ok(),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Canonical list form of an arbitrary persisted value.
pub fn normalize_list(field: &Value) -> Vec<String> {
    RawField::from(field).into_list()
}

/// Same tri-state handling as [`normalize_list`], for ingredient rows.
pub fn normalize_ingredient_list(field: &Value) -> Vec<IngredientRow> {
    RawField::from(field).into_ingredients()
}

pub(crate) fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawField>::deserialize(deserializer)?;
    Ok(raw.map(RawField::into_list).unwrap_or_default())
}

pub(crate) fn ingredient_list<'de, D>(deserializer: D) -> Result<Vec<IngredientRow>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawField>::deserialize(deserializer)?;
    Ok(raw.map(RawField::into_ingredients).unwrap_or_default())
}

/// Accepts `true`/`false`, `"yes"`/`"no"` in any case, or nothing.
pub(crate) fn yes_no<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" => Some(true),
            "no" | "n" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// The value itself, or `N/A` when blank.
pub fn or_na(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn join_or_na(items: &[String]) -> String {
    or_na(&items.join(", "))
}

pub fn yes_no_or_na(answer: Option<bool>) -> String {
    match answer {
        Some(true) => "Yes".to_string(),
        Some(false) => "No".to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `DD/MM/YYYY` for RFC 3339 timestamps and plain dates; anything else verbatim.
pub fn format_date(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return ts.format("%d/%m/%Y").to_string();
    }
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => trimmed.to_string(),
    }
}
