//! Selectable options and the value coercion rules they share.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

use crate::descriptor::RawOptions;

/// The value carried by an option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Number(Number),
    String(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Number(n) => write!(f, "{n}"),
            OptionValue::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Number(value.into())
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

/// A `(value, label)` pair offered for an `options` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: OptionValue,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// An options list that keeps the first occurrence of each value.
#[derive(Debug, Clone, Default)]
pub struct OptionList {
    options: Vec<SelectOption>,
}

impl OptionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the option unless its value is already present.
    /// Returns whether it was kept.
    pub fn push(&mut self, option: SelectOption) -> bool {
        if self.contains_value(&option.value) {
            return false;
        }
        self.options.push(option);
        true
    }

    pub fn contains_value(&self, value: &OptionValue) -> bool {
        self.options.iter().any(|existing| &existing.value == value)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn into_vec(self) -> Vec<SelectOption> {
        self.options
    }
}

impl FromIterator<SelectOption> for OptionList {
    fn from_iter<I: IntoIterator<Item = SelectOption>>(iter: I) -> Self {
        let mut list = OptionList::new();
        for option in iter {
            list.push(option);
        }
        list
    }
}

/// Coerces a number or numeric string to a JSON number.
///
/// Whole numbers become integers so that `"7"`, `7.0` and `7` compare equal
/// afterwards.
pub fn coerce_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) if n.is_f64() => n.as_f64().and_then(float_number),
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if let Ok(n) = trimmed.parse::<i64>() {
                return Some(n.into());
            }
            if let Ok(n) = trimmed.parse::<u64>() {
                return Some(n.into());
            }
            trimmed.parse::<f64>().ok().and_then(float_number)
        }
        _ => None,
    }
}

fn float_number(n: f64) -> Option<Number> {
    if !n.is_finite() {
        return None;
    }
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        return Some((n as i64).into());
    }
    Number::from_f64(n)
}

/// Turns an arbitrary JSON value into an option value.
pub fn option_value(value: &Value, prefer_numeric: bool) -> OptionValue {
    if prefer_numeric {
        if let Some(n) = coerce_number(value) {
            return OptionValue::Number(n);
        }
    }
    match value {
        Value::Bool(b) => OptionValue::Bool(*b),
        Value::Number(n) => OptionValue::Number(n.clone()),
        Value::String(s) => OptionValue::String(s.clone()),
        other => OptionValue::String(display_string(other)),
    }
}

/// String form used for labels: empty for null, JSON for containers.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First member among `keys` that is present and not null.
pub(crate) fn first_present<'a>(
    fields: &'a Map<String, Value>,
    keys: &[&str],
) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| !value.is_null())
}

impl RawOptions {
    /// Resolves a published option set into deduplicated options.
    pub fn resolve(&self, prefer_numeric: bool) -> Vec<SelectOption> {
        let mut list = OptionList::new();
        match self {
            RawOptions::Sequence(entries) => {
                for (index, entry) in entries.iter().enumerate() {
                    let index_value = Value::from(index);
                    let option = match entry {
                        Value::Object(fields) => {
                            let label = display_string(
                                first_present(fields, &["name", "label", "desc", "value"])
                                    .unwrap_or(&index_value),
                            );
                            let value = match first_present(fields, &["value", "id", "key"]) {
                                Some(value) => option_value(value, prefer_numeric),
                                None if prefer_numeric => option_value(&index_value, true),
                                None => OptionValue::String(label.clone()),
                            };
                            SelectOption { label, value }
                        }
                        scalar => {
                            let value = if prefer_numeric {
                                coerce_number(scalar)
                                    .map(OptionValue::Number)
                                    .unwrap_or_else(|| option_value(&index_value, true))
                            } else {
                                option_value(scalar, false)
                            };
                            SelectOption {
                                label: display_string(scalar),
                                value,
                            }
                        }
                    };
                    list.push(option);
                }
            }
            RawOptions::Mapping(entries) => {
                for (key, label) in entries {
                    let label = if label.is_null() {
                        key.clone()
                    } else {
                        display_string(label)
                    };
                    list.push(SelectOption {
                        label,
                        value: option_value(&Value::String(key.clone()), prefer_numeric),
                    });
                }
            }
        }
        list.into_vec()
    }
}
