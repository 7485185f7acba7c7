//! Best-effort `(value, label)` extraction from records of unknown shape.
//!
//! Reference listings return whatever the backend stores. The value and the
//! label are each found by trying a fixed list of strategies in order; the
//! first one that yields something wins.

use serde_json::{Map, Value};

use crate::option::{first_present, option_value, OptionValue, SelectOption};

/// Keys probed for an option value, in priority order.
pub const VALUE_KEYS: [&str; 5] = ["id", "ID", "Id", "value", "key"];

/// Keys probed for an option label, in priority order.
pub const LABEL_KEYS: [&str; 10] = [
    "name",
    "Name",
    "title",
    "Title",
    "label",
    "Label",
    "desc",
    "Desc",
    "description",
    "Description",
];

/// Keys preferred by the recursive readable-string search.
pub const READABLE_KEYS: [&str; 16] = [
    "name",
    "Name",
    "title",
    "Title",
    "label",
    "Label",
    "desc",
    "Desc",
    "description",
    "Description",
    "text",
    "code",
    "value",
    "slug",
    "short",
    "long",
];

/// Deepest nesting level the readable-string search descends to.
pub const MAX_READABLE_DEPTH: usize = 4;

/// Members of a listing response that may hold the record sequence.
pub const RECORD_LIST_KEYS: [&str; 5] = ["data", "items", "records", "results", "list"];

/// Ways of finding an option value inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueStrategy {
    /// First non-null member among [`VALUE_KEYS`].
    CandidateKey,
    /// The record's first member, in iteration order.
    FirstField,
}

impl ValueStrategy {
    pub const ORDER: [ValueStrategy; 2] = [ValueStrategy::CandidateKey, ValueStrategy::FirstField];

    pub fn extract(self, record: &Map<String, Value>) -> Option<&Value> {
        match self {
            ValueStrategy::CandidateKey => first_present(record, &VALUE_KEYS),
            ValueStrategy::FirstField => record.values().next().filter(|value| !value.is_null()),
        }
    }
}

/// Ways of finding a readable label inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStrategy {
    /// Readable text under the first non-null member among [`LABEL_KEYS`].
    CandidateKey,
    /// Depth-bounded search over the whole record.
    RecursiveSearch,
}

impl LabelStrategy {
    pub const ORDER: [LabelStrategy; 2] =
        [LabelStrategy::CandidateKey, LabelStrategy::RecursiveSearch];

    pub fn extract(self, record: &Value) -> Option<String> {
        match self {
            LabelStrategy::CandidateKey => record
                .as_object()
                .and_then(|fields| first_present(fields, &LABEL_KEYS))
                .and_then(|label| find_readable_string(label, 0)),
            LabelStrategy::RecursiveSearch => find_readable_string(record, 0),
        }
    }
}

/// Derives an option from one record (or bare literal) of a listing.
///
/// Returns `None` for `null` and for objects without any usable value.
pub fn record_to_option(record: &Value) -> Option<SelectOption> {
    let value = match record {
        Value::Null => return None,
        Value::Object(fields) => ValueStrategy::ORDER
            .into_iter()
            .find_map(|strategy| strategy.extract(fields))?,
        literal => literal,
    };
    let value = option_value(value, true);

    let label = LabelStrategy::ORDER
        .into_iter()
        .find_map(|strategy| strategy.extract(record));

    Some(SelectOption {
        label: compose_label(label, &value),
        value,
    })
}

/// Finds the first non-empty human readable string inside `input`.
pub fn find_readable_string(input: &Value, depth: usize) -> Option<String> {
    if depth > MAX_READABLE_DEPTH {
        return None;
    }
    match input {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(entries) => entries
            .iter()
            .find_map(|entry| find_readable_string(entry, depth + 1)),
        Value::Object(fields) => READABLE_KEYS
            .iter()
            .filter_map(|key| fields.get(*key))
            .chain(fields.values())
            .find_map(|value| find_readable_string(value, depth + 1)),
    }
}

/// Locates the record sequence inside a listing response.
pub fn extract_records(response: &Value) -> &[Value] {
    match response {
        Value::Array(records) => records.as_slice(),
        Value::Object(fields) => RECORD_LIST_KEYS
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    }
}

/// True when one of the label's tokens is the value itself.
///
/// Tokens are split on whitespace and stripped of surrounding brackets and
/// separators, so `"Order (7)"` mentions `7` but `"Invoice #7"` does not.
pub fn mentions_value(label: &str, value: &str) -> bool {
    label.split_whitespace().any(|token| {
        token.trim_matches(|c: char| "()[]{},;:".contains(c)) == value
    })
}

fn compose_label(label: Option<String>, value: &OptionValue) -> String {
    let value_text = value.to_string();
    match label {
        Some(label) if !value_text.is_empty() && !mentions_value(&label, &value_text) => {
            format!("{label} ({value_text})")
        }
        Some(label) => label,
        None => value_text,
    }
}
