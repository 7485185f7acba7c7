//! Normalized form of the remote schema descriptor.
//!
//! The descriptor endpoint publishes loosely shaped JSON: columns arrive as a
//! mapping or as a sequence, column types as a bare string or as an object.
//! [`Descriptor::from_value`] is the only place that looks at those raw
//! shapes. Everything downstream works with the types in this module.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::field::{FieldDescriptor, ListEntry};

/// Default HTTP method for actions that do not declare one.
pub const DEFAULT_ACTION_METHOD: &str = "GET";

/// The remote system's self-reported schema, in descriptor order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Descriptor {
    tables: Vec<(String, TableDefinition)>,
}

impl Descriptor {
    /// Normalizes a raw descriptor document.
    ///
    /// Accepts both `{"tables": {...}}` and a bare key→table mapping. Entries
    /// that are not objects are skipped.
    pub fn from_value(document: &Value) -> Self {
        let mapping = match document.get("tables") {
            Some(Value::Object(tables)) => tables,
            _ => match document {
                Value::Object(root) => root,
                _ => return Self::default(),
            },
        };

        let mut tables = Vec::with_capacity(mapping.len());
        for (key, raw) in mapping {
            match raw {
                Value::Object(table) => {
                    tables.push((key.clone(), TableDefinition::from_object(table)));
                }
                _ => debug!(table = %key, "skipping descriptor entry that is not an object"),
            }
        }
        Self { tables }
    }

    /// Number of tables in the descriptor.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterates `(key, table)` pairs in descriptor order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &TableDefinition)> {
        self.tables.iter().map(|(key, table)| (key.as_str(), table))
    }

    /// Looks up a table by its canonical key only.
    pub fn table(&self, key: &str) -> Option<&TableDefinition> {
        self.tables
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, table)| table)
    }

    /// Resolves a user-supplied identifier to the canonical table key.
    ///
    /// Exact key match first, then a case-insensitive scan over external
    /// names and display labels in descriptor order.
    pub fn resolve_table(&self, identifier: &str) -> Option<&str> {
        self.resolve(identifier).map(|(key, _)| key)
    }

    /// Like [`Descriptor::resolve_table`], returning the definition too.
    pub fn resolve(&self, identifier: &str) -> Option<(&str, &TableDefinition)> {
        if let Some(exact) = self.tables().find(|(key, _)| *key == identifier) {
            return Some(exact);
        }

        let wanted = identifier.to_lowercase();
        self.tables().find(|(_, table)| table.answers_to(&wanted))
    }

    /// Table picker entries whose display label contains `filter`
    /// (case-insensitive). No filter lists every table.
    pub fn table_entries(&self, filter: Option<&str>) -> Vec<ListEntry> {
        let filter = filter.map(str::to_uppercase);
        self.tables()
            .filter(|(_, table)| match &filter {
                Some(filter) => table.display_name_singular.to_uppercase().contains(filter),
                None => true,
            })
            .map(|(key, table)| ListEntry {
                name: table.picker_label(),
                value: key.to_string(),
            })
            .collect()
    }
}

/// One table of the descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableDefinition {
    /// Human readable singular name (`descSingle` on the wire).
    pub display_name_singular: String,
    /// Backend table name (`tblname` on the wire).
    pub external_name: String,
    pub columns: Vec<ColumnDefinition>,
    pub actions: Vec<ActionDefinition>,
}

impl TableDefinition {
    fn from_object(table: &Map<String, Value>) -> Self {
        Self {
            display_name_singular: string_member(table, "descSingle").unwrap_or_default(),
            external_name: string_member(table, "tblname").unwrap_or_default(),
            columns: normalize_columns(table.get("columns")),
            actions: normalize_actions(table.get("actions")),
        }
    }

    /// Finds the action whose path matches exactly.
    pub fn action(&self, path: &str) -> Option<&ActionDefinition> {
        self.actions.iter().find(|action| action.path == path)
    }

    /// Action picker entries whose label contains `filter` (case-insensitive).
    pub fn action_entries(&self, filter: Option<&str>) -> Vec<ListEntry> {
        let filter = filter.map(str::to_uppercase);
        self.actions
            .iter()
            .filter(|action| match &filter {
                Some(filter) => action.label().to_uppercase().contains(filter),
                None => true,
            })
            .map(|action| ListEntry {
                name: action.label().to_string(),
                value: action.path.clone(),
            })
            .collect()
    }

    /// One string field per declared parameter of the action; empty when
    /// the action is unknown.
    pub fn action_param_fields(&self, path: &str) -> Vec<FieldDescriptor> {
        self.action(path)
            .map(|action| {
                action
                    .params
                    .iter()
                    .map(|param| FieldDescriptor::action_param(param))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Picker label, `"{descSingle} ({tblname})"`.
    pub fn picker_label(&self) -> String {
        format!("{} ({})", self.display_name_singular, self.external_name)
    }

    fn answers_to(&self, lowercase_identifier: &str) -> bool {
        (!self.external_name.is_empty()
            && self.external_name.to_lowercase() == lowercase_identifier)
            || (!self.display_name_singular.is_empty()
                && self.display_name_singular.to_lowercase() == lowercase_identifier)
    }
}

/// A column with its type already normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDefinition {
    pub id: String,
    pub desc: Option<String>,
    pub required: bool,
    pub column_type: ColumnType,
}

impl ColumnDefinition {
    fn from_object(id: String, column: &Map<String, Value>) -> Self {
        Self {
            id,
            desc: string_member(column, "desc").filter(|desc| !desc.is_empty()),
            required: column.get("required").is_some_and(is_truthy),
            column_type: ColumnType::from_raw(column.get("type")),
        }
    }
}

/// The `type` member of a column, always in object form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnType {
    /// Lowercased type tag, `"string"` when absent.
    pub tag: String,
    pub info: Option<String>,
    pub options: Option<RawOptions>,
    /// Referenced table for `foreign-key` / `reference` columns.
    pub references: Option<String>,
}

impl Default for ColumnType {
    fn default() -> Self {
        Self {
            tag: "string".to_string(),
            info: None,
            options: None,
            references: None,
        }
    }
}

impl ColumnType {
    /// Normalizes a raw `type` member (string, object or anything else).
    pub fn from_raw(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::String(tag)) => Self {
                tag: tag.to_lowercase(),
                ..Self::default()
            },
            Some(Value::Object(raw_type)) => Self {
                tag: match raw_type.get("type") {
                    Some(Value::String(tag)) => tag.to_lowercase(),
                    _ => "string".to_string(),
                },
                info: match raw_type.get("info") {
                    Some(Value::String(info)) => Some(info.clone()),
                    _ => None,
                },
                options: raw_type.get("options").and_then(RawOptions::from_value),
                references: raw_type
                    .get("references")
                    .and_then(scalar_string)
                    .filter(|table| !table.is_empty()),
            },
            _ => Self::default(),
        }
    }

    /// True when option values should be coerced to numbers.
    pub fn prefers_numeric(&self) -> bool {
        self.tag == "number"
    }
}

/// Static option set as published, before label/value resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RawOptions {
    /// `[{"name": .., "value": ..}, "literal", ...]`
    Sequence(Vec<Value>),
    /// `{"<value>": "<label>", ...}` in publication order.
    Mapping(Vec<(String, Value)>),
}

impl RawOptions {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(entries) => Some(Self::Sequence(entries.clone())),
            Value::Object(entries) => Some(Self::Mapping(
                entries
                    .iter()
                    .map(|(key, label)| (key.clone(), label.clone()))
                    .collect(),
            )),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Sequence(entries) => entries.is_empty(),
            Self::Mapping(entries) => entries.is_empty(),
        }
    }
}

/// A remote-declared custom action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionDefinition {
    pub path: String,
    pub title: Option<String>,
    pub http_method: Option<String>,
    pub params: Vec<String>,
}

impl ActionDefinition {
    fn from_object(action: &Map<String, Value>) -> Option<Self> {
        let path = string_member(action, "path")?;
        let params = match action.get("params") {
            Some(Value::Array(params)) => params
                .iter()
                .filter_map(|param| param.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };
        Some(Self {
            path,
            title: string_member(action, "title").filter(|title| !title.is_empty()),
            http_method: string_member(action, "httpMethod").filter(|method| !method.is_empty()),
            params,
        })
    }

    /// Uppercased method, `GET` when undeclared.
    pub fn method(&self) -> String {
        self.http_method
            .as_deref()
            .unwrap_or(DEFAULT_ACTION_METHOD)
            .to_uppercase()
    }

    /// Title when present, otherwise the path.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.path)
    }
}

fn normalize_columns(raw: Option<&Value>) -> Vec<ColumnDefinition> {
    match raw {
        Some(Value::Object(columns)) => columns
            .iter()
            .filter_map(|(id, column)| match column {
                Value::Object(column) => Some(ColumnDefinition::from_object(id.clone(), column)),
                _ => {
                    debug!(column = %id, "skipping column that is not an object");
                    None
                }
            })
            .collect(),
        Some(Value::Array(columns)) => columns
            .iter()
            .filter_map(|column| {
                let column = column.as_object()?;
                let id = column.get("id")?.as_str()?.to_string();
                Some(ColumnDefinition::from_object(id, column))
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn normalize_actions(raw: Option<&Value>) -> Vec<ActionDefinition> {
    match raw {
        Some(Value::Array(actions)) => actions
            .iter()
            .filter_map(Value::as_object)
            .filter_map(ActionDefinition::from_object)
            .collect(),
        _ => Vec::new(),
    }
}

fn string_member(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Loose truthiness as used by the remote system's flags.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
