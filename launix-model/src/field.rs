use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::option::SelectOption;

/// How a field is presented to the form builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    DateTime,
    Time,
    Options,
}

/// A typed, form-ready description of one column or action parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub id: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    /// Hidden/deselected by default in the resulting form.
    pub removed: bool,
    pub can_be_used_to_match: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDescriptor {
    /// Plain string field for a declared action parameter.
    pub fn action_param(name: &str) -> Self {
        Self {
            id: name.to_string(),
            display_name: name.to_string(),
            field_type: FieldType::String,
            required: false,
            removed: false,
            can_be_used_to_match: false,
            options: None,
            description: None,
        }
    }
}

/// Operation requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Create,
    Custom,
    Delete,
    Edit,
    List,
    RetrieveFile,
    UploadFile,
    View,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::Create,
        Operation::Custom,
        Operation::Delete,
        Operation::Edit,
        Operation::List,
        Operation::RetrieveFile,
        Operation::UploadFile,
        Operation::View,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Custom => "custom",
            Operation::Delete => "delete",
            Operation::Edit => "edit",
            Operation::List => "list",
            Operation::RetrieveFile => "retrieveFile",
            Operation::UploadFile => "uploadFile",
            Operation::View => "view",
        }
    }

    /// Only creation makes declared-required columns required.
    pub const fn is_create(&self) -> bool {
        matches!(self, Operation::Create)
    }

    /// Operations addressed at a single record by id.
    pub const fn takes_record_id(&self) -> bool {
        matches!(self, Operation::View | Operation::Edit | Operation::Delete)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ModelError::UnknownOperation(s.to_string()))
    }
}

/// An entry of a searchable picker list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    pub name: String,
    pub value: String,
}
