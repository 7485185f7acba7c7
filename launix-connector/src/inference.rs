//! Column → field descriptor inference.

use launix_model::{
    ColumnDefinition, ColumnType, FieldDescriptor, FieldType, Operation, SelectOption,
    TableDefinition,
};
use tracing::warn;

use crate::client::Connector;
use crate::error::ConnectorResult;
use crate::transport::Transport;

/// How a column will be presented, before any remote lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    /// Presentation fully determined by the descriptor.
    Typed {
        field_type: FieldType,
        options: Vec<SelectOption>,
    },
    /// Options come from listing the referenced table, if one is named.
    Reference { table: Option<String> },
}

/// Decides the presentation of a column from its normalized type.
pub fn column_kind(column_type: &ColumnType) -> ColumnKind {
    let options = column_type
        .options
        .as_ref()
        .map(|raw| raw.resolve(column_type.prefers_numeric()))
        .unwrap_or_default();

    let field_type = match column_type.tag.as_str() {
        "number" if options.is_empty() => FieldType::Number,
        "number" => FieldType::Options,
        "boolean" => FieldType::Boolean,
        "date" | "datetime" => FieldType::DateTime,
        "time" => FieldType::Time,
        "foreign-key" | "reference" => {
            return ColumnKind::Reference {
                table: column_type.references.clone(),
            };
        }
        _ if !options.is_empty() => FieldType::Options,
        _ => FieldType::String,
    };
    ColumnKind::Typed {
        field_type,
        options,
    }
}

/// Assembles the field descriptor once the presentation is known.
pub fn build_field(
    column: &ColumnDefinition,
    operation: Operation,
    field_type: FieldType,
    options: Vec<SelectOption>,
) -> FieldDescriptor {
    let required = column.required && operation.is_create();
    let info = column.column_type.info.clone();

    let base_label = format!("{} ({})", column.desc.as_deref().unwrap_or(&column.id), column.id);
    let display_name = match &info {
        Some(info) => format!("{base_label}: {info}"),
        None => base_label,
    };

    FieldDescriptor {
        id: column.id.clone(),
        display_name,
        field_type,
        required,
        removed: !required,
        can_be_used_to_match: true,
        options: (field_type == FieldType::Options).then_some(options),
        description: info,
    }
}

impl<T: Transport> Connector<T> {
    /// Infers one field per column, in descriptor order.
    ///
    /// Reference columns whose listing fails still produce an `options`
    /// field, with no options.
    pub async fn infer_fields(
        &self,
        table: &TableDefinition,
        operation: Operation,
    ) -> Vec<FieldDescriptor> {
        let mut fields = Vec::with_capacity(table.columns.len());
        for column in &table.columns {
            let (field_type, options) = match column_kind(&column.column_type) {
                ColumnKind::Typed {
                    field_type,
                    options,
                } => (field_type, options),
                ColumnKind::Reference { table: Some(referenced) } => {
                    (FieldType::Options, self.load_reference_options(&referenced).await)
                }
                ColumnKind::Reference { table: None } => {
                    warn!(column = %column.id, "reference column names no table");
                    (FieldType::Options, Vec::new())
                }
            };
            fields.push(build_field(column, operation, field_type, options));
        }
        fields
    }

    /// Fetches the descriptor and infers the fields of one table.
    ///
    /// An unknown table yields no fields rather than an error.
    pub async fn table_fields(
        &self,
        table: &str,
        operation: Operation,
    ) -> ConnectorResult<Vec<FieldDescriptor>> {
        let descriptor = self.fetch_descriptor().await?;
        match descriptor.resolve(table) {
            Some((_, definition)) => Ok(self.infer_fields(definition, operation).await),
            None => {
                warn!(%table, "table not in descriptor, no fields to infer");
                Ok(Vec::new())
            }
        }
    }
}
