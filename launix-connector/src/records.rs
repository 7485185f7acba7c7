//! Plain record operations against the per-table endpoints.

use launix_model::{display_string, is_truthy, Operation};
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::client::Connector;
use crate::error::{ConnectorError, ConnectorResult};
use crate::transport::{ApiRequest, Transport};

/// Inputs for [`Connector::run_record_operation`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordRequest {
    pub table: String,
    /// Record id for view, edit and delete.
    pub id: Option<String>,
    /// Column values for create and edit.
    pub columns: Map<String, Value>,
    /// Filter and sort parameters for list.
    pub filter: Map<String, Value>,
}

/// Accepts list filters as a JSON object or a string holding one.
pub fn parse_filter(value: &Value) -> ConnectorResult<Map<String, Value>> {
    match value {
        Value::Null => Ok(Map::new()),
        Value::Object(filter) => Ok(filter.clone()),
        Value::String(source) if source.trim().is_empty() => Ok(Map::new()),
        Value::String(source) => match serde_json::from_str(source) {
            Ok(Value::Object(filter)) => Ok(filter),
            Ok(_) => Err(ConnectorError::InvalidInput(
                "filter parameters must be a JSON object".to_string(),
            )),
            Err(e) => Err(ConnectorError::InvalidInput(format!(
                "filter parameters are not valid JSON: {e}"
            ))),
        },
        _ => Err(ConnectorError::InvalidInput(
            "filter parameters must be a JSON object".to_string(),
        )),
    }
}

/// Wraps a raw record-endpoint result the way the host expects it.
pub fn shape_record_result(operation: Operation, result: Value) -> Value {
    match operation {
        Operation::Delete => json!({ "deleted": result }),
        Operation::Create => json!({ "id": result }),
        Operation::Edit => json!({ "result": result }),
        Operation::View => json!({ "data": result }),
        _ => result,
    }
}

/// Fails when the remote system reported an `error` member.
pub fn check_remote_error(result: Value) -> ConnectorResult<Value> {
    match result.get("error") {
        Some(error) if is_truthy(error) => Err(ConnectorError::Api(display_string(error))),
        _ => Ok(result),
    }
}

fn query_string(params: &Map<String, Value>) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&display_string(value))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

impl<T: Transport> Connector<T> {
    pub async fn create_record(
        &self,
        table: &str,
        columns: &Map<String, Value>,
    ) -> ConnectorResult<Value> {
        let path = self.config().table_path(table, "create");
        self.table_call(ApiRequest::post_json(path, Value::Object(columns.clone())))
            .await
    }

    pub async fn view_record(&self, table: &str, id: &str) -> ConnectorResult<Value> {
        let path = self.record_path(table, "view", id);
        self.table_call(ApiRequest::get(path)).await
    }

    pub async fn edit_record(
        &self,
        table: &str,
        id: &str,
        columns: &Map<String, Value>,
    ) -> ConnectorResult<Value> {
        let path = self.record_path(table, "edit", id);
        self.table_call(ApiRequest::post_json(path, Value::Object(columns.clone())))
            .await
    }

    pub async fn delete_record(&self, table: &str, id: &str) -> ConnectorResult<Value> {
        let path = self.record_path(table, "delete", id);
        self.table_call(ApiRequest::get(path)).await
    }

    pub async fn list_records(
        &self,
        table: &str,
        filter: &Map<String, Value>,
    ) -> ConnectorResult<Value> {
        let mut path = self.config().table_path(table, "list");
        let query = query_string(filter);
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query);
        }
        self.table_call(ApiRequest::new(Method::GET, path)).await
    }

    /// Runs one of the record operations and shapes its result.
    pub async fn run_record_operation(
        &self,
        operation: Operation,
        request: &RecordRequest,
    ) -> ConnectorResult<Value> {
        let table = request.table.as_str();
        let result = match operation {
            Operation::Create => self.create_record(table, &request.columns).await?,
            Operation::View => self.view_record(table, required_id(operation, request)?).await?,
            Operation::Edit => {
                self.edit_record(table, required_id(operation, request)?, &request.columns)
                    .await?
            }
            Operation::Delete => {
                self.delete_record(table, required_id(operation, request)?)
                    .await?
            }
            Operation::List => self.list_records(table, &request.filter).await?,
            other => {
                return Err(ConnectorError::InvalidInput(format!(
                    "{other} is not a record operation"
                )));
            }
        };
        info!(%table, %operation, "record operation completed");
        Ok(shape_record_result(operation, result))
    }

    fn record_path(&self, table: &str, operation: &str, id: &str) -> String {
        format!(
            "{}?id={}",
            self.config().table_path(table, operation),
            urlencoding::encode(id)
        )
    }

    async fn table_call(&self, request: ApiRequest) -> ConnectorResult<Value> {
        let path = request.path.clone();
        debug!(method = %request.method, %path, "record call");
        let result = self
            .transport()
            .execute(request)
            .await?
            .error_for_status(&path)?
            .json()?;
        check_remote_error(result)
    }
}

fn required_id(operation: Operation, request: &RecordRequest) -> ConnectorResult<&str> {
    request
        .id
        .as_deref()
        .ok_or_else(|| ConnectorError::InvalidInput(format!("{operation} requires a record id")))
}
