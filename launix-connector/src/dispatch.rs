//! Custom action resolution, dispatch and response classification.
//!
//! An action call is assembled in two steps. [`prepare_action`] merges the
//! caller's parameters with what the descriptor declares and builds the
//! request path or body; it is pure and does no I/O. [`Connector::dispatch`]
//! fetches the descriptor, prepares, sends, and hands the response to
//! [`classify_response`].

use launix_model::{display_string, ActionDefinition, BinaryPayload, DEFAULT_ACTION_METHOD};
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::client::Connector;
use crate::error::{ConnectorError, ConnectorResult};
use crate::transport::{ApiRequest, ApiResponse, Transport};

pub const PDF_MIME: &str = "application/pdf";
pub const JSON_MIME: &str = "application/json";

/// Outcome of a dispatched action, by response content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseClassification {
    /// A PDF document.
    Binary(BinaryPayload),
    /// A parsed JSON body.
    Json(Value),
    /// Anything else, or JSON that did not parse.
    Opaque { status: u16, content_type: String },
}

impl ResponseClassification {
    /// Item JSON for the host: the parsed body, or a short status summary.
    pub fn to_item_json(&self, url: &str) -> Value {
        match self {
            ResponseClassification::Binary(payload) => json!({
                "ok": true,
                "fileName": payload.file_name,
                "url": url,
            }),
            ResponseClassification::Json(body) => body.clone(),
            ResponseClassification::Opaque {
                status,
                content_type,
            } => json!({
                "ok": true,
                "status": status,
                "contentType": content_type,
                "url": url,
            }),
        }
    }
}

/// A fully resolved action call, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedAction {
    /// Table identifier as supplied by the caller.
    pub table: String,
    pub action_path: String,
    /// Uppercased HTTP method.
    pub method: String,
    /// Final parameters, declared ones first.
    pub params: Vec<(String, String)>,
    /// Request path below the base URL; carries the query for `GET`.
    pub path: String,
    /// JSON body for every method other than `GET`.
    pub body: Option<Value>,
}

impl PreparedAction {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Name used for a PDF response without `Content-Disposition`.
    pub fn default_file_name(&self) -> String {
        let id = self
            .param("id")
            .filter(|id| !id.is_empty())
            .unwrap_or("action");
        let last_segment = self.action_path.rsplit('/').next().unwrap_or_default();
        format!("{}_{}_{}.pdf", self.table, id, last_segment)
    }

    fn params_summary(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn failure(&self, message: impl Into<String>) -> ConnectorError {
        ConnectorError::TransportFailure {
            table: self.table.clone(),
            action: self.action_path.clone(),
            params: self.params_summary(),
            message: message.into(),
        }
    }
}

/// Merges caller parameters with the declared parameter list.
///
/// Declared parameters come first, in declaration order, taking the caller's
/// value or, for `id`, the fallback. Undeclared caller parameters follow.
/// `id` is injected last when still missing and a fallback exists.
pub fn merge_params(
    declared: &[String],
    caller: &Map<String, Value>,
    id_fallback: Option<&str>,
) -> Vec<(String, String)> {
    let id_fallback = id_fallback.filter(|id| !id.is_empty());
    let mut params: Vec<(String, String)> = Vec::with_capacity(declared.len() + caller.len() + 1);
    let placed =
        |params: &Vec<(String, String)>, name: &str| params.iter().any(|(key, _)| key == name);

    for name in declared {
        if placed(&params, name) {
            continue;
        }
        let value = caller
            .get(name)
            .filter(|value| !value.is_null())
            .map(display_string)
            .or_else(|| id_fallback.filter(|_| name == "id").map(str::to_string));
        if let Some(value) = value {
            params.push((name.clone(), value));
        }
    }

    for (name, value) in caller {
        if !value.is_null() && !placed(&params, name) {
            params.push((name.clone(), display_string(value)));
        }
    }

    if let Some(id) = id_fallback {
        if !placed(&params, "id") {
            params.push(("id".to_string(), id.to_string()));
        }
    }
    params
}

/// Builds the request for an action.
///
/// `action` is the descriptor entry if one was found; without it the call
/// goes out as `GET` with no declared parameters.
pub fn prepare_action(
    table: &str,
    action_path: &str,
    action: Option<&ActionDefinition>,
    caller: &Map<String, Value>,
    id_fallback: Option<&str>,
) -> PreparedAction {
    let method = action
        .map(ActionDefinition::method)
        .unwrap_or_else(|| DEFAULT_ACTION_METHOD.to_string());
    let declared = action.map(|action| action.params.as_slice()).unwrap_or_default();
    let params = merge_params(declared, caller, id_fallback);

    let mut path = format!("/{}", action_path.trim_start_matches('/'));
    let body = if method == "GET" {
        let query = params
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");
        if !query.is_empty() {
            path.push(if path.contains('?') { '&' } else { '?' });
            path.push_str(&query);
        }
        None
    } else {
        let body: Map<String, Value> = params
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        Some(Value::Object(body))
    };

    PreparedAction {
        table: table.to_string(),
        action_path: action_path.to_string(),
        method,
        params,
        path,
        body,
    }
}

/// Classifies a response by its content type.
///
/// PDF wins over JSON. JSON that fails to parse degrades to
/// [`ResponseClassification::Opaque`].
pub fn classify_response(
    response: &ApiResponse,
    default_file_name: impl FnOnce() -> String,
) -> ResponseClassification {
    let content_type = response.content_type().to_string();
    let lowered = content_type.to_lowercase();

    if lowered.contains(PDF_MIME) {
        let file_name = response
            .disposition_filename()
            .unwrap_or_else(default_file_name);
        return ResponseClassification::Binary(BinaryPayload::new(
            file_name,
            PDF_MIME,
            response.body.clone(),
        ));
    }

    if lowered.contains(JSON_MIME) {
        let parsed = if response.body.is_empty() {
            Ok(json!({}))
        } else {
            response.json()
        };
        match parsed {
            Ok(body) => return ResponseClassification::Json(body),
            Err(e) => warn!(error = %e, "response claimed JSON but did not parse"),
        }
    }

    ResponseClassification::Opaque {
        status: response.status,
        content_type,
    }
}

impl<T: Transport> Connector<T> {
    /// Resolves and issues a custom action.
    ///
    /// A descriptor that cannot be fetched degrades to `GET` with the
    /// caller's parameters; a table missing from a fetched descriptor is
    /// [`ConnectorError::NotFound`]. Failure of the call itself is
    /// [`ConnectorError::TransportFailure`].
    pub async fn dispatch(
        &self,
        table: &str,
        action_path: &str,
        caller_params: &Map<String, Value>,
        id_fallback: Option<&str>,
    ) -> ConnectorResult<ResponseClassification> {
        let prepared = self
            .prepare_dispatch(table, action_path, caller_params, id_fallback)
            .await?;
        let response = self.send_prepared(&prepared).await?;
        Ok(classify_response(&response, || prepared.default_file_name()))
    }

    /// Resolves the action against a freshly fetched descriptor.
    pub async fn prepare_dispatch(
        &self,
        table: &str,
        action_path: &str,
        caller_params: &Map<String, Value>,
        id_fallback: Option<&str>,
    ) -> ConnectorResult<PreparedAction> {
        let action = match self.fetch_descriptor().await {
            Ok(descriptor) => {
                let (_, definition) = descriptor
                    .resolve(table)
                    .ok_or_else(|| ConnectorError::table_not_found(table))?;
                let action = definition.action(action_path).cloned();
                if action.is_none() {
                    debug!(%table, action = %action_path, "action not declared, using defaults");
                }
                action
            }
            Err(e) => {
                warn!(
                    %table,
                    action = %action_path,
                    error = %e,
                    "descriptor unavailable, using defaults"
                );
                None
            }
        };
        Ok(prepare_action(
            table,
            action_path,
            action.as_ref(),
            caller_params,
            id_fallback,
        ))
    }

    /// Sends a prepared action; non-success statuses are failures.
    pub async fn send_prepared(&self, prepared: &PreparedAction) -> ConnectorResult<ApiResponse> {
        let method = Method::from_bytes(prepared.method.as_bytes())
            .map_err(|_| prepared.failure(format!("invalid HTTP method '{}'", prepared.method)))?;
        let mut request = ApiRequest::new(method, &prepared.path);
        if let Some(body) = &prepared.body {
            request = request.with_json(body.clone());
        }

        let response = self
            .transport()
            .execute(request)
            .await
            .map_err(|e| prepared.failure(e.to_string()))?;
        if !response.is_success() {
            return Err(prepared.failure(format!(
                "status {}: {}",
                response.status,
                response.text()
            )));
        }

        info!(
            table = %prepared.table,
            action = %prepared.action_path,
            method = %prepared.method,
            status = response.status,
            "action dispatched"
        );
        Ok(response)
    }
}
