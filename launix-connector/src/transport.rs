//! HTTP collaborator seam.
//!
//! Every remote call goes through [`Transport`]. [`HttpTransport`] is the
//! reqwest-backed implementation; it owns authentication and URL joining so
//! the rest of the connector only deals in relative paths.

use async_trait::async_trait;
use launix_model::{BinaryPayload, OCTET_STREAM};
use regex::Regex;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, ConnectorResult};

static DISPOSITION_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)filename\*=UTF-8''([^;]+)|filename="?([^";]+)"?"#)
        .expect("content-disposition pattern is valid")
});

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    /// Single-file multipart form.
    Multipart { field: String, file: BinaryPayload },
}

/// An outgoing request, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the base URL, query string included.
    pub path: String,
    pub body: Option<RequestBody>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_json(body)
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn with_file(mut self, field: impl Into<String>, file: BinaryPayload) -> Self {
        self.body = Some(RequestBody::Multipart {
            field: field.into(),
            file,
        });
        self
    }
}

/// A fully buffered response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Header names are lowercased.
    headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_lowercase(), value))
            .collect();
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, value)| value.as_str())
    }

    /// The `content-type` header, empty when absent.
    pub fn content_type(&self) -> &str {
        self.header("content-type").unwrap_or_default()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> ConnectorResult<Value> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ConnectorError::MalformedResponse(e.to_string()))
    }

    /// File name announced by `Content-Disposition`, percent-decoded.
    pub fn disposition_filename(&self) -> Option<String> {
        self.header("content-disposition")
            .and_then(parse_disposition_filename)
    }

    /// Turns a non-success status into [`ConnectorError::Status`].
    pub fn error_for_status(self, path: &str) -> ConnectorResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(ConnectorError::Status {
            path: path.to_string(),
            status: self.status,
            body: self.text(),
        })
    }
}

/// Extracts the file name from a `Content-Disposition` header value.
///
/// Understands `filename*=UTF-8''<percent-encoded>` and `filename="<name>"`.
pub fn parse_disposition_filename(header: &str) -> Option<String> {
    let captures = DISPOSITION_FILENAME.captures(header)?;
    let raw = captures.get(1).or_else(|| captures.get(2))?.as_str().trim();
    if raw.is_empty() {
        return None;
    }
    Some(
        urlencoding::decode(raw)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| raw.to_string()),
    )
}

/// The HTTP collaborator used by the connector.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues the request and buffers the response, whatever its status.
    async fn execute(&self, request: ApiRequest) -> ConnectorResult<ApiResponse>;
}

/// reqwest-backed transport with bearer authentication.
pub struct HttpTransport {
    config: ConnectorConfig,
    client: Client,
}

impl HttpTransport {
    pub fn new(config: ConnectorConfig) -> ConnectorResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> ConnectorResult<ApiResponse> {
        let url = self.config.url(&request.path);
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self
            .client
            .request(request.method, &url)
            .bearer_auth(&self.config.token);

        builder = match request.body {
            Some(RequestBody::Json(body)) => builder.json(&body),
            Some(RequestBody::Multipart { field, file }) => {
                let mime = if file.mime_type.is_empty() {
                    OCTET_STREAM.to_string()
                } else {
                    file.mime_type
                };
                let part = Part::bytes(file.data)
                    .file_name(file.file_name)
                    .mime_str(&mime)?;
                builder.multipart(Form::new().part(field, part))
            }
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        debug!(%url, status, bytes = body.len(), "received response");
        Ok(ApiResponse::new(status, headers, body))
    }
}
