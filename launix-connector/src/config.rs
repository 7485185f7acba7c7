//! Connection settings for a Launix instance.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{ConnectorError, ConnectorResult};

/// Connection settings.
///
/// Loadable from TOML; every key is optional and falls back to
/// [`ConnectorConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Base URL of the software (e.g. `https://erp.example.com`).
    pub base_url: String,
    /// Bearer token sent with every request.
    pub token: String,
    /// Path of the schema descriptor endpoint.
    pub descriptor_path: String,
    /// Prefix of the per-table endpoints.
    pub tables_api_path: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            descriptor_path: "FOP/Index/api".to_string(),
            tables_api_path: "TablesAPI".to_string(),
            timeout_secs: 60,
        }
    }
}

impl ConnectorConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            ..Default::default()
        }
    }

    pub fn from_toml_str(source: &str) -> ConnectorResult<Self> {
        toml::from_str(source).map_err(|e| ConnectorError::Config(e.to_string()))
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> ConnectorResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| ConnectorError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> ConnectorResult<()> {
        if self.base_url().is_empty() {
            return Err(ConnectorError::Config("base_url is empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConnectorError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Base URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// Joins a relative path (which may carry a query) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoint path for a per-table call such as `list` or `create`.
    pub fn table_path(&self, table: &str, operation: &str) -> String {
        format!(
            "{}/{}/{}",
            self.tables_api_path.trim_matches('/'),
            urlencoding::encode(table),
            operation
        )
    }
}
