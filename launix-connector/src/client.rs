//! The connector handle, descriptor retrieval and table resolution.

use launix_model::{Descriptor, FieldDescriptor, ListEntry};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, ConnectorResult};
use crate::transport::{ApiRequest, HttpTransport, Transport};

/// Entry point for all remote operations.
///
/// Holds no schema state: every operation fetches the descriptor afresh.
pub struct Connector<T = HttpTransport> {
    config: ConnectorConfig,
    transport: T,
}

impl Connector<HttpTransport> {
    /// Creates a connector talking HTTP to `config.base_url`.
    pub fn new(config: ConnectorConfig) -> ConnectorResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config.clone())?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> Connector<T> {
    /// Creates a connector over a custom transport.
    pub fn with_transport(config: ConnectorConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches and normalizes the schema descriptor.
    ///
    /// Any failure (transport, status, body) is reported as
    /// [`ConnectorError::DescriptorUnavailable`].
    pub async fn fetch_descriptor(&self) -> ConnectorResult<Descriptor> {
        let path = self.config.descriptor_path.as_str();
        let response = self
            .transport
            .execute(ApiRequest::get(path))
            .await
            .map_err(|e| ConnectorError::DescriptorUnavailable(e.to_string()))?
            .error_for_status(path)
            .map_err(|e| ConnectorError::DescriptorUnavailable(e.to_string()))?;

        let document: Value = response
            .json()
            .map_err(|e| ConnectorError::DescriptorUnavailable(e.to_string()))?;
        if !document.is_object() {
            return Err(ConnectorError::DescriptorUnavailable(
                "descriptor is not a JSON object".to_string(),
            ));
        }

        let descriptor = Descriptor::from_value(&document);
        debug!(tables = descriptor.len(), "fetched descriptor");
        Ok(descriptor)
    }

    /// Verifies that the configured URL and token yield a descriptor.
    pub async fn check_credentials(&self) -> ConnectorResult<()> {
        let descriptor = self.fetch_descriptor().await?;
        info!(tables = descriptor.len(), "credentials accepted");
        Ok(())
    }

    /// Resolves a table identifier (key, external name or display label)
    /// to its canonical key.
    pub async fn resolve_table(&self, identifier: &str) -> ConnectorResult<String> {
        let descriptor = self.fetch_descriptor().await?;
        descriptor
            .resolve_table(identifier)
            .map(str::to_string)
            .ok_or_else(|| ConnectorError::table_not_found(identifier))
    }

    /// Lists tables for a picker, filtered on the display label.
    pub async fn search_tables(&self, filter: Option<&str>) -> ConnectorResult<Vec<ListEntry>> {
        let descriptor = self.fetch_descriptor().await?;
        Ok(descriptor.table_entries(filter))
    }

    /// Lists the custom actions of a table; unknown tables yield nothing.
    pub async fn search_actions(
        &self,
        table: &str,
        filter: Option<&str>,
    ) -> ConnectorResult<Vec<ListEntry>> {
        let descriptor = self.fetch_descriptor().await?;
        match descriptor.resolve(table) {
            Some((_, definition)) => Ok(definition.action_entries(filter)),
            None => {
                warn!(%table, "table not in descriptor, no actions to list");
                Ok(Vec::new())
            }
        }
    }

    /// Field descriptors for the declared parameters of a custom action.
    pub async fn action_param_fields(
        &self,
        table: &str,
        action_path: &str,
    ) -> ConnectorResult<Vec<FieldDescriptor>> {
        let descriptor = self.fetch_descriptor().await?;
        Ok(descriptor
            .resolve(table)
            .map(|(_, definition)| definition.action_param_fields(action_path))
            .unwrap_or_default())
    }
}
