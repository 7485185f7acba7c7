//! Options for columns that point at another table.

use launix_model::{extract_records, record_to_option, OptionList, SelectOption};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::client::Connector;
use crate::error::ConnectorResult;
use crate::transport::{ApiRequest, Transport};

/// Records considered per reference listing. There is no pagination; later
/// records are never offered.
pub const MAX_REFERENCE_OPTIONS: usize = 200;

/// Converts a listing response into deduplicated options.
pub fn options_from_listing(response: &Value) -> Vec<SelectOption> {
    extract_records(response)
        .iter()
        .take(MAX_REFERENCE_OPTIONS)
        .filter_map(record_to_option)
        .collect::<OptionList>()
        .into_vec()
}

impl<T: Transport> Connector<T> {
    /// Lists the referenced table and turns its records into options.
    ///
    /// Never fails: any error is logged and yields an empty list.
    pub async fn load_reference_options(&self, table: &str) -> Vec<SelectOption> {
        match self.fetch_reference_listing(table).await {
            Ok(listing) => {
                let options = options_from_listing(&listing);
                debug!(%table, options = options.len(), "loaded reference options");
                options
            }
            Err(e) => {
                warn!(%table, error = %e, "reference listing failed, offering no options");
                Vec::new()
            }
        }
    }

    async fn fetch_reference_listing(&self, table: &str) -> ConnectorResult<Value> {
        let path = self.config().table_path(table, "list");
        self.transport()
            .execute(ApiRequest::post_json(&path, json!({})))
            .await?
            .error_for_status(&path)?
            .json()
    }
}
