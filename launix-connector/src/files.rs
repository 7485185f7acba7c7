//! File download and upload.

use launix_model::{BinaryPayload, OCTET_STREAM};
use reqwest::Method;
use serde_json::Value;
use tracing::info;

use crate::client::Connector;
use crate::error::ConnectorResult;
use crate::records::check_remote_error;
use crate::transport::{ApiRequest, Transport};

/// Upload endpoint; `x=-1` targets a new file slot.
pub const UPLOAD_PATH: &str = "FOP/Files/upload?x=-1";
/// Multipart field the upload endpoint reads.
pub const UPLOAD_FIELD: &str = "file_-1";
pub const DEFAULT_UPLOAD_NAME: &str = "upload.bin";

impl<T: Transport> Connector<T> {
    /// Downloads a stored file by id.
    pub async fn retrieve_file(&self, file_id: &str) -> ConnectorResult<BinaryPayload> {
        let path = format!("files/{}/x", urlencoding::encode(file_id));
        let response = self
            .transport()
            .execute(ApiRequest::get(&path))
            .await?
            .error_for_status(&path)?;

        let file_name = response
            .disposition_filename()
            .unwrap_or_else(|| format!("file_{file_id}"));
        let mime_type = match response.content_type() {
            "" => OCTET_STREAM.to_string(),
            content_type => content_type.to_string(),
        };
        info!(%file_id, %file_name, bytes = response.body.len(), "retrieved file");
        Ok(BinaryPayload::new(file_name, mime_type, response.body))
    }

    /// Uploads a file and returns the remote system's answer.
    pub async fn upload_file(&self, mut payload: BinaryPayload) -> ConnectorResult<Value> {
        if payload.file_name.is_empty() {
            payload.file_name = DEFAULT_UPLOAD_NAME.to_string();
        }
        if payload.mime_type.is_empty() {
            payload.mime_type = OCTET_STREAM.to_string();
        }
        let file_name = payload.file_name.clone();
        let bytes = payload.len();

        let request = ApiRequest::new(Method::POST, UPLOAD_PATH).with_file(UPLOAD_FIELD, payload);
        let result = self
            .transport()
            .execute(request)
            .await?
            .error_for_status(UPLOAD_PATH)?
            .json()?;
        let result = check_remote_error(result)?;

        info!(%file_name, bytes, "uploaded file");
        Ok(result)
    }
}
