use serde::{Deserialize, Serialize};

/// Fallback mime type for binary content without a declared type.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A named binary buffer, as produced by file downloads and PDF actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryPayload {
    pub file_name: String,
    pub mime_type: String,
    #[serde(default, skip_serializing)]
    pub data: Vec<u8>,
}

impl BinaryPayload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Name to save the payload under in a local directory.
    ///
    /// Only the final path component of the announced name is kept, so a
    /// remote name can never point outside the target directory. Falls back
    /// to `fallback` when nothing usable remains.
    pub fn local_file_name(&self, fallback: &str) -> String {
        match self.file_name.rsplit(['/', '\\']).next() {
            Some(name) if !matches!(name, "" | "." | "..") => name.to_string(),
            _ => fallback.to_string(),
        }
    }
}
