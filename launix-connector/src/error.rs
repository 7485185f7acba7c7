//! Connector error types.

use launix_model::ModelError;
use std::fmt;
use thiserror::Error;

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// What kind of remote resource could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Table,
    Action,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Table => f.write_str("table"),
            ResourceKind::Action => f.write_str("action"),
        }
    }
}

/// Errors that can occur while talking to the remote system.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("{kind} not found: {identifier}")]
    NotFound {
        kind: ResourceKind,
        identifier: String,
    },

    #[error("descriptor unavailable: {0}")]
    DescriptorUnavailable(String),

    #[error("action '{action}' on table '{table}' failed (params: {params}): {message}")]
    TransportFailure {
        table: String,
        action: String,
        params: String,
        message: String,
    },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {path} failed with status {status}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    #[error("remote error: {0}")]
    Api(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("item {index}: {source}")]
    Item {
        index: usize,
        source: Box<ConnectorError>,
    },
}

impl ConnectorError {
    pub fn table_not_found(identifier: impl Into<String>) -> Self {
        ConnectorError::NotFound {
            kind: ResourceKind::Table,
            identifier: identifier.into(),
        }
    }

    /// Attaches the index of the work item that failed.
    pub fn at_item(self, index: usize) -> Self {
        ConnectorError::Item {
            index,
            source: Box::new(self),
        }
    }

    /// Returns true if a table or action could not be resolved.
    pub fn is_not_found(&self) -> bool {
        match self {
            ConnectorError::NotFound { .. } => true,
            ConnectorError::Item { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Index of the failed work item, if the error came out of a batch.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            ConnectorError::Item { index, .. } => Some(*index),
            _ => None,
        }
    }
}
