//! Descriptor resolution and request dispatch for the Launix API.
//!
//! The remote system describes itself: one descriptor endpoint publishes
//! every table, its columns and its custom actions. This crate turns that
//! description into something a form builder and a workflow runner can use.
//!
//! # Components
//!
//! - **Descriptor client**: [`Connector::fetch_descriptor`], fetched fresh on
//!   every operation
//! - **Table resolver**: [`Connector::resolve_table`], tolerant of external
//!   names and display labels
//! - **Field inference**: [`Connector::infer_fields`], column → typed field
//! - **Reference options**: [`Connector::load_reference_options`], the
//!   best-effort option heuristic over another table's records
//! - **Dispatcher**: [`Connector::dispatch`], parameter merging, request
//!   building and [`ResponseClassification`]
//!
//! Record CRUD, file transfer and a per-item [`run_items`] helper complete
//! the surface.
//!
//! # Example
//!
//! ```no_run
//! use launix_connector::{Connector, ConnectorConfig};
//! use launix_model::Operation;
//!
//! # async fn run() -> launix_connector::ConnectorResult<()> {
//! let connector = Connector::new(ConnectorConfig::new("https://erp.example.com", "token"))?;
//! let fields = connector.table_fields("orders", Operation::Create).await?;
//! for field in fields {
//!     println!("{} ({:?})", field.display_name, field.field_type);
//! }
//! # Ok(())
//! # }
//! ```

mod batch;
mod client;
mod config;
mod dispatch;
mod error;
mod files;
mod inference;
mod records;
mod reference;
pub mod transport;

pub use batch::{FailurePolicy, ItemOutcome, run_items};
pub use client::Connector;
pub use config::ConnectorConfig;
pub use dispatch::{
    JSON_MIME, PDF_MIME, PreparedAction, ResponseClassification, classify_response, merge_params,
    prepare_action,
};
pub use error::{ConnectorError, ConnectorResult, ResourceKind};
pub use files::{DEFAULT_UPLOAD_NAME, UPLOAD_FIELD, UPLOAD_PATH};
pub use inference::{ColumnKind, build_field, column_kind};
pub use records::{RecordRequest, check_remote_error, parse_filter, shape_record_result};
pub use reference::{MAX_REFERENCE_OPTIONS, options_from_listing};
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, RequestBody, Transport, parse_disposition_filename,
};
