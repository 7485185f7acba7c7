//! Data model for the Launix connector.
//!
//! Defines the pure, I/O-free half of the connector:
//! - [`Descriptor`]: the remote schema, normalized at the boundary
//! - [`FieldDescriptor`]: a typed, form-ready view of one column
//! - [`SelectOption`] / [`OptionValue`]: selectable choices and their values
//! - [`record_to_option`]: the best-effort option heuristic for reference rows
//!
//! The connector crate fetches descriptors and records over HTTP and feeds
//! them through these types.

mod descriptor;
mod error;
mod field;
mod option;
mod payload;
mod record;

pub use descriptor::{
    ActionDefinition, ColumnDefinition, ColumnType, DEFAULT_ACTION_METHOD, Descriptor, RawOptions,
    TableDefinition, is_truthy,
};
pub use error::{ModelError, ModelResult};
pub use field::{FieldDescriptor, FieldType, ListEntry, Operation};
pub use option::{
    OptionList, OptionValue, SelectOption, coerce_number, display_string, option_value,
};
pub use payload::{BinaryPayload, OCTET_STREAM};
pub use record::{
    LABEL_KEYS, LabelStrategy, MAX_READABLE_DEPTH, READABLE_KEYS, RECORD_LIST_KEYS, VALUE_KEYS,
    ValueStrategy, extract_records, find_readable_string, mentions_value, record_to_option,
};
