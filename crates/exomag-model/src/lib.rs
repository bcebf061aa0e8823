//! Data model for the ExomAG transfer pipeline.
//!
//! Defines the field-value sum type and [`Record`] bag produced by ingest,
//! the flat [`ExportTable`] consumed by the export writer, and the explicit
//! [`TransferConfig`] threaded through the pipeline.

pub mod config;
pub mod error;
pub mod record;
pub mod table;

pub use config::{
    BaserowOptions, CaseIdOptions, ExportOptions, JsonOptions, SourceKind, SourceOptions,
    TableVariant, TransferConfig,
};
pub use error::ConfigError;
pub use record::{Record, Value};
pub use table::{CellValue, ExportTable};
