//! Declarative field-mapping transformation engine.
//!
//! Converts irregular, link-expanded case records into the fixed ExomAG
//! registry schema. A [`MappingTable`] binds each destination column to
//! source fields and a chain of [`Step`]s; the driver applies the table to
//! filtered records and assembles the flat export. Steps are plain data
//! interpreted by folding, so mapping tables are serializable and testable
//! in isolation.

pub mod datetime;
pub mod driver;
pub mod error;
pub mod filter;
pub mod hpo;
pub mod pipeline;
pub mod steps;
pub mod tables;

pub use driver::{transform, transform_all};
pub use error::TransformError;
pub use filter::{FilterRule, passes};
pub use pipeline::{Mapping, MappingTable, Pipeline};
pub use steps::{AgeUnit, LookupFallback, Step};
pub use tables::{ExportProfile, profile};
