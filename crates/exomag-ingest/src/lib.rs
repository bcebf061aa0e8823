//! Case-record ingestion for the ExomAG transfer pipeline.
//!
//! Fetches the root collection and its linked tables from the configured
//! source, then resolves link fields into embedded sub-records and injects
//! the internal case identifier. Downstream, the transformation engine only
//! ever sees fully expanded [`Record`]s.

use std::collections::BTreeMap;

use exomag_model::{Record, SourceKind, TransferConfig};

pub mod baserow;
pub mod error;
pub mod expand;
pub mod file;
pub mod json;

pub use error::IngestError;
pub use expand::expand_links;

/// Raw fetch result: the root collection in source order plus one id-keyed
/// map per declared link table.
#[derive(Debug, Clone)]
pub struct SourceData {
    pub root: Vec<(String, Record)>,
    pub links: BTreeMap<String, BTreeMap<String, Record>>,
}

/// Fetch from the configured source, without expansion.
pub fn fetch(config: &TransferConfig) -> Result<SourceData, IngestError> {
    match config.source.kind {
        SourceKind::Baserow => baserow::fetch(config.baserow()?),
        SourceKind::Json => file::load(&config.json()?.path),
    }
}

/// Fetch and expand: the record collection ready for transformation.
pub fn fetch_expanded(config: &TransferConfig) -> Result<Vec<Record>, IngestError> {
    let data = fetch(config)?;
    expand_links(data, &config.case_id)
}
