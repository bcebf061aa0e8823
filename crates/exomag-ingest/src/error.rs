use thiserror::Error;

use exomag_model::ConfigError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("baserow request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("baserow returned HTTP {status} for table {table_id}")]
    Api { status: u16, table_id: u64 },

    #[error("cannot read source dump: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse source data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("source dump is malformed: {0}")]
    Dump(String),

    #[error("record {record} lacks declared link field \"{field}\"")]
    MissingLinkField { record: String, field: String },

    #[error("link field \"{field}\" references unknown row {id}")]
    UnknownLink { field: String, id: String },
}
