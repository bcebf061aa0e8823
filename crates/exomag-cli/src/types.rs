use std::path::PathBuf;

use exomag_model::TableVariant;

/// Counts reported after a transfer run.
#[derive(Debug)]
pub struct RunSummary {
    pub variant: TableVariant,
    pub fetched: usize,
    pub excluded: usize,
    pub exported: usize,
    pub columns: usize,
    /// Written file, `None` for dry runs.
    pub output: Option<PathBuf>,
}
