//! Transfer pipeline orchestration.
//!
//! The linear pipeline is fetch -> expand-links -> filter -> transform ->
//! export, with no retries and no partial-success states: any failing
//! record aborts the run before the export file is written.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, trace};

use exomag_export::write_csv;
use exomag_ingest::fetch_expanded;
use exomag_model::{TransferConfig, Value};
use exomag_transform::{profile, transform_all};

use crate::logging::redact_value;
use crate::types::RunSummary;

/// Load and parse a TOML configuration file.
pub fn load_config(path: &Path) -> Result<TransferConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read configuration file {}", path.display()))?;
    let config: TransferConfig = toml::from_str(&text)
        .with_context(|| format!("cannot parse configuration file {}", path.display()))?;
    Ok(config)
}

/// Run the full transfer. An `output` of `None` is a dry run: fetch and
/// transform everything, write nothing.
pub fn run_transfer(config: &TransferConfig, output: Option<&Path>) -> Result<RunSummary> {
    config.validate().context("invalid configuration")?;

    let records = fetch_expanded(config).context("fetching case records")?;
    for record in &records {
        let case = record
            .get(&config.case_id.field)
            .and_then(Value::as_text)
            .unwrap_or("");
        trace!(case = redact_value(case), "expanded case record");
    }

    let profile = profile(config.export.variant);
    let export = transform_all(records.iter(), &profile.table, &profile.filters)
        .context("transforming case records")?;

    if let Some(path) = output {
        write_csv(&export, path).context("writing export file")?;
    } else {
        info!("dry run, no export file written");
    }

    Ok(RunSummary {
        variant: profile.variant,
        fetched: records.len(),
        excluded: records.len() - export.row_count(),
        exported: export.row_count(),
        columns: export.columns.len(),
        output: output.map(Path::to_path_buf),
    })
}
