//! Subcommand implementations.

use anyhow::Result;

use exomag_cli::pipeline::{load_config, run_transfer};
use exomag_cli::types::RunSummary;

use crate::cli::ExportArgs;

const TOKEN_ENV: &str = "EXOMAG_TOKEN";

pub fn run_export(args: &ExportArgs) -> Result<RunSummary> {
    let mut config = load_config(&args.config)?;

    if let Some(table) = args.table {
        config.export.variant = table.into();
    }
    if let Some(baserow) = config.baserow.as_mut()
        && let Some(token) = resolve_token(args.token.as_deref())
    {
        baserow.token = Some(token);
    }

    let output = if args.dry_run {
        None
    } else {
        Some(args.output.as_path())
    };
    run_transfer(&config, output)
}

/// CLI flag wins over the environment; the config file is the fallback.
fn resolve_token(flag: Option<&str>) -> Option<String> {
    if let Some(token) = flag {
        return Some(token.to_string());
    }
    std::env::var(TOKEN_ENV)
        .ok()
        .filter(|token| !token.is_empty())
}
