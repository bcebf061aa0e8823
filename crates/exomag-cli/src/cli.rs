//! CLI argument definitions for the ExomAG transfer tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use exomag_model::TableVariant;

#[derive(Parser)]
#[command(
    name = "exomag-transfer",
    version,
    about = "Transfer exome diagnostics cases to the ExomAG registry format",
    long_about = "Fetch case records from Baserow (or a local JSON dump), resolve\n\
                  linked clinician and finding records, and export the registry\n\
                  template as CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow record-level (patient) values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch, transform, and write the registry export.
    Export(ExportArgs),

    /// List the destination columns of each mapping-table variant.
    Columns,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Path of the CSV file to write.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Configuration file.
    #[arg(long = "config", value_name = "PATH", default_value = "exomag.toml")]
    pub config: PathBuf,

    /// Mapping-table variant (overrides the configured one).
    #[arg(long = "table", value_enum)]
    pub table: Option<TableArg>,

    /// Baserow API token (overrides baserow.token and EXOMAG_TOKEN).
    #[arg(long = "token", value_name = "TOKEN")]
    pub token: Option<String>,

    /// Fetch and transform without writing the export file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TableArg {
    Inclusion,
    LabEntry,
}

impl From<TableArg> for TableVariant {
    fn from(value: TableArg) -> Self {
        match value {
            TableArg::Inclusion => TableVariant::Inclusion,
            TableArg::LabEntry => TableVariant::LabEntry,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
