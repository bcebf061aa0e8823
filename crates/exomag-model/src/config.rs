//! Transfer configuration.
//!
//! Everything the pipeline needs is carried in an explicit [`TransferConfig`]
//! passed down from the binary; there is no ambient global settings object.
//! The CLI deserializes it from a TOML file, but nothing in the pipeline
//! depends on where the values came from.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which external system the case records are fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Live Baserow database via its REST API.
    Baserow,
    /// Local JSON dump with the same shape as a Baserow fetch result.
    Json,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Baserow => f.write_str("baserow"),
            SourceKind::Json => f.write_str("json"),
        }
    }
}

/// Which of the two mapping-table variants to export.
///
/// The registry template exists in two flavors with identical column
/// structure: one reports patient age in months at the inclusion date, the
/// other in years at the lab-entry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableVariant {
    #[default]
    Inclusion,
    LabEntry,
}

impl fmt::Display for TableVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableVariant::Inclusion => f.write_str("inclusion"),
            TableVariant::LabEntry => f.write_str("lab-entry"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOptions {
    pub kind: SourceKind,
}

/// Connection settings for the Baserow source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaserowOptions {
    /// Base URL of the Baserow instance.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API token. May be omitted in the file and supplied via the CLI or
    /// environment instead.
    #[serde(default)]
    pub token: Option<String>,

    /// Table holding the case records.
    pub root_table_id: u64,

    /// Link field name -> table id of the linked collection. Every name
    /// listed here is resolved into embedded sub-records during expansion.
    #[serde(default)]
    pub link_tables: BTreeMap<String, u64>,
}

fn default_api_url() -> String {
    "https://api.baserow.io".to_string()
}

/// Settings for the local JSON dump source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOptions {
    pub path: PathBuf,
}

/// Derived internal case identifier injected during link expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseIdOptions {
    #[serde(default = "default_case_field")]
    pub field: String,
    #[serde(default = "default_case_prefix")]
    pub prefix: String,
}

fn default_case_field() -> String {
    "Medgen ID".to_string()
}

fn default_case_prefix() -> String {
    "SV-".to_string()
}

impl Default for CaseIdOptions {
    fn default() -> Self {
        Self {
            field: default_case_field(),
            prefix: default_case_prefix(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportOptions {
    #[serde(default)]
    pub variant: TableVariant,
}

/// Full configuration for one transfer run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    pub source: SourceOptions,

    #[serde(default)]
    pub baserow: Option<BaserowOptions>,

    #[serde(default)]
    pub json: Option<JsonOptions>,

    #[serde(default)]
    pub export: ExportOptions,

    #[serde(default)]
    pub case_id: CaseIdOptions,
}

impl TransferConfig {
    /// Check that the selected source has its settings section. Runs before
    /// any fetch so configuration mistakes never reach the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.source.kind {
            SourceKind::Baserow => {
                let baserow = self.baserow()?;
                if baserow.token.as_deref().is_none_or(str::is_empty) {
                    return Err(ConfigError::MissingToken);
                }
            }
            SourceKind::Json => {
                self.json()?;
            }
        }
        Ok(())
    }

    pub fn baserow(&self) -> Result<&BaserowOptions, ConfigError> {
        self.baserow
            .as_ref()
            .ok_or(ConfigError::MissingSection("baserow"))
    }

    pub fn json(&self) -> Result<&JsonOptions, ConfigError> {
        self.json
            .as_ref()
            .ok_or(ConfigError::MissingSection("json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_baserow_config() {
        let config: TransferConfig = toml::from_str(
            r#"
            [source]
            kind = "baserow"

            [baserow]
            token = "tok"
            root_table_id = 1042

            [baserow.link_tables]
            Clinician = 1043
            Findings = 1044
            "#,
        )
        .expect("parse config");

        assert_eq!(config.source.kind, SourceKind::Baserow);
        assert_eq!(config.export.variant, TableVariant::Inclusion);
        assert_eq!(config.case_id.field, "Medgen ID");
        assert_eq!(config.case_id.prefix, "SV-");

        let baserow = config.baserow().unwrap();
        assert_eq!(baserow.api_url, "https://api.baserow.io");
        assert_eq!(baserow.root_table_id, 1042);
        assert_eq!(baserow.link_tables.len(), 2);
        config.validate().expect("valid");
    }

    #[test]
    fn rejects_unknown_source_kind() {
        let result: Result<TransferConfig, _> = toml::from_str(
            r#"
            [source]
            kind = "redcap"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn baserow_without_token_fails_validation() {
        let config: TransferConfig = toml::from_str(
            r#"
            [source]
            kind = "baserow"

            [baserow]
            root_table_id = 1
            "#,
        )
        .expect("parse config");

        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingToken)
        ));
    }

    #[test]
    fn variant_parses_kebab_case() {
        let config: TransferConfig = toml::from_str(
            r#"
            [source]
            kind = "json"

            [json]
            path = "dump.json"

            [export]
            variant = "lab-entry"
            "#,
        )
        .expect("parse config");

        assert_eq!(config.export.variant, TableVariant::LabEntry);
        config.validate().expect("valid");
    }
}
