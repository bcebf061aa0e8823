use thiserror::Error;

/// Configuration problems detected before any fetch or transformation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration section [{0}] is required for the selected source")]
    MissingSection(&'static str),
    #[error("no Baserow API token configured (set baserow.token, --token, or EXOMAG_TOKEN)")]
    MissingToken,
}
