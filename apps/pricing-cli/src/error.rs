//! Error types for the pricing CLI.

use std::path::PathBuf;

use pricing_core::PricingError;

/// Failures while loading settings or quoting a request.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid quote request: {0}")]
    Request(#[from] serde_json::Error),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

pub type CliResult<T> = Result<T, CliError>;
