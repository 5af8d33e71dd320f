//! # Settings
//!
//! Resolves the [`PricingConfig`] the CLI prices with.
//!
//! ## Load Order (later overrides earlier)
//! 1. Default values
//! 2. Config file (`pricing.toml`, or `--config <path>`)
//! 3. Environment variables
//!
//! | Variable                  | Field             |
//! |---------------------------|-------------------|
//! | `PRICING_GLOBAL_DISCOUNT` | `global_discount` |
//! | `PRICING_GLOBAL_TAX_RATE` | `global_tax_rate` |
//! | `PRICING_FIRE_EVENTS`     | `fire_events`     |
//! | `PRICING_TAX_BASE`        | `tax_base`        |
//!
//! Values that do not parse are logged and skipped.

use std::path::{Path, PathBuf};

use pricing_core::{Percent, PricingConfig, TaxBase};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

pub const DEFAULT_CONFIG_FILE: &str = "pricing.toml";

pub const ENV_GLOBAL_DISCOUNT: &str = "PRICING_GLOBAL_DISCOUNT";
pub const ENV_GLOBAL_TAX_RATE: &str = "PRICING_GLOBAL_TAX_RATE";
pub const ENV_FIRE_EVENTS: &str = "PRICING_FIRE_EVENTS";
pub const ENV_TAX_BASE: &str = "PRICING_TAX_BASE";

/// Loads configuration from file, environment, and defaults.
///
/// An explicit `config_path` must exist; the default file is optional.
pub fn load(config_path: Option<&Path>) -> CliResult<PricingConfig> {
    let mut config = match config_path {
        Some(path) if !path.exists() => return Err(CliError::ConfigNotFound(path.to_path_buf())),
        Some(path) => read_file(path)?,
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if path.exists() {
                read_file(&path)?
            } else {
                debug!(?path, "Config file not found, using defaults");
                PricingConfig::default()
            }
        }
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    config.validate()?;

    Ok(config)
}

/// Parses a TOML config file.
pub fn read_file(path: &Path) -> CliResult<PricingConfig> {
    info!(?path, "Loading pricing config from file");

    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&contents).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Applies `PRICING_*` overrides using `lookup` to read variables.
pub fn apply_overrides<F>(config: &mut PricingConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(discount) = parse_var::<f64, _>(&lookup, ENV_GLOBAL_DISCOUNT) {
        debug!(discount, "Overriding global discount from environment");
        config.global_discount = Percent::new(discount);
    }

    if let Some(rate) = parse_var::<f64, _>(&lookup, ENV_GLOBAL_TAX_RATE) {
        debug!(rate, "Overriding global tax rate from environment");
        config.global_tax_rate = Percent::new(rate);
    }

    if let Some(enabled) = parse_var::<bool, _>(&lookup, ENV_FIRE_EVENTS) {
        config.fire_events = enabled;
    }

    if let Some(base) = parse_var::<TaxBase, _>(&lookup, ENV_TAX_BASE) {
        debug!(%base, "Overriding tax base from environment");
        config.tax_base = base;
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable environment value");
            None
        }
    }
}
