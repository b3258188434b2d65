//! Application settings loaded from config.toml
//!
//! The file names the user whose ledger the binary operates on, the totals to seed
//! when that user has no balance row yet, and the categories to create on first run.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Owner of the ledger
    pub user_id: String,
    /// Opening totals, used only when no balance row exists
    #[serde(default)]
    pub seed: SeedConfig,
    /// Categories to create if missing
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

/// Opening ledger totals
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    /// Opening spendable balance
    #[serde(default)]
    pub balance: Decimal,
    /// Opening savings
    #[serde(default)]
    pub savings: Decimal,
}

/// Configuration for a single category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Category name, unique per user
    pub name: String,
    /// Display color; empty means "use a generated hue"
    #[serde(default)]
    pub color: String,
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read, the TOML is invalid,
/// or `user_id` is missing or blank.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads settings from `FINZZ_CONFIG`, or `./config.toml` when it is unset.
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var("FINZZ_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}

fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    if config.user_id.trim().is_empty() {
        return Err(Error::Config {
            message: "user_id must not be empty".to_string(),
        });
    }
    Ok(config)
}
