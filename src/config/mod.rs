/// Database configuration and connection management
pub mod database;

/// Ledger owner, seed totals and default categories from config.toml
pub mod settings;
