//! Shared test utilities for `finzz`.
//!
//! Helpers for setting up in-memory databases and ledgers, plus builders for
//! transactions and categories that never touch a database.

use crate::{
    core::{
        balance,
        effect::Totals,
        ledger::Ledger,
        notify::MemoryNotifier,
        transaction::{NewTransaction, TransactionEntry},
    },
    entities::{TransactionType, category, transaction},
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// User most tests act as.
pub const TEST_USER: &str = "test_user";
/// A second user for isolation tests.
pub const OTHER_USER: &str = "other_user";

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes tracing output through the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("finzz=debug"))
        .with_test_writer()
        .try_init();
}

/// Builds a date, panicking on an invalid one.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A new uncategorized transaction dated 2024-01-05.
pub fn new_transaction(transaction_type: TransactionType, amount: i64) -> NewTransaction {
    NewTransaction {
        transaction_type,
        amount: Decimal::from(amount),
        category_id: None,
        description: None,
        date: date(2024, 1, 5),
    }
}

/// A ledger for [`TEST_USER`] over a fresh database, loaded with `seed` as its totals.
///
/// Returns the ledger and a handle to its notifier.
pub async fn setup_ledger(seed: Totals) -> Result<(Ledger<MemoryNotifier>, MemoryNotifier)> {
    let db = setup_test_db().await?;
    balance::ensure_balance(&db, TEST_USER, seed).await?;

    let notifier = MemoryNotifier::new();
    let mut ledger = Ledger::new(db, TEST_USER, notifier.clone());
    ledger.load().await;
    Ok((ledger, notifier))
}

/// A category model that was never stored.
pub fn test_category(id: i64, name: &str, color: &str) -> category::Model {
    category::Model {
        id,
        user_id: TEST_USER.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        created_at: chrono::Utc::now(),
    }
}

/// A joined transaction that was never stored. `day` is `YYYY-MM-DD`.
#[allow(clippy::unwrap_used)]
pub fn entry(
    id: i64,
    transaction_type: TransactionType,
    amount: i64,
    day: &str,
    category: Option<&category::Model>,
) -> TransactionEntry {
    TransactionEntry {
        transaction: transaction::Model {
            id,
            user_id: TEST_USER.to_string(),
            transaction_type,
            amount: Decimal::from(amount),
            category_id: category.map(|c| c.id),
            description: None,
            date: NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
            created_at: chrono::Utc::now(),
        },
        category: category.cloned(),
    }
}
