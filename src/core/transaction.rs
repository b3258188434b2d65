//! Transaction persistence - inserting, deleting and listing a user's transaction rows.
//!
//! These functions touch only the `transactions` table. Keeping the totals in step
//! with the log is the ledger's job (see [`crate::core::ledger`]), which calls these
//! inside the same database transaction as the totals update.

use crate::{
    core::category,
    entities::{Category, Transaction, TransactionType, category as category_entity, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Input for a new transaction row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Kind of transaction
    pub transaction_type: TransactionType,
    /// Magnitude, must not be negative
    pub amount: Decimal,
    /// Optional category of the same user
    pub category_id: Option<i64>,
    /// Optional free-text note
    pub description: Option<String>,
    /// Attributed day
    pub date: NaiveDate,
}

/// A transaction together with its category, if it has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionEntry {
    /// The stored transaction
    pub transaction: transaction::Model,
    /// The joined category, `None` when uncategorized or the category is gone
    pub category: Option<category_entity::Model>,
}

/// Inserts a transaction row for the user.
///
/// Rejects negative amounts with [`Error::InvalidAmount`] and category ids the user
/// does not own with [`Error::CategoryNotFound`]. Blank descriptions are stored as `None`.
#[instrument(skip(db))]
pub async fn insert_transaction<C>(
    db: &C,
    user_id: &str,
    new: NewTransaction,
) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    if new.amount < Decimal::ZERO {
        return Err(Error::InvalidAmount { amount: new.amount });
    }

    if let Some(category_id) = new.category_id {
        category::get_category_by_id(db, user_id, category_id)
            .await?
            .ok_or(Error::CategoryNotFound { id: category_id })?;
    }

    let description = new
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let model = transaction::ActiveModel {
        user_id: Set(user_id.to_string()),
        transaction_type: Set(new.transaction_type),
        amount: Set(new.amount),
        category_id: Set(new.category_id),
        description: Set(description),
        date: Set(new.date),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let inserted = model.insert(db).await?;
    debug!(
        "Inserted {} transaction {} of {} on {}",
        inserted.transaction_type, inserted.id, inserted.amount, inserted.date
    );
    Ok(inserted)
}

/// Deletes a transaction row owned by the user.
///
/// Returns [`Error::TransactionNotFound`] when nothing was deleted, so a caller cannot
/// reverse the same transaction twice.
#[instrument(skip(db))]
pub async fn delete_transaction_record<C>(db: &C, user_id: &str, transaction_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Transaction::delete_many()
        .filter(transaction::Column::Id.eq(transaction_id))
        .filter(transaction::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        warn!("Transaction {} not found for {}", transaction_id, user_id);
        return Err(Error::TransactionNotFound { id: transaction_id });
    }
    Ok(())
}

/// Retrieves a transaction by id, returning None if missing or owned by another user.
#[instrument(skip(db))]
pub async fn get_transaction_by_id<C>(
    db: &C,
    user_id: &str,
    transaction_id: i64,
) -> Result<Option<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find_by_id(transaction_id)
        .filter(transaction::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the user's transactions joined with their categories, newest first.
///
/// Ordered by date descending, then by creation descending.
#[instrument(skip(db))]
pub async fn list_transactions<C>(db: &C, user_id: &str) -> Result<Vec<TransactionEntry>>
where
    C: ConnectionTrait,
{
    let rows = Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::CreatedAt)
        .order_by_desc(transaction::Column::Id)
        .find_also_related(Category)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(transaction, category)| TransactionEntry {
            transaction,
            category,
        })
        .collect())
}
