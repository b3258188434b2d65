//! Ledger totals persistence - reading, seeding and replacing a user's balance row.
//!
//! Writes are full replacements of both scalars guarded by the row's `version`: the
//! update only matches if nobody else wrote since the caller read the row.

use crate::{
    core::effect::Totals,
    entities::{UserBalance, user_balance},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*, sea_query::Expr};
use tracing::{debug, info, instrument, warn};

/// Reads the totals row for a user, if one exists.
#[instrument(skip(db))]
pub async fn get_balance<C>(db: &C, user_id: &str) -> Result<Option<user_balance::Model>>
where
    C: ConnectionTrait,
{
    UserBalance::find_by_id(user_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the user's totals row, creating it from `seed` if it is missing.
///
/// An existing row is returned untouched; the seed only matters on first run.
#[instrument(skip(db))]
pub async fn ensure_balance<C>(db: &C, user_id: &str, seed: Totals) -> Result<user_balance::Model>
where
    C: ConnectionTrait,
{
    if let Some(existing) = get_balance(db, user_id).await? {
        debug!("Balance row already present for {}", user_id);
        return Ok(existing);
    }

    let row = user_balance::ActiveModel {
        user_id: Set(user_id.to_string()),
        balance: Set(seed.balance),
        savings: Set(seed.savings),
        version: Set(0),
        updated_at: Set(chrono::Utc::now()),
    };
    let created = row.insert(db).await?;
    info!(
        "Seeded balance for {}: balance={} savings={}",
        user_id, created.balance, created.savings
    );
    Ok(created)
}

/// Replaces both totals, provided the stored row still carries `current.version`.
///
/// # Returns
/// The row as written, with `version` advanced by one.
///
/// # Errors
/// * [`Error::BalanceNotFound`] if the user has no totals row
/// * [`Error::ConcurrentModification`] if the row was written since `current` was read
pub async fn replace_totals<C>(
    db: &C,
    current: &user_balance::Model,
    totals: Totals,
) -> Result<user_balance::Model>
where
    C: ConnectionTrait,
{
    let now = chrono::Utc::now();
    let next_version = current.version + 1;

    let result = UserBalance::update_many()
        .col_expr(user_balance::Column::Balance, Expr::value(totals.balance))
        .col_expr(user_balance::Column::Savings, Expr::value(totals.savings))
        .col_expr(user_balance::Column::Version, Expr::value(next_version))
        .col_expr(user_balance::Column::UpdatedAt, Expr::value(now))
        .filter(user_balance::Column::UserId.eq(current.user_id.as_str()))
        .filter(user_balance::Column::Version.eq(current.version))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        let user_id = current.user_id.clone();
        return if get_balance(db, &user_id).await?.is_none() {
            Err(Error::BalanceNotFound { user_id })
        } else {
            warn!(
                "Version {} of balance for {} is stale; refusing to overwrite",
                current.version, user_id
            );
            Err(Error::ConcurrentModification { user_id })
        };
    }

    debug!(
        "Balance for {} now {} / {} (version {})",
        current.user_id, totals.balance, totals.savings, next_version
    );
    Ok(user_balance::Model {
        user_id: current.user_id.clone(),
        balance: totals.balance,
        savings: totals.savings,
        version: next_version,
        updated_at: now,
    })
}
