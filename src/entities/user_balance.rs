//! User balance entity - The running ledger totals, one row per user.
//!
//! `version` is bumped on every write and checked on the next one, so a writer
//! holding a stale copy of the totals cannot overwrite a newer value.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger totals database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_balance")]
pub struct Model {
    /// Owner of the totals
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    /// Spendable balance, may be negative
    pub balance: Decimal,
    /// Money set aside in savings, may be negative
    pub savings: Decimal,
    /// Optimistic concurrency token
    pub version: i64,
    /// When the totals were last written
    pub updated_at: DateTimeUtc,
}

/// `UserBalance` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
