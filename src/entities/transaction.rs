//! Transaction entity - One entry in a user's ledger log.
//!
//! Each transaction has a `transaction_type`, a non-negative `amount`, an optional
//! `category_id`, an optional description and the calendar `date` it is attributed to.
//! Rows are immutable once written; deleting one reverses its effect on the totals.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The closed set of transaction kinds. The sign of the amount is implied by the kind.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money coming in
    #[sea_orm(string_value = "income")]
    Income,
    /// Money going out
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Money moved from the balance into savings
    #[sea_orm(string_value = "savings_transfer")]
    SavingsTransfer,
    /// Money moved from savings back into the balance
    #[sea_orm(string_value = "savings_withdraw")]
    SavingsWithdraw,
}

impl TransactionType {
    /// The stored name, e.g. `"savings_transfer"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::SavingsTransfer => "savings_transfer",
            Self::SavingsWithdraw => "savings_withdraw",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the transaction
    pub user_id: String,
    /// Income, expense, or a move between balance and savings
    pub transaction_type: TransactionType,
    /// Magnitude of the transaction, never negative
    pub amount: Decimal,
    /// Optional category of the same user
    pub category_id: Option<i64>,
    /// Optional free-text note
    pub description: Option<String>,
    /// Calendar day the transaction is attributed to
    pub date: Date,
    /// When the row was written
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A transaction optionally belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
