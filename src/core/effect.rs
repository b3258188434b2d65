//! Ledger arithmetic - the per-type effect table and the totals it acts on.
//!
//! | Type               | Δbalance | Δsavings |
//! |--------------------|----------|----------|
//! | `income`           | +amount  | 0        |
//! | `expense`          | −amount  | 0        |
//! | `savings_transfer` | −amount  | +amount  |
//! | `savings_withdraw` | +amount  | −amount  |
//!
//! Deleting a transaction applies the negated row, so an add followed by a delete of
//! the same transaction leaves the totals exactly where they were.

use crate::entities::{TransactionType, transaction, user_balance};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Signed change a transaction applies to the ledger totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    /// Change to the spendable balance
    pub balance: Decimal,
    /// Change to savings
    pub savings: Decimal,
}

impl Effect {
    /// Looks up the effect row for a transaction type and amount.
    #[must_use]
    pub fn of(transaction_type: TransactionType, amount: Decimal) -> Self {
        match transaction_type {
            TransactionType::Income => Self {
                balance: amount,
                savings: Decimal::ZERO,
            },
            TransactionType::Expense => Self {
                balance: -amount,
                savings: Decimal::ZERO,
            },
            TransactionType::SavingsTransfer => Self {
                balance: -amount,
                savings: amount,
            },
            TransactionType::SavingsWithdraw => Self {
                balance: amount,
                savings: -amount,
            },
        }
    }

    /// Effect of an already recorded transaction.
    #[must_use]
    pub fn of_transaction(transaction: &transaction::Model) -> Self {
        Self::of(transaction.transaction_type, transaction.amount)
    }

    /// The inverse effect, used when a transaction is deleted.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            balance: -self.balance,
            savings: -self.savings,
        }
    }
}

/// The pair of running totals. Both may go negative; no floor is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Spendable balance
    pub balance: Decimal,
    /// Money set aside in savings
    pub savings: Decimal,
}

impl Totals {
    /// Creates totals from explicit values.
    #[must_use]
    pub const fn new(balance: Decimal, savings: Decimal) -> Self {
        Self { balance, savings }
    }

    /// Totals after recording a transaction with `effect`.
    #[must_use]
    pub fn apply(self, effect: Effect) -> Self {
        Self {
            balance: self.balance + effect.balance,
            savings: self.savings + effect.savings,
        }
    }

    /// Totals after removing a transaction with `effect`.
    #[must_use]
    pub fn revert(self, effect: Effect) -> Self {
        self.apply(effect.reversed())
    }
}

impl From<&user_balance::Model> for Totals {
    fn from(model: &user_balance::Model) -> Self {
        Self::new(model.balance, model.savings)
    }
}
