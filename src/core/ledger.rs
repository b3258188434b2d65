//! The ledger service - one user's session over the transaction log and its totals.
//!
//! A [`Ledger`] owns the connection, the user id, a [`Notifier`] and a mirror of the
//! user's transactions, categories and totals. Every mutation goes through it:
//!
//! 1. persist the transaction change,
//! 2. persist the new totals,
//! 3. refetch the transaction list.
//!
//! Steps 1 and 2 run inside one database transaction, so a failure in either leaves
//! nothing committed and the in-memory totals untouched. `&mut self` serializes
//! mutations within a session. Across sessions the totals row carries a version that
//! is checked on write: a writer holding stale totals gets
//! [`Error::ConcurrentModification`] and must reload. Conflicts are reported, never
//! merged or retried.

use crate::{
    core::{
        balance, category,
        effect::{Effect, Totals},
        notify::{Notification, Notifier},
        transaction::{self, NewTransaction, TransactionEntry},
    },
    entities::{
        TransactionType, category as category_entity, transaction as transaction_entity,
        user_balance,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, error, info, instrument, warn};

/// A single user's ledger session.
pub struct Ledger<N: Notifier> {
    db: DatabaseConnection,
    user_id: String,
    notifier: N,
    transactions: Vec<TransactionEntry>,
    categories: Vec<category_entity::Model>,
    balance: Option<user_balance::Model>,
    loading: bool,
}

impl<N: Notifier> Ledger<N> {
    /// Creates an empty session. Call [`Ledger::load`] to populate it.
    pub fn new(db: DatabaseConnection, user_id: impl Into<String>, notifier: N) -> Self {
        Self {
            db,
            user_id: user_id.into(),
            notifier,
            transactions: Vec::new(),
            categories: Vec::new(),
            balance: None,
            loading: true,
        }
    }

    /// The user this session belongs to.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Ends the session and hands back its connection.
    #[must_use]
    pub fn into_connection(self) -> DatabaseConnection {
        self.db
    }

    /// Transactions as of the last refresh, newest first.
    #[must_use]
    pub fn transactions(&self) -> &[TransactionEntry] {
        &self.transactions
    }

    /// Categories as of the last refresh, ordered by name.
    #[must_use]
    pub fn categories(&self) -> &[category_entity::Model] {
        &self.categories
    }

    /// Current totals; zero until the balance row has been read.
    #[must_use]
    pub fn balance(&self) -> Totals {
        self.balance.as_ref().map(Totals::from).unwrap_or_default()
    }

    /// `true` until the first [`Ledger::load`] finishes.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Reads totals, categories and transactions.
    ///
    /// Read failures are logged and leave the affected state as it was.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn load(&mut self) {
        self.refresh_balance().await;
        self.refresh_categories().await;
        self.refresh_transactions().await;
        self.loading = false;
        debug!(
            "Ledger loaded: {} transactions, {} categories",
            self.transactions.len(),
            self.categories.len()
        );
    }

    /// Re-reads the totals row.
    pub async fn refresh_balance(&mut self) {
        match balance::get_balance(&self.db, &self.user_id).await {
            Ok(Some(row)) => self.balance = Some(row),
            Ok(None) => warn!("No balance row for {}", self.user_id),
            Err(e) => error!("Error fetching balance: {}", e),
        }
    }

    /// Re-reads the category list.
    pub async fn refresh_categories(&mut self) {
        match category::list_categories(&self.db, &self.user_id).await {
            Ok(categories) => self.categories = categories,
            Err(e) => error!("Error fetching categories: {}", e),
        }
    }

    /// Re-reads the transaction list.
    pub async fn refresh_transactions(&mut self) {
        match transaction::list_transactions(&self.db, &self.user_id).await {
            Ok(entries) => self.transactions = entries,
            Err(e) => error!("Error fetching transactions: {}", e),
        }
    }

    /// Records a transaction and applies its effect to the totals.
    ///
    /// `date` defaults to today. The outcome is reported to the notifier and returned.
    #[instrument(skip(self, description), fields(user_id = %self.user_id))]
    pub async fn add_transaction(
        &mut self,
        transaction_type: TransactionType,
        amount: Decimal,
        category_id: Option<i64>,
        description: Option<String>,
        date: Option<NaiveDate>,
    ) -> Result<transaction_entity::Model> {
        let new = NewTransaction {
            transaction_type,
            amount,
            category_id,
            description,
            date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
        };

        let outcome = self.record_add(new).await;
        self.report(
            &outcome,
            "Transaction added",
            "Your transaction has been recorded successfully.".to_string(),
        );
        outcome
    }

    /// Removes a transaction and reverses its effect on the totals.
    ///
    /// The effect is computed from `record` as supplied by the caller, which must be the
    /// authoritative pre-delete row; it is not re-read from the store.
    #[instrument(skip(self, record), fields(user_id = %self.user_id))]
    pub async fn delete_transaction(
        &mut self,
        transaction_id: i64,
        record: &transaction_entity::Model,
    ) -> Result<()> {
        let outcome = self.record_delete(transaction_id, record).await;
        self.report(
            &outcome,
            "Transaction deleted",
            "The transaction has been removed.".to_string(),
        );
        outcome
    }

    /// Creates a category and refreshes the category list.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn add_category(
        &mut self,
        name: &str,
        color: &str,
    ) -> Result<category_entity::Model> {
        let outcome = category::create_category(&self.db, &self.user_id, name, color).await;
        if outcome.is_ok() {
            self.refresh_categories().await;
        }
        let description = outcome
            .as_ref()
            .map(|c| format!("{} category has been created.", c.name))
            .unwrap_or_default();
        self.report(&outcome, "Category added", description);
        outcome
    }

    async fn record_add(&mut self, new: NewTransaction) -> Result<transaction_entity::Model> {
        let current = self.current_balance().await?;

        let txn = self.db.begin().await?;
        let inserted = transaction::insert_transaction(&txn, &self.user_id, new).await?;
        let totals = Totals::from(&current).apply(Effect::of_transaction(&inserted));
        let written = balance::replace_totals(&txn, &current, totals).await?;
        txn.commit().await?;

        info!(
            "Recorded {} of {}; balance={} savings={}",
            inserted.transaction_type, inserted.amount, written.balance, written.savings
        );
        self.balance = Some(written);
        self.refresh_transactions().await;
        Ok(inserted)
    }

    async fn record_delete(
        &mut self,
        transaction_id: i64,
        record: &transaction_entity::Model,
    ) -> Result<()> {
        if record.id != transaction_id {
            warn!(
                "Deleting transaction {} but reversing the record of {}",
                transaction_id, record.id
            );
        }
        let current = self.current_balance().await?;

        let txn = self.db.begin().await?;
        transaction::delete_transaction_record(&txn, &self.user_id, transaction_id).await?;
        let totals = Totals::from(&current).revert(Effect::of_transaction(record));
        let written = balance::replace_totals(&txn, &current, totals).await?;
        txn.commit().await?;

        info!(
            "Deleted transaction {}; balance={} savings={}",
            transaction_id, written.balance, written.savings
        );
        self.balance = Some(written);
        self.refresh_transactions().await;
        Ok(())
    }

    /// The totals row this session will write against, read on first use.
    async fn current_balance(&mut self) -> Result<user_balance::Model> {
        if let Some(row) = &self.balance {
            return Ok(row.clone());
        }
        let row = balance::get_balance(&self.db, &self.user_id)
            .await?
            .ok_or_else(|| Error::BalanceNotFound {
                user_id: self.user_id.clone(),
            })?;
        self.balance = Some(row.clone());
        Ok(row)
    }

    fn report<T>(&self, outcome: &Result<T>, title: &str, description: String) {
        let notification = match outcome {
            Ok(_) => Notification::success(title, description),
            Err(e) => {
                error!("{} failed: {}", title, e);
                Notification::error(e.to_string())
            }
        };
        self.notifier.notify(&notification);
    }
}
