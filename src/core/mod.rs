/// Totals row access with version-checked writes
pub mod balance;
/// User-scoped categories
pub mod category;
/// The per-type effect table and running totals
pub mod effect;
/// Per-user session that keeps the log and totals consistent
pub mod ledger;
/// Mutation outcome notifications
pub mod notify;
/// Aggregations over fetched transactions
pub mod report;
/// Transaction row persistence
pub mod transaction;
