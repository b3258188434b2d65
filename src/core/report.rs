//! Report generation business logic.
//!
//! Pure functions over an already fetched transaction list and category set: period
//! grouping for the compare view, per-type totals, the expense breakdown by category,
//! this month's statistics, daily spending and the history filter. Nothing here talks
//! to the database, and every function returns zeroed or empty results for an empty
//! transaction list.

use crate::{
    core::transaction::TransactionEntry,
    entities::{TransactionType, category},
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Calendar bucket size used to group transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// `YYYY-MM-DD`
    Day,
    /// `YYYY-MM`
    Month,
    /// `YYYY`
    Year,
}

impl Granularity {
    const fn key_format(self) -> &'static str {
        match self {
            Self::Day => "%Y-%m-%d",
            Self::Month => "%Y-%m",
            Self::Year => "%Y",
        }
    }

    const fn label_format(self) -> &'static str {
        match self {
            Self::Day => "%b %d, %Y",
            Self::Month => "%B %Y",
            Self::Year => "%Y",
        }
    }
}

/// A selectable period with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodOption {
    /// Grouping key, e.g. `2024-01`
    pub value: String,
    /// Human label, e.g. `January 2024`
    pub label: String,
}

/// Spending for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpend {
    /// Category name
    pub name: String,
    /// Summed expense amount
    pub amount: Decimal,
    /// Configured color, or a generated hue
    pub color: String,
}

/// Totals for the current calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyStats {
    /// Sum of income
    pub income: Decimal,
    /// Sum of expenses
    pub expenses: Decimal,
    /// Sum moved into savings; withdrawals are not netted
    pub savings: Decimal,
}

/// Expense total for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailySpending {
    /// The day
    pub date: NaiveDate,
    /// Summed expense amount
    pub amount: Decimal,
}

/// One side of a period comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    /// Grouping key
    pub period: String,
    /// Display label
    pub label: String,
    /// Summed expenses in the period
    pub expense_total: Decimal,
    /// Expenses by category in the period
    pub breakdown: Vec<CategorySpend>,
}

/// Two periods side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// Left-hand period
    pub left: PeriodSummary,
    /// Right-hand period
    pub right: PeriodSummary,
}

/// Criteria for the transaction history view. `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    /// Earliest date, inclusive
    pub start: Option<NaiveDate>,
    /// Latest date, inclusive
    pub end: Option<NaiveDate>,
    /// Only this category
    pub category_id: Option<i64>,
    /// Only this kind of transaction
    pub transaction_type: Option<TransactionType>,
}

/// Formats the grouping key of `date`.
#[must_use]
pub fn period_key(date: NaiveDate, granularity: Granularity) -> String {
    date.format(granularity.key_format()).to_string()
}

/// Display label for a period key; unparseable keys are returned unchanged.
#[must_use]
pub fn period_label(period: &str, granularity: Granularity) -> String {
    let parsed = match granularity {
        Granularity::Day => NaiveDate::parse_from_str(period, "%Y-%m-%d").ok(),
        Granularity::Month => NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d").ok(),
        Granularity::Year => period
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1)),
    };
    parsed.map_or_else(
        || period.to_string(),
        |date| date.format(granularity.label_format()).to_string(),
    )
}

/// Distinct periods present in the transaction dates, most recent first.
#[must_use]
pub fn periods(entries: &[TransactionEntry], granularity: Granularity) -> Vec<String> {
    let keys: BTreeSet<String> = entries
        .iter()
        .map(|e| period_key(e.transaction.date, granularity))
        .collect();
    keys.into_iter().rev().collect()
}

/// [`periods`] paired with display labels.
#[must_use]
pub fn period_options(entries: &[TransactionEntry], granularity: Granularity) -> Vec<PeriodOption> {
    periods(entries, granularity)
        .into_iter()
        .map(|value| PeriodOption {
            label: period_label(&value, granularity),
            value,
        })
        .collect()
}

/// Transactions falling in `period`.
///
/// A non-empty `category_filter` additionally requires the transaction's category id to
/// be in the set; uncategorized transactions never pass it. An empty period matches
/// nothing.
#[must_use]
pub fn filter_by_period<'a>(
    entries: &'a [TransactionEntry],
    granularity: Granularity,
    period: &str,
    category_filter: &[i64],
) -> Vec<&'a TransactionEntry> {
    if period.is_empty() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|e| period_key(e.transaction.date, granularity) == period)
        .filter(|e| {
            category_filter.is_empty()
                || e.transaction
                    .category_id
                    .is_some_and(|id| category_filter.contains(&id))
        })
        .collect()
}

/// Sum of amounts of the given type.
pub fn total_for_type<'a, I>(entries: I, transaction_type: TransactionType) -> Decimal
where
    I: IntoIterator<Item = &'a TransactionEntry>,
{
    entries
        .into_iter()
        .filter(|e| e.transaction.transaction_type == transaction_type)
        .map(|e| e.transaction.amount)
        .sum()
}

/// Evenly spaced hue for the `index`-th breakdown entry without a configured color.
#[must_use]
pub fn fallback_color(index: usize) -> String {
    format!("hsl({}, 70%, 50%)", index * 45)
}

/// Expense totals per category name, in the order categories are first seen.
///
/// Income, savings moves and uncategorized expenses are left out.
pub fn category_breakdown<'a, I>(entries: I, categories: &[category::Model]) -> Vec<CategorySpend>
where
    I: IntoIterator<Item = &'a TransactionEntry>,
{
    let mut groups: Vec<(String, Decimal)> = Vec::new();
    for entry in entries {
        if entry.transaction.transaction_type != TransactionType::Expense {
            continue;
        }
        let Some(category) = &entry.category else {
            continue;
        };
        match groups.iter_mut().find(|(name, _)| *name == category.name) {
            Some((_, amount)) => *amount += entry.transaction.amount,
            None => groups.push((category.name.clone(), entry.transaction.amount)),
        }
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(index, (name, amount))| {
            let color = categories
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.color.clone())
                .filter(|color| !color.is_empty())
                .unwrap_or_else(|| fallback_color(index));
            CategorySpend {
                name,
                amount,
                color,
            }
        })
        .collect()
}

fn in_month_of(date: NaiveDate, today: NaiveDate) -> bool {
    date.year() == today.year() && date.month() == today.month()
}

/// Income, expense and savings-transfer totals for `today`'s calendar month.
#[must_use]
pub fn monthly_stats(entries: &[TransactionEntry], today: NaiveDate) -> MonthlyStats {
    let this_month: Vec<&TransactionEntry> = entries
        .iter()
        .filter(|e| in_month_of(e.transaction.date, today))
        .collect();

    MonthlyStats {
        income: total_for_type(this_month.iter().copied(), TransactionType::Income),
        expenses: total_for_type(this_month.iter().copied(), TransactionType::Expense),
        savings: total_for_type(this_month.iter().copied(), TransactionType::SavingsTransfer),
    }
}

/// Expense totals for each day of `today`'s month that has spending, oldest first.
#[must_use]
pub fn daily_spending(entries: &[TransactionEntry], today: NaiveDate) -> Vec<DailySpending> {
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for entry in entries {
        let t = &entry.transaction;
        if t.transaction_type == TransactionType::Expense && in_month_of(t.date, today) {
            *days.entry(t.date).or_insert(Decimal::ZERO) += t.amount;
        }
    }
    days.into_iter()
        .filter(|(_, amount)| *amount > Decimal::ZERO)
        .map(|(date, amount)| DailySpending { date, amount })
        .collect()
}

/// Expense total and category breakdown for one period.
#[must_use]
pub fn summarize_period(
    entries: &[TransactionEntry],
    categories: &[category::Model],
    granularity: Granularity,
    period: &str,
    category_filter: &[i64],
) -> PeriodSummary {
    let matched = filter_by_period(entries, granularity, period, category_filter);
    PeriodSummary {
        period: period.to_string(),
        label: period_label(period, granularity),
        expense_total: total_for_type(matched.iter().copied(), TransactionType::Expense),
        breakdown: category_breakdown(matched.iter().copied(), categories),
    }
}

/// Summaries of two periods for side-by-side comparison.
#[must_use]
pub fn compare_periods(
    entries: &[TransactionEntry],
    categories: &[category::Model],
    granularity: Granularity,
    left: &str,
    right: &str,
    category_filter: &[i64],
) -> Comparison {
    Comparison {
        left: summarize_period(entries, categories, granularity, left, category_filter),
        right: summarize_period(entries, categories, granularity, right, category_filter),
    }
}

/// Transactions matching every set criterion of `filter`, order preserved.
#[must_use]
pub fn filter_history<'a>(
    entries: &'a [TransactionEntry],
    filter: &HistoryFilter,
) -> Vec<&'a TransactionEntry> {
    entries
        .iter()
        .filter(|e| {
            let t = &e.transaction;
            filter.start.is_none_or(|start| t.date >= start)
                && filter.end.is_none_or(|end| t.date <= end)
                && filter
                    .category_id
                    .is_none_or(|id| t.category_id == Some(id))
                && filter
                    .transaction_type
                    .is_none_or(|kind| t.transaction_type == kind)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn sample() -> (Vec<TransactionEntry>, Vec<category::Model>) {
        let food = test_category(1, "Food", "#22c55e");
        let rent = test_category(2, "Rent", "");
        let entries = vec![
            entry(6, TransactionType::Expense, 12, "2024-03-02", Some(&food)),
            entry(5, TransactionType::Income, 500, "2024-03-01", None),
            entry(4, TransactionType::Expense, 800, "2024-02-28", Some(&rent)),
            entry(3, TransactionType::SavingsTransfer, 50, "2024-02-10", None),
            entry(2, TransactionType::Expense, 8, "2024-02-10", Some(&food)),
            entry(1, TransactionType::Expense, 3, "2023-12-31", None),
        ];
        (entries, vec![food, rent])
    }

    #[test]
    fn test_month_periods_are_distinct() {
        let entries = vec![
            entry(1, TransactionType::Expense, 1, "2024-01-05", None),
            entry(2, TransactionType::Expense, 1, "2024-01-05", None),
            entry(3, TransactionType::Expense, 1, "2024-02-01", None),
        ];
        assert_eq!(periods(&entries, Granularity::Month), vec!["2024-02", "2024-01"]);
        assert_eq!(
            periods(&entries, Granularity::Day),
            vec!["2024-02-01", "2024-01-05"]
        );
        assert_eq!(periods(&entries, Granularity::Year), vec!["2024"]);
    }

    #[test]
    fn test_period_options_labels() {
        let entries = vec![entry(1, TransactionType::Income, 1, "2024-01-05", None)];
        assert_eq!(
            period_options(&entries, Granularity::Day),
            vec![PeriodOption {
                value: "2024-01-05".to_string(),
                label: "Jan 05, 2024".to_string()
            }]
        );
        assert_eq!(period_options(&entries, Granularity::Month)[0].label, "January 2024");
        assert_eq!(period_options(&entries, Granularity::Year)[0].label, "2024");
        assert_eq!(period_label("garbage", Granularity::Month), "garbage");
    }

    #[test]
    fn test_breakdown_excludes_income() {
        let food = test_category(1, "Food", "#f97316");
        let entries = vec![
            entry(1, TransactionType::Expense, 10, "2024-01-05", Some(&food)),
            entry(2, TransactionType::Expense, 5, "2024-01-06", Some(&food)),
            entry(3, TransactionType::Income, 100, "2024-01-07", Some(&food)),
        ];
        let breakdown = category_breakdown(&entries, std::slice::from_ref(&food));
        assert_eq!(
            breakdown,
            vec![CategorySpend {
                name: "Food".to_string(),
                amount: dec(15),
                color: "#f97316".to_string(),
            }]
        );
    }

    #[test]
    fn test_breakdown_fallback_color_by_index() {
        let (entries, categories) = sample();
        let breakdown = category_breakdown(&entries, &categories);

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].name, "Food");
        assert_eq!(breakdown[0].amount, dec(20));
        assert_eq!(breakdown[0].color, "#22c55e");
        assert_eq!(breakdown[1].name, "Rent");
        assert_eq!(breakdown[1].color, "hsl(45, 70%, 50%)");
        assert_eq!(fallback_color(0), "hsl(0, 70%, 50%)");
        assert_eq!(fallback_color(9), "hsl(405, 70%, 50%)");
    }

    #[test]
    fn test_filter_by_period_and_categories() {
        let (entries, _) = sample();

        let february = filter_by_period(&entries, Granularity::Month, "2024-02", &[]);
        let ids: Vec<i64> = february.iter().map(|e| e.transaction.id).collect();
        assert_eq!(ids, vec![4, 3, 2]);

        let food_only = filter_by_period(&entries, Granularity::Month, "2024-02", &[1]);
        let ids: Vec<i64> = food_only.iter().map(|e| e.transaction.id).collect();
        assert_eq!(ids, vec![2]);

        assert!(filter_by_period(&entries, Granularity::Day, "", &[]).is_empty());
        assert_eq!(filter_by_period(&entries, Granularity::Year, "2023", &[]).len(), 1);
    }

    #[test]
    fn test_total_for_type() {
        let (entries, _) = sample();
        assert_eq!(total_for_type(&entries, TransactionType::Expense), dec(823));
        assert_eq!(total_for_type(&entries, TransactionType::Income), dec(500));
        assert_eq!(total_for_type(&entries, TransactionType::SavingsWithdraw), Decimal::ZERO);
    }

    #[test]
    fn test_monthly_stats_current_month_only() {
        let (mut entries, _) = sample();
        entries.push(entry(7, TransactionType::SavingsWithdraw, 20, "2024-02-15", None));

        let stats = monthly_stats(&entries, date(2024, 2, 20));
        assert_eq!(
            stats,
            MonthlyStats {
                income: Decimal::ZERO,
                expenses: dec(808),
                savings: dec(50),
            }
        );

        let march = monthly_stats(&entries, date(2024, 3, 1));
        assert_eq!(march.income, dec(500));
        assert_eq!(march.expenses, dec(12));
    }

    #[test]
    fn test_daily_spending() {
        let (mut entries, _) = sample();
        entries.push(entry(8, TransactionType::Expense, 2, "2024-02-10", None));
        entries.push(entry(9, TransactionType::Expense, 0, "2024-02-11", None));

        let days = daily_spending(&entries, date(2024, 2, 1));
        assert_eq!(
            days,
            vec![
                DailySpending {
                    date: date(2024, 2, 10),
                    amount: dec(10)
                },
                DailySpending {
                    date: date(2024, 2, 28),
                    amount: dec(800)
                },
            ]
        );
    }

    #[test]
    fn test_compare_periods() {
        let (entries, categories) = sample();
        let comparison = compare_periods(
            &entries,
            &categories,
            Granularity::Month,
            "2024-02",
            "2024-03",
            &[],
        );

        assert_eq!(comparison.left.label, "February 2024");
        assert_eq!(comparison.left.expense_total, dec(808));
        assert_eq!(comparison.left.breakdown.len(), 2);
        assert_eq!(comparison.right.expense_total, dec(12));
        assert_eq!(comparison.right.breakdown[0].name, "Food");
    }

    #[test]
    fn test_filter_history() {
        let (entries, _) = sample();

        let filter = HistoryFilter {
            start: Some(date(2024, 2, 10)),
            end: Some(date(2024, 3, 1)),
            ..Default::default()
        };
        let ids: Vec<i64> = filter_history(&entries, &filter)
            .iter()
            .map(|e| e.transaction.id)
            .collect();
        assert_eq!(ids, vec![5, 4, 3, 2]);

        let filter = HistoryFilter {
            category_id: Some(1),
            transaction_type: Some(TransactionType::Expense),
            ..Default::default()
        };
        let ids: Vec<i64> = filter_history(&entries, &filter)
            .iter()
            .map(|e| e.transaction.id)
            .collect();
        assert_eq!(ids, vec![6, 2]);

        assert_eq!(filter_history(&entries, &HistoryFilter::default()).len(), 6);
    }

    #[test]
    fn test_empty_input_yields_empty_aggregates() {
        let entries: Vec<TransactionEntry> = Vec::new();
        let today = date(2024, 2, 1);

        assert!(periods(&entries, Granularity::Day).is_empty());
        assert!(period_options(&entries, Granularity::Month).is_empty());
        assert!(filter_by_period(&entries, Granularity::Month, "2024-02", &[1, 2]).is_empty());
        assert_eq!(total_for_type(&entries, TransactionType::Expense), Decimal::ZERO);
        assert!(category_breakdown(&entries, &[]).is_empty());
        assert_eq!(monthly_stats(&entries, today), MonthlyStats::default());
        assert!(daily_spending(&entries, today).is_empty());
        assert!(filter_history(&entries, &HistoryFilter::default()).is_empty());

        let comparison =
            compare_periods(&entries, &[], Granularity::Year, "2023", "2024", &[7]);
        assert_eq!(comparison.left.expense_total, Decimal::ZERO);
        assert!(comparison.right.breakdown.is_empty());
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let (entries, categories) = sample();
        let first = compare_periods(
            &entries,
            &categories,
            Granularity::Day,
            "2024-02-10",
            "2024-03-02",
            &[],
        );
        let second = compare_periods(
            &entries,
            &categories,
            Granularity::Day,
            "2024-02-10",
            "2024-03-02",
            &[],
        );
        assert_eq!(first, second);
    }
}
