//! Transaction aggregation for charts.
//!
//! Every function here is total: records coming from the remote store are not
//! trusted, so malformed amounts count as zero and undated records are left
//! out of the daily series instead of producing an error.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{Transaction, TransactionType};

/// Income and expense sums over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
}

impl Totals {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }

    pub fn is_zero(&self) -> bool {
        self.income == 0.0 && self.expense == 0.0
    }
}

/// Sums for a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub income: f64,
    pub expense: f64,
}

/// Daily buckets in strictly ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries(Vec<DailyBucket>);

impl TimeSeries {
    pub fn buckets(&self) -> &[DailyBucket] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Axis labels such as "Jan 1", one per bucket.
    pub fn labels(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|bucket| bucket.date.format("%b %-d").to_string())
            .collect()
    }

    /// Largest single income or expense value, used to scale a chart axis.
    pub fn max_amount(&self) -> f64 {
        self.0
            .iter()
            .map(|bucket| bucket.income.max(bucket.expense))
            .fold(0.0, f64::max)
    }
}

/// Totals and daily series derived from one transaction set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateSeries {
    pub totals: Totals,
    pub series: TimeSeries,
}

/// Chart flavours offered on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Donut,
    Bar,
    Line,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Donut, ChartKind::Bar, ChartKind::Line];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Donut => "Donut",
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
        }
    }
}

/// Coerce an untrusted amount into a usable value.
///
/// Numbers and numeric strings keep their value. Anything else, including
/// null, booleans, text, NaN, infinities and negative numbers, becomes 0.
pub fn normalize_amount(raw: &Value) -> f64 {
    let amount = match raw {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    sanitize_amount(amount)
}

/// Clamp an already-numeric amount to a finite, non-negative value.
pub fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Calendar day taken literally from an ISO date or datetime string.
///
/// Time of day and any offset are discarded, so "2024-01-01T23:30:00-05:00"
/// is January 1st.
pub fn calendar_day(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Sum amounts per type. Anything that is not income counts as expense.
pub fn compute_totals(transactions: &[Transaction]) -> Totals {
    transactions
        .iter()
        .fold(Totals::default(), |mut totals, transaction| {
            let amount = sanitize_amount(transaction.amount);
            if transaction.is_income() {
                totals.income += amount;
            } else {
                totals.expense += amount;
            }
            totals
        })
}

/// Group transactions into one bucket per calendar day, oldest first.
///
/// A record with an unrecognised type still opens its day's bucket but adds
/// nothing to it. Records without a parseable date are skipped.
pub fn compute_time_series(transactions: &[Transaction]) -> TimeSeries {
    let mut days: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for transaction in transactions {
        let Some(day) = transaction.day() else {
            continue;
        };
        let amount = sanitize_amount(transaction.amount);
        let entry = days.entry(day).or_insert((0.0, 0.0));
        match transaction.transaction_type {
            Some(TransactionType::Income) => entry.0 += amount,
            Some(TransactionType::Expense) => entry.1 += amount,
            None => {}
        }
    }

    TimeSeries(
        days.into_iter()
            .map(|(date, (income, expense))| DailyBucket {
                date,
                income,
                expense,
            })
            .collect(),
    )
}

pub fn compute_aggregates(transactions: &[Transaction]) -> AggregateSeries {
    AggregateSeries {
        totals: compute_totals(transactions),
        series: compute_time_series(transactions),
    }
}

pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(normalize_amount(&raw))
}

pub(crate) fn lenient_transaction_type<'de, D>(
    deserializer: D,
) -> Result<Option<TransactionType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(raw.as_str().and_then(|text| text.parse().ok()))
}

/// Keep a string field, treating null and other JSON types as absent.
pub(crate) fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

/// Record ids are opaque; numeric ids are kept as their decimal text.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        _ => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn txn(kind: Option<TransactionType>, amount: f64, date: &str) -> Transaction {
        Transaction {
            id: format!("{date}-{amount}"),
            transaction_type: kind,
            amount,
            date: date.to_string(),
            category: None,
            description: None,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_totals_of_empty_set_are_zero() {
        assert_eq!(compute_totals(&[]), Totals { income: 0.0, expense: 0.0 });
    }

    #[test]
    fn test_totals_split_by_type() {
        let transactions = vec![
            txn(Some(TransactionType::Income), 100.0, "2024-01-01"),
            txn(Some(TransactionType::Expense), 40.0, "2024-01-01"),
            txn(Some(TransactionType::Income), 20.0, "2024-01-02"),
        ];

        let totals = compute_totals(&transactions);
        assert_eq!(totals.income, 120.0);
        assert_eq!(totals.expense, 40.0);
        assert_eq!(totals.net(), 80.0);
    }

    #[test]
    fn test_unknown_type_counts_as_expense_in_totals() {
        let transactions = vec![txn(None, 7.5, "2024-01-01")];
        assert_eq!(compute_totals(&transactions), Totals { income: 0.0, expense: 7.5 });
    }

    #[test]
    fn test_totals_cover_every_amount_regardless_of_order() {
        let mut transactions = vec![
            txn(Some(TransactionType::Income), 12.25, "2024-02-01"),
            txn(Some(TransactionType::Expense), 3.5, "2024-01-09"),
            txn(None, 8.0, "2024-01-03"),
            txn(Some(TransactionType::Income), 0.75, "bogus"),
            txn(Some(TransactionType::Expense), 100.0, "2023-12-31"),
        ];
        let expected_sum: f64 = transactions.iter().map(|t| t.amount).sum();

        let forward = compute_totals(&transactions);
        transactions.reverse();
        let backward = compute_totals(&transactions);

        assert_eq!(forward, backward);
        assert!((forward.income + forward.expense - expected_sum).abs() < 1e-9);
    }

    #[test]
    fn test_totals_ignore_negative_and_nan_amounts() {
        let transactions = vec![
            txn(Some(TransactionType::Income), -50.0, "2024-01-01"),
            txn(Some(TransactionType::Expense), f64::NAN, "2024-01-01"),
            txn(Some(TransactionType::Expense), f64::INFINITY, "2024-01-01"),
        ];

        let totals = compute_totals(&transactions);
        assert!(totals.is_zero());
    }

    #[test]
    fn test_time_series_example() {
        let transactions = vec![
            txn(Some(TransactionType::Income), 100.0, "2024-01-01"),
            txn(Some(TransactionType::Expense), 40.0, "2024-01-01"),
            txn(Some(TransactionType::Income), 20.0, "2024-01-02"),
        ];

        let series = compute_time_series(&transactions);
        assert_eq!(
            series.buckets(),
            &[
                DailyBucket { date: day(2024, 1, 1), income: 100.0, expense: 40.0 },
                DailyBucket { date: day(2024, 1, 2), income: 20.0, expense: 0.0 },
            ]
        );
    }

    #[test]
    fn test_time_series_is_strictly_ascending() {
        let transactions = vec![
            txn(Some(TransactionType::Expense), 1.0, "2024-03-10T18:00:00.000Z"),
            txn(Some(TransactionType::Income), 2.0, "2023-12-31"),
            txn(Some(TransactionType::Income), 3.0, "2024-03-10T01:00:00+09:00"),
            txn(Some(TransactionType::Expense), 4.0, "2024-01-15"),
            txn(Some(TransactionType::Expense), 5.0, "2023-12-31T23:59:59Z"),
        ];

        let series = compute_time_series(&transactions);
        let dates: Vec<NaiveDate> = series.buckets().iter().map(|b| b.date).collect();

        assert_eq!(dates, vec![day(2023, 12, 31), day(2024, 1, 15), day(2024, 3, 10)]);
        assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));

        let march = series.buckets()[2];
        assert_eq!(march.income, 3.0);
        assert_eq!(march.expense, 1.0);
    }

    #[test]
    fn test_time_series_skips_undated_records() {
        let transactions = vec![
            txn(Some(TransactionType::Income), 10.0, ""),
            txn(Some(TransactionType::Income), 10.0, "01/02/2024"),
            txn(Some(TransactionType::Income), 10.0, "2024-02-30"),
        ];

        assert!(compute_time_series(&transactions).is_empty());
    }

    #[test]
    fn test_unknown_type_opens_bucket_without_adding() {
        let transactions = vec![txn(None, 99.0, "2024-05-05")];

        let series = compute_time_series(&transactions);
        assert_eq!(
            series.buckets(),
            &[DailyBucket { date: day(2024, 5, 5), income: 0.0, expense: 0.0 }]
        );
    }

    #[test]
    fn test_empty_time_series() {
        let series = compute_time_series(&[]);
        assert!(series.is_empty());
        assert!(series.labels().is_empty());
        assert_eq!(series.max_amount(), 0.0);
    }

    #[test]
    fn test_time_series_labels_and_max() {
        let transactions = vec![
            txn(Some(TransactionType::Income), 100.0, "2024-01-01"),
            txn(Some(TransactionType::Expense), 140.0, "2024-01-02"),
        ];

        let series = compute_time_series(&transactions);
        assert_eq!(series.labels(), vec!["Jan 1".to_string(), "Jan 2".to_string()]);
        assert_eq!(series.max_amount(), 140.0);
    }

    #[test]
    fn test_aggregates_are_idempotent() {
        let transactions = vec![
            txn(Some(TransactionType::Income), 5.0, "2024-01-01"),
            txn(Some(TransactionType::Expense), 2.0, "2024-01-03"),
        ];

        assert_eq!(compute_aggregates(&transactions), compute_aggregates(&transactions));
    }

    #[test]
    fn test_normalize_amount() {
        assert_eq!(normalize_amount(&json!(42.5)), 42.5);
        assert_eq!(normalize_amount(&json!(7)), 7.0);
        assert_eq!(normalize_amount(&json!(" 12.5 ")), 12.5);
        assert_eq!(normalize_amount(&json!("abc")), 0.0);
        assert_eq!(normalize_amount(&json!("NaN")), 0.0);
        assert_eq!(normalize_amount(&json!(null)), 0.0);
        assert_eq!(normalize_amount(&json!(true)), 0.0);
        assert_eq!(normalize_amount(&json!([1, 2])), 0.0);
        assert_eq!(normalize_amount(&json!(-3)), 0.0);
    }

    #[test]
    fn test_calendar_day_discards_time_and_zone() {
        assert_eq!(calendar_day("2024-01-01"), Some(day(2024, 1, 1)));
        assert_eq!(calendar_day("2024-01-01T23:30:00-05:00"), Some(day(2024, 1, 1)));
        assert_eq!(calendar_day("2024-01-01 08:00:00"), Some(day(2024, 1, 1)));
        assert_eq!(calendar_day("yesterday"), None);
    }

    #[test]
    fn test_chart_kind_defaults_to_donut() {
        assert_eq!(ChartKind::default(), ChartKind::Donut);
        assert_eq!(ChartKind::ALL.map(|kind| kind.label()), ["Donut", "Bar", "Line"]);
    }
}
