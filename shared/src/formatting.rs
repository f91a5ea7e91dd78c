//! Display formatting for the transaction table.

use serde::{Deserialize, Serialize};

use crate::{calendar_day, sanitize_amount, Transaction, TransactionType};

pub const CURRENCY_SYMBOL: &str = "₹";

/// A transaction prepared for display in the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub id: String,
    pub formatted_date: String,
    pub category: String,
    pub type_label: String,
    pub transaction_type: Option<TransactionType>,
    pub formatted_amount: String,
    pub description: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(transaction: &Transaction) -> Self {
        let description = transaction
            .description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or("N/A")
            .to_string();

        Self {
            id: transaction.id.clone(),
            formatted_date: format_display_date(&transaction.date),
            category: transaction.category_name().to_string(),
            type_label: transaction
                .transaction_type
                .map(|kind| kind.label())
                .unwrap_or("Unknown")
                .to_string(),
            transaction_type: transaction.transaction_type,
            formatted_amount: format_amount(sanitize_amount(transaction.amount)),
            description,
        }
    }
}

/// Format an amount with thousands separators and two decimals, e.g. "₹1,234.50".
pub fn format_amount(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{CURRENCY_SYMBOL}{grouped}.{fraction:02}")
}

/// "Jan 1, 2024" for a parseable date, otherwise the raw text.
pub fn format_display_date(raw: &str) -> String {
    match calendar_day(raw) {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}
