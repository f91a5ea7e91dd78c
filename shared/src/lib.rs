use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod aggregation;
pub mod filters;
pub mod formatting;
pub mod validation;

pub use aggregation::{
    calendar_day, compute_aggregates, compute_time_series, compute_totals, normalize_amount,
    sanitize_amount, AggregateSeries, ChartKind, DailyBucket, TimeSeries, Totals,
};
pub use filters::{FilterError, FilterField, FilterState};
pub use formatting::{format_amount, format_display_date, TransactionRow, CURRENCY_SYMBOL};
pub use validation::{
    CategoryForm, ChangePasswordForm, LoginForm, ProfileForm, RegisterForm, TransactionForm,
    ValidationError, MIN_PASSWORD_LENGTH,
};

/// Category name used when a transaction carries none.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A transaction as returned by the remote store.
///
/// Remote records are read leniently: a missing or malformed `amount` becomes
/// 0, an unknown `type` becomes `None`, and text fields of the wrong JSON type
/// are treated as absent. `date` is kept verbatim so the calendar day can be
/// extracted on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(
        rename = "_id",
        alias = "id",
        default,
        deserialize_with = "aggregation::lenient_id"
    )]
    pub id: String,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "aggregation::lenient_transaction_type"
    )]
    pub transaction_type: Option<TransactionType>,
    #[serde(default, deserialize_with = "aggregation::lenient_amount")]
    pub amount: f64,
    /// ISO 8601 date or datetime as sent by the server
    #[serde(default, deserialize_with = "aggregation::lenient_string")]
    pub date: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "aggregation::lenient_opt_string"
    )]
    pub category: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "aggregation::lenient_opt_string"
    )]
    pub description: Option<String>,
}

impl Transaction {
    /// Calendar day of the transaction, ignoring time of day and offset.
    pub fn day(&self) -> Option<NaiveDate> {
        calendar_day(&self.date)
    }

    /// Category name, falling back to [`UNCATEGORIZED`] when absent or blank.
    pub fn category_name(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => UNCATEGORIZED,
        }
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == Some(TransactionType::Income)
    }
}

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub const ALL: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];

    /// Wire representation, also used as a query parameter value.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Capitalised label for display.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transaction type: {0:?}")]
pub struct UnknownTransactionType(pub String);

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("income") {
            Ok(TransactionType::Income)
        } else if trimmed.eq_ignore_ascii_case("expense") {
            Ok(TransactionType::Expense)
        } else {
            Err(UnknownTransactionType(s.to_string()))
        }
    }
}

/// Payload for creating or updating a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A user-defined grouping label for transactions.
///
/// Transactions reference categories by name, not by id, so deleting a
/// category leaves its name on existing transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
}

/// Payload for creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// Response to a successful login; `token` is the opaque bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Registered user as echoed back by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    pub username: String,
    pub email: String,
}

/// Generic `{ "message": ... }` body used for confirmations and errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transaction_from_server_record() {
        let transaction: Transaction = serde_json::from_value(json!({
            "_id": "66a1",
            "type": "income",
            "amount": 100,
            "date": "2024-01-01T00:00:00.000Z",
            "category": "Salary",
            "description": "January pay"
        }))
        .unwrap();

        assert_eq!(transaction.id, "66a1");
        assert_eq!(transaction.transaction_type, Some(TransactionType::Income));
        assert_eq!(transaction.amount, 100.0);
        assert_eq!(transaction.day(), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(transaction.category_name(), "Salary");
    }

    #[test]
    fn test_transaction_tolerates_malformed_fields() {
        let transaction: Transaction = serde_json::from_value(json!({
            "id": "abc",
            "type": "transfer",
            "amount": "not a number",
            "category": null
        }))
        .unwrap();

        assert_eq!(transaction.transaction_type, None);
        assert_eq!(transaction.amount, 0.0);
        assert_eq!(transaction.day(), None);
        assert_eq!(transaction.category_name(), UNCATEGORIZED);
        assert_eq!(transaction.description, None);
    }

    #[test]
    fn test_list_with_null_and_numeric_dates_still_decodes() {
        let transactions: Vec<Transaction> = serde_json::from_str(
            r#"[
                {"_id": "a", "type": "income", "amount": 100, "date": "2024-01-01"},
                {"_id": "b", "type": "expense", "amount": 40, "date": null},
                {"_id": 7, "type": "expense", "amount": 10, "date": 1704067200000,
                 "category": 12, "description": false}
            ]"#,
        )
        .unwrap();

        assert_eq!(transactions.len(), 3);
        assert_eq!(transactions[1].date, "");
        assert_eq!(transactions[2].id, "7");
        assert_eq!(transactions[2].day(), None);
        assert_eq!(transactions[2].category_name(), UNCATEGORIZED);
        assert_eq!(transactions[2].description, None);

        let aggregates = compute_aggregates(&transactions);
        assert_eq!(aggregates.totals.income, 100.0);
        assert_eq!(aggregates.totals.expense, 50.0);
        assert_eq!(aggregates.series.len(), 1);
        assert_eq!(
            aggregates.series.buckets()[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_transaction_missing_amount_and_type() {
        let transaction: Transaction =
            serde_json::from_value(json!({ "_id": "x", "date": "2024-03-05" })).unwrap();

        assert_eq!(transaction.amount, 0.0);
        assert_eq!(transaction.transaction_type, None);
        assert!(!transaction.is_income());
    }

    #[test]
    fn test_blank_category_falls_back() {
        let transaction: Transaction = serde_json::from_value(json!({
            "_id": "x",
            "type": "expense",
            "amount": 5,
            "category": "   "
        }))
        .unwrap();

        assert_eq!(transaction.category_name(), UNCATEGORIZED);
    }

    #[test]
    fn test_transaction_type_from_str() {
        assert_eq!("income".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert_eq!(" Expense ".parse::<TransactionType>(), Ok(TransactionType::Expense));
        assert!("".parse::<TransactionType>().is_err());
        assert!("refund".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_draft_serializes_wire_shape() {
        let draft = TransactionDraft {
            transaction_type: TransactionType::Expense,
            amount: 40.0,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category: "Food".to_string(),
            description: None,
        };

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            value,
            json!({ "type": "expense", "amount": 40.0, "date": "2024-01-01", "category": "Food" })
        );
    }

    #[test]
    fn test_category_accepts_either_id_key() {
        let with_underscore: Category =
            serde_json::from_value(json!({ "_id": "c1", "name": "Rent", "type": "expense" }))
                .unwrap();
        let plain: Category =
            serde_json::from_value(json!({ "id": "c1", "name": "Rent", "type": "expense" }))
                .unwrap();

        assert_eq!(with_underscore, plain);
        assert_eq!(plain.category_type, TransactionType::Expense);
    }

    #[test]
    fn test_change_password_wire_shape() {
        let request = ChangePasswordRequest {
            new_password: "s3cret!".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "newPassword": "s3cret!" })
        );
    }

    #[test]
    fn test_login_response_only_needs_token() {
        let response: LoginResponse = serde_json::from_value(json!({ "token": "t0k" })).unwrap();
        assert_eq!(response.token, "t0k");
        assert_eq!(response.username, None);
    }
}
