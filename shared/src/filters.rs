//! Dashboard filter state and the query parameters derived from it.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Category, TransactionType, UNCATEGORIZED};

/// One user-editable filter input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    StartDate,
    EndDate,
    Type,
    Category,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::StartDate,
        FilterField::EndDate,
        FilterField::Type,
        FilterField::Category,
    ];

    /// Query parameter name understood by the backend.
    pub fn query_key(&self) -> &'static str {
        match self {
            FilterField::StartDate => "startDate",
            FilterField::EndDate => "endDate",
            FilterField::Type => "type",
            FilterField::Category => "category",
        }
    }

    /// Look a field up by its form input name (the query key).
    pub fn from_input_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.query_key() == name)
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("{field} must be a date in YYYY-MM-DD format, got {value:?}")]
    InvalidDate { field: FilterField, value: String },
    #[error("type must be income or expense, got {0:?}")]
    InvalidType(String),
}

/// Snapshot of the user's transaction filters.
///
/// Values are never mutated in place: every setter returns a new state, so a
/// change is always observable as a new value. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    transaction_type: Option<TransactionType>,
    category: Option<String>,
}

impl FilterState {
    /// The canonical empty state.
    pub fn clear() -> Self {
        Self::default()
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn transaction_type(&self) -> Option<TransactionType> {
        self.transaction_type
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Choices for the category filter.
    ///
    /// Known categories come first in list order, then [`UNCATEGORIZED`], then
    /// names still carried by transactions whose category was deleted. The
    /// selected category is always offered so the current filter stays visible.
    pub fn category_options<'a>(
        &self,
        categories: &'a [Category],
        in_use: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        let mut options: Vec<String> = Vec::with_capacity(categories.len() + 1);
        let mut push = |name: &str| {
            let name = name.trim();
            if !name.is_empty() && !options.iter().any(|o| o == name) {
                options.push(name.to_string());
            }
        };

        for category in categories {
            push(category.name.as_str());
        }
        push(UNCATEGORIZED);

        let mut orphaned: Vec<&str> = in_use.into_iter().collect();
        orphaned.sort_unstable();
        for name in orphaned {
            push(name);
        }
        if let Some(selected) = self.category() {
            push(selected);
        }
        options
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn with_start_date(&self, date: Option<NaiveDate>) -> Self {
        Self {
            start_date: date,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_end_date(&self, date: Option<NaiveDate>) -> Self {
        Self {
            end_date: date,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_type(&self, transaction_type: Option<TransactionType>) -> Self {
        Self {
            transaction_type,
            ..self.clone()
        }
    }

    /// Blank names are stored as "no constraint".
    #[must_use]
    pub fn with_category(&self, category: Option<&str>) -> Self {
        let category = category
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        Self {
            category,
            ..self.clone()
        }
    }

    /// Replace one field from raw form input.
    ///
    /// A blank value unsets the field. Dates must be `YYYY-MM-DD`; types must
    /// be `income` or `expense`.
    pub fn set_field(&self, field: FilterField, raw: &str) -> Result<Self, FilterError> {
        let value = raw.trim();
        let next = match field {
            FilterField::StartDate => self.with_start_date(parse_date(field, value)?),
            FilterField::EndDate => self.with_end_date(parse_date(field, value)?),
            FilterField::Type => {
                let transaction_type: Option<TransactionType> = if value.is_empty() {
                    None
                } else {
                    Some(
                        value
                            .parse()
                            .map_err(|_| FilterError::InvalidType(value.to_string()))?,
                    )
                };
                self.with_type(transaction_type)
            }
            FilterField::Category => self.with_category(Some(value)),
        };
        Ok(next)
    }

    /// Raw form value of a field, empty when unset.
    pub fn field_value(&self, field: FilterField) -> String {
        match field {
            FilterField::StartDate => format_date(self.start_date),
            FilterField::EndDate => format_date(self.end_date),
            FilterField::Type => self
                .transaction_type
                .map(|kind| kind.as_str().to_string())
                .unwrap_or_default(),
            FilterField::Category => self.category.clone().unwrap_or_default(),
        }
    }

    /// Query parameters for the set fields only, in a stable order.
    ///
    /// Unset fields are left out entirely; an empty value is never emitted.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        FilterField::ALL
            .into_iter()
            .map(|field| (field.query_key(), self.field_value(field)))
            .filter(|(_, value)| !value.is_empty())
            .collect()
    }
}

fn parse_date(field: FilterField, value: &str) -> Result<Option<NaiveDate>, FilterError> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FilterError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state_has_no_query_params() {
        let state = FilterState::clear();
        assert!(state.is_empty());
        assert!(state.to_query_params().is_empty());
    }

    fn category(name: &str) -> Category {
        Category {
            id: format!("id-{name}"),
            name: name.to_string(),
            category_type: TransactionType::Expense,
        }
    }

    #[test]
    fn test_category_options_always_offer_uncategorized() {
        let options = FilterState::clear().category_options(&[], []);
        assert_eq!(options, vec![UNCATEGORIZED.to_string()]);

        let categories = vec![category("Rent"), category("Food")];
        let options = FilterState::clear().category_options(&categories, []);
        assert_eq!(options, vec!["Rent", "Food", UNCATEGORIZED]);
    }

    #[test]
    fn test_category_options_keep_orphaned_and_selected_names() {
        let categories = vec![category("Food"), category(UNCATEGORIZED)];
        let state = FilterState::clear()
            .set_field(FilterField::Category, "Gifts")
            .unwrap();

        let options =
            state.category_options(&categories, ["Travel", "Food", "  ", "Books", "Travel"]);
        assert_eq!(options, vec!["Food", UNCATEGORIZED, "Books", "Travel", "Gifts"]);
    }

    #[test]
    fn test_set_field_does_not_touch_original() {
        let original = FilterState::clear();
        let updated = original.set_field(FilterField::Category, "Food").unwrap();

        assert_eq!(original, FilterState::clear());
        assert_eq!(updated.category(), Some("Food"));
    }

    #[test]
    fn test_query_params_only_contain_set_fields() {
        let state = FilterState::clear()
            .set_field(FilterField::EndDate, "2024-01-31")
            .unwrap()
            .set_field(FilterField::Type, "expense")
            .unwrap();

        assert_eq!(
            state.to_query_params(),
            vec![("endDate", "2024-01-31".to_string()), ("type", "expense".to_string())]
        );
    }

    #[test]
    fn test_all_fields_in_stable_order() {
        let state = FilterState::clear()
            .set_field(FilterField::Category, "Rent")
            .unwrap()
            .set_field(FilterField::Type, "income")
            .unwrap()
            .set_field(FilterField::EndDate, "2024-02-01")
            .unwrap()
            .set_field(FilterField::StartDate, "2024-01-01")
            .unwrap();

        let keys: Vec<&str> = state.to_query_params().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["startDate", "endDate", "type", "category"]);
    }

    #[test]
    fn test_blank_value_unsets_field() {
        let state = FilterState::clear()
            .set_field(FilterField::StartDate, "2024-01-01")
            .unwrap()
            .set_field(FilterField::StartDate, "")
            .unwrap();

        assert_eq!(state.start_date(), None);
        assert!(!state
            .to_query_params()
            .iter()
            .any(|(key, _)| *key == "startDate"));
    }

    #[test]
    fn test_whitespace_category_is_unset() {
        let state = FilterState::clear()
            .set_field(FilterField::Category, "   ")
            .unwrap();
        assert_eq!(state.category(), None);
        assert!(state.is_empty());
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let state = FilterState::clear();

        assert_eq!(
            state.set_field(FilterField::StartDate, "31/01/2024"),
            Err(FilterError::InvalidDate {
                field: FilterField::StartDate,
                value: "31/01/2024".to_string(),
            })
        );
        assert_eq!(
            state.set_field(FilterField::Type, "transfer"),
            Err(FilterError::InvalidType("transfer".to_string()))
        );
    }

    #[test]
    fn test_field_lookup_by_input_name() {
        assert_eq!(FilterField::from_input_name("startDate"), Some(FilterField::StartDate));
        assert_eq!(FilterField::from_input_name("category"), Some(FilterField::Category));
        assert_eq!(FilterField::from_input_name("amount"), None);
    }

    #[test]
    fn test_field_value_round_trips_form_input() {
        let state = FilterState::clear()
            .set_field(FilterField::Type, "Income")
            .unwrap();
        assert_eq!(state.field_value(FilterField::Type), "income");
        assert_eq!(state.field_value(FilterField::StartDate), "");
    }

    #[test]
    fn test_clear_resets_everything() {
        let state = FilterState::clear()
            .set_field(FilterField::Type, "income")
            .unwrap();
        assert!(!state.is_empty());
        assert_eq!(FilterState::clear(), FilterState::default());
    }
}
