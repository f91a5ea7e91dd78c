//! Client-side form validation.
//!
//! Each form holds raw input text and validates into a typed request payload,
//! reporting every failed constraint at once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    calendar_day, ChangePasswordRequest, LoginRequest, NewCategory, RegisterRequest, Transaction,
    TransactionDraft, TransactionType, UpdateProfileRequest, UNCATEGORIZED,
};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Transaction type is required")]
    MissingType,
    #[error("Type must be income or expense")]
    InvalidType(String),
    #[error("Amount is required")]
    MissingAmount,
    #[error("Amount must be a number")]
    InvalidAmount(String),
    #[error("Amount must be positive")]
    AmountNotPositive,
    #[error("Category is required")]
    MissingCategory,
    #[error("Date is required")]
    MissingDate,
    #[error("Date must be in YYYY-MM-DD format")]
    InvalidDate(String),
    #[error("Category name is required")]
    MissingCategoryName,
    #[error("Email is required")]
    MissingEmail,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Username is required")]
    MissingUsername,
    #[error("Passwords must match")]
    PasswordMismatch,
}

/// Raw input of the add/update transaction form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionForm {
    pub transaction_type: String,
    pub amount: String,
    pub category: String,
    pub date: String,
    pub description: String,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            transaction_type: String::new(),
            amount: String::new(),
            category: UNCATEGORIZED.to_string(),
            date: String::new(),
            description: String::new(),
        }
    }
}

impl TransactionForm {
    /// Pre-fill the form for editing an existing transaction.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            transaction_type: transaction
                .transaction_type
                .map(|kind| kind.as_str().to_string())
                .unwrap_or_default(),
            amount: if transaction.amount > 0.0 {
                transaction.amount.to_string()
            } else {
                String::new()
            },
            category: transaction.category_name().to_string(),
            date: transaction
                .day()
                .map(|day| day.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            description: transaction.description.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<TransactionDraft, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let transaction_type = parse_type(&self.transaction_type, &mut errors);

        let amount_text = self.amount.trim();
        let amount = if amount_text.is_empty() {
            errors.push(ValidationError::MissingAmount);
            None
        } else {
            match amount_text.parse::<f64>() {
                Ok(value) if !value.is_finite() => {
                    errors.push(ValidationError::InvalidAmount(amount_text.to_string()));
                    None
                }
                Ok(value) if value <= 0.0 => {
                    errors.push(ValidationError::AmountNotPositive);
                    None
                }
                Ok(value) => Some(value),
                Err(_) => {
                    errors.push(ValidationError::InvalidAmount(amount_text.to_string()));
                    None
                }
            }
        };

        let category = self.category.trim();
        if category.is_empty() {
            errors.push(ValidationError::MissingCategory);
        }

        let date_text = self.date.trim();
        let date: Option<NaiveDate> = if date_text.is_empty() {
            errors.push(ValidationError::MissingDate);
            None
        } else {
            let parsed = calendar_day(date_text);
            if parsed.is_none() {
                errors.push(ValidationError::InvalidDate(date_text.to_string()));
            }
            parsed
        };

        let description = self.description.trim();

        match (transaction_type, amount, date) {
            (Some(transaction_type), Some(amount), Some(date)) if errors.is_empty() => {
                Ok(TransactionDraft {
                    transaction_type,
                    amount,
                    date,
                    category: category.to_string(),
                    description: (!description.is_empty()).then(|| description.to_string()),
                })
            }
            _ => Err(errors),
        }
    }
}

/// Raw input of the add-category form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    pub category_type: String,
}

impl CategoryForm {
    pub fn validate(&self) -> Result<NewCategory, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let category_type = parse_type(&self.category_type, &mut errors);
        let name = self.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::MissingCategoryName);
        }

        match category_type {
            Some(category_type) if errors.is_empty() => Ok(NewCategory {
                name: name.to_string(),
                category_type,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let email = check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);

        if errors.is_empty() {
            Ok(LoginRequest {
                email,
                password: self.password.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let username = self.username.trim();
        if username.is_empty() {
            errors.push(ValidationError::MissingUsername);
        }
        let email = check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        if self.password != self.confirm_password {
            errors.push(ValidationError::PasswordMismatch);
        }

        if errors.is_empty() {
            Ok(RegisterRequest {
                username: username.to_string(),
                email,
                password: self.password.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

/// Profile edit form, prefilled with the logged-in identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
}

impl ProfileForm {
    pub fn prefilled(username: Option<&str>, email: Option<&str>) -> Self {
        Self {
            username: username.unwrap_or_default().to_string(),
            email: email.unwrap_or_default().to_string(),
        }
    }

    pub fn validate(&self) -> Result<UpdateProfileRequest, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let username = self.username.trim();
        if username.is_empty() {
            errors.push(ValidationError::MissingUsername);
        }
        let email = check_email(&self.email, &mut errors);

        if errors.is_empty() {
            Ok(UpdateProfileRequest {
                username: username.to_string(),
                email,
            })
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePasswordForm {
    pub password: String,
}

impl ChangePasswordForm {
    pub fn validate(&self) -> Result<ChangePasswordRequest, Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_password(&self.password, &mut errors);

        if errors.is_empty() {
            Ok(ChangePasswordRequest {
                new_password: self.password.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

fn parse_type(raw: &str, errors: &mut Vec<ValidationError>) -> Option<TransactionType> {
    let value = raw.trim();
    if value.is_empty() {
        errors.push(ValidationError::MissingType);
        return None;
    }
    match value.parse() {
        Ok(kind) => Some(kind),
        Err(_) => {
            errors.push(ValidationError::InvalidType(value.to_string()));
            None
        }
    }
}

fn check_email(raw: &str, errors: &mut Vec<ValidationError>) -> String {
    let email = raw.trim();
    if email.is_empty() {
        errors.push(ValidationError::MissingEmail);
    } else if !is_valid_email(email) {
        errors.push(ValidationError::InvalidEmail);
    }
    email.to_string()
}

fn check_password(password: &str, errors: &mut Vec<ValidationError>) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(ValidationError::PasswordTooShort);
    }
}

/// Loose shape check: one `@`, non-empty local part, dotted domain, no spaces.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> TransactionForm {
        TransactionForm {
            transaction_type: "income".to_string(),
            amount: "150.75".to_string(),
            category: "Salary".to_string(),
            date: "2024-01-31".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_transaction_form_defaults_to_uncategorized() {
        assert_eq!(TransactionForm::default().category, UNCATEGORIZED);
    }

    #[test]
    fn test_valid_transaction_form() {
        let draft = filled_form().validate().unwrap();

        assert_eq!(draft.transaction_type, TransactionType::Income);
        assert_eq!(draft.amount, 150.75);
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(draft.category, "Salary");
        assert_eq!(draft.description, None);
    }

    #[test]
    fn test_empty_transaction_form_reports_every_problem() {
        let form = TransactionForm {
            category: String::new(),
            ..TransactionForm::default()
        };

        assert_eq!(
            form.validate(),
            Err(vec![
                ValidationError::MissingType,
                ValidationError::MissingAmount,
                ValidationError::MissingCategory,
                ValidationError::MissingDate,
            ])
        );
    }

    #[test]
    fn test_amount_must_be_positive_number() {
        let zero = TransactionForm {
            amount: "0".to_string(),
            ..filled_form()
        };
        assert_eq!(zero.validate(), Err(vec![ValidationError::AmountNotPositive]));

        let text = TransactionForm {
            amount: "ten".to_string(),
            ..filled_form()
        };
        assert_eq!(
            text.validate(),
            Err(vec![ValidationError::InvalidAmount("ten".to_string())])
        );
    }

    #[test]
    fn test_invalid_type_and_date() {
        let form = TransactionForm {
            transaction_type: "gift".to_string(),
            date: "tomorrow".to_string(),
            ..filled_form()
        };

        assert_eq!(
            form.validate(),
            Err(vec![
                ValidationError::InvalidType("gift".to_string()),
                ValidationError::InvalidDate("tomorrow".to_string()),
            ])
        );
    }

    #[test]
    fn test_form_prefill_from_transaction() {
        let transaction = Transaction {
            id: "t1".to_string(),
            transaction_type: Some(TransactionType::Expense),
            amount: 40.0,
            date: "2024-01-01T00:00:00.000Z".to_string(),
            category: None,
            description: Some("Groceries".to_string()),
        };

        let form = TransactionForm::from_transaction(&transaction);
        assert_eq!(form.transaction_type, "expense");
        assert_eq!(form.amount, "40");
        assert_eq!(form.category, UNCATEGORIZED);
        assert_eq!(form.date, "2024-01-01");
        assert_eq!(form.description, "Groceries");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_category_form() {
        let form = CategoryForm {
            name: "  Travel ".to_string(),
            category_type: "expense".to_string(),
        };
        assert_eq!(
            form.validate(),
            Ok(NewCategory {
                name: "Travel".to_string(),
                category_type: TransactionType::Expense,
            })
        );

        assert_eq!(
            CategoryForm::default().validate(),
            Err(vec![ValidationError::MissingType, ValidationError::MissingCategoryName])
        );
    }

    #[test]
    fn test_login_form() {
        let form = LoginForm {
            email: "bee@hive.io".to_string(),
            password: "honey123".to_string(),
        };
        assert!(form.validate().is_ok());

        let bad = LoginForm {
            email: "bee@hive".to_string(),
            password: "short".to_string(),
        };
        assert_eq!(
            bad.validate(),
            Err(vec![ValidationError::InvalidEmail, ValidationError::PasswordTooShort])
        );
    }

    #[test]
    fn test_register_form_requires_matching_passwords() {
        let form = RegisterForm {
            username: "queen".to_string(),
            email: "queen@hive.io".to_string(),
            password: "royaljelly".to_string(),
            confirm_password: "royaljely".to_string(),
        };
        assert_eq!(form.validate(), Err(vec![ValidationError::PasswordMismatch]));

        let fixed = RegisterForm {
            confirm_password: "royaljelly".to_string(),
            ..form
        };
        assert_eq!(fixed.validate().unwrap().username, "queen");
    }

    #[test]
    fn test_profile_form_prefill_and_validate() {
        let form = ProfileForm::prefilled(Some("bee"), None);
        assert_eq!(form.username, "bee");
        assert_eq!(form.validate(), Err(vec![ValidationError::MissingEmail]));

        let form = ProfileForm {
            username: "  worker ".to_string(),
            email: " worker@hive.io ".to_string(),
        };
        let request = form.validate().unwrap();
        assert_eq!(request.username, "worker");
        assert_eq!(request.email, "worker@hive.io");

        assert_eq!(
            ProfileForm::default().validate(),
            Err(vec![ValidationError::MissingUsername, ValidationError::MissingEmail])
        );
    }

    #[test]
    fn test_change_password_minimum_length() {
        let short = ChangePasswordForm {
            password: "x".repeat(MIN_PASSWORD_LENGTH - 1),
        };
        assert_eq!(short.validate(), Err(vec![ValidationError::PasswordTooShort]));
        assert_eq!(
            ChangePasswordForm::default().validate(),
            Err(vec![ValidationError::PasswordTooShort])
        );

        let ok = ChangePasswordForm {
            password: "x".repeat(MIN_PASSWORD_LENGTH),
        };
        assert_eq!(ok.validate().unwrap().new_password, "xxxxxx");
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@@c.de"));
        assert!(!is_valid_email("a@.de"));
    }
}
