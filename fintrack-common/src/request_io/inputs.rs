use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Category, Frequency, TransactionKind};
use crate::validators::{self, Validity};

pub const MAX_DESCRIPTION_LEN: usize = 200;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CredentialPair {
    pub email: String,
    pub password: String,
    pub preferred_currency: Option<String>,
}

impl CredentialPair {
    pub fn validate_email_address(&self) -> Validity {
        validators::validate_email_address(&self.email)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputTransaction {
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    pub transaction_date: NaiveDate,
    pub description: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurring_frequency: Option<Frequency>,
    #[serde(default)]
    pub auto_save: bool,
    pub currency: Option<String>,
}

impl InputTransaction {
    pub fn validate(&self) -> Validity {
        if self.amount_cents < 0 {
            return Validity::Invalid(String::from("Transaction amount cannot be negative"));
        }

        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Validity::Invalid(format!(
                    "Description cannot be longer than {MAX_DESCRIPTION_LEN} characters"
                ));
            }
        }

        if self.is_recurring && self.recurring_frequency.is_none() {
            return Validity::Invalid(String::from(
                "A recurring transaction requires a recurring_frequency",
            ));
        }

        Validity::Valid
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputBudget {
    pub amount_cents: i64,
    pub category: Option<Category>,
    pub month: String,
    pub currency: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputGoal {
    pub title: String,
    pub target_amount_cents: i64,
    pub deadline: NaiveDate,
    pub auto_save_percentage: i16,
    pub priority_level: Option<i32>,
    pub currency: Option<String>,
}

impl InputGoal {
    pub fn validate(&self) -> Validity {
        if self.title.trim().is_empty() {
            return Validity::Invalid(String::from("Goal title cannot be empty"));
        }

        if self.target_amount_cents <= 0 {
            return Validity::Invalid(String::from("Goal target amount must be positive"));
        }

        if !(0..=100).contains(&self.auto_save_percentage) {
            return Validity::Invalid(String::from(
                "Auto-save percentage must be between 0 and 100",
            ));
        }

        Validity::Valid
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputEditGoal {
    pub saved_amount_cents: i64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BudgetStatusParams {
    pub category: Option<Category>,
    pub month: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RecommendationParams {
    pub category: Option<Category>,
    pub month: Option<String>,
    pub spent_amount_cents: Option<i64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TrendParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub frequency: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DateRangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CategoryBreakdownParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category: Option<Category>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TypeBreakdownParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BudgetVsActualParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}
