use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::budgets;
use crate::types::{Category, Month};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Identifiable, Queryable)]
#[diesel(table_name = budgets)]
pub struct Budget {
    pub id: Uuid,
    pub user_email: String,
    pub amount_cents: i64,
    pub category: Option<Category>,
    pub month: Month,
    pub currency: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = budgets)]
pub struct NewBudget<'a> {
    pub id: Uuid,
    pub user_email: &'a str,
    pub amount_cents: i64,
    pub category: Option<Category>,
    pub month: Month,
    pub currency: &'a str,
    pub created_at: NaiveDateTime,
}
