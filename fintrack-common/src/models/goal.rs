use chrono::{NaiveDate, NaiveDateTime};
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::goals;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Identifiable, Queryable)]
#[diesel(table_name = goals)]
pub struct Goal {
    pub id: Uuid,
    pub user_email: String,
    pub title: String,
    pub target_amount_cents: i64,
    pub saved_amount_cents: i64,
    pub deadline: NaiveDate,
    pub auto_save_percentage: i16,
    pub priority_level: i32,
    pub currency: String,
    pub created_at: NaiveDateTime,
}

impl Goal {
    /// Fraction of the target reached, in [0, 1]. Zero when the target is 0.
    pub fn progress(&self) -> f64 {
        if self.target_amount_cents > 0 {
            self.saved_amount_cents as f64 / self.target_amount_cents as f64
        } else {
            0.0
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = goals)]
pub struct NewGoal<'a> {
    pub id: Uuid,
    pub user_email: &'a str,
    pub title: &'a str,
    pub target_amount_cents: i64,
    pub saved_amount_cents: i64,
    pub deadline: NaiveDate,
    pub auto_save_percentage: i16,
    pub priority_level: i32,
    pub currency: &'a str,
    pub created_at: NaiveDateTime,
}
