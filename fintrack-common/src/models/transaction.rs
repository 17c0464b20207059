use chrono::{NaiveDate, NaiveDateTime};
use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::transactions;
use crate::types::{Category, Frequency, TransactionKind};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Identifiable, Queryable)]
#[diesel(table_name = transactions)]
pub struct Transaction {
    pub id: Uuid,
    pub user_email: String,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub category: Category,
    pub tags: Vec<String>,
    pub transaction_date: NaiveDate,
    pub description: Option<String>,
    pub is_recurring: bool,
    pub recurring_frequency: Option<Frequency>,
    pub auto_save: bool,
    pub goal_id: Option<Uuid>,
    pub currency: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = transactions)]
pub struct NewTransaction<'a> {
    pub id: Uuid,
    pub user_email: &'a str,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub category: Category,
    pub tags: Vec<String>,
    pub transaction_date: NaiveDate,
    pub description: Option<&'a str>,
    pub is_recurring: bool,
    pub recurring_frequency: Option<Frequency>,
    pub auto_save: bool,
    pub goal_id: Option<Uuid>,
    pub currency: &'a str,
    pub created_at: NaiveDateTime,
}

/// Owner-initiated edit. `None` fields are left untouched.
#[derive(Clone, Debug, Deserialize, AsChangeset)]
#[diesel(table_name = transactions)]
pub struct TransactionChanges {
    pub kind: Option<TransactionKind>,
    pub amount_cents: Option<i64>,
    pub category: Option<Category>,
    pub tags: Option<Vec<String>>,
    pub transaction_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurring_frequency: Option<Frequency>,
    pub auto_save: Option<bool>,
    pub currency: Option<String>,
}
