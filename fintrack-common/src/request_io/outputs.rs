use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::budget::Budget;
use crate::models::goal::Goal;
use crate::models::transaction::Transaction;
use crate::reports::BudgetStatus;
use crate::types::{Category, Frequency, Month, TransactionKind};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputToken {
    pub token: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputAllocatedGoal {
    pub goal_id: Uuid,
    pub title: String,
    pub saved_amount_cents: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputCreatedTransaction {
    pub message: String,
    pub transaction: Transaction,
    pub auto_saved_goal: Option<OutputAllocatedGoal>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputDeletedTransaction {
    pub message: String,
    pub transaction: Transaction,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputUpcomingTransaction {
    pub category: Category,
    pub amount_cents: i64,
    pub next_transaction_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputBudgetStatus {
    pub budget: Budget,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputCreatedBudget {
    pub message: String,
    pub budget: Budget,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputRecommendation {
    pub category: Option<Category>,
    pub budget_amount_cents: i64,
    pub spent_amount_cents: i64,
    pub recommendation: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputCreatedGoal {
    pub message: String,
    pub goal: Goal,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputGoalWithProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress_percentage: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputConversion {
    pub from: String,
    pub to: String,
    pub amount_cents: i64,
    pub converted_amount_cents: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UnusualSpendingAlert {
    pub category: Category,
    pub amount_cents: i64,
    pub alert: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputUnusualSpending {
    pub message: String,
    pub notifications: Vec<UnusualSpendingAlert>,
}

// Report shapes

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ReportTotals {
    pub total_income_cents: i64,
    pub total_expense_cents: i64,
    pub net_savings_cents: i64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TrendPoint {
    pub period_label: String,
    pub income_cents: i64,
    pub expense_cents: i64,
    pub net_cents: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputSpendingTrends {
    pub period: Frequency,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub trends: Vec<TrendPoint>,
    pub summary: ReportTotals,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CategoryTotals {
    pub category: Category,
    pub income_cents: i64,
    pub expense_cents: i64,
    pub net_cents: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputIncomeExpenseReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: ReportTotals,
    pub category_breakdown: Vec<CategoryTotals>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BreakdownTransaction {
    pub amount_cents: i64,
    pub kind: TransactionKind,
    pub transaction_date: NaiveDate,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputCategoryBreakdown {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub category: Category,
    pub summary: ReportTotals,
    pub transactions: Vec<BreakdownTransaction>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TypeBreakdownTransaction {
    pub amount_cents: i64,
    pub category: Category,
    pub transaction_date: NaiveDate,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputTypeBreakdown {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub total_amount_cents: i64,
    pub transactions: Vec<TypeBreakdownTransaction>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BudgetedCategoryReport {
    pub category: Option<Category>,
    pub budget_amount_cents: i64,
    pub actual_spent_cents: i64,
    pub remaining_budget_cents: i64,
    pub percentage_used: f64,
    pub status: BudgetStatus,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UnbudgetedCategoryReport {
    pub category: Category,
    pub actual_spent_cents: i64,
    pub status: BudgetStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct BudgetVsActualTotals {
    pub total_budget_cents: i64,
    pub total_spent_cents: i64,
    pub total_remaining_cents: i64,
    pub percentage_used: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputBudgetVsActual {
    pub year: i32,
    pub month: Month,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budgeted_categories: Vec<BudgetedCategoryReport>,
    pub unbudgeted_categories: Vec<UnbudgetedCategoryReport>,
    pub totals: BudgetVsActualTotals,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CategoryAmount {
    pub category: Category,
    pub amount_cents: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OutputFinancialSummary {
    pub total_income_cents: i64,
    pub total_expense_cents: i64,
    pub net_savings_cents: i64,
    pub savings_rate: f64,
    pub transaction_count: usize,
    pub largest_income_category: Option<CategoryAmount>,
    pub largest_expense_category: Option<CategoryAmount>,
}
