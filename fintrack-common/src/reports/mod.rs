//! Reporting engine. Every report here is a pure function over rows that
//! have already been fetched (and scoped to a user) by a Dao, which keeps
//! the aggregation logic testable without a database.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::budget::Budget;
use crate::models::transaction::Transaction;
use crate::request_io::{
    BreakdownTransaction, BudgetVsActualTotals, BudgetedCategoryReport, CategoryAmount,
    CategoryTotals, OutputBudgetVsActual, OutputCategoryBreakdown, OutputFinancialSummary,
    OutputIncomeExpenseReport, OutputSpendingTrends, OutputTypeBreakdown, ReportTotals,
    TrendPoint, TypeBreakdownTransaction, UnbudgetedCategoryReport, UnusualSpendingAlert,
};
use crate::types::{Category, Frequency, Month, TransactionKind};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Exceeded,
    Warning,
    Good,
    Unbudgeted,
}

impl BudgetStatus {
    /// Exceeded at 100% or more, warning at 80% or more, good below that.
    pub fn classify(percentage_used: f64) -> BudgetStatus {
        if percentage_used >= 100.0 {
            BudgetStatus::Exceeded
        } else if percentage_used >= 80.0 {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Good
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Inclusive first and last day of the given month.
pub fn month_bounds(year: i32, month: Month) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month.number(), 1)?;

    let first_of_next = if month.number() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month.number() + 1, 1)?
    };

    Some((start, first_of_next.pred_opt()?))
}

/// The bucket label a transaction date falls into for trend grouping.
/// Labels sort lexicographically in chronological order.
fn period_label(date: NaiveDate, frequency: Frequency) -> String {
    match frequency {
        Frequency::Daily => date.format("%Y-%m-%d").to_string(),
        Frequency::Weekly => {
            let iso_week = date.iso_week();
            format!("{}-W{:02}", iso_week.year(), iso_week.week())
        }
        Frequency::Monthly => date.format("%Y-%m").to_string(),
        Frequency::Yearly => date.format("%Y").to_string(),
    }
}

fn totals_of(transactions: &[Transaction]) -> ReportTotals {
    let mut totals = ReportTotals::default();

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => totals.total_income_cents += transaction.amount_cents,
            TransactionKind::Expense => totals.total_expense_cents += transaction.amount_cents,
        }
    }

    totals.net_savings_cents = totals.total_income_cents - totals.total_expense_cents;
    totals
}

/// Income and expense totals bucketed by calendar period, oldest bucket
/// first. Periods with no transactions are omitted.
pub fn spending_trends(
    transactions: &[Transaction],
    frequency: Frequency,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> OutputSpendingTrends {
    let mut buckets: BTreeMap<String, (i64, i64)> = BTreeMap::new();

    for transaction in transactions {
        let label = period_label(transaction.transaction_date, frequency);
        let bucket = buckets.entry(label).or_insert((0, 0));

        match transaction.kind {
            TransactionKind::Income => bucket.0 += transaction.amount_cents,
            TransactionKind::Expense => bucket.1 += transaction.amount_cents,
        }
    }

    let trends = buckets
        .into_iter()
        .map(|(period_label, (income_cents, expense_cents))| TrendPoint {
            period_label,
            income_cents,
            expense_cents,
            net_cents: income_cents - expense_cents,
        })
        .collect();

    OutputSpendingTrends {
        period: frequency,
        start_date,
        end_date,
        trends,
        summary: totals_of(transactions),
    }
}

/// Overall totals plus per-category income/expense, categories in name order.
pub fn income_expense_report(
    transactions: &[Transaction],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> OutputIncomeExpenseReport {
    let mut by_category: BTreeMap<&'static str, CategoryTotals> = BTreeMap::new();

    for transaction in transactions {
        let entry = by_category
            .entry(transaction.category.as_str())
            .or_insert(CategoryTotals {
                category: transaction.category,
                income_cents: 0,
                expense_cents: 0,
                net_cents: 0,
            });

        match transaction.kind {
            TransactionKind::Income => entry.income_cents += transaction.amount_cents,
            TransactionKind::Expense => entry.expense_cents += transaction.amount_cents,
        }
    }

    let category_breakdown = by_category
        .into_values()
        .map(|mut totals| {
            totals.net_cents = totals.income_cents - totals.expense_cents;
            totals
        })
        .collect();

    OutputIncomeExpenseReport {
        start_date,
        end_date,
        summary: totals_of(transactions),
        category_breakdown,
    }
}

/// Every transaction in one category, with totals for that category.
pub fn category_breakdown(
    transactions: &[Transaction],
    category: Category,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> OutputCategoryBreakdown {
    let in_category: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.category == category)
        .collect();

    let mut summary = ReportTotals::default();

    let listed = in_category
        .iter()
        .map(|t| {
            match t.kind {
                TransactionKind::Income => summary.total_income_cents += t.amount_cents,
                TransactionKind::Expense => summary.total_expense_cents += t.amount_cents,
            }

            BreakdownTransaction {
                amount_cents: t.amount_cents,
                kind: t.kind,
                transaction_date: t.transaction_date,
                description: t.description.clone().unwrap_or_default(),
                tags: t.tags.clone(),
            }
        })
        .collect();

    summary.net_savings_cents = summary.total_income_cents - summary.total_expense_cents;

    OutputCategoryBreakdown {
        start_date,
        end_date,
        category,
        summary,
        transactions: listed,
    }
}

/// Every transaction of one kind (income or expense) with the kind's total.
pub fn type_breakdown(
    transactions: &[Transaction],
    kind: TransactionKind,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> OutputTypeBreakdown {
    let mut total_amount_cents = 0;

    let listed = transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| {
            total_amount_cents += t.amount_cents;

            TypeBreakdownTransaction {
                amount_cents: t.amount_cents,
                category: t.category,
                transaction_date: t.transaction_date,
            }
        })
        .collect();

    OutputTypeBreakdown {
        start_date,
        end_date,
        kind,
        total_amount_cents,
        transactions: listed,
    }
}

/// Budgets for a month against what was actually spent in that month.
///
/// `expenses` must contain only expense transactions dated within the month.
/// A budget with no category is measured against total spending in the
/// month. Categories with spending but no budget are reported separately.
pub fn budget_vs_actual(
    budgets: &[Budget],
    expenses: &[Transaction],
    year: i32,
    month: Month,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> OutputBudgetVsActual {
    // First-seen order so the unbudgeted list follows spending order.
    let mut spend_by_category: Vec<(Category, i64)> = Vec::new();
    let mut all_expenses_cents = 0;

    for expense in expenses {
        all_expenses_cents += expense.amount_cents;

        match spend_by_category
            .iter_mut()
            .find(|(c, _)| *c == expense.category)
        {
            Some((_, spent)) => *spent += expense.amount_cents,
            None => spend_by_category.push((expense.category, expense.amount_cents)),
        }
    }

    let mut budgeted_categories = Vec::new();
    let mut total_budget_cents = 0;

    for budget in budgets {
        total_budget_cents += budget.amount_cents;

        let actual_spent_cents = match budget.category {
            Some(category) => spend_by_category
                .iter()
                .find(|(c, _)| *c == category)
                .map(|(_, spent)| *spent)
                .unwrap_or(0),
            None => all_expenses_cents,
        };

        let percentage_used = if budget.amount_cents > 0 {
            round2(actual_spent_cents as f64 / budget.amount_cents as f64 * 100.0)
        } else {
            0.0
        };

        budgeted_categories.push(BudgetedCategoryReport {
            category: budget.category,
            budget_amount_cents: budget.amount_cents,
            actual_spent_cents,
            remaining_budget_cents: budget.amount_cents - actual_spent_cents,
            percentage_used,
            status: BudgetStatus::classify(percentage_used),
        });
    }

    let unbudgeted_categories = spend_by_category
        .iter()
        .filter(|(category, _)| {
            !budgets
                .iter()
                .any(|budget| budget.category == Some(*category))
        })
        .map(|(category, spent)| UnbudgetedCategoryReport {
            category: *category,
            actual_spent_cents: *spent,
            status: BudgetStatus::Unbudgeted,
        })
        .collect();

    // Totals cover budgeted spending only; unbudgeted categories are listed
    // separately and do not count against the overall percentage.
    let total_spent_cents: i64 = budgeted_categories
        .iter()
        .map(|report| report.actual_spent_cents)
        .sum();

    let overall_percentage_used = if total_budget_cents > 0 {
        round2(total_spent_cents as f64 / total_budget_cents as f64 * 100.0)
    } else {
        0.0
    };

    OutputBudgetVsActual {
        year,
        month,
        start_date,
        end_date,
        budgeted_categories,
        unbudgeted_categories,
        totals: BudgetVsActualTotals {
            total_budget_cents,
            total_spent_cents,
            total_remaining_cents: total_budget_cents - total_spent_cents,
            percentage_used: overall_percentage_used,
        },
    }
}

/// Flags expenses that are more than double the typical transaction amount.
/// Alerts come out in transaction order.
pub fn unusual_spending(
    expenses: &[Transaction],
    typical_amount_cents: i64,
) -> Vec<UnusualSpendingAlert> {
    expenses
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
        .filter(|t| t.amount_cents > 2 * typical_amount_cents)
        .map(|t| UnusualSpendingAlert {
            category: t.category,
            amount_cents: t.amount_cents,
            alert: format!(
                "Unusual spending detected in {} of amount {}",
                t.category, t.amount_cents
            ),
        })
        .collect()
}

/// Totals, savings rate, and the single largest income and expense
/// categories over the given transactions. Ties keep the category seen
/// first.
pub fn financial_summary(transactions: &[Transaction]) -> OutputFinancialSummary {
    let totals = totals_of(transactions);

    let mut income_by_category: Vec<(Category, i64)> = Vec::new();
    let mut expense_by_category: Vec<(Category, i64)> = Vec::new();

    for transaction in transactions {
        let sums = match transaction.kind {
            TransactionKind::Income => &mut income_by_category,
            TransactionKind::Expense => &mut expense_by_category,
        };

        match sums.iter_mut().find(|(c, _)| *c == transaction.category) {
            Some((_, amount)) => *amount += transaction.amount_cents,
            None => sums.push((transaction.category, transaction.amount_cents)),
        }
    }

    let largest_of = |sums: &[(Category, i64)]| -> Option<CategoryAmount> {
        let mut largest: Option<CategoryAmount> = None;

        for (category, amount_cents) in sums {
            let is_larger = match &largest {
                Some(current) => *amount_cents > current.amount_cents,
                None => true,
            };

            if is_larger {
                largest = Some(CategoryAmount {
                    category: *category,
                    amount_cents: *amount_cents,
                });
            }
        }

        largest
    };

    let savings_rate = if totals.total_income_cents > 0 {
        round2(totals.net_savings_cents as f64 / totals.total_income_cents as f64 * 100.0)
    } else {
        0.0
    };

    OutputFinancialSummary {
        total_income_cents: totals.total_income_cents,
        total_expense_cents: totals.total_expense_cents,
        net_savings_cents: totals.net_savings_cents,
        savings_rate,
        transaction_count: transactions.len(),
        largest_income_category: largest_of(&income_by_category),
        largest_expense_category: largest_of(&expense_by_category),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uuid::Uuid;

    fn test_transaction(
        kind: TransactionKind,
        amount_cents: i64,
        category: Category,
        date: &str,
    ) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            user_email: String::from("test_user@example.com"),
            kind,
            amount_cents,
            category,
            tags: Vec::new(),
            transaction_date: date.parse().unwrap(),
            description: None,
            is_recurring: false,
            recurring_frequency: None,
            auto_save: false,
            goal_id: None,
            currency: String::from("GBP"),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    fn test_budget(amount_cents: i64, category: Option<Category>, month: Month) -> Budget {
        Budget {
            id: Uuid::new_v4(),
            user_email: String::from("test_user@example.com"),
            amount_cents,
            category,
            month,
            currency: String::from("GBP"),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_budget_status_thresholds() {
        assert_eq!(BudgetStatus::classify(0.0), BudgetStatus::Good);
        assert_eq!(BudgetStatus::classify(79.99), BudgetStatus::Good);
        assert_eq!(BudgetStatus::classify(80.0), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::classify(99.99), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::classify(100.0), BudgetStatus::Exceeded);
        assert_eq!(BudgetStatus::classify(250.0), BudgetStatus::Exceeded);
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            month_bounds(2025, Month::February).unwrap(),
            (
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
            )
        );
        assert_eq!(
            month_bounds(2024, Month::February).unwrap(),
            (
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
            )
        );
        assert_eq!(
            month_bounds(2025, Month::December).unwrap(),
            (
                NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
            )
        );
    }

    #[test]
    fn test_period_labels() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();

        assert_eq!(period_label(date, Frequency::Daily), "2025-03-09");
        assert_eq!(period_label(date, Frequency::Weekly), "2025-W10");
        assert_eq!(period_label(date, Frequency::Monthly), "2025-03");
        assert_eq!(period_label(date, Frequency::Yearly), "2025");

        // ISO weeks at a year boundary belong to the ISO year, not the
        // calendar year.
        let new_years_day = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        assert_eq!(period_label(new_years_day, Frequency::Weekly), "2026-W53");
    }

    #[test]
    fn test_spending_trends_buckets_ascending() {
        let transactions = vec![
            test_transaction(TransactionKind::Expense, 5_000, Category::Food, "2025-03-15"),
            test_transaction(TransactionKind::Income, 200_000, Category::Salary, "2025-01-31"),
            test_transaction(TransactionKind::Expense, 3_000, Category::Bills, "2025-01-10"),
            test_transaction(TransactionKind::Expense, 7_000, Category::Food, "2025-03-02"),
        ];

        let report = spending_trends(
            &transactions,
            Frequency::Monthly,
            "2025-01-01".parse().unwrap(),
            "2025-03-31".parse().unwrap(),
        );

        assert_eq!(
            report.trends,
            vec![
                TrendPoint {
                    period_label: String::from("2025-01"),
                    income_cents: 200_000,
                    expense_cents: 3_000,
                    net_cents: 197_000,
                },
                TrendPoint {
                    period_label: String::from("2025-03"),
                    income_cents: 0,
                    expense_cents: 12_000,
                    net_cents: -12_000,
                },
            ]
        );

        assert_eq!(report.summary.total_income_cents, 200_000);
        assert_eq!(report.summary.total_expense_cents, 15_000);
        assert_eq!(report.summary.net_savings_cents, 185_000);
    }

    #[test]
    fn test_income_expense_report_sorts_categories_by_name() {
        let transactions = vec![
            test_transaction(TransactionKind::Income, 150_000, Category::Salary, "2025-02-01"),
            test_transaction(TransactionKind::Expense, 20_000, Category::Food, "2025-02-03"),
            test_transaction(TransactionKind::Expense, 10_000, Category::Bills, "2025-02-05"),
            test_transaction(TransactionKind::Expense, 5_000, Category::Food, "2025-02-20"),
        ];

        let report = income_expense_report(
            &transactions,
            "2025-02-01".parse().unwrap(),
            "2025-02-28".parse().unwrap(),
        );

        let categories: Vec<Category> = report
            .category_breakdown
            .iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(
            categories,
            vec![Category::Bills, Category::Food, Category::Salary]
        );

        assert_eq!(report.category_breakdown[1].expense_cents, 25_000);
        assert_eq!(report.category_breakdown[1].net_cents, -25_000);
        assert_eq!(report.category_breakdown[2].income_cents, 150_000);
        assert_eq!(report.summary.net_savings_cents, 115_000);
    }

    #[test]
    fn test_category_breakdown_filters_and_totals() {
        let transactions = vec![
            test_transaction(TransactionKind::Expense, 20_000, Category::Food, "2025-02-03"),
            test_transaction(TransactionKind::Expense, 10_000, Category::Bills, "2025-02-05"),
            test_transaction(TransactionKind::Income, 1_000, Category::Food, "2025-02-10"),
        ];

        let report = category_breakdown(
            &transactions,
            Category::Food,
            "2025-02-01".parse().unwrap(),
            "2025-02-28".parse().unwrap(),
        );

        assert_eq!(report.transactions.len(), 2);
        assert_eq!(report.summary.total_expense_cents, 20_000);
        assert_eq!(report.summary.total_income_cents, 1_000);
        assert_eq!(report.summary.net_savings_cents, -19_000);
    }

    #[test]
    fn test_type_breakdown_filters_by_kind() {
        let transactions = vec![
            test_transaction(TransactionKind::Expense, 20_000, Category::Food, "2025-02-03"),
            test_transaction(TransactionKind::Income, 150_000, Category::Salary, "2025-02-01"),
            test_transaction(TransactionKind::Expense, 10_000, Category::Bills, "2025-02-05"),
        ];

        let report = type_breakdown(
            &transactions,
            TransactionKind::Expense,
            "2025-02-01".parse().unwrap(),
            "2025-02-28".parse().unwrap(),
        );

        assert_eq!(report.total_amount_cents, 30_000);
        assert_eq!(report.transactions.len(), 2);
        assert_eq!(report.transactions[0].category, Category::Food);
    }

    #[test]
    fn test_budget_vs_actual_statuses() {
        let budgets = vec![
            test_budget(100_000, Some(Category::Food), Month::February),
            test_budget(10_000, Some(Category::Bills), Month::February),
            test_budget(50_000, Some(Category::Entertainment), Month::February),
        ];

        let expenses = vec![
            test_transaction(TransactionKind::Expense, 90_000, Category::Food, "2025-02-03"),
            test_transaction(TransactionKind::Expense, 10_000, Category::Bills, "2025-02-05"),
            test_transaction(TransactionKind::Expense, 5_000, Category::Entertainment, "2025-02-08"),
            test_transaction(TransactionKind::Expense, 2_500, Category::Other, "2025-02-11"),
        ];

        let report = budget_vs_actual(
            &budgets,
            &expenses,
            2025,
            Month::February,
            "2025-02-01".parse().unwrap(),
            "2025-02-28".parse().unwrap(),
        );

        let food = &report.budgeted_categories[0];
        assert_eq!(food.percentage_used, 90.0);
        assert_eq!(food.status, BudgetStatus::Warning);
        assert_eq!(food.remaining_budget_cents, 10_000);

        let bills = &report.budgeted_categories[1];
        assert_eq!(bills.percentage_used, 100.0);
        assert_eq!(bills.status, BudgetStatus::Exceeded);

        let entertainment = &report.budgeted_categories[2];
        assert_eq!(entertainment.percentage_used, 10.0);
        assert_eq!(entertainment.status, BudgetStatus::Good);

        assert_eq!(report.unbudgeted_categories.len(), 1);
        assert_eq!(report.unbudgeted_categories[0].category, Category::Other);
        assert_eq!(report.unbudgeted_categories[0].actual_spent_cents, 2_500);
        assert_eq!(
            report.unbudgeted_categories[0].status,
            BudgetStatus::Unbudgeted
        );

        assert_eq!(report.totals.total_budget_cents, 160_000);
        assert_eq!(report.totals.total_spent_cents, 105_000);
        assert_eq!(report.totals.total_remaining_cents, 55_000);
        assert_eq!(report.totals.percentage_used, 65.63);
    }

    #[test]
    fn test_budget_vs_actual_totals_exclude_unbudgeted_spending() {
        let budgets = vec![test_budget(100_000, Some(Category::Food), Month::February)];

        let expenses = vec![
            test_transaction(TransactionKind::Expense, 50_000, Category::Food, "2025-02-03"),
            test_transaction(TransactionKind::Expense, 30_000, Category::Other, "2025-02-10"),
        ];

        let report = budget_vs_actual(
            &budgets,
            &expenses,
            2025,
            Month::February,
            "2025-02-01".parse().unwrap(),
            "2025-02-28".parse().unwrap(),
        );

        assert_eq!(report.totals.total_spent_cents, 50_000);
        assert_eq!(report.totals.total_remaining_cents, 50_000);
        assert_eq!(report.totals.percentage_used, 50.0);

        assert_eq!(report.unbudgeted_categories.len(), 1);
        assert_eq!(report.unbudgeted_categories[0].actual_spent_cents, 30_000);
    }

    #[test]
    fn test_budget_vs_actual_zero_budget_reports_zero_percent() {
        let budgets = vec![test_budget(0, Some(Category::Food), Month::February)];
        let expenses = vec![test_transaction(
            TransactionKind::Expense,
            5_000,
            Category::Food,
            "2025-02-03",
        )];

        let report = budget_vs_actual(
            &budgets,
            &expenses,
            2025,
            Month::February,
            "2025-02-01".parse().unwrap(),
            "2025-02-28".parse().unwrap(),
        );

        assert_eq!(report.budgeted_categories[0].percentage_used, 0.0);
        assert_eq!(report.budgeted_categories[0].status, BudgetStatus::Good);
    }

    #[test]
    fn test_budget_vs_actual_overall_budget_measures_total_spending() {
        let budgets = vec![test_budget(100_000, None, Month::February)];
        let expenses = vec![
            test_transaction(TransactionKind::Expense, 60_000, Category::Food, "2025-02-03"),
            test_transaction(TransactionKind::Expense, 25_000, Category::Bills, "2025-02-10"),
        ];

        let report = budget_vs_actual(
            &budgets,
            &expenses,
            2025,
            Month::February,
            "2025-02-01".parse().unwrap(),
            "2025-02-28".parse().unwrap(),
        );

        assert_eq!(report.budgeted_categories[0].actual_spent_cents, 85_000);
        assert_eq!(report.budgeted_categories[0].percentage_used, 85.0);

        // An overall budget covers no category, so spending still shows up
        // in the unbudgeted list.
        assert_eq!(report.unbudgeted_categories.len(), 2);
    }

    #[test]
    fn test_financial_summary() {
        let transactions = vec![
            test_transaction(TransactionKind::Income, 150_000, Category::Salary, "2025-01-01"),
            test_transaction(TransactionKind::Income, 30_000, Category::Investments, "2025-01-15"),
            test_transaction(TransactionKind::Expense, 50_000, Category::Food, "2025-01-20"),
            test_transaction(TransactionKind::Expense, 22_000, Category::Bills, "2025-01-25"),
        ];

        let summary = financial_summary(&transactions);

        assert_eq!(summary.total_income_cents, 180_000);
        assert_eq!(summary.total_expense_cents, 72_000);
        assert_eq!(summary.net_savings_cents, 108_000);
        assert_eq!(summary.savings_rate, 60.0);
        assert_eq!(summary.transaction_count, 4);
        assert_eq!(
            summary.largest_income_category.unwrap().category,
            Category::Salary
        );
        assert_eq!(
            summary.largest_expense_category.unwrap().category,
            Category::Food
        );
    }

    #[test]
    fn test_financial_summary_with_no_income() {
        let transactions = vec![test_transaction(
            TransactionKind::Expense,
            5_000,
            Category::Food,
            "2025-01-20",
        )];

        let summary = financial_summary(&transactions);

        assert_eq!(summary.savings_rate, 0.0);
        assert!(summary.largest_income_category.is_none());
    }

    #[test]
    fn test_financial_summary_tie_keeps_first_seen_category() {
        let transactions = vec![
            test_transaction(TransactionKind::Expense, 10_000, Category::Food, "2025-01-05"),
            test_transaction(TransactionKind::Expense, 10_000, Category::Bills, "2025-01-10"),
        ];

        let summary = financial_summary(&transactions);

        assert_eq!(
            summary.largest_expense_category.unwrap().category,
            Category::Food
        );
    }

    #[test]
    fn test_unusual_spending_flags_only_outsized_expenses() {
        let transactions = vec![
            test_transaction(TransactionKind::Expense, 70_000, Category::Entertainment, "2025-01-05"),
            test_transaction(TransactionKind::Expense, 60_000, Category::Food, "2025-01-10"),
            test_transaction(TransactionKind::Income, 90_000, Category::Salary, "2025-01-12"),
            test_transaction(TransactionKind::Expense, 61_000, Category::Bills, "2025-01-15"),
        ];

        let alerts = unusual_spending(&transactions, 30_000);

        // Strictly greater than double the typical amount; income is ignored.
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].category, Category::Entertainment);
        assert_eq!(alerts[1].category, Category::Bills);
        assert_eq!(
            alerts[1].alert,
            "Unusual spending detected in Bills of amount 61000"
        );
    }

    #[test]
    fn test_empty_inputs_produce_empty_reports() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();

        let trends = spending_trends(&[], Frequency::Daily, start, end);
        assert!(trends.trends.is_empty());
        assert_eq!(trends.summary, ReportTotals::default());

        let summary = financial_summary(&[]);
        assert_eq!(summary.transaction_count, 0);
        assert_eq!(summary.savings_rate, 0.0);
    }
}
