use actix_web::web;

use crate::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/financialReport")
            .route(
                "/getSpendingTrends",
                web::get().to(handlers::report::spending_trends),
            )
            .route(
                "/getIncomeExpenseReport",
                web::get().to(handlers::report::income_expense_report),
            )
            .route(
                "/getCategoryBreakdownReport",
                web::get().to(handlers::report::category_breakdown),
            )
            .route(
                "/getTypeBreakdownReport",
                web::get().to(handlers::report::type_breakdown),
            )
            .route(
                "/getBudgetVsActual",
                web::get().to(handlers::report::budget_vs_actual),
            )
            .route(
                "/getFinancialSummary",
                web::get().to(handlers::report::financial_summary),
            ),
    );
}
