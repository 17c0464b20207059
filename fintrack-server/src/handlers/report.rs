use fintrack_common::db::{self, DbThreadPool};
use fintrack_common::reports;
use fintrack_common::request_io::{
    BudgetVsActualParams, CategoryBreakdownParams, DateRangeParams, TrendParams,
    TypeBreakdownParams,
};
use fintrack_common::types::{Frequency, Month, TransactionKind};

use actix_web::{web, HttpResponse};
use chrono::{Datelike, Days, NaiveDate, Utc};

use crate::handlers::error::ServerError;
use crate::middleware::auth::{scope_for, AuthorizedUser};

const SUMMARY_DEFAULT_RANGE_DAYS: u64 = 30;

fn parse_date(date: &str) -> Result<NaiveDate, ServerError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        ServerError::InvalidFormat(Some(format!("Invalid date: {date}. Expected YYYY-MM-DD")))
    })
}

fn checked_range(
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), ServerError> {
    if start_date > end_date {
        return Err(ServerError::InvalidFormat(Some(String::from(
            "start_date cannot be after end_date",
        ))));
    }

    Ok((start_date, end_date))
}

// The range reports refuse to guess a window.
fn require_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<(NaiveDate, NaiveDate), ServerError> {
    let (Some(start_date), Some(end_date)) = (start_date, end_date) else {
        return Err(ServerError::InvalidFormat(Some(String::from(
            "start_date and end_date query parameters are required",
        ))));
    };

    checked_range(parse_date(start_date)?, parse_date(end_date)?)
}

// The financial summary alone falls back to the trailing thirty days.
fn summary_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<(NaiveDate, NaiveDate), ServerError> {
    let today = Utc::now().date_naive();
    let default_start = today
        .checked_sub_days(Days::new(SUMMARY_DEFAULT_RANGE_DAYS))
        .unwrap_or(today);

    let start_date = match start_date {
        Some(d) => parse_date(d)?,
        None => default_start,
    };
    let end_date = match end_date {
        Some(d) => parse_date(d)?,
        None => today,
    };

    checked_range(start_date, end_date)
}

pub async fn spending_trends(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    params: web::Query<TrendParams>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let scope = scope_for(&claims);
    let params = params.into_inner();

    let (start_date, end_date) =
        require_range(params.start_date.as_deref(), params.end_date.as_deref())?;

    let frequency = params
        .frequency
        .as_deref()
        .ok_or_else(|| {
            ServerError::InvalidFormat(Some(String::from(
                "A frequency query parameter is required",
            )))
        })?
        .parse::<Frequency>()
        .map_err(|e| ServerError::InvalidFormat(Some(e.to_string())))?;

    let transactions = web::block(move || {
        let mut transaction_dao = db::transaction::Dao::new(&db_thread_pool);
        transaction_dao.get_transactions_in_range(&scope, start_date, end_date)
    })
    .await??;

    let report = reports::spending_trends(&transactions, frequency, start_date, end_date);

    Ok(HttpResponse::Ok().json(report))
}

pub async fn income_expense_report(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    params: web::Query<DateRangeParams>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let scope = scope_for(&claims);
    let params = params.into_inner();

    let (start_date, end_date) =
        require_range(params.start_date.as_deref(), params.end_date.as_deref())?;

    let transactions = web::block(move || {
        let mut transaction_dao = db::transaction::Dao::new(&db_thread_pool);
        transaction_dao.get_transactions_in_range(&scope, start_date, end_date)
    })
    .await??;

    let report = reports::income_expense_report(&transactions, start_date, end_date);

    Ok(HttpResponse::Ok().json(report))
}

pub async fn category_breakdown(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    params: web::Query<CategoryBreakdownParams>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let scope = scope_for(&claims);
    let params = params.into_inner();

    let category = params.category.ok_or_else(|| {
        ServerError::InvalidFormat(Some(String::from("A category query parameter is required")))
    })?;

    let (start_date, end_date) =
        require_range(params.start_date.as_deref(), params.end_date.as_deref())?;

    let transactions = web::block(move || {
        let mut transaction_dao = db::transaction::Dao::new(&db_thread_pool);
        transaction_dao.get_transactions_in_range(&scope, start_date, end_date)
    })
    .await??;

    let report = reports::category_breakdown(&transactions, category, start_date, end_date);

    if report.transactions.is_empty() {
        return Err(ServerError::NotFound(Some(format!(
            "No transactions found for category {category} in the selected period"
        ))));
    }

    Ok(HttpResponse::Ok().json(report))
}

pub async fn type_breakdown(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    params: web::Query<TypeBreakdownParams>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let scope = scope_for(&claims);
    let params = params.into_inner();

    let kind = match params.kind.as_deref() {
        Some(k) => k
            .parse::<TransactionKind>()
            .map_err(|e| ServerError::InvalidFormat(Some(e.to_string())))?,
        None => {
            return Err(ServerError::InvalidFormat(Some(String::from(
                "A type query parameter is required",
            ))));
        }
    };

    let (start_date, end_date) =
        require_range(params.start_date.as_deref(), params.end_date.as_deref())?;

    let transactions = web::block(move || {
        let mut transaction_dao = db::transaction::Dao::new(&db_thread_pool);
        transaction_dao.get_transactions_in_range(&scope, start_date, end_date)
    })
    .await??;

    let report = reports::type_breakdown(&transactions, kind, start_date, end_date);

    if report.transactions.is_empty() {
        return Err(ServerError::NotFound(Some(format!(
            "No {kind} transactions found in the selected period"
        ))));
    }

    Ok(HttpResponse::Ok().json(report))
}

pub async fn budget_vs_actual(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    params: web::Query<BudgetVsActualParams>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let params = params.into_inner();

    let today = Utc::now();
    let year = params.year.unwrap_or_else(|| today.year());
    let month_number = params.month.unwrap_or_else(|| today.month());

    let month = Month::from_number(month_number).ok_or_else(|| {
        ServerError::InvalidFormat(Some(String::from("Month must be between 1 and 12")))
    })?;

    let (start_date, end_date) = reports::month_bounds(year, month).ok_or_else(|| {
        ServerError::InvalidFormat(Some(String::from("Invalid year for report")))
    })?;

    let (budgets, expenses) = web::block(move || {
        let mut budget_dao = db::budget::Dao::new(&db_thread_pool);
        let budgets = budget_dao.get_budgets_for_month(&claims.eml, month)?;

        let mut transaction_dao = db::transaction::Dao::new(&db_thread_pool);
        let expenses = transaction_dao.get_expenses_in_range(&claims.eml, start_date, end_date)?;

        Ok::<_, fintrack_common::db::DaoError>((budgets, expenses))
    })
    .await??;

    let report = reports::budget_vs_actual(&budgets, &expenses, year, month, start_date, end_date);

    Ok(HttpResponse::Ok().json(report))
}

pub async fn financial_summary(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    params: web::Query<DateRangeParams>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let scope = scope_for(&claims);
    let params = params.into_inner();

    let (start_date, end_date) =
        summary_range(params.start_date.as_deref(), params.end_date.as_deref())?;

    let transactions = web::block(move || {
        let mut transaction_dao = db::transaction::Dao::new(&db_thread_pool);
        transaction_dao.get_transactions_in_range(&scope, start_date, end_date)
    })
    .await??;

    let report = reports::financial_summary(&transactions);

    Ok(HttpResponse::Ok().json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_range_rejects_missing_dates() {
        assert!(matches!(
            require_range(None, None),
            Err(ServerError::InvalidFormat(_))
        ));
        assert!(matches!(
            require_range(Some("2026-01-01"), None),
            Err(ServerError::InvalidFormat(_))
        ));
        assert!(matches!(
            require_range(None, Some("2026-01-31")),
            Err(ServerError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_require_range_parses_and_orders() {
        let (start_date, end_date) =
            require_range(Some("2026-01-01"), Some("2026-01-31")).unwrap();
        assert_eq!(start_date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(end_date, NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());

        assert!(matches!(
            require_range(Some("2026-02-01"), Some("2026-01-01")),
            Err(ServerError::InvalidFormat(_))
        ));
        assert!(matches!(
            require_range(Some("01/15/2026"), Some("2026-01-31")),
            Err(ServerError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_summary_range_defaults_missing_dates() {
        let (start_date, end_date) = summary_range(None, None).unwrap();
        assert!(start_date <= end_date);

        let (start_date, _) = summary_range(Some("2026-01-01"), None).unwrap();
        assert_eq!(start_date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());

        assert!(matches!(
            summary_range(Some("2026-02-01"), Some("2026-01-01")),
            Err(ServerError::InvalidFormat(_))
        ));
    }
}
