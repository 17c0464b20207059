use fintrack_common::db::{self, DaoError, DbThreadPool};
use fintrack_common::recommendation;
use fintrack_common::reports;
use fintrack_common::request_io::{
    BudgetStatusParams, InputBudget, OutputBudgetStatus, OutputCreatedBudget, OutputRecommendation,
    RecommendationParams,
};
use fintrack_common::types::Month;

use actix_web::{web, HttpResponse};
use chrono::{Datelike, Utc};

use crate::handlers::error::ServerError;
use crate::middleware::auth::{scope_for, AuthorizedUser};

fn parse_month(month: Option<&str>) -> Result<Month, ServerError> {
    match month {
        Some(m) => m
            .parse::<Month>()
            .map_err(|e| ServerError::InvalidFormat(Some(e.to_string()))),
        None => Month::from_number(Utc::now().month()).ok_or_else(|| {
            ServerError::InternalError(Some(String::from("Failed to resolve current month")))
        }),
    }
}

pub async fn create(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    budget_data: web::Json<InputBudget>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let budget_data = budget_data.into_inner();

    if budget_data.amount_cents < 0 {
        return Err(ServerError::InputRejected(Some(String::from(
            "Budget amount cannot be negative",
        ))));
    }

    let month = parse_month(Some(budget_data.month.as_str()))?;

    let budget = match web::block(move || {
        let mut budget_dao = db::budget::Dao::new(&db_thread_pool);
        budget_dao.create_budget(
            &claims.eml,
            budget_data.amount_cents,
            budget_data.category,
            month,
            budget_data.currency.as_deref().unwrap_or(&claims.cur),
        )
    })
    .await?
    {
        Ok(b) => b,
        Err(e) => match e {
            DaoError::AlreadyExists(_) => return Err(e.into()),
            _ => {
                log::error!("{e}");
                return Err(ServerError::DatabaseTransactionError(Some(String::from(
                    "Failed to create budget",
                ))));
            }
        },
    };

    Ok(HttpResponse::Created().json(OutputCreatedBudget {
        message: String::from("Budget created"),
        budget,
    }))
}

pub async fn status(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    params: web::Query<BudgetStatusParams>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let params = params.into_inner();

    let month = parse_month(params.month.as_deref())?;

    let budget = match web::block(move || {
        let mut budget_dao = db::budget::Dao::new(&db_thread_pool);
        budget_dao.get_budget(&claims.eml, params.category, month)
    })
    .await?
    {
        Ok(b) => b,
        Err(e) => match e {
            DaoError::QueryFailure(diesel::result::Error::NotFound) => {
                return Err(ServerError::NotFound(Some(String::from(
                    "No budget found for the selected category and month",
                ))));
            }
            _ => {
                log::error!("{e}");
                return Err(ServerError::DatabaseTransactionError(Some(String::from(
                    "Failed to get budget",
                ))));
            }
        },
    };

    Ok(HttpResponse::Ok().json(OutputBudgetStatus { budget }))
}

pub async fn get_all(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let scope = scope_for(&claims);

    let budgets = web::block(move || {
        let mut budget_dao = db::budget::Dao::new(&db_thread_pool);
        budget_dao.get_budgets(&scope)
    })
    .await??;

    Ok(HttpResponse::Ok().json(budgets))
}

pub async fn recommendation(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    params: web::Query<RecommendationParams>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let params = params.into_inner();

    let month = parse_month(params.month.as_deref())?;
    let year = Utc::now().year();

    let budget = {
        let email = claims.eml.clone();
        let category = params.category;
        let pool = db_thread_pool.clone();

        match web::block(move || {
            let mut budget_dao = db::budget::Dao::new(&pool);
            budget_dao.get_budget(&email, category, month)
        })
        .await?
        {
            Ok(b) => b,
            Err(e) => match e {
                DaoError::QueryFailure(diesel::result::Error::NotFound) => {
                    return Err(ServerError::NotFound(Some(String::from(
                        "No budget found for the selected category and month",
                    ))));
                }
                _ => {
                    log::error!("{e}");
                    return Err(ServerError::DatabaseTransactionError(Some(String::from(
                        "Failed to get budget",
                    ))));
                }
            },
        }
    };

    let spent_amount_cents = match params.spent_amount_cents {
        Some(spent) => spent,
        None => {
            let (start_date, end_date) = reports::month_bounds(year, month).ok_or_else(|| {
                ServerError::InternalError(Some(String::from("Failed to resolve month bounds")))
            })?;

            let email = claims.eml.clone();
            let expenses = web::block(move || {
                let mut transaction_dao = db::transaction::Dao::new(&db_thread_pool);
                transaction_dao.get_expenses_in_range(&email, start_date, end_date)
            })
            .await??;

            expenses
                .iter()
                .filter(|t| match params.category {
                    Some(c) => t.category == c,
                    None => true,
                })
                .map(|t| t.amount_cents)
                .sum()
        }
    };

    let recommendation = recommendation::recommend(budget.amount_cents, spent_amount_cents);

    Ok(HttpResponse::Ok().json(OutputRecommendation {
        category: params.category,
        budget_amount_cents: budget.amount_cents,
        spent_amount_cents,
        recommendation: recommendation.message(params.category),
    }))
}
