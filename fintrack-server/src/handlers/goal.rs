use fintrack_common::currency::{convert_cents, RateError, RateLookup};
use fintrack_common::db::{self, DaoError, DbThreadPool};
use fintrack_common::reports::round2;
use fintrack_common::request_io::{
    InputEditGoal, InputGoal, OutputCreatedGoal, OutputGoalWithProgress,
};
use fintrack_common::validators::Validity;

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;

use crate::handlers::error::ServerError;
use crate::middleware::auth::{scope_for, AuthorizedUser};

pub async fn create(
    db_thread_pool: web::Data<DbThreadPool>,
    rate_lookup: web::Data<Arc<Box<dyn RateLookup>>>,
    auth: AuthorizedUser,
    goal_data: web::Json<InputGoal>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;

    if let Validity::Invalid(msg) = goal_data.validate() {
        return Err(ServerError::InputRejected(Some(msg)));
    }

    let mut goal_data = goal_data.into_inner();

    // Goals are stored in the user's preferred currency. A target given in
    // another currency is converted on the way in.
    if let Some(goal_currency) = &goal_data.currency {
        if *goal_currency != claims.cur {
            let rate = match rate_lookup.rate(goal_currency, &claims.cur).await {
                Ok(r) => r,
                Err(e) => match e {
                    RateError::InvalidCurrency(c) => {
                        return Err(ServerError::InvalidFormat(Some(format!(
                            "Unknown currency: {c}"
                        ))));
                    }
                    RateError::Unavailable(_) => {
                        log::error!("{e}");
                        return Err(ServerError::InternalError(Some(String::from(
                            "Exchange rate provider is unavailable",
                        ))));
                    }
                },
            };

            goal_data.target_amount_cents = convert_cents(goal_data.target_amount_cents, rate);
        }
    }

    goal_data.currency = Some(claims.cur.clone());

    let goal = match web::block(move || {
        let mut goal_dao = db::goal::Dao::new(&db_thread_pool);
        goal_dao.create_goal(&goal_data, &claims.eml)
    })
    .await?
    {
        Ok(g) => g,
        Err(e) => {
            log::error!("{e}");
            return Err(ServerError::DatabaseTransactionError(Some(String::from(
                "Failed to create goal",
            ))));
        }
    };

    Ok(HttpResponse::Created().json(OutputCreatedGoal {
        message: String::from("Goal created"),
        goal,
    }))
}

pub async fn get_all(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let scope = scope_for(&claims);

    let goals = web::block(move || {
        let mut goal_dao = db::goal::Dao::new(&db_thread_pool);
        goal_dao.get_goals(&scope)
    })
    .await??;

    let goals_with_progress = goals
        .into_iter()
        .map(|goal| {
            let progress_percentage = round2(goal.progress() * 100.0);

            OutputGoalWithProgress {
                goal,
                progress_percentage,
            }
        })
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(goals_with_progress))
}

pub async fn update(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    goal_id: web::Path<Uuid>,
    edit_data: web::Json<InputEditGoal>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let goal_id = goal_id.into_inner();

    if edit_data.saved_amount_cents < 0 {
        return Err(ServerError::InputRejected(Some(String::from(
            "Saved amount cannot be negative",
        ))));
    }

    let saved_amount_cents = edit_data.saved_amount_cents;

    let goal = match web::block(move || {
        let mut goal_dao = db::goal::Dao::new(&db_thread_pool);
        let existing = goal_dao.get_goal(goal_id, &claims.eml)?;

        if saved_amount_cents > existing.target_amount_cents {
            return Ok(None);
        }

        goal_dao
            .set_saved_amount(goal_id, &claims.eml, saved_amount_cents)
            .map(Some)
    })
    .await?
    {
        Ok(Some(g)) => g,
        Ok(None) => {
            return Err(ServerError::InputRejected(Some(String::from(
                "Saved amount cannot exceed the goal's target amount",
            ))));
        }
        Err(e) => match e {
            DaoError::QueryFailure(diesel::result::Error::NotFound) => {
                return Err(ServerError::NotFound(Some(String::from("Goal not found"))));
            }
            _ => {
                log::error!("{e}");
                return Err(ServerError::DatabaseTransactionError(Some(String::from(
                    "Failed to update goal",
                ))));
            }
        },
    };

    Ok(HttpResponse::Ok().json(goal))
}

pub async fn delete(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    goal_id: web::Path<Uuid>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let goal_id = goal_id.into_inner();

    let goal = match web::block(move || {
        let mut goal_dao = db::goal::Dao::new(&db_thread_pool);
        goal_dao.delete_goal(goal_id, &claims.eml)
    })
    .await?
    {
        Ok(g) => g,
        Err(e) => match e {
            DaoError::QueryFailure(diesel::result::Error::NotFound) => {
                return Err(ServerError::NotFound(Some(String::from("Goal not found"))));
            }
            _ => {
                log::error!("{e}");
                return Err(ServerError::DatabaseTransactionError(Some(String::from(
                    "Failed to delete goal",
                ))));
            }
        },
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Goal deleted",
        "goal": goal,
    })))
}
