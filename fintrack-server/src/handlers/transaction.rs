use fintrack_common::allocation;
use fintrack_common::db::{self, DaoError, DbThreadPool};
use fintrack_common::models::transaction::TransactionChanges;
use fintrack_common::request_io::{
    InputTransaction, OutputAllocatedGoal, OutputCreatedTransaction, OutputDeletedTransaction,
    OutputUpcomingTransaction,
};
use fintrack_common::db::UserScope;
use fintrack_common::types::{TransactionKind, UserRole};
use fintrack_common::validators::Validity;

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::handlers::error::ServerError;
use crate::middleware::auth::{scope_for, AuthorizedUser};

pub async fn create(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    transaction_data: web::Json<InputTransaction>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;

    if let Validity::Invalid(msg) = transaction_data.validate() {
        return Err(ServerError::InputRejected(Some(msg)));
    }

    let transaction_data = transaction_data.into_inner();
    let should_allocate =
        transaction_data.kind == TransactionKind::Income && transaction_data.auto_save;

    let user_email = claims.eml.clone();
    let user_currency = claims.cur.clone();
    let pool = db_thread_pool.clone();

    let transaction = match web::block(move || {
        let mut transaction_dao = db::transaction::Dao::new(&pool);
        transaction_dao.create_transaction(&transaction_data, &user_email, &user_currency)
    })
    .await?
    {
        Ok(t) => t,
        Err(e) => {
            log::error!("{e}");
            return Err(ServerError::DatabaseTransactionError(Some(String::from(
                "Failed to create transaction",
            ))));
        }
    };

    let mut auto_saved_goal = None;

    if should_allocate {
        let user_email = claims.eml.clone();
        let income = transaction.clone();
        let pool = db_thread_pool.clone();

        let allocation_result = match web::block(move || {
            let mut goal_dao = db::goal::Dao::new(&pool);
            let goals = goal_dao.get_goals_for_allocation(&user_email)?;

            let Some(plan) = allocation::plan_allocation(income.amount_cents, &goals) else {
                return Ok(None);
            };

            let mut transaction_dao = db::transaction::Dao::new(&pool);
            let (_, updated_goal) = transaction_dao.apply_allocation(&plan, &income)?;

            Ok::<_, DaoError>(Some(updated_goal))
        })
        .await?
        {
            Ok(g) => g,
            Err(e) => {
                log::error!("{e}");
                return Err(ServerError::DatabaseTransactionError(Some(String::from(
                    "Transaction was created but auto-save allocation failed",
                ))));
            }
        };

        auto_saved_goal = allocation_result.map(|goal| OutputAllocatedGoal {
            goal_id: goal.id,
            title: goal.title,
            saved_amount_cents: goal.saved_amount_cents,
        });
    }

    Ok(HttpResponse::Created().json(OutputCreatedTransaction {
        message: String::from("Transaction created"),
        transaction,
        auto_saved_goal,
    }))
}

pub async fn get_all(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let scope = scope_for(&claims);

    let transactions = web::block(move || {
        let mut transaction_dao = db::transaction::Dao::new(&db_thread_pool);
        transaction_dao.get_transactions(&scope)
    })
    .await??;

    Ok(HttpResponse::Ok().json(transactions))
}

pub async fn get_by_tag(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    tag: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let scope = scope_for(&claims);

    // Tags are stored without the leading '#'
    let tag = tag.into_inner().trim_start_matches('#').to_owned();

    let transactions = web::block(move || {
        let mut transaction_dao = db::transaction::Dao::new(&db_thread_pool);
        transaction_dao.get_transactions_by_tag(&scope, &tag)
    })
    .await??;

    if transactions.is_empty() {
        return Err(ServerError::NotFound(Some(String::from(
            "No transactions found with this tag",
        ))));
    }

    Ok(HttpResponse::Ok().json(transactions))
}

pub async fn get_upcoming(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let scope = scope_for(&claims);

    let recurring = web::block(move || {
        let mut transaction_dao = db::transaction::Dao::new(&db_thread_pool);
        transaction_dao.get_recurring_transactions(&scope)
    })
    .await??;

    let upcoming = recurring
        .into_iter()
        .map(|t| OutputUpcomingTransaction {
            category: t.category,
            amount_cents: t.amount_cents,
            next_transaction_date: t
                .recurring_frequency
                .and_then(|f| f.advance(t.transaction_date)),
        })
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(upcoming))
}

pub async fn get_by_id(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    transaction_id: web::Path<Uuid>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let transaction_id = transaction_id.into_inner();

    let transaction = match web::block(move || {
        let mut transaction_dao = db::transaction::Dao::new(&db_thread_pool);
        transaction_dao.get_transaction_by_id(transaction_id, &UserScope::All)
    })
    .await?
    {
        Ok(t) => t,
        Err(e) => match e {
            DaoError::QueryFailure(diesel::result::Error::NotFound) => {
                return Err(ServerError::NotFound(Some(String::from(
                    "Transaction not found",
                ))));
            }
            _ => {
                log::error!("{e}");
                return Err(ServerError::DatabaseTransactionError(Some(String::from(
                    "Failed to get transaction",
                ))));
            }
        },
    };

    if claims.rol != UserRole::Admin && transaction.user_email != claims.eml {
        return Err(ServerError::AccessForbidden(Some(String::from(
            "You do not have access to this transaction",
        ))));
    }

    Ok(HttpResponse::Ok().json(transaction))
}

pub async fn update(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    transaction_id: web::Path<Uuid>,
    changes: web::Json<TransactionChanges>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let transaction_id = transaction_id.into_inner();
    let changes = changes.into_inner();

    if let Some(amount_cents) = changes.amount_cents {
        if amount_cents < 0 {
            return Err(ServerError::InputRejected(Some(String::from(
                "Transaction amount cannot be negative",
            ))));
        }
    }

    // Mutations are owner-only, so a transaction belonging to someone else is
    // reported as forbidden rather than missing.
    let transaction = match web::block(move || {
        let mut transaction_dao = db::transaction::Dao::new(&db_thread_pool);
        let existing = transaction_dao.get_transaction_by_id(transaction_id, &UserScope::All)?;

        if existing.user_email != claims.eml {
            return Ok(None);
        }

        transaction_dao
            .update_transaction(transaction_id, &claims.eml, &changes)
            .map(Some)
    })
    .await?
    {
        Ok(Some(t)) => t,
        Ok(None) => {
            return Err(ServerError::AccessForbidden(Some(String::from(
                "You do not have access to this transaction",
            ))));
        }
        Err(e) => match e {
            DaoError::QueryFailure(diesel::result::Error::NotFound) => {
                return Err(ServerError::NotFound(Some(String::from(
                    "Transaction not found",
                ))));
            }
            _ => {
                log::error!("{e}");
                return Err(ServerError::DatabaseTransactionError(Some(String::from(
                    "Failed to update transaction",
                ))));
            }
        },
    };

    Ok(HttpResponse::Ok().json(transaction))
}

pub async fn delete(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
    transaction_id: web::Path<Uuid>,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let transaction_id = transaction_id.into_inner();

    let transaction = match web::block(move || {
        let mut transaction_dao = db::transaction::Dao::new(&db_thread_pool);
        let existing = transaction_dao.get_transaction_by_id(transaction_id, &UserScope::All)?;

        if existing.user_email != claims.eml {
            return Ok(None);
        }

        transaction_dao
            .delete_transaction(transaction_id, &claims.eml)
            .map(Some)
    })
    .await?
    {
        Ok(Some(t)) => t,
        Ok(None) => {
            return Err(ServerError::AccessForbidden(Some(String::from(
                "You do not have access to this transaction",
            ))));
        }
        Err(e) => match e {
            DaoError::QueryFailure(diesel::result::Error::NotFound) => {
                return Err(ServerError::NotFound(Some(String::from(
                    "Transaction not found",
                ))));
            }
            _ => {
                log::error!("{e}");
                return Err(ServerError::DatabaseTransactionError(Some(String::from(
                    "Failed to delete transaction",
                ))));
            }
        },
    };

    Ok(HttpResponse::Ok().json(OutputDeletedTransaction {
        message: String::from("Transaction deleted"),
        transaction,
    }))
}
