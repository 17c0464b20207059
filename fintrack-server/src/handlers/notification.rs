use fintrack_common::db::{self, DbThreadPool, UserScope};
use fintrack_common::reports;
use fintrack_common::request_io::OutputUnusualSpending;

use actix_web::{web, HttpResponse};

use crate::env;
use crate::handlers::error::ServerError;
use crate::middleware::auth::AuthorizedUser;

pub async fn detect_unusual_spending(
    db_thread_pool: web::Data<DbThreadPool>,
    auth: AuthorizedUser,
) -> Result<HttpResponse, ServerError> {
    let claims = auth.claims()?;
    let scope = UserScope::Owner(claims.eml);

    let transactions = web::block(move || {
        let mut transaction_dao = db::transaction::Dao::new(&db_thread_pool);
        transaction_dao.get_transactions(&scope)
    })
    .await??;

    if transactions.is_empty() {
        return Ok(HttpResponse::Ok().json(OutputUnusualSpending {
            message: String::from("No transactions found for this user."),
            notifications: Vec::new(),
        }));
    }

    let notifications = reports::unusual_spending(
        &transactions,
        env::CONF.unusual_spending_typical_cents,
    );

    Ok(HttpResponse::Ok().json(OutputUnusualSpending {
        message: String::from("Unusual Spending Detection"),
        notifications,
    }))
}
