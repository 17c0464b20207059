use fintrack_common::currency::{convert_cents, RateError, RateLookup};
use fintrack_common::request_io::OutputConversion;

use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::handlers::error::ServerError;
use crate::middleware::auth::AuthorizedUser;

pub async fn convert(
    rate_lookup: web::Data<Arc<Box<dyn RateLookup>>>,
    auth: AuthorizedUser,
    path: web::Path<(String, String, i64)>,
) -> Result<HttpResponse, ServerError> {
    auth.claims()?;

    let (from, to, amount_cents) = path.into_inner();

    if amount_cents < 0 {
        return Err(ServerError::InputRejected(Some(String::from(
            "Amount cannot be negative",
        ))));
    }

    let from = from.to_uppercase();
    let to = to.to_uppercase();

    let rate = match rate_lookup.rate(&from, &to).await {
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

    Ok(HttpResponse::Ok().json(OutputConversion {
        from,
        to,
        amount_cents,
        converted_amount_cents: convert_cents(amount_cents, rate),
    }))
}
