use actix_web::web;

use crate::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/convert").route(
        "/{from}/{to}/{amount_cents}",
        web::get().to(handlers::currency::convert),
    ));
}
