use actix_web::web;

use crate::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/notifications").route(
        "/detectUnusualSpending",
        web::get().to(handlers::notification::detect_unusual_spending),
    ));
}
