use actix_web::web;

use crate::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/budget")
            .route("", web::post().to(handlers::budget::create))
            .route("", web::get().to(handlers::budget::get_all))
            .route("/status", web::get().to(handlers::budget::status))
            .route(
                "/recommendations",
                web::get().to(handlers::budget::recommendation),
            ),
    );
}
