use actix_web::web;

use crate::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Fixed paths are registered ahead of the `{transaction_id}` routes so
    // "/upcoming" is never treated as an id.
    cfg.service(
        web::scope("/transactions")
            .route("", web::post().to(handlers::transaction::create))
            .route("", web::get().to(handlers::transaction::get_all))
            .route(
                "/upcoming",
                web::get().to(handlers::transaction::get_upcoming),
            )
            .route(
                "/tag/{tag}",
                web::get().to(handlers::transaction::get_by_tag),
            )
            .route(
                "/{transaction_id}",
                web::get().to(handlers::transaction::get_by_id),
            )
            .route(
                "/{transaction_id}",
                web::patch().to(handlers::transaction::update),
            )
            .route(
                "/{transaction_id}",
                web::delete().to(handlers::transaction::delete),
            ),
    );
}
