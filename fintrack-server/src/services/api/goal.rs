use actix_web::web;

use crate::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/goals")
            .route("", web::post().to(handlers::goal::create))
            .route("", web::get().to(handlers::goal::get_all))
            .route("/{goal_id}", web::patch().to(handlers::goal::update))
            .route("/{goal_id}", web::delete().to(handlers::goal::delete)),
    );
}
