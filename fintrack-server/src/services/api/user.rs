use actix_web::web;

use crate::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/signup", web::post().to(handlers::user::signup))
            .route("/login", web::post().to(handlers::user::login)),
    );
}
