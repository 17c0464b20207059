use actix_web::web;

mod budget;
mod currency;
mod goal;
mod notification;
mod report;
mod transaction;
mod user;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(budget::configure)
            .configure(currency::configure)
            .configure(goal::configure)
            .configure(notification::configure)
            .configure(report::configure)
            .configure(transaction::configure)
            .configure(user::configure),
    );
}
