pub mod budget;
pub mod goal;
pub mod transaction;
pub mod user;
