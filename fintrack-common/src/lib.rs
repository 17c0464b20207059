pub mod allocation;
pub mod currency;
pub mod db;
pub mod email;
pub mod models;
pub mod recommendation;
pub mod reports;
pub mod request_io;
pub mod schema;
#[cfg(test)]
mod test_env;
pub mod token;
pub mod types;
pub mod validators;
