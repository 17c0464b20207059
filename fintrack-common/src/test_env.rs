//! Shared database pool for DB-backed tests. These tests are `#[ignore]`d
//! and require a running Postgres instance reachable through
//! `FINTRACK_TEST_DB_URI`.

use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use once_cell::sync::Lazy;

use crate::db::DbThreadPool;

const TEST_DB_URI_VAR: &str = "FINTRACK_TEST_DB_URI";

pub static DB_THREAD_POOL: Lazy<DbThreadPool> = Lazy::new(|| {
    let database_uri = std::env::var(TEST_DB_URI_VAR)
        .unwrap_or_else(|_| panic!("{TEST_DB_URI_VAR} must be set to run database tests"));

    diesel::r2d2::Pool::builder()
        .build(ConnectionManager::<PgConnection>::new(database_uri))
        .expect("Failed to connect to test database")
});
