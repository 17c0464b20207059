use fintrack_common::currency::{ExchangeRateApi, MockRates, RateLookup};

use actix_web::web::Data;
use actix_web::{App, HttpServer};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use flexi_logger::{
    Age, Cleanup, Criterion, Duplicate, FileSpec, LogSpecification, Logger, Naming, WriteMode,
};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use crate::handlers::error::ServerError;

mod env;
mod handlers;
mod middleware;
mod services;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let mut ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
    let mut port = 9000u16;

    let mut args = std::env::args();

    // Eat the first argument, which is the relative path to the executable
    args.next();

    while let Some(arg) = args.next() {
        match arg.to_lowercase().as_str() {
            "--port" => {
                let port_str = {
                    let next_arg = args.next();

                    match next_arg {
                        Some(s) => s,
                        None => {
                            eprintln!("ERROR: --port option specified but no port was given");
                            std::process::exit(1);
                        }
                    }
                };

                port = {
                    let port_result = port_str.parse::<u16>();

                    match port_result {
                        Ok(p) => p,
                        Err(_) => {
                            eprintln!("ERROR: Incorrect format for port. Integer expected");
                            std::process::exit(1);
                        }
                    }
                };

                continue;
            }
            "--ip" => {
                ip = {
                    let next_arg = args.next();

                    match next_arg {
                        Some(s) => match s.parse::<IpAddr>() {
                            Ok(i) => i,
                            Err(_) => {
                                eprintln!("ERROR: Invalid IP address");
                                std::process::exit(1);
                            }
                        },
                        None => {
                            eprintln!("ERROR: --ip option specified but no IP was given");
                            std::process::exit(1);
                        }
                    }
                };

                continue;
            }
            a => {
                eprintln!("ERROR: Invalid argument: {}", &a);
                std::process::exit(1);
            }
        }
    }

    let base_addr = format!("{}:{}", &ip, &port);

    // Forego lazy initialization in order to validate the config
    once_cell::sync::Lazy::force(&env::CONF);

    let log_spec =
        LogSpecification::parse(&env::CONF.log_level).expect("Invalid log level in config");

    let _logger = Logger::with(log_spec)
        .log_to_file(FileSpec::default().directory("./logs"))
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogAndCompressedFiles(60, 365),
        )
        .cleanup_in_background_thread(true)
        .duplicate_to_stdout(Duplicate::All)
        .write_mode(WriteMode::Async)
        .format(|writer, now, record| {
            write!(
                writer,
                "{:5} | {} | {}:{} | {}",
                record.level(),
                now.format("%Y-%m-%dT%H:%M:%S%.6fZ"),
                record.module_path().unwrap_or("<unknown>"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .use_utc()
        .start()
        .expect("Failed to start logger");

    let actix_workers = env::CONF.actix_worker_count;

    // To prevent resource starvation, max connections must be at least as large as the number of
    // actix workers,
    let db_max_connections = if actix_workers > env::CONF.db_max_connections as usize {
        actix_workers as u32
    } else {
        env::CONF.db_max_connections
    };

    log::info!("Connecting to database...");

    let database_uri = format!(
        "postgres://{}:{}@{}:{}/{}",
        env::CONF.db_username,
        env::CONF.db_password,
        env::CONF.db_hostname,
        env::CONF.db_port,
        env::CONF.db_name,
    );

    let db_connection_manager = ConnectionManager::<PgConnection>::new(database_uri);
    let db_thread_pool = match r2d2::Pool::builder()
        .max_size(db_max_connections)
        .idle_timeout(Some(env::CONF.db_idle_timeout))
        .build(db_connection_manager)
    {
        Ok(c) => c,
        Err(_) => {
            eprintln!("ERROR: Failed to connect to database");
            std::process::exit(1);
        }
    };

    log::info!("Successfully connected to database");

    let rate_lookup: Box<dyn RateLookup> = if env::CONF.currency_api_enabled {
        log::info!("Using live exchange rate provider");

        Box::new(
            ExchangeRateApi::new(
                env::CONF.currency_api_base_url.clone(),
                env::CONF.currency_api_key.clone(),
                env::CONF.currency_api_timeout,
            )
            .expect("Failed to build exchange rate client"),
        )
    } else {
        log::info!("Exchange rate provider is disabled. Using mock rates.");
        Box::new(MockRates::new())
    };

    let rate_lookup = Arc::new(rate_lookup);

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(db_thread_pool.clone()))
            .app_data(Data::new(rate_lookup.clone()))
            .app_data(actix_web::web::JsonConfig::default().error_handler(|err, _req| {
                ServerError::InvalidFormat(Some(err.to_string())).into()
            }))
            .app_data(actix_web::web::QueryConfig::default().error_handler(|err, _req| {
                ServerError::InvalidFormat(Some(err.to_string())).into()
            }))
            .app_data(actix_web::web::PathConfig::default().error_handler(|err, _req| {
                ServerError::InvalidFormat(Some(err.to_string())).into()
            }))
            .configure(services::api::configure)
            .wrap(actix_web::middleware::Logger::default())
    })
    .workers(actix_workers)
    .bind(base_addr)?
    .run()
    .await?;

    Ok(())
}
