use fintrack_common::email::senders::{MockSender, SmtpRelay};
use fintrack_common::email::EmailSender;

use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use flexi_logger::{
    Age, Cleanup, Criterion, Duplicate, FileSpec, LogSpecification, Logger, Naming, WriteMode,
};
use std::sync::Arc;

mod env;
mod jobs;
mod runner;

use jobs::GoalDeadlineRemindersJob;
use runner::JobRunner;

fn main() {
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
        .write_mode(WriteMode::BufferAndFlush)
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
        .max_size(env::CONF.db_max_connections)
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

    let email_sender: EmailSender = if env::CONF.email_enabled {
        match SmtpRelay::new(
            &env::CONF.smtp_address,
            env::CONF.smtp_username.clone(),
            env::CONF.smtp_password.clone(),
        ) {
            Ok(relay) => Box::new(relay),
            Err(e) => {
                eprintln!("ERROR: Failed to connect to SMTP relay: {e}");
                std::process::exit(1);
            }
        }
    } else {
        log::info!("Email is disabled. Reminders will be printed to stdout.");
        Box::new(MockSender::new())
    };

    let email_sender = Arc::new(email_sender);

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(env::CONF.worker_threads.unwrap_or(num_cpus::get() + 1))
        .max_blocking_threads(env::CONF.max_blocking_threads.unwrap_or(512))
        .enable_all()
        .build()
        .expect("Failed to launch asynchronous runtime")
        .block_on(async move {
            let mut job_runner = JobRunner::new(env::CONF.runner_update_frequency);

            job_runner.register(
                Box::new(GoalDeadlineRemindersJob::new(
                    env::CONF.goal_reminder_window_days,
                    env::CONF.email_from.clone(),
                    env::CONF.email_reply_to.clone(),
                    db_thread_pool.clone(),
                    Arc::clone(&email_sender),
                )),
                env::CONF.goal_reminder_job_frequency,
            );

            job_runner.start().await
        });
}
