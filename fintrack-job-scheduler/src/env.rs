use lettre::message::Mailbox;
use once_cell::sync::Lazy;
use std::cell::UnsafeCell;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::time::Duration;
use zeroize::Zeroize;

pub static CONF: Lazy<Config> = Lazy::new(|| Config::from_env().expect("Failed to load config"));

const DB_USERNAME_VAR: &str = "FINTRACK_DB_USERNAME";
const DB_PASSWORD_VAR: &str = "FINTRACK_DB_PASSWORD";
const DB_HOSTNAME_VAR: &str = "FINTRACK_DB_HOSTNAME";
const DB_PORT_VAR: &str = "FINTRACK_DB_PORT";
const DB_NAME_VAR: &str = "FINTRACK_DB_NAME";
const DB_MAX_CONNECTIONS_VAR: &str = "FINTRACK_DB_MAX_CONNECTIONS";
const DB_IDLE_TIMEOUT_SECS_VAR: &str = "FINTRACK_DB_IDLE_TIMEOUT_SECS";

const EMAIL_ENABLED_VAR: &str = "FINTRACK_EMAIL_ENABLED";
const EMAIL_FROM_VAR: &str = "FINTRACK_EMAIL_FROM";
const EMAIL_REPLY_TO_VAR: &str = "FINTRACK_EMAIL_REPLY_TO";
const SMTP_ADDRESS_VAR: &str = "FINTRACK_SMTP_ADDRESS";
const SMTP_USERNAME_VAR: &str = "FINTRACK_SMTP_USERNAME";
const SMTP_PASSWORD_VAR: &str = "FINTRACK_SMTP_PASSWORD";

const GOAL_REMINDER_WINDOW_DAYS_VAR: &str = "FINTRACK_GOAL_REMINDER_WINDOW_DAYS";
const GOAL_REMINDER_JOB_FREQUENCY_SECS_VAR: &str = "FINTRACK_GOAL_REMINDER_JOB_FREQUENCY_SECS";

const RUNNER_UPDATE_FREQUENCY_SECS_VAR: &str = "FINTRACK_RUNNER_UPDATE_FREQUENCY_SECS";
const WORKER_THREADS_VAR: &str = "FINTRACK_WORKER_THREADS";
const MAX_BLOCKING_THREADS_VAR: &str = "FINTRACK_MAX_BLOCKING_THREADS";

const LOG_LEVEL_VAR: &str = "FINTRACK_LOG_LEVEL";

#[derive(Zeroize)]
pub struct ConfigInner {
    pub db_username: String,
    pub db_password: String,
    pub db_hostname: String,
    pub db_port: u16,
    pub db_name: String,
    #[zeroize(skip)]
    pub db_max_connections: u32,
    #[zeroize(skip)]
    pub db_idle_timeout: Duration,

    #[zeroize(skip)]
    pub email_enabled: bool,
    #[zeroize(skip)]
    pub email_from: Mailbox,
    #[zeroize(skip)]
    pub email_reply_to: Mailbox,
    #[zeroize(skip)]
    pub smtp_address: String,
    pub smtp_username: String,
    pub smtp_password: String,

    #[zeroize(skip)]
    pub goal_reminder_window_days: u64,
    #[zeroize(skip)]
    pub goal_reminder_job_frequency: Duration,

    #[zeroize(skip)]
    pub runner_update_frequency: Duration,
    #[zeroize(skip)]
    pub worker_threads: Option<usize>,
    #[zeroize(skip)]
    pub max_blocking_threads: Option<usize>,

    #[zeroize(skip)]
    pub log_level: String,
}

pub struct Config {
    inner: UnsafeCell<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        // Safe as long as `unsafe Config::zeroize()` hasn't been called
        unsafe { &*self.inner.get() }
    }
}

// Safe to be shared across threads as long as `unsafe Config::zeroize()` hasn't been called
unsafe impl Sync for Config {}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        let email_enabled: bool = env_var_or(EMAIL_ENABLED_VAR, false);

        let email_from = env_var_or(EMAIL_FROM_VAR, String::from("FinTrack <no-reply@localhost>"));
        let email_from = Mailbox::from_str(&email_from)
            .map_err(|_| ConfigError::InvalidVar(EMAIL_FROM_VAR))?;

        let email_reply_to = env_var_or(
            EMAIL_REPLY_TO_VAR,
            String::from("FinTrack <no-reply@localhost>"),
        );
        let email_reply_to = Mailbox::from_str(&email_reply_to)
            .map_err(|_| ConfigError::InvalidVar(EMAIL_REPLY_TO_VAR))?;

        let inner = ConfigInner {
            db_username: env_var(DB_USERNAME_VAR)?,
            db_password: env_var(DB_PASSWORD_VAR)?,
            db_hostname: env_var(DB_HOSTNAME_VAR)?,
            db_port: env_var(DB_PORT_VAR)?,
            db_name: env_var(DB_NAME_VAR)?,
            db_max_connections: env_var_or(DB_MAX_CONNECTIONS_VAR, 12),
            db_idle_timeout: Duration::from_secs(env_var_or(DB_IDLE_TIMEOUT_SECS_VAR, 30)),

            email_enabled,
            email_from,
            email_reply_to,
            smtp_address: if email_enabled {
                env_var(SMTP_ADDRESS_VAR)?
            } else {
                String::new()
            },
            smtp_username: if email_enabled {
                env_var(SMTP_USERNAME_VAR)?
            } else {
                String::new()
            },
            smtp_password: if email_enabled {
                env_var(SMTP_PASSWORD_VAR)?
            } else {
                String::new()
            },

            goal_reminder_window_days: env_var_or(GOAL_REMINDER_WINDOW_DAYS_VAR, 7),
            goal_reminder_job_frequency: Duration::from_secs(env_var_or(
                GOAL_REMINDER_JOB_FREQUENCY_SECS_VAR,
                3600,
            )),

            runner_update_frequency: Duration::from_secs(env_var_or(
                RUNNER_UPDATE_FREQUENCY_SECS_VAR,
                30,
            )),
            worker_threads: env_var_opt(WORKER_THREADS_VAR),
            max_blocking_threads: env_var_opt(MAX_BLOCKING_THREADS_VAR),

            log_level: env_var_or(LOG_LEVEL_VAR, String::from("info")),
        };

        Ok(Config {
            inner: UnsafeCell::new(inner),
        })
    }

    /// # Safety
    ///
    /// Safe only if the Config isn't being used by other threads or across an async
    /// boundary. Generally, this should only be used at the end of the main function once
    /// all threads have been joined.
    pub unsafe fn zeroize(&self) {
        unsafe {
            (*self.inner.get()).zeroize();
        }
    }
}

fn env_var<T: FromStr>(key: &'static str) -> Result<T, ConfigError> {
    let var = std::env::var(key).map_err(|_| ConfigError::MissingVar(key))?;
    let var: T = var.parse().map_err(|_| ConfigError::InvalidVar(key))?;
    Ok(var)
}

fn env_var_or<T: FromStr>(key: &'static str, default: T) -> T {
    let Ok(var) = std::env::var(key) else {
        return default;
    };

    var.parse().unwrap_or(default)
}

fn env_var_opt<T: FromStr>(key: &'static str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[derive(Clone, Copy, Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidVar(&'static str),
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVar(key) => write!(f, "Missing environment variable '{}'", key),
            Self::InvalidVar(key) => write!(f, "Environment variable '{}' is invalid", key),
        }
    }
}
