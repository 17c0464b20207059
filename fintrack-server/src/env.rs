use base64::engine::general_purpose::STANDARD as b64;
use base64::Engine;
use once_cell::sync::Lazy;
use std::cell::UnsafeCell;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::time::Duration;
use zeroize::{Zeroize, Zeroizing};

pub static CONF: Lazy<Config> = Lazy::new(|| Config::from_env().expect("Failed to load config"));

const DB_USERNAME_VAR: &str = "FINTRACK_DB_USERNAME";
const DB_PASSWORD_VAR: &str = "FINTRACK_DB_PASSWORD";
const DB_HOSTNAME_VAR: &str = "FINTRACK_DB_HOSTNAME";
const DB_PORT_VAR: &str = "FINTRACK_DB_PORT";
const DB_NAME_VAR: &str = "FINTRACK_DB_NAME";
const DB_MAX_CONNECTIONS_VAR: &str = "FINTRACK_DB_MAX_CONNECTIONS";
const DB_IDLE_TIMEOUT_SECS_VAR: &str = "FINTRACK_DB_IDLE_TIMEOUT_SECS";

const HASHING_KEY_VAR: &str = "FINTRACK_HASHING_KEY_B64";
const TOKEN_SIGNING_KEY_VAR: &str = "FINTRACK_TOKEN_SIGNING_KEY_B64";

const HASH_LENGTH_VAR: &str = "FINTRACK_HASH_LENGTH";
const HASH_ITERATIONS_VAR: &str = "FINTRACK_HASH_ITERATIONS";
const HASH_MEM_COST_KIB_VAR: &str = "FINTRACK_HASH_MEM_COST_KIB";
const HASH_THREADS_VAR: &str = "FINTRACK_HASH_THREADS";
const HASH_SALT_LENGTH_VAR: &str = "FINTRACK_HASH_SALT_LENGTH";

const ACCESS_TOKEN_LIFETIME_MINS_VAR: &str = "FINTRACK_ACCESS_TOKEN_LIFETIME_MINS";

const CURRENCY_API_ENABLED_VAR: &str = "FINTRACK_CURRENCY_API_ENABLED";
const CURRENCY_API_BASE_URL_VAR: &str = "FINTRACK_CURRENCY_API_BASE_URL";
const CURRENCY_API_KEY_VAR: &str = "FINTRACK_CURRENCY_API_KEY";
const CURRENCY_API_TIMEOUT_SECS_VAR: &str = "FINTRACK_CURRENCY_API_TIMEOUT_SECS";

const UNUSUAL_SPENDING_TYPICAL_CENTS_VAR: &str = "FINTRACK_UNUSUAL_SPENDING_TYPICAL_CENTS";

const ACTIX_WORKER_COUNT_VAR: &str = "FINTRACK_ACTIX_WORKER_COUNT";

const LOG_LEVEL_VAR: &str = "FINTRACK_LOG_LEVEL";

const HASHING_KEY_SIZE: usize = 32;
const TOKEN_SIGNING_KEY_SIZE: usize = 64;

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

    pub hashing_key: [u8; HASHING_KEY_SIZE],
    pub token_signing_key: [u8; TOKEN_SIGNING_KEY_SIZE],

    pub hash_length: u32,
    pub hash_iterations: u32,
    pub hash_mem_cost_kib: u32,
    pub hash_threads: u32,
    pub hash_salt_length: u32,

    #[zeroize(skip)]
    pub access_token_lifetime: Duration,

    #[zeroize(skip)]
    pub currency_api_enabled: bool,
    #[zeroize(skip)]
    pub currency_api_base_url: String,
    pub currency_api_key: String,
    #[zeroize(skip)]
    pub currency_api_timeout: Duration,

    #[zeroize(skip)]
    pub unusual_spending_typical_cents: i64,

    #[zeroize(skip)]
    pub actix_worker_count: usize,

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
        let hashing_key = Zeroizing::new(
            b64.decode(env_var::<String>(HASHING_KEY_VAR)?.as_bytes())
                .map_err(|_| ConfigError::InvalidVar(HASHING_KEY_VAR))?,
        );
        let hashing_key = hashing_key[..HASHING_KEY_SIZE]
            .try_into()
            .map_err(|_| ConfigError::InvalidVar(HASHING_KEY_VAR))?;

        let token_signing_key = Zeroizing::new(
            b64.decode(env_var::<String>(TOKEN_SIGNING_KEY_VAR)?.as_bytes())
                .map_err(|_| ConfigError::InvalidVar(TOKEN_SIGNING_KEY_VAR))?,
        );
        let token_signing_key = token_signing_key[..TOKEN_SIGNING_KEY_SIZE]
            .try_into()
            .map_err(|_| ConfigError::InvalidVar(TOKEN_SIGNING_KEY_VAR))?;

        let currency_api_enabled: bool = env_var_or(CURRENCY_API_ENABLED_VAR, false);

        let inner = ConfigInner {
            db_username: env_var(DB_USERNAME_VAR)?,
            db_password: env_var(DB_PASSWORD_VAR)?,
            db_hostname: env_var(DB_HOSTNAME_VAR)?,
            db_port: env_var(DB_PORT_VAR)?,
            db_name: env_var(DB_NAME_VAR)?,
            db_max_connections: env_var_or(DB_MAX_CONNECTIONS_VAR, 48),
            db_idle_timeout: Duration::from_secs(env_var_or(DB_IDLE_TIMEOUT_SECS_VAR, 30)),

            hashing_key,
            token_signing_key,

            hash_length: env_var(HASH_LENGTH_VAR)?,
            hash_iterations: env_var(HASH_ITERATIONS_VAR)?,
            hash_mem_cost_kib: env_var(HASH_MEM_COST_KIB_VAR)?,
            hash_threads: env_var(HASH_THREADS_VAR)?,
            hash_salt_length: env_var(HASH_SALT_LENGTH_VAR)?,

            access_token_lifetime: Duration::from_secs(
                env_var_or(ACCESS_TOKEN_LIFETIME_MINS_VAR, 60) * 60,
            ),

            currency_api_enabled,
            currency_api_base_url: env_var_or(
                CURRENCY_API_BASE_URL_VAR,
                String::from("https://api.exchangerate.host/convert"),
            ),
            currency_api_key: if currency_api_enabled {
                env_var(CURRENCY_API_KEY_VAR)?
            } else {
                String::new()
            },
            currency_api_timeout: Duration::from_secs(env_var_or(
                CURRENCY_API_TIMEOUT_SECS_VAR,
                10,
            )),

            unusual_spending_typical_cents: env_var_or(
                UNUSUAL_SPENDING_TYPICAL_CENTS_VAR,
                30_000,
            ),

            actix_worker_count: env_var_or(ACTIX_WORKER_COUNT_VAR, num_cpus::get()),

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
    let var = std::env::var(key).map_err(|_| ConfigError::missing(key))?;
    let var: T = var.parse().map_err(|_| ConfigError::invalid(key))?;
    Ok(var)
}

fn env_var_or<T: FromStr>(key: &'static str, default: T) -> T {
    let Ok(var) = std::env::var(key) else {
        return default;
    };

    var.parse().unwrap_or(default)
}

#[derive(Clone, Copy, Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidVar(&'static str),
}

impl ConfigError {
    fn missing(var_name: &'static str) -> Self {
        Self::MissingVar(var_name)
    }

    fn invalid(var_name: &'static str) -> Self {
        Self::InvalidVar(var_name)
    }
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
