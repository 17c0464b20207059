use fintrack_common::db::{self, DaoError, DbThreadPool};
use fintrack_common::request_io::{CredentialPair, OutputToken};
use fintrack_common::token::{generate_access_token, TokenParams};
use fintrack_common::types::DEFAULT_CURRENCY;
use fintrack_common::validators::Validity;

use actix_web::{web, HttpResponse};
use std::str::FromStr;

use crate::env;
use crate::handlers::error::ServerError;

pub async fn signup(
    db_thread_pool: web::Data<DbThreadPool>,
    user_data: web::Json<CredentialPair>,
) -> Result<HttpResponse, ServerError> {
    if let Validity::Invalid(msg) = user_data.validate_email_address() {
        return Err(ServerError::InvalidFormat(Some(msg)));
    }

    if user_data.password.len() < 8 {
        return Err(ServerError::InputRejected(Some(String::from(
            "Password must be at least 8 characters long",
        ))));
    }

    let user_data = user_data.into_inner();
    let password = user_data.password.clone();

    let password_hash = match web::block(move || {
        argon2_kdf::Hasher::default()
            .algorithm(argon2_kdf::Algorithm::Argon2id)
            .salt_length(env::CONF.hash_salt_length)
            .hash_length(env::CONF.hash_length)
            .iterations(env::CONF.hash_iterations)
            .memory_cost_kib(env::CONF.hash_mem_cost_kib)
            .threads(env::CONF.hash_threads)
            .secret(argon2_kdf::Secret::using(&env::CONF.hashing_key))
            .hash(password.as_bytes())
            .map(|hash| hash.to_string())
    })
    .await?
    {
        Ok(h) => h,
        Err(e) => {
            log::error!("{e}");
            return Err(ServerError::InternalError(Some(String::from(
                "Failed to hash password",
            ))));
        }
    };

    let user = match web::block(move || {
        let mut user_dao = db::user::Dao::new(&db_thread_pool);
        user_dao.create_user(
            &user_data.email,
            &password_hash,
            user_data
                .preferred_currency
                .as_deref()
                .unwrap_or(DEFAULT_CURRENCY),
        )
    })
    .await?
    {
        Ok(u) => u,
        Err(e) => match e {
            DaoError::AlreadyExists(_) => return Err(e.into()),
            _ => {
                log::error!("{e}");
                return Err(ServerError::DatabaseTransactionError(Some(String::from(
                    "Failed to create user",
                ))));
            }
        },
    };

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "User registered successfully",
        "email": user.email,
    })))
}

pub async fn login(
    db_thread_pool: web::Data<DbThreadPool>,
    credentials: web::Json<CredentialPair>,
) -> Result<HttpResponse, ServerError> {
    const INVALID_CREDENTIALS_MSG: &str = "Incorrect email or password";

    let email = credentials.email.to_lowercase();

    let user = match web::block(move || {
        let mut user_dao = db::user::Dao::new(&db_thread_pool);
        user_dao.get_user_by_email(&email)
    })
    .await?
    {
        Ok(u) => u,
        Err(e) => match e {
            DaoError::QueryFailure(diesel::result::Error::NotFound) => {
                return Err(ServerError::UserUnauthorized(Some(String::from(
                    INVALID_CREDENTIALS_MSG,
                ))));
            }
            _ => {
                log::error!("{e}");
                return Err(ServerError::DatabaseTransactionError(Some(String::from(
                    "Failed to look up user",
                ))));
            }
        },
    };

    let password = credentials.password.clone();
    let password_hash = user.password_hash.clone();

    let password_matches = match web::block(move || {
        argon2_kdf::Hash::from_str(&password_hash).map(|hash| {
            hash.verify_with_secret(
                password.as_bytes(),
                argon2_kdf::Secret::using(&env::CONF.hashing_key),
            )
        })
    })
    .await?
    {
        Ok(m) => m,
        Err(e) => {
            log::error!("{e}");
            return Err(ServerError::InternalError(Some(String::from(
                "Failed to verify password",
            ))));
        }
    };

    if !password_matches {
        return Err(ServerError::UserUnauthorized(Some(String::from(
            INVALID_CREDENTIALS_MSG,
        ))));
    }

    let token = generate_access_token(
        &TokenParams {
            user_id: &user.id,
            user_email: &user.email,
            user_role: user.role,
            user_currency: &user.preferred_currency,
        },
        env::CONF.access_token_lifetime,
        &env::CONF.token_signing_key,
    )?;

    Ok(HttpResponse::Ok().json(OutputToken {
        token: token.to_string(),
    }))
}
