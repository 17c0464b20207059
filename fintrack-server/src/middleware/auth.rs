use fintrack_common::db::UserScope;
use fintrack_common::token::{validate_access_token, TokenClaims, TokenError};
use fintrack_common::types::UserRole;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures::future;

use crate::env;

/// Extracts and verifies the bearer token on a request. Handlers surface the
/// inner error with `?`, which maps to a 401.
#[derive(Debug)]
pub struct AuthorizedUser(pub Result<TokenClaims, TokenError>);

impl AuthorizedUser {
    pub fn claims(self) -> Result<TokenClaims, TokenError> {
        self.0
    }
}

/// The query scope a set of claims is entitled to. Admins read across all
/// users.
pub fn scope_for(claims: &TokenClaims) -> UserScope {
    match claims.rol {
        UserRole::Admin => UserScope::All,
        UserRole::User => UserScope::Owner(claims.eml.clone()),
    }
}

impl FromRequest for AuthorizedUser {
    type Error = actix_web::error::Error;
    type Future = future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = match req.headers().get("Authorization") {
            Some(h) => h,
            None => return future::ok(AuthorizedUser(Err(TokenError::TokenMissing))),
        };

        let header = match header.to_str() {
            Ok(h) => h,
            Err(_) => return future::ok(AuthorizedUser(Err(TokenError::TokenInvalid))),
        };

        let token = match header.strip_prefix("Bearer ") {
            Some(t) => t.trim(),
            None => return future::ok(AuthorizedUser(Err(TokenError::TokenMissing))),
        };

        future::ok(AuthorizedUser(validate_access_token(
            token,
            &env::CONF.token_signing_key,
        )))
    }
}
