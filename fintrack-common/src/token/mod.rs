use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::types::UserRole;

#[derive(Debug)]
pub enum TokenError {
    TokenInvalid,
    TokenExpired,
    TokenMissing,
    SystemResourceAccessFailure,
}

impl std::error::Error for TokenError {}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::TokenInvalid => write!(f, "TokenInvalid"),
            TokenError::TokenExpired => write!(f, "TokenExpired"),
            TokenError::TokenMissing => write!(f, "TokenMissing"),
            TokenError::SystemResourceAccessFailure => write!(f, "SystemResourceAccessFailure"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenParams<'a> {
    pub user_id: &'a Uuid,
    pub user_email: &'a str,
    pub user_role: UserRole,
    pub user_currency: &'a str,
}

#[derive(Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub exp: u64,       // Expiration in time since UNIX epoch
    pub uid: Uuid,      // User ID
    pub eml: String,    // User email address
    pub rol: UserRole,  // User role
    pub cur: String,    // User preferred currency
    pub slt: u32,       // Random salt (makes it so two tokens generated in the same
                        //              second are different--useful for testing)
}

impl TokenClaims {
    pub fn create_token(&self, key: &[u8]) -> String {
        let mut claims_and_hash =
            serde_json::to_vec(self).expect("Failed to transform claims into JSON");

        let mut mac =
            Hmac::<Sha256>::new_from_slice(key).expect("Failed to generate hash from key");
        mac.update(&claims_and_hash);
        let hash = hex::encode(mac.finalize().into_bytes());

        claims_and_hash.push(124); // 124 is the ASCII value of the | character
        claims_and_hash.extend_from_slice(&hash.into_bytes());

        URL_SAFE_NO_PAD.encode(claims_and_hash)
    }

    pub fn from_token_with_validation(token: &str, key: &[u8]) -> Result<TokenClaims, TokenError> {
        let (claims, claims_json_str, hash) = TokenClaims::token_to_claims_and_hash(token)?;

        let time_since_epoch = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(t) => t,
            Err(_) => return Err(TokenError::SystemResourceAccessFailure),
        };

        if time_since_epoch.as_secs() >= claims.exp {
            return Err(TokenError::TokenExpired);
        }

        let mut mac =
            Hmac::<Sha256>::new_from_slice(key).expect("Failed to generate hash from key");
        mac.update(claims_json_str.as_bytes());

        match mac.verify_slice(&hash) {
            Ok(_) => Ok(claims),
            Err(_) => Err(TokenError::TokenInvalid),
        }
    }

    fn token_to_claims_and_hash(token: &str) -> Result<(TokenClaims, String, Vec<u8>), TokenError> {
        let decoded_token = match URL_SAFE_NO_PAD.decode(token.as_bytes()) {
            Ok(t) => t,
            Err(_) => return Err(TokenError::TokenInvalid),
        };

        let token_str = String::from_utf8_lossy(&decoded_token);
        let mut split_token = token_str.split('|');

        let hash_str = match split_token.next_back() {
            Some(h) => h,
            None => {
                return Err(TokenError::TokenInvalid);
            }
        };

        let hash = match hex::decode(hash_str) {
            Ok(h) => h,
            Err(_) => return Err(TokenError::TokenInvalid),
        };

        let claims_json_str = split_token.collect::<String>();
        let claims = match serde_json::from_str::<TokenClaims>(&claims_json_str) {
            Ok(c) => c,
            Err(_) => return Err(TokenError::TokenInvalid),
        };

        Ok((claims, claims_json_str, hash))
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Token {
    token: String,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token)
    }
}

pub fn generate_access_token(
    params: &TokenParams,
    lifetime: Duration,
    signing_key: &[u8],
) -> Result<Token, TokenError> {
    let time_since_epoch = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(t) => t,
        Err(_) => return Err(TokenError::SystemResourceAccessFailure),
    };

    let expiration = (time_since_epoch + lifetime).as_secs();
    let salt = rand::thread_rng().gen_range(1..u32::MAX);

    let claims = TokenClaims {
        exp: expiration,
        uid: *params.user_id,
        eml: params.user_email.to_string(),
        rol: params.user_role,
        cur: params.user_currency.to_string(),
        slt: salt,
    };

    let token = claims.create_token(signing_key);

    Ok(Token { token })
}

#[inline]
pub fn validate_access_token(token: &str, signing_key: &[u8]) -> Result<TokenClaims, TokenError> {
    TokenClaims::from_token_with_validation(token, signing_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::SystemTime;

    #[test]
    fn test_create_token_is_deterministic_for_fixed_claims() {
        let claims = TokenClaims {
            exp: 123456789,
            uid: uuid::Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap(),
            eml: "testing_tokens@example.com".to_string(),
            rol: UserRole::User,
            cur: String::from("GBP"),
            slt: 10000,
        };

        let claims_different = TokenClaims {
            exp: 123456788,
            uid: uuid::Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap(),
            eml: "testing_tokens@example.com".to_string(),
            rol: UserRole::User,
            cur: String::from("GBP"),
            slt: 10000,
        };

        let token = claims.create_token("thisIsAFakeKey".as_bytes());
        let token_again = claims.create_token("thisIsAFakeKey".as_bytes());
        let token_different = claims_different.create_token("thisIsAFakeKey".as_bytes());

        assert_eq!(token, token_again);
        assert_ne!(token, token_different);

        let decoded_token = URL_SAFE_NO_PAD.decode(token.as_bytes()).unwrap();
        let token_str = String::from_utf8_lossy(&decoded_token);
        let mut split_token = token_str.split('|');
        split_token.next_back();

        let claims_json_str = split_token.collect::<String>();
        let decoded_claims = serde_json::from_str::<TokenClaims>(claims_json_str.as_str()).unwrap();

        assert_eq!(decoded_claims, claims);
    }

    #[test]
    fn test_claims_from_token_with_validation() {
        let claims = TokenClaims {
            exp: u64::MAX,
            uid: uuid::Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap(),
            eml: "testing_tokens@example.com".to_string(),
            rol: UserRole::Admin,
            cur: String::from("GBP"),
            slt: 10000,
        };

        let token = claims.create_token(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]);
        let decoded_claims = TokenClaims::from_token_with_validation(
            &token,
            &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
        )
        .unwrap();

        assert_eq!(decoded_claims, claims);
    }

    #[test]
    fn test_token_validation_fails_with_wrong_key() {
        let claims = TokenClaims {
            exp: u64::MAX,
            uid: uuid::Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap(),
            eml: "testing_tokens@example.com".to_string(),
            rol: UserRole::User,
            cur: String::from("GBP"),
            slt: 10000,
        };

        let token = claims.create_token(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]);
        let result = TokenClaims::from_token_with_validation(
            &token,
            &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 17],
        );

        let error = result.unwrap_err();

        assert_eq!(
            std::mem::discriminant(&error),
            std::mem::discriminant(&TokenError::TokenInvalid)
        );
    }

    #[test]
    fn test_token_validation_fails_when_expired() {
        let claims = TokenClaims {
            exp: 1657076995,
            uid: uuid::Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap(),
            eml: "testing_tokens@example.com".to_string(),
            rol: UserRole::User,
            cur: String::from("GBP"),
            slt: 10000,
        };

        let token = claims.create_token(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]);
        let result = TokenClaims::from_token_with_validation(
            &token,
            &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
        );

        let error = result.unwrap_err();

        assert_eq!(
            std::mem::discriminant(&error),
            std::mem::discriminant(&TokenError::TokenExpired)
        );
    }

    #[test]
    fn test_token_validation_fails_when_tampered() {
        let claims = TokenClaims {
            exp: u64::MAX,
            uid: uuid::Uuid::new_v4(),
            eml: "testing_tokens@example.com".to_string(),
            rol: UserRole::User,
            cur: String::from("GBP"),
            slt: 10000,
        };

        let key = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
        let token = claims.create_token(key);

        // Swap the role claim inside the encoded token
        let decoded = URL_SAFE_NO_PAD.decode(token.as_bytes()).unwrap();
        let tampered_str = String::from_utf8_lossy(&decoded).replace("\"rol\":\"user\"", "\"rol\":\"admin\"");
        let tampered_token = URL_SAFE_NO_PAD.encode(tampered_str.as_bytes());

        let result = TokenClaims::from_token_with_validation(&tampered_token, key);

        let error = result.unwrap_err();

        assert_eq!(
            std::mem::discriminant(&error),
            std::mem::discriminant(&TokenError::TokenInvalid)
        );
    }

    #[test]
    fn test_generate_access_token() {
        let user_id = Uuid::new_v4();
        let user_email = "test_user@example.com";

        let token = generate_access_token(
            &TokenParams {
                user_id: &user_id,
                user_email,
                user_role: UserRole::User,
                user_currency: "USD",
            },
            Duration::from_secs(5),
            "thisIsAFakeKey".as_bytes(),
        )
        .unwrap();

        assert!(!token.token.contains(&user_id.to_string()));

        let decoded_token =
            TokenClaims::from_token_with_validation(&token.token, "thisIsAFakeKey".as_bytes())
                .unwrap();

        assert_eq!(decoded_token.uid, user_id);
        assert_eq!(decoded_token.eml, user_email);
        assert_eq!(decoded_token.rol, UserRole::User);
        assert_eq!(decoded_token.cur, "USD");
        assert!(
            decoded_token.exp
                > SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap()
                    .as_secs()
        );
    }
}
