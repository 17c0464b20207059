pub mod budget;
pub mod currency;
pub mod goal;
pub mod notification;
pub mod report;
pub mod transaction;
pub mod user;

pub mod error {
    use fintrack_common::db::DaoError;
    use fintrack_common::token::TokenError;

    use actix_web::http::{header, StatusCode};
    use actix_web::{HttpResponse, HttpResponseBuilder};
    use std::fmt;

    #[derive(Debug)]
    pub enum ServerError {
        // 400 Errors
        InvalidFormat(Option<String>),
        InputRejected(Option<String>),
        AlreadyExists(Option<String>),
        UserUnauthorized(Option<String>),
        AccessForbidden(Option<String>),
        NotFound(Option<String>),

        // 500 Errors
        InternalError(Option<String>),
        DatabaseTransactionError(Option<String>),
    }

    impl std::error::Error for ServerError {}

    impl fmt::Display for ServerError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ServerError::InvalidFormat(msg) => format_err(f, "Invalid request format", msg),
                ServerError::InputRejected(msg) => format_err(f, "Input rejected", msg),
                ServerError::AlreadyExists(msg) => format_err(f, "Already exists", msg),
                ServerError::UserUnauthorized(msg) => format_err(f, "User unauthorized", msg),
                ServerError::AccessForbidden(msg) => format_err(f, "Access forbidden", msg),
                ServerError::NotFound(msg) => format_err(f, "Not found", msg),
                ServerError::InternalError(msg) => format_err(f, "Internal server error", msg),
                ServerError::DatabaseTransactionError(msg) => {
                    format_err(f, "Database transaction failed", msg)
                }
            }
        }
    }

    impl actix_web::error::ResponseError for ServerError {
        fn error_response(&self) -> HttpResponse {
            HttpResponseBuilder::new(self.status_code())
                .insert_header((header::CONTENT_TYPE, "application/json; charset=utf-8"))
                .body(self.to_string())
        }

        fn status_code(&self) -> StatusCode {
            match *self {
                ServerError::InvalidFormat(_)
                | ServerError::InputRejected(_)
                | ServerError::AlreadyExists(_) => StatusCode::BAD_REQUEST,
                ServerError::UserUnauthorized(_) => StatusCode::UNAUTHORIZED,
                ServerError::AccessForbidden(_) => StatusCode::FORBIDDEN,
                ServerError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl From<actix_web::error::BlockingError> for ServerError {
        fn from(_result: actix_web::error::BlockingError) -> Self {
            ServerError::InternalError(Some(String::from("Actix thread pool failure")))
        }
    }

    impl From<TokenError> for ServerError {
        fn from(result: TokenError) -> Self {
            match result {
                TokenError::TokenInvalid => {
                    ServerError::UserUnauthorized(Some(String::from("Invalid token")))
                }
                TokenError::TokenExpired => {
                    ServerError::UserUnauthorized(Some(String::from("Token expired")))
                }
                TokenError::TokenMissing => {
                    ServerError::UserUnauthorized(Some(String::from("Missing token")))
                }
                TokenError::SystemResourceAccessFailure => ServerError::InternalError(Some(
                    String::from("Failed to access system resources"),
                )),
            }
        }
    }

    impl From<DaoError> for ServerError {
        fn from(error: DaoError) -> Self {
            match error {
                DaoError::QueryFailure(diesel::result::Error::NotFound) => {
                    ServerError::NotFound(None)
                }
                DaoError::AlreadyExists(msg) => {
                    ServerError::AlreadyExists(Some(String::from(msg)))
                }
                e => {
                    log::error!("{e}");
                    ServerError::DatabaseTransactionError(None)
                }
            }
        }
    }

    fn format_err(
        f: &mut fmt::Formatter<'_>,
        error_txt: &str,
        msg: &Option<String>,
    ) -> fmt::Result {
        write!(
            f,
            "{{ \"error_msg\": \"{}{}\" }}",
            error_txt,
            if msg.is_some() {
                format!(": {}", msg.as_ref().unwrap())
            } else {
                String::new()
            }
        )
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        use actix_web::body::to_bytes;
        use actix_web::error::ResponseError;

        #[test]
        fn test_status_codes() {
            assert_eq!(
                ServerError::InvalidFormat(None).status_code(),
                StatusCode::BAD_REQUEST
            );
            assert_eq!(
                ServerError::InputRejected(None).status_code(),
                StatusCode::BAD_REQUEST
            );
            assert_eq!(
                ServerError::AlreadyExists(None).status_code(),
                StatusCode::BAD_REQUEST
            );
            assert_eq!(
                ServerError::UserUnauthorized(None).status_code(),
                StatusCode::UNAUTHORIZED
            );
            assert_eq!(
                ServerError::AccessForbidden(None).status_code(),
                StatusCode::FORBIDDEN
            );
            assert_eq!(
                ServerError::NotFound(None).status_code(),
                StatusCode::NOT_FOUND
            );
            assert_eq!(
                ServerError::InternalError(None).status_code(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
            assert_eq!(
                ServerError::DatabaseTransactionError(None).status_code(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }

        #[actix_rt::test]
        async fn test_error_response_body_is_json() {
            let error = ServerError::NotFound(Some(String::from("Transaction not found")));
            let response = error.error_response();

            assert_eq!(response.status(), StatusCode::NOT_FOUND);

            let body = to_bytes(response.into_body()).await.unwrap();
            let body = serde_json::from_slice::<serde_json::Value>(&body).unwrap();

            assert_eq!(body["error_msg"], "Not found: Transaction not found");
        }

        #[actix_rt::test]
        async fn test_error_response_body_without_message() {
            let error = ServerError::InternalError(None);
            let response = error.error_response();

            let body = to_bytes(response.into_body()).await.unwrap();
            let body = serde_json::from_slice::<serde_json::Value>(&body).unwrap();

            assert_eq!(body["error_msg"], "Internal server error");
        }

        #[test]
        fn test_dao_error_conversions() {
            let not_found: ServerError =
                DaoError::QueryFailure(diesel::result::Error::NotFound).into();
            assert!(matches!(not_found, ServerError::NotFound(None)));

            let duplicate: ServerError = DaoError::AlreadyExists("Budget already exists.").into();
            match duplicate {
                ServerError::AlreadyExists(Some(msg)) => {
                    assert_eq!(msg, "Budget already exists.")
                }
                e => panic!("Expected AlreadyExists, got {e:?}"),
            }
        }
    }
}
