use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::users::store::StoreError;

/// Failures surfaced by the credential flow.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Registration payload is missing the email or the password.
    #[error("Email and password are required")]
    MissingCredentials,

    /// Registration hit an email that already has a record.
    #[error("Email already exists")]
    DuplicateEmail,

    /// Login with an unknown email or a wrong password. One variant for
    /// both so the error kind does not reveal which emails are registered.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The store could not be reached or the query failed.
    #[error("storage unavailable")]
    Storage(#[source] sqlx::Error),

    /// Anything else.
    #[error("internal error")]
    Unexpected(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey => ApiError::DuplicateEmail,
            StoreError::Database(e) => ApiError::Storage(e),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MissingCredentials | ApiError::DuplicateEmail | ApiError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Storage(e) => {
                error!(error = %e, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".into())
            }
            ApiError::Unexpected(e) => {
                error!(error = %e, "unexpected failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".into())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_errors_map_to_400() {
        for err in [
            ApiError::MissingCredentials,
            ApiError::DuplicateEmail,
            ApiError::InvalidCredentials,
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn unexpected_errors_map_to_500() {
        let err = ApiError::Unexpected(anyhow::anyhow!("boom"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn duplicate_key_from_store_becomes_duplicate_email() {
        let err: ApiError = StoreError::DuplicateKey.into();
        assert!(matches!(err, ApiError::DuplicateEmail));
    }

    #[test]
    fn unknown_email_and_wrong_password_share_a_message() {
        assert_eq!(
            ApiError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }
}
