//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.
//!
//! Token failures are logged in full but surface to the client through a
//! single "invalid or missing authentication token" message.

use std::collections::BTreeMap;

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Per-field validation messages
pub type FieldErrors = BTreeMap<String, String>;

const INVALID_TOKEN_MESSAGE: &str = "invalid or missing authentication token";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password hashing engine failed
    #[error("Password hashing failed: {0}")]
    HashingFailure(String),

    /// OS random source could not supply bytes
    #[error("Entropy unavailable: {0}")]
    EntropyUnavailable(String),

    /// Token lifetime not positive, or expiry out of range
    #[error("Token TTL must be positive and representable")]
    InvalidTtl,

    /// Scope string outside the closed set
    #[error("Invalid token scope: {0}")]
    InvalidScope(String),

    /// Referenced row does not exist (foreign key)
    #[error("Referential constraint violated")]
    ConstraintViolation,

    /// No matching record
    #[error("Record not found")]
    RecordNotFound,

    /// Authorization header not in `Bearer <token>` form
    #[error("Malformed authorization header")]
    MalformedCredential,

    /// Token failed shape check or did not resolve; also wrong email/password
    #[error("Invalid credential")]
    InvalidCredential,

    /// Credential valid but account not activated
    #[error("User account is not activated")]
    InactiveAccount,

    /// Activated caller lacks the permission code a route requires
    #[error("Missing permission: {0}")]
    PermissionDenied(String),

    /// Anonymous caller on a route that needs an identity
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Activation token malformed, expired or already used
    #[error("Invalid or expired activation token")]
    InvalidActivationToken,

    /// Email address already registered
    #[error("Duplicate email")]
    DuplicateEmail,

    /// Optimistic concurrency check failed
    #[error("Edit conflict")]
    EditConflict,

    /// Input failed validation
    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),

    /// Storage call exceeded its deadline
    #[error("Storage operation timed out")]
    Timeout,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Single-field validation error
    pub fn field(key: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(key.into(), message.into());
        AuthError::Validation(errors)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MalformedCredential
            | AuthError::InvalidCredential
            | AuthError::AuthenticationRequired => ErrorKind::Unauthorized,
            AuthError::InactiveAccount | AuthError::PermissionDenied(_) => ErrorKind::Forbidden,
            AuthError::Validation(_)
            | AuthError::InvalidActivationToken
            | AuthError::DuplicateEmail => ErrorKind::UnprocessableEntity,
            AuthError::EditConflict => ErrorKind::Conflict,
            AuthError::RecordNotFound => ErrorKind::NotFound,
            AuthError::Timeout => ErrorKind::ServiceUnavailable,
            AuthError::HashingFailure(_)
            | AuthError::EntropyUnavailable(_)
            | AuthError::InvalidTtl
            | AuthError::InvalidScope(_)
            | AuthError::ConstraintViolation
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures never leak their detail to the client.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::MalformedCredential | AuthError::InvalidCredential => {
                AppError::unauthorized(INVALID_TOKEN_MESSAGE)
            }
            AuthError::AuthenticationRequired => {
                AppError::unauthorized("you must be authenticated to access this resource")
            }
            AuthError::InactiveAccount => {
                AppError::forbidden("your user account must be activated to access this resource")
            }
            AuthError::PermissionDenied(_) => AppError::forbidden(
                "your user account doesn't have the necessary permissions to access this resource",
            ),
            AuthError::InvalidActivationToken => {
                AppError::unprocessable("validation failed").with_details(serde_json::json!({
                    "token": "invalid or expired activation token"
                }))
            }
            AuthError::DuplicateEmail => {
                AppError::unprocessable("validation failed").with_details(serde_json::json!({
                    "email": "a user with this email address already exists"
                }))
            }
            AuthError::Validation(errors) => AppError::unprocessable("validation failed")
                .with_details(serde_json::json!(errors)),
            AuthError::EditConflict => AppError::conflict(
                "unable to update the record due to an edit conflict, please try again",
            ),
            AuthError::RecordNotFound => {
                AppError::not_found("the requested resource could not be found")
            }
            AuthError::Timeout => {
                AppError::service_unavailable("the server is temporarily unable to respond")
            }
            _ => AppError::internal(
                "the server encountered a problem and could not process your request",
            ),
        }
    }

    /// Whether the response should carry a `WWW-Authenticate` challenge
    fn is_bearer_challenge(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedCredential
                | AuthError::InvalidCredential
                | AuthError::AuthenticationRequired
        )
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::HashingFailure(msg) => {
                tracing::error!(error = %msg, "Password hashing failure");
            }
            AuthError::EntropyUnavailable(msg) => {
                tracing::error!(error = %msg, "Random source unavailable, token not issued");
            }
            AuthError::InvalidTtl | AuthError::InvalidScope(_) | AuthError::ConstraintViolation => {
                tracing::error!(error = %self, "Token store misuse");
            }
            AuthError::Timeout => {
                tracing::error!("Auth storage deadline exceeded");
            }
            AuthError::MalformedCredential | AuthError::InvalidCredential => {
                tracing::warn!(reason = %self, "Rejected credential");
            }
            AuthError::InactiveAccount => {
                tracing::info!("Request from inactive account");
            }
            AuthError::PermissionDenied(code) => {
                tracing::info!(permission = %code, "Request without required permission");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        let challenge = self.is_bearer_challenge();
        let mut response = self.to_app_error().into_response();
        if challenge {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<platform::crypto::EntropyError> for AuthError {
    fn from(err: platform::crypto::EntropyError) -> Self {
        AuthError::EntropyUnavailable(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::HashingFailure(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for AuthError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AuthError::Timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_rejections_share_status_and_message() {
        let malformed = AuthError::MalformedCredential.to_app_error();
        let invalid = AuthError::InvalidCredential.to_app_error();
        assert_eq!(malformed.status_code(), 401);
        assert_eq!(invalid.status_code(), 401);
        assert_eq!(malformed.message(), invalid.message());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AuthError::InactiveAccount.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::PermissionDenied("tokens:admin".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AuthError::EditConflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::DuplicateEmail.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AuthError::Timeout.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            AuthError::ConstraintViolation.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let err = AuthError::HashingFailure("argon2 blew up".into()).to_app_error();
        assert!(!err.message().contains("argon2"));
    }

    #[test]
    fn test_bearer_challenge_header() {
        let response = AuthError::InvalidCredential.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );

        let response = AuthError::InactiveAccount.into_response();
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_field_helper() {
        match AuthError::field("email", "must be provided") {
            AuthError::Validation(errors) => {
                assert_eq!(errors.get("email").map(String::as_str), Some("must be provided"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
