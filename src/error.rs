//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a request can hit, from a malformed body to a broken database
//! connection, ends up as one of its variants.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return it
//! directly. Server-side failures are logged here and answered with a generic body;
//! their detail never reaches the client.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error` and `argon2::password_hash::Error` let callers use `?`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Input failed field-level validation (HTTP 400).
    /// The field errors are returned to the client as `details`.
    ValidationError(ValidationErrors),
    /// The request could not be understood at all, e.g. malformed JSON or a
    /// non-numeric id (HTTP 400).
    BadRequest(String),
    /// Bad credentials or a missing/expired session (HTTP 401).
    Unauthorized(String),
    /// Authenticated, but the record belongs to someone else (HTTP 403).
    Forbidden(String),
    /// No such record (HTTP 404).
    NotFound(String),
    /// A unique key is already taken (HTTP 409).
    Conflict(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the database driver (HTTP 500).
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => write!(f, "Validation Error: {}", errors),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => json!({
                "error": "Invalid input",
                "details": errors
            }),
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => json!({ "error": msg }),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self);
                json!({ "error": "Internal server error" })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound` and unique-constraint violations become
/// `Conflict`; everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Record already exists".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        AppError::ValidationError(errors)
    }
}

/// A session token that fails signature or expiry checks is an authentication failure.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid session: {}", error))
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(error: argon2::password_hash::Error) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (AppError::BadRequest("bad".into()), 400),
            (AppError::Unauthorized("nope".into()), 401),
            (AppError::Forbidden("mine".into()), 403),
            (AppError::NotFound("gone".into()), 404),
            (AppError::Conflict("taken".into()), 409),
            (AppError::InternalServerError("boom".into()), 500),
            (AppError::DatabaseError("pool closed".into()), 500),
        ];
        for (error, status) in cases {
            assert_eq!(error.error_response().status(), status, "{}", error);
        }
    }

    #[actix_rt::test]
    async fn test_internal_errors_do_not_leak_detail() {
        let error = AppError::DatabaseError("connection refused at 10.0.0.3".into());
        let body = actix_web::body::to_bytes(error.error_response().into_body())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
        assert!(!String::from_utf8_lossy(&body).contains("10.0.0.3"));
    }

    #[actix_rt::test]
    async fn test_validation_error_carries_field_detail() {
        let mut errors = ValidationErrors::new();
        errors.add("title", ValidationError::new("length"));
        let response = AppError::from(errors).error_response();
        assert_eq!(response.status(), 400);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Invalid input");
        assert_eq!(json["details"]["title"][0]["code"], "length");
    }
}
