use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// Who is making the request, as established by `AuthMiddleware`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    /// Server-side session backing this request; logout revokes it.
    pub session_id: String,
}

/// Extracts the caller's [`Identity`] from request extensions.
///
/// Use on routes behind `AuthMiddleware`. If no identity is present the
/// extractor fails with `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl AuthenticatedUser {
    pub fn user_id(&self) -> i64 {
        self.0.user_id
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Identity>().cloned() {
            Some(identity) => ready(Ok(AuthenticatedUser(identity))),
            None => {
                let err = AppError::Unauthorized("Authentication required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
