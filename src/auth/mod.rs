pub mod extractors;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod session;
pub mod token;

use serde::Deserialize;
use validator::Validate;

pub use extractors::{AuthenticatedUser, Identity};
pub use guard::authorize_task;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use session::{Session, SessionStore};
pub use token::{Claims, TokenKeys};

/// Name of the cookie that carries the session token.
pub const SESSION_COOKIE: &str = "tasknest_session";

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name, 1 to 100 characters.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Login identifier. Must be a valid email address.
    #[validate(email)]
    pub email: String,
    /// Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
}
