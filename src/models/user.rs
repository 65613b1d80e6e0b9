use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account.
///
/// Users are immutable once created. The password hash is never serialized,
/// so a `User` can be returned from any endpoint as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Login identifier, unique across users (case-sensitive).
    pub email: String,
    /// Argon2 PHC string: algorithm, parameters, salt and hash together.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// Everything needed to insert a user; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
