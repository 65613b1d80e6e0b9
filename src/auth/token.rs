use crate::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by a session token.
///
/// Only the session id is exposed. Which user it belongs to is known to the
/// server alone.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Server-side session id.
    pub sid: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Signing and verification keys derived from the session secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Signs a token for session `sid` that stops verifying at `exp`.
    pub fn sign(&self, sid: &str, exp: usize) -> Result<String, AppError> {
        let claims = Claims {
            sid: sid.to_string(),
            exp,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            AppError::InternalServerError(format!("Failed to sign session token: {}", e))
        })
    }

    /// Checks signature and expiry, then returns the claims.
    ///
    /// Any failure is `AppError::Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn future_exp() -> usize {
        (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize
    }

    #[test]
    fn test_token_sign_and_verify() {
        let keys = TokenKeys::new("test_secret_for_gen_verify");
        let token = keys.sign("session-1", future_exp()).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sid, "session-1");
    }

    #[test]
    fn test_token_expiration() {
        let keys = TokenKeys::new("test_secret_for_expiration");
        let expired = (chrono::Utc::now() - chrono::Duration::hours(2)).timestamp() as usize;
        let token = keys.sign("session-2", expired).unwrap();

        match keys.verify(&token) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("ExpiredSignature")),
            other => panic!("Token should have been rejected as expired: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = TokenKeys::new("one_secret")
            .sign("session-3", future_exp())
            .unwrap();

        match TokenKeys::new("a_completely_different_secret").verify(&token) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("InvalidSignature")),
            other => panic!("Token should have been rejected: {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        let keys = TokenKeys::new("secret");
        assert!(matches!(
            keys.verify("not-a-token"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
