use crate::error::AppError;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token, the user's unique identifier.
    pub sub: i64,
    /// Identifier of the server-side session the token is bound to.
    pub sid: String,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
}

/// Signs a token for `user_id` bound to the session `session_id`.
///
/// The token expires at `expires_at`, which should match the session row's
/// own expiry so that neither outlives the other.
pub fn generate_token(
    user_id: i64,
    session_id: &str,
    expires_at: DateTime<Utc>,
    secret: &str,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id,
        sid: session_id.to_string(),
        exp: expires_at.timestamp().max(0) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a JWT string and decodes its claims.
///
/// Default validation checks are applied (signature, expiration).
/// Returns `AppError::Unauthorized` if the token is malformed, its signature is
/// invalid, or it has expired.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &str = "test_secret_for_tokens";

    #[test]
    fn test_token_generation_and_verification() {
        let expires_at = Utc::now() + Duration::hours(1);
        let token = generate_token(7, "session-a", expires_at, SECRET).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.sid, "session-a");
    }

    #[test]
    fn test_token_expiration() {
        let expired = Utc::now() - Duration::hours(2);
        let token = generate_token(2, "session-b", expired, SECRET).unwrap();

        match verify_token(&token, SECRET) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("ExpiredSignature")),
            Ok(_) => panic!("Token should have been invalid due to expiration"),
            Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
        }
    }

    #[test]
    fn test_invalid_token_signature() {
        let expires_at = Utc::now() + Duration::hours(1);
        let token = generate_token(3, "session-c", expires_at, "another_secret").unwrap();

        match verify_token(&token, SECRET) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("InvalidSignature")),
            Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
            Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
        }
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        assert!(matches!(
            verify_token("not-a-jwt", SECRET),
            Err(AppError::Unauthorized(_))
        ));
    }
}
