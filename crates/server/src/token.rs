//! Bearer access tokens: HS256 JWTs whose subject is the user id.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ServerError;

const INVALID_CREDENTIALS: &str = "Could not validate credentials";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Sign a token for `user_id`; returns it with its lifetime in seconds.
pub fn issue(
    user_id: Uuid,
    secret: &str,
    expire_minutes: i64,
) -> Result<(String, i64), ServerError> {
    let lifetime = Duration::try_minutes(expire_minutes);
    let expires_at = lifetime.and_then(|d| Utc::now().checked_add_signed(d));
    let (Some(lifetime), Some(expires_at)) = (lifetime, expires_at) else {
        tracing::error!(expire_minutes, "access token lifetime out of range");
        return Err(ServerError::Generic("failed to issue access token".to_string()));
    };
    let claims = Claims {
        sub: user_id.to_string(),
        exp: expires_at.timestamp(),
    };

    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| {
        tracing::error!("failed to sign access token: {err}");
        ServerError::Generic("failed to issue access token".to_string())
    })?;

    Ok((token, lifetime.num_seconds()))
}

/// Validate signature and expiry, returning the subject.
pub fn verify(token: &str, secret: &str) -> Result<Uuid, ServerError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| ServerError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    Uuid::parse_str(&data.claims.sub)
        .map_err(|_| ServerError::Unauthorized(INVALID_CREDENTIALS.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let id = Uuid::new_v4();
        let (token, expires_in) = issue(id, "secret", 120).unwrap();
        assert_eq!(expires_in, 7200);
        assert_eq!(verify(&token, "secret").unwrap(), id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let (token, _) = issue(Uuid::new_v4(), "secret", 5).unwrap();
        assert!(matches!(
            verify(&token, "other"),
            Err(ServerError::Unauthorized(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let (token, _) = issue(Uuid::new_v4(), "secret", -60).unwrap();
        assert!(matches!(
            verify(&token, "secret"),
            Err(ServerError::Unauthorized(_))
        ));
    }

    #[test]
    fn unrepresentable_lifetime_is_an_error() {
        for minutes in [i64::MAX, i64::MIN, 1 << 40] {
            assert!(matches!(
                issue(Uuid::new_v4(), "secret", minutes),
                Err(ServerError::Generic(_))
            ));
        }
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            verify("not-a-token", "secret"),
            Err(ServerError::Unauthorized(_))
        ));
    }
}
