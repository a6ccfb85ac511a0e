use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::env_or;

/// Which of the two session tokens a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by both session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    /// Random per-token id so two tokens minted in the same second hash differently.
    pub jti: String,
    pub typ: TokenKind,
}

/// Hex SHA-256 of a raw token. Only this digest of a refresh token is stored.
pub fn hash_token(raw_token: &str) -> String {
    format!("{:x}", Sha256::digest(raw_token.as_bytes()))
}

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").expect("JWT_SECRET must be set")
}

pub fn access_token_expiry_minutes() -> i64 {
    env_or("JWT_ACCESS_TOKEN_EXPIRY_MINUTES", 15)
}

pub fn refresh_token_expiry_days() -> i64 {
    env_or("JWT_REFRESH_TOKEN_EXPIRY_DAYS", 7)
}

fn issue(
    kind: TokenKind,
    user_id: i64,
    email: &str,
    lifetime: Duration,
) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires_at = now + lifetime;
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
        jti: uuid::Uuid::new_v4().to_string(),
        typ: kind,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_bytes()),
    )?;
    Ok((token, expires_at))
}

pub fn create_access_token(user_id: i64, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
    issue(
        TokenKind::Access,
        user_id,
        email,
        Duration::minutes(access_token_expiry_minutes()),
    )
    .map(|(token, _)| token)
}

/// Returns the token and its expiry, which is persisted alongside the hash.
pub fn create_refresh_token(
    user_id: i64,
    email: &str,
) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
    issue(
        TokenKind::Refresh,
        user_id,
        email,
        Duration::days(refresh_token_expiry_days()),
    )
}

fn validate(token: &str, expected: TokenKind) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &Validation::default(),
    )?;
    if data.claims.typ != expected {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }
    Ok(data.claims)
}

pub fn validate_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    validate(token, TokenKind::Access)
}

pub fn validate_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    validate(token, TokenKind::Refresh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_secret() {
        std::env::set_var("JWT_SECRET", "pulsato-unit-test-secret");
    }

    #[test]
    fn access_token_round_trips_identity() {
        set_secret();
        let token = create_access_token(7, "ana@pulsato.test").unwrap();
        let claims = validate_access_token(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "ana@pulsato.test");
        assert_eq!(claims.typ, TokenKind::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        set_secret();
        let (token, _) = issue(TokenKind::Access, 1, "old@pulsato.test", Duration::hours(-2)).unwrap();
        assert!(validate_access_token(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        set_secret();
        assert!(validate_access_token("not.a.jwt").is_err());
        assert!(validate_refresh_token("").is_err());
    }

    #[test]
    fn token_kinds_are_not_interchangeable() {
        set_secret();
        let access = create_access_token(1, "a@pulsato.test").unwrap();
        let (refresh, _) = create_refresh_token(1, "a@pulsato.test").unwrap();
        assert!(validate_access_token(&refresh).is_err());
        assert!(validate_refresh_token(&access).is_err());
    }

    #[test]
    fn refresh_outlives_access() {
        set_secret();
        let access = create_access_token(1, "a@pulsato.test").unwrap();
        let (refresh, expires_at) = create_refresh_token(1, "a@pulsato.test").unwrap();
        let access = validate_access_token(&access).unwrap();
        let refresh = validate_refresh_token(&refresh).unwrap();
        assert!(refresh.exp > access.exp);
        assert_eq!(refresh.exp, expires_at.timestamp());
    }

    #[test]
    fn hash_token_is_stable_hex() {
        let a = hash_token("header.payload.sig");
        assert_eq!(a, hash_token("header.payload.sig"));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, hash_token("header.payload.other"));
    }
}
