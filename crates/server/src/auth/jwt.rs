use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Once;

/// Token type discriminator. A refresh token is never accepted as an access token.
const TOKEN_TYPE_ACCESS: &str = "access";
const TOKEN_TYPE_REFRESH: &str = "refresh";

const DEV_SECRET: &str = "complaint-desk-development-secret";

/// JWT claims stored in access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id of the authenticated identity.
    pub sub: i64,
    pub email: String,
    /// "admin" or "user", copied from the user record at login.
    pub role: String,
    /// Login session id. Survives token rotation; logout ends it.
    pub sid: String,
    pub exp: i64,
    pub iat: i64,
    /// Unique token identifier so two tokens minted in the same second differ.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Token type: "access" or "refresh".
    #[serde(default)]
    pub typ: String,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// SHA-256 of a raw JWT, hex encoded. Only this hash is persisted.
pub fn hash_token(raw_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn jwt_secret() -> String {
    static WARN: Once = Once::new();
    match std::env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            WARN.call_once(|| {
                tracing::warn!("JWT_SECRET not set, using the development secret");
            });
            DEV_SECRET.to_string()
        }
    }
}

pub fn access_token_expiry_minutes() -> i64 {
    std::env::var("JWT_ACCESS_TTL_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(15)
}

pub fn refresh_token_expiry_days() -> i64 {
    std::env::var("JWT_REFRESH_TTL_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(7)
}

/// Fresh session id for a new login.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn sign(claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_secret().as_bytes()),
    )
}

pub fn create_access_token(
    user_id: i64,
    email: &str,
    role: &str,
    sid: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    sign(&Claims {
        sub: user_id,
        email: email.to_string(),
        role: role.to_string(),
        sid: sid.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(access_token_expiry_minutes())).timestamp(),
        jti: Some(uuid::Uuid::new_v4().to_string()),
        typ: TOKEN_TYPE_ACCESS.to_string(),
    })
}

pub fn create_refresh_token(
    user_id: i64,
    email: &str,
    role: &str,
    sid: &str,
) -> Result<(String, chrono::DateTime<Utc>), jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires_at = now + Duration::days(refresh_token_expiry_days());
    let token = sign(&Claims {
        sub: user_id,
        email: email.to_string(),
        role: role.to_string(),
        sid: sid.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
        jti: Some(uuid::Uuid::new_v4().to_string()),
        typ: TOKEN_TYPE_REFRESH.to_string(),
    })?;
    Ok((token, expires_at))
}

fn decode_claims(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// Validate an access token. Refresh tokens are rejected.
pub fn validate_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let claims = decode_claims(token)?;
    if claims.typ != TOKEN_TYPE_ACCESS {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }
    Ok(claims)
}

/// Validate a refresh token. Access tokens are rejected.
pub fn validate_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let claims = decode_claims(token)?;
    if claims.typ != TOKEN_TYPE_REFRESH {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }
    Ok(claims)
}
