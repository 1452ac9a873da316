use chrono::{DateTime, Utc};
use shared_types::AppError;
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

/// Persist the hash of a freshly issued refresh token.
pub async fn store_refresh_token(
    pool: &Pool<Postgres>,
    account_id: i64,
    session_id: &str,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (account_id, session_id, token_hash, expires_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(account_id)
    .bind(session_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(())
}

/// Revoke a live refresh token and return whether it was live.
pub async fn consume_refresh_token(
    pool: &Pool<Postgres>,
    account_id: i64,
    token_hash: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE refresh_tokens SET revoked = TRUE
        WHERE token_hash = $1 AND account_id = $2 AND revoked = FALSE AND expires_at > NOW()
        "#,
    )
    .bind(token_hash)
    .bind(account_id)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected() == 1)
}

/// Whether a refresh token is still usable, without consuming it.
pub async fn is_refresh_token_live(
    pool: &Pool<Postgres>,
    account_id: i64,
    token_hash: &str,
) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM refresh_tokens
            WHERE token_hash = $1 AND account_id = $2 AND revoked = FALSE AND expires_at > NOW()
        )
        "#,
    )
    .bind(token_hash)
    .bind(account_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Revoke every refresh token issued for one login session.
pub async fn revoke_session(pool: &Pool<Postgres>, session_id: &str) -> Result<u64, AppError> {
    let result = sqlx::query(
        "UPDATE refresh_tokens SET revoked = TRUE WHERE session_id = $1 AND revoked = FALSE",
    )
    .bind(session_id)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected())
}
