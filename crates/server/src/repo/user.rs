use shared_types::{AppError, RegisterRequest, UserProfile};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

const PROFILE_COLUMNS: &str =
    "account_id AS id, name, student_id, email, department, is_admin, registered_at";

/// Stored credential for an authentication identity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

/// Create the account and its user record in one transaction.
pub async fn register(
    pool: &Pool<Postgres>,
    req: &RegisterRequest,
    password_hash: &str,
    is_admin: bool,
) -> Result<UserProfile, AppError> {
    let email = req.normalized_email();
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;

    let account_id = insert_account(&mut tx, &email, password_hash).await?;

    let profile = sqlx::query_as::<_, UserProfile>(&format!(
        r#"
        INSERT INTO users (account_id, name, student_id, email, department, is_admin)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(account_id)
    .bind(req.name.trim())
    .bind(req.student_id.trim())
    .bind(&email)
    .bind(req.department.trim())
    .bind(is_admin)
    .fetch_one(&mut *tx)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;
    Ok(profile)
}

/// Create a bare credential with no user record attached.
pub async fn create_account(
    pool: &Pool<Postgres>,
    email: &str,
    password_hash: &str,
) -> Result<i64, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;
    let id = insert_account(&mut tx, &email.trim().to_lowercase(), password_hash).await?;
    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;
    Ok(id)
}

async fn insert_account(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    email: &str,
    password_hash: &str,
) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO accounts (email, password_hash) VALUES ($1, $2) RETURNING id",
    )
    .bind(email)
    .bind(password_hash)
    .fetch_one(&mut **tx)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_account_by_email(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<Option<Account>, AppError> {
    sqlx::query_as::<_, Account>(
        "SELECT id, email, password_hash FROM accounts WHERE email = $1",
    )
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Look up the user record belonging to an authenticated identity.
pub async fn find_profile(
    pool: &Pool<Postgres>,
    account_id: i64,
) -> Result<Option<UserProfile>, AppError> {
    sqlx::query_as::<_, UserProfile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM users WHERE account_id = $1"
    ))
    .bind(account_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn count(pool: &Pool<Postgres>) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}
