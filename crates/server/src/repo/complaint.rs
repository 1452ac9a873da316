use shared_types::{AppError, Complaint, ComplaintStatus, SubmitComplaintRequest, UserProfile};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const COLUMNS: &str = "id, category, location, description, urgency, status, user_id, \
     student_name, student_id, student_email, submitted_at, resolved_at, resolved_by";

/// Insert a new pending complaint stamped with the submitter's details.
pub async fn create(
    pool: &Pool<Postgres>,
    submitter: &UserProfile,
    req: &SubmitComplaintRequest,
) -> Result<Complaint, AppError> {
    sqlx::query_as::<_, Complaint>(&format!(
        r#"
        INSERT INTO complaints
            (category, location, description, urgency, status,
             user_id, student_name, student_id, student_email)
        VALUES ($1, $2, $3, $4, 'pending', $5, $6, $7, $8)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&req.category)
    .bind(req.location.trim())
    .bind(req.description.trim())
    .bind(req.urgency.as_str())
    .bind(submitter.id)
    .bind(&submitter.name)
    .bind(&submitter.student_id)
    .bind(&submitter.email)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Complaint>, AppError> {
    sqlx::query_as::<_, Complaint>(&format!("SELECT {COLUMNS} FROM complaints WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Every complaint, newest first.
pub async fn list_all(pool: &Pool<Postgres>) -> Result<Vec<Complaint>, AppError> {
    sqlx::query_as::<_, Complaint>(&format!(
        "SELECT {COLUMNS} FROM complaints ORDER BY submitted_at DESC"
    ))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Every complaint in storage order. Callers sort.
pub async fn list_unordered(pool: &Pool<Postgres>) -> Result<Vec<Complaint>, AppError> {
    sqlx::query_as::<_, Complaint>(&format!("SELECT {COLUMNS} FROM complaints"))
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// One submitter's complaints, newest first.
pub async fn list_by_user(pool: &Pool<Postgres>, user_id: i64) -> Result<Vec<Complaint>, AppError> {
    sqlx::query_as::<_, Complaint>(&format!(
        "SELECT {COLUMNS} FROM complaints WHERE user_id = $1 ORDER BY submitted_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Move a pending complaint to resolved. The update only matches pending rows,
/// so a resolved complaint can never be written back.
pub async fn resolve(
    pool: &Pool<Postgres>,
    id: Uuid,
    resolver_id: i64,
) -> Result<Complaint, AppError> {
    let updated = sqlx::query_as::<_, Complaint>(&format!(
        r#"
        UPDATE complaints
        SET status = 'resolved', resolved_at = NOW(), resolved_by = $2
        WHERE id = $1 AND status = 'pending'
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(resolver_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    if let Some(row) = updated {
        return Ok(row);
    }

    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Complaint not found"))?;
    let current = ComplaintStatus::parse(&existing.status).unwrap_or_default();
    current.transition_to(ComplaintStatus::Resolved)?;
    // Only reachable if the row went back to pending between the two queries.
    Err(AppError::conflict("Complaint changed while resolving, please retry"))
}
