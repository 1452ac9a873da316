use dioxus::prelude::ServerFnError;
use shared_types::AppError;

/// Convert a sqlx::Error into an AppError.
pub fn sqlx_to_app_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::RowNotFound => AppError::not_found("Resource not found"),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation (error code 23505)
            if db_err.code().as_deref() == Some("23505") {
                let friendly = match db_err.constraint() {
                    Some(c) if c.contains("email") => "Email already registered!",
                    _ => "A record with this value already exists",
                };
                return AppError::conflict(friendly);
            }
            tracing::error!(error = %err, "database error");
            AppError::database("Database error")
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::PoolClosed => {
            tracing::error!(error = %err, "database unreachable");
            AppError::service_unavailable("Service is unavailable. Please try again.")
        }
        _ => {
            tracing::error!(error = %err, "database error");
            AppError::database("Database error")
        }
    }
}

/// Convert an AppError into a ServerFnError by serializing as JSON.
pub fn app_error_to_server_fn_error(err: AppError) -> ServerFnError {
    let json = serde_json::to_string(&err).unwrap_or_else(|_| err.message.clone());
    ServerFnError::new(json)
}

/// Extension trait providing `.into_app_error()` on sqlx::Error.
pub trait SqlxErrorExt {
    fn into_app_error(self) -> AppError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_app_error(self) -> AppError {
        sqlx_to_app_error(self)
    }
}

/// Extension trait providing `.into_server_fn_error()` on AppError.
pub trait AppErrorExt {
    fn into_server_fn_error(self) -> ServerFnError;
}

impl AppErrorExt for AppError {
    fn into_server_fn_error(self) -> ServerFnError {
        app_error_to_server_fn_error(self)
    }
}

/// Trait for validating request DTOs before processing.
pub trait ValidateRequest {
    fn validate_request(&self) -> Result<(), AppError>;
}

impl<T: validator::Validate> ValidateRequest for T {
    fn validate_request(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::from)
    }
}
