use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Categorization of application errors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum AppErrorKind {
    NotFound,
    BadRequest,
    ValidationError,
    Conflict,
    DatabaseError,
    Unauthorized,
    Forbidden,
    /// The user record's role flag disagrees with the login surface.
    RoleMismatch,
    ServiceUnavailable,
    InternalError,
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppErrorKind::NotFound => "NotFound",
            AppErrorKind::BadRequest => "BadRequest",
            AppErrorKind::ValidationError => "ValidationError",
            AppErrorKind::Conflict => "Conflict",
            AppErrorKind::DatabaseError => "DatabaseError",
            AppErrorKind::Unauthorized => "Unauthorized",
            AppErrorKind::Forbidden => "Forbidden",
            AppErrorKind::RoleMismatch => "RoleMismatch",
            AppErrorKind::ServiceUnavailable => "ServiceUnavailable",
            AppErrorKind::InternalError => "InternalError",
        };
        f.write_str(name)
    }
}

/// Coarse grouping the UI uses to decide how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected input; nothing reached storage.
    Validation,
    /// Bad credentials, duplicate account, missing session.
    Auth,
    /// Missing record or role mismatch; the partial session is dropped.
    Data,
    /// Network, database, or any failure the user cannot act on.
    BackendUnavailable,
}

/// Structured application error used across server and client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AppError {
    pub kind: AppErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_errors: HashMap<String, String>,
}

impl AppError {
    fn new(kind: AppErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::BadRequest, message)
    }

    pub fn validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        Self {
            kind: AppErrorKind::ValidationError,
            message: message.into(),
            field_errors,
        }
    }

    /// Validation failure pinned to a single form field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), message.clone());
        Self::validation(message, field_errors)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Conflict, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::DatabaseError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Forbidden, message)
    }

    pub fn role_mismatch(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::RoleMismatch, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::ServiceUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::InternalError, message)
    }

    pub fn category(&self) -> ErrorCategory {
        match self.kind {
            AppErrorKind::ValidationError | AppErrorKind::BadRequest => ErrorCategory::Validation,
            AppErrorKind::Unauthorized | AppErrorKind::Conflict => ErrorCategory::Auth,
            AppErrorKind::NotFound | AppErrorKind::RoleMismatch | AppErrorKind::Forbidden => {
                ErrorCategory::Data
            }
            AppErrorKind::DatabaseError
            | AppErrorKind::ServiceUnavailable
            | AppErrorKind::InternalError => ErrorCategory::BackendUnavailable,
        }
    }

    /// Parse an AppError from a ServerFnError message string (client-side).
    ///
    /// `ServerFnError::to_string()` wraps the payload like:
    ///   `error running server function: {"kind":"Unauthorized",...} (details: None)`
    /// This method extracts the embedded JSON and parses it.
    pub fn from_server_error(error_message: &str) -> Option<Self> {
        if let Ok(err) = serde_json::from_str::<Self>(error_message) {
            return Some(err);
        }
        let start = error_message.find('{')?;
        let end = error_message.rfind('}')?;
        if end > start {
            serde_json::from_str(&error_message[start..=end]).ok()
        } else {
            None
        }
    }

    /// Like [`AppError::from_server_error`], but anything unparseable is
    /// treated as the backend being unreachable.
    pub fn from_server_error_or_unavailable(error_message: &str) -> Self {
        Self::from_server_error(error_message).unwrap_or_else(|| {
            Self::service_unavailable("Service is unavailable. Please try again.")
        })
    }

    /// Extract per-field validation errors from a `ServerFnError.to_string()`.
    pub fn parse_field_errors(error_string: &str) -> HashMap<String, String> {
        Self::from_server_error(error_string)
            .map(|e| e.field_errors)
            .unwrap_or_default()
    }

    /// Extract a user-friendly error message from a `ServerFnError.to_string()`.
    ///
    /// Falls back to a generic message if parsing fails.
    pub fn friendly_message(error_string: &str) -> String {
        if let Some(app_error) = Self::from_server_error(error_string) {
            app_error.message
        } else {
            "Something went wrong. Please try again.".to_string()
        }
    }

    #[cfg_attr(not(feature = "server"), allow(dead_code))]
    fn status_code_u16(&self) -> u16 {
        match self.kind {
            AppErrorKind::NotFound => 404,
            AppErrorKind::BadRequest => 400,
            AppErrorKind::ValidationError => 422,
            AppErrorKind::Conflict => 409,
            AppErrorKind::DatabaseError => 500,
            AppErrorKind::Unauthorized => 401,
            AppErrorKind::Forbidden => 403,
            AppErrorKind::RoleMismatch => 403,
            AppErrorKind::ServiceUnavailable => 503,
            AppErrorKind::InternalError => 500,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(feature = "validation")]
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors = HashMap::new();
        for (field, errs) in errors.field_errors() {
            if let Some(first) = errs.first() {
                let msg = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                field_errors.insert(field.to_string(), msg);
            }
        }
        // Surface the first field message so toasts have something concrete.
        let message = field_errors
            .values()
            .next()
            .cloned()
            .unwrap_or_else(|| "Validation failed".to_string());
        AppError::validation(message, field_errors)
    }
}

#[cfg(feature = "server")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code_u16())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self)).into_response()
    }
}
