use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// A registered user record merged with its authentication identity.
///
/// `id` is the account id the credentials belong to; the role flag is fixed
/// at creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub student_id: String,
    pub email: String,
    pub department: String,
    pub is_admin: bool,
    pub registered_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn role(&self) -> &'static str {
        if self.is_admin {
            "admin"
        } else {
            "user"
        }
    }
}

/// Which login form the credentials were entered on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum LoginSurface {
    #[default]
    User,
    Admin,
}

impl LoginSurface {
    pub fn missing_record_message(&self) -> &'static str {
        match self {
            LoginSurface::User => "User data not found!",
            LoginSurface::Admin => "Admin data not found!",
        }
    }

    /// The role flag on the record has to agree with the form used.
    pub fn admit(&self, profile: &UserProfile) -> Result<(), AppError> {
        match (self, profile.is_admin) {
            (LoginSurface::Admin, false) => Err(AppError::role_mismatch("Not an admin account!")),
            (LoginSurface::User, true) => Err(AppError::role_mismatch("Please use admin login")),
            _ => Ok(()),
        }
    }
}

/// Registration form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct RegisterRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 120, message = "Name is required"))
    )]
    pub name: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 40, message = "Student ID is required"))
    )]
    pub student_id: String,
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Valid email is required"))
    )]
    pub email: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 120, message = "Department is required"))
    )]
    pub department: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 6, message = "Password should be at least 6 characters!"))
    )]
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    /// Checks that must fail before anything is sent to the server.
    pub fn precheck(&self) -> Result<(), AppError> {
        if self.password != self.confirm_password {
            return Err(AppError::field("confirm_password", "Passwords do not match!"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::field(
                "password",
                "Password should be at least 6 characters!",
            ));
        }
        Ok(())
    }

    /// Normalized email used for account lookups.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// Login request. `surface` defaults to the user form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct LoginRequest {
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Valid email is required"))
    )]
    pub email: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Password is required"))
    )]
    pub password: String,
    #[serde(default)]
    pub surface: LoginSurface,
}

/// Response returned after a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthResponse {
    pub user: UserProfile,
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppErrorKind;

    fn profile(is_admin: bool) -> UserProfile {
        UserProfile {
            id: 1,
            name: "Ravi".into(),
            student_id: "S-42".into(),
            email: "ravi@campus.edu".into(),
            department: "Physics".into(),
            is_admin,
            registered_at: Utc::now(),
        }
    }

    fn register(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ravi".into(),
            student_id: "S-42".into(),
            email: " Ravi@Campus.edu ".into(),
            department: "Physics".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn admin_surface_rejects_regular_user() {
        let err = LoginSurface::Admin.admit(&profile(false)).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::RoleMismatch);
        assert_eq!(err.message, "Not an admin account!");
    }

    #[test]
    fn user_surface_rejects_admin() {
        let err = LoginSurface::User.admit(&profile(true)).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::RoleMismatch);
        assert_eq!(err.message, "Please use admin login");
    }

    #[test]
    fn matching_surfaces_are_admitted() {
        assert!(LoginSurface::User.admit(&profile(false)).is_ok());
        assert!(LoginSurface::Admin.admit(&profile(true)).is_ok());
    }

    #[test]
    fn mismatched_confirmation_is_caught_first() {
        let err = register("abc", "abd").precheck().unwrap_err();
        assert_eq!(err.message, "Passwords do not match!");
        assert!(err.field_errors.contains_key("confirm_password"));
    }

    #[test]
    fn short_password_is_rejected() {
        let err = register("abc12", "abc12").precheck().unwrap_err();
        assert_eq!(err.message, "Password should be at least 6 characters!");
        assert!(register("abc123", "abc123").precheck().is_ok());
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(register("x", "x").normalized_email(), "ravi@campus.edu");
    }

    #[test]
    fn surface_defaults_to_user_when_omitted() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.edu","password":"secret1"}"#).unwrap();
        assert_eq!(req.surface, LoginSurface::User);
    }
}
