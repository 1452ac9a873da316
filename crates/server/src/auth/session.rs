//! Login, registration and logout, shared by server functions and REST handlers.

use shared_types::{AppError, AppErrorKind, LoginRequest, LoginSurface, RegisterRequest, UserProfile};
use sqlx::{Pool, Postgres};

use super::jwt::{self, Claims};
use super::password;
use crate::error_convert::ValidateRequest;
use crate::feed::FeedHub;
use crate::repo;

/// Tokens minted for a successful login.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub profile: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
    pub session_id: String,
}

/// Create a regular user. The new account is not signed in.
#[tracing::instrument(skip(pool, req), fields(email = %req.email))]
pub async fn register(pool: &Pool<Postgres>, req: &RegisterRequest) -> Result<UserProfile, AppError> {
    if !crate::config::feature_flags().registration {
        return Err(AppError::forbidden("Registration is closed"));
    }
    req.precheck()?;
    req.validate_request()?;

    let hash = password::hash_password(&req.password)?;
    let profile = repo::user::register(pool, req, &hash, false).await?;
    tracing::info!(user_id = profile.id, "registered user");
    Ok(profile)
}

/// Decide whether a record may sign in on `surface`.
pub fn admit_profile(
    profile: Option<UserProfile>,
    surface: LoginSurface,
) -> Result<UserProfile, AppError> {
    let profile = profile.ok_or_else(|| AppError::not_found(surface.missing_record_message()))?;
    surface.admit(&profile)?;
    Ok(profile)
}

/// Failures after the credential check end the session the request carried.
pub fn terminates_session(err: &AppError) -> bool {
    matches!(err.kind, AppErrorKind::NotFound | AppErrorKind::RoleMismatch)
}

/// Authenticate, check the user record against the login form, and issue tokens.
///
/// When the record is missing or belongs to the other form, any session in
/// `prior` is ended and no tokens are issued.
#[tracing::instrument(skip(pool, hub, req, prior), fields(email = %req.email, surface = ?req.surface))]
pub async fn login(
    pool: &Pool<Postgres>,
    hub: &FeedHub,
    req: &LoginRequest,
    prior: Option<&Claims>,
) -> Result<IssuedSession, AppError> {
    req.validate_request()?;

    let invalid = || AppError::unauthorized("Invalid email or password!");
    let Some(account) = repo::user::find_account_by_email(pool, &req.email).await? else {
        password::verify_against_placeholder(&req.password);
        tracing::warn!("login for unknown email");
        return Err(invalid());
    };
    if !password::verify_password(&req.password, &account.password_hash)? {
        tracing::warn!(account_id = account.id, "login with wrong password");
        return Err(invalid());
    }

    let record = repo::user::find_profile(pool, account.id).await?;
    match admit_profile(record, req.surface) {
        Ok(profile) => issue(pool, profile).await,
        Err(err) => {
            tracing::warn!(account_id = account.id, error = %err, "login refused");
            Err(refuse(pool, hub, err, prior).await)
        }
    }
}

/// End the caller's prior session and hand back the refusal unchanged.
/// A failed revoke is logged; the client still sees why it was refused.
async fn refuse(
    pool: &Pool<Postgres>,
    hub: &FeedHub,
    err: AppError,
    prior: Option<&Claims>,
) -> AppError {
    if let Some(claims) = prior {
        if let Err(revoke) = end_session(pool, hub, &claims.sid).await {
            tracing::error!(error = %revoke, "could not end session after refused login");
        }
    }
    err
}

/// Mint an access/refresh pair under a fresh session id and store the refresh hash.
pub async fn issue(pool: &Pool<Postgres>, profile: UserProfile) -> Result<IssuedSession, AppError> {
    let session_id = jwt::new_session_id();
    let role = profile.role();

    let access_token = jwt::create_access_token(profile.id, &profile.email, role, &session_id)
        .map_err(|e| AppError::internal(e.to_string()))?;
    let (refresh_token, expires_at) =
        jwt::create_refresh_token(profile.id, &profile.email, role, &session_id)
            .map_err(|e| AppError::internal(e.to_string()))?;

    repo::session::store_refresh_token(
        pool,
        profile.id,
        &session_id,
        &jwt::hash_token(&refresh_token),
        expires_at,
    )
    .await?;

    tracing::info!(user_id = profile.id, role, "session started");
    Ok(IssuedSession {
        profile,
        access_token,
        refresh_token,
        session_id,
    })
}

/// Revoke the session's refresh tokens and cancel its live feeds.
pub async fn end_session(pool: &Pool<Postgres>, hub: &FeedHub, session_id: &str) -> Result<(), AppError> {
    hub.cancel_session(session_id);
    let revoked = repo::session::revoke_session(pool, session_id).await?;
    tracing::info!(revoked, "session ended");
    Ok(())
}

/// Resolve the profile behind validated claims. `None` when the record is gone.
pub async fn current_profile(
    pool: &Pool<Postgres>,
    claims: &Claims,
) -> Result<Option<UserProfile>, AppError> {
    let profile = repo::user::find_profile(pool, claims.sub).await?;
    if profile.is_none() {
        tracing::warn!(user_id = claims.sub, "token references a missing user record");
    }
    Ok(profile)
}
