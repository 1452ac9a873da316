//! Create an administrator account out of band.
//!
//! Reads `ADMIN_EMAIL`, `ADMIN_PASSWORD` and `ADMIN_NAME` (plus the optional
//! `ADMIN_STAFF_ID` and `ADMIN_DEPARTMENT`), hashes the password with argon2
//! and stores the account with the admin flag set.

use server::auth::password;
use server::{db, repo};
use shared_types::RegisterRequest;

fn required(name: &str) -> Result<String, String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("{name} must be set"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let admin_password = required("ADMIN_PASSWORD")?;
    let request = RegisterRequest {
        name: required("ADMIN_NAME")?,
        student_id: std::env::var("ADMIN_STAFF_ID").unwrap_or_else(|_| "ADMIN".to_string()),
        email: required("ADMIN_EMAIL")?,
        department: std::env::var("ADMIN_DEPARTMENT")
            .unwrap_or_else(|_| "Administration".to_string()),
        password: admin_password.clone(),
        confirm_password: admin_password,
    };
    request.precheck()?;

    let pool = db::create_pool();
    db::run_migrations(&pool).await;

    let hash = password::hash_password(&request.password)?;
    let profile = repo::user::register(&pool, &request, &hash, true).await?;
    println!("created administrator {} (account {})", profile.email, profile.id);
    Ok(())
}
