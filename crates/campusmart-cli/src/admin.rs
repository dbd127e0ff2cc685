//! Administrator account creation.

use campusmart_core::hash_password;
use campusmart_db::UserStore;
use campusmart_db::postgres::PgUserStore;
use campusmart_models::{Email, NewUser, User, UserRole};
use sqlx::PgPool;

/// Inserts an ADMIN account. An existing email is reported, never overwritten.
pub async fn create_admin(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, Box<dyn std::error::Error>> {
    let email = Email::new(email)?;
    if password.len() < 6 {
        return Err("Password must be at least 6 characters".into());
    }

    let users = PgUserStore::new(db.clone());
    if users.find_by_email(&email).await.map_err(|e| e.error)?.is_some() {
        return Err(format!("A user with email {} already exists", email).into());
    }

    let password_hash = hash_password(password).map_err(|e| e.error)?;
    let user = users
        .insert(NewUser {
            name: Some(name.to_string()),
            role: UserRole::Admin,
            ..NewUser::student(email, Some(password_hash))
        })
        .await
        .map_err(|e| e.error)?;

    Ok(user)
}
