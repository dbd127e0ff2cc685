//! User records and profile DTOs.

use crate::value_types::Email;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Student,
    Admin,
}

/// A registered user.
///
/// `password_hash` is `None` for accounts created through Google sign-in.
/// Soft-deleted users stay in the table but every read path treats them as
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: Email,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub campus: Option<String>,
    pub hostel: Option<String>,
    pub role: UserRole,
    #[serde(skip)]
    pub password_hash: Option<String>,
    #[serde(skip)]
    pub google_id: Option<String>,
    /// Incremented to revoke every token issued before it.
    #[serde(skip)]
    pub token_version: i32,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("A student")
    }
}

/// Contact details of a record's owner, embedded in read responses so the
/// other side of a trade can reach them.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Email,
    pub phone_number: Option<String>,
    pub hostel: Option<String>,
}

impl From<&User> for OwnerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            hostel: user.hostel.clone(),
        }
    }
}

/// Insert payload for the user store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub campus: Option<String>,
    pub hostel: Option<String>,
    pub role: UserRole,
}

impl NewUser {
    pub fn student(email: Email, password_hash: Option<String>) -> Self {
        Self {
            email,
            password_hash,
            google_id: None,
            name: None,
            phone_number: None,
            campus: None,
            hostel: None,
            role: UserRole::Student,
        }
    }
}

/// Self-service profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 7, max = 20, message = "phoneNumber must be between 7 and 20 characters"))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, max = 100, message = "campus must be between 1 and 100 characters"))]
    pub campus: Option<String>,
    #[validate(length(min = 1, max = 100, message = "hostel must be between 1 and 100 characters"))]
    pub hostel: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "currentPassword is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "newPassword must be at least 6 characters"))]
    pub new_password: String,
}

/// Admin user listing filters.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilterParams {
    pub role: Option<UserRole>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: Email::new("a@campus.edu").unwrap(),
            name: Some("Ada".to_string()),
            phone_number: None,
            campus: None,
            hostel: Some("Hall 3".to_string()),
            role: UserRole::Student,
            password_hash: Some("$2b$12$hash".to_string()),
            google_id: None,
            token_version: 4,
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_serialization_hides_secrets() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("tokenVersion").is_none());
        assert_eq!(json["role"], "STUDENT");
        assert_eq!(json["hostel"], "Hall 3");
    }

    #[test]
    fn test_role_wire_format() {
        let role: UserRole = serde_json::from_str(r#""ADMIN""#).unwrap();
        assert_eq!(role, UserRole::Admin);
        assert!(serde_json::from_str::<UserRole>(r#""admin""#).is_err());
    }

    #[test]
    fn test_profile_update_validation() {
        let dto = UpdateProfileDto {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());

        let dto = UpdateProfileDto {
            hostel: Some("Hall 7".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
    }
}
