//! Authorization policy.
//!
//! Two independent checks that handlers and services compose: a role gate
//! and an ownership gate. Both are pure functions over already-resolved
//! records.

use campusmart_core::AppError;
use campusmart_models::{Resource, User};

/// Fails with 403 unless `user` is an administrator.
pub fn require_admin(user: &User) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Access denied. Administrator privileges required.".to_string(),
        ))
    }
}

/// Fails with 403 unless `user` created `resource`.
///
/// Resource services replace this error with
/// [`AppError::not_found_or_unauthorized`] so non-owners cannot test for
/// existence.
pub fn require_owner<R: Resource>(resource: &R, user: &User) -> Result<(), AppError> {
    if resource.owner_id() == user.id {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Access denied. You do not own this {}.",
            R::KIND.to_lowercase()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use campusmart_models::{BorrowRequest, BorrowStatus, Email, UserRole};
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: Email::new_unchecked("someone@campus.test"),
            name: Some("Someone".to_string()),
            phone_number: None,
            campus: None,
            hostel: None,
            role,
            password_hash: None,
            google_id: None,
            token_version: 0,
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request_owned_by(owner: &User) -> BorrowRequest {
        BorrowRequest {
            id: Uuid::new_v4(),
            requester_id: owner.id,
            item_name: "Drafting board".to_string(),
            reason: "Engineering drawing class".to_string(),
            budget_range: "0-200".to_string(),
            needed_for: "One week".to_string(),
            status: BorrowStatus::Open,
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_passes_role_gate() {
        assert!(require_admin(&user(UserRole::Admin)).is_ok());
    }

    #[test]
    fn test_student_fails_role_gate() {
        let err = require_admin(&user(UserRole::Student)).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_owner_passes_ownership_gate() {
        let owner = user(UserRole::Student);
        assert!(require_owner(&request_owned_by(&owner), &owner).is_ok());
    }

    #[test]
    fn test_admin_is_not_an_owner() {
        let owner = user(UserRole::Student);
        let admin = user(UserRole::Admin);
        let err = require_owner(&request_owned_by(&owner), &admin).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert!(err.client_message().contains("borrow request"));
    }
}
