use async_trait::async_trait;
use campusmart_auth::UserLookup;
use campusmart_core::AppError;
use campusmart_models::{Email, NewUser, UpdateProfileDto, User, UserFilterParams};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{UserStore, Window};

#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    /// Snapshot of every user, deleted ones included.
    pub async fn snapshot(&self) -> HashMap<Uuid, User> {
        self.users.read().await.clone()
    }

    async fn modify(&self, id: Uuid, f: impl FnOnce(&mut User)) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User with id {} not found", id)))?;
        f(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl UserLookup for MemoryUserStore {
    async fn active_token_version(&self, user_id: Uuid) -> Result<Option<i32>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .get(&user_id)
            .filter(|u| !u.is_deleted)
            .map(|u| u.token_version))
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::conflict("User already exists".to_string()));
        }
        let google_taken = user
            .google_id
            .as_ref()
            .is_some_and(|g| users.values().any(|u| u.google_id.as_ref() == Some(g)));
        if google_taken {
            return Err(AppError::conflict("User already exists".to_string()));
        }

        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            phone_number: user.phone_number,
            campus: user.campus,
            hostel: user.hostel,
            role: user.role,
            password_hash: user.password_hash,
            google_id: user.google_id,
            token_version: 0,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_active_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        let users = self.users.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id))
            .filter(|u| !u.is_deleted)
            .cloned()
            .collect())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn link_google_id(&self, id: Uuid, google_id: &str) -> Result<User, AppError> {
        let google_id = google_id.to_string();
        self.modify(id, |u| u.google_id = Some(google_id)).await
    }

    async fn update_profile(&self, id: Uuid, changes: UpdateProfileDto) -> Result<User, AppError> {
        if self.find_by_id(id).await?.is_none_or(|u| u.is_deleted) {
            return Err(AppError::not_found(anyhow::anyhow!(
                "User with id {} not found",
                id
            )));
        }
        self.modify(id, |u| {
            if let Some(name) = changes.name {
                u.name = Some(name);
            }
            if let Some(phone_number) = changes.phone_number {
                u.phone_number = Some(phone_number);
            }
            if let Some(campus) = changes.campus {
                u.campus = Some(campus);
            }
            if let Some(hostel) = changes.hostel {
                u.hostel = Some(hostel);
            }
        })
        .await
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> Result<User, AppError> {
        self.modify(id, |u| {
            u.password_hash = Some(password_hash);
            u.token_version += 1;
        })
        .await
    }

    async fn bump_token_version(&self, id: Uuid) -> Result<User, AppError> {
        self.modify(id, |u| u.token_version += 1).await
    }

    async fn mark_deleted(&self, id: Uuid) -> Result<(), AppError> {
        self.modify(id, |u| {
            u.is_deleted = true;
            u.token_version += 1;
        })
        .await
        .map(|_| ())
    }

    async fn find_active_page(
        &self,
        filter: &UserFilterParams,
        window: Window,
    ) -> Result<(Vec<User>, i64), AppError> {
        let mut matching: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| !u.is_deleted)
            .filter(|u| filter.role.is_none_or(|role| u.role == role))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(window.offset.max(0) as usize)
            .take(window.limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusmart_models::UserRole;

    fn new_user(email: &str) -> NewUser {
        NewUser::student(Email::new(email).unwrap(), Some("hash".to_string()))
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryUserStore::default();
        store.insert(new_user("u1@x.com")).await.unwrap();

        let err = store.insert(new_user("U1@X.com")).await.unwrap_err();
        assert_eq!(err.status.as_u16(), 409);
    }

    #[tokio::test]
    async fn test_deleted_email_still_conflicts() {
        let store = MemoryUserStore::default();
        let user = store.insert(new_user("u1@x.com")).await.unwrap();
        store.mark_deleted(user.id).await.unwrap();

        assert!(store.insert(new_user("u1@x.com")).await.is_err());
    }

    #[tokio::test]
    async fn test_deleted_user_has_no_token_version() {
        let store = MemoryUserStore::default();
        let user = store.insert(new_user("u1@x.com")).await.unwrap();
        assert_eq!(store.active_token_version(user.id).await.unwrap(), Some(0));

        store.mark_deleted(user.id).await.unwrap();
        assert_eq!(store.active_token_version(user.id).await.unwrap(), None);
        // the row itself survives
        assert!(store.find_by_id(user.id).await.unwrap().unwrap().is_deleted);
    }

    #[tokio::test]
    async fn test_find_active_by_ids_skips_deleted() {
        let store = MemoryUserStore::default();
        let kept = store.insert(new_user("a@x.com")).await.unwrap();
        let gone = store.insert(new_user("b@x.com")).await.unwrap();
        store.mark_deleted(gone.id).await.unwrap();

        let found = store
            .find_active_by_ids(&[kept.id, gone.id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, kept.id);
    }

    #[tokio::test]
    async fn test_active_page_excludes_deleted_and_filters_role() {
        let store = MemoryUserStore::default();
        let a = store.insert(new_user("a@x.com")).await.unwrap();
        store.insert(new_user("b@x.com")).await.unwrap();
        let mut admin = new_user("admin@x.com");
        admin.role = UserRole::Admin;
        store.insert(admin).await.unwrap();
        store.mark_deleted(a.id).await.unwrap();

        let window = Window { offset: 0, limit: 10 };
        let (users, total) = store
            .find_active_page(&UserFilterParams::default(), window)
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(users.len(), 2);

        let filter = UserFilterParams {
            role: Some(UserRole::Admin),
        };
        let (_, total) = store.find_active_page(&filter, window).await.unwrap();
        assert_eq!(total, 1);
    }
}
