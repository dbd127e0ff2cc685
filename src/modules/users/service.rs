use anyhow::anyhow;
use campusmart_auth::TokenService;
use campusmart_core::{AppError, Page, PaginationParams, hash_password, verify_password};
use campusmart_db::{UserStore, Window};
use campusmart_models::{AuthResponse, ChangePasswordDto, UpdateProfileDto, User, UserFilterParams};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::modules::auth::service::AuthService;

pub struct UserService;

impl UserService {
    #[instrument(skip_all, fields(user_id = %user.id))]
    pub async fn update_profile(
        users: &dyn UserStore,
        user: &User,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        users.update_profile(user.id, dto).await
    }

    /// Changes the password and revokes every earlier token. A fresh pair is
    /// returned so the current client stays signed in.
    #[instrument(skip_all, fields(user_id = %user.id))]
    pub async fn change_password(
        users: &dyn UserStore,
        tokens: &TokenService,
        user: &User,
        dto: ChangePasswordDto,
    ) -> Result<AuthResponse, AppError> {
        let Some(current_hash) = user.password_hash.as_deref() else {
            return Err(AppError::bad_request(anyhow!(
                "This account signs in with Google and has no password"
            )));
        };

        if !verify_password(&dto.current_password, current_hash)? {
            warn!("Password change with wrong current password");
            return Err(AppError::bad_request(anyhow!("Current password is incorrect")));
        }

        let new_hash = hash_password(&dto.new_password)?;
        let updated = users.update_password(user.id, new_hash).await?;

        info!("Password changed, earlier tokens revoked");
        AuthService::sign_in(tokens, updated)
    }

    pub async fn list_users(
        users: &dyn UserStore,
        filter: &UserFilterParams,
        pagination: &PaginationParams,
    ) -> Result<Page<User>, AppError> {
        let (items, total) = users
            .find_active_page(filter, Window::from(pagination))
            .await?;
        Ok(Page::new(items, total, pagination))
    }

    /// Soft-deletes `user_id`. The account's tokens stop working at once.
    #[instrument(skip_all, fields(admin_id = %admin.id, user_id = %user_id))]
    pub async fn delete_user(
        users: &dyn UserStore,
        admin: &User,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        if admin.id == user_id {
            return Err(AppError::bad_request(anyhow!(
                "You cannot delete your own account"
            )));
        }

        users
            .find_by_id(user_id)
            .await?
            .filter(|user| !user.is_deleted)
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        users.mark_deleted(user_id).await?;
        info!("User soft-deleted");
        Ok(())
    }
}
