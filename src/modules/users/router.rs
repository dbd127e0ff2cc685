use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{change_password, delete_user, get_profile, get_users, update_profile};

/// Self-service profile routes. Mounted under `/api/auth`.
pub fn init_profile_router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/profile/change-password", post(change_password))
}

/// User management. Mounted under `/api/auth` behind the admin gate.
pub fn init_admin_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_users))
        .route("/users/{user_id}", delete(delete_user))
}
