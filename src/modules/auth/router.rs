use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    google_auth, google_callback, login_user, logout_all, refresh_token, register_user,
};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/refresh", post(refresh_token))
        .route("/logout-all", post(logout_all))
        .route("/google", get(google_auth))
        .route("/google/callback", get(google_callback))
}
