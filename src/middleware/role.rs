//! Role-based authorization middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::auth_helpers;

/// Layer function for admin-only routers.
///
/// Resolves the session, applies the role gate and leaves the resolved
/// [`AuthUser`] in the request extensions for the handler.
///
/// ```rust,ignore
/// let admin_routes = init_admin_users_router()
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let auth_user = match AuthUser::from_request_parts(&mut parts, &state).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    if let Err(err) = auth_helpers::require_admin(&auth_user.0) {
        return err.into_response();
    }

    next.run(Request::from_parts(parts, body)).await
}
