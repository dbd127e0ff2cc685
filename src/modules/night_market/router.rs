use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_post, delete_post, get_post, get_posts, update_post};

pub fn init_night_market_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_posts).post(create_post))
        .route("/{id}", get(get_post).put(update_post).delete(delete_post))
}
