use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_listing, delete_listing, generate_share_message, get_listing, get_listings,
    update_listing,
};

pub fn init_listings_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_listings).post(create_listing))
        .route(
            "/{id}",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
}

pub fn init_share_router() -> Router<AppState> {
    Router::new().route("/generate-message/{id}", get(generate_share_message))
}
