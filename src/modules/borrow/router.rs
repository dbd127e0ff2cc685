use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_borrow_request, delete_borrow_request, get_borrow_request, get_borrow_requests,
    respond_to_borrow_request, update_borrow_request,
};

pub fn init_borrow_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_borrow_requests).post(create_borrow_request))
        .route(
            "/{id}",
            get(get_borrow_request)
                .put(update_borrow_request)
                .delete(delete_borrow_request),
        )
        .route("/{id}/respond", post(respond_to_borrow_request))
}
