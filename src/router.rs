use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Router, middleware};
use campusmart_observability::{PrometheusHandle, logging_middleware, metrics_middleware, metrics_routes};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::middleware::role::require_admin;
use crate::modules::auth::router::init_auth_router;
use crate::modules::borrow::controller::get_my_borrow_requests;
use crate::modules::borrow::router::init_borrow_router;
use crate::modules::health::health_check;
use crate::modules::listings::controller::get_my_listings;
use crate::modules::listings::router::{init_listings_router, init_share_router};
use crate::modules::night_market::controller::get_my_posts;
use crate::modules::night_market::router::init_night_market_router;
use crate::modules::users::router::{init_admin_users_router, init_profile_router};
use crate::state::AppState;

pub fn init_router(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
    let auth_routes = init_auth_router()
        .merge(init_profile_router())
        .merge(
            init_admin_users_router()
                .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        );

    let my_routes = Router::new()
        .route("/listings", get(get_my_listings))
        .route("/borrow-requests", get(get_my_borrow_requests))
        .route("/night-market", get(get_my_posts));

    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health_check))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", auth_routes)
                .nest("/listings", init_listings_router())
                .nest("/borrow", init_borrow_router())
                .nest("/night-market", init_night_market_router())
                .nest("/share", init_share_router())
                .nest("/user", my_routes),
        );

    if let Some(handle) = metrics {
        router = router.merge(metrics_routes(handle));
    }

    router
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
