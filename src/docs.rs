use campusmart_auth::TokenPair;
use campusmart_models::{
    AuthResponse, BorrowFilterParams, BorrowRequest, BorrowRequestView, BorrowResponse,
    BorrowStatus, ChangePasswordDto, CreateBorrowRequestDto, CreateListingDto,
    CreateNightMarketPostDto, Listing, ListingFilterParams, ListingSort, ListingStatus,
    ListingView, LoginRequest, MessageResponse, NightMarketFilterParams, NightMarketPost,
    NightMarketPostView, OwnerSummary, RefreshTokenRequest, RegisterRequestDto,
    RespondToBorrowRequestDto, ShareMessage, UpdateBorrowRequestDto, UpdateListingDto,
    UpdateNightMarketPostDto, UpdateProfileDto, User, UserFilterParams, UserRole,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::borrow::controller::RespondResponse;
use crate::modules::health::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::health_check,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::logout_all,
        crate::modules::auth::controller::google_auth,
        crate::modules::auth::controller::google_callback,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::update_profile,
        crate::modules::users::controller::change_password,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::delete_user,
        crate::modules::listings::controller::create_listing,
        crate::modules::listings::controller::get_listings,
        crate::modules::listings::controller::get_listing,
        crate::modules::listings::controller::update_listing,
        crate::modules::listings::controller::delete_listing,
        crate::modules::listings::controller::get_my_listings,
        crate::modules::listings::controller::generate_share_message,
        crate::modules::borrow::controller::create_borrow_request,
        crate::modules::borrow::controller::get_borrow_requests,
        crate::modules::borrow::controller::get_borrow_request,
        crate::modules::borrow::controller::update_borrow_request,
        crate::modules::borrow::controller::delete_borrow_request,
        crate::modules::borrow::controller::respond_to_borrow_request,
        crate::modules::borrow::controller::get_my_borrow_requests,
        crate::modules::night_market::controller::create_post,
        crate::modules::night_market::controller::get_posts,
        crate::modules::night_market::controller::get_post,
        crate::modules::night_market::controller::update_post,
        crate::modules::night_market::controller::delete_post,
        crate::modules::night_market::controller::get_my_posts,
    ),
    components(
        schemas(
            User,
            UserRole,
            RegisterRequestDto,
            LoginRequest,
            RefreshTokenRequest,
            AuthResponse,
            TokenPair,
            MessageResponse,
            UpdateProfileDto,
            ChangePasswordDto,
            UserFilterParams,
            OwnerSummary,
            Listing,
            ListingView,
            ListingStatus,
            ListingSort,
            CreateListingDto,
            UpdateListingDto,
            ListingFilterParams,
            ShareMessage,
            BorrowRequest,
            BorrowRequestView,
            BorrowStatus,
            BorrowResponse,
            CreateBorrowRequestDto,
            UpdateBorrowRequestDto,
            RespondToBorrowRequestDto,
            BorrowFilterParams,
            RespondResponse,
            NightMarketPost,
            NightMarketPostView,
            CreateNightMarketPostDto,
            UpdateNightMarketPostDto,
            NightMarketFilterParams,
            HealthResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, token refresh and Google sign-in"),
        (name = "Users", description = "Profile and user management"),
        (name = "Listings", description = "Marketplace listings"),
        (name = "Borrow Requests", description = "Requests to borrow items"),
        (name = "Night Market", description = "Late-night sales grouped by hostel"),
        (name = "Health", description = "Service health")
    ),
    info(
        title = "Campusmart API",
        version = "0.1.0",
        description = "Campus marketplace API built with Rust, Axum, and PostgreSQL, secured with access and refresh JWTs.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
