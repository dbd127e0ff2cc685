//! # Campusmart Models
//!
//! Domain records and DTOs for the Campusmart API.
//!
//! # Modules
//!
//! - [`auth`]: Registration, login and token refresh payloads
//! - [`users`]: User records, roles and profile updates
//! - [`listings`]: Marketplace listings
//! - [`borrow`]: Borrow requests
//! - [`night_market`]: Night market posts
//! - [`resource`]: The [`Resource`] trait shared by the three owned record types
//! - [`value_types`]: Validated value types such as [`Email`](value_types::Email)

pub mod auth;
pub mod borrow;
pub mod listings;
pub mod night_market;
pub mod resource;
pub mod users;
pub mod value_types;

// Re-export commonly used types at crate root for convenience
pub use auth::{
    AuthResponse, LoginRequest, MessageResponse, OAuthCallbackParams, RefreshTokenRequest,
    RegisterRequestDto, VerifiedIdentity,
};
pub use borrow::{
    BorrowFilterParams, BorrowRequest, BorrowRequestView, BorrowResponse, BorrowStatus, CreateBorrowRequestDto,
    RespondToBorrowRequestDto, UpdateBorrowRequestDto,
};
pub use listings::{
    CreateListingDto, Listing, ListingFilterParams, ListingView, ListingSort, ListingStatus, ShareMessage,
    UpdateListingDto,
};
pub use night_market::{
    CreateNightMarketPostDto, NightMarketFilter, NightMarketFilterParams, NightMarketPost,
    NightMarketPostView, UpdateNightMarketPostDto,
};
pub use resource::Resource;
pub use users::{
    ChangePasswordDto, NewUser, OwnerSummary, UpdateProfileDto, User, UserFilterParams, UserRole,
};
pub use value_types::Email;
