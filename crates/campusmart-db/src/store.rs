//! Store traits.
//!
//! Services hold these as `Arc<dyn ...>` so the HTTP layer runs unchanged
//! against Postgres or the in-memory stores.
//!
//! Lookups by id are raw: they return soft-deleted records too, which is what
//! audit and ownership checks need. Everything that lists records excludes
//! soft-deleted ones.

use async_trait::async_trait;
use campusmart_auth::UserLookup;
use campusmart_core::{AppError, PaginationParams};
use campusmart_models::{
    Email, NewUser, Resource, UpdateProfileDto, User, UserFilterParams,
};
use uuid::Uuid;

/// A slice of an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

impl From<&PaginationParams> for Window {
    fn from(params: &PaginationParams) -> Self {
        Self {
            offset: params.offset(),
            limit: params.limit(),
        }
    }
}

#[async_trait]
pub trait UserStore: UserLookup {
    /// Inserts a user. A taken email (deleted accounts included) is a
    /// conflict.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Non-deleted users among `ids`, in no particular order.
    async fn find_active_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AppError>;

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, AppError>;

    async fn link_google_id(&self, id: Uuid, google_id: &str) -> Result<User, AppError>;

    /// Writes only the supplied profile fields.
    async fn update_profile(&self, id: Uuid, changes: UpdateProfileDto) -> Result<User, AppError>;

    /// Replaces the password hash and bumps the token version.
    async fn update_password(&self, id: Uuid, password_hash: String) -> Result<User, AppError>;

    async fn bump_token_version(&self, id: Uuid) -> Result<User, AppError>;

    /// Soft-deletes the user and bumps the token version.
    async fn mark_deleted(&self, id: Uuid) -> Result<(), AppError>;

    /// Non-deleted users, newest first, plus the total for the same filter.
    async fn find_active_page(
        &self,
        filter: &UserFilterParams,
        window: Window,
    ) -> Result<(Vec<User>, i64), AppError>;
}

#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    async fn insert(&self, owner_id: Uuid, draft: R::Draft) -> Result<R, AppError>;

    /// Raw lookup, soft-deleted records included.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<R>, AppError>;

    /// Non-deleted records matching `filter` in the filter's order.
    /// `None` returns every match.
    async fn find_active(
        &self,
        filter: &R::Filter,
        window: Option<Window>,
    ) -> Result<Vec<R>, AppError>;

    /// Count for exactly the predicate used by [`find_active`](Self::find_active).
    async fn count_active(&self, filter: &R::Filter) -> Result<i64, AppError>;

    /// Non-deleted records created by `owner_id`, newest first.
    async fn find_active_by_owner(&self, owner_id: Uuid) -> Result<Vec<R>, AppError>;

    /// Writes only the supplied fields.
    async fn update(&self, id: Uuid, patch: R::Patch) -> Result<R, AppError>;

    /// Sets the tombstone flag. The row is never removed.
    async fn mark_deleted(&self, id: Uuid) -> Result<(), AppError>;
}
