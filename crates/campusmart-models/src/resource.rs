//! The contract shared by listings, borrow requests and night market posts.
//!
//! Each of these records belongs to the user who created it, is hidden by a
//! soft-delete flag rather than removed, and is mutated only through a
//! validated partial payload. [`Resource`] captures exactly that, so the
//! ownership and soft-delete rules can be written once over `R: Resource`.

use crate::users::OwnerSummary;
use campusmart_core::AppError;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

pub trait Resource: Clone + Send + Sync + 'static {
    /// Human-readable name used in error messages, e.g. `"Listing"`.
    const KIND: &'static str;

    /// Validated creation payload.
    type Draft: Validate + Send + Sync + 'static;
    /// Validated partial update. Absent fields are left untouched.
    type Patch: Validate + Send + Sync + 'static;
    /// List filters. Soft-deleted records are always excluded on top of these.
    type Filter: Default + Send + Sync + 'static;
    /// Read shape: the record with its owner's contact details.
    type View: Send + 'static;

    fn id(&self) -> Uuid;
    fn owner_id(&self) -> Uuid;
    fn is_deleted(&self) -> bool;
    fn created_at(&self) -> DateTime<Utc>;

    /// `owner` is `None` when the owner's account no longer exists.
    fn with_owner(self, owner: Option<OwnerSummary>) -> Self::View;

    /// Rejects patches that would break a state rule of the current record,
    /// such as reopening a terminal status.
    fn check_patch(&self, _patch: &Self::Patch) -> Result<(), AppError> {
        Ok(())
    }
}
