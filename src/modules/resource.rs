//! The ownership and soft-delete discipline shared by every owned record.
//!
//! [`ResourceService`] implements create, list, get, update and delete once
//! over any [`Resource`]. Listings, borrow requests and night market posts
//! are three instantiations of it; their modules only add what is specific
//! to them.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use campusmart_core::{AppError, Page, PaginationParams};
use campusmart_db::{ResourceStore, UserStore, Window};
use campusmart_models::{OwnerSummary, Resource, User};
use campusmart_observability::{
    track_ownership_denied, track_resource_created, track_resource_deleted,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::utils::auth_helpers::require_owner;

pub struct ResourceService<R: Resource> {
    store: Arc<dyn ResourceStore<R>>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(store: Arc<dyn ResourceStore<R>>) -> Self {
        Self { store }
    }

    /// Validates `draft` and stores it owned by `owner`, with default status
    /// and flags.
    #[instrument(skip_all, fields(kind = R::KIND, owner_id = %owner.id))]
    pub async fn create(&self, owner: &User, draft: R::Draft) -> Result<R, AppError> {
        draft.validate().map_err(AppError::validation)?;

        let record = self.store.insert(owner.id, draft).await?;

        info!(id = %record.id(), "Record created");
        track_resource_created(R::KIND);
        Ok(record)
    }

    /// One page of non-deleted records matching `filter`, with the total for
    /// the same predicate.
    #[instrument(skip_all, fields(kind = R::KIND, page = pagination.page(), limit = pagination.limit()))]
    pub async fn list(
        &self,
        filter: &R::Filter,
        pagination: &PaginationParams,
    ) -> Result<Page<R>, AppError> {
        let items = self
            .store
            .find_active(filter, Some(Window::from(pagination)))
            .await?;
        let total = self.store.count_active(filter).await?;

        Ok(Page::new(items, total, pagination))
    }

    /// Every non-deleted record matching `filter`, unpaginated.
    pub async fn list_all(&self, filter: &R::Filter) -> Result<Vec<R>, AppError> {
        self.store.find_active(filter, None).await
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<R>, AppError> {
        self.store.find_active_by_owner(owner_id).await
    }

    /// 404 when the record is missing or soft-deleted.
    pub async fn get_by_id(&self, id: Uuid) -> Result<R, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .filter(|record| !record.is_deleted())
            .ok_or_else(|| AppError::not_found(anyhow!("{} not found", R::KIND)))
    }

    /// Applies a partial update on behalf of `actor`.
    ///
    /// Order: fetch (soft-deleted counts as missing), ownership gate, payload
    /// validation, state rules of the current record, write.
    #[instrument(skip_all, fields(kind = R::KIND, id = %id, actor_id = %actor.id))]
    pub async fn update(&self, id: Uuid, actor: &User, patch: R::Patch) -> Result<R, AppError> {
        let current = self.owned(id, actor).await?;

        patch.validate().map_err(AppError::validation)?;
        current.check_patch(&patch)?;

        self.store.update(id, patch).await
    }

    /// Tombstones the record. The row stays for audit.
    #[instrument(skip_all, fields(kind = R::KIND, id = %id, actor_id = %actor.id))]
    pub async fn delete(&self, id: Uuid, actor: &User) -> Result<(), AppError> {
        self.owned(id, actor).await?;
        self.store.mark_deleted(id).await?;

        info!("Record soft-deleted");
        track_resource_deleted(R::KIND);
        Ok(())
    }

    /// Fetches a live record that `actor` owns.
    ///
    /// Missing, soft-deleted and foreign records all yield the same
    /// "not found or unauthorized" error.
    pub async fn owned(&self, id: Uuid, actor: &User) -> Result<R, AppError> {
        let record = self
            .store
            .find_by_id(id)
            .await?
            .filter(|record| !record.is_deleted())
            .ok_or_else(|| AppError::not_found_or_unauthorized(R::KIND))?;

        if require_owner(&record, actor).is_err() {
            warn!(kind = R::KIND, id = %id, actor_id = %actor.id, "Ownership check failed");
            track_ownership_denied(R::KIND);
            return Err(AppError::not_found_or_unauthorized(R::KIND));
        }

        Ok(record)
    }

    /// [`list`](Self::list) with each record's owner embedded.
    pub async fn list_with_owners(
        &self,
        users: &dyn UserStore,
        filter: &R::Filter,
        pagination: &PaginationParams,
    ) -> Result<Page<R::View>, AppError> {
        let mut page = self.list(filter, pagination).await?;
        let items = with_owners(users, std::mem::take(&mut page.items)).await?;
        Ok(page.with_items(items))
    }

    /// [`get_by_id`](Self::get_by_id) with the owner embedded.
    pub async fn get_with_owner(&self, users: &dyn UserStore, id: Uuid) -> Result<R::View, AppError> {
        let record = self.get_by_id(id).await?;
        let owner = users
            .find_active_by_ids(&[record.owner_id()])
            .await?
            .first()
            .map(OwnerSummary::from);
        Ok(record.with_owner(owner))
    }

    /// Writes a patch without an actor. Used for fields the server owns,
    /// such as a listing's QR code right after creation.
    pub(crate) async fn apply_system_patch(&self, id: Uuid, patch: R::Patch) -> Result<R, AppError> {
        self.store.update(id, patch).await
    }
}

/// Embeds each record's owner, looked up in one batch. Owners whose account
/// is deleted are left out.
pub async fn with_owners<R: Resource>(
    users: &dyn UserStore,
    records: Vec<R>,
) -> Result<Vec<R::View>, AppError> {
    let mut ids: Vec<Uuid> = records.iter().map(Resource::owner_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let owners: HashMap<Uuid, OwnerSummary> = users
        .find_active_by_ids(&ids)
        .await?
        .iter()
        .map(|user| (user.id, OwnerSummary::from(user)))
        .collect();

    Ok(records
        .into_iter()
        .map(|record| {
            let owner = owners.get(&record.owner_id()).cloned();
            record.with_owner(owner)
        })
        .collect())
}
