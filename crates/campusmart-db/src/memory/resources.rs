use async_trait::async_trait;
use campusmart_core::AppError;
use campusmart_models::{
    BorrowFilterParams, BorrowRequest, BorrowStatus, CreateBorrowRequestDto, CreateListingDto,
    CreateNightMarketPostDto, Listing, ListingFilterParams, ListingSort, ListingStatus,
    NightMarketFilter, NightMarketPost, Resource, UpdateBorrowRequestDto, UpdateListingDto,
    UpdateNightMarketPostDto, User,
};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::MemoryUserStore;
use crate::store::{ResourceStore, Window};

/// What the in-memory store needs to know about a record type beyond
/// [`Resource`].
pub trait MemoryRecord: Resource {
    fn build(id: Uuid, owner_id: Uuid, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    fn tombstone(&mut self, now: DateTime<Utc>);

    /// Filter predicate, without the soft-delete condition.
    fn matches(&self, filter: &Self::Filter, users: &HashMap<Uuid, User>) -> bool;

    fn order(a: &Self, b: &Self, _filter: &Self::Filter) -> Ordering {
        b.created_at().cmp(&a.created_at())
    }
}

pub struct MemoryResourceStore<R> {
    records: Arc<RwLock<Vec<R>>>,
    users: MemoryUserStore,
}

impl<R: MemoryRecord> MemoryResourceStore<R> {
    pub fn new(users: MemoryUserStore) -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            users,
        }
    }

    /// Every record ever written, soft-deleted ones included.
    pub async fn all(&self) -> Vec<R> {
        self.records.read().await.clone()
    }

    async fn matching(&self, filter: &R::Filter) -> Vec<R> {
        let users = self.users.snapshot().await;
        let records = self.records.read().await;

        let mut matching: Vec<(usize, &R)> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_deleted() && r.matches(filter, &users))
            .collect();
        // later inserts win ties so equal timestamps still read newest-first
        matching.sort_by(|(ia, a), (ib, b)| R::order(a, b, filter).then(ib.cmp(ia)));
        matching.into_iter().map(|(_, r)| r.clone()).collect()
    }
}

#[async_trait]
impl<R: MemoryRecord> ResourceStore<R> for MemoryResourceStore<R> {
    async fn insert(&self, owner_id: Uuid, draft: R::Draft) -> Result<R, AppError> {
        let record = R::build(Uuid::new_v4(), owner_id, draft, Utc::now());
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<R>, AppError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned())
    }

    async fn find_active(
        &self,
        filter: &R::Filter,
        window: Option<Window>,
    ) -> Result<Vec<R>, AppError> {
        let matching = self.matching(filter).await;
        Ok(match window {
            Some(w) => matching
                .into_iter()
                .skip(w.offset.max(0) as usize)
                .take(w.limit.max(0) as usize)
                .collect(),
            None => matching,
        })
    }

    async fn count_active(&self, filter: &R::Filter) -> Result<i64, AppError> {
        Ok(self.matching(filter).await.len() as i64)
    }

    async fn find_active_by_owner(&self, owner_id: Uuid) -> Result<Vec<R>, AppError> {
        let mut owned: Vec<R> = self
            .records
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| !r.is_deleted() && r.owner_id() == owner_id)
            .cloned()
            .collect();
        owned.sort_by_key(|r| std::cmp::Reverse(r.created_at()));
        Ok(owned)
    }

    async fn update(&self, id: Uuid, patch: R::Patch) -> Result<R, AppError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("{} not found", R::KIND)))?;
        record.apply(patch, Utc::now());
        Ok(record.clone())
    }

    async fn mark_deleted(&self, id: Uuid) -> Result<(), AppError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("{} not found", R::KIND)))?;
        record.tombstone(Utc::now());
        Ok(())
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl MemoryRecord for Listing {
    fn build(id: Uuid, owner_id: Uuid, draft: CreateListingDto, now: DateTime<Utc>) -> Self {
        Listing {
            id,
            seller_id: owner_id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            price: draft.price,
            condition: draft.condition,
            location: draft.location,
            whatsapp: draft.whatsapp,
            negotiable: draft.negotiable,
            image_urls: draft.image_urls,
            qr_url: None,
            status: ListingStatus::Available,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateListingDto, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(condition) = patch.condition {
            self.condition = condition;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(whatsapp) = patch.whatsapp {
            self.whatsapp = Some(whatsapp);
        }
        if let Some(negotiable) = patch.negotiable {
            self.negotiable = negotiable;
        }
        if let Some(image_urls) = patch.image_urls {
            self.image_urls = image_urls;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(qr_url) = patch.qr_url {
            self.qr_url = Some(qr_url);
        }
        self.updated_at = now;
    }

    fn tombstone(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.updated_at = now;
    }

    fn matches(&self, filter: &ListingFilterParams, users: &HashMap<Uuid, User>) -> bool {
        if let Some(query) = &filter.query {
            let query = query.to_lowercase();
            if !self.title.to_lowercase().contains(&query)
                && !self.description.to_lowercase().contains(&query)
            {
                return false;
            }
        }
        if filter
            .category
            .as_deref()
            .is_some_and(|category| !eq_ignore_case(&self.category, category))
        {
            return false;
        }
        if filter.min_price.is_some_and(|min| self.price < min) {
            return false;
        }
        if filter.max_price.is_some_and(|max| self.price > max) {
            return false;
        }
        if let Some(hostel) = &filter.hostel {
            let seller_hostel = users
                .get(&self.seller_id)
                .filter(|u| !u.is_deleted)
                .and_then(|u| u.hostel.as_deref());
            if !seller_hostel.is_some_and(|h| eq_ignore_case(h, hostel)) {
                return false;
            }
        }
        filter.status.is_none_or(|status| self.status == status)
    }

    fn order(a: &Self, b: &Self, filter: &ListingFilterParams) -> Ordering {
        let newest = b.created_at.cmp(&a.created_at);
        match filter.sort() {
            ListingSort::Newest => newest,
            ListingSort::PriceAsc => a.price.total_cmp(&b.price).then(newest),
            ListingSort::PriceDesc => b.price.total_cmp(&a.price).then(newest),
        }
    }
}

impl MemoryRecord for BorrowRequest {
    fn build(id: Uuid, owner_id: Uuid, draft: CreateBorrowRequestDto, now: DateTime<Utc>) -> Self {
        BorrowRequest {
            id,
            requester_id: owner_id,
            item_name: draft.item_name,
            reason: draft.reason,
            budget_range: draft.budget_range,
            needed_for: draft.needed_for,
            status: BorrowStatus::Open,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateBorrowRequestDto, now: DateTime<Utc>) {
        if let Some(item_name) = patch.item_name {
            self.item_name = item_name;
        }
        if let Some(reason) = patch.reason {
            self.reason = reason;
        }
        if let Some(budget_range) = patch.budget_range {
            self.budget_range = budget_range;
        }
        if let Some(needed_for) = patch.needed_for {
            self.needed_for = needed_for;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = now;
    }

    fn tombstone(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.updated_at = now;
    }

    fn matches(&self, filter: &BorrowFilterParams, _users: &HashMap<Uuid, User>) -> bool {
        filter.status.is_none_or(|status| self.status == status)
    }
}

impl MemoryRecord for NightMarketPost {
    fn build(
        id: Uuid,
        owner_id: Uuid,
        draft: CreateNightMarketPostDto,
        now: DateTime<Utc>,
    ) -> Self {
        NightMarketPost {
            id,
            seller_id: owner_id,
            item: draft.item,
            price: draft.price,
            quantity: draft.quantity,
            hostel: draft.hostel,
            is_available: true,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateNightMarketPostDto, now: DateTime<Utc>) {
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(is_available) = patch.is_available {
            self.is_available = is_available;
        }
        self.updated_at = now;
    }

    fn tombstone(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.updated_at = now;
    }

    fn matches(&self, filter: &NightMarketFilter, _users: &HashMap<Uuid, User>) -> bool {
        if filter.available_only && !self.is_available {
            return false;
        }
        filter
            .hostel
            .as_deref()
            .is_none_or(|hostel| eq_ignore_case(&self.hostel, hostel))
    }
}
