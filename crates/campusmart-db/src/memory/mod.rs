//! In-process stores with the same semantics as the Postgres ones.
//!
//! Integration tests drive the full router against these, so they honour the
//! same contracts: email uniqueness across deleted users, soft deletes,
//! filter predicates shared by list and count, newest-first ordering.

mod resources;
mod users;

pub use resources::{MemoryRecord, MemoryResourceStore};
pub use users::MemoryUserStore;

use campusmart_models::{BorrowRequest, Listing, NightMarketPost};
use std::sync::Arc;

/// One set of stores sharing a user table.
#[derive(Clone)]
pub struct MemoryDatabase {
    pub users: Arc<MemoryUserStore>,
    pub listings: Arc<MemoryResourceStore<Listing>>,
    pub borrow_requests: Arc<MemoryResourceStore<BorrowRequest>>,
    pub night_market: Arc<MemoryResourceStore<NightMarketPost>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        let users = MemoryUserStore::default();
        Self {
            listings: Arc::new(MemoryResourceStore::new(users.clone())),
            borrow_requests: Arc::new(MemoryResourceStore::new(users.clone())),
            night_market: Arc::new(MemoryResourceStore::new(users.clone())),
            users: Arc::new(users),
        }
    }
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}
