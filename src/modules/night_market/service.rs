use std::collections::BTreeMap;

use campusmart_core::AppError;
use campusmart_db::UserStore;
use campusmart_models::{
    NightMarketFilter, NightMarketFilterParams, NightMarketPost, NightMarketPostView,
};

use crate::modules::resource::{ResourceService, with_owners};

/// Posts keyed by hostel.
pub type PostsByHostel = BTreeMap<String, Vec<NightMarketPostView>>;

pub struct NightMarketService;

impl NightMarketService {
    /// Available, non-deleted posts grouped by hostel, newest first within
    /// each group, with each seller's contact details.
    pub async fn grouped_by_hostel(
        posts: &ResourceService<NightMarketPost>,
        users: &dyn UserStore,
        params: NightMarketFilterParams,
    ) -> Result<PostsByHostel, AppError> {
        let filter = NightMarketFilter::available(params);
        let items = posts.list_all(&filter).await?;
        Ok(group_by_hostel(with_owners(users, items).await?))
    }
}

/// Groups while keeping the incoming order inside each hostel.
fn group_by_hostel(posts: Vec<NightMarketPostView>) -> PostsByHostel {
    let mut grouped = PostsByHostel::new();
    for view in posts {
        grouped.entry(view.post.hostel.clone()).or_default().push(view);
    }
    grouped
}
