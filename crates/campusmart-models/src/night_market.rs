//! Night market posts: food and snacks sold from a hostel in the evening.

use crate::resource::Resource;
use crate::users::OwnerSummary;
use campusmart_core::serde::deserialize_optional_trimmed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NightMarketPost {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub item: String,
    pub price: f64,
    pub quantity: i32,
    pub hostel: String,
    pub is_available: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNightMarketPostDto {
    #[validate(length(min = 1, max = 200, message = "item must be between 1 and 200 characters"))]
    pub item: String,
    #[validate(range(exclusive_min = 0.0, message = "price must be positive"))]
    pub price: f64,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(length(min = 1, message = "hostel is required"))]
    pub hostel: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNightMarketPostDto {
    #[validate(range(exclusive_min = 0.0, message = "price must be positive"))]
    pub price: Option<f64>,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: Option<i32>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NightMarketFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub hostel: Option<String>,
}

/// Store-level filter for night market posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NightMarketFilter {
    pub hostel: Option<String>,
    /// Only posts still marked available
    pub available_only: bool,
}

impl NightMarketFilter {
    /// What buyers browse: available posts, optionally from one hostel.
    pub fn available(params: NightMarketFilterParams) -> Self {
        Self {
            hostel: params.hostel,
            available_only: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NightMarketPostView {
    #[serde(flatten)]
    pub post: NightMarketPost,
    pub seller: Option<OwnerSummary>,
}

impl Resource for NightMarketPost {
    const KIND: &'static str = "Night market post";

    type Draft = CreateNightMarketPostDto;
    type Patch = UpdateNightMarketPostDto;
    type Filter = NightMarketFilter;
    type View = NightMarketPostView;

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.seller_id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn with_owner(self, seller: Option<OwnerSummary>) -> NightMarketPostView {
        NightMarketPostView { post: self, seller }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_must_be_positive_integer() {
        let dto: CreateNightMarketPostDto = serde_json::from_str(
            r#"{"item":"Indomie","price":800,"quantity":0,"hostel":"Hall 1"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_err());

        assert!(
            serde_json::from_str::<CreateNightMarketPostDto>(
                r#"{"item":"Indomie","price":800,"quantity":1.5,"hostel":"Hall 1"}"#,
            )
            .is_err()
        );
    }

    #[test]
    fn test_partial_update_validates_supplied_fields() {
        let dto: UpdateNightMarketPostDto = serde_json::from_str(r#"{"price":-1}"#).unwrap();
        assert!(dto.validate().is_err());

        let dto: UpdateNightMarketPostDto =
            serde_json::from_str(r#"{"isAvailable":false}"#).unwrap();
        assert!(dto.validate().is_ok());
    }
}
