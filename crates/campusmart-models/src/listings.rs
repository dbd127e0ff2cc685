//! Marketplace listings.

use crate::resource::Resource;
use crate::users::OwnerSummary;
use campusmart_core::AppError;
use campusmart_core::serde::{deserialize_optional_f64, deserialize_optional_trimmed};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "listing_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    #[default]
    Available,
    Sold,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub condition: String,
    pub location: String,
    pub whatsapp: Option<String>,
    pub negotiable: bool,
    pub image_urls: Vec<String>,
    /// Shareable QR code as a `data:` URL, attached right after creation
    pub qr_url: Option<String>,
    pub status: ListingStatus,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_image_urls(urls: &[String]) -> Result<(), ValidationError> {
    if urls.len() > 10 {
        return Err(ValidationError::new("image_urls")
            .with_message("imageUrls accepts at most 10 images".into()));
    }
    if urls
        .iter()
        .any(|u| !(u.starts_with("http://") || u.starts_with("https://")))
    {
        return Err(ValidationError::new("image_urls")
            .with_message("imageUrls must be absolute http(s) URLs".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingDto {
    #[validate(length(min = 1, max = 200, message = "title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[validate(range(exclusive_min = 0.0, message = "price must be positive"))]
    pub price: f64,
    #[validate(length(min = 1, message = "condition is required"))]
    pub condition: String,
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub negotiable: bool,
    #[serde(default)]
    #[validate(custom(function = "validate_image_urls"))]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingDto {
    #[validate(length(min = 1, max = 200, message = "title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "description cannot be empty"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "category cannot be empty"))]
    pub category: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "price must be positive"))]
    pub price: Option<f64>,
    #[validate(length(min = 1, message = "condition cannot be empty"))]
    pub condition: Option<String>,
    #[validate(length(min = 1, message = "location cannot be empty"))]
    pub location: Option<String>,
    pub whatsapp: Option<String>,
    pub negotiable: Option<bool>,
    #[validate(custom(function = "validate_image_urls"))]
    pub image_urls: Option<Vec<String>>,
    pub status: Option<ListingStatus>,
    /// Set by the server after creation, never by clients.
    #[serde(skip_deserializing)]
    pub qr_url: Option<String>,
}

impl UpdateListingDto {
    pub fn attach_qr(qr_url: String) -> Self {
        Self {
            qr_url: Some(qr_url),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ListingSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListingFilterParams {
    /// Case-insensitive match against title or description
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub query: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_f64")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_f64")]
    pub max_price: Option<f64>,
    /// Seller's hostel
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub hostel: Option<String>,
    pub status: Option<ListingStatus>,
    pub sort_by: Option<ListingSort>,
}

impl ListingFilterParams {
    pub fn sort(&self) -> ListingSort {
        self.sort_by.unwrap_or_default()
    }
}

/// Ready-to-paste text for sharing a listing in a chat.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShareMessage {
    pub message: String,
    pub url: String,
}

/// A listing as buyers see it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingView {
    #[serde(flatten)]
    pub listing: Listing,
    pub seller: Option<OwnerSummary>,
}

impl Resource for Listing {
    const KIND: &'static str = "Listing";

    type Draft = CreateListingDto;
    type Patch = UpdateListingDto;
    type Filter = ListingFilterParams;
    type View = ListingView;

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

    fn with_owner(self, seller: Option<OwnerSummary>) -> ListingView {
        ListingView {
            listing: self,
            seller,
        }
    }

    fn check_patch(&self, patch: &UpdateListingDto) -> Result<(), AppError> {
        if self.status == ListingStatus::Sold && patch.status == Some(ListingStatus::Available) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "A sold listing cannot be made available again"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CreateListingDto {
        serde_json::from_value(serde_json::json!({
            "title": "Calculus textbook",
            "description": "Barely used",
            "category": "Books",
            "price": 500.0,
            "condition": "Good",
            "location": "Hall 2"
        }))
        .unwrap()
    }

    #[test]
    fn test_create_defaults() {
        let dto = draft();
        assert!(!dto.negotiable);
        assert!(dto.image_urls.is_empty());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_price_must_be_positive() {
        let mut dto = draft();
        dto.price = 0.0;
        assert!(dto.validate().is_err());
        dto.price = -5.0;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_image_urls_must_be_http() {
        let mut dto = draft();
        dto.image_urls = vec!["file:///etc/passwd".to_string()];
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_cannot_set_qr() {
        let dto: UpdateListingDto =
            serde_json::from_str(r#"{"qrUrl":"data:evil","price":450}"#).unwrap();
        assert!(dto.qr_url.is_none());
        assert_eq!(dto.price, Some(450.0));
    }

    #[test]
    fn test_sort_parsing() {
        let params: ListingFilterParams =
            serde_json::from_str(r#"{"sortBy":"price_desc","minPrice":"10"}"#).unwrap();
        assert_eq!(params.sort(), ListingSort::PriceDesc);
        assert_eq!(params.min_price, Some(10.0));
        assert_eq!(ListingFilterParams::default().sort(), ListingSort::Newest);
    }
}
