//! Borrow requests: a student asks to borrow an item for a while.

use crate::resource::Resource;
use crate::users::OwnerSummary;
use campusmart_core::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "borrow_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BorrowStatus {
    #[default]
    Open,
    Fulfilled,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub item_name: String,
    pub reason: String,
    pub budget_range: String,
    pub needed_for: String,
    pub status: BorrowStatus,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBorrowRequestDto {
    #[validate(length(min = 1, max = 200, message = "itemName must be between 1 and 200 characters"))]
    pub item_name: String,
    #[validate(length(min = 1, message = "reason is required"))]
    pub reason: String,
    #[validate(length(min = 1, message = "budgetRange is required"))]
    pub budget_range: String,
    #[validate(length(min = 1, message = "neededFor is required"))]
    pub needed_for: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBorrowRequestDto {
    #[validate(length(min = 1, max = 200, message = "itemName must be between 1 and 200 characters"))]
    pub item_name: Option<String>,
    #[validate(length(min = 1, message = "reason cannot be empty"))]
    pub reason: Option<String>,
    #[validate(length(min = 1, message = "budgetRange cannot be empty"))]
    pub budget_range: Option<String>,
    #[validate(length(min = 1, message = "neededFor cannot be empty"))]
    pub needed_for: Option<String>,
    pub status: Option<BorrowStatus>,
}

impl UpdateBorrowRequestDto {
    pub fn status(status: BorrowStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BorrowResponse {
    Accept,
    Decline,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RespondToBorrowRequestDto {
    pub response: BorrowResponse,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BorrowFilterParams {
    pub status: Option<BorrowStatus>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BorrowRequestView {
    #[serde(flatten)]
    pub request: BorrowRequest,
    pub requester: Option<OwnerSummary>,
}

impl Resource for BorrowRequest {
    const KIND: &'static str = "Borrow request";

    type Draft = CreateBorrowRequestDto;
    type Patch = UpdateBorrowRequestDto;
    type Filter = BorrowFilterParams;
    type View = BorrowRequestView;

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.requester_id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn with_owner(self, requester: Option<OwnerSummary>) -> BorrowRequestView {
        BorrowRequestView {
            request: self,
            requester,
        }
    }

    fn check_patch(&self, patch: &UpdateBorrowRequestDto) -> Result<(), AppError> {
        if self.status == BorrowStatus::Fulfilled && patch.status == Some(BorrowStatus::Open) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "A fulfilled borrow request cannot be reopened"
            )));
        }
        Ok(())
    }
}
