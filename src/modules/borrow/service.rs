use anyhow::anyhow;
use campusmart_core::AppError;
use campusmart_models::{
    BorrowRequest, BorrowResponse, BorrowStatus, UpdateBorrowRequestDto, User,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::resource::ResourceService;

pub struct BorrowService;

impl BorrowService {
    /// Records the requester's answer to an offer. Accepting closes the
    /// request; declining leaves it open.
    #[instrument(skip_all, fields(request_id = %id, actor_id = %actor.id, response = ?response))]
    pub async fn respond(
        requests: &ResourceService<BorrowRequest>,
        id: Uuid,
        actor: &User,
        response: BorrowResponse,
    ) -> Result<BorrowRequest, AppError> {
        let current = requests.owned(id, actor).await?;

        if current.status != BorrowStatus::Open {
            return Err(AppError::bad_request(anyhow!(
                "Borrow request is no longer open"
            )));
        }

        match response {
            BorrowResponse::Accept => {
                let updated = requests
                    .update(id, actor, UpdateBorrowRequestDto::status(BorrowStatus::Fulfilled))
                    .await?;
                info!("Borrow request fulfilled");
                Ok(updated)
            }
            BorrowResponse::Decline => Ok(current),
        }
    }
}
