use std::fmt::Write;

use campusmart_config::ServerConfig;
use campusmart_core::AppError;
use campusmart_db::UserStore;
use campusmart_models::{CreateListingDto, Listing, ShareMessage, UpdateListingDto, User};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::modules::resource::ResourceService;
use crate::utils::qr::{listing_url, qr_data_url};

pub struct ListingService;

impl ListingService {
    /// Creates the listing, then attaches a QR code pointing at its public
    /// page.
    ///
    /// The listing is kept even if the QR step fails; it is returned without
    /// a code rather than reported as a failed create.
    #[instrument(skip_all, fields(seller_id = %seller.id))]
    pub async fn create_listing(
        listings: &ResourceService<Listing>,
        server_config: &ServerConfig,
        seller: &User,
        dto: CreateListingDto,
    ) -> Result<Listing, AppError> {
        let listing = listings.create(seller, dto).await?;

        let url = listing_url(&server_config.public_base_url, listing.id);
        let qr = match qr_data_url(&url) {
            Ok(qr) => qr,
            Err(err) => {
                warn!(listing_id = %listing.id, error = %err.error, "QR generation failed");
                return Ok(listing);
            }
        };

        listings
            .apply_system_patch(listing.id, UpdateListingDto::attach_qr(qr))
            .await
    }

    /// Builds a chat-ready description of a live listing.
    #[instrument(skip_all, fields(listing_id = %id))]
    pub async fn share_message(
        listings: &ResourceService<Listing>,
        users: &dyn UserStore,
        server_config: &ServerConfig,
        id: Uuid,
    ) -> Result<ShareMessage, AppError> {
        let listing = listings.get_by_id(id).await?;
        let seller = users
            .find_by_id(listing.seller_id)
            .await?
            .filter(|seller| !seller.is_deleted);
        let url = listing_url(&server_config.public_base_url, listing.id);

        Ok(ShareMessage {
            message: compose_share_message(&listing, seller.as_ref(), &url),
            url,
        })
    }
}

fn compose_share_message(listing: &Listing, seller: Option<&User>, url: &str) -> String {
    let mut message = format!("*{}*\n\n", listing.title);
    // Writing to a String cannot fail
    let _ = writeln!(message, "Price: ₹{}", listing.price);
    let _ = writeln!(message, "Condition: {}", listing.condition);
    let _ = writeln!(message, "Location: {}", listing.location);

    if !listing.description.is_empty() {
        let _ = write!(message, "\n{}\n", listing.description);
    }

    if let Some(seller) = seller {
        let _ = write!(message, "\nSeller: {}", seller.display_name());
        if let Some(hostel) = &seller.hostel {
            let _ = write!(message, " ({})", hostel);
        }
        message.push('\n');
    }

    let _ = write!(message, "\nView full details: {}", url);
    message
}
