use anyhow::anyhow;
use campusmart_core::AppError;
use data_encoding::BASE64;
use qrcode::QrCode;
use qrcode::render::svg;
use uuid::Uuid;

/// Public link to a listing page on the frontend.
pub fn listing_url(public_base_url: &str, listing_id: Uuid) -> String {
    format!("{}/listings/{}", public_base_url.trim_end_matches('/'), listing_id)
}

/// Encodes `contents` as an SVG QR code wrapped in a base64 `data:` URL,
/// ready to drop into an `<img src>`.
pub fn qr_data_url(contents: &str) -> Result<String, AppError> {
    let code = QrCode::new(contents.as_bytes())
        .map_err(|e| AppError::internal(anyhow!("Failed to generate QR code: {}", e)))?;

    let image = code
        .render::<svg::Color>()
        .min_dimensions(200, 200)
        .quiet_zone(true)
        .build();

    Ok(format!(
        "data:image/svg+xml;base64,{}",
        BASE64.encode(image.as_bytes())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url() {
        let id = Uuid::nil();
        assert_eq!(
            listing_url("https://market.campus.test/", id),
            "https://market.campus.test/listings/00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_qr_data_url_is_base64_svg() {
        let url = qr_data_url("https://market.campus.test/listings/1").unwrap();
        let payload = url
            .strip_prefix("data:image/svg+xml;base64,")
            .expect("data url prefix");

        let svg = String::from_utf8(BASE64.decode(payload.as_bytes()).unwrap()).unwrap();
        assert!(svg.contains("<svg"));
    }
}
