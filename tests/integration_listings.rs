mod common;

use axum::http::StatusCode;
use common::{PUBLIC_BASE_URL, TestApp, listing_body};
use serde_json::{Value, json};

fn titles(page: &Value) -> Vec<&str> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_create_listing_attaches_qr_code() {
    let app = TestApp::new();
    let (seller_id, token) = app.student().await;

    let listing = app.create_listing(&token, "Calculus textbook", 500.0).await;

    assert_eq!(listing["sellerId"], seller_id.to_string());
    assert_eq!(listing["status"], "AVAILABLE");
    assert_eq!(listing["negotiable"], false);
    assert_eq!(listing["imageUrls"], json!([]));
    assert_eq!(listing["isDeleted"], false);
    assert!(
        listing["qrUrl"]
            .as_str()
            .unwrap()
            .starts_with("data:image/svg+xml;base64,")
    );
}

#[tokio::test]
async fn test_create_listing_requires_auth_and_valid_payload() {
    let app = TestApp::new();
    let (_, token) = app.student().await;

    let (status, _) = app
        .post("/api/listings", None, listing_body("Desk lamp", 200.0))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .post("/api/listings", Some(&token), listing_body("Desk lamp", 0.0))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "price must be positive");

    let mut payload = listing_body("Desk lamp", 200.0);
    payload["imageUrls"] = json!(["ftp://example.com/a.png"]);
    let (status, _) = app.post("/api/listings", Some(&token), payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_listing_is_public() {
    let app = TestApp::new();
    let (_, token) = app.student().await;
    let listing = app.create_listing(&token, "Scientific calculator", 1500.0).await;

    let (status, body) = app
        .get(&format!("/api/listings/{}", listing["id"].as_str().unwrap()), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Scientific calculator");
    assert_eq!(body["qrUrl"], listing["qrUrl"]);
}

#[tokio::test]
async fn test_get_unknown_listing_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app
        .get(&format!("/api/listings/{}", uuid::Uuid::new_v4()), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Listing not found");
}

#[tokio::test]
async fn test_owner_can_update_listing() {
    let app = TestApp::new();
    let (_, token) = app.student().await;
    let listing = app.create_listing(&token, "Mini fridge", 8000.0).await;
    let uri = format!("/api/listings/{}", listing["id"].as_str().unwrap());

    let (status, body) = app
        .put(&uri, Some(&token), json!({ "price": 7000, "negotiable": true }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 7000.0);
    assert_eq!(body["negotiable"], true);
    assert_eq!(body["title"], "Mini fridge");
    assert_eq!(body["qrUrl"], listing["qrUrl"]);
}

#[tokio::test]
async fn test_non_owner_update_is_rejected_and_listing_unchanged() {
    let app = TestApp::new();
    let (_, owner) = app.student().await;
    let (_, intruder) = app.student().await;
    let listing = app.create_listing(&owner, "Calculus textbook", 500.0).await;
    let uri = format!("/api/listings/{}", listing["id"].as_str().unwrap());

    let (status, body) = app.put(&uri, Some(&intruder), json!({ "price": 1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Listing not found or unauthorized");

    let (status, body) = app.delete(&uri, Some(&intruder)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Listing not found or unauthorized");

    let (_, current) = app.get(&uri, None).await;
    assert_eq!(current["price"], 500.0);
    assert_eq!(current["isDeleted"], false);
}

#[tokio::test]
async fn test_admin_is_not_an_owner() {
    let app = TestApp::new();
    let (_, owner) = app.student().await;
    let (_, admin) = app.admin().await;
    let listing = app.create_listing(&owner, "Bicycle", 12000.0).await;
    let uri = format!("/api/listings/{}", listing["id"].as_str().unwrap());

    let (status, _) = app.delete(&uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_listing_update_matches_non_owner_error() {
    let app = TestApp::new();
    let (_, token) = app.student().await;

    let (status, body) = app
        .put(
            &format!("/api/listings/{}", uuid::Uuid::new_v4()),
            Some(&token),
            json!({ "price": 10 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Listing not found or unauthorized");
}

#[tokio::test]
async fn test_soft_delete_hides_but_retains_listing() {
    let app = TestApp::new();
    let (_, token) = app.student().await;
    let listing = app.create_listing(&token, "Old phone", 3000.0).await;
    let id = listing["id"].as_str().unwrap();
    let uri = format!("/api/listings/{}", id);

    let (status, body) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Listing deleted successfully");

    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, page) = app.get("/api/listings", None).await;
    assert_eq!(page["total"], 0);

    let (status, _) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let stored = app.db.listings.all().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id.to_string(), id);
    assert!(stored[0].is_deleted);
}

#[tokio::test]
async fn test_sold_listing_cannot_become_available() {
    let app = TestApp::new();
    let (_, token) = app.student().await;
    let listing = app.create_listing(&token, "Rice cooker", 4500.0).await;
    let uri = format!("/api/listings/{}", listing["id"].as_str().unwrap());

    let (status, body) = app.put(&uri, Some(&token), json!({ "status": "SOLD" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SOLD");

    let (status, body) = app
        .put(&uri, Some(&token), json!({ "status": "AVAILABLE" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "A sold listing cannot be made available again");
}

#[tokio::test]
async fn test_pagination_reports_total_across_pages() {
    let app = TestApp::new();
    let (_, token) = app.student().await;
    for i in 0..12 {
        app.create_listing(&token, &format!("Item {}", i), 100.0 + i as f64)
            .await;
    }

    let (status, first) = app.get("/api/listings?page=1&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["items"].as_array().unwrap().len(), 10);
    assert_eq!(first["total"], 12);
    assert_eq!(first["totalPages"], 2);
    assert_eq!(first["hasMore"], true);

    let (_, second) = app.get("/api/listings?page=2&limit=10", None).await;
    assert_eq!(second["items"].as_array().unwrap().len(), 2);
    assert_eq!(second["total"], 12);
    assert_eq!(second["page"], 2);
    assert_eq!(second["hasMore"], false);

    let (_, defaults) = app.get("/api/listings", None).await;
    assert_eq!(defaults["limit"], 10);
    assert_eq!(defaults["page"], 1);
    // Newest first
    assert_eq!(titles(&defaults)[0], "Item 11");
}

#[tokio::test]
async fn test_listing_filters_and_sorting() {
    let app = TestApp::new();
    let (_, token) = app.student().await;
    app.create_listing(&token, "Physics TEXTBOOK", 700.0).await;
    app.create_listing(&token, "Table fan", 2500.0).await;
    app.create_listing(&token, "Chemistry textbook", 300.0).await;

    let (_, page) = app.get("/api/listings?query=textbook", None).await;
    assert_eq!(page["total"], 2);

    let (_, page) = app
        .get("/api/listings?minPrice=500&maxPrice=3000&sortBy=price_asc", None)
        .await;
    assert_eq!(titles(&page), vec!["Physics TEXTBOOK", "Table fan"]);

    let (_, page) = app.get("/api/listings?sortBy=price_desc", None).await;
    assert_eq!(
        titles(&page),
        vec!["Table fan", "Physics TEXTBOOK", "Chemistry textbook"]
    );

    let (_, page) = app.get("/api/listings?hostel=Hall%203", None).await;
    assert_eq!(page["total"], 3);
    let (_, page) = app.get("/api/listings?hostel=Hall%209", None).await;
    assert_eq!(page["total"], 0);

    let (_, page) = app.get("/api/listings?category=Furniture", None).await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_invalid_query_parameters_are_rejected() {
    let app = TestApp::new();

    let (status, _) = app.get("/api/listings?sortBy=cheapest", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_my_listings_only_returns_callers_active_listings() {
    let app = TestApp::new();
    let (_, me) = app.student().await;
    let (_, other) = app.student().await;
    app.create_listing(&me, "Mine 1", 100.0).await;
    let deleted = app.create_listing(&me, "Mine 2", 200.0).await;
    app.create_listing(&other, "Theirs", 300.0).await;
    app.delete(
        &format!("/api/listings/{}", deleted["id"].as_str().unwrap()),
        Some(&me),
    )
    .await;

    let (status, body) = app.get("/api/user/listings", Some(&me)).await;

    assert_eq!(status, StatusCode::OK);
    let listings = body.as_array().unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["title"], "Mine 1");

    let (status, _) = app.get("/api/user/listings", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_share_message_includes_listing_and_seller() {
    let app = TestApp::new();
    let (_, token) = app.student().await;
    let listing = app.create_listing(&token, "Calculus textbook", 500.0).await;
    let id = listing["id"].as_str().unwrap();

    let (status, body) = app
        .get(&format!("/api/share/generate-message/{}", id), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let url = format!("{}/listings/{}", PUBLIC_BASE_URL, id);
    assert_eq!(body["url"], url);
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("*Calculus textbook*"));
    assert!(message.contains("Price: ₹500"));
    assert!(message.contains("Seller: Test Student (Hall 3)"));
    assert!(message.ends_with(&format!("View full details: {}", url)));

    let (status, _) = app
        .get(
            &format!("/api/share/generate-message/{}", uuid::Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_reads_embed_seller_contact() {
    let app = TestApp::new();
    let (seller_id, token) = app.student().await;
    app.put(
        "/api/auth/profile",
        Some(&token),
        json!({ "phoneNumber": "08031234567" }),
    )
    .await;
    let listing = app.create_listing(&token, "Calculus textbook", 500.0).await;
    assert!(listing.get("seller").is_none());

    let (status, body) = app
        .get(&format!("/api/listings/{}", listing["id"].as_str().unwrap()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Calculus textbook");
    assert_eq!(body["seller"]["id"], seller_id.to_string());
    assert_eq!(body["seller"]["name"], "Test Student");
    assert_eq!(body["seller"]["hostel"], "Hall 3");
    assert_eq!(body["seller"]["phoneNumber"], "08031234567");
    assert!(body["seller"]["email"].as_str().unwrap().ends_with("@campus.edu"));

    let (_, page) = app.get("/api/listings", None).await;
    assert_eq!(page["items"][0]["seller"]["name"], "Test Student");
}

#[tokio::test]
async fn test_deleted_seller_is_absent_from_listing_reads() {
    let app = TestApp::new();
    let (_, admin) = app.admin().await;
    let (seller_id, token) = app.student().await;
    let listing = app.create_listing(&token, "Calculus textbook", 500.0).await;
    let id = listing["id"].as_str().unwrap();

    let (status, _) = app
        .delete(&format!("/api/auth/users/{}", seller_id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&format!("/api/listings/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["seller"].is_null());

    let (_, page) = app.get("/api/listings?hostel=Hall%203", None).await;
    assert_eq!(page["total"], 0);

    let (status, body) = app
        .get(&format!("/api/share/generate-message/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let message = body["message"].as_str().unwrap();
    assert!(!message.contains("Seller:"));
    assert!(!message.contains("Test Student"));
}
