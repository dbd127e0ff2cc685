mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{Value, json};

fn borrow_body(item: &str) -> Value {
    json!({
        "itemName": item,
        "reason": "Practical on Friday",
        "budgetRange": "500-1000",
        "neededFor": "2 days"
    })
}

async fn create_request(app: &TestApp, token: &str, item: &str) -> Value {
    let (status, body) = app.post("/api/borrow", Some(token), borrow_body(item)).await;
    assert_eq!(status, StatusCode::CREATED, "create borrow request failed: {body}");
    body
}

#[tokio::test]
async fn test_create_borrow_request() {
    let app = TestApp::new();
    let (requester_id, token) = app.student().await;

    let request = create_request(&app, &token, "Lab coat").await;

    assert_eq!(request["requesterId"], requester_id.to_string());
    assert_eq!(request["itemName"], "Lab coat");
    assert_eq!(request["status"], "OPEN");
}

#[tokio::test]
async fn test_borrow_endpoints_require_auth() {
    let app = TestApp::new();

    let (status, _) = app.get("/api/borrow", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.post("/api/borrow", None, borrow_body("Lab coat")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_borrow_request_validation() {
    let app = TestApp::new();
    let (_, token) = app.student().await;

    let mut body = borrow_body("Lab coat");
    body["reason"] = json!("");
    let (status, error) = app.post("/api/borrow", Some(&token), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "reason is required");
}

#[tokio::test]
async fn test_list_borrow_requests_with_status_filter() {
    let app = TestApp::new();
    let (_, token) = app.student().await;
    create_request(&app, &token, "Lab coat").await;
    let fulfilled = create_request(&app, &token, "Drawing board").await;
    app.put(
        &format!("/api/borrow/{}", fulfilled["id"].as_str().unwrap()),
        Some(&token),
        json!({ "status": "FULFILLED" }),
    )
    .await;

    let (status, page) = app.get("/api/borrow", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);

    let (_, page) = app.get("/api/borrow?status=OPEN", Some(&token)).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["itemName"], "Lab coat");

    let (_, page) = app.get("/api/borrow?status=FULFILLED&limit=1", Some(&token)).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["limit"], 1);
}

#[tokio::test]
async fn test_fulfilled_request_cannot_be_reopened() {
    let app = TestApp::new();
    let (_, token) = app.student().await;
    let request = create_request(&app, &token, "Lab coat").await;
    let uri = format!("/api/borrow/{}", request["id"].as_str().unwrap());

    let (status, _) = app.put(&uri, Some(&token), json!({ "status": "FULFILLED" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.put(&uri, Some(&token), json!({ "status": "OPEN" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "A fulfilled borrow request cannot be reopened");
}

#[tokio::test]
async fn test_non_owner_cannot_modify_borrow_request() {
    let app = TestApp::new();
    let (_, owner) = app.student().await;
    let (_, other) = app.student().await;
    let request = create_request(&app, &owner, "Lab coat").await;
    let uri = format!("/api/borrow/{}", request["id"].as_str().unwrap());

    let (status, body) = app.put(&uri, Some(&other), json!({ "reason": "mine now" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Borrow request not found or unauthorized");

    let (status, _) = app.delete(&uri, Some(&other)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            &format!("{}/respond", uri),
            Some(&other),
            json!({ "response": "accept" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, current) = app.get(&uri, Some(&other)).await;
    assert_eq!(current["reason"], "Practical on Friday");
    assert_eq!(current["status"], "OPEN");
}

#[tokio::test]
async fn test_respond_accept_fulfils_request() {
    let app = TestApp::new();
    let (_, token) = app.student().await;
    let request = create_request(&app, &token, "Lab coat").await;
    let uri = format!("/api/borrow/{}/respond", request["id"].as_str().unwrap());

    let (status, body) = app.post(&uri, Some(&token), json!({ "response": "accept" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Response recorded");
    assert_eq!(body["request"]["status"], "FULFILLED");

    let (status, body) = app.post(&uri, Some(&token), json!({ "response": "accept" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Borrow request is no longer open");
}

#[tokio::test]
async fn test_respond_decline_leaves_request_open() {
    let app = TestApp::new();
    let (_, token) = app.student().await;
    let request = create_request(&app, &token, "Lab coat").await;
    let uri = format!("/api/borrow/{}/respond", request["id"].as_str().unwrap());

    let (status, body) = app.post(&uri, Some(&token), json!({ "response": "decline" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"]["status"], "OPEN");

    let (status, _) = app.post(&uri, Some(&token), json!({ "response": "maybe" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_and_my_borrow_requests() {
    let app = TestApp::new();
    let (_, token) = app.student().await;
    let (_, other) = app.student().await;
    let kept = create_request(&app, &token, "Lab coat").await;
    let removed = create_request(&app, &token, "Drawing board").await;
    create_request(&app, &other, "Stethoscope").await;

    let uri = format!("/api/borrow/{}", removed["id"].as_str().unwrap());
    let (status, body) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Borrow request deleted successfully");

    let (status, _) = app.get(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, mine) = app.get("/api/user/borrow-requests", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["id"], kept["id"]);
}

#[tokio::test]
async fn test_borrow_reads_embed_requester() {
    let app = TestApp::new();
    let (requester_id, token) = app.student().await;
    let (_, other) = app.student().await;
    let request = create_request(&app, &token, "Lab coat").await;

    let (status, body) = app
        .get(&format!("/api/borrow/{}", request["id"].as_str().unwrap()), Some(&other))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemName"], "Lab coat");
    assert_eq!(body["requester"]["id"], requester_id.to_string());
    assert_eq!(body["requester"]["hostel"], "Hall 3");

    let (_, page) = app.get("/api/borrow", Some(&other)).await;
    assert_eq!(page["items"][0]["requester"]["name"], "Test Student");
}
