#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use campusmart::modules::auth::identity::IdentityProvider;
use campusmart::router::init_router;
use campusmart::state::AppState;
use campusmart_config::{JwtConfig, ServerConfig};
use campusmart_core::AppError;
use campusmart_core::password::hash_password_with_cost;
use campusmart_db::UserStore;
use campusmart_db::memory::MemoryDatabase;
use campusmart_models::{Email, NewUser, User, UserRole, VerifiedIdentity};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "testpass123";
pub const PUBLIC_BASE_URL: &str = "http://localhost:3000";
pub const FRONTEND_URL: &str = "http://localhost:5173";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "test-access-secret-0123456789abcdef".to_string(),
        refresh_secret: "test-refresh-secret-fedcba9876543210".to_string(),
        access_token_expiry: 900,
        refresh_token_expiry: 604800,
    }
}

pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 5000,
        public_base_url: PUBLIC_BASE_URL.to_string(),
        frontend_url: FRONTEND_URL.to_string(),
    }
}

/// A router over fresh in-memory stores.
pub struct TestApp {
    pub router: Router,
    pub db: MemoryDatabase,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let db = MemoryDatabase::new();
        let state = AppState::in_memory(&db, test_jwt_config(), test_server_config());
        Self::from_state(db, state)
    }

    pub fn with_identity_provider(provider: Arc<dyn IdentityProvider>) -> Self {
        let db = MemoryDatabase::new();
        let state = AppState::in_memory(&db, test_jwt_config(), test_server_config())
            .with_identity_provider(provider);
        Self::from_state(db, state)
    }

    fn from_state(db: MemoryDatabase, state: AppState) -> Self {
        Self {
            router: init_router(state.clone(), None),
            db,
            state,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("DELETE", uri, token, None).await
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.send(request).await;
        let status = response.status();
        (status, read_json(response).await)
    }

    /// Starts Google sign-in. Returns the `state` sent to the provider and the
    /// `Cookie` header value the browser would send back.
    pub async fn begin_google_sign_in(&self) -> (String, String) {
        let request = Request::builder()
            .uri("/api/auth/google")
            .body(Body::empty())
            .unwrap();
        let response = self.send(request).await;
        assert_eq!(response.status(), StatusCode::FOUND);

        let location = response.headers()[header::LOCATION].to_str().unwrap();
        let state = location.split("state=").nth(1).unwrap().to_string();
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        let cookie = set_cookie.split(';').next().unwrap().to_string();
        (state, cookie)
    }

    pub async fn google_callback(&self, query: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(format!("/api/auth/google/callback?{}", query));
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Registers a student and returns the `AuthResponse` body.
    pub async fn register(&self, email: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "email": email,
                    "password": TEST_PASSWORD,
                    "name": "Test Student",
                    "hostel": "Hall 3"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body
    }

    /// Registers a fresh student and returns `(user_id, access_token)`.
    pub async fn student(&self) -> (Uuid, String) {
        let body = self.register(&generate_unique_email()).await;
        (
            body["user"]["id"].as_str().unwrap().parse().unwrap(),
            body["accessToken"].as_str().unwrap().to_string(),
        )
    }

    /// Inserts an admin straight into the user store and signs them in.
    pub async fn admin(&self) -> (User, String) {
        let email = generate_unique_email();
        let hash = hash_password_with_cost(TEST_PASSWORD, 4).unwrap();
        let user = self
            .db
            .users
            .insert(NewUser {
                role: UserRole::Admin,
                name: Some("Admin".to_string()),
                ..NewUser::student(Email::new(&email).unwrap(), Some(hash))
            })
            .await
            .unwrap();

        let (status, body) = self
            .post(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": TEST_PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        (user, body["accessToken"].as_str().unwrap().to_string())
    }

    pub async fn create_listing(&self, token: &str, title: &str, price: f64) -> Value {
        let (status, body) = self
            .post("/api/listings", Some(token), listing_body(title, price))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create listing failed: {body}");
        body
    }
}

pub fn listing_body(title: &str, price: f64) -> Value {
    json!({
        "title": title,
        "description": "Gently used, pick up after lectures",
        "category": "Books",
        "price": price,
        "condition": "Good",
        "location": "Library entrance"
    })
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    }
}

pub fn generate_unique_email() -> String {
    format!("test_{}@campus.edu", Uuid::new_v4())
}

/// Identity provider that accepts one fixed code.
pub struct FakeIdentityProvider {
    pub code: String,
    pub identity: VerifiedIdentity,
}

impl FakeIdentityProvider {
    pub fn new(code: &str, email: &str, provider_id: &str) -> Self {
        Self {
            code: code.to_string(),
            identity: VerifiedIdentity {
                email: Email::new(email).unwrap(),
                name: Some("Google Student".to_string()),
                provider_id: provider_id.to_string(),
            },
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    fn authorize_url(&self, state: &str) -> Result<String, AppError> {
        Ok(format!("https://accounts.example.com/auth?state={}", state))
    }

    async fn verify(&self, code: &str) -> Result<VerifiedIdentity, AppError> {
        if code == self.code {
            Ok(self.identity.clone())
        } else {
            Err(AppError::unauthorized("Google sign-in failed".to_string()))
        }
    }
}
