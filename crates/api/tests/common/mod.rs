#![allow(dead_code)]

//! Shared helpers for API integration tests.
//!
//! Builds the full application router with the production middleware stack,
//! a filesystem-backed object store, and static entitlements, so tests
//! exercise exactly what production serves.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use noteguard_api::auth::jwt::{generate_access_token, JwtConfig};
use noteguard_api::config::{AccessConfig, ServerConfig};
use noteguard_api::entitlements::{EntitlementChecker, StaticEntitlements};
use noteguard_api::router::build_app_router;
use noteguard_api::state::AppState;
use noteguard_api::storage::ObjectStore;
use noteguard_core::signer::Signer;
use noteguard_core::types::DbId;

/// Secrets fixed for tests; production loads these from the environment.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_WATERMARK_SECRET: &str = "test-watermark-secret";

/// Build a test `ServerConfig` with safe defaults and the production
/// default access policy (TTL 30 min, cap 2, rate limit 60/120s).
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        access: AccessConfig {
            watermark_secret: TEST_WATERMARK_SECRET.to_string(),
            session_ttl_mins: 30,
            session_cap: 2,
            rate_limit_max: 60,
            rate_limit_window_secs: 120,
        },
        entitlement_service_url: None,
    }
}

/// A fresh, unique storage root under the system temp directory.
pub fn test_storage_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("noteguard-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&root).expect("create storage root");
    root
}

/// Write an object into a filesystem store root.
pub fn seed_object(root: &Path, object_key: &str, content: &[u8]) {
    let path = root.join(object_key);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create object parent dir");
    }
    std::fs::write(path, content).expect("write object");
}

/// Build the application router with default config, allow-all entitlements,
/// and a fresh storage root.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(
        pool,
        test_config(),
        Arc::new(StaticEntitlements::allow_all()),
        &test_storage_root(),
    )
}

/// Build the application router with explicit config, entitlements, and
/// storage root. Mirrors the state construction in `main.rs`.
pub fn build_test_app_with(
    pool: PgPool,
    config: ServerConfig,
    entitlements: Arc<dyn EntitlementChecker>,
    storage_root: &Path,
) -> Router {
    let signer = Signer::new(&config.access.watermark_secret);
    let store = ObjectStore::new_fs(&storage_root.to_string_lossy()).expect("build object store");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        signer,
        store,
        entitlements,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Mint an access token the way the identity service would.
pub fn auth_token(user_id: DbId, role: &str) -> String {
    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 15,
    };
    generate_access_token(user_id, role, &config).expect("token generation")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn insert_user(pool: &PgPool, display_name: &str, email: &str, role: &str) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO users (display_name, email, phone, role) \
         VALUES ($1, $2, '+15551234567', $3) \
         RETURNING id",
    )
    .bind(display_name)
    .bind(email)
    .bind(role)
    .fetch_one(pool)
    .await
    .expect("user fixture insert")
}

pub async fn insert_asset(pool: &PgPool, object_key: &str) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO file_assets (object_key, content_type) \
         VALUES ($1, 'application/pdf') \
         RETURNING id",
    )
    .bind(object_key)
    .fetch_one(pool)
    .await
    .expect("file asset fixture insert")
}

pub async fn insert_note(pool: &PgPool, is_premium: bool, file_asset_id: Option<DbId>) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO notes (subject_id, title, is_published, is_premium, file_asset_id) \
         VALUES (1, 'Test note', TRUE, $1, $2) \
         RETURNING id",
    )
    .bind(is_premium)
    .bind(file_asset_id)
    .fetch_one(pool)
    .await
    .expect("note fixture insert")
}

pub async fn insert_unpublished_note(pool: &PgPool) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO notes (subject_id, title, is_published, is_premium) \
         VALUES (1, 'Draft note', FALSE, FALSE) \
         RETURNING id",
    )
    .fetch_one(pool)
    .await
    .expect("note fixture insert")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, path: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(path)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// GET with a `Range` header, plus optional extra headers (e.g. a spoofed
/// `x-forwarded-for`).
pub async fn get_auth_with_headers(
    app: Router,
    path: &str,
    token: &str,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder()
        .uri(path)
        .header("authorization", format!("Bearer {token}"));
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

pub async fn post_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_auth_with_headers(
    app: Router,
    path: &str,
    token: &str,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("authorization", format!("Bearer {token}"));
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

pub async fn put_json_auth(app: Router, path: &str, token: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method("PUT")
        .uri(path)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(path)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
