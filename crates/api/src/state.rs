use std::sync::Arc;

use noteguard_core::signer::Signer;

use crate::config::ServerConfig;
use crate::entitlements::EntitlementChecker;
use crate::storage::ObjectStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: noteguard_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// HMAC signer for token hashing and watermark signing.
    pub signer: Signer,
    /// Backing object store for note content.
    pub store: ObjectStore,
    /// Entitlement capability from the payments service.
    pub entitlements: Arc<dyn EntitlementChecker>,
}
