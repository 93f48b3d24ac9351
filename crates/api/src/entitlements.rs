//! Entitlement capability consumed from the payments service.
//!
//! Premium notes are gated on this check at session issuance. The subsystem
//! never computes entitlements itself; it asks and fails closed.

use async_trait::async_trait;
use noteguard_core::types::DbId;
use noteguard_db::models::note::Note;
use serde::Deserialize;

/// Capability check: may `user_id` access this (premium) note?
#[async_trait]
pub trait EntitlementChecker: Send + Sync {
    async fn can_access_note(&self, user_id: DbId, note: &Note) -> bool;
}

/// Production implementation backed by the payments service HTTP API.
///
/// Any transport or decoding failure denies access: a payments outage must
/// not open premium content.
pub struct PaymentsEntitlementClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct EntitlementResponse {
    allowed: bool,
}

impl PaymentsEntitlementClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl EntitlementChecker for PaymentsEntitlementClient {
    async fn can_access_note(&self, user_id: DbId, note: &Note) -> bool {
        let url = format!(
            "{}/internal/entitlements/check",
            self.base_url.trim_end_matches('/')
        );
        let body = serde_json::json!({
            "user_id": user_id,
            "note_id": note.id,
            "subject_id": note.subject_id,
        });

        let result = async {
            self.client
                .post(&url)
                .json(&body)
                .send()
                .await?
                .error_for_status()?
                .json::<EntitlementResponse>()
                .await
        }
        .await;

        match result {
            Ok(response) => response.allowed,
            Err(err) => {
                tracing::warn!(
                    user_id,
                    note_id = note.id,
                    error = %err,
                    "Entitlement check failed, denying premium access"
                );
                false
            }
        }
    }
}

/// Fixed-answer implementation for tests and for deployments without a
/// payments service (premium notes stay locked).
pub struct StaticEntitlements {
    allow: bool,
}

impl StaticEntitlements {
    pub fn allow_all() -> Self {
        Self { allow: true }
    }

    pub fn deny_all() -> Self {
        Self { allow: false }
    }
}

#[async_trait]
impl EntitlementChecker for StaticEntitlements {
    async fn can_access_note(&self, _user_id: DbId, _note: &Note) -> bool {
        self.allow
    }
}
