//! Watermark payload construction.
//!
//! The payload is rendered over note content by the client and lets a
//! forensic reviewer trace a leaked copy back to one view session. Identity
//! fields are masked before they leave the server; the `user_hash` is an
//! HMAC over `user_id:email`, stable per user without exposing either.

use serde::{Deserialize, Serialize};

use crate::signer::Signer;
use crate::types::DbId;

/// Identity fields of the viewing user, as read from the user record.
#[derive(Debug, Clone)]
pub struct WatermarkIdentity {
    pub display_name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// The watermark payload embedded in rendered content.
///
/// The signature in [`SignedWatermark`] covers the canonical JSON encoding
/// produced by [`canonical_json`]: keys sorted, no whitespace. Any JSON
/// library re-serializing the parsed payload with sorted keys reproduces the
/// signed bytes exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatermarkPayload {
    pub display_name: String,
    pub masked_email: String,
    pub masked_phone: Option<String>,
    pub user_hash: String,
    pub session_id: DbId,
    pub watermark_seed: String,
}

/// A payload plus its server signature, returned to the rendering client.
#[derive(Debug, Clone, Serialize)]
pub struct SignedWatermark {
    pub payload: WatermarkPayload,
    pub signature: String,
}

/// Build and sign the watermark payload for one session.
pub fn build_signed_watermark(
    signer: &Signer,
    user_id: DbId,
    identity: &WatermarkIdentity,
    session_id: DbId,
    watermark_seed: &str,
) -> SignedWatermark {
    let payload = WatermarkPayload {
        display_name: identity.display_name.clone(),
        masked_email: mask_email(&identity.email),
        masked_phone: identity.phone.as_deref().map(mask_phone),
        user_hash: signer.sign(format!("{user_id}:{}", identity.email).as_bytes()),
        session_id,
        watermark_seed: watermark_seed.to_string(),
    };

    let signature = signer.sign(canonical_json(&payload).as_bytes());

    SignedWatermark { payload, signature }
}

/// Canonical JSON encoding of the payload: keys sorted, no whitespace.
///
/// Round-tripping through `serde_json::Value` sorts object keys, so a
/// verifier working from the parsed payload produces identical bytes.
pub fn canonical_json(payload: &WatermarkPayload) -> String {
    let value = serde_json::to_value(payload).expect("watermark payload serializes to JSON");
    value.to_string()
}

/// Mask an email address: first character of the local part, `***`, then the
/// domain. An address without a domain masks entirely.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{first}***@{domain}")
        }
        None => "***".to_string(),
    }
}

/// Mask a phone number: every character except the last four becomes `*`.
pub fn mask_phone(phone: &str) -> String {
    let len = phone.chars().count();
    phone
        .chars()
        .enumerate()
        .map(|(i, c)| if i + 4 >= len { c } else { '*' })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> Signer {
        Signer::new("unit-test-secret")
    }

    fn identity() -> WatermarkIdentity {
        WatermarkIdentity {
            display_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: Some("+15551234567".to_string()),
        }
    }

    // -- Masking -----------------------------------------------------------

    #[test]
    fn email_is_masked_to_first_char_and_domain() {
        assert_eq!(mask_email("ada@example.com"), "a***@example.com");
    }

    #[test]
    fn single_char_local_part_masks_cleanly() {
        assert_eq!(mask_email("a@b.io"), "a***@b.io");
    }

    #[test]
    fn email_without_domain_masks_entirely() {
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn empty_local_part_keeps_domain() {
        assert_eq!(mask_email("@example.com"), "***@example.com");
    }

    #[test]
    fn phone_keeps_last_four_digits() {
        assert_eq!(mask_phone("+15551234567"), "********4567");
    }

    #[test]
    fn short_phone_is_left_as_is() {
        assert_eq!(mask_phone("4567"), "4567");
        assert_eq!(mask_phone("67"), "67");
    }

    // -- Payload -----------------------------------------------------------

    #[test]
    fn payload_never_contains_raw_email_or_phone() {
        let wm = build_signed_watermark(&signer(), 7, &identity(), 42, "seed");
        let json = serde_json::to_string(&wm).unwrap();
        assert!(!json.contains("ada@example.com"));
        assert!(!json.contains("+15551234567"));
    }

    #[test]
    fn signature_verifies_against_canonical_serialization() {
        let s = signer();
        let wm = build_signed_watermark(&s, 7, &identity(), 42, "seed");
        assert!(s.verify(canonical_json(&wm.payload).as_bytes(), &wm.signature));
    }

    #[test]
    fn signature_survives_a_parse_and_reserialize_round_trip() {
        let s = signer();
        let wm = build_signed_watermark(&s, 7, &identity(), 42, "seed");

        // What a verifying client does: parse the payload, re-serialize it
        // with sorted keys, check the signature.
        let parsed: serde_json::Value =
            serde_json::from_str(&canonical_json(&wm.payload)).unwrap();
        assert!(s.verify(parsed.to_string().as_bytes(), &wm.signature));
    }

    #[test]
    fn signature_breaks_when_payload_is_tampered() {
        let s = signer();
        let mut wm = build_signed_watermark(&s, 7, &identity(), 42, "seed");
        wm.payload.session_id = 43;
        assert!(!s.verify(canonical_json(&wm.payload).as_bytes(), &wm.signature));
    }

    #[test]
    fn user_hash_is_stable_per_user() {
        let s = signer();
        let a = build_signed_watermark(&s, 7, &identity(), 1, "x");
        let b = build_signed_watermark(&s, 7, &identity(), 2, "y");
        assert_eq!(a.payload.user_hash, b.payload.user_hash);

        let other = build_signed_watermark(&s, 8, &identity(), 1, "x");
        assert_ne!(a.payload.user_hash, other.payload.user_hash);
    }

    #[test]
    fn missing_phone_stays_absent() {
        let id = WatermarkIdentity {
            phone: None,
            ..identity()
        };
        let wm = build_signed_watermark(&signer(), 7, &id, 42, "seed");
        assert!(wm.payload.masked_phone.is_none());
    }
}
