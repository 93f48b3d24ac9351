//! View-token generation and HMAC signing.
//!
//! The signer underlies three contracts: view tokens are hashed with it
//! before storage (the plaintext token is returned to the client exactly
//! once and never persisted), watermark payloads are signed with it so a
//! rendering client can prove they are server-issued, and the per-user hash
//! embedded in watermarks is derived with it so no raw PII leaves the server.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

/// Length of a generated view token (alphanumeric characters).
///
/// 48 alphanumeric characters carry ~286 bits of entropy, above the 256-bit
/// floor required for bearer tokens.
pub const TOKEN_LENGTH: usize = 48;

/// Length of a generated watermark seed (alphanumeric characters, ~190 bits).
pub const SEED_LENGTH: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// Secret-keyed signer. Constructed once at startup from `WATERMARK_SECRET`;
/// the config layer rejects a missing or empty secret before this type is
/// ever built, so a default key cannot exist.
#[derive(Clone)]
pub struct Signer {
    key: Vec<u8>,
}

impl Signer {
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    /// Compute the hex-encoded HMAC-SHA256 signature of `data`.
    pub fn sign(&self, data: &[u8]) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(data);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verify `signature` against `data` by re-deriving the signature and
    /// comparing without early exit. Any single-bit difference fails.
    pub fn verify(&self, data: &[u8], signature: &str) -> bool {
        let expected = self.sign(data);
        constant_time_eq(expected.as_bytes(), signature.as_bytes())
    }
}

/// Byte-wise comparison that does not branch on partial matches.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Generate a random view token.
///
/// The plaintext is handed to the client exactly once; only its signature
/// (via [`Signer::sign`]) is ever stored.
pub fn generate_view_token() -> String {
    random_alphanumeric(TOKEN_LENGTH)
}

/// Generate a random per-session watermark seed.
pub fn generate_watermark_seed() -> String {
    random_alphanumeric(SEED_LENGTH)
}

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

// ---------------------------------------------------------------------------
// hex encoding helper (no extra dep)
// ---------------------------------------------------------------------------

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }
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

    // -- Token generation --------------------------------------------------

    #[test]
    fn generated_token_has_correct_length() {
        assert_eq!(generate_view_token().len(), TOKEN_LENGTH);
        assert_eq!(generate_watermark_seed().len(), SEED_LENGTH);
    }

    #[test]
    fn generated_token_is_alphanumeric() {
        let token = generate_view_token();
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn consecutive_tokens_differ() {
        assert_ne!(generate_view_token(), generate_view_token());
    }

    // -- Signing -----------------------------------------------------------

    #[test]
    fn sign_is_deterministic() {
        let s = signer();
        assert_eq!(s.sign(b"payload"), s.sign(b"payload"));
    }

    #[test]
    fn sign_produces_hex_sha256_digest() {
        let sig = signer().sign(b"payload");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_secrets_produce_different_signatures() {
        let a = Signer::new("secret-a").sign(b"payload");
        let b = Signer::new("secret-b").sign(b"payload");
        assert_ne!(a, b);
    }

    // -- Verification ------------------------------------------------------

    #[test]
    fn verify_round_trips_exact_token() {
        let s = signer();
        let token = generate_view_token();
        let sig = s.sign(token.as_bytes());
        assert!(s.verify(token.as_bytes(), &sig));
    }

    #[test]
    fn verify_rejects_single_bit_alteration() {
        let s = signer();
        let token = generate_view_token();
        let sig = s.sign(token.as_bytes());

        // Flip the low bit of the first byte of the candidate token.
        let mut altered = token.into_bytes();
        altered[0] ^= 1;
        assert!(!s.verify(&altered, &sig));
    }

    #[test]
    fn verify_rejects_truncated_signature() {
        let s = signer();
        let sig = s.sign(b"data");
        assert!(!s.verify(b"data", &sig[..sig.len() - 1]));
    }

    #[test]
    fn constant_time_eq_handles_length_mismatch() {
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"abc", b"abc"));
    }
}
