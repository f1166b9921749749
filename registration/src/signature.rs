//! Payment callback signature verification.
//!
//! The gateway signs successful checkouts with HMAC-SHA256 over
//! `"{order_id}|{payment_id}"` using the integration's shared secret and
//! sends the hex digest back through the client. Verification recomputes
//! the digest and compares in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify a gateway payment callback signature.
///
/// Computes HMAC-SHA256 over `"{order_id}|{payment_id}"`, hex-encodes the
/// digest, and compares it byte-for-byte against `signature` using a
/// constant-time comparison (timing attack prevention).
#[must_use]
pub fn verify_callback_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    secret: &str,
) -> bool {
    let payload = format!("{order_id}|{payment_id}");

    // HMAC accepts keys of any length; new_from_slice cannot fail for SHA-256.
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    constant_time_eq::constant_time_eq(expected.as_bytes(), signature.as_bytes())
}

/// Compute the expected signature for a callback payload.
///
/// Exposed for tests and for client-side tooling that needs to produce
/// valid signatures against a development secret.
#[must_use]
pub fn sign_callback(order_id: &str, payment_id: &str, secret: &str) -> String {
    let payload = format!("{order_id}|{payment_id}");

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return String::new();
    };
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "secret_placeholder";

    #[test]
    fn test_valid_signature_accepted() {
        let signature = sign_callback("order_1", "pay_1", SECRET);
        assert!(verify_callback_signature(
            "order_1", "pay_1", &signature, SECRET
        ));
    }

    #[test]
    fn test_any_single_character_mutation_rejected() {
        let signature = sign_callback("order_1", "pay_1", SECRET);

        for i in 0..signature.len() {
            let mut mutated: Vec<char> = signature.chars().collect();
            mutated[i] = if mutated[i] == '0' { '1' } else { '0' };
            let mutated: String = mutated.into_iter().collect();
            if mutated == signature {
                continue;
            }
            assert!(
                !verify_callback_signature("order_1", "pay_1", &mutated, SECRET),
                "mutation at index {i} was accepted"
            );
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signature = sign_callback("order_1", "pay_1", SECRET);
        assert!(!verify_callback_signature(
            "order_1",
            "pay_1",
            &signature,
            "another_secret"
        ));
    }

    #[test]
    fn test_payload_concatenation_uses_pipe() {
        // "order_1|pay_1" must not verify as "order_1" + "pay_1" reshuffled.
        let signature = sign_callback("order_1", "pay_1", SECRET);
        assert!(!verify_callback_signature(
            "order_1pay", "_1", &signature, SECRET
        ));
    }

    #[test]
    fn test_digest_is_lowercase_hex() {
        let signature = sign_callback("order_1", "pay_1", SECRET);
        assert_eq!(signature.len(), 64);
        assert!(signature
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
