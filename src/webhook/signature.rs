use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ComparisonError {
    #[error("signature is {provided} bytes, expected {expected}")]
    LengthMismatch { expected: usize, provided: usize },
}

/// HMAC-SHA256 of `message` under `key`, as lowercase hex.
pub fn hmac_sha256_hex(key: &[u8], message: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time equality. Inputs of different lengths are an error rather
/// than `false` so callers can tell the two apart.
pub fn constant_time_eq(expected: &[u8], provided: &[u8]) -> Result<bool, ComparisonError> {
    if expected.len() != provided.len() {
        return Err(ComparisonError::LengthMismatch {
            expected: expected.len(),
            provided: provided.len(),
        });
    }
    Ok(expected.ct_eq(provided).into())
}

/// Compares a computed hex digest with a claimed signature. Any comparison
/// failure counts as a mismatch.
pub fn digest_matches(expected_hex: &str, signature: &str) -> bool {
    match constant_time_eq(expected_hex.as_bytes(), signature.as_bytes()) {
        Ok(true) => true,
        Ok(false) => {
            tracing::debug!("webhook signature mismatch");
            false
        }
        Err(err) => {
            tracing::debug!(error = %err, "webhook signature rejected");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_is_lowercase_hex_sha256() {
        let sig = hmac_sha256_hex(b"shhh", br#"{"event": "ping"}"#);
        assert_eq!(
            sig,
            "f84e8b451ed88fdbaef82c089f64d2ced719a1261db7405b5cc349f404ea4941"
        );
        assert_eq!(sig, sig.to_lowercase());
    }

    #[test]
    fn hmac_accepts_any_key_length() {
        let long_key = vec![7u8; 512];
        assert_eq!(hmac_sha256_hex(&long_key, b"x").len(), 64);
        assert_eq!(hmac_sha256_hex(b"", b"x").len(), 64);
    }

    #[test]
    fn equal_and_different_inputs() {
        assert_eq!(constant_time_eq(b"abc", b"abc"), Ok(true));
        assert_eq!(constant_time_eq(b"abc", b"abd"), Ok(false));
    }

    #[test]
    fn length_mismatch_is_reported() {
        assert_eq!(
            constant_time_eq(b"abcd", b"ab"),
            Err(ComparisonError::LengthMismatch {
                expected: 4,
                provided: 2
            })
        );
    }

    #[test]
    fn digest_matches_fails_closed() {
        let digest = hmac_sha256_hex(b"k", b"m");
        assert!(digest_matches(&digest, &digest));
        assert!(!digest_matches(&digest, ""));
        assert!(!digest_matches(&digest, "not hex at all"));
        assert!(!digest_matches(&digest, &digest.to_uppercase()));
        assert!(!digest_matches(&digest, &format!("{digest}0")));
    }
}
