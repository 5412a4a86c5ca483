pub mod encoding;
pub mod secret;
pub mod signature;
pub mod verifier;

pub use encoding::PayloadEncoding;
pub use secret::{Secret, SecretSource, WEBHOOK_SECRET_ENV};
pub use signature::{constant_time_eq, digest_matches, hmac_sha256_hex, ComparisonError};
pub use verifier::{verify_signature, SignatureVerifier};
