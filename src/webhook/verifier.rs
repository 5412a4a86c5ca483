use serde::Serialize;
use tracing::warn;

use crate::error::{ConfigurationError, Result};
use crate::webhook::encoding::PayloadEncoding;
use crate::webhook::secret::{Secret, SecretSource};
use crate::webhook::signature::{digest_matches, hmac_sha256_hex};

/// Checks `X-Signature` values of Adrenal webhooks.
///
/// A secret passed to a call always wins. Otherwise the verifier falls back to
/// its [`SecretSource`], which by default reads `ADRENAL_WEBHOOK_SECRET` at
/// call time.
///
/// ```
/// use adrenal_sdk::webhook::{SecretSource, SignatureVerifier};
/// use serde_json::json;
///
/// let verifier = SignatureVerifier::new(SecretSource::fixed("shhh"));
/// let body = json!({"event": "ping"});
/// let signature = "f84e8b451ed88fdbaef82c089f64d2ced719a1261db7405b5cc349f404ea4941";
///
/// assert!(verifier.verify(&body, signature).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SignatureVerifier {
    secret: SecretSource,
    encoding: PayloadEncoding,
}

impl SignatureVerifier {
    pub fn new(secret: SecretSource) -> Self {
        Self {
            secret,
            encoding: PayloadEncoding::default(),
        }
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: PayloadEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn secret_source(&self) -> &SecretSource {
        &self.secret
    }

    pub fn encoding(&self) -> PayloadEncoding {
        self.encoding
    }

    pub fn resolve_secret(
        &self,
        explicit: Option<&[u8]>,
    ) -> std::result::Result<Secret, ConfigurationError> {
        self.secret.resolve(explicit)
    }

    /// The hex digest a signer holding the same secret would have sent.
    pub fn compute_digest<T>(&self, payload: &T, secret: Option<&[u8]>) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        let secret = self.resolve_secret(secret)?;
        let body = self.encoding.encode(payload)?;
        Ok(hmac_sha256_hex(secret.as_bytes(), &body))
    }

    pub fn verify<T>(
        &self,
        payload: &T,
        signature: &str,
    ) -> std::result::Result<bool, ConfigurationError>
    where
        T: Serialize + ?Sized,
    {
        self.verify_with(payload, signature, None)
    }

    pub fn verify_with_secret<T>(
        &self,
        payload: &T,
        signature: &str,
        secret: impl AsRef<[u8]>,
    ) -> std::result::Result<bool, ConfigurationError>
    where
        T: Serialize + ?Sized,
    {
        self.verify_with(payload, signature, Some(secret.as_ref()))
    }

    /// Returns `Err` only when no secret can be resolved, which is checked
    /// before anything is hashed. Every other failure is `Ok(false)`.
    pub fn verify_with<T>(
        &self,
        payload: &T,
        signature: &str,
        secret: Option<&[u8]>,
    ) -> std::result::Result<bool, ConfigurationError>
    where
        T: Serialize + ?Sized,
    {
        let secret = self.resolve_secret(secret)?;

        let body = match self.encoding.encode(payload) {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "webhook payload could not be serialized");
                return Ok(false);
            }
        };

        let expected = hmac_sha256_hex(secret.as_bytes(), &body);
        Ok(digest_matches(&expected, signature))
    }
}

/// Verifies with an explicit secret and no fallback.
pub fn verify_signature<T>(
    payload: &T,
    signature: &str,
    secret: impl AsRef<[u8]>,
) -> std::result::Result<bool, ConfigurationError>
where
    T: Serialize + ?Sized,
{
    SignatureVerifier::new(SecretSource::None).verify_with_secret(payload, signature, secret)
}
