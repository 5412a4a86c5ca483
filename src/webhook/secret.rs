use std::env;
use std::fmt;

use crate::error::ConfigurationError;

/// Environment variable holding the fallback webhook secret.
pub const WEBHOOK_SECRET_ENV: &str = "ADRENAL_WEBHOOK_SECRET";

/// Shared webhook secret. `Debug` never prints the key material.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl From<&[u8]> for Secret {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl From<Vec<u8>> for Secret {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

/// Where a verifier looks for its secret when the caller does not pass one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Read the named environment variable on every call.
    Env(String),
    Static(Secret),
    None,
}

impl Default for SecretSource {
    fn default() -> Self {
        Self::Env(WEBHOOK_SECRET_ENV.to_string())
    }
}

impl SecretSource {
    pub fn env(var: impl Into<String>) -> Self {
        Self::Env(var.into())
    }

    pub fn fixed(secret: impl Into<Secret>) -> Self {
        Self::Static(secret.into())
    }

    /// Explicit secret first, then this source. Empty values count as absent.
    pub fn resolve(&self, explicit: Option<&[u8]>) -> Result<Secret, ConfigurationError> {
        if let Some(bytes) = explicit.filter(|bytes| !bytes.is_empty()) {
            return Ok(Secret::new(bytes));
        }

        let fallback = match self {
            Self::Env(var) => env::var(var).ok().map(Secret::from),
            Self::Static(secret) => Some(secret.clone()),
            Self::None => None,
        };

        fallback
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| self.missing())
    }

    fn missing(&self) -> ConfigurationError {
        match self {
            Self::Env(var) => ConfigurationError::missing_secret(Some(var.as_str())),
            _ => ConfigurationError::missing_secret(None),
        }
    }
}
