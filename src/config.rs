use std::env;
use std::time::Duration;

use crate::error::{AdrenalError, Result};
use crate::webhook::{PayloadEncoding, SecretSource, WEBHOOK_SECRET_ENV};

pub const DEFAULT_BASE_URL: &str = "https://adrenal.ai";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_KEY_ENV: &str = "ADRENAL_API_KEY";
pub const BASE_URL_ENV: &str = "ADRENAL_BASE_URL";
pub const TIMEOUT_ENV: &str = "ADRENAL_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct SdkConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub webhook_secret: SecretSource,
    pub payload_encoding: PayloadEncoding,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            webhook_secret: SecretSource::default(),
            payload_encoding: PayloadEncoding::default(),
        }
    }
}

impl SdkConfig {
    /// Loads `.env` if present, then reads `ADRENAL_BASE_URL` and
    /// `ADRENAL_TIMEOUT_SECS`. The webhook secret is not read here; it stays
    /// an environment lookup performed on each verification.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AdrenalError::InvalidConfig(format!(
                "{BASE_URL_ENV} must be an http(s) URL, got {base_url:?}"
            )));
        }

        let timeout = match env::var(TIMEOUT_ENV) {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            base_url,
            timeout,
            webhook_secret: SecretSource::env(WEBHOOK_SECRET_ENV),
            payload_encoding: PayloadEncoding::default(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_webhook_secret(mut self, source: SecretSource) -> Self {
        self.webhook_secret = source;
        self
    }

    #[must_use]
    pub fn with_payload_encoding(mut self, encoding: PayloadEncoding) -> Self {
        self.payload_encoding = encoding;
        self
    }

    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(AdrenalError::InvalidConfig(format!(
            "{TIMEOUT_ENV} must be a positive number of seconds, got {raw:?}"
        ))),
    }
}
