use std::env;
use std::fmt;
use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;

use crate::chat::ChatbotApi;
use crate::config::{SdkConfig, API_KEY_ENV};
use crate::error::{AdrenalError, ConfigurationError, Result};
use crate::webhook::SignatureVerifier;

const USER_AGENT: &str = concat!("adrenal-sdk-rust/", env!("CARGO_PKG_VERSION"));

/// Entry point of the SDK.
///
/// ```no_run
/// use adrenal_sdk::AdrenalClient;
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AdrenalClient::new("your-api-key")?;
/// let body = json!({"event": "ping"});
/// let valid = client.verify_webhook(&body, "<X-Signature header>", Some(b"shhh".as_slice()))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AdrenalClient {
    api_key: Arc<str>,
    http: Client,
    config: Arc<SdkConfig>,
    verifier: SignatureVerifier,
}

impl AdrenalClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, SdkConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: SdkConfig) -> Result<Self> {
        // No whole-request timeout: streamed replies may outlast it. Short
        // requests apply `config.timeout` per call.
        let http = Client::builder()
            .connect_timeout(config.timeout)
            .read_timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let verifier = SignatureVerifier::new(config.webhook_secret.clone())
            .with_encoding(config.payload_encoding);
        let api_key: String = api_key.into();

        Ok(Self {
            api_key: Arc::from(api_key),
            http,
            config: Arc::new(config),
            verifier,
        })
    }

    /// Reads `ADRENAL_API_KEY` plus everything [`SdkConfig::from_env`] reads.
    pub fn from_env() -> Result<Self> {
        let config = SdkConfig::from_env()?;
        let api_key = env::var(API_KEY_ENV)
            .map_err(|_| AdrenalError::InvalidConfig(format!("{API_KEY_ENV} is not set")))?;
        Self::with_config(api_key, config)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn verifier(&self) -> &SignatureVerifier {
        &self.verifier
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Checks a webhook body against its `X-Signature` header.
    ///
    /// `secret` overrides the configured fallback, which by default is the
    /// `ADRENAL_WEBHOOK_SECRET` environment variable.
    pub fn verify_webhook<T>(
        &self,
        body: &T,
        signature: &str,
        secret: Option<&[u8]>,
    ) -> std::result::Result<bool, ConfigurationError>
    where
        T: Serialize + ?Sized,
    {
        self.verifier.verify_with(body, signature, secret)
    }

    pub fn chatbot(&self, publish_id: impl Into<String>) -> ChatbotApi {
        ChatbotApi::new(self.clone(), publish_id)
    }

    /// Script URL that embeds the floating chat widget on a page.
    pub fn widget_script_url(&self, publish_id: &str) -> String {
        format!("{}?c={}", self.config.api_url("chatbot.min.js"), publish_id)
    }
}

impl fmt::Debug for AdrenalClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdrenalClient")
            .field("api_key", &"***")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
