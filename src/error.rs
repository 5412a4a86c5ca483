use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdrenalError>;

/// No webhook secret could be resolved for a verification call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConfigurationError {
    message: String,
}

impl ConfigurationError {
    pub(crate) fn missing_secret(env_var: Option<&str>) -> Self {
        let message = match env_var {
            Some(var) => format!(
                "Webhook secret key is required. Set {var} environment variable or pass it as an argument."
            ),
            None => "Webhook secret key is required. Pass it as an argument.".to_string(),
        };
        Self { message }
    }
}

#[derive(Debug, Error)]
pub enum AdrenalError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load chatbot ({status})")]
    ChatbotUnavailable { status: StatusCode },

    #[error("Chatbot is not live")]
    ChatbotNotLive,

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Failed to create chat ({status})")]
    ChatCreation { status: StatusCode },

    #[error(
        "This chatbot is using features not available in your current plan. Please upgrade to access {} models.",
        upgrade_target(.subscription_tier)
    )]
    ModelNotAvailable { subscription_tier: String },

    #[error("Failed to send message ({status})")]
    SendFailed { status: StatusCode },
}

fn upgrade_target(tier: &str) -> &'static str {
    if tier == "free" {
        "premium"
    } else {
        "higher tier"
    }
}
