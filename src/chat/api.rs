use reqwest::Response;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::chat::models::{
    ApiErrorBody, ChatMessage, Chatbot, CreateChatRequest, CreateChatResponse,
    SendMessagesRequest,
};
use crate::chat::session::ChatSession;
use crate::client::AdrenalClient;
use crate::error::{AdrenalError, Result};

const MODEL_NOT_AVAILABLE: &str = "model_not_available";

/// Live endpoints of one published chatbot.
#[derive(Debug, Clone)]
pub struct ChatbotApi {
    client: AdrenalClient,
    publish_id: String,
}

impl ChatbotApi {
    pub(crate) fn new(client: AdrenalClient, publish_id: impl Into<String>) -> Self {
        Self {
            client,
            publish_id: publish_id.into(),
        }
    }

    pub fn publish_id(&self) -> &str {
        &self.publish_id
    }

    fn live_url(&self) -> String {
        self.client
            .config()
            .api_url(&format!("api/chatbot/{}/live", self.publish_id))
    }

    #[instrument(skip(self), fields(publish_id = %self.publish_id))]
    pub async fn fetch(&self) -> Result<Chatbot> {
        let response = self
            .client
            .http()
            .get(self.live_url())
            .timeout(self.client.config().timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdrenalError::ChatbotUnavailable { status });
        }

        let chatbot: Chatbot = response.json().await?;
        debug!(live = chatbot.live, "chatbot loaded");
        Ok(chatbot)
    }

    /// Loads the chatbot and opens a session seeded with its greeting.
    pub async fn start_session(&self) -> Result<ChatSession> {
        let chatbot = self.fetch().await?;
        Ok(ChatSession::new(self.clone(), chatbot))
    }

    #[instrument(skip(self, message), fields(publish_id = %self.publish_id))]
    pub(crate) async fn create_chat(&self, message: &str) -> Result<String> {
        let response = self
            .client
            .http()
            .post(self.live_url())
            .timeout(self.client.config().timeout)
            .json(&CreateChatRequest { message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdrenalError::ChatCreation { status });
        }

        let created: CreateChatResponse = response.json().await?;
        debug!(chat_id = %created.chat_id, "chat created");
        Ok(created.chat_id)
    }

    /// Posts the history and hands back the streaming reply. Only the
    /// connect and per-read timeouts apply, so a long reply is not cut off.
    #[instrument(skip(self, messages), fields(publish_id = %self.publish_id, count = messages.len()))]
    pub(crate) async fn send_messages(
        &self,
        chat_id: &str,
        messages: &[&ChatMessage],
    ) -> Result<Response> {
        let url = format!("{}/{}", self.live_url(), chat_id);
        let request = SendMessagesRequest {
            id: Uuid::new_v4().to_string(),
            messages,
        };

        let response = self.client.http().post(url).json(&request).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: ApiErrorBody = response.json().await.unwrap_or_default();
        match body.code.as_deref() {
            Some(MODEL_NOT_AVAILABLE) => Err(AdrenalError::ModelNotAvailable {
                subscription_tier: body.subscription_tier.unwrap_or_default(),
            }),
            _ => Err(AdrenalError::SendFailed { status }),
        }
    }
}
