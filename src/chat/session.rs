use futures::StreamExt;
use reqwest::Response;
use tracing::{debug, info};

use crate::chat::api::ChatbotApi;
use crate::chat::models::{ChatMessage, Chatbot, Role, INITIAL_MESSAGE_ID};
use crate::chat::stream::{LineBuffer, StreamPart};
use crate::error::{AdrenalError, Result};

/// A conversation with a live chatbot.
///
/// The chat is created on the first [`send`](Self::send). Dropping a pending
/// `send` future cancels the reply; the user message stays in the history.
#[derive(Debug)]
pub struct ChatSession {
    api: ChatbotApi,
    chatbot: Chatbot,
    chat_id: Option<String>,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub(crate) fn new(api: ChatbotApi, chatbot: Chatbot) -> Self {
        let messages = chatbot
            .messages_initial
            .as_ref()
            .map(|greeting| ChatMessage {
                id: Some(INITIAL_MESSAGE_ID.to_string()),
                ..ChatMessage::assistant(greeting.clone())
            })
            .into_iter()
            .collect();

        Self {
            api,
            chatbot,
            chat_id: None,
            messages,
        }
    }

    pub fn chatbot(&self) -> &Chatbot {
        &self.chatbot
    }

    pub fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Sends `content` and streams the reply, calling `on_delta` with each
    /// text fragment as it arrives. Returns the full reply.
    ///
    /// Failures after the user message was recorded are also appended to the
    /// history as an `error` message.
    pub async fn send<F>(&mut self, content: &str, mut on_delta: F) -> Result<String>
    where
        F: FnMut(&str),
    {
        let content = content.trim();
        if content.is_empty() {
            return Err(AdrenalError::EmptyMessage);
        }
        if !self.chatbot.live {
            return Err(AdrenalError::ChatbotNotLive);
        }

        self.messages.push(ChatMessage::user(content));

        match self.exchange(content, &mut on_delta).await {
            Ok(reply) => {
                self.messages.push(ChatMessage::assistant(reply.clone()));
                Ok(reply)
            }
            Err(err) => {
                self.messages.push(ChatMessage::error(err.to_string()));
                Err(err)
            }
        }
    }

    async fn exchange<F>(&mut self, content: &str, on_delta: &mut F) -> Result<String>
    where
        F: FnMut(&str),
    {
        let chat_id = if let Some(id) = self.chat_id.clone() {
            id
        } else {
            let id = self.api.create_chat(content).await?;
            info!(chat_id = %id, publish_id = self.api.publish_id(), "started chat");
            self.chat_id = Some(id.clone());
            id
        };

        let history: Vec<&ChatMessage> = self
            .messages
            .iter()
            .filter(|message| message.role != Role::Error)
            .collect();

        let response = self.api.send_messages(&chat_id, &history).await?;
        read_reply(response, on_delta).await
    }
}

async fn read_reply<F>(response: Response, on_delta: &mut F) -> Result<String>
where
    F: FnMut(&str),
{
    let mut body = response.bytes_stream();
    let mut lines = LineBuffer::default();
    let mut reply = String::new();

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        for line in lines.push(&chunk) {
            if apply_line(&line, &mut reply, on_delta) {
                return Ok(reply);
            }
        }
    }

    if let Some(line) = lines.finish() {
        apply_line(&line, &mut reply, on_delta);
    }
    debug!(len = reply.len(), "reply stream ended without finish part");
    Ok(reply)
}

// True once the reply is complete.
fn apply_line<F>(line: &str, reply: &mut String, on_delta: &mut F) -> bool
where
    F: FnMut(&str),
{
    match StreamPart::parse(line) {
        Some(StreamPart::Text(text)) => {
            on_delta(&text);
            reply.push_str(&text);
            false
        }
        Some(StreamPart::Finish) => true,
        _ => false,
    }
}
