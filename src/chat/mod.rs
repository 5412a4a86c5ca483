pub mod api;
pub mod models;
pub mod session;
pub mod stream;

pub use api::ChatbotApi;
pub use models::{ChatMessage, Chatbot, Role};
pub use session::ChatSession;
pub use stream::{LineBuffer, StreamPart};
