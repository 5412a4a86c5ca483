//! Rust SDK for Adrenal AI chatbots.
//!
//! - [`webhook`]: HMAC-SHA256 verification of the `X-Signature` header sent
//!   with webhook deliveries.
//! - [`chat`]: talk to a published chatbot and stream its replies.

pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod webhook;

pub use client::AdrenalClient;
pub use config::SdkConfig;
pub use error::{AdrenalError, ConfigurationError, Result};
pub use webhook::{verify_signature, PayloadEncoding, Secret, SecretSource, SignatureVerifier};
