//! Chat-model provider implementations for marquee.
//!
//! This crate provides concrete implementations of the `ChatModel` trait
//! from `marquee-core`. The dispatch core stays provider-agnostic; this is
//! where authentication, message conversion, and transport live.
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_llm::{OpenAiChat, RemoteLlmConfig};
//! use marquee_core::llm::{ChatModel, ChatRequest};
//! use marquee_core::messages::Message;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RemoteLlmConfig::from_env(
//!         "OPENAI_API_KEY",
//!         "https://api.openai.com/v1",
//!         "gpt-4o-mini",
//!     )?;
//!     let client = OpenAiChat::new(config);
//!
//!     let request = ChatRequest::new(vec![Message::user("What is playing tonight?")]);
//!     let text = client.stream(request).await?.collect_text().await?;
//!     println!("{text}");
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod remote;

pub use config::RemoteLlmConfig;
pub use error::{LlmError, Result};
pub use remote::OpenAiChat;
