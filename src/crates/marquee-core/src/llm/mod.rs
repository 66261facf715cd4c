//! Model-client abstractions.
//!
//! The dispatch core is transport-agnostic: it drives any chat model through
//! the [`ChatModel`] trait and never talks to a provider directly. Provider
//! implementations live in the `marquee-llm` crate.
//!
//! - [`ChatModel`] - the trait providers implement (chat + stream)
//! - [`ChatRequest`] / [`ChatConfig`] - messages plus generation options
//! - [`ChatResponse`] - a complete reply with usage accounting
//! - [`ChatStream`] / [`StreamChunk`] - ordered token delivery for streaming

pub mod config;
pub mod response;
pub mod traits;

pub use config::{ChatConfig, ChatRequest};
pub use response::{ChatResponse, ChatStream, StreamChunk, UsageMetadata};
pub use traits::ChatModel;
