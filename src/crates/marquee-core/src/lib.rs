//! # marquee-core — the function-dispatch loop
//!
//! Core of the marquee movie assistant: a chat model decides each turn
//! whether to answer the user directly or request one of a fixed set of
//! catalog operations. This crate owns the mechanical contract between raw
//! model output and action execution:
//!
//! - [`wire`] — classifies model output as chat or a function request, under
//!   one of two wire grammars selected per deployment
//! - [`registry`] — the closed set of invokable actions and their declared
//!   parameters
//! - [`executor`] — binds arguments, invokes the catalog, and normalizes
//!   every outcome so a failed lookup can never crash a conversation
//! - [`dialogue`] — the turn loop: invoke, parse, act, re-invoke, plus the
//!   confirmation handshake for ticket purchases
//! - [`session`] — per-conversation history and pending-confirmation state
//! - [`llm`] — the provider-agnostic [`ChatModel`](llm::ChatModel) trait;
//!   implementations live in `marquee-llm`
//! - [`catalog`] — the [`MovieCatalog`](catalog::MovieCatalog) trait the
//!   actions call into; implementations live in `marquee-movies`
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_core::dialogue::{DialogueEngine, EngineConfig};
//! use marquee_core::wire::WireFormat;
//! use std::sync::Arc;
//!
//! let engine = DialogueEngine::new(
//!     model,   // Arc<dyn ChatModel>
//!     catalog, // Arc<dyn MovieCatalog>
//!     EngineConfig::default().with_wire_format(WireFormat::Delimited),
//! );
//!
//! let mut session = engine.new_session();
//! let reply = engine.handle_turn(&mut session, "What's playing now?").await?;
//! println!("{}", reply.text());
//! ```

pub mod catalog;
pub mod dialogue;
pub mod error;
pub mod executor;
pub mod llm;
pub mod messages;
pub mod prompts;
pub mod registry;
pub mod session;
pub mod wire;

pub use catalog::{CatalogError, Movie, MovieCatalog, Review, Showtime, TicketConfirmation};
pub use dialogue::{DialogueEngine, EngineConfig, TurnEvent, TurnReply};
pub use error::{EngineError, Result};
pub use executor::{ActionOutcome, Executor};
pub use llm::{ChatModel, ChatRequest, ChatResponse, ChatStream, StreamChunk};
pub use messages::{Message, MessageRole};
pub use registry::ActionKind;
pub use session::{PendingConfirmation, Session, SessionId, SessionStore};
pub use wire::{ActionCall, ActionParams, ModelReply, WireFormat};
