//! Core trait for chat-based language models.
//!
//! The dispatch core is an orchestration layer, not an LLM client library:
//! it defines this trait and provider crates implement it. Implementations
//! handle message conversion, authentication, and transport for their
//! particular provider.

use crate::error::Result;
use crate::llm::config::ChatRequest;
use crate::llm::response::{ChatResponse, ChatStream};
use async_trait::async_trait;

/// A chat-based language model.
///
/// Implementations must be `Send + Sync`; share across tasks with
/// `Arc<dyn ChatModel>`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a complete reply for the given conversation.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Stream a reply token by token.
    ///
    /// The returned stream is finite and order-preserving; it terminates
    /// with [`StreamChunk::Done`](crate::llm::StreamChunk) when the model
    /// signals completion. Callers that need the whole text should drain it
    /// with [`ChatStream::collect_text`] — partial output must never be
    /// interpreted.
    async fn stream(&self, request: ChatRequest) -> Result<ChatStream>;

    /// Clone this model into a boxed trait object.
    fn clone_box(&self) -> Box<dyn ChatModel>;
}

impl Clone for Box<dyn ChatModel> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::response::StreamChunk;
    use crate::messages::Message;
    use std::sync::Arc;

    /// Mock model returning a fixed reply, for trait-usage tests.
    #[derive(Clone)]
    struct MockModel {
        reply: String,
    }

    #[async_trait]
    impl ChatModel for MockModel {
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse> {
            Ok(ChatResponse {
                message: Message::assistant(self.reply.clone()),
                usage: None,
            })
        }

        async fn stream(&self, _request: ChatRequest) -> Result<ChatStream> {
            let (tx, stream) = ChatStream::channel();
            let reply = self.reply.clone();
            tokio::spawn(async move {
                let _ = tx.send(Ok(StreamChunk::Token(reply))).await;
                let _ = tx.send(Ok(StreamChunk::Done)).await;
            });
            Ok(stream)
        }

        fn clone_box(&self) -> Box<dyn ChatModel> {
            Box::new(self.clone())
        }
    }

    #[tokio::test]
    async fn test_trait_object() {
        let model: Arc<dyn ChatModel> = Arc::new(MockModel {
            reply: "Hello!".to_string(),
        });

        let request = ChatRequest::new(vec![Message::user("Hi")]);
        let response = model.chat(request.clone()).await.unwrap();
        assert_eq!(response.message.content, "Hello!");

        let text = model.stream(request).await.unwrap().collect_text().await.unwrap();
        assert_eq!(text, "Hello!");
    }

    #[test]
    fn test_boxed_clone() {
        let boxed: Box<dyn ChatModel> = Box::new(MockModel {
            reply: "x".to_string(),
        });
        let _cloned = boxed.clone();
    }
}
