//! Response types for chat models, complete and streamed.

use crate::error::{EngineError, Result};
use crate::messages::Message;
use tokio::sync::mpsc;

/// Default buffer size for streaming channels.
const STREAM_CHANNEL_CAPACITY: usize = 64;

/// A complete chat response.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// The assistant's reply.
    pub message: Message,

    /// Token usage, when the provider reports it.
    pub usage: Option<UsageMetadata>,
}

/// Token usage statistics reported by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageMetadata {
    /// Tokens consumed by the prompt.
    pub input_tokens: usize,

    /// Tokens generated in the reply.
    pub output_tokens: usize,
}

impl UsageMetadata {
    /// Create usage metadata from prompt and completion counts.
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}

/// One event in a token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    /// A fragment of assistant text, delivered in arrival order.
    Token(String),

    /// The model signalled completion. No further tokens follow.
    Done,
}

/// An in-flight streamed response.
///
/// Chunks arrive in delivery order over an mpsc channel. The stream is
/// finite and non-restartable: it ends with [`StreamChunk::Done`] on normal
/// completion. A channel that closes *without* `Done` means the transport
/// was cut off mid-reply, which [`ChatStream::collect_text`] reports as
/// [`EngineError::StreamIncomplete`] — partial text is never handed out.
pub struct ChatStream {
    receiver: mpsc::Receiver<Result<StreamChunk>>,
}

impl ChatStream {
    /// Create a stream from an existing receiver.
    pub fn new(receiver: mpsc::Receiver<Result<StreamChunk>>) -> Self {
        Self { receiver }
    }

    /// Create a channel pair: a sender for the producing task and the
    /// stream handed to the consumer.
    pub fn channel() -> (mpsc::Sender<Result<StreamChunk>>, Self) {
        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        (tx, Self::new(rx))
    }

    /// Receive the next chunk, or `None` when the channel closes.
    pub async fn recv(&mut self) -> Option<Result<StreamChunk>> {
        self.receiver.recv().await
    }

    /// Drain the stream to completion and return the full concatenated text.
    ///
    /// Fragments are concatenated in delivery order. Any error chunk, or a
    /// channel close before `Done`, fails the whole call.
    pub async fn collect_text(mut self) -> Result<String> {
        let mut full = String::new();

        while let Some(item) = self.receiver.recv().await {
            match item? {
                StreamChunk::Token(fragment) => full.push_str(&fragment),
                StreamChunk::Done => return Ok(full),
            }
        }

        Err(EngineError::StreamIncomplete(
            "stream closed before the model signalled completion".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_text_preserves_order() {
        let (tx, stream) = ChatStream::channel();

        tokio::spawn(async move {
            for fragment in ["Now ", "playing: ", "Dune"] {
                tx.send(Ok(StreamChunk::Token(fragment.to_string())))
                    .await
                    .unwrap();
            }
            tx.send(Ok(StreamChunk::Done)).await.unwrap();
        });

        assert_eq!(stream.collect_text().await.unwrap(), "Now playing: Dune");
    }

    #[tokio::test]
    async fn test_collect_text_incomplete_stream() {
        let (tx, stream) = ChatStream::channel();

        tokio::spawn(async move {
            tx.send(Ok(StreamChunk::Token("partial".to_string())))
                .await
                .unwrap();
            // Sender dropped without Done: transport cut off.
        });

        let err = stream.collect_text().await.unwrap_err();
        assert!(matches!(err, EngineError::StreamIncomplete(_)));
    }

    #[tokio::test]
    async fn test_collect_text_error_chunk() {
        let (tx, stream) = ChatStream::channel();

        tokio::spawn(async move {
            tx.send(Ok(StreamChunk::Token("a".to_string())))
                .await
                .unwrap();
            tx.send(Err(EngineError::StreamIncomplete(
                "connection reset".to_string(),
            )))
            .await
            .unwrap();
        });

        let err = stream.collect_text().await.unwrap_err();
        assert!(matches!(err, EngineError::StreamIncomplete(_)));
    }

    #[tokio::test]
    async fn test_empty_completed_stream() {
        let (tx, stream) = ChatStream::channel();
        tx.send(Ok(StreamChunk::Done)).await.unwrap();
        drop(tx);

        assert_eq!(stream.collect_text().await.unwrap(), "");
    }
}
