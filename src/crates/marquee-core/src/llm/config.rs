//! Request and generation-option types for chat models.

use crate::messages::Message;

/// A request to a chat model: the full ordered conversation plus options.
///
/// # Example
///
/// ```rust,ignore
/// use marquee_core::llm::ChatRequest;
/// use marquee_core::messages::Message;
///
/// let request = ChatRequest::new(vec![
///     Message::system("You are a helpful assistant"),
///     Message::user("What's playing tonight?"),
/// ])
/// .with_temperature(0.2)
/// .with_max_tokens(500);
/// ```
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// The conversation messages to send to the model, in order.
    pub messages: Vec<Message>,

    /// Generation options.
    pub config: ChatConfig,
}

impl ChatRequest {
    /// Create a new chat request with the given messages and default options.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            config: ChatConfig::default(),
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of output tokens.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = Some(max_tokens);
        self
    }

    /// Override the provider's default model for this request.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }
}

/// Generation options for a chat request.
///
/// Providers honor the options they support and ignore the rest.
#[derive(Debug, Clone, Default)]
pub struct ChatConfig {
    /// Model identifier override. When `None`, the provider uses the model
    /// from its own configuration.
    pub model: Option<String>,

    /// Sampling temperature (lower = more deterministic).
    pub temperature: Option<f32>,

    /// Maximum tokens to generate.
    pub max_tokens: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ChatRequest::new(vec![Message::user("hi")])
            .with_temperature(0.7)
            .with_max_tokens(100)
            .with_model("gpt-4o-mini");

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.config.temperature, Some(0.7));
        assert_eq!(request.config.max_tokens, Some(100));
        assert_eq!(request.config.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_default_config() {
        let config = ChatConfig::default();
        assert!(config.model.is_none());
        assert!(config.temperature.is_none());
        assert!(config.max_tokens.is_none());
    }
}
