use askme_core::{AskMeResult, Message};
use async_trait::async_trait;

/// A hosted generative model the chat handler forwards prompts to.
///
/// Object-safe so the gateway can hold `Arc<dyn ModelClient>` and tests can
/// substitute a canned implementation.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Generates a reply to `message`, given the preceding conversation
    /// turns (most recent last, current message excluded).
    async fn generate(&self, message: &str, history: &[Message]) -> AskMeResult<String>;
}
