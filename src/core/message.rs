//! Message types and handler traits for the Actor system.

use async_trait::async_trait;

/// A generic message in the Actor system.
#[derive(Debug, Clone, PartialEq)]
pub struct Message<T> {
    /// The method name for this message
    pub method: String,
    /// The message payload
    pub payload: T,
}

impl<T> Message<T> {
    pub fn new(method: impl Into<String>, payload: T) -> Self {
        Self {
            method: method.into(),
            payload,
        }
    }
}

/// Trait for handling messages in the Actor system.
///
/// Implementors define how to process incoming messages and can emit
/// notifications through the provided [`ActorSender`](crate::core::ActorSender).
#[async_trait]
pub trait MessageHandler<T> {
    async fn on_message(&mut self, message: Message<T>, sender: &crate::core::ActorSender<T>);
}
