//! Actor implementation for notification-based communication
//!
//! The Actor owns a handler and runs its message loop as a task on the
//! caller's tokio runtime, so timers inside the handler share the runtime
//! clock (including a paused test clock).

use crate::core::message::{Message, MessageHandler};
use std::marker::PhantomData;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// A lightweight actor that processes inbound messages one at a time.
pub struct Actor<T: Send + 'static, H: MessageHandler<T> + Send + 'static> {
    /// Sender for outbound notifications
    sender: ActorSender<T>,
    /// Channel for sending shutdown signal
    shutdown_sender: Option<oneshot::Sender<()>>,
    /// Handle to the message processing task
    task_handle: Option<JoinHandle<H>>,
    _phantom: PhantomData<H>,
}

impl<T: Send + 'static, H: MessageHandler<T> + Send + 'static> Actor<T, H> {
    /// Create a new Actor and start its message loop.
    ///
    /// # Arguments
    /// * `receiver` - Channel for receiving external messages
    /// * `sender` - Channel for outbound notifications
    /// * `handler` - Message handler implementation
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        receiver: mpsc::UnboundedReceiver<Message<T>>,
        sender: mpsc::UnboundedSender<Message<T>>,
        handler: H,
    ) -> Self {
        let (shutdown_sender, shutdown_receiver) = oneshot::channel();
        let sender = ActorSender::new(sender);

        let task_handle = tokio::spawn(Self::run_message_loop(
            receiver,
            sender.clone(),
            handler,
            shutdown_receiver,
        ));

        Self {
            sender,
            shutdown_sender: Some(shutdown_sender),
            task_handle: Some(task_handle),
            _phantom: PhantomData,
        }
    }

    pub fn sender(&self) -> &ActorSender<T> {
        &self.sender
    }

    async fn run_message_loop(
        mut receiver: mpsc::UnboundedReceiver<Message<T>>,
        sender: ActorSender<T>,
        mut handler: H,
        mut shutdown_receiver: oneshot::Receiver<()>,
    ) -> H {
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown_receiver => {
                    log::debug!("Received shutdown signal, stopping message loop");
                    break;
                }
                message = receiver.recv() => {
                    match message {
                        Some(message) => {
                            log::trace!("Received message: method={}", message.method);
                            handler.on_message(message, &sender).await;
                        }
                        None => {
                            log::debug!("Receiver channel closed");
                            break;
                        }
                    }
                }
            }
        }
        handler
    }

    /// Signal the message loop to stop. Messages still queued are dropped.
    pub fn shutdown(&mut self) {
        if let Some(shutdown_sender) = self.shutdown_sender.take() {
            log::debug!("Sending shutdown signal");
            let _ = shutdown_sender.send(());
        }
    }

    /// Stop the loop and hand the handler back once it has finished.
    pub async fn join(mut self) -> Option<H> {
        self.shutdown();
        match self.task_handle.take() {
            Some(handle) => handle.await.ok(),
            None => None,
        }
    }
}

impl<T: Send + 'static, H: MessageHandler<T> + Send + 'static> Drop for Actor<T, H> {
    fn drop(&mut self) {
        if self.shutdown_sender.is_some() {
            log::debug!("Actor dropped without explicit shutdown, stopping message loop");
            self.shutdown();
        }
    }
}

/// Error type for Actor message sending operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActorSendError {
    #[error("Actor channel is closed")]
    ChannelClosed,
}

/// Cloneable handle for emitting messages from inside or outside an actor.
pub struct ActorSender<T> {
    sender: mpsc::UnboundedSender<Message<T>>,
}

impl<T: Send + 'static> ActorSender<T> {
    pub fn new(sender: mpsc::UnboundedSender<Message<T>>) -> Self {
        Self { sender }
    }

    pub fn send(&self, message: Message<T>) -> Result<(), ActorSendError> {
        self.sender
            .send(message)
            .map_err(|_| ActorSendError::ChannelClosed)
    }

    pub async fn send_message(
        &self,
        method: impl Into<String>,
        payload: T,
    ) -> Result<(), ActorSendError> {
        self.send(Message::new(method, payload))
    }
}

impl<T> Clone for ActorSender<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct RecordingHandler {
        received: Arc<Mutex<Vec<Message<String>>>>,
    }

    impl RecordingHandler {
        fn new() -> Self {
            Self {
                received: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn methods(&self) -> Vec<String> {
            self.received
                .lock()
                .unwrap()
                .iter()
                .map(|m| m.method.clone())
                .collect()
        }
    }

    #[async_trait]
    impl MessageHandler<String> for RecordingHandler {
        async fn on_message(&mut self, message: Message<String>, _sender: &ActorSender<String>) {
            self.received.lock().unwrap().push(message);
        }
    }

    struct EchoHandler;

    #[async_trait]
    impl MessageHandler<String> for EchoHandler {
        async fn on_message(&mut self, message: Message<String>, sender: &ActorSender<String>) {
            let echo_method = format!("echo_{}", message.method);
            let echo_payload = format!("echo: {}", message.payload);
            let _ = sender.send_message(echo_method, echo_payload).await;
        }
    }

    #[tokio::test]
    async fn test_messages_are_handled_in_arrival_order() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let (actor_tx, actor_rx) = mpsc::unbounded_channel();

        let handler = RecordingHandler::new();
        let recorded = handler.clone();
        let actor = Actor::new(actor_rx, tx, handler);

        for method in ["first", "second", "third"] {
            actor_tx.send(Message::new(method, String::new())).unwrap();
        }
        drop(actor_tx);

        let handler = actor.join().await;
        assert!(handler.is_some());
        // join() may stop the loop before the queue drains; whatever ran, ran in order
        let methods = recorded.methods();
        let expected = ["first", "second", "third"];
        assert_eq!(methods, expected[..methods.len()].to_vec());
    }

    #[tokio::test]
    async fn test_closed_inbound_channel_ends_loop() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let (actor_tx, actor_rx) = mpsc::unbounded_channel();

        let handler = RecordingHandler::new();
        let recorded = handler.clone();
        let mut actor = Actor::new(actor_rx, tx, handler);

        actor_tx.send(Message::new("only", String::new())).unwrap();
        drop(actor_tx);

        let handle = actor.task_handle.take().unwrap();
        handle.await.unwrap();
        assert_eq!(recorded.methods(), vec!["only".to_string()]);
    }

    #[tokio::test]
    async fn test_echo_handler() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let (actor_tx, actor_rx) = mpsc::unbounded_channel();
        let _actor = Actor::new(actor_rx, tx, EchoHandler);

        actor_tx.send(Message::new("hello", "world".to_string())).unwrap();

        let echoed = rx.recv().await.unwrap();
        assert_eq!(echoed.method, "echo_hello");
        assert_eq!(echoed.payload, "echo: world");
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel::<Message<String>>();
        drop(rx);
        let sender = ActorSender::new(tx);
        assert_eq!(
            sender.send_message("x", String::new()).await,
            Err(ActorSendError::ChannelClosed)
        );
    }
}
