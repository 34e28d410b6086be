//! Core module for notification-based communication
//!
//! A lightweight actor: one message loop per control, fed through an
//! unbounded channel so that events from a single input are handled in the
//! order they arrive.

pub mod actor;
pub mod message;

pub use actor::{Actor, ActorSendError, ActorSender};
pub use message::{Message, MessageHandler};
