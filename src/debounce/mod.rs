//! Debounce control
//!
//! [`Debouncer`] spawns a timer task and runs an action once input has been
//! quiet for the delay.

pub mod scheduler;

pub use scheduler::Debouncer;
