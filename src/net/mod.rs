//! Network layer.

pub mod listener;

pub use listener::{bind, ListenerError};
