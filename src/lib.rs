//! Echo API Library
//!
//! A single-route HTTP server that describes every request it receives
//! (headers, method, JSON body) back to the caller as plain text.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::schema::EchoConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
