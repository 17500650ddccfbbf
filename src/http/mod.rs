//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, route)
//!     → request.rs (JSON body extraction, RequestView snapshot)
//!     → echo handler
//!     → response.rs (render plain-text echo)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{BodyOptions, BodyRejection, JsonBody, RequestView};
pub use response::{render, EchoResponse};
pub use server::{HttpServer, ECHO_PATH};
