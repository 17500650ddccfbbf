//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (EchoConfig::default)
//!     → loader.rs (optional TOML file, then PORT/HOST, then CLI flags)
//!     → validation.rs (semantic checks)
//!     → EchoConfig (validated, immutable)
//!     → handed by value to HttpServer
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults so no file is needed at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, Overrides};
pub use schema::EchoConfig;
pub use schema::LimitsConfig;
pub use schema::ListenerConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
