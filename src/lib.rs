//! remote-dump1090 Library
//!
//! A resilient one-directional TCP relay: bytes read from a source
//! endpoint are written to a destination endpoint, and either side is
//! reconnected on its own whenever it fails.

pub mod cli;
pub mod config;
pub mod connection;
pub mod connector;
pub mod endpoint;
pub mod error;
pub mod logging;
pub mod relay;
pub mod signal;

pub use config::Config;
pub use connection::Connection;
pub use connector::Connector;
pub use endpoint::Endpoint;
pub use error::{FatalError, TransientError};
pub use relay::Relay;

/// Common error type for startup and configuration code
pub type Result<T> = anyhow::Result<T>;
