//! Connection Module
//!
//! Live, timeout-bounded TCP connections to one relay endpoint.

pub mod handle;

pub use handle::{Connection, IoTimeouts};
