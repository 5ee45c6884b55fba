//! Connector Module
//!
//! Produces live connections, retrying transient failures forever.

pub mod attempt;
pub mod establish;
pub mod resolve;

pub use attempt::{Attempt, Established};
pub use establish::Connector;
pub use resolve::{pick_first_ipv4, resolve_ipv4};
