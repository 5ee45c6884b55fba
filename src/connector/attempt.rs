//! Outcome of a single connection attempt

use std::net::SocketAddr;

use tokio::net::TcpStream;

use crate::connection::IoTimeouts;
use crate::error::{FatalError, TransientError};

/// Tagged result of one pass through resolve, socket, timeouts, connect.
#[derive(Debug)]
pub enum Attempt {
    /// Connected and configured
    Success(Established),
    /// Try again after the retry interval
    Retry(TransientError),
    /// Stop: the endpoint can never be reached as configured
    Fatal(FatalError),
}

/// A freshly connected stream together with the timeouts applied to it.
#[derive(Debug)]
pub struct Established {
    pub stream: TcpStream,
    pub peer_addr: SocketAddr,
    pub timeouts: IoTimeouts,
}

impl Attempt {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_retry(&self) -> bool {
        matches!(self, Self::Retry(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}
