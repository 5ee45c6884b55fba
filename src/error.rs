//! Relay Error Types
//!
//! Two classes of failure exist in the relay core. Transient errors are
//! absorbed by retrying or reconnecting and never leave the core. Fatal
//! errors mean the operator gave us something no amount of waiting will
//! fix, and they end the process.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Misconfiguration detected while establishing a connection.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("Failed to resolve hostname {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("Can't find any IPv4 address for {host}")]
    NoIpv4Address { host: String },
    #[error("Invalid socket {which} timeout for {endpoint}: timeout must be greater than 0")]
    InvalidTimeout {
        endpoint: String,
        which: &'static str,
    },
}

/// Failure that only causes a retry or a reconnect.
#[derive(Debug, Error)]
pub enum TransientError {
    #[error("failed to create socket: {0}")]
    SocketCreation(#[source] io::Error),
    #[error("{0}")]
    Connect(#[source] io::Error),
    #[error("connect timed out after {0:?}")]
    ConnectTimedOut(Duration),
    #[error("connection closed by peer")]
    EndOfStream,
    #[error("read timed out after {0:?}")]
    ReadTimedOut(Duration),
    #[error("write timed out after {0:?}")]
    WriteTimedOut(Duration),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl TransientError {
    /// Whether the peer closed the stream in an orderly way.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_messages() {
        let err = FatalError::NoIpv4Address {
            host: "example.invalid".to_string(),
        };
        assert_eq!(err.to_string(), "Can't find any IPv4 address for example.invalid");

        let err = FatalError::InvalidTimeout {
            endpoint: "127.0.0.1:30001".to_string(),
            which: "read",
        };
        assert!(err.to_string().contains("read timeout for 127.0.0.1:30001"));
    }

    #[test]
    fn test_end_of_stream_is_distinguished() {
        assert!(TransientError::EndOfStream.is_end_of_stream());
        let err: TransientError = io::Error::from(io::ErrorKind::ConnectionReset).into();
        assert!(!err.is_end_of_stream());
    }
}
