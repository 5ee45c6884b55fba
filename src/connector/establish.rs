//! Connection establishment with unbounded retry

use std::future::Future;
use std::net::{SocketAddr, SocketAddrV4};
use std::time::Duration;

use tokio::net::TcpSocket;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::attempt::{Attempt, Established};
use super::resolve::resolve_ipv4;
use crate::config::RelayConfig;
use crate::connection::{Connection, IoTimeouts};
use crate::endpoint::Endpoint;
use crate::error::{FatalError, TransientError};

/// Establishes outbound TCP connections to relay endpoints.
///
/// Transient failures (socket creation, connect) are retried after a fixed
/// interval with no upper bound on the number of attempts. Only resolution
/// and timeout configuration problems are reported to the caller.
#[derive(Debug, Clone)]
pub struct Connector {
    retry_interval: Duration,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl Connector {
    pub fn new(retry_interval: Duration, read_timeout: Duration, write_timeout: Duration) -> Self {
        Self {
            retry_interval,
            read_timeout,
            write_timeout,
        }
    }

    /// Create a connector from configuration
    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.retry_interval, config.read_timeout, config.write_timeout)
    }

    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    /// Block until `endpoint` accepts a connection.
    ///
    /// The host is resolved once per call; only socket creation and the
    /// connect itself are retried. Returns only on success or on a
    /// [`FatalError`], which the caller is expected to treat as
    /// process-terminating.
    pub async fn connect(&self, endpoint: &Endpoint) -> Result<Connection, FatalError> {
        self.connect_via(endpoint, || resolve_ipv4(endpoint)).await
    }

    async fn connect_via<R, F>(&self, endpoint: &Endpoint, resolve: R) -> Result<Connection, FatalError>
    where
        R: FnOnce() -> F,
        F: Future<Output = Result<SocketAddrV4, FatalError>>,
    {
        let addr = resolve().await?;
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);

            match self.attempt(endpoint, addr).await {
                Attempt::Success(Established {
                    stream,
                    peer_addr,
                    timeouts,
                }) => {
                    info!(
                        "Connected to {} ({}) after {} attempt(s)",
                        endpoint, peer_addr, attempts
                    );
                    return Ok(Connection::new(
                        endpoint.clone(),
                        stream,
                        peer_addr,
                        timeouts,
                        attempts,
                    ));
                }
                Attempt::Retry(TransientError::SocketCreation(e)) => {
                    warn!("Failed to create socket for {}, retrying: {}", endpoint, e);
                }
                Attempt::Retry(e) => {
                    warn!("Failed to connect to {}, retrying: {}", endpoint, e);
                }
                Attempt::Fatal(e) => return Err(e),
            }

            sleep(self.retry_interval).await;
        }
    }

    /// Run one attempt against an already resolved address: create the
    /// socket, apply timeouts, connect.
    pub async fn attempt(&self, endpoint: &Endpoint, addr: SocketAddrV4) -> Attempt {
        let socket = match TcpSocket::new_v4() {
            Ok(socket) => socket,
            Err(e) => return Attempt::Retry(TransientError::SocketCreation(e)),
        };

        let timeouts = match IoTimeouts::new(endpoint, self.read_timeout, self.write_timeout) {
            Ok(timeouts) => timeouts,
            Err(e) => return Attempt::Fatal(e),
        };

        let peer_addr = SocketAddr::V4(addr);
        debug!("Connecting to {} at {}", endpoint, peer_addr);

        // connect(2) on a socket with a send timeout is bounded by it
        match timeout(timeouts.write(), socket.connect(peer_addr)).await {
            Ok(Ok(stream)) => Attempt::Success(Established {
                stream,
                peer_addr,
                timeouts,
            }),
            Ok(Err(e)) => Attempt::Retry(TransientError::Connect(e)),
            Err(_) => Attempt::Retry(TransientError::ConnectTimedOut(timeouts.write())),
        }
    }
}
