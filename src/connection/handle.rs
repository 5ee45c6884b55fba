//! Connection Handle

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::endpoint::Endpoint;
use crate::error::{FatalError, TransientError};

/// Read and write deadlines applied to every operation on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoTimeouts {
    read: Duration,
    write: Duration,
}

impl IoTimeouts {
    /// Validate and build the timeouts for a connection to `endpoint`.
    ///
    /// A zero timeout would let a stalled peer block the relay forever,
    /// so it is rejected as fatal.
    pub fn new(endpoint: &Endpoint, read: Duration, write: Duration) -> Result<Self, FatalError> {
        if read.is_zero() {
            return Err(FatalError::InvalidTimeout {
                endpoint: endpoint.to_string(),
                which: "read",
            });
        }
        if write.is_zero() {
            return Err(FatalError::InvalidTimeout {
                endpoint: endpoint.to_string(),
                which: "write",
            });
        }
        Ok(Self { read, write })
    }

    pub fn read(&self) -> Duration {
        self.read
    }

    pub fn write(&self) -> Duration {
        self.write
    }
}

/// A connected stream bound to one endpoint.
///
/// The socket is released when the handle is dropped.
#[derive(Debug)]
pub struct Connection {
    endpoint: Endpoint,
    stream: TcpStream,
    peer_addr: SocketAddr,
    timeouts: IoTimeouts,
    attempts: u32,
}

impl Connection {
    pub(crate) fn new(
        endpoint: Endpoint,
        stream: TcpStream,
        peer_addr: SocketAddr,
        timeouts: IoTimeouts,
        attempts: u32,
    ) -> Self {
        Self {
            endpoint,
            stream,
            peer_addr,
            timeouts,
            attempts,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn timeouts(&self) -> IoTimeouts {
        self.timeouts
    }

    /// Number of connect attempts it took to establish this connection.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Read up to `buf.len()` bytes.
    ///
    /// Never returns `Ok(0)`: an orderly close by the peer is reported as
    /// [`TransientError::EndOfStream`].
    pub async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, TransientError> {
        match timeout(self.timeouts.read, self.stream.read(buf)).await {
            Ok(Ok(0)) => Err(TransientError::EndOfStream),
            Ok(Ok(n)) => Ok(n),
            Ok(Err(e)) => Err(TransientError::Io(e)),
            Err(_) => Err(TransientError::ReadTimedOut(self.timeouts.read)),
        }
    }

    /// Write all of `data`, bounded by the write timeout.
    pub async fn write_chunk(&mut self, data: &[u8]) -> Result<(), TransientError> {
        match timeout(self.timeouts.write, self.stream.write_all(data)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(TransientError::Io(e)),
            Err(_) => Err(TransientError::WriteTimedOut(self.timeouts.write)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn connected_pair(timeouts: IoTimeouts) -> (Connection, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).await.unwrap();
        let (server, _) = listener.accept().await.unwrap();
        let endpoint = Endpoint::new("127.0.0.1", addr.port());
        (Connection::new(endpoint, client, addr, timeouts, 1), server)
    }

    fn short_timeouts() -> IoTimeouts {
        let endpoint = Endpoint::new("127.0.0.1", 1);
        IoTimeouts::new(&endpoint, Duration::from_millis(100), Duration::from_millis(100)).unwrap()
    }

    #[test]
    fn test_zero_timeouts_are_fatal() {
        let endpoint = Endpoint::new("127.0.0.1", 30001);
        let read = IoTimeouts::new(&endpoint, Duration::ZERO, Duration::from_secs(5));
        assert!(matches!(read, Err(FatalError::InvalidTimeout { which: "read", .. })));

        let write = IoTimeouts::new(&endpoint, Duration::from_secs(5), Duration::ZERO);
        assert!(matches!(write, Err(FatalError::InvalidTimeout { which: "write", .. })));
    }

    #[tokio::test]
    async fn test_read_and_write() {
        let (mut conn, mut peer) = connected_pair(short_timeouts()).await;

        peer.write_all(b"MSG,3,1").await.unwrap();
        let mut buf = [0u8; 64];
        let n = conn.read_chunk(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"MSG,3,1");

        conn.write_chunk(b"*8D4840D6;").await.unwrap();
        let mut received = [0u8; 10];
        peer.read_exact(&mut received).await.unwrap();
        assert_eq!(&received, b"*8D4840D6;");
    }

    #[tokio::test]
    async fn test_orderly_close_is_end_of_stream() {
        let (mut conn, peer) = connected_pair(short_timeouts()).await;
        drop(peer);

        let mut buf = [0u8; 64];
        let err = conn.read_chunk(&mut buf).await.unwrap_err();
        assert!(err.is_end_of_stream());
    }

    #[tokio::test]
    async fn test_silent_peer_times_out() {
        let (mut conn, _peer) = connected_pair(short_timeouts()).await;

        let mut buf = [0u8; 64];
        let err = conn.read_chunk(&mut buf).await.unwrap_err();
        assert!(matches!(err, TransientError::ReadTimedOut(_)));
    }
}
