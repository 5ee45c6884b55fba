//! Relay Engine

use std::convert::Infallible;
use std::sync::Arc;

use tracing::{debug, trace};

use super::{Chunk, RelayStats};
use crate::config::RelayConfig;
use crate::connection::Connection;
use crate::connector::Connector;
use crate::endpoint::Endpoint;
use crate::error::{FatalError, TransientError};

/// One-directional relay from a source endpoint to a destination endpoint.
///
/// The loop is strictly sequential: a chunk is read from the source and
/// written to the destination before the next read starts, so bytes arrive
/// in the order they were produced and no two writes ever overlap.
///
/// Broken-pipe signals must be ignored before running the relay (see
/// [`crate::signal::ignore_broken_pipe`]), otherwise a write to a closed
/// destination could kill the process instead of failing.
pub struct Relay {
    source: Endpoint,
    destination: Endpoint,
    connector: Connector,
    chunk_size: usize,
    stats: Arc<RelayStats>,
}

impl Relay {
    /// Create a new relay. A zero `chunk_size` is raised to 1.
    pub fn new(source: Endpoint, destination: Endpoint, connector: Connector, chunk_size: usize) -> Self {
        Self {
            source,
            destination,
            connector,
            chunk_size: chunk_size.max(1),
            stats: Arc::new(RelayStats::new()),
        }
    }

    /// Create a new relay from configuration
    pub fn from_config(source: Endpoint, destination: Endpoint, config: &RelayConfig) -> Self {
        Self::new(source, destination, Connector::from_config(config), config.chunk_size)
    }

    /// Counters shared with the running loop
    pub fn stats(&self) -> Arc<RelayStats> {
        Arc::clone(&self.stats)
    }

    /// Relay until the process is terminated.
    ///
    /// Only returns if a connection can never be established as configured.
    pub async fn run(self) -> Result<Infallible, FatalError> {
        // Destination first, so whatever the source produces has somewhere to go
        let mut destination = self.connect_destination().await?;
        let mut source = self.connect_source().await?;
        let mut chunk = Chunk::with_capacity(self.chunk_size);

        loop {
            let n = match source.read_chunk(chunk.spare()).await {
                Ok(n) => n,
                Err(e) => {
                    log_source_failure(&source, &e);
                    drop(source);
                    source = self.connect_source().await?;
                    continue;
                }
            };
            chunk.set_filled(n);

            match destination.write_chunk(chunk.filled()).await {
                Ok(()) => {
                    self.stats.add_relayed(n);
                    trace!("Relayed {} bytes to {}", n, destination.endpoint());
                }
                Err(e) => {
                    self.stats.add_dropped();
                    debug!(
                        "Write to destination {} failed, dropping {} bytes and reconnecting: {}",
                        destination.endpoint(),
                        n,
                        e
                    );
                    drop(destination);
                    destination = self.connect_destination().await?;
                }
            }
        }
    }

    async fn connect_source(&self) -> Result<Connection, FatalError> {
        let conn = self.connector.connect(&self.source).await?;
        self.stats.add_source_connection();
        Ok(conn)
    }

    async fn connect_destination(&self) -> Result<Connection, FatalError> {
        let conn = self.connector.connect(&self.destination).await?;
        self.stats.add_destination_connection();
        debug!(
            "Destination connections: {}, chunks relayed: {}, dropped: {}",
            self.stats.destination_connections(),
            self.stats.chunks_relayed(),
            self.stats.chunks_dropped()
        );
        Ok(conn)
    }
}

fn log_source_failure(source: &Connection, err: &TransientError) {
    if err.is_end_of_stream() {
        debug!("Source {} closed the connection, reconnecting", source.endpoint());
    } else {
        debug!("Read from source {} failed, reconnecting: {}", source.endpoint(), err);
    }
}
