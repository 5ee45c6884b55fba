//! Relay Statistics

use std::sync::atomic::{AtomicU64, Ordering};

/// In-process counters describing what the relay loop has done.
#[derive(Debug, Default)]
pub struct RelayStats {
    source_connections: AtomicU64,
    destination_connections: AtomicU64,
    chunks_relayed: AtomicU64,
    bytes_relayed: AtomicU64,
    chunks_dropped: AtomicU64,
}

impl RelayStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connections established to the source, including the first one
    pub fn source_connections(&self) -> u64 {
        self.source_connections.load(Ordering::Relaxed)
    }

    /// Connections established to the destination, including the first one
    pub fn destination_connections(&self) -> u64 {
        self.destination_connections.load(Ordering::Relaxed)
    }

    pub fn chunks_relayed(&self) -> u64 {
        self.chunks_relayed.load(Ordering::Relaxed)
    }

    pub fn bytes_relayed(&self) -> u64 {
        self.bytes_relayed.load(Ordering::Relaxed)
    }

    /// Chunks read from the source but lost to a failed destination write
    pub fn chunks_dropped(&self) -> u64 {
        self.chunks_dropped.load(Ordering::Relaxed)
    }

    pub(crate) fn add_source_connection(&self) {
        self.source_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_destination_connection(&self) {
        self.destination_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_relayed(&self, bytes: usize) {
        self.chunks_relayed.fetch_add(1, Ordering::Relaxed);
        self.bytes_relayed.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub(crate) fn add_dropped(&self) {
        self.chunks_dropped.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = RelayStats::new();
        assert_eq!(stats.bytes_relayed(), 0);

        stats.add_source_connection();
        stats.add_destination_connection();
        stats.add_destination_connection();
        stats.add_relayed(1024);
        stats.add_relayed(976);
        stats.add_dropped();

        assert_eq!(stats.source_connections(), 1);
        assert_eq!(stats.destination_connections(), 2);
        assert_eq!(stats.chunks_relayed(), 2);
        assert_eq!(stats.bytes_relayed(), 2000);
        assert_eq!(stats.chunks_dropped(), 1);
    }
}
