//! Relay Chunk

/// Fixed-capacity buffer carrying one read's worth of bytes to the
/// following write.
#[derive(Debug)]
pub struct Chunk {
    buf: Box<[u8]>,
    len: usize,
}

impl Chunk {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Forget the previous contents and expose the whole buffer for a read.
    pub fn spare(&mut self) -> &mut [u8] {
        self.len = 0;
        &mut self.buf
    }

    /// Record how many bytes the last read placed in the buffer.
    pub fn set_filled(&mut self, len: usize) {
        assert!(len <= self.buf.len(), "chunk overfilled");
        self.len = len;
    }

    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}
