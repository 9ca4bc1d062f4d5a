use crate::{FrameError, Framer};

/// Longest encoded frame accepted before the buffer is discarded.
pub const MAX_ENCODED_LEN: usize = 64;

pub struct CobsFramer {
    buffer: Vec<u8>,
    overflowed: bool,
}

impl CobsFramer {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(MAX_ENCODED_LEN),
            overflowed: false,
        }
    }

    /// Bytes of an unfinished frame still waiting for their delimiter.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for CobsFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer for CobsFramer {
    fn push(&mut self, bytes: &[u8]) -> Vec<Result<Vec<u8>, FrameError>> {
        let mut frames = Vec::new();

        for &b in bytes {
            // COBS uses 0x00 as delimiter
            if b == 0x00 {
                if self.overflowed {
                    frames.push(Err(FrameError::Oversized(MAX_ENCODED_LEN)));
                } else if !self.buffer.is_empty() {
                    frames.push(cobs::decode_vec(&self.buffer).map_err(|_| FrameError::Cobs));
                }
                self.buffer.clear();
                self.overflowed = false;
            } else if self.buffer.len() >= MAX_ENCODED_LEN {
                // Keep swallowing until the next delimiter resynchronizes us
                self.overflowed = true;
            } else {
                self.buffer.push(b);
            }
        }

        frames
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.overflowed = false;
    }

    fn name(&self) -> &'static str {
        "COBS"
    }
}
