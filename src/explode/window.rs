//! Sliding window holding the most recently produced bytes
//!
//! The window doubles as the output buffer: bytes are written to the sink in
//! batches whenever the window wraps around or is flushed explicitly.

use crate::{DbcError, DictionarySize, Result};
use std::io::Write;

/// Circular buffer sized by the stream's dictionary code
#[derive(Debug)]
pub struct SlidingWindow {
    buff: Vec<u8>,
    next: usize,
    pending: usize,
    produced: u64,
}

impl SlidingWindow {
    /// Create an empty window for the given dictionary size
    pub fn new(dict_size: DictionarySize) -> Self {
        Self {
            buff: vec![0; dict_size.window_size()],
            next: 0,
            pending: 0,
            produced: 0,
        }
    }

    /// Window capacity in bytes
    pub fn capacity(&self) -> usize {
        self.buff.len()
    }

    /// Total bytes produced since the window was created
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// Append one byte, writing the window out when it wraps
    pub fn push<W: Write + ?Sized>(&mut self, byte: u8, sink: &mut W) -> Result<()> {
        self.buff[self.next] = byte;
        self.next += 1;
        self.produced += 1;

        if self.next == self.buff.len() {
            // Reset before writing so a failed write is never sent again
            let pending = self.pending;
            self.next = 0;
            self.pending = 0;
            sink.write_all(&self.buff[pending..])
                .map_err(DbcError::Output)?;
        }
        Ok(())
    }

    /// Copy `length` bytes starting `distance` bytes back.
    ///
    /// Bytes are copied one at a time in output order, so a distance shorter
    /// than the length repeats the bytes produced earlier in this same copy.
    pub fn copy_match<W: Write + ?Sized>(
        &mut self,
        distance: u32,
        length: u32,
        sink: &mut W,
    ) -> Result<()> {
        let capacity = self.capacity();
        if distance == 0 || distance as u64 > self.produced || distance as usize > capacity {
            return Err(DbcError::DistanceTooFar {
                distance,
                available: self.produced,
            });
        }

        let distance = distance as usize;
        for _ in 0..length {
            let from = (self.next + capacity - distance) % capacity;
            let byte = self.buff[from];
            self.push(byte, sink)?;
        }
        Ok(())
    }

    /// Write out every byte not yet handed to the sink
    pub fn flush<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<()> {
        if self.next > self.pending {
            let pending = self.pending;
            self.pending = self.next;
            sink.write_all(&self.buff[pending..self.next])
                .map_err(DbcError::Output)?;
        }
        Ok(())
    }
}
