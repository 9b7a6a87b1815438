//! LSB-first bit reader over a chunked input
//!
//! Compressed bytes are pulled from the underlying reader in chunks of
//! [`IN_CHUNK_SIZE`] and consumed bit by bit, least significant bit first.

use crate::tables::{Huffman, MAX_CODE_BITS};
use crate::{DbcError, Result, IN_CHUNK_SIZE};
use std::io::{ErrorKind, Read};

/// Bit reader with a small accumulator
#[derive(Debug)]
pub struct BitReader<R> {
    inner: R,
    chunk: Vec<u8>,
    pos: usize,
    len: usize,
    bit_buff: u32,
    bit_count: u32,
    bytes_in: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new bit reader
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            chunk: vec![0; IN_CHUNK_SIZE],
            pos: 0,
            len: 0,
            bit_buff: 0,
            bit_count: 0,
            bytes_in: 0,
        }
    }

    /// Load the next chunk; an empty read means the input is exhausted
    fn refill(&mut self) -> Result<()> {
        let read = loop {
            match self.inner.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(DbcError::Io(e)),
            }
        };
        if read == 0 {
            return Err(DbcError::OutOfInput);
        }
        self.pos = 0;
        self.len = read;
        Ok(())
    }

    fn next_byte(&mut self) -> Result<u8> {
        if self.pos >= self.len {
            self.refill()?;
        }
        let byte = self.chunk[self.pos];
        self.pos += 1;
        self.bytes_in += 1;
        Ok(byte)
    }

    /// Consume and return the next `need` bits (at most 24)
    pub fn bits(&mut self, need: u32) -> Result<u32> {
        debug_assert!(need <= 24);

        let mut val = self.bit_buff;
        while self.bit_count < need {
            val |= (self.next_byte()? as u32) << self.bit_count;
            self.bit_count += 8;
        }

        self.bit_buff = val >> need;
        self.bit_count -= need;
        Ok(val & ((1u32 << need) - 1))
    }

    /// Consume the next 8 bits as a byte
    pub fn read_byte(&mut self) -> Result<u8> {
        Ok(self.bits(8)? as u8)
    }

    /// Decode one symbol of a canonical Huffman table.
    ///
    /// The format stores codes with every bit inverted, most significant bit
    /// first, so each stream bit is flipped before it is appended to the code.
    pub fn decode(&mut self, table: &Huffman) -> Result<u16> {
        let mut code = 0i32;
        let mut first = 0i32;
        let mut index = 0i32;

        for len in 1..=MAX_CODE_BITS {
            code |= (self.bits(1)? ^ 1) as i32;
            let count = table.count(len) as i32;
            if code - first < count {
                return table
                    .symbol((index + code - first) as usize)
                    .ok_or(DbcError::InvalidCode);
            }
            index += count;
            first += count;
            first <<= 1;
            code <<= 1;
        }

        Err(DbcError::InvalidCode)
    }
}

impl<R> BitReader<R> {
    /// Compressed bytes consumed so far
    pub fn bytes_in(&self) -> u64 {
        self.bytes_in
    }

    /// Bytes loaded from the input but not consumed yet
    pub fn buffered(&self) -> &[u8] {
        &self.chunk[self.pos..self.len]
    }

    /// Drop the buffered bytes, returning how many there were
    pub fn discard_buffered(&mut self) -> usize {
        let count = self.len - self.pos;
        self.pos = self.len;
        count
    }

    /// Mutable access to the underlying reader
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }
}
