//! Explode state machine
//!
//! Decodes literal and match symbols from a [`BitReader`] into a
//! [`SlidingWindow`], one symbol per [`Decoder::step`].

use super::{bits::BitReader, window::SlidingWindow};
use crate::tables::{
    code_tables, CodeTables, END_OF_STREAM_LENGTH, LENGTH_BASE, LENGTH_EXTRA_BITS,
    MIN_MATCH_LENGTH,
};
use crate::{CompressionMode, DbcError, DecodeStats, DictionarySize, Result};
use log::debug;
use std::io::{Read, Write};

/// Low-order distance bits stored raw for two-byte matches
const SHORT_DISTANCE_BITS: u32 = 2;

/// Outcome of a single decode step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// A literal or match was decoded; more symbols follow
    Continue,
    /// The end-of-stream code was decoded
    Finished,
}

/// Decoder for one PKWare DCL stream
#[derive(Debug)]
pub struct Decoder {
    mode: CompressionMode,
    dict_size: DictionarySize,
    window: SlidingWindow,
    tables: &'static CodeTables,
    literal_count: usize,
    match_count: usize,
    longest_match: usize,
    finished: bool,
}

impl Decoder {
    /// Read the two stream header bytes and set up an empty window
    pub fn new<R: Read>(bits: &mut BitReader<R>) -> Result<Self> {
        let mode = CompressionMode::from_u8(bits.read_byte()?)?;
        let dict_size = DictionarySize::from_bits(bits.read_byte()?)?;

        debug!(
            "explode stream: {:?} literals, {} byte dictionary",
            mode,
            dict_size.window_size()
        );

        Ok(Self {
            mode,
            dict_size,
            window: SlidingWindow::new(dict_size),
            tables: code_tables(),
            literal_count: 0,
            match_count: 0,
            longest_match: 0,
            finished: false,
        })
    }

    /// Literal encoding of the stream
    pub fn mode(&self) -> CompressionMode {
        self.mode
    }

    /// Dictionary size of the stream
    pub fn dict_size(&self) -> DictionarySize {
        self.dict_size
    }

    /// Whether the end-of-stream code has been seen
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Decode one literal or match
    pub fn step<R: Read, W: Write + ?Sized>(
        &mut self,
        bits: &mut BitReader<R>,
        sink: &mut W,
    ) -> Result<DecodeStatus> {
        if self.finished {
            return Ok(DecodeStatus::Finished);
        }

        if bits.bits(1)? == 0 {
            let literal = match self.mode {
                CompressionMode::Binary => bits.read_byte()?,
                CompressionMode::Ascii => bits.decode(&self.tables.literal)? as u8,
            };
            self.window.push(literal, sink)?;
            self.literal_count += 1;
            return Ok(DecodeStatus::Continue);
        }

        let symbol = bits.decode(&self.tables.length)? as usize;
        let length = LENGTH_BASE[symbol] as u32 + bits.bits(LENGTH_EXTRA_BITS[symbol] as u32)?;
        if length == END_OF_STREAM_LENGTH {
            self.finished = true;
            return Ok(DecodeStatus::Finished);
        }

        let low_bits = if length == MIN_MATCH_LENGTH {
            SHORT_DISTANCE_BITS
        } else {
            self.dict_size.bits() as u32
        };
        let distance =
            ((bits.decode(&self.tables.distance)? as u32) << low_bits) + bits.bits(low_bits)? + 1;

        self.window.copy_match(distance, length, sink)?;
        self.match_count += 1;
        self.longest_match = self.longest_match.max(length as usize);
        Ok(DecodeStatus::Continue)
    }

    /// Decode until the end-of-stream code and flush the window.
    ///
    /// On a decode error everything decoded up to the last complete symbol is
    /// still written to the sink before the error is returned.
    pub fn finish<R: Read, W: Write + ?Sized>(
        &mut self,
        bits: &mut BitReader<R>,
        sink: &mut W,
    ) -> Result<()> {
        let decoded = loop {
            match self.step(bits, sink) {
                Ok(DecodeStatus::Continue) => continue,
                Ok(DecodeStatus::Finished) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        match decoded {
            // The sink already failed; nothing more is written to it
            Err(e @ DbcError::Output(_)) => Err(e),
            Err(e) => {
                self.window.flush(sink)?;
                Err(e)
            }
            Ok(()) => self.window.flush(sink),
        }
    }

    /// Write out the decoded bytes still held in the window
    pub fn flush<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<()> {
        self.window.flush(sink)
    }

    /// Statistics of the stream decoded so far
    pub fn stats<R>(&self, bits: &BitReader<R>) -> DecodeStats {
        DecodeStats {
            literal_count: self.literal_count,
            match_count: self.match_count,
            longest_match: self.longest_match,
            bytes_out: self.window.produced(),
            bytes_in: bits.bytes_in(),
        }
    }
}
