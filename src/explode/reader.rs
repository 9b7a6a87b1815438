//! ExplodeReader - Streaming decompression reader
//!
//! This module implements the ExplodeReader that provides a Read interface
//! over a PKWare DCL stream, driving the decoder one batch at a time.

use super::{bits::BitReader, decoder::DecodeStatus, decoder::Decoder, OUT_BATCH_SIZE};
use crate::integrity::count_trailing;
use crate::{DbcError, DecodeStats, Result};
use std::io::{self, Read};

/// Streaming decompression reader implementing Read trait
#[derive(Debug)]
pub struct ExplodeReader<R: Read> {
    bits: BitReader<R>,
    decoder: Option<Decoder>,
    finished: bool,
    error: Option<DbcError>,
    failed: Option<(io::ErrorKind, String)>,
    output_buffer: Vec<u8>,
    output_pos: usize,
}

impl<R: Read> ExplodeReader<R> {
    /// Create a new ExplodeReader; the stream header is read on first use
    pub fn new(reader: R) -> Self {
        Self {
            bits: BitReader::new(reader),
            decoder: None,
            finished: false,
            error: None,
            failed: None,
            output_buffer: Vec::with_capacity(OUT_BATCH_SIZE),
            output_pos: 0,
        }
    }

    /// Whether the end-of-stream code has been decoded
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Statistics of the stream decoded so far
    pub fn stats(&self) -> DecodeStats {
        match &self.decoder {
            Some(decoder) => decoder.stats(&self.bits),
            None => DecodeStats {
                bytes_in: self.bits.bytes_in(),
                ..DecodeStats::default()
            },
        }
    }

    /// Count the input bytes left after the end-of-stream code.
    ///
    /// Consumes the rest of the underlying reader. Returns 0 when the stream
    /// has not been decoded to the end yet.
    pub fn trailing_bytes(&mut self) -> Result<u64> {
        if !self.finished {
            return Ok(0);
        }
        count_trailing(&mut self.bits)
    }

    /// Decode the next batch into the output buffer
    fn expand(&mut self) -> Result<()> {
        let decoder = match &mut self.decoder {
            Some(decoder) => decoder,
            None => self.decoder.insert(Decoder::new(&mut self.bits)?),
        };

        self.output_buffer.clear();
        self.output_pos = 0;

        while self.output_buffer.len() < OUT_BATCH_SIZE {
            match decoder.step(&mut self.bits, &mut self.output_buffer) {
                Ok(DecodeStatus::Continue) => {}
                Ok(DecodeStatus::Finished) => {
                    self.finished = true;
                    break;
                }
                Err(e) => {
                    // Hand out what was decoded before reporting the error
                    decoder.flush(&mut self.output_buffer)?;
                    self.error = Some(e);
                    return Ok(());
                }
            }
        }

        decoder.flush(&mut self.output_buffer)
    }
}

impl<R: Read> Read for ExplodeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            // A fatal error ends the stream for good
            if let Some((kind, message)) = &self.failed {
                return Err(io::Error::new(*kind, message.clone()));
            }

            // If we have buffered output, return that first
            if self.output_pos < self.output_buffer.len() {
                let available = self.output_buffer.len() - self.output_pos;
                let to_copy = buf.len().min(available);
                buf[..to_copy].copy_from_slice(
                    &self.output_buffer[self.output_pos..self.output_pos + to_copy],
                );
                self.output_pos += to_copy;
                return Ok(to_copy);
            }

            if let Some(e) = self.error.take() {
                let err: io::Error = e.into();
                self.failed = Some((err.kind(), err.to_string()));
                return Err(err);
            }

            if self.finished {
                return Ok(0);
            }

            if let Err(e) = self.expand() {
                let err: io::Error = e.into();
                self.failed = Some((err.kind(), err.to_string()));
                return Err(err);
            }
        }
    }
}
