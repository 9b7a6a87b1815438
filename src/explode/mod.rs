//! PKWare DCL explode (decompression)
//!
//! This module decodes the imploded payload of a DBC container. The engine is
//! split into a bit reader, the shared code tables, a sliding window and the
//! decoder state machine, and is exposed both as a push-style function
//! writing to any [`Write`] sink and as a pull-style [`ExplodeReader`].

mod bits;
mod decoder;
mod reader;
mod window;

pub use bits::BitReader;
pub use decoder::{DecodeStatus, Decoder};
pub use reader::ExplodeReader;
pub use window::SlidingWindow;

use crate::{DecodeStats, Result};
use std::io::{Read, Write};

/// Minimum number of bytes decoded per ExplodeReader refill
pub const OUT_BATCH_SIZE: usize = 0x1000;

/// Decompress a PKWare DCL stream from `reader` into `writer`
pub fn explode<R: Read, W: Write + ?Sized>(reader: R, writer: &mut W) -> Result<DecodeStats> {
    let mut bits = BitReader::new(reader);
    explode_bits(&mut bits, writer)
}

/// Decompress from an existing bit reader, leaving it positioned after the
/// end-of-stream code
pub fn explode_bits<R: Read, W: Write + ?Sized>(
    bits: &mut BitReader<R>,
    writer: &mut W,
) -> Result<DecodeStats> {
    let mut decoder = Decoder::new(bits)?;
    decoder.finish(bits, writer)?;
    Ok(decoder.stats(bits))
}

/// Convenience function to decompress data in memory
pub fn explode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    explode(data, &mut output)?;
    Ok(output)
}
