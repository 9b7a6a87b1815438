//! Post-decode integrity check
//!
//! A well-formed container ends exactly at the end-of-stream code. Anything
//! left over usually means the file was damaged in transfer (for example
//! downloaded in text mode) even though it decoded.

use crate::explode::BitReader;
use crate::Result;
use std::io::{self, Read};

/// Count the bytes left in the input after decoding.
///
/// Unread bytes still buffered by the bit reader are included; the unused
/// bits of the last consumed byte are not. The underlying reader is drained.
pub fn count_trailing<R: Read>(bits: &mut BitReader<R>) -> Result<u64> {
    let buffered = bits.discard_buffered() as u64;
    let rest = io::copy(bits.get_mut(), &mut io::sink())?;
    Ok(buffered + rest)
}
