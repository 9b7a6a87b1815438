//! DBC container header
//!
//! The container starts with the header of the DBF file it holds. Bytes 8..10
//! carry the header length (little endian, counted from the start of the
//! file), the header is followed by a 4-byte checksum and then by the imploded
//! record data.

use crate::{DbcError, Result, CHECKSUM_SIZE, PREAMBLE_SIZE};
use log::debug;
use std::io::{ErrorKind, Read, Seek, SeekFrom};

/// Parsed container header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbcHeader {
    /// Declared header length
    pub header_length: u16,
    /// Raw checksum following the header (not verified)
    pub checksum: u32,
    /// Header bytes, copied verbatim to the output
    pub bytes: Vec<u8>,
}

impl DbcHeader {
    /// Read the header and checksum, leaving `reader` at the start of the
    /// compressed payload
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let container_length = reader.seek(SeekFrom::End(0))?;

        reader.seek(SeekFrom::Start(PREAMBLE_SIZE))?;
        let mut raw_length = [0u8; 2];
        read_exact_or_truncated(reader, &mut raw_length, container_length)?;
        let header_length = u16::from_le_bytes(raw_length);

        if header_length as u64 + CHECKSUM_SIZE > container_length {
            return Err(DbcError::MalformedContainer {
                header_length,
                container_length,
            });
        }

        let size = header_length as usize;
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(size)
            .map_err(|_| DbcError::AllocationFailure(size))?;
        bytes.resize(size, 0);

        reader.rewind()?;
        read_exact_or_truncated(reader, &mut bytes, container_length)?;

        let mut raw_checksum = [0u8; CHECKSUM_SIZE as usize];
        read_exact_or_truncated(reader, &mut raw_checksum, container_length)?;
        let checksum = u32::from_le_bytes(raw_checksum);

        debug!(
            "dbc header: {} bytes, checksum {:08X}, container {} bytes",
            header_length, checksum, container_length
        );

        Ok(Self {
            header_length,
            checksum,
            bytes,
        })
    }

    /// Offset of the compressed payload in the container
    pub fn payload_offset(&self) -> u64 {
        self.header_length as u64 + CHECKSUM_SIZE
    }
}

fn read_exact_or_truncated<R: Read + Seek>(
    reader: &mut R,
    buf: &mut [u8],
    container_length: u64,
) -> Result<()> {
    let start = reader.stream_position()?;
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(DbcError::TruncatedContainer {
            expected: start + buf.len() as u64,
            actual: container_length,
        }),
        Err(e) => Err(DbcError::Io(e)),
    }
}
