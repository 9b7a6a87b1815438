//! DbcReader - streaming view of the converted DBF file
//!
//! Yields the container header followed by the exploded payload through the
//! Read trait, so a DBF record reader can consume a DBC file directly without
//! an intermediate file.

use super::header::DbcHeader;
use crate::explode::ExplodeReader;
use crate::{DbcError, DecodeStats, Result};
use log::warn;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

/// Read adapter producing the DBF bytes of a DBC container
#[derive(Debug)]
pub struct DbcReader<R: Read> {
    header: DbcHeader,
    header_pos: usize,
    body: ExplodeReader<R>,
}

impl DbcReader<File> {
    /// Open the container at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DbcError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(file).map_err(|e| match e {
            DbcError::Io(source) => DbcError::File {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }
}

impl<R: Read + Seek> DbcReader<R> {
    /// Parse the container header from `reader` and prepare the payload
    pub fn new(mut reader: R) -> Result<Self> {
        let header = DbcHeader::read(&mut reader)?;
        Ok(Self {
            header,
            header_pos: 0,
            body: ExplodeReader::new(reader),
        })
    }
}

impl<R: Read> DbcReader<R> {
    /// The container header
    pub fn header(&self) -> &DbcHeader {
        &self.header
    }

    /// Decoder statistics so far
    pub fn stats(&self) -> DecodeStats {
        self.body.stats()
    }

    /// Whether the whole payload has been decoded
    pub fn is_finished(&self) -> bool {
        self.body.is_finished()
    }

    /// Count input bytes left after the compressed stream.
    ///
    /// Only meaningful once the reader has returned end of file; logs a
    /// warning when leftover bytes are found.
    pub fn trailing_bytes(&mut self) -> Result<u64> {
        let trailing = self.body.trailing_bytes()?;
        if trailing > 0 {
            warn!(
                "there are {} leftover bytes after decompression: check file integrity",
                trailing
            );
        }
        Ok(trailing)
    }
}

impl<R: Read> Read for DbcReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.header_pos < self.header.bytes.len() {
            let remaining = &self.header.bytes[self.header_pos..];
            let to_copy = buf.len().min(remaining.len());
            buf[..to_copy].copy_from_slice(&remaining[..to_copy]);
            self.header_pos += to_copy;
            return Ok(to_copy);
        }

        self.body.read(buf)
    }
}
