//! Common types and constants for DBC conversion
//!
//! This module defines the core types, constants, and error structures shared by
//! the explode engine and the DBC container layer.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Literal encoding mode of a PKWare DCL stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    /// Binary mode - literals are stored as raw 8-bit values
    Binary = 0,
    /// ASCII mode - literals are Huffman coded
    Ascii = 1,
}

impl CompressionMode {
    /// Create a CompressionMode from the literal flag byte
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(CompressionMode::Binary),
            1 => Ok(CompressionMode::Ascii),
            _ => Err(DbcError::BadLiteralFlag(value)),
        }
    }
}

/// Dictionary (sliding window) size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionarySize {
    /// 1024 bytes (1KB) dictionary
    Size1K = 1024,
    /// 2048 bytes (2KB) dictionary
    Size2K = 2048,
    /// 4096 bytes (4KB) dictionary
    Size4K = 4096,
}

impl DictionarySize {
    /// Number of low-order distance bits stored raw for matches longer than 2
    pub fn bits(&self) -> u8 {
        match self {
            DictionarySize::Size1K => 4, // 64 << 4 = 1024
            DictionarySize::Size2K => 5, // 64 << 5 = 2048
            DictionarySize::Size4K => 6, // 64 << 6 = 4096
        }
    }

    /// Window capacity in bytes
    pub fn window_size(&self) -> usize {
        *self as usize
    }

    /// Create a DictionarySize from the dictionary code byte
    pub fn from_bits(bits: u8) -> Result<Self> {
        match bits {
            4 => Ok(DictionarySize::Size1K),
            5 => Ok(DictionarySize::Size2K),
            6 => Ok(DictionarySize::Size4K),
            _ => Err(DbcError::BadDictionarySize(bits)),
        }
    }
}

/// Error type for DBC conversion
#[derive(Debug, Error)]
pub enum DbcError {
    /// I/O error on an unnamed stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error on a named file
    #[error("I/O error on {}: {source}", path.display())]
    File {
        /// The offending path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// The output sink rejected a write during decompression
    #[error("output error before completing decompression: {0}")]
    Output(#[source] std::io::Error),

    /// Declared header length does not fit in the container
    #[error("malformed container: header length {header_length} + 4 exceeds file size {container_length}")]
    MalformedContainer {
        /// Declared header length
        header_length: u16,
        /// Actual container length in bytes
        container_length: u64,
    },

    /// The container ended inside the preamble or header
    #[error("truncated container: expected {expected} bytes, got {actual}")]
    TruncatedContainer {
        /// Bytes required
        expected: u64,
        /// Bytes available
        actual: u64,
    },

    /// Literal flag byte is not 0 or 1
    #[error("literal flag not zero or one: {0}")]
    BadLiteralFlag(u8),

    /// Dictionary size byte is not 4, 5 or 6
    #[error("dictionary size not in 4..6: {0}")]
    BadDictionarySize(u8),

    /// Compressed stream ended before the end-of-stream code
    #[error("ran out of input before completing decompression")]
    OutOfInput,

    /// Back-reference points before the start of the output
    #[error("distance is too far back: {distance} with only {available} bytes decoded")]
    DistanceTooFar {
        /// Decoded distance (1-based)
        distance: u32,
        /// Bytes produced so far
        available: u64,
    },

    /// Bit sequence matches no code in the table
    #[error("invalid Huffman code in compressed stream")]
    InvalidCode,

    /// Input continues after the end-of-stream code
    #[error("there are {0} leftover bytes from decompression")]
    TrailingData(u64),

    /// Header buffer could not be allocated
    #[error("not enough memory for a {0} byte header")]
    AllocationFailure(usize),
}

impl DbcError {
    /// Attach file paths to stream-level I/O errors.
    ///
    /// Read failures are attributed to `input`, sink failures to `output`.
    /// Format errors are returned unchanged.
    pub fn with_paths(self, input: &Path, output: &Path) -> Self {
        match self {
            DbcError::Io(source) => DbcError::File {
                path: input.to_path_buf(),
                source,
            },
            DbcError::Output(source) => DbcError::File {
                path: output.to_path_buf(),
                source,
            },
            other => other,
        }
    }

    /// Whether the error means the source file is damaged rather than unreadable
    pub fn is_format_error(&self) -> bool {
        !matches!(
            self,
            DbcError::Io(_)
                | DbcError::File { .. }
                | DbcError::Output(_)
                | DbcError::AllocationFailure(_)
        )
    }
}

impl From<DbcError> for std::io::Error {
    fn from(err: DbcError) -> Self {
        use std::io::{Error, ErrorKind};

        match err {
            DbcError::Io(e) | DbcError::Output(e) => e,
            DbcError::OutOfInput => Error::new(ErrorKind::UnexpectedEof, err),
            DbcError::AllocationFailure(_) => Error::new(ErrorKind::OutOfMemory, err),
            other => Error::new(ErrorKind::InvalidData, other),
        }
    }
}

/// Result type alias for DBC operations
pub type Result<T> = std::result::Result<T, DbcError>;

/// Size of the chunks pulled from the compressed input
pub const IN_CHUNK_SIZE: usize = 4096;

/// Length of the unused container preamble
pub const PREAMBLE_SIZE: u64 = 8;

/// Length of the checksum that follows the header
pub const CHECKSUM_SIZE: u64 = 4;

/// Statistics gathered while exploding a stream
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodeStats {
    /// Number of literal bytes decoded
    pub literal_count: usize,
    /// Number of back-reference matches decoded
    pub match_count: usize,
    /// Longest match copied
    pub longest_match: usize,
    /// Total bytes produced
    pub bytes_out: u64,
    /// Compressed bytes pulled from the input
    pub bytes_in: u64,
}
