//! dbc2dbf - Rust converter for DATASUS DBC files
//!
//! DATASUS, the Brazilian health ministry's data service, publishes its
//! tabular datasets as `.dbc` files: DBF files whose record area has been
//! compressed with the PKWare Data Compression Library ("implode"). This crate
//! rebuilds the plain `.dbf` file by copying the container header verbatim and
//! exploding the compressed payload.
//!
//! # Features
//!
//! - Bit-exact PKWare DCL explode, binary and ASCII literal modes
//! - Dictionary sizes: 1KB, 2KB, and 4KB
//! - Streaming API via Read/Write traits, constant memory use
//! - Detection of trailing data left after the compressed stream
//! - Optional concurrent batch conversion (`async` feature)
//!
//! # Example - File conversion
//!
//! ```no_run
//! let report = dbc2dbf::convert("DOSP2021.dbc", "DOSP2021.dbf")?;
//! if report.has_trailing_data() {
//!     eprintln!("warning: {} leftover bytes", report.trailing_bytes);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Example - Streaming
//!
//! ```no_run
//! use dbc2dbf::DbcReader;
//! use std::io::Read;
//!
//! // Read the DBF bytes without writing an intermediate file
//! let mut reader = DbcReader::open("DOSP2021.dbc")?;
//! let mut dbf = Vec::new();
//! reader.read_to_end(&mut dbf)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Example - Raw PKWare streams
//!
//! ```
//! // "AIAIAIAIAIAIA", binary literals, 1KB dictionary
//! let compressed = [0x00, 0x04, 0x82, 0x24, 0x25, 0x8f, 0x80, 0x7f];
//! let decompressed = dbc2dbf::explode_bytes(&compressed)?;
//! assert_eq!(decompressed, b"AIAIAIAIAIAIA");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod common;
pub mod container;
pub mod error;
pub mod explode;
pub mod integrity;
pub mod tables;

// Async modules (only available with async feature)
#[cfg(feature = "async")]
pub mod async_batch;

// Re-export commonly used types
pub use common::{
    CompressionMode, DbcError, DecodeStats, DictionarySize, Result, CHECKSUM_SIZE,
    IN_CHUNK_SIZE, PREAMBLE_SIZE,
};
pub use container::{
    convert_stream, decompress_to_tempfile, decompress_to_vec, output_path_for,
    ConversionReport, DbcHeader, DbcReader,
};
pub use explode::{explode, ExplodeReader};

// Re-export async types when async feature is enabled
#[cfg(feature = "async")]
pub use async_batch::{AsyncBatchConverter, BatchOutcome};

// Convenience functions

/// Convert a DBC container into a DBF file
///
/// # Arguments
/// * `input_path` - The `.dbc` file to read
/// * `output_path` - The `.dbf` file to create (truncated if it exists)
///
/// # Returns
/// A report of the conversion; leftover input after the compressed stream is
/// reported in it rather than as an error
pub fn convert<P: AsRef<std::path::Path>, Q: AsRef<std::path::Path>>(
    input_path: P,
    output_path: Q,
) -> Result<ConversionReport> {
    container::convert(input_path, output_path)
}

/// Decompress a raw PKWare DCL stream held in memory
///
/// # Arguments
/// * `data` - The compressed data, starting with the literal flag byte
///
/// # Returns
/// A vector containing the decompressed data
pub fn explode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    explode::explode_bytes(data)
}
