//! DATASUS DBC container handling
//!
//! A DBC file is a DBF file whose record area has been imploded with the
//! PKWare Data Compression Library. This module parses the container header
//! and drives the explode engine to rebuild the DBF file.

mod convert;
mod header;
mod reader;

pub use convert::{
    convert, convert_stream, decompress_to_tempfile, decompress_to_vec, output_path_for,
    ConversionReport,
};
pub use header::DbcHeader;
pub use reader::DbcReader;
