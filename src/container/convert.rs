//! DBC to DBF conversion
//!
//! The output file is the verbatim container header followed by the exploded
//! payload. The checksum is carried in the report but never verified.

use super::header::DbcHeader;
use crate::explode::{BitReader, Decoder};
use crate::integrity::count_trailing;
use crate::{CompressionMode, DbcError, DecodeStats, DictionarySize, Result};
use log::{debug, warn};
use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Summary of a finished conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// Length of the header copied to the output
    pub header_length: u16,
    /// Checksum stored in the container (not verified)
    pub checksum: u32,
    /// Literal encoding of the payload
    pub mode: CompressionMode,
    /// Dictionary size of the payload
    pub dict_size: DictionarySize,
    /// Decoder statistics
    pub stats: DecodeStats,
    /// Input bytes left after the end-of-stream code
    pub trailing_bytes: u64,
}

impl ConversionReport {
    /// Total size of the written output
    pub fn output_len(&self) -> u64 {
        self.header_length as u64 + self.stats.bytes_out
    }

    /// Whether the input continued past the end of the compressed stream
    pub fn has_trailing_data(&self) -> bool {
        self.trailing_bytes > 0
    }

    /// Treat leftover input as an error
    pub fn strict(self) -> Result<Self> {
        if self.has_trailing_data() {
            Err(DbcError::TrailingData(self.trailing_bytes))
        } else {
            Ok(self)
        }
    }
}

/// Convert a container read from `reader`, writing the DBF file to `writer`
pub fn convert_stream<R: Read + Seek, W: Write>(
    mut reader: R,
    mut writer: W,
) -> Result<ConversionReport> {
    let header = DbcHeader::read(&mut reader)?;
    writer.write_all(&header.bytes).map_err(DbcError::Output)?;

    let mut bits = BitReader::new(reader);
    let mut decoder = Decoder::new(&mut bits)?;
    decoder.finish(&mut bits, &mut writer)?;
    writer.flush().map_err(DbcError::Output)?;

    let stats = decoder.stats(&bits);
    let trailing_bytes = count_trailing(&mut bits)?;
    if trailing_bytes > 0 {
        warn!(
            "there are {} leftover bytes after decompression: check file integrity",
            trailing_bytes
        );
    }

    debug!(
        "converted {} compressed bytes into {} bytes ({} literals, {} matches)",
        stats.bytes_in, stats.bytes_out, stats.literal_count, stats.match_count
    );

    Ok(ConversionReport {
        header_length: header.header_length,
        checksum: header.checksum,
        mode: decoder.mode(),
        dict_size: decoder.dict_size(),
        stats,
        trailing_bytes,
    })
}

/// Convert the container at `input_path` into a DBF file at `output_path`
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
) -> Result<ConversionReport> {
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();

    let input = open_input(input_path)?;
    let output = File::create(output_path).map_err(|source| DbcError::File {
        path: output_path.to_path_buf(),
        source,
    })?;

    convert_stream(input, BufWriter::new(output))
        .map_err(|e| e.with_paths(input_path, output_path))
}

/// Decompress a container into memory
pub fn decompress_to_vec<P: AsRef<Path>>(input_path: P) -> Result<(Vec<u8>, ConversionReport)> {
    let input_path = input_path.as_ref();
    let input = open_input(input_path)?;

    let mut output = Cursor::new(Vec::new());
    let report = convert_stream(input, &mut output).map_err(|e| match e {
        DbcError::Io(source) => DbcError::File {
            path: input_path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    Ok((output.into_inner(), report))
}

/// Decompress a container into a temporary file, rewound to its start.
///
/// The file is removed when the returned handle is dropped.
pub fn decompress_to_tempfile<P: AsRef<Path>>(
    input_path: P,
) -> Result<(NamedTempFile, ConversionReport)> {
    let input_path = input_path.as_ref();
    let input = open_input(input_path)?;

    let mut temp = NamedTempFile::new()?;
    let temp_path = temp.path().to_path_buf();
    let report = convert_stream(input, BufWriter::new(temp.as_file_mut()))
        .map_err(|e| e.with_paths(input_path, &temp_path))?;
    temp.rewind()?;
    Ok((temp, report))
}

/// DBF path for a container: same stem, `.dbf` extension, placed in `dir`
/// (or next to the input when `dir` is `None`)
pub fn output_path_for(input_path: &Path, dir: Option<&Path>) -> PathBuf {
    let file_name = input_path.with_extension("dbf");
    match (dir, file_name.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => file_name,
    }
}

fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| DbcError::File {
        path: path.to_path_buf(),
        source,
    })
}
