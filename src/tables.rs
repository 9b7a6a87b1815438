//! Static Huffman tables of the PKWare DCL format
//!
//! Code lengths are stored in the compact run-length form used by the format
//! description: each byte holds a bit length in its low nibble and a repeat
//! count minus one in its high nibble. The tables are expanded once into
//! canonical decoding tables and shared read-only by every decoder.

use std::sync::OnceLock;

/// Longest code in any of the tables
pub const MAX_CODE_BITS: usize = 13;

/// Length value reserved for the end of the compressed stream
pub const END_OF_STREAM_LENGTH: u32 = 519;

/// Shortest match length
pub const MIN_MATCH_LENGTH: u32 = 2;

/// Code lengths of the 256 literal symbols (ASCII mode)
pub const LITERAL_CODE_LENGTHS: [u8; 98] = [
    11, 124, 8, 7, 28, 7, 188, 13, 76, 4, 10, 8, 12, 10, 12, 10, 8, 23, 8, 9, 7, 6, 7, 8, 7, 6,
    55, 8, 23, 24, 12, 11, 7, 9, 11, 12, 6, 7, 22, 5, 7, 24, 6, 11, 9, 6, 7, 22, 7, 11, 38, 7, 9,
    8, 25, 11, 8, 11, 9, 12, 8, 12, 5, 38, 5, 38, 5, 11, 7, 5, 6, 21, 6, 10, 53, 8, 7, 24, 10, 27,
    44, 253, 253, 253, 252, 252, 252, 13, 12, 45, 12, 45, 12, 61, 12, 45, 44, 173,
];

/// Code lengths of the 16 length symbols
pub const LENGTH_CODE_LENGTHS: [u8; 6] = [2, 35, 36, 53, 38, 23];

/// Code lengths of the 64 distance symbols
pub const DISTANCE_CODE_LENGTHS: [u8; 7] = [2, 20, 53, 230, 247, 151, 248];

/// Base match length of each length symbol
pub const LENGTH_BASE: [u16; 16] = [3, 2, 4, 5, 6, 7, 8, 9, 10, 12, 16, 24, 40, 72, 136, 264];

/// Extra raw bits following each length symbol
pub const LENGTH_EXTRA_BITS: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8];

/// Expand a compact code length table into one bit length per symbol
pub fn expand_code_lengths(compact: &[u8]) -> Vec<u8> {
    let mut lengths = Vec::new();
    for &rep in compact {
        let repeat = (rep >> 4) as usize + 1;
        lengths.resize(lengths.len() + repeat, rep & 0x0F);
    }
    lengths
}

/// Canonical Huffman decoding table
///
/// `count[len]` is the number of codes of each bit length and `symbol` lists the
/// symbols ordered by code length, then by symbol value.
#[derive(Debug, Clone)]
pub struct Huffman {
    count: [u16; MAX_CODE_BITS + 1],
    symbol: Vec<u16>,
}

impl Huffman {
    /// Build a decoding table from per-symbol bit lengths (0 = unused symbol)
    pub fn from_lengths(lengths: &[u8]) -> Self {
        let mut count = [0u16; MAX_CODE_BITS + 1];
        for &len in lengths {
            count[len as usize] += 1;
        }

        let mut offsets = [0u16; MAX_CODE_BITS + 1];
        for len in 1..MAX_CODE_BITS {
            offsets[len + 1] = offsets[len] + count[len];
        }

        let used = lengths.iter().filter(|&&len| len != 0).count();
        let mut symbol = vec![0u16; used];
        for (sym, &len) in lengths.iter().enumerate() {
            if len != 0 {
                symbol[offsets[len as usize] as usize] = sym as u16;
                offsets[len as usize] += 1;
            }
        }

        Self { count, symbol }
    }

    /// Build a decoding table from a compact code length table
    pub fn from_compact(compact: &[u8]) -> Self {
        Self::from_lengths(&expand_code_lengths(compact))
    }

    /// Number of codes of the given bit length
    pub fn count(&self, len: usize) -> u16 {
        self.count[len]
    }

    /// Symbol at a position of the canonical ordering
    pub fn symbol(&self, index: usize) -> Option<u16> {
        self.symbol.get(index).copied()
    }

    /// Number of symbols with a code
    pub fn symbols(&self) -> usize {
        self.symbol.len()
    }

    /// Unused code space, counted in codes of the longest length: 0 for a
    /// complete code, positive for an incomplete one, negative when the
    /// lengths over-subscribe the code space
    pub fn code_space_left(&self) -> i32 {
        let mut left = 1i32;
        for len in 1..=MAX_CODE_BITS {
            left <<= 1;
            left -= self.count[len] as i32;
            if left < 0 {
                return left;
            }
        }
        left
    }
}

/// The three decoding tables of the format
#[derive(Debug)]
pub struct CodeTables {
    /// Literal byte table (ASCII mode only)
    pub literal: Huffman,
    /// Match length table
    pub length: Huffman,
    /// Match distance table
    pub distance: Huffman,
}

static CODE_TABLES: OnceLock<CodeTables> = OnceLock::new();

/// Shared decoding tables, built on first use
pub fn code_tables() -> &'static CodeTables {
    CODE_TABLES.get_or_init(|| CodeTables {
        literal: Huffman::from_compact(&LITERAL_CODE_LENGTHS),
        length: Huffman::from_compact(&LENGTH_CODE_LENGTHS),
        distance: Huffman::from_compact(&DISTANCE_CODE_LENGTHS),
    })
}
