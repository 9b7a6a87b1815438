//! Test helpers: a minimal PKWare DCL stream writer and DBC container builder
//!
//! The writer emits exactly the tokens it is given (no match finding), which
//! is enough to build streams exercising every decoder path.

#![allow(dead_code)]

use dbc2dbf::tables::{
    expand_code_lengths, DISTANCE_CODE_LENGTHS, END_OF_STREAM_LENGTH, LENGTH_BASE,
    LENGTH_CODE_LENGTHS, LENGTH_EXTRA_BITS, LITERAL_CODE_LENGTHS, MAX_CODE_BITS,
};
use dbc2dbf::{CompressionMode, DictionarySize};

/// One decoded unit of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A single byte
    Literal(u8),
    /// Copy `length` bytes from `distance` bytes back
    Match { length: u32, distance: u32 },
}

/// Expected output of a token sequence
pub fn expand_tokens(tokens: &[Token]) -> Vec<u8> {
    let mut out = Vec::new();
    for token in tokens {
        match *token {
            Token::Literal(b) => out.push(b),
            Token::Match { length, distance } => {
                for _ in 0..length {
                    out.push(out[out.len() - distance as usize]);
                }
            }
        }
    }
    out
}

/// Canonical codes (code, bit length) per symbol
fn canonical_codes(compact: &[u8]) -> Vec<(u32, u32)> {
    let lengths = expand_code_lengths(compact);
    let mut codes = vec![(0u32, 0u32); lengths.len()];
    let mut code = 0u32;
    for len in 1..=MAX_CODE_BITS as u8 {
        for (symbol, &l) in lengths.iter().enumerate() {
            if l == len {
                codes[symbol] = (code, len as u32);
                code += 1;
            }
        }
        code <<= 1;
    }
    codes
}

/// LSB-first bit writer
#[derive(Debug, Default)]
pub struct BitWriter {
    out: Vec<u8>,
    acc: u32,
    count: u32,
}

impl BitWriter {
    pub fn put(&mut self, value: u32, bits: u32) {
        for i in 0..bits {
            self.acc |= ((value >> i) & 1) << self.count;
            self.count += 1;
            if self.count == 8 {
                self.out.push(self.acc as u8);
                self.acc = 0;
                self.count = 0;
            }
        }
    }

    /// Write a Huffman code most significant bit first, every bit inverted
    pub fn put_code(&mut self, (code, len): (u32, u32)) {
        for i in (0..len).rev() {
            self.put(((code >> i) & 1) ^ 1, 1);
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        if self.count > 0 {
            self.out.push(self.acc as u8);
        }
        self.out
    }
}

/// Token encoder for one stream
pub struct StreamWriter {
    mode: CompressionMode,
    dict_size: DictionarySize,
    bits: BitWriter,
    literal: Vec<(u32, u32)>,
    length: Vec<(u32, u32)>,
    distance: Vec<(u32, u32)>,
}

impl StreamWriter {
    pub fn new(mode: CompressionMode, dict_size: DictionarySize) -> Self {
        let mut bits = BitWriter::default();
        bits.put(mode as u32, 8);
        bits.put(dict_size.bits() as u32, 8);
        Self {
            mode,
            dict_size,
            bits,
            literal: canonical_codes(&LITERAL_CODE_LENGTHS),
            length: canonical_codes(&LENGTH_CODE_LENGTHS),
            distance: canonical_codes(&DISTANCE_CODE_LENGTHS),
        }
    }

    pub fn literal(&mut self, byte: u8) {
        self.bits.put(0, 1);
        match self.mode {
            CompressionMode::Binary => self.bits.put(byte as u32, 8),
            CompressionMode::Ascii => self.bits.put_code(self.literal[byte as usize]),
        }
    }

    fn length(&mut self, length: u32) {
        let symbol = (0..LENGTH_BASE.len())
            .find(|&s| {
                let base = LENGTH_BASE[s] as u32;
                length >= base && length < base + (1 << LENGTH_EXTRA_BITS[s])
            })
            .expect("length out of range");
        self.bits.put(1, 1);
        self.bits.put_code(self.length[symbol]);
        self.bits.put(
            length - LENGTH_BASE[symbol] as u32,
            LENGTH_EXTRA_BITS[symbol] as u32,
        );
    }

    pub fn copy(&mut self, length: u32, distance: u32) {
        self.length(length);
        let low_bits = if length == 2 {
            2
        } else {
            self.dict_size.bits() as u32
        };
        let d = distance - 1;
        self.bits.put_code(self.distance[(d >> low_bits) as usize]);
        self.bits.put(d & ((1 << low_bits) - 1), low_bits);
    }

    pub fn token(&mut self, token: Token) {
        match token {
            Token::Literal(b) => self.literal(b),
            Token::Match { length, distance } => self.copy(length, distance),
        }
    }

    /// Append the end-of-stream code and return the stream bytes
    pub fn finish(mut self) -> Vec<u8> {
        self.length(END_OF_STREAM_LENGTH);
        self.bits.finish()
    }

    /// Return the stream without an end-of-stream code
    pub fn finish_unterminated(self) -> Vec<u8> {
        self.bits.finish()
    }
}

/// Encode a whole token sequence
pub fn encode(mode: CompressionMode, dict_size: DictionarySize, tokens: &[Token]) -> Vec<u8> {
    let mut writer = StreamWriter::new(mode, dict_size);
    for &token in tokens {
        writer.token(token);
    }
    writer.finish()
}

/// Store `data` as literals only
pub fn encode_literals(mode: CompressionMode, dict_size: DictionarySize, data: &[u8]) -> Vec<u8> {
    let tokens: Vec<Token> = data.iter().map(|&b| Token::Literal(b)).collect();
    encode(mode, dict_size, &tokens)
}

/// A DBF-like header of `len` bytes (at least 10) with the length field set
pub fn dbf_header(len: u16) -> Vec<u8> {
    assert!(len >= 10);
    let mut header: Vec<u8> = (0..len).map(|i| (i as u8).wrapping_mul(31)).collect();
    header[0] = 0x03;
    header[8..10].copy_from_slice(&len.to_le_bytes());
    header
}

/// Assemble a DBC container: header, checksum, payload
pub fn dbc_container(header: &[u8], checksum: u32, payload: &[u8]) -> Vec<u8> {
    let mut data = header.to_vec();
    data.extend_from_slice(&checksum.to_le_bytes());
    data.extend_from_slice(payload);
    data
}
