//! Data mode encoders
//!
//! - Numeric: digits 0-9, three per 10 bits
//! - Alphanumeric: 0-9, A-Z, space and $%*+-./:, two per 11 bits
//! - Byte: 8 bits per byte in any character encoding
//! - Kanji: Shift_JIS double-byte characters, 13 bits each

use std::fmt;
use std::str::FromStr;

use crate::error::QrError;

/// 0-9, A-Z, space and `$%*+-./:`
pub mod alphanumeric;
/// Raw 8-bit data
pub mod byte;
/// Shift JIS double-byte characters
pub mod kanji;
/// Decimal digits
pub mod numeric;

pub use alphanumeric::AlphanumericEncoder;
pub use byte::ByteEncoder;
pub use kanji::KanjiEncoder;
pub use numeric::NumericEncoder;

/// Data encoding mode of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Three digits per 10 bits
    Numeric,
    /// Two characters per 11 bits
    Alphanumeric,
    /// One byte per 8 bits
    Byte,
    /// One Shift JIS character per 13 bits
    Kanji,
}

impl Mode {
    /// All modes, narrowest first
    pub const ALL: [Mode; 4] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte, Mode::Kanji];

    /// Table index, also the Micro QR Code mode indicator value
    pub fn index(&self) -> usize {
        match self {
            Mode::Numeric => 0,
            Mode::Alphanumeric => 1,
            Mode::Byte => 2,
            Mode::Kanji => 3,
        }
    }

    /// 4-bit QR Code mode indicator
    pub fn indicator(&self) -> u32 {
        match self {
            Mode::Numeric => 0b0001,
            Mode::Alphanumeric => 0b0010,
            Mode::Byte => 0b0100,
            Mode::Kanji => 0b1000,
        }
    }

    /// Micro QR Code mode indicator value (written with 0-3 bits)
    pub fn micro_indicator(&self) -> u32 {
        self.index() as u32
    }

    /// Lowercase mode name
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Numeric => "numeric",
            Mode::Alphanumeric => "alphanumeric",
            Mode::Byte => "byte",
            Mode::Kanji => "kanji",
        }
    }

    /// Payload bits for `count` characters (bytes for byte mode)
    pub fn payload_bits(&self, count: usize) -> usize {
        match self {
            Mode::Numeric => NumericEncoder::bit_len(count),
            Mode::Alphanumeric => AlphanumericEncoder::bit_len(count),
            Mode::Byte => ByteEncoder::bit_len(count),
            Mode::Kanji => KanjiEncoder::bit_len(count),
        }
    }

    /// Whether every character of `other` can also be written in `self`
    /// (numeric < alphanumeric < byte, kanji < byte)
    pub fn includes(&self, other: Mode) -> bool {
        match (self, other) {
            (a, b) if *a == b => true,
            (Mode::Alphanumeric, Mode::Numeric) => true,
            (Mode::Byte, _) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numeric" => Ok(Mode::Numeric),
            "alphanumeric" => Ok(Mode::Alphanumeric),
            "byte" => Ok(Mode::Byte),
            "kanji" => Ok(Mode::Kanji),
            _ => Err(QrError::mode(format!("unknown mode \"{s}\""))),
        }
    }
}
