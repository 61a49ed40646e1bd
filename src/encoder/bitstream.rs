/// Bitstream construction: segment headers, payloads, terminator and padding
use crate::encoder::modes::{
    AlphanumericEncoder, ByteEncoder, KanjiEncoder, Mode, NumericEncoder,
};
use crate::encoder::segment::Segment;
use crate::encoder::tables::{self, EcBlockInfo};
use crate::models::Version;

/// Mode indicator for an ECI header (QR Codes only)
const ECI_MODE_INDICATOR: u32 = 0b0111;

/// Pad codewords appended alternately after the terminator
const PAD_CODEWORDS: [u8; 2] = [0xEC, 0x11];

/// Append-only MSB-first bit sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bits: Vec<bool>,
}

impl BitBuffer {
    /// Empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer with room for `bits` bits
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: Vec::with_capacity(bits),
        }
    }

    /// Number of bits written
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether no bit was written yet
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Append the low `len` bits of `value`, most significant first
    pub fn append_bits(&mut self, value: u32, len: usize) {
        debug_assert!(len <= 32 && (len == 32 || value >> len == 0));
        for i in (0..len).rev() {
            self.bits.push((value >> i) & 1 == 1);
        }
    }

    /// Append a single bit
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Pack into bytes; a trailing partial byte is filled with zero low bits
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &bit)| acc | ((bit as u8) << (7 - i)))
            })
            .collect()
    }
}

/// Bits needed for the ECI header of a designator (mode indicator included)
pub fn eci_header_bits(designator: u32) -> usize {
    4 + match designator {
        0..=127 => 8,
        128..=16383 => 16,
        _ => 24,
    }
}

fn append_eci_header(buf: &mut BitBuffer, designator: u32) {
    buf.append_bits(ECI_MODE_INDICATOR, 4);
    match designator {
        0..=127 => buf.append_bits(designator, 8),
        128..=16383 => buf.append_bits(0b10 << 14 | designator, 16),
        _ => buf.append_bits(0b110 << 21 | (designator & 0x1F_FFFF), 24),
    }
}

/// Write a segment: optional ECI header, mode indicator, character count
/// and payload. Returns `None` if the mode or count does not fit `version`.
fn append_segment(buf: &mut BitBuffer, segment: &Segment, version: Version) -> Option<()> {
    let bracket = version.bracket();
    let count_bits = tables::char_count_bits(segment.mode(), bracket)?;
    if segment.char_count() >> count_bits != 0 {
        return None;
    }
    if let Some(designator) = segment.eci() {
        append_eci_header(buf, designator);
    }
    let indicator = if version.is_micro() {
        segment.mode().micro_indicator()
    } else {
        segment.mode().indicator()
    };
    buf.append_bits(indicator, tables::mode_indicator_bits(bracket));
    buf.append_bits(segment.char_count() as u32, count_bits);
    match segment.mode() {
        Mode::Numeric => NumericEncoder::encode(segment.data(), buf),
        Mode::Alphanumeric => AlphanumericEncoder::encode(segment.data(), buf),
        Mode::Byte => ByteEncoder::encode(segment.data(), buf),
        Mode::Kanji => KanjiEncoder::encode(segment.data(), buf),
    }
    Some(())
}

/// Build the data codewords for `segments` in the given symbol.
///
/// The final codeword of M1 and M3 symbols carries its 4 bits in the high
/// nibble.
///
/// # Panics
/// If the segments do not fit. The version selector guarantees they do.
pub fn build_data_codewords(segments: &[Segment], version: Version, info: &EcBlockInfo) -> Vec<u8> {
    let capacity = info.data_bits;
    let mut buf = BitBuffer::with_capacity(capacity);
    for segment in segments {
        if append_segment(&mut buf, segment, version).is_none() {
            panic!(
                "segment {:?} cannot be encoded in version {version}",
                segment.mode()
            );
        }
    }
    assert!(
        buf.len() <= capacity,
        "data bits {} exceed capacity {capacity} of version {version}",
        buf.len()
    );

    let terminator = tables::terminator_bits(version.bracket()).min(capacity - buf.len());
    buf.append_bits(0, terminator);

    let boundary = buf.len().div_ceil(8) * 8;
    while buf.len() < boundary.min(capacity) {
        buf.push(false);
    }

    for &pad in PAD_CODEWORDS.iter().cycle() {
        if buf.len() + 8 > capacity {
            break;
        }
        buf.append_bits(pad as u32, 8);
    }
    // Zero nibble of the last M1/M3 codeword
    while buf.len() < capacity {
        buf.push(false);
    }

    let codewords = buf.to_bytes();
    debug_assert_eq!(codewords.len(), info.data_codewords);
    codewords
}
