/// Kanji mode encoder (Mode 1000)
/// Shift_JIS double-byte characters packed into 13 bits each
use crate::encoder::bitstream::BitBuffer;

/// Kanji mode payload writer
pub struct KanjiEncoder;

impl KanjiEncoder {
    /// Whether a Shift_JIS byte pair lies in a kanji mode range
    /// (0x8140-0x9FFC or 0xE040-0xEBBF) with a valid trail byte
    pub fn is_kanji_pair(lead: u8, trail: u8) -> bool {
        let code = u16::from_be_bytes([lead, trail]);
        let in_range = (0x8140..=0x9FFC).contains(&code) || (0xE040..=0xEBBF).contains(&code);
        in_range && (0x40..=0xFC).contains(&trail) && trail != 0x7F
    }

    /// Whether `bytes` is a non-empty run of kanji pairs
    pub fn is_valid(bytes: &[u8]) -> bool {
        !bytes.is_empty()
            && bytes.len() % 2 == 0
            && bytes
                .chunks(2)
                .all(|pair| Self::is_kanji_pair(pair[0], pair[1]))
    }

    /// 13-bit value of a Shift_JIS kanji
    pub fn value(lead: u8, trail: u8) -> u32 {
        let code = u16::from_be_bytes([lead, trail]) as u32;
        let offset = if code <= 0x9FFC { code - 0x8140 } else { code - 0xC140 };
        (offset >> 8) * 0xC0 + (offset & 0xFF)
    }

    /// `count` is the number of characters, not bytes
    pub fn bit_len(count: usize) -> usize {
        13 * count
    }

    /// Write Shift JIS byte pairs, 13 bits each
    pub fn encode(pairs: &[u8], buf: &mut BitBuffer) {
        for pair in pairs.chunks_exact(2) {
            buf.append_bits(Self::value(pair[0], pair[1]), 13);
        }
    }
}
