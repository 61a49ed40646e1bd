/// Numeric mode encoder (Mode 0001)
/// Groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
use crate::encoder::bitstream::BitBuffer;

/// Numeric mode payload writer
pub struct NumericEncoder;

impl NumericEncoder {
    /// ASCII digit
    pub fn is_valid(byte: u8) -> bool {
        byte.is_ascii_digit()
    }

    /// Payload bits for `count` digits
    pub fn bit_len(count: usize) -> usize {
        10 * (count / 3)
            + match count % 3 {
                2 => 7,
                1 => 4,
                _ => 0,
            }
    }

    /// Append ASCII digits to the bitstream
    pub fn encode(digits: &[u8], buf: &mut BitBuffer) {
        for group in digits.chunks(3) {
            let value = group
                .iter()
                .fold(0u32, |acc, &d| acc * 10 + (d - b'0') as u32);
            let bits = match group.len() {
                3 => 10,
                2 => 7,
                _ => 4,
            };
            buf.append_bits(value, bits);
        }
    }
}
