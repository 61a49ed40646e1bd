/// Alphanumeric mode encoder (Mode 0010)
/// Alphanumeric character set: 0-9, A-Z, space, $%*+-./:
use crate::encoder::bitstream::BitBuffer;

const ALPHANUMERIC_TABLE: [u8; 45] = *b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Pairs = 11 bits, single = 6 bits
pub struct AlphanumericEncoder;

impl AlphanumericEncoder {
    /// Index of `byte` in the alphanumeric table
    pub fn value(byte: u8) -> Option<u32> {
        ALPHANUMERIC_TABLE
            .iter()
            .position(|&c| c == byte)
            .map(|i| i as u32)
    }

    /// Whether `byte` is in the alphanumeric set
    pub fn is_valid(byte: u8) -> bool {
        Self::value(byte).is_some()
    }

    /// Payload bits for `count` characters
    pub fn bit_len(count: usize) -> usize {
        11 * (count / 2) + 6 * (count % 2)
    }

    /// Append alphanumeric characters; callers validate the input first
    pub fn encode(chars: &[u8], buf: &mut BitBuffer) {
        for pair in chars.chunks(2) {
            let values: Vec<u32> = pair.iter().filter_map(|&c| Self::value(c)).collect();
            match values.as_slice() {
                [a, b] => buf.append_bits(a * 45 + b, 11),
                [a] => buf.append_bits(*a, 6),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphanumeric_encode() {
        // "A1" = (10 * 45 + 1) = 451 = 0b00111000011 (11 bits)
        let mut buf = BitBuffer::new();
        AlphanumericEncoder::encode(b"A1", &mut buf);
        let mut expected = BitBuffer::new();
        expected.append_bits(0b00111000011, 11);
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_alphanumeric_odd_length() {
        let mut buf = BitBuffer::new();
        AlphanumericEncoder::encode(b"AC-42", &mut buf);
        assert_eq!(buf.len(), 28);
        assert_eq!(AlphanumericEncoder::bit_len(5), 28);
    }

    #[test]
    fn test_alphanumeric_charset() {
        assert!(AlphanumericEncoder::is_valid(b':'));
        assert!(AlphanumericEncoder::is_valid(b' '));
        assert!(!AlphanumericEncoder::is_valid(b'a'));
        assert!(!AlphanumericEncoder::is_valid(b'#'));
    }
}
