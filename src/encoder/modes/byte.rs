/// Byte mode encoder (Mode 0100) for 8-bit data
use crate::encoder::bitstream::BitBuffer;

/// Byte mode payload writer
pub struct ByteEncoder;

impl ByteEncoder {
    /// Payload bits for `count` bytes
    pub fn bit_len(count: usize) -> usize {
        8 * count
    }

    /// Write `bytes` unchanged
    pub fn encode(bytes: &[u8], buf: &mut BitBuffer) {
        for &byte in bytes {
            buf.append_bits(byte as u32, 8);
        }
    }
}
