/// BCH codes protecting format and version information
pub struct BchEncoder;

/// Generator of the (15,5) format information code
pub const FORMAT_GENERATOR: u32 = 0x537;
/// Generator of the (18,6) version information code
pub const VERSION_GENERATOR: u32 = 0x1F25;

/// Mask applied to QR Code format information
const FORMAT_MASK: u32 = 0x5412;
/// Mask applied to Micro QR Code format information
const MICRO_FORMAT_MASK: u32 = 0x4445;

impl BchEncoder {
    /// `data` followed by the remainder of `data * x^deg(g)` modulo `g`
    pub fn encode(data: u32, generator: u32) -> u32 {
        let degree = 31 - generator.leading_zeros();
        let mut rem = data;
        for _ in 0..degree {
            rem = (rem << 1) ^ ((rem >> (degree - 1)) * generator);
        }
        data << degree | rem
    }

    /// 15-bit QR Code format information for 5 data bits
    pub fn format(data: u8) -> u16 {
        (Self::encode(data as u32 & 0x1F, FORMAT_GENERATOR) ^ FORMAT_MASK) as u16
    }

    /// 15-bit Micro QR Code format information for 5 data bits
    pub fn micro_format(data: u8) -> u16 {
        (Self::encode(data as u32 & 0x1F, FORMAT_GENERATOR) ^ MICRO_FORMAT_MASK) as u16
    }

    /// 18-bit version information (versions 7-40)
    pub fn version(version: u8) -> u32 {
        Self::encode(version as u32 & 0x3F, VERSION_GENERATOR)
    }
}
