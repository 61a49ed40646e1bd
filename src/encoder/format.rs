/// Format information placement
use crate::encoder::bch::BchEncoder;
use crate::encoder::tables;
use crate::models::{BitMatrix, ECLevel, Version};

/// Format info is 15 bits (5 data + 10 ECC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Symbol version
    pub version: Version,
    /// `None` for M1
    pub ec_level: Option<ECLevel>,
    /// Mask index within the symbol class
    pub mask: u8,
}

impl FormatInfo {
    /// Format information of a symbol
    pub fn new(version: Version, ec_level: Option<ECLevel>, mask: u8) -> Self {
        Self {
            version,
            ec_level,
            mask,
        }
    }

    /// The 15 masked format bits
    pub fn bits(&self) -> u16 {
        if self.version.is_micro() {
            let symbol = tables::micro_symbol_number(self.version, self.ec_level).unwrap_or(0);
            BchEncoder::micro_format(symbol << 2 | (self.mask & 0x03))
        } else {
            let level = self.ec_level.map_or(0, |l| l.format_bits());
            BchEncoder::format(level << 3 | (self.mask & 0x07))
        }
    }

    /// Write the format bits into the reserved areas
    pub fn draw(&self, matrix: &mut BitMatrix) {
        let bits = self.bits();
        let bit = |i: usize| (bits >> i) & 1 == 1;
        let size = matrix.size();

        if self.version.is_micro() {
            for i in 0..8 {
                matrix.set(8, i + 1, bit(i));
            }
            for i in 8..15 {
                matrix.set(15 - i, 8, bit(i));
            }
            return;
        }

        // First copy around the top-left finder
        for i in 0..6 {
            matrix.set(8, i, bit(i));
        }
        matrix.set(8, 7, bit(6));
        matrix.set(8, 8, bit(7));
        matrix.set(7, 8, bit(8));
        for i in 9..15 {
            matrix.set(14 - i, 8, bit(i));
        }

        // Second copy split between the other finders
        for i in 0..8 {
            matrix.set(size - 1 - i, 8, bit(i));
        }
        for i in 8..15 {
            matrix.set(8, size - 15 + i, bit(i));
        }
        matrix.set(8, size - 8, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Read the first copy back, MSB first
    fn read_top_left(matrix: &BitMatrix) -> u16 {
        let mut bits = 0u16;
        for i in 0..15 {
            let (x, y) = match i {
                0..=5 => (8, i),
                6 => (8, 7),
                7 => (8, 8),
                8 => (7, 8),
                _ => (14 - i, 8),
            };
            bits |= (matrix.get(x, y) as u16) << i;
        }
        bits
    }

    #[test]
    fn test_full_format_copies_agree() {
        let version = Version::Model2(2);
        let info = FormatInfo::new(version, Some(ECLevel::M), 5);
        let mut matrix = BitMatrix::new(version.size());
        info.draw(&mut matrix);
        assert_eq!(read_top_left(&matrix), 0b100_0000_1100_1110);

        let size = version.size();
        let mut second = 0u16;
        for i in 0..8 {
            second |= (matrix.get(size - 1 - i, 8) as u16) << i;
        }
        for i in 8..15 {
            second |= (matrix.get(8, size - 15 + i) as u16) << i;
        }
        assert_eq!(second, info.bits());
        assert!(matrix.get(8, size - 8));
    }

    #[test]
    fn test_micro_format_bits() {
        let info = FormatInfo::new(Version::Micro(1), None, 1);
        assert_eq!(info.bits(), 0x4172);
        let m4q = FormatInfo::new(Version::Micro(4), Some(ECLevel::Q), 3);
        assert_eq!(m4q.bits(), BchEncoder::micro_format(0b111_11));
    }

    #[test]
    fn test_micro_format_placement() {
        let version = Version::Micro(3);
        let info = FormatInfo::new(version, Some(ECLevel::L), 2);
        let mut matrix = BitMatrix::new(version.size());
        info.draw(&mut matrix);
        let bits = info.bits();
        for i in 0..8 {
            assert_eq!(matrix.get(8, i + 1), (bits >> i) & 1 == 1);
        }
        for i in 8..15 {
            assert_eq!(matrix.get(15 - i, 8), (bits >> i) & 1 == 1);
        }
        assert_eq!(matrix.count_dark(), bits.count_ones() as usize);
    }
}
