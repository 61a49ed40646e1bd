use crate::encoder::bch::BchEncoder;
use crate::encoder::tables;
use crate::models::{BitMatrix, Version};

/// Function patterns of a symbol.
///
/// `modules` holds the stamped pattern values, `mask` marks every function
/// module (true = function, false = data). Format areas are reserved and
/// left light; the version information is drawn since it does not depend on
/// the mask.
#[derive(Debug, Clone)]
pub struct FunctionMask {
    modules: BitMatrix,
    mask: BitMatrix,
    version: Version,
}

impl FunctionMask {
    /// Draw the function patterns of `version`
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let mut this = Self {
            modules: BitMatrix::new(size),
            mask: BitMatrix::new(size),
            version,
        };
        if version.is_micro() {
            this.draw_micro();
        } else {
            this.draw_full(version.number());
        }
        this
    }

    fn draw_full(&mut self, version: u8) {
        let size = self.size();

        // Timing patterns (row 6 and column 6)
        for i in 0..size {
            self.set_function(6, i, i % 2 == 0);
            self.set_function(i, 6, i % 2 == 0);
        }

        // Finder patterns + separators, clipped to bounds
        self.draw_finder(3, 3);
        self.draw_finder(size - 4, 3);
        self.draw_finder(3, size - 4);

        // Alignment patterns, skipping the three finder corners
        let align = tables::alignment_pattern_positions(version);
        let last = align.len().saturating_sub(1);
        for (i, &cx) in align.iter().enumerate() {
            for (j, &cy) in align.iter().enumerate() {
                let corner = (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
                if !corner {
                    self.draw_alignment(cx as usize, cy as usize);
                }
            }
        }

        // Format info areas
        for i in 0..9 {
            if i != 6 {
                self.set_function(8, i, false);
                self.set_function(i, 8, false);
            }
        }
        for i in 0..8 {
            self.set_function(size - 1 - i, 8, false);
            self.set_function(8, size - 1 - i, false);
        }

        // Dark module
        self.set_function(8, size - 8, true);

        // Version info (v7+)
        if version >= 7 {
            let bits = BchEncoder::version(version);
            for i in 0..18 {
                let bit = (bits >> i) & 1 == 1;
                let a = size - 11 + i % 3;
                let b = i / 3;
                self.set_function(a, b, bit);
                self.set_function(b, a, bit);
            }
        }
    }

    fn draw_micro(&mut self) {
        let size = self.size();

        // Timing patterns along the top row and left column
        for i in 8..size {
            self.set_function(i, 0, i % 2 == 0);
            self.set_function(0, i, i % 2 == 0);
        }

        self.draw_finder(3, 3);

        // Format info area next to the finder
        for i in 1..=8 {
            self.set_function(8, i, false);
            self.set_function(i, 8, false);
        }
    }

    /// 7x7 finder centred at (x, y) with its light separator
    fn draw_finder(&mut self, x: usize, y: usize) {
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let xx = x as i32 + dx;
                let yy = y as i32 + dy;
                if xx < 0 || yy < 0 || xx >= self.size() as i32 || yy >= self.size() as i32 {
                    continue;
                }
                let dist = dx.abs().max(dy.abs());
                self.set_function(xx as usize, yy as usize, dist != 2 && dist != 4);
            }
        }
    }

    /// 5x5 alignment pattern centred at (x, y)
    fn draw_alignment(&mut self, x: usize, y: usize) {
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                let dark = dx.abs().max(dy.abs()) != 1;
                self.set_function((x as i32 + dx) as usize, (y as i32 + dy) as usize, dark);
            }
        }
    }

    fn set_function(&mut self, x: usize, y: usize, dark: bool) {
        self.modules.set(x, y, dark);
        self.mask.set(x, y, true);
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        self.mask.size()
    }

    /// Version the patterns were drawn for
    pub fn version(&self) -> Version {
        self.version
    }

    /// Whether (x, y) belongs to a function pattern
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    /// Stamped function pattern values, data modules light
    pub fn modules(&self) -> &BitMatrix {
        &self.modules
    }

    /// Modules left for codeword bits, remainder bits included
    pub fn data_modules_count(&self) -> usize {
        let size = self.size();
        size * size - self.mask.count_dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_modules_match_raw_capacity() {
        for v in 1..=40u8 {
            let func = FunctionMask::new(Version::Model2(v));
            assert_eq!(func.data_modules_count(), tables::raw_data_modules(v), "version {v}");
        }
    }

    #[test]
    fn test_micro_data_modules() {
        // total codewords * 8, minus 4 for the half codeword of M1 and M3
        let expected = [36, 80, 132, 192];
        for v in 1..=4u8 {
            let func = FunctionMask::new(Version::Micro(v));
            assert_eq!(func.data_modules_count(), expected[v as usize - 1], "M{v}");
        }
    }

    #[test]
    fn test_finder_and_timing() {
        let func = FunctionMask::new(Version::Model2(1));
        let m = func.modules();
        assert!(m.get(0, 0));
        assert!(!m.get(1, 1));
        assert!(m.get(3, 3));
        assert!(!m.get(7, 7));
        assert!(m.get(20, 0));
        assert!(m.get(8, 6));
        assert!(!m.get(9, 6));
        assert!(m.get(8, 13));
        assert!(func.is_function(8, 0));
        assert!(!func.is_function(9, 9));
    }

    #[test]
    fn test_micro_layout() {
        let func = FunctionMask::new(Version::Micro(2));
        let m = func.modules();
        assert!(m.get(0, 0));
        assert!(m.get(8, 0));
        assert!(!m.get(9, 0));
        assert!(m.get(12, 0));
        assert!(m.get(0, 12));
        assert!(func.is_function(8, 8));
        assert!(func.is_function(1, 8));
        assert!(!func.is_function(9, 9));
        assert!(!func.is_function(12, 12));
    }

    #[test]
    fn test_version_info_blocks() {
        let func = FunctionMask::new(Version::Model2(7));
        let size = func.size();
        let bits = BchEncoder::version(7);
        for i in 0..18 {
            let bit = (bits >> i) & 1 == 1;
            assert_eq!(func.modules().get(size - 11 + i % 3, i / 3), bit);
            assert_eq!(func.modules().get(i / 3, size - 11 + i % 3), bit);
        }
    }
}
