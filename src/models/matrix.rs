/// Compact square bit matrix holding the modules of a symbol.
///
/// `true` is a dark module. Coordinates are `(x, y)` = (column, row).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitMatrix {
    size: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create an all-light matrix of `size` x `size` modules
    pub fn new(size: usize) -> Self {
        let bytes_needed = (size * size).div_ceil(8);
        Self {
            size,
            data: vec![0; bytes_needed],
        }
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get module at (x, y); out of range reads as light
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.size || y >= self.size {
            return false;
        }
        let index = y * self.size + x;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Set module at (x, y); out of range writes are ignored
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.size || y >= self.size {
            return;
        }
        let index = y * self.size + x;
        if value {
            self.data[index / 8] |= 1 << (index % 8);
        } else {
            self.data[index / 8] &= !(1 << (index % 8));
        }
    }

    /// Toggle module at (x, y)
    pub fn toggle(&mut self, x: usize, y: usize) {
        if x >= self.size || y >= self.size {
            return;
        }
        let index = y * self.size + x;
        self.data[index / 8] ^= 1 << (index % 8);
    }

    /// Number of dark modules
    pub fn count_dark(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Row-major copy of the matrix, one `Vec<bool>` per row
    pub fn rows(&self) -> Vec<Vec<bool>> {
        (0..self.size)
            .map(|y| (0..self.size).map(|x| self.get(x, y)).collect())
            .collect()
    }

    /// Build a matrix from row-major rows. All rows must have the same length
    /// as the number of rows.
    pub fn from_rows(rows: &[Vec<bool>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        let mut matrix = Self::new(size);
        for (y, row) in rows.iter().enumerate() {
            for (x, &dark) in row.iter().enumerate() {
                matrix.set(x, y, dark);
            }
        }
        Some(matrix)
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0)
    }
}
