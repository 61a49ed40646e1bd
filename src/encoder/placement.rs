/// Data placement into the symbol following the zigzag pattern
use crate::encoder::function_mask::FunctionMask;
use crate::models::BitMatrix;

/// Places codeword bits into the data modules
pub struct DataPlacer;

impl DataPlacer {
    /// Place `bits` MSB first into the data modules of `matrix`, starting at
    /// the bottom-right corner and moving in two-column strips. Data modules
    /// left over after the last bit (remainder bits) stay light.
    pub fn place(matrix: &mut BitMatrix, func: &FunctionMask, bits: &[bool]) {
        let dimension = func.size();
        let skip_timing = !func.version().is_micro();
        let mut bits = bits.iter().copied();

        let mut upward = true;
        let mut col = dimension as i32 - 1;

        while col > 0 {
            if skip_timing && col == 6 {
                col -= 1;
                continue;
            }

            for step in 0..dimension {
                let row = if upward { dimension - 1 - step } else { step };
                for x in [col as usize, col as usize - 1] {
                    if !func.is_function(x, row) {
                        matrix.set(x, row, bits.next().unwrap_or(false));
                    }
                }
            }

            upward = !upward;
            col -= 2;
        }
    }

    /// Expand codewords into placement bits. The data codeword at
    /// `half_data_index` only contributes its high nibble.
    pub fn codeword_bits(
        data: &[u8],
        ecc: &[u8],
        half_data_index: Option<usize>,
    ) -> Vec<bool> {
        let mut bits = Vec::with_capacity((data.len() + ecc.len()) * 8);
        for (i, &byte) in data.iter().chain(ecc).enumerate() {
            let width = if Some(i) == half_data_index { 4 } else { 8 };
            for b in (8 - width..8).rev() {
                bits.push((byte >> b) & 1 == 1);
            }
        }
        bits
    }
}
