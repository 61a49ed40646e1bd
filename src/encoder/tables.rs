use crate::encoder::modes::Mode;
use crate::models::{ECLevel, Version};

/// Codeword layout of one (version, level) symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcBlockInfo {
    /// Number of Reed-Solomon blocks
    pub num_blocks: usize,
    /// EC codewords in each block
    pub ecc_per_block: usize,
    /// Data codewords, counting the final 4-bit codeword of M1/M3 as one
    pub data_codewords: usize,
    /// Data and EC codewords of the symbol
    pub total_codewords: usize,
    /// Data capacity in bits
    pub data_bits: usize,
}

impl EcBlockInfo {
    /// EC codewords of the symbol
    pub fn ecc_codewords(&self) -> usize {
        self.num_blocks * self.ecc_per_block
    }

    /// Whether the last data codeword only carries 4 bits (M1 and M3)
    pub fn has_half_codeword(&self) -> bool {
        self.data_bits % 8 != 0
    }
}

// ISO/IEC 18004 Model 2 tables, as laid out by the Nayuki QR Code generator.
// Index: [ec_level][version]
const ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

const NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Total codewords per QR Code version (index 0 unused)
const TOTAL_CODEWORDS: [u16; 41] = [
    0, 26, 44, 70, 100, 134, 172, 196, 242, 292, 346, 404, 466, 532, 581, 655, 733, 815, 901, 991,
    1085, 1156, 1258, 1364, 1474, 1588, 1706, 1828, 1921, 2051, 2185, 2323, 2465, 2611, 2761,
    2876, 3034, 3196, 3362, 3532, 3706,
];

/// Micro QR Code layout: (version, level, data bits, data codewords, ec codewords)
const MICRO_CAPACITY: [(u8, Option<ECLevel>, u16, u8, u8); 8] = [
    (1, None, 20, 3, 2),
    (2, Some(ECLevel::L), 40, 5, 5),
    (2, Some(ECLevel::M), 32, 4, 6),
    (3, Some(ECLevel::L), 84, 11, 6),
    (3, Some(ECLevel::M), 68, 9, 8),
    (4, Some(ECLevel::L), 128, 16, 8),
    (4, Some(ECLevel::M), 112, 14, 10),
    (4, Some(ECLevel::Q), 80, 10, 14),
];

/// Codeword layout for a symbol, `None` if the pair is not a valid symbol
pub fn ec_block_info(version: Version, level: Option<ECLevel>) -> Option<EcBlockInfo> {
    match version {
        Version::Micro(v) => MICRO_CAPACITY
            .iter()
            .find(|(mv, ml, ..)| *mv == v && *ml == level)
            .map(|&(_, _, bits, data, ecc)| EcBlockInfo {
                num_blocks: 1,
                ecc_per_block: ecc as usize,
                data_codewords: data as usize,
                total_codewords: (data + ecc) as usize,
                data_bits: bits as usize,
            }),
        Version::Model2(v) => {
            if !(1..=40).contains(&v) {
                return None;
            }
            let idx = level?.index();
            let ecc = ECC_CODEWORDS_PER_BLOCK[idx][v as usize];
            let blocks = NUM_ERROR_CORRECTION_BLOCKS[idx][v as usize];
            if ecc <= 0 || blocks <= 0 {
                return None;
            }
            let total = TOTAL_CODEWORDS[v as usize] as usize;
            let data = total - ecc as usize * blocks as usize;
            Some(EcBlockInfo {
                num_blocks: blocks as usize,
                ecc_per_block: ecc as usize,
                data_codewords: data,
                total_codewords: total,
                data_bits: data * 8,
            })
        }
    }
}

/// Micro QR Code symbol number used in the format information
pub fn micro_symbol_number(version: Version, level: Option<ECLevel>) -> Option<u8> {
    if !version.is_micro() {
        return None;
    }
    MICRO_CAPACITY
        .iter()
        .position(|(mv, ml, ..)| *mv == version.number() && *ml == level)
        .map(|i| i as u8)
}

/// Number of modules available for data and EC codewords (including
/// remainder bits) in a QR Code symbol
#[cfg(test)]
pub(crate) fn raw_data_modules(version: u8) -> usize {
    let v = version as usize;
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    result
}

/// Character count indicator widths, [mode][bracket] with brackets
/// M1, M2, M3, M4, 1-9, 10-26, 27-40. Zero means the mode is unavailable.
const CHAR_COUNT_BITS: [[u8; 7]; 4] = [
    [3, 4, 5, 6, 10, 12, 14], // Numeric
    [0, 3, 4, 5, 9, 11, 13],  // Alphanumeric
    [0, 0, 4, 5, 8, 16, 16],  // Byte
    [0, 0, 3, 4, 8, 10, 12],  // Kanji
];

/// Mode indicator widths per bracket
const MODE_INDICATOR_BITS: [u8; 7] = [0, 1, 2, 3, 4, 4, 4];

/// Terminator widths per bracket
const TERMINATOR_BITS: [u8; 7] = [3, 5, 7, 9, 4, 4, 4];

/// Character count indicator width, `None` if `mode` is not available in
/// the bracket
pub fn char_count_bits(mode: Mode, bracket: usize) -> Option<usize> {
    match CHAR_COUNT_BITS[mode.index()][bracket] {
        0 => None,
        bits => Some(bits as usize),
    }
}

/// Mode indicator width: 0 for M1, 1-3 for M2-M4, 4 for QR Codes
pub fn mode_indicator_bits(bracket: usize) -> usize {
    MODE_INDICATOR_BITS[bracket] as usize
}

/// Terminator width: 3, 5, 7, 9 for M1-M4 and 4 for QR Codes
pub fn terminator_bits(bracket: usize) -> usize {
    TERMINATOR_BITS[bracket] as usize
}

/// Alignment pattern centres per version (index 0 unused)
const ALIGNMENT_PATTERN_POSITIONS: [&[u8]; 41] = [
    &[],
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

/// Alignment pattern centres for a QR Code version
pub fn alignment_pattern_positions(version: u8) -> &'static [u8] {
    ALIGNMENT_PATTERN_POSITIONS
        .get(version as usize)
        .copied()
        .unwrap_or(&[])
}

/// Registered ECI designators by canonical (lowercase) encoding name
const ECI_DESIGNATORS: [(&str, u32); 28] = [
    ("cp437", 2),
    ("iso-8859-1", 3),
    ("iso-8859-2", 4),
    ("iso-8859-3", 5),
    ("iso-8859-4", 6),
    ("iso-8859-5", 7),
    ("iso-8859-6", 8),
    ("iso-8859-7", 9),
    ("iso-8859-8", 10),
    ("iso-8859-9", 11),
    ("iso-8859-10", 12),
    ("iso-8859-11", 13),
    ("iso-8859-13", 15),
    ("iso-8859-14", 16),
    ("iso-8859-15", 17),
    ("iso-8859-16", 18),
    ("shift_jis", 20),
    ("windows-1250", 21),
    ("windows-1251", 22),
    ("windows-1252", 23),
    ("windows-1256", 24),
    ("utf-16be", 25),
    ("utf-8", 26),
    ("us-ascii", 27),
    ("big5", 28),
    ("gb18030", 29),
    ("euc-kr", 30),
    ("iso-8859-8-i", 10),
];

/// ECI designator for a canonical encoding name
pub fn eci_designator(encoding: &str) -> Option<u32> {
    ECI_DESIGNATORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(encoding))
        .map(|&(_, designator)| designator)
}
