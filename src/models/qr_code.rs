use std::fmt;
use std::str::FromStr;

use super::BitMatrix;
use crate::encoder::modes::Mode;
use crate::encoder::segment::Segment;
use crate::error::QrError;

/// Symbol version: a Micro QR Code (M1-M4) or a QR Code (1-40)
///
/// Variants are ordered by module count, so `Micro(4) < Model2(1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Version {
    /// Micro QR code (versions M1-M4)
    Micro(u8),
    /// Model 2 QR code (versions 1-40)
    Model2(u8),
}

impl Version {
    /// Smallest QR Code version
    pub const MIN: Version = Version::Model2(1);
    /// Largest QR Code version
    pub const MAX: Version = Version::Model2(40);

    /// Checked QR Code version (1-40)
    pub fn new(number: u8) -> Result<Self, QrError> {
        if (1..=40).contains(&number) {
            Ok(Version::Model2(number))
        } else {
            Err(QrError::version(format!(
                "illegal version {number}, expected 1 .. 40"
            )))
        }
    }

    /// Checked Micro QR Code version (1-4 for M1-M4)
    pub fn micro(number: u8) -> Result<Self, QrError> {
        if (1..=4).contains(&number) {
            Ok(Version::Micro(number))
        } else {
            Err(QrError::version(format!(
                "illegal Micro QR Code version M{number}"
            )))
        }
    }

    /// Get the version number (1-40, or 1-4 for Micro)
    pub fn number(&self) -> u8 {
        match self {
            Version::Model2(v) | Version::Micro(v) => *v,
        }
    }

    /// Numeric identifier handed to renderers: 1-40 for QR Codes and
    /// -4 (M1) .. -1 (M4) for Micro QR Codes
    pub fn identifier(&self) -> i8 {
        match self {
            Version::Model2(v) => *v as i8,
            Version::Micro(v) => *v as i8 - 5,
        }
    }

    /// Get the size in modules (width = height)
    pub fn size(&self) -> usize {
        match self {
            Version::Model2(v) => 4 * (*v as usize) + 17,
            Version::Micro(v) => 2 * (*v as usize) + 9,
        }
    }

    /// Check if this is a Micro QR code
    pub fn is_micro(&self) -> bool {
        matches!(self, Version::Micro(_))
    }

    /// Index into the count-indicator tables: M1..M4 map to 0..3, versions
    /// 1-9, 10-26 and 27-40 to 4, 5 and 6
    pub(crate) fn bracket(&self) -> usize {
        match self {
            Version::Micro(v) => *v as usize - 1,
            Version::Model2(v) if *v < 10 => 4,
            Version::Model2(v) if *v < 27 => 5,
            Version::Model2(_) => 6,
        }
    }

    /// All versions in ascending module count: M1 .. M4, 1 .. 40
    pub fn ascending() -> impl Iterator<Item = Version> {
        (1..=4)
            .map(Version::Micro)
            .chain((1..=40).map(Version::Model2))
    }

    /// Error correction levels defined for this version
    pub fn error_levels(&self) -> &'static [ECLevel] {
        use ECLevel::*;
        match self {
            Version::Micro(1) => &[],
            Version::Micro(2) | Version::Micro(3) => &[L, M],
            Version::Micro(_) => &[L, M, Q],
            Version::Model2(_) => &[L, M, Q, H],
        }
    }

    /// Whether `(self, level)` is a valid symbol; `None` is only valid for M1
    pub fn supports(&self, level: Option<ECLevel>) -> bool {
        match level {
            None => *self == Version::Micro(1),
            Some(level) => self.error_levels().contains(&level),
        }
    }

    /// Default quiet zone: 4 modules for QR Codes, 2 for Micro QR Codes
    pub fn default_border_size(&self) -> usize {
        if self.is_micro() { 2 } else { 4 }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Model2(v) => write!(f, "{v}"),
            Version::Micro(v) => write!(f, "M{v}"),
        }
    }
}

impl FromStr for Version {
    type Err = QrError;

    /// Parses "1" .. "40" and "M1" .. "M4" (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_uppercase();
        let illegal = || QrError::version(format!("unknown version \"{s}\""));
        if let Some(micro) = name.strip_prefix('M') {
            let number = micro.parse::<u8>().map_err(|_| illegal())?;
            Version::micro(number)
        } else {
            let number = name.parse::<u8>().map_err(|_| illegal())?;
            Version::new(number)
        }
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L = 0,
    /// Medium (~15% recovery capacity)
    M = 1,
    /// Quartile (~25% recovery capacity)
    Q = 2,
    /// High (~30% recovery capacity)
    H = 3,
}

impl ECLevel {
    /// Table index (L=0, M=1, Q=2, H=3)
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Two bits written into the format information (L=01, M=00, Q=11, H=10)
    pub fn format_bits(&self) -> u8 {
        match self {
            ECLevel::L => 0b01,
            ECLevel::M => 0b00,
            ECLevel::Q => 0b11,
            ECLevel::H => 0b10,
        }
    }

    /// Single letter name
    pub fn name(&self) -> &'static str {
        match self {
            ECLevel::L => "L",
            ECLevel::M => "M",
            ECLevel::Q => "Q",
            ECLevel::H => "H",
        }
    }
}

impl fmt::Display for ECLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ECLevel {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(ECLevel::L),
            "M" => Ok(ECLevel::M),
            "Q" => Ok(ECLevel::Q),
            "H" => Ok(ECLevel::H),
            _ => Err(QrError::error_level(format!(
                "unknown error correction level \"{s}\""
            ))),
        }
    }
}

/// Mask pattern (0-7)
///
/// Micro QR Codes use a subset: micro masks 0-3 are patterns 1, 4, 6 and 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskPattern {
    /// (i + j) % 2 == 0
    Pattern0 = 0,
    /// i % 2 == 0
    Pattern1 = 1,
    /// j % 3 == 0
    Pattern2 = 2,
    /// (i + j) % 3 == 0
    Pattern3 = 3,
    /// (i/2 + j/3) % 2 == 0
    Pattern4 = 4,
    /// (i*j)%2 + (i*j)%3 == 0
    Pattern5 = 5,
    /// ((i*j)%2 + (i*j)%3) % 2 == 0
    Pattern6 = 6,
    /// ((i+j)%2 + (i*j)%3) % 2 == 0
    Pattern7 = 7,
}

const MICRO_PATTERNS: [MaskPattern; 4] = [
    MaskPattern::Pattern1,
    MaskPattern::Pattern4,
    MaskPattern::Pattern6,
    MaskPattern::Pattern7,
];

impl MaskPattern {
    /// Get mask pattern from its 3-bit reference
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(MaskPattern::Pattern0),
            1 => Some(MaskPattern::Pattern1),
            2 => Some(MaskPattern::Pattern2),
            3 => Some(MaskPattern::Pattern3),
            4 => Some(MaskPattern::Pattern4),
            5 => Some(MaskPattern::Pattern5),
            6 => Some(MaskPattern::Pattern6),
            7 => Some(MaskPattern::Pattern7),
            _ => None,
        }
    }

    /// Pattern for a mask index of the given symbol class
    pub fn for_version(version: Version, index: u8) -> Option<Self> {
        if version.is_micro() {
            MICRO_PATTERNS.get(index as usize).copied()
        } else {
            Self::from_bits(index)
        }
    }

    /// Number of mask candidates for the symbol class
    pub fn count(version: Version) -> u8 {
        if version.is_micro() { 4 } else { 8 }
    }

    /// Check if module at row `i`, column `j` is inverted
    pub fn is_masked(&self, i: usize, j: usize) -> bool {
        match self {
            MaskPattern::Pattern0 => (i + j) % 2 == 0,
            MaskPattern::Pattern1 => i % 2 == 0,
            MaskPattern::Pattern2 => j % 3 == 0,
            MaskPattern::Pattern3 => (i + j) % 3 == 0,
            MaskPattern::Pattern4 => (i / 2 + j / 3) % 2 == 0,
            MaskPattern::Pattern5 => ((i * j) % 2 + (i * j) % 3) == 0,
            MaskPattern::Pattern6 => (((i * j) % 2) + ((i * j) % 3)) % 2 == 0,
            MaskPattern::Pattern7 => (((i + j) % 2) + ((i * j) % 3)) % 2 == 0,
        }
    }
}

/// Encoded (Micro) QR code
#[derive(Debug, Clone)]
pub struct QRCode {
    /// Module matrix (true = dark, false = light)
    pub modules: BitMatrix,
    /// Symbol version
    pub version: Version,
    /// Error correction level, `None` for M1
    pub error_correction: Option<ECLevel>,
    /// Mask index within the symbol class (0-7, or 0-3 for Micro)
    pub mask: u8,
    /// Segments in encoding order
    pub segments: Vec<Segment>,
}

impl QRCode {
    /// Side length in modules
    pub fn size(&self) -> usize {
        self.modules.size()
    }

    /// Module at column `x`, row `y`
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.modules.get(x, y)
    }

    /// Row-major matrix, one `Vec<bool>` per row
    pub fn rows(&self) -> Vec<Vec<bool>> {
        self.modules.rows()
    }

    /// See [`Version::identifier`]
    pub fn version_number(&self) -> i8 {
        self.version.identifier()
    }

    /// Check if this is a Micro QR code
    pub fn is_micro(&self) -> bool {
        self.version.is_micro()
    }

    /// The mode if the symbol holds a single segment, `None` otherwise
    pub fn mode(&self) -> Option<Mode> {
        match self.segments.as_slice() {
            [segment] => Some(segment.mode()),
            _ => None,
        }
    }

    /// Mask pattern applied to the data modules
    pub fn mask_pattern(&self) -> MaskPattern {
        MaskPattern::for_version(self.version, self.mask).unwrap_or(MaskPattern::Pattern0)
    }

    /// Version and error level as `V-E`, e.g. "M3-L" or "7-H"; just the
    /// version for M1
    pub fn designator(&self) -> String {
        match self.error_correction {
            Some(level) => format!("{}-{}", self.version, level),
            None => self.version.to_string(),
        }
    }

    /// Default quiet zone in modules
    pub fn default_border_size(&self) -> usize {
        self.version.default_border_size()
    }

    /// Width and height including the border (default quiet zone when
    /// `border` is `None`), multiplied by `scale`
    pub fn symbol_size(&self, scale: usize, border: Option<usize>) -> (usize, usize) {
        let border = border.unwrap_or_else(|| self.default_border_size());
        let dim = (self.size() + 2 * border) * scale;
        (dim, dim)
    }
}

impl PartialEq for QRCode {
    fn eq(&self, other: &Self) -> bool {
        self.modules == other.modules
    }
}

impl Eq for QRCode {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_size() {
        assert_eq!(Version::Model2(1).size(), 21);
        assert_eq!(Version::Model2(2).size(), 25);
        assert_eq!(Version::Model2(40).size(), 177);
        assert_eq!(Version::Micro(1).size(), 11);
        assert_eq!(Version::Micro(4).size(), 17);
    }

    #[test]
    fn test_version_order() {
        let all: Vec<Version> = Version::ascending().collect();
        assert_eq!(all.len(), 44);
        assert!(all.windows(2).all(|w| w[0] < w[1]));
        assert!(all.windows(2).all(|w| w[0].size() < w[1].size()));
    }

    #[test]
    fn test_version_parse() {
        assert_eq!("m2".parse::<Version>(), Ok(Version::Micro(2)));
        assert_eq!(" 7 ".parse::<Version>(), Ok(Version::Model2(7)));
        assert!(matches!("M5".parse::<Version>(), Err(QrError::Version(_))));
        assert!(matches!("41".parse::<Version>(), Err(QrError::Version(_))));
        assert!(matches!("seven".parse::<Version>(), Err(QrError::Version(_))));
    }

    #[test]
    fn test_version_identifier() {
        assert_eq!(Version::Micro(1).identifier(), -4);
        assert_eq!(Version::Micro(4).identifier(), -1);
        assert_eq!(Version::Model2(40).identifier(), 40);
    }

    #[test]
    fn test_ec_level() {
        assert_eq!("q".parse::<ECLevel>(), Ok(ECLevel::Q));
        assert!(matches!("X".parse::<ECLevel>(), Err(QrError::ErrorLevel(_))));
        assert_eq!(ECLevel::L.format_bits(), 0b01);
        assert_eq!(ECLevel::H.format_bits(), 0b10);
    }

    #[test]
    fn test_supported_levels() {
        assert!(Version::Micro(1).supports(None));
        assert!(!Version::Micro(1).supports(Some(ECLevel::L)));
        assert!(!Version::Micro(3).supports(Some(ECLevel::Q)));
        assert!(Version::Micro(4).supports(Some(ECLevel::Q)));
        assert!(!Version::Micro(4).supports(Some(ECLevel::H)));
        assert!(!Version::Model2(1).supports(None));
    }

    #[test]
    fn test_mask_pattern() {
        let mask = MaskPattern::Pattern0;
        assert!(mask.is_masked(0, 0));
        assert!(!mask.is_masked(0, 1));
        assert!(mask.is_masked(1, 1));
    }

    #[test]
    fn test_micro_mask_mapping() {
        let v = Version::Micro(2);
        assert_eq!(MaskPattern::for_version(v, 0), Some(MaskPattern::Pattern1));
        assert_eq!(MaskPattern::for_version(v, 3), Some(MaskPattern::Pattern7));
        assert_eq!(MaskPattern::for_version(v, 4), None);
        assert_eq!(MaskPattern::count(v), 4);
        assert_eq!(MaskPattern::count(Version::MIN), 8);
    }
}
