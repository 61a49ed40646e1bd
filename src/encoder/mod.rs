//! QR code encoding modules
//!
//! This module contains all the logic for turning content into a symbol:
//! - Content segmentation and mode selection (numeric, alphanumeric, byte, kanji)
//! - Version and error correction level selection
//! - Bitstream construction and Reed-Solomon error correction
//! - Function patterns, data placement, masking and format information

use tracing::debug;

use crate::error::QrError;
use crate::models::{ECLevel, MaskPattern, QRCode, Version};

/// BCH codes for format and version info
pub mod bch;
/// Bitstream construction (headers, payloads, padding)
pub mod bitstream;
/// Byte mode character encodings
pub mod charset;
/// Runtime tuning from environment variables
mod config;
/// Format information placement (mask pattern, EC level)
pub mod format;
/// Function patterns (finder/timing/format/alignment/version)
pub mod function_mask;
/// Mask application and selection
pub mod mask;
/// Data mode encoders (numeric, alphanumeric, byte, kanji)
pub mod modes;
/// Zigzag data placement
pub mod placement;
/// Reed-Solomon error correction
pub mod reed_solomon;
/// Content analysis and segmentation
pub mod segment;
/// Symbol tables (capacities, count indicators, alignment, ECI)
pub mod tables;
/// Version and error level selection
pub mod version;

use function_mask::FunctionMask;
use modes::Mode;
use placement::DataPlacer;
use segment::{Content, Segmenter};
use version::SymbolConstraints;

/// Encoding parameters; everything unset is chosen automatically
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Error correction level; M when unset (none for M1)
    pub error: Option<ECLevel>,
    /// Exact version
    pub version: Option<Version>,
    /// Force a single segment in this mode
    pub mode: Option<Mode>,
    /// Mask index (0-7, 0-3 for Micro QR Codes)
    pub mask: Option<u8>,
    /// Byte mode character encoding label
    pub encoding: Option<String>,
    /// Write an ECI header for non-Latin-1 byte segments
    pub eci: bool,
    /// `Some(true)`: Micro QR Code only, `Some(false)`: QR Code only
    pub micro: Option<bool>,
    /// Raise the error level while the data fits the chosen version
    pub boost_error: bool,
}

impl EncodeOptions {
    /// Options with every parameter chosen automatically
    pub fn new() -> Self {
        Self::default()
    }

    /// Request an error correction level
    pub fn error(mut self, level: ECLevel) -> Self {
        self.error = Some(level);
        self
    }

    /// Request an exact version
    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Write the content as a single segment in `mode`
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Use this mask instead of searching for the best one
    pub fn mask(mut self, mask: u8) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Byte mode character encoding, e.g. "utf-8" or "shift_jis"
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Write an ECI header before byte segments not in ISO/IEC 8859-1
    pub fn eci(mut self, eci: bool) -> Self {
        self.eci = eci;
        self
    }

    /// Require (`true`) or forbid (`false`) Micro QR Codes
    pub fn micro(mut self, micro: bool) -> Self {
        self.micro = Some(micro);
        self
    }

    /// Raise the error level as long as the chosen version still fits
    pub fn boost_error(mut self, boost: bool) -> Self {
        self.boost_error = boost;
        self
    }

    fn constraints(&self) -> SymbolConstraints {
        SymbolConstraints {
            version: self.version,
            error: self.error,
            micro: self.micro,
            boost_error: self.boost_error,
        }
    }
}

fn check_mask(mask: Option<u8>, version: Version) -> Result<(), QrError> {
    match mask {
        Some(index) if index >= MaskPattern::count(version) => Err(QrError::mask(format!(
            "illegal mask {index} for version {version}, expected 0 .. {}",
            MaskPattern::count(version) - 1
        ))),
        _ => Ok(()),
    }
}

/// Encode `content` into a QR Code or Micro QR Code
pub fn encode(content: &Content, options: &EncodeOptions) -> Result<QRCode, QrError> {
    if let Some(index) = options.mask {
        let micro = options.micro == Some(true) || options.version.is_some_and(|v| v.is_micro());
        let limit = if micro { 4 } else { 8 };
        if index >= limit {
            return Err(QrError::mask(format!(
                "illegal mask {index}, expected 0 .. {}",
                limit - 1
            )));
        }
    }

    let segmenter = Segmenter::new(
        content,
        options.mode,
        options.encoding.as_deref(),
        options.eci,
    )?;
    let mut constraints = options.constraints();
    // Masks 4-7 only exist for QR Codes
    if options.mask.is_some_and(|m| m >= 4) && constraints.micro.is_none() {
        constraints.micro = Some(false);
    }
    let selection = version::select(&segmenter, &constraints)?;
    let version = selection.version;
    let level = selection.error;
    check_mask(options.mask, version)?;

    let info = tables::ec_block_info(version, level).ok_or_else(|| {
        QrError::version(format!("no capacity data for version {version}"))
    })?;
    let data = bitstream::build_data_codewords(&selection.segments, version, &info);
    let codewords =
        reed_solomon::add_ecc_and_interleave(&data, info.num_blocks, info.ecc_per_block);
    let (data_part, ecc_part) = codewords.split_at(info.data_codewords);
    let half = info.has_half_codeword().then(|| info.data_codewords - 1);
    let bits = DataPlacer::codeword_bits(data_part, ecc_part, half);

    let func = FunctionMask::new(version);
    let mut base = func.modules().clone();
    DataPlacer::place(&mut base, &func, &bits);

    let (mask, modules) = match options.mask {
        Some(index) => (index, mask::fixed_mask(&base, &func, level, index)),
        None => mask::select_mask(&base, &func, level),
    };
    debug!(
        %version,
        ?level,
        mask,
        bits = selection.bits,
        capacity = info.data_bits,
        "encoded symbol"
    );

    Ok(QRCode {
        modules,
        version,
        error_correction: level,
        mask,
        segments: selection.segments,
    })
}
