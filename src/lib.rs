//! rust_qrgen - QR Code and Micro QR Code encoder
//!
//! Turns text, bytes or integers into a finished symbol matrix. Unset
//! parameters (version, error level, mode, mask) are chosen automatically so
//! the result is the smallest symbol that holds the data.
//!
//! ```
//! use rust_qrgen::{EncodeOptions, ECLevel, make};
//!
//! let qr = make("HELLO WORLD", &EncodeOptions::new().error(ECLevel::Q)).unwrap();
//! assert_eq!(qr.designator(), "1-Q");
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// QR code encoding modules (segmentation, bitstream, error correction, masking)
pub mod encoder;
/// Error types
pub mod error;
/// Core data structures (QRCode, BitMatrix, Version, etc.)
pub mod models;
/// Renderers for finished symbols
pub mod render;

pub use encoder::modes::Mode;
pub use encoder::segment::{Content, Segment};
pub use encoder::EncodeOptions;
pub use error::QrError;
pub use models::{BitMatrix, ECLevel, MaskPattern, QRCode, Version};

/// Encode `content` into a QR Code or Micro QR Code
///
/// Micro QR Codes are preferred when the content fits one and the options
/// allow it. See [`EncodeOptions`] for the parameters.
pub fn make(content: impl Into<Content>, options: &EncodeOptions) -> Result<QRCode, QrError> {
    encoder::encode(&content.into(), options)
}

/// Encode `content` into a QR Code, never a Micro QR Code
pub fn make_qr(content: impl Into<Content>, options: &EncodeOptions) -> Result<QRCode, QrError> {
    let options = options.clone().micro(false);
    encoder::encode(&content.into(), &options)
}

/// Encode `content` into a Micro QR Code
pub fn make_micro(content: impl Into<Content>, options: &EncodeOptions) -> Result<QRCode, QrError> {
    let options = options.clone().micro(true);
    encoder::encode(&content.into(), &options)
}
