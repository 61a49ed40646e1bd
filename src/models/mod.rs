/// Square module matrix
pub mod matrix;
/// Symbol, version and level types
pub mod qr_code;

pub use matrix::BitMatrix;
pub use qr_code::{ECLevel, MaskPattern, QRCode, Version};
