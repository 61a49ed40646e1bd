use thiserror::Error;

/// Errors returned by the encoder.
///
/// Every variant is raised before any matrix work starts; a failed call never
/// yields a partial symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    /// The mode is unknown, cannot represent the content, or is not
    /// available for the requested version.
    #[error("mode error: {0}")]
    Mode(String),
    /// The version is unknown or contradicts the micro preference.
    #[error("version error: {0}")]
    Version(String),
    /// The error correction level is unknown or unsupported by the version.
    #[error("error level error: {0}")]
    ErrorLevel(String),
    /// The mask index is out of range for the symbol class.
    #[error("mask error: {0}")]
    Mask(String),
    /// The content does not fit into any allowed version.
    #[error("data overflow: {0}")]
    DataOverflow(String),
    /// Unknown character encoding, unrepresentable character, or an
    /// encoding without a registered ECI designator.
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl QrError {
    pub(crate) fn mode(msg: impl Into<String>) -> Self {
        Self::Mode(msg.into())
    }

    pub(crate) fn version(msg: impl Into<String>) -> Self {
        Self::Version(msg.into())
    }

    pub(crate) fn error_level(msg: impl Into<String>) -> Self {
        Self::ErrorLevel(msg.into())
    }

    pub(crate) fn mask(msg: impl Into<String>) -> Self {
        Self::Mask(msg.into())
    }

    pub(crate) fn overflow(msg: impl Into<String>) -> Self {
        Self::DataOverflow(msg.into())
    }

    pub(crate) fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }
}
