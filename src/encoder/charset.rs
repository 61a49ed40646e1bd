/// Character encodings for byte mode segments
use encoding_rs::Encoding;

use crate::encoder::modes::KanjiEncoder;
use crate::error::QrError;

/// A byte mode character encoding.
///
/// ISO-8859-1, US-ASCII, UTF-16BE and CP437 are handled here since
/// `encoding_rs` follows the WHATWG mapping (latin1 and ascii mean
/// windows-1252 there, and UTF-16 is decode-only). Everything else goes
/// through `encoding_rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// ISO/IEC 8859-1, the default byte mode encoding
    Latin1,
    /// US-ASCII
    Ascii,
    /// UTF-16 big endian, without byte order mark
    Utf16Be,
    /// CP437 shares ASCII for 0x00-0x7F; only that range is encodable
    Cp437,
    /// Any other encoding known to `encoding_rs`
    Other(&'static Encoding),
}

impl Charset {
    /// Look up an encoding by name or alias, case insensitive
    pub fn for_label(label: &str) -> Result<Self, QrError> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        let charset = match normalized.as_str() {
            "iso-8859-1" | "iso8859-1" | "latin-1" | "latin1" | "l1" | "8859-1" => Charset::Latin1,
            "ascii" | "us-ascii" => Charset::Ascii,
            "utf-16be" | "utf16be" | "utf-16-be" => Charset::Utf16Be,
            "cp437" | "ibm437" | "437" => Charset::Cp437,
            _ => Encoding::for_label(label.trim().as_bytes())
                .map(Charset::Other)
                .ok_or_else(|| QrError::encoding(format!("unknown encoding \"{label}\"")))?,
        };
        Ok(charset)
    }

    /// ISO-8859-1 if every character fits, UTF-8 otherwise
    pub fn default_for(text: &str) -> Self {
        if text.chars().all(|c| (c as u32) <= 0xFF) {
            Charset::Latin1
        } else {
            Charset::Other(encoding_rs::UTF_8)
        }
    }

    /// Canonical lowercase name, the key of the ECI designator table
    pub fn name(&self) -> String {
        match self {
            Charset::Latin1 => "iso-8859-1".to_string(),
            Charset::Ascii => "us-ascii".to_string(),
            Charset::Utf16Be => "utf-16be".to_string(),
            Charset::Cp437 => "cp437".to_string(),
            Charset::Other(encoding) => encoding.name().to_ascii_lowercase(),
        }
    }

    /// Encode `text`, `None` if a character is not representable
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        match self {
            Charset::Latin1 => text
                .chars()
                .map(|c| u8::try_from(c as u32).ok())
                .collect(),
            Charset::Ascii | Charset::Cp437 => text
                .chars()
                .map(|c| if c.is_ascii() { Some(c as u8) } else { None })
                .collect(),
            Charset::Utf16Be => Some(
                text.encode_utf16()
                    .flat_map(|unit| unit.to_be_bytes())
                    .collect(),
            ),
            Charset::Other(encoding) => {
                let (bytes, used, had_errors) = encoding.encode(text);
                if had_errors || used != *encoding {
                    None
                } else {
                    Some(bytes.into_owned())
                }
            }
        }
    }
}

/// Shift_JIS pair of `c` if it can be written in kanji mode
pub fn kanji_pair(c: char) -> Option<[u8; 2]> {
    if c.is_ascii() {
        return None;
    }
    let mut buf = [0u8; 4];
    let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(c.encode_utf8(&mut buf));
    match bytes.as_ref() {
        [lead, trail] if !had_errors && KanjiEncoder::is_kanji_pair(*lead, *trail) => {
            Some([*lead, *trail])
        }
        _ => None,
    }
}
