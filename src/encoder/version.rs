/// Version and error correction level selection
use tracing::{debug, trace};

use crate::encoder::segment::{self, Segment, Segmenter};
use crate::encoder::tables;
use crate::error::QrError;
use crate::models::{ECLevel, Version};

/// Constraints on the symbol chosen for some content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymbolConstraints {
    /// Exact version, any if `None`
    pub version: Option<Version>,
    /// Requested level, the default level if `None`
    pub error: Option<ECLevel>,
    /// `Some(true)`: Micro QR Codes only, `Some(false)`: QR Codes only
    pub micro: Option<bool>,
    /// Raise the level while the data still fits the chosen version
    pub boost_error: bool,
}

/// Selected symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Chosen version
    pub version: Version,
    /// Chosen level, `None` for M1
    pub error: Option<ECLevel>,
    /// Segments planned for the version
    pub segments: Vec<Segment>,
    /// Bits used by the segments (without terminator and padding)
    pub bits: usize,
}

/// Level used when none was requested
fn default_level(version: Version) -> Option<ECLevel> {
    if version == Version::Micro(1) {
        None
    } else {
        Some(ECLevel::M)
    }
}

/// Reject contradictory constraints before any capacity work
fn validate(segmenter: &Segmenter, c: &SymbolConstraints) -> Result<(), QrError> {
    let micro_only = c.micro == Some(true) || c.version.is_some_and(|v| v.is_micro());

    if let Some(version) = c.version {
        match version {
            Version::Micro(n) => Version::micro(n)?,
            Version::Model2(n) => Version::new(n)?,
        };
        match c.micro {
            Some(false) if version.is_micro() => {
                return Err(QrError::version(format!(
                    "Micro QR Code version {version} requested but micro is disabled"
                )));
            }
            Some(true) if !version.is_micro() => {
                return Err(QrError::version(format!(
                    "QR Code version {version} requested but micro is required"
                )));
            }
            _ => {}
        }
    }

    if segmenter.uses_eci() && micro_only {
        return Err(QrError::version("ECI is not supported by Micro QR Codes"));
    }

    if let Some(level) = c.error {
        if level == ECLevel::H && micro_only {
            return Err(QrError::error_level(
                "error correction level H is not available for Micro QR Codes",
            ));
        }
        if let Some(version) = c.version {
            if version == Version::Micro(1) {
                return Err(QrError::error_level(
                    "M1 has error detection only, no error correction level",
                ));
            }
            if !version.supports(Some(level)) {
                return Err(QrError::error_level(format!(
                    "error correction level {level} is not available for version {version}"
                )));
            }
        }
    }

    if let (Some(mode), Some(version)) = (segmenter.forced_mode(), c.version) {
        if tables::char_count_bits(mode, version.bracket()).is_none() {
            return Err(QrError::mode(format!(
                "{mode} mode is not available in version {version}"
            )));
        }
    }
    Ok(())
}

/// Versions allowed by the micro preference, ascending
fn candidates(segmenter: &Segmenter, c: &SymbolConstraints) -> Vec<Version> {
    Version::ascending()
        .filter(|v| match c.micro {
            Some(micro) => v.is_micro() == micro,
            None => !(v.is_micro() && segmenter.uses_eci()),
        })
        .collect()
}

/// Level of `version` for the requested level, `None` if it cannot be used
fn candidate_level(version: Version, requested: Option<ECLevel>) -> Option<Option<ECLevel>> {
    let level = match requested {
        Some(level) => Some(level),
        None => default_level(version),
    };
    version.supports(level).then_some(level)
}

/// Levels tried for an explicit version: the requested one, or the default
/// followed by the lower levels of the version
fn explicit_levels(version: Version, requested: Option<ECLevel>) -> Vec<Option<ECLevel>> {
    let Some(first) = candidate_level(version, requested) else {
        return Vec::new();
    };
    let mut levels = vec![first];
    if requested.is_none() {
        levels.extend(
            version
                .error_levels()
                .iter()
                .copied()
                .filter(|&l| first.is_some_and(|f| l < f))
                .rev()
                .map(Some),
        );
    }
    levels
}

/// First level of [`explicit_levels`] the content fits at, with its bits
fn fit_explicit(
    cache: &mut SegmentCache<'_>,
    version: Version,
    requested: Option<ECLevel>,
) -> Option<(Option<ECLevel>, usize)> {
    explicit_levels(version, requested)
        .into_iter()
        .find_map(|level| fits(cache, version, level).map(|bits| (level, bits)))
}

/// Segments per count indicator bracket, computed on first use
struct SegmentCache<'a> {
    segmenter: &'a Segmenter,
    brackets: [Option<Vec<Segment>>; 7],
}

impl<'a> SegmentCache<'a> {
    fn new(segmenter: &'a Segmenter) -> Self {
        Self {
            segmenter,
            brackets: Default::default(),
        }
    }

    fn get(&mut self, version: Version) -> &[Segment] {
        let segmenter = self.segmenter;
        self.brackets[version.bracket()].get_or_insert_with(|| segmenter.segments(version))
    }
}

/// Bits used in `version` if the content fits at `level`
fn fits(cache: &mut SegmentCache<'_>, version: Version, level: Option<ECLevel>) -> Option<usize> {
    let info = tables::ec_block_info(version, level)?;
    let bits = segment::total_bits(cache.get(version), version);
    trace!(%version, ?level, ?bits, capacity = info.data_bits, "version candidate");
    bits.filter(|&b| b <= info.data_bits)
}

fn boost(
    cache: &mut SegmentCache<'_>,
    version: Version,
    level: Option<ECLevel>,
) -> Option<ECLevel> {
    let Some(current) = level else {
        return level;
    };
    version
        .error_levels()
        .iter()
        .copied()
        .filter(|&l| l > current)
        .filter(|&l| fits(cache, version, Some(l)).is_some())
        .max()
        .or(level)
}

/// Find the smallest symbol holding the content
pub fn select(segmenter: &Segmenter, c: &SymbolConstraints) -> Result<Selection, QrError> {
    validate(segmenter, c)?;
    let mut cache = SegmentCache::new(segmenter);

    let chosen = match c.version {
        Some(version) => {
            match fit_explicit(&mut cache, version, c.error) {
                Some((level, bits)) => (version, level, bits),
                None => return Err(overflow(segmenter, c, &mut cache, Some(version))),
            }
        }
        None => {
            let mut found = None;
            for version in candidates(segmenter, c) {
                let Some(level) = candidate_level(version, c.error) else {
                    continue;
                };
                if let Some(bits) = fits(&mut cache, version, level) {
                    found = Some((version, level, bits));
                    break;
                }
            }
            match found {
                Some(found) => found,
                None => return Err(overflow(segmenter, c, &mut cache, None)),
            }
        }
    };

    let (version, mut level, bits) = chosen;
    if c.boost_error {
        level = boost(&mut cache, version, level);
    }
    let segments = cache.get(version).to_vec();
    debug!(
        %version,
        ?level,
        bits,
        segments = segments.len(),
        "selected symbol"
    );
    Ok(Selection {
        version,
        error: level,
        segments,
        bits,
    })
}

/// Overflow error, proposing a version when an explicit one is too small
fn overflow(
    segmenter: &Segmenter,
    c: &SymbolConstraints,
    cache: &mut SegmentCache<'_>,
    requested: Option<Version>,
) -> QrError {
    let Some(requested) = requested else {
        return QrError::overflow(format!(
            "data ({} characters) does not fit into any allowed version",
            segmenter.len()
        ));
    };
    let proposal = candidates(segmenter, c)
        .into_iter()
        .filter(|v| *v > requested)
        .find(|&v| fit_explicit(cache, v, c.error).is_some());
    match proposal {
        Some(v) => QrError::overflow(format!(
            "data does not fit into version {requested}, use version {v} or above"
        )),
        None => QrError::overflow(format!(
            "data does not fit into version {requested} or any larger version"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::modes::Mode;
    use crate::encoder::segment::Content;

    fn segmenter(content: impl Into<Content>) -> Segmenter {
        Segmenter::new(&content.into(), None, None, false).unwrap()
    }

    fn pick(content: impl Into<Content>, c: SymbolConstraints) -> Result<Selection, QrError> {
        select(&segmenter(content), &c)
    }

    #[test]
    fn test_smallest_micro_first() {
        let s = pick("12345", SymbolConstraints::default()).unwrap();
        assert_eq!((s.version, s.error), (Version::Micro(1), None));
        let s = pick("01234567", SymbolConstraints::default()).unwrap();
        assert_eq!((s.version, s.error), (Version::Micro(2), Some(ECLevel::M)));
    }

    #[test]
    fn test_empty_content_is_m1() {
        let s = pick("", SymbolConstraints::default()).unwrap();
        assert_eq!(s.version, Version::Micro(1));
        assert!(s.segments.is_empty());
    }

    #[test]
    fn test_full_only() {
        let c = SymbolConstraints {
            micro: Some(false),
            ..Default::default()
        };
        let s = pick("HELLO WORLD", c).unwrap();
        assert_eq!((s.version, s.error), (Version::Model2(1), Some(ECLevel::M)));
    }

    #[test]
    fn test_explicit_level_skips_m1() {
        let c = SymbolConstraints {
            error: Some(ECLevel::L),
            ..Default::default()
        };
        let s = pick("1", c).unwrap();
        assert_eq!((s.version, s.error), (Version::Micro(2), Some(ECLevel::L)));
    }

    #[test]
    fn test_level_q_prefers_m4() {
        let c = SymbolConstraints {
            error: Some(ECLevel::Q),
            ..Default::default()
        };
        let s = pick("1", c).unwrap();
        assert_eq!(s.version, Version::Micro(4));
    }

    #[test]
    fn test_level_h_goes_full() {
        let c = SymbolConstraints {
            error: Some(ECLevel::H),
            ..Default::default()
        };
        let s = pick("1", c).unwrap();
        assert_eq!(s.version, Version::Model2(1));
    }

    #[test]
    fn test_constraint_errors() {
        let err = |c: SymbolConstraints| pick("1", c).unwrap_err();
        let m1_with_level = SymbolConstraints {
            version: Some(Version::Micro(1)),
            error: Some(ECLevel::L),
            ..Default::default()
        };
        assert!(matches!(err(m1_with_level), QrError::ErrorLevel(_)));

        let h_micro = SymbolConstraints {
            error: Some(ECLevel::H),
            micro: Some(true),
            ..Default::default()
        };
        assert!(matches!(err(h_micro), QrError::ErrorLevel(_)));

        let q_m3 = SymbolConstraints {
            version: Some(Version::Micro(3)),
            error: Some(ECLevel::Q),
            ..Default::default()
        };
        assert!(matches!(err(q_m3), QrError::ErrorLevel(_)));

        let micro_version_no_micro = SymbolConstraints {
            version: Some(Version::Micro(2)),
            micro: Some(false),
            ..Default::default()
        };
        assert!(matches!(err(micro_version_no_micro), QrError::Version(_)));

        let full_version_micro = SymbolConstraints {
            version: Some(Version::Model2(2)),
            micro: Some(true),
            ..Default::default()
        };
        assert!(matches!(err(full_version_micro), QrError::Version(_)));
    }

    #[test]
    fn test_explicit_version_falls_back_to_l() {
        let c = SymbolConstraints {
            version: Some(Version::Micro(3)),
            ..Default::default()
        };
        let s = pick("Wikipedia", c).unwrap();
        assert_eq!((s.version, s.error), (Version::Micro(3), Some(ECLevel::L)));

        let c = SymbolConstraints {
            version: Some(Version::Model2(1)),
            ..Default::default()
        };
        let s = pick("abcdefghijklmnop", c).unwrap();
        assert_eq!((s.version, s.error), (Version::Model2(1), Some(ECLevel::L)));

        let s = pick("abcdefghijklmn", c).unwrap();
        assert_eq!(s.error, Some(ECLevel::M));
    }

    #[test]
    fn test_explicit_level_does_not_fall_back() {
        let c = SymbolConstraints {
            version: Some(Version::Micro(3)),
            error: Some(ECLevel::M),
            ..Default::default()
        };
        assert!(matches!(pick("Wikipedia", c), Err(QrError::DataOverflow(_))));
    }

    #[test]
    fn test_out_of_range_version() {
        let seg = Segmenter::new(&Content::from("1"), Some(Mode::Numeric), None, false).unwrap();
        for version in [
            Version::Micro(0),
            Version::Micro(9),
            Version::Model2(0),
            Version::Model2(41),
        ] {
            let c = SymbolConstraints {
                version: Some(version),
                ..Default::default()
            };
            assert!(matches!(select(&seg, &c), Err(QrError::Version(_))), "{version:?}");
            assert!(matches!(pick("1", c), Err(QrError::Version(_))), "{version:?}");
        }
    }

    #[test]
    fn test_eci_excludes_micro() {
        let seg = Segmenter::new(&Content::from("€"), None, None, true).unwrap();
        let s = select(&seg, &SymbolConstraints::default()).unwrap();
        assert!(!s.version.is_micro());
        let c = SymbolConstraints {
            micro: Some(true),
            ..Default::default()
        };
        assert!(matches!(select(&seg, &c), Err(QrError::Version(_))));
    }

    #[test]
    fn test_forced_mode_unavailable_in_version() {
        let seg = Segmenter::new(&Content::from("ABC"), Some(Mode::Alphanumeric), None, false)
            .unwrap();
        let c = SymbolConstraints {
            version: Some(Version::Micro(1)),
            ..Default::default()
        };
        assert!(matches!(select(&seg, &c), Err(QrError::Mode(_))));
    }

    #[test]
    fn test_overflow_proposes_version() {
        let c = SymbolConstraints {
            version: Some(Version::Model2(1)),
            error: Some(ECLevel::L),
            ..Default::default()
        };
        match pick("1".repeat(42), c) {
            Err(QrError::DataOverflow(msg)) => assert!(msg.contains("version 2"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_overflow_everywhere() {
        let text = "a".repeat(2954);
        let c = SymbolConstraints {
            error: Some(ECLevel::L),
            ..Default::default()
        };
        assert!(matches!(pick(text, c), Err(QrError::DataOverflow(_))));
        let s = pick("a".repeat(2953), c).unwrap();
        assert_eq!(s.version, Version::Model2(40));
    }

    #[test]
    fn test_boost_error() {
        let c = SymbolConstraints {
            micro: Some(false),
            boost_error: true,
            ..Default::default()
        };
        // 5 digits fit 1-H as well
        let s = pick("12345", c).unwrap();
        assert_eq!((s.version, s.error), (Version::Model2(1), Some(ECLevel::H)));
    }
}
