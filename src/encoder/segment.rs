/// Content analysis and segmentation
use tracing::trace;

use crate::encoder::bitstream::eci_header_bits;
use crate::encoder::charset::{self, Charset};
use crate::encoder::modes::{AlphanumericEncoder, KanjiEncoder, Mode, NumericEncoder};
use crate::encoder::tables;
use crate::error::QrError;
use crate::models::Version;

/// Input to the encoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Text, written in byte mode as ISO/IEC 8859-1 when possible, else UTF-8
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Encoded through its decimal representation
    Integer(i128),
}

impl Content {
    /// Whether there is nothing to encode
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Text(s) => s.is_empty(),
            Content::Bytes(b) => b.is_empty(),
            Content::Integer(_) => false,
        }
    }
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Content::Text(value.to_string())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Content::Text(value)
    }
}

impl From<&String> for Content {
    fn from(value: &String) -> Self {
        Content::Text(value.clone())
    }
}

impl From<&[u8]> for Content {
    fn from(value: &[u8]) -> Self {
        Content::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Content {
    fn from(value: &[u8; N]) -> Self {
        Content::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Content {
    fn from(value: Vec<u8>) -> Self {
        Content::Bytes(value)
    }
}

macro_rules! content_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Content {
            fn from(value: $t) -> Self {
                Content::Integer(value as i128)
            }
        })*
    };
}

content_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

/// A run of content written in a single mode
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    mode: Mode,
    data: Vec<u8>,
    char_count: usize,
    encoding: Option<String>,
    eci: Option<u32>,
}

impl Segment {
    /// Numeric segment from ASCII digits
    pub fn numeric(digits: &str) -> Result<Self, QrError> {
        if !digits.bytes().all(NumericEncoder::is_valid) {
            return Err(QrError::mode(format!("\"{digits}\" is not numeric")));
        }
        Ok(Self::raw(Mode::Numeric, digits.as_bytes().to_vec(), digits.len()))
    }

    /// Alphanumeric segment (0-9, A-Z, space, $%*+-./:)
    pub fn alphanumeric(text: &str) -> Result<Self, QrError> {
        if !text.bytes().all(AlphanumericEncoder::is_valid) {
            return Err(QrError::mode(format!("\"{text}\" is not alphanumeric")));
        }
        Ok(Self::raw(Mode::Alphanumeric, text.as_bytes().to_vec(), text.len()))
    }

    /// Byte segment, `encoding` only labels the bytes
    pub fn bytes(data: Vec<u8>, encoding: Option<String>) -> Self {
        let count = data.len();
        Self {
            encoding,
            ..Self::raw(Mode::Byte, data, count)
        }
    }

    /// Kanji segment from Shift_JIS pairs
    pub fn kanji(sjis: Vec<u8>) -> Result<Self, QrError> {
        if !sjis.is_empty() && !KanjiEncoder::is_valid(&sjis) {
            return Err(QrError::mode("data is not a sequence of Shift_JIS kanji"));
        }
        let count = sjis.len() / 2;
        Ok(Self::raw(Mode::Kanji, sjis, count))
    }

    fn raw(mode: Mode, data: Vec<u8>, char_count: usize) -> Self {
        Self {
            mode,
            data,
            char_count,
            encoding: None,
            eci: None,
        }
    }

    pub(crate) fn with_eci(mut self, designator: u32) -> Self {
        self.eci = Some(designator);
        self
    }

    /// Mode the segment is written in
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Payload bytes: ASCII for numeric and alphanumeric, encoded bytes for
    /// byte mode, Shift_JIS pairs for kanji
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Value written into the character count indicator
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Character encoding of a byte segment
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// ECI designator written before this segment
    pub fn eci(&self) -> Option<u32> {
        self.eci
    }

    /// Bits of this segment in `version`, headers included. `None` if the
    /// mode is unavailable or the count overflows the count indicator.
    pub fn bit_length(&self, version: Version) -> Option<usize> {
        let bracket = version.bracket();
        let count_bits = tables::char_count_bits(self.mode, bracket)?;
        if self.char_count >> count_bits != 0 {
            return None;
        }
        let eci = self.eci.map_or(0, eci_header_bits);
        Some(
            eci + tables::mode_indicator_bits(bracket)
                + count_bits
                + self.mode.payload_bits(self.char_count),
        )
    }
}

/// Total bits of a segment list, `None` if any segment does not fit
pub fn total_bits(segments: &[Segment], version: Version) -> Option<usize> {
    segments.iter().map(|s| s.bit_length(version)).sum()
}

/// One character (or byte, or kanji pair) of the content
#[derive(Debug, Clone)]
struct Atom {
    /// Narrowest mode able to hold the atom
    class: Mode,
    ascii: Option<u8>,
    kanji: Option<[u8; 2]>,
    /// Representation in byte mode, `None` if not encodable
    bytes: Option<Vec<u8>>,
}

impl Atom {
    fn from_char(c: char, charset: Charset) -> Self {
        let mut buf = [0u8; 4];
        let bytes = charset.encode(c.encode_utf8(&mut buf));
        let ascii = c.is_ascii().then_some(c as u8);
        let kanji = charset::kanji_pair(c);
        let class = match ascii {
            Some(b) if NumericEncoder::is_valid(b) => Mode::Numeric,
            Some(b) if AlphanumericEncoder::is_valid(b) => Mode::Alphanumeric,
            _ if kanji.is_some() => Mode::Kanji,
            _ => Mode::Byte,
        };
        Self {
            class,
            ascii,
            kanji,
            bytes,
        }
    }

    fn from_byte(b: u8) -> Self {
        let class = if NumericEncoder::is_valid(b) {
            Mode::Numeric
        } else if AlphanumericEncoder::is_valid(b) {
            Mode::Alphanumeric
        } else {
            Mode::Byte
        };
        Self {
            class,
            ascii: b.is_ascii().then_some(b),
            kanji: None,
            bytes: Some(vec![b]),
        }
    }

    fn from_kanji_pair(lead: u8, trail: u8) -> Self {
        Self {
            class: Mode::Kanji,
            ascii: None,
            kanji: Some([lead, trail]),
            bytes: Some(vec![lead, trail]),
        }
    }
}

/// Atoms `start..end` written in `mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    mode: Mode,
    start: usize,
    end: usize,
}

/// Splits content into atoms and plans cost-minimal segment lists per count
/// indicator bracket
#[derive(Debug, Clone)]
pub struct Segmenter {
    atoms: Vec<Atom>,
    /// Prefix sums of byte mode lengths
    byte_prefix: Vec<usize>,
    /// Prefix counts of atoms without a byte mode representation
    missing_prefix: Vec<usize>,
    encoding: Option<String>,
    eci: Option<u32>,
    forced: Option<Segment>,
}

impl Segmenter {
    /// Analyse `content`.
    ///
    /// `mode` forces a single segment, `encoding` names the byte mode
    /// character encoding, `eci` requests an ECI header for non-Latin-1
    /// byte segments.
    pub fn new(
        content: &Content,
        mode: Option<Mode>,
        encoding: Option<&str>,
        eci: bool,
    ) -> Result<Self, QrError> {
        let explicit = encoding.map(Charset::for_label).transpose()?;
        let (atoms, charset) = match content {
            Content::Text(text) => {
                let charset = explicit.unwrap_or_else(|| Charset::default_for(text));
                (Self::text_atoms(text, charset)?, Some(charset))
            }
            Content::Integer(value) => {
                let text = value.to_string();
                (Self::text_atoms(&text, Charset::Latin1)?, Some(Charset::Latin1))
            }
            Content::Bytes(bytes) => (Self::byte_atoms(bytes), explicit),
        };

        // Only byte segments carry the ECI header
        let has_bytes = match mode {
            Some(mode) => mode == Mode::Byte,
            None => atoms.iter().any(|a| a.class == Mode::Byte),
        };
        let eci = match charset {
            Some(charset) if eci && has_bytes && charset != Charset::Latin1 => {
                let name = charset.name();
                let designator = tables::eci_designator(&name).ok_or_else(|| {
                    QrError::encoding(format!("no ECI designator for encoding \"{name}\""))
                })?;
                Some(designator)
            }
            _ => None,
        };

        let mut byte_prefix = Vec::with_capacity(atoms.len() + 1);
        let mut missing_prefix = Vec::with_capacity(atoms.len() + 1);
        byte_prefix.push(0);
        missing_prefix.push(0);
        for atom in &atoms {
            let (len, missing) = atom.bytes.as_ref().map_or((0, 1), |b| (b.len(), 0));
            byte_prefix.push(byte_prefix[byte_prefix.len() - 1] + len);
            missing_prefix.push(missing_prefix[missing_prefix.len() - 1] + missing);
        }

        let mut segmenter = Self {
            atoms,
            byte_prefix,
            missing_prefix,
            encoding: charset.map(|c| c.name()),
            eci,
            forced: None,
        };
        if let Some(mode) = mode {
            segmenter.forced = Some(segmenter.forced_segment(content, mode)?);
        }
        Ok(segmenter)
    }

    fn text_atoms(text: &str, charset: Charset) -> Result<Vec<Atom>, QrError> {
        text.chars()
            .map(|c| {
                let atom = Atom::from_char(c, charset);
                if atom.class == Mode::Byte && atom.bytes.is_none() {
                    Err(QrError::encoding(format!(
                        "character {c:?} cannot be encoded as {}",
                        charset.name()
                    )))
                } else {
                    Ok(atom)
                }
            })
            .collect()
    }

    fn byte_atoms(bytes: &[u8]) -> Vec<Atom> {
        if KanjiEncoder::is_valid(bytes) {
            bytes
                .chunks_exact(2)
                .map(|pair| Atom::from_kanji_pair(pair[0], pair[1]))
                .collect()
        } else {
            bytes.iter().map(|&b| Atom::from_byte(b)).collect()
        }
    }

    fn forced_segment(&self, content: &Content, mode: Mode) -> Result<Segment, QrError> {
        let atoms = &self.atoms;
        let reject = || {
            QrError::mode(format!("content cannot be represented in {mode} mode"))
        };
        if let Content::Bytes(bytes) = content {
            // Byte content is written verbatim
            return match mode {
                Mode::Byte => Ok(self.byte_segment(bytes.clone())),
                Mode::Kanji => Segment::kanji(bytes.clone()).map_err(|_| reject()),
                _ if atoms.iter().all(|a| mode.includes(a.class)) => {
                    Ok(self.build(Run { mode, start: 0, end: atoms.len() }))
                }
                _ => Err(reject()),
            };
        }
        let fits = atoms.iter().all(|a| match mode {
            Mode::Numeric | Mode::Alphanumeric => mode.includes(a.class),
            Mode::Kanji => a.kanji.is_some(),
            Mode::Byte => a.bytes.is_some(),
        });
        if !fits {
            return Err(match mode {
                Mode::Byte => QrError::encoding(format!(
                    "content cannot be encoded as {}",
                    self.encoding.as_deref().unwrap_or("bytes")
                )),
                _ => reject(),
            });
        }
        Ok(self.build(Run {
            mode,
            start: 0,
            end: atoms.len(),
        }))
    }

    fn byte_segment(&self, data: Vec<u8>) -> Segment {
        let segment = Segment::bytes(data, self.encoding.clone());
        match self.eci {
            Some(designator) => segment.with_eci(designator),
            None => segment,
        }
    }

    /// Number of atoms (characters, bytes or kanji pairs)
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Whether the content is empty
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Whether an explicit mode was requested
    pub fn forced_mode(&self) -> Option<Mode> {
        self.forced.as_ref().map(Segment::mode)
    }

    /// Whether segments may carry an ECI header
    pub fn uses_eci(&self) -> bool {
        self.eci.is_some()
    }

    /// Segment list for the count indicator bracket of `version`
    pub fn segments(&self, version: Version) -> Vec<Segment> {
        if let Some(forced) = &self.forced {
            return vec![forced.clone()];
        }
        if self.atoms.is_empty() {
            return Vec::new();
        }
        let runs = self.plan(version.bracket());
        let mut segments: Vec<Segment> = runs.into_iter().map(|run| self.build(run)).collect();
        // Only the first byte segment carries the ECI designator
        let mut seen_eci = false;
        for segment in segments.iter_mut() {
            if segment.eci.is_some() {
                if seen_eci {
                    segment.eci = None;
                }
                seen_eci = true;
            }
        }
        segments
    }

    fn build(&self, run: Run) -> Segment {
        let atoms = &self.atoms[run.start..run.end];
        match run.mode {
            Mode::Numeric | Mode::Alphanumeric => {
                let data: Vec<u8> = atoms.iter().filter_map(|a| a.ascii).collect();
                let count = data.len();
                Segment::raw(run.mode, data, count)
            }
            Mode::Kanji => {
                let data: Vec<u8> = atoms.iter().filter_map(|a| a.kanji).flatten().collect();
                let count = data.len() / 2;
                Segment::raw(Mode::Kanji, data, count)
            }
            Mode::Byte => {
                let data: Vec<u8> = atoms
                    .iter()
                    .filter_map(|a| a.bytes.as_deref())
                    .flatten()
                    .copied()
                    .collect();
                self.byte_segment(data)
            }
        }
    }

    /// Bits of one run in `bracket`, `None` if it cannot be written
    fn run_bits(&self, run: &Run, bracket: usize) -> Option<usize> {
        let count = match run.mode {
            Mode::Byte => {
                if self.missing_prefix[run.end] != self.missing_prefix[run.start] {
                    return None;
                }
                self.byte_prefix[run.end] - self.byte_prefix[run.start]
            }
            _ => run.end - run.start,
        };
        let count_bits = tables::char_count_bits(run.mode, bracket)?;
        if count >> count_bits != 0 {
            return None;
        }
        Some(tables::mode_indicator_bits(bracket) + count_bits + run.mode.payload_bits(count))
    }

    /// Sum of run bits and number of byte runs
    fn window_cost(&self, runs: &[Run], bracket: usize) -> (Option<usize>, usize) {
        let bits = runs.iter().map(|r| self.run_bits(r, bracket)).sum();
        let byte_runs = runs.iter().filter(|r| r.mode == Mode::Byte).count();
        (bits, byte_runs)
    }

    fn total_cost(&self, bits: Option<usize>, byte_runs: usize) -> Option<usize> {
        let header = match self.eci {
            Some(designator) if byte_runs > 0 => eci_header_bits(designator),
            _ => 0,
        };
        bits.map(|b| b + header)
    }

    /// Maximal runs of atoms sharing the same narrowest mode
    fn initial_runs(&self) -> Vec<Run> {
        let mut runs: Vec<Run> = Vec::new();
        for (i, atom) in self.atoms.iter().enumerate() {
            match runs.last_mut() {
                Some(run) if run.mode == atom.class => run.end = i + 1,
                _ => runs.push(Run {
                    mode: atom.class,
                    start: i,
                    end: i + 1,
                }),
            }
        }
        runs
    }

    /// Runs around index `i` after converting run `i` to `mode` and
    /// coalescing equal neighbours. Returns the first replaced index and the
    /// replacement.
    fn converted_window(runs: &[Run], i: usize, mode: Mode) -> (usize, usize, Vec<Run>) {
        let lo = i.saturating_sub(1);
        let hi = (i + 2).min(runs.len());
        let mut window: Vec<Run> = Vec::with_capacity(3);
        for (j, run) in runs.iter().enumerate().take(hi).skip(lo) {
            let run = if j == i { Run { mode, ..*run } } else { *run };
            match window.last_mut() {
                Some(last) if last.mode == run.mode => last.end = run.end,
                _ => window.push(run),
            }
        }
        (lo, hi, window)
    }

    /// Greedy merge: repeatedly apply the conversion of a run to a wider
    /// neighbour's mode with the lowest total cost. Equal cost conversions
    /// are taken as well since they reduce the segment count; ties go to
    /// the fewest segments, then the leftmost run.
    fn plan(&self, bracket: usize) -> Vec<Run> {
        let mut runs = self.initial_runs();
        let (mut bits, mut byte_runs) = self.window_cost(&runs, bracket);

        loop {
            let current = self.total_cost(bits, byte_runs);
            let mut best: Option<Merge> = None;

            for i in 0..runs.len() {
                let neighbours = [i.checked_sub(1), Some(i + 1).filter(|&j| j < runs.len())];
                for target in neighbours.into_iter().flatten().map(|j| runs[j].mode) {
                    if target == runs[i].mode || !target.includes(runs[i].mode) {
                        continue;
                    }
                    let Some(merge) = self.evaluate(&runs, bits, byte_runs, i, target, bracket)
                    else {
                        continue;
                    };
                    let accept = match current {
                        None => true,
                        Some(cur) => {
                            merge.cost < cur || (merge.cost == cur && merge.len < runs.len())
                        }
                    };
                    if accept && best.as_ref().is_none_or(|b| merge.rank() < b.rank()) {
                        best = Some(merge);
                    }
                }
            }

            let Some(merge) = best else {
                break;
            };
            trace!(bracket, run = merge.index, cost = merge.cost, "merged run");
            runs.splice(merge.lo..merge.hi, merge.window);
            bits = Some(merge.bits);
            byte_runs = runs.iter().filter(|r| r.mode == Mode::Byte).count();
        }
        runs
    }

    /// Cost of converting run `i` to `target`, `None` if the result cannot
    /// be written
    fn evaluate(
        &self,
        runs: &[Run],
        bits: Option<usize>,
        byte_runs: usize,
        i: usize,
        target: Mode,
        bracket: usize,
    ) -> Option<Merge> {
        let (lo, hi, window) = Self::converted_window(runs, i, target);
        let (old_bits, old_bytes) = self.window_cost(&runs[lo..hi], bracket);
        let (new_bits, new_bytes) = self.window_cost(&window, bracket);
        let new_bits = new_bits?;
        let bits = match (bits, old_bits) {
            (Some(total), Some(old)) => total - old + new_bits,
            _ => {
                let mut trial = runs.to_vec();
                trial.splice(lo..hi, window.iter().copied());
                self.window_cost(&trial, bracket).0?
            }
        };
        let cost = self.total_cost(Some(bits), byte_runs - old_bytes + new_bytes)?;
        Some(Merge {
            cost,
            len: runs.len() - (hi - lo) + window.len(),
            index: i,
            lo,
            hi,
            window,
            bits,
        })
    }
}

/// A candidate run conversion
struct Merge {
    /// Total cost after the conversion, ECI header included
    cost: usize,
    /// Number of runs after the conversion
    len: usize,
    index: usize,
    lo: usize,
    hi: usize,
    window: Vec<Run>,
    /// Total run bits after the conversion
    bits: usize,
}

impl Merge {
    fn rank(&self) -> (usize, usize, usize) {
        (self.cost, self.len, self.index)
    }
}
