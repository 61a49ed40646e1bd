/// Mask pattern application and selection
use rayon::prelude::*;
use tracing::trace;

use crate::encoder::config;
use crate::encoder::format::FormatInfo;
use crate::encoder::function_mask::FunctionMask;
use crate::models::{BitMatrix, ECLevel, MaskPattern, Version};

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

/// XOR the mask pattern onto every data module
pub fn apply_mask(matrix: &mut BitMatrix, func: &FunctionMask, pattern: MaskPattern) {
    let size = matrix.size();
    for y in 0..size {
        for x in 0..size {
            if !func.is_function(x, y) && pattern.is_masked(y, x) {
                matrix.toggle(x, y);
            }
        }
    }
}

/// Run history for the finder-like (1:1:3:1:1) penalty; the area outside the
/// symbol counts as light
struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: usize) -> Self {
        Self {
            qr_size: size as i32,
            run_history: [0; 7],
        }
    }

    fn add_history(&mut self, mut current_run_length: i32) {
        if self.run_history[0] == 0 {
            current_run_length += self.qr_size;
        }
        self.run_history.copy_within(0..6, 1);
        self.run_history[0] = current_run_length;
    }

    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        i32::from(
            n > 0
                && rh[2] == n
                && rh[3] == n * 3
                && rh[4] == n
                && rh[5] == n
                && (rh[0] >= n * 4 || rh[6] >= n * 4),
        )
    }

    fn terminate_and_count(
        mut self,
        current_run_color: bool,
        mut current_run_length: i32,
    ) -> i32 {
        if current_run_color {
            self.add_history(current_run_length);
            current_run_length = 0;
        }
        current_run_length += self.qr_size;
        self.add_history(current_run_length);
        self.count_patterns()
    }
}

/// N1 and N3 penalties of one row or column
fn line_penalty(size: usize, module: impl Fn(usize) -> bool) -> i32 {
    let mut result = 0;
    let mut run_color = false;
    let mut run_len = 0;
    let mut history = FinderPenalty::new(size);
    for i in 0..size {
        let dark = module(i);
        if dark == run_color {
            run_len += 1;
            if run_len == 5 {
                result += PENALTY_N1;
            } else if run_len > 5 {
                result += 1;
            }
        } else {
            history.add_history(run_len);
            if !run_color {
                result += history.count_patterns() * PENALTY_N3;
            }
            run_color = dark;
            run_len = 1;
        }
    }
    result + history.terminate_and_count(run_color, run_len) * PENALTY_N3
}

/// Penalty score of a QR Code symbol; lower is better
pub fn penalty_score(matrix: &BitMatrix) -> i32 {
    let size = matrix.size();
    let mut result = 0;

    for y in 0..size {
        result += line_penalty(size, |x| matrix.get(x, y));
    }
    for x in 0..size {
        result += line_penalty(size, |y| matrix.get(x, y));
    }

    for y in 0..size.saturating_sub(1) {
        for x in 0..size - 1 {
            let color = matrix.get(x, y);
            if color == matrix.get(x + 1, y)
                && color == matrix.get(x, y + 1)
                && color == matrix.get(x + 1, y + 1)
            {
                result += PENALTY_N2;
            }
        }
    }

    let dark = matrix.count_dark() as i32;
    let total = (size * size) as i32;
    if total > 0 {
        let k = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        result += k * PENALTY_N4;
    }
    result
}

/// Evaluation score of a Micro QR Code symbol; higher is better
pub fn micro_score(matrix: &BitMatrix) -> i32 {
    let size = matrix.size();
    let last = size - 1;
    let sum1 = (1..size).filter(|&y| matrix.get(last, y)).count() as i32;
    let sum2 = (1..size).filter(|&x| matrix.get(x, last)).count() as i32;
    if sum1 <= sum2 {
        sum1 * 16 + sum2
    } else {
        sum2 * 16 + sum1
    }
}

/// Masked symbol with format information for one candidate
fn masked_candidate(
    base: &BitMatrix,
    func: &FunctionMask,
    level: Option<ECLevel>,
    index: u8,
) -> BitMatrix {
    let version = func.version();
    let mut matrix = base.clone();
    if let Some(pattern) = MaskPattern::for_version(version, index) {
        apply_mask(&mut matrix, func, pattern);
    }
    FormatInfo::new(version, level, index).draw(&mut matrix);
    matrix
}

/// Cost used to rank candidates: lower wins, ties go to the lower index
fn candidate_cost(version: Version, matrix: &BitMatrix) -> i32 {
    if version.is_micro() {
        -micro_score(matrix)
    } else {
        penalty_score(matrix)
    }
}

fn use_parallel(version: Version) -> bool {
    !version.is_micro()
        && config::parallel_masks()
        && version.number() >= config::parallel_min_version()
}

/// Pick the best mask for `base` (function patterns and data placed) and
/// return its index with the finished symbol
pub fn select_mask(
    base: &BitMatrix,
    func: &FunctionMask,
    level: Option<ECLevel>,
) -> (u8, BitMatrix) {
    let version = func.version();
    let count = MaskPattern::count(version);
    let score = |index: u8| {
        let matrix = masked_candidate(base, func, level, index);
        let cost = candidate_cost(version, &matrix);
        trace!(%version, mask = index, cost, "mask candidate");
        (cost, index, matrix)
    };

    let best = if use_parallel(version) {
        (0..count)
            .into_par_iter()
            .map(score)
            .min_by_key(|(cost, index, _)| (*cost, *index))
    } else {
        (0..count)
            .map(score)
            .min_by_key(|(cost, index, _)| (*cost, *index))
    };

    match best {
        Some((_, index, matrix)) => (index, matrix),
        None => (0, masked_candidate(base, func, level, 0)),
    }
}

/// Apply a caller-chosen mask
pub fn fixed_mask(
    base: &BitMatrix,
    func: &FunctionMask,
    level: Option<ECLevel>,
    index: u8,
) -> BitMatrix {
    masked_candidate(base, func, level, index)
}
