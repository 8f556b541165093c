//! Small descriptive-statistics helpers used by the aggregator.
//!
//! Percentiles use linear interpolation between adjacent order statistics:
//! for `N` sorted values the rank of quantile `q` is `q / 100 * (N - 1)`, and
//! the result is interpolated between the values at `floor(rank)` and
//! `ceil(rank)`. Past the midpoint the interpolation is taken back from the
//! upper value, which keeps results bit-identical to numpy's `linear` method.

/// Arithmetic mean, or `None` for an empty slice.
///
/// Finite inputs always give a finite mean, even when their sum overflows.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let sum = values.iter().sum::<f64>();
    if sum.is_finite() {
        return Some(sum / n);
    }
    Some(values.iter().map(|v| v / n).sum())
}

/// The `q`-th percentile (`0.0..=100.0`) of unsorted `values`.
///
/// Returns `None` when `values` is empty or `q` is out of range.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=100.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(percentile_sorted(&sorted, q))
}

/// Same as [`percentile`] but `sorted` must already be in ascending order and
/// non-empty.
pub(crate) fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    let last = sorted.len() - 1;
    let rank = q / 100.0 * last as f64;
    let lo = (rank.floor() as usize).min(last);
    let hi = (rank.ceil() as usize).min(last);
    let frac = rank - lo as f64;
    let delta = sorted[hi] - sorted[lo];
    if frac >= 0.5 {
        sorted[hi] - delta * (1.0 - frac)
    } else {
        sorted[lo] + delta * frac
    }
}

/// Round to `decimals` places, ties to even (`0.125 -> 0.12`).
///
/// Values too large to scale have no fractional digits left and are returned
/// unchanged.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / factor
}
