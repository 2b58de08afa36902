//! Quantile kernel shared by the efficiency and variability reports.
//!
//! Quartiles use linear interpolation between closest ranks (position
//! `(n - 1) * q` on the sorted sample). The same rule is applied to
//! every group regardless of its size, so small groups stay comparable
//! with large ones.

/// Quantile `q` in [0, 1] of a sorted, non-empty sample.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }

    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Middle element, or the average of the two middle elements.
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    quantile_sorted(sorted, 0.5)
}
