use std::collections::HashSet;
use std::hash::Hash;

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

pub fn clamp_unit(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

/// Round to four decimal places so stored scores compare stably.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Weighted sum over `(value, weight)` pairs.
pub fn weighted_sum(terms: &[(f64, f64)]) -> f64 {
    terms.iter().map(|(value, weight)| value * weight).sum()
}

/// |A ∩ B| / |A ∪ B|. Two empty sets share nothing, so their similarity is 0.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Peaks at 1.0 when `similarity == peak` and falls off linearly, reaching 0
/// at `peak ± 0.5`.
pub fn complementarity(similarity: f64, peak: f64) -> f64 {
    (1.0 - (similarity - peak).abs() * 2.0).max(0.0)
}
