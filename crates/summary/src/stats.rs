//! Descriptive statistics and sampling primitives for column digests.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Arithmetic mean. Caller guarantees a non-empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n − 1 denominator). Zero for a single value.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Draw up to `amount` values without replacement from `values`, leaving the
/// source untouched. Repeated raw values stay eligible independently, so the
/// draw can contain duplicates of the same underlying value.
///
/// A seed makes the draw reproducible; without one each call is independent.
pub fn sample_values(values: &[String], amount: usize, seed: Option<u64>) -> Vec<String> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    values
        .choose_multiple(&mut rng, amount)
        .cloned()
        .collect()
}
