//! Weighted Random Choice
//!
//! Linear-scan weighted selection. Index `i` is chosen with probability
//! `weight[i] / total`; when every weight is zero the choice is uniform.

use rand::Rng;

use crate::error::SamplingError;

/// Upper clamp for a single weight.
pub const MAX_WEIGHT: f64 = i32::MAX as f64;

/// Replacements for non-finite floats.
pub trait FloatExt {
    /// Returns `default` if the value is NaN.
    fn if_nan_then(self, default: f64) -> f64;
    /// Returns `default` if the value is positive infinity.
    fn if_inf_then(self, default: f64) -> f64;
    /// Returns `default` if the value is negative infinity.
    fn if_neg_inf_then(self, default: f64) -> f64;
}

impl FloatExt for f64 {
    fn if_nan_then(self, default: f64) -> f64 {
        if self.is_nan() {
            default
        } else {
            self
        }
    }

    fn if_inf_then(self, default: f64) -> f64 {
        if self == f64::INFINITY {
            default
        } else {
            self
        }
    }

    fn if_neg_inf_then(self, default: f64) -> f64 {
        if self == f64::NEG_INFINITY {
            default
        } else {
            self
        }
    }
}

/// Clamps a weight into `[0, max]`, mapping NaN to 0.
pub fn clamp_weight(weight: f64, max: f64) -> f64 {
    weight.if_nan_then(0.0).max(0.0).min(max)
}

/// Picks an index with probability proportional to its weight.
///
/// Weights are clamped to `[0, MAX_WEIGHT]` first. Any numeric type that
/// converts losslessly into `f64` works, so integer rarities can be passed
/// directly.
pub fn sample_weighted<W, R>(weights: &[W], rng: &mut R) -> Result<usize, SamplingError>
where
    W: Copy + Into<f64>,
    R: Rng + ?Sized,
{
    sample_weighted_with_max(weights, MAX_WEIGHT, rng)
}

/// [`sample_weighted`] with weights clamped to `[0, max_weight]`.
pub fn sample_weighted_with_max<W, R>(weights: &[W], max_weight: f64, rng: &mut R) -> Result<usize, SamplingError>
where
    W: Copy + Into<f64>,
    R: Rng + ?Sized,
{
    if weights.is_empty() {
        tracing::warn!("Cannot pick a weighted index from an empty list");
        return Err(SamplingError::EmptyWeights);
    }

    let clamped: Vec<f64> = weights
        .iter()
        .map(|&w| clamp_weight(w.into(), max_weight))
        .collect();

    let total: f64 = clamped.iter().sum();
    if total <= 0.0 {
        return Ok(rng.gen_range(0..clamped.len()));
    }

    let roll = rng.gen::<f64>() * total;
    let mut accumulated = 0.0;
    for (index, weight) in clamped.iter().enumerate() {
        accumulated += weight;
        if accumulated > roll {
            return Ok(index);
        }
    }

    // Floating point error left the roll past the final sum
    Ok(clamped.len() - 1)
}

/// Picks one `(item, weight)` pair with probability proportional to its weight.
pub fn choose_weighted<'a, T, R>(pairs: &'a [(T, f64)], rng: &mut R) -> Result<&'a (T, f64), SamplingError>
where
    R: Rng + ?Sized,
{
    let weights: Vec<f64> = pairs.iter().map(|(_, weight)| *weight).collect();
    let index = sample_weighted(&weights, rng)?;
    Ok(&pairs[index])
}
