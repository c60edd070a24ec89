//! Sample-size calculation with Cochran's formula.
//!
//! The initial size for an infinite population is
//! `n0 = z² · p · (1 − p) / e²`. For a finite population of size `N` it is
//! corrected to `n = n0 / (1 + (n0 − 1) / N)`. The reported size is the
//! integer part of the applicable value.

use std::ops::RangeInclusive;

/// Accepted range of the estimated proportion `p`.
pub const PROPORTION_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Accepted range of the margin of error `e`.
pub const MARGIN_RANGE: RangeInclusive<f64> = 0.001..=1.0;

/// Inputs of Cochran's formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSizeParams {
    /// Z-score of the confidence level (1.96 for 95%).
    pub z: f64,
    /// Estimated proportion of the attribute in the population.
    pub p: f64,
    /// Margin of error.
    pub e: f64,
    /// Population size, `0` for an infinite population.
    pub population: u64,
}

impl Default for SampleSizeParams {
    fn default() -> Self {
        Self {
            z: 1.96,
            p: 0.5,
            e: 0.05,
            population: 0,
        }
    }
}

/// Result of Cochran's formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSize {
    /// Size for an infinite population.
    pub initial: f64,
    /// Size after finite-population correction, when a population was given.
    pub corrected: Option<f64>,
    /// Integer part of the applicable size.
    pub size: u64,
}

impl SampleSize {
    #[must_use]
    pub fn is_corrected(&self) -> bool {
        self.corrected.is_some()
    }
}

impl SampleSizeParams {
    /// Returns a copy with `p` and `e` clamped into their accepted ranges.
    ///
    /// Input fields apply these bounds; the formula itself does not validate.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            p: self
                .p
                .clamp(*PROPORTION_RANGE.start(), *PROPORTION_RANGE.end()),
            e: self.e.clamp(*MARGIN_RANGE.start(), *MARGIN_RANGE.end()),
            ..self
        }
    }

    /// Applies Cochran's formula.
    ///
    /// # Examples
    ///
    /// ```
    /// use sondage_stats::cochran::SampleSizeParams;
    ///
    /// let infinite = SampleSizeParams::default().compute();
    /// assert_eq!(infinite.size, 384);
    ///
    /// let finite = SampleSizeParams { population: 1000, ..Default::default() }.compute();
    /// assert_eq!(finite.size, 277);
    /// ```
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn compute(&self) -> SampleSize {
        let Self { z, p, e, population } = *self;
        let initial = z.powi(2) * p * (1.0 - p) / e.powi(2);
        let corrected =
            (population > 0).then(|| initial / (1.0 + (initial - 1.0) / population as f64));
        let size = corrected.unwrap_or(initial).floor() as u64;
        SampleSize {
            initial,
            corrected,
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinite_population() {
        let result = SampleSizeParams::default().compute();
        assert!((result.initial - 384.16).abs() < 1e-9);
        assert_eq!(result.corrected, None);
        assert_eq!(result.size, 384);
    }

    #[test]
    fn test_finite_population() {
        let result = SampleSizeParams {
            population: 1000,
            ..Default::default()
        }
        .compute();
        assert!((result.corrected.unwrap() - 277.7).abs() < 0.1);
        assert_eq!(result.size, 277);
        assert!(result.is_corrected());
    }

    #[test]
    fn test_degenerate_proportion() {
        let result = SampleSizeParams {
            p: 0.0,
            ..Default::default()
        }
        .compute();
        assert_eq!(result.size, 0);
    }

    #[test]
    fn test_small_population_shrinks_size() {
        let result = SampleSizeParams {
            population: 50,
            ..Default::default()
        }
        .compute();
        assert!(result.size < 50);
        assert_eq!(result.size, 44);
    }

    #[test]
    fn test_clamped() {
        let params = SampleSizeParams {
            p: 1.5,
            e: 0.0,
            ..Default::default()
        }
        .clamped();
        assert_eq!(params.p, 1.0);
        assert_eq!(params.e, 0.001);
    }
}
