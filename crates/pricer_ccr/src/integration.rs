//! Trapezoidal adjustment integrals over the exposure date grid.
//!
//! Every valuation adjustment in this crate has the same shape:
//!
//! ```text
//! adjustment = sign × Σᵢ ½·(f(vᵢ₋₁) + f(vᵢ))·wᵢ
//! ```
//!
//! where `f` is a vertex-indexed integrand and `wᵢ` is the weight of the
//! interval `[vᵢ₋₁, vᵢ]`. Two weightings exist and must not be mixed:
//!
//! - [`IntervalWeights::YearFractions`]: a continuously accruing spread
//!   (funding adjustments), `wᵢ = Δtᵢ`.
//! - [`IntervalWeights::SurvivalDecrements`]: default-probability mass
//!   (credit and debt adjustments), `wᵢ = S(vᵢ₋₁) − S(vᵢ)`.

use crate::error::CcrError;

/// Sign applied to an integral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Multiply by +1.
    Positive,
    /// Multiply by −1.
    Negative,
}

impl Sign {
    #[inline]
    fn apply(self, value: f64) -> f64 {
        match self {
            Sign::Positive => value,
            Sign::Negative => -value,
        }
    }
}

/// Per-interval weights of a trapezoidal integral.
#[derive(Debug, Clone, Copy)]
pub enum IntervalWeights<'a> {
    /// Interval lengths Δtᵢ, one per interval (`vertices - 1` values).
    YearFractions(&'a [f64]),
    /// Survival probabilities, one per vertex; the weight of interval `i`
    /// is `S[i - 1] - S[i]`.
    SurvivalDecrements(&'a [f64]),
}

impl IntervalWeights<'_> {
    /// Weight of the interval ending at vertex `i` (`i >= 1`).
    #[inline]
    fn weight(&self, i: usize) -> f64 {
        match self {
            IntervalWeights::YearFractions(dt) => dt[i - 1],
            IntervalWeights::SurvivalDecrements(s) => s[i - 1] - s[i],
        }
    }

    /// Checks that the weights cover a grid of `n_vertices` points.
    ///
    /// # Errors
    ///
    /// [`CcrError::VertexCountMismatch`] unless there are `n_vertices - 1`
    /// year fractions or `n_vertices` survival probabilities.
    pub fn ensure_covers(&self, n_vertices: usize) -> Result<(), CcrError> {
        let (expected, actual) = match self {
            IntervalWeights::YearFractions(dt) => (n_vertices.saturating_sub(1), dt.len()),
            IntervalWeights::SurvivalDecrements(s) => (n_vertices, s.len()),
        };
        if expected != actual {
            return Err(CcrError::VertexCountMismatch { expected, actual });
        }
        Ok(())
    }
}

/// Signed interval contributions `sign × ½·(f(vᵢ₋₁) + f(vᵢ))·wᵢ`.
///
/// Yields `integrand.len() - 1` values. The weights must already cover the
/// integrand's grid.
fn interval_contributions<'a>(
    sign: Sign,
    integrand: &'a [f64],
    weights: IntervalWeights<'a>,
) -> impl Iterator<Item = f64> + 'a {
    (1..integrand.len())
        .map(move |i| sign.apply(0.5 * (integrand[i - 1] + integrand[i]) * weights.weight(i)))
}

/// Sum of the signed interval contributions.
///
/// A single-vertex grid integrates to zero.
///
/// # Errors
///
/// [`CcrError::VertexCountMismatch`] if `weights` do not cover the grid of
/// `integrand`; weights are never truncated or padded.
///
/// # Examples
///
/// ```
/// use pricer_ccr::integration::{integrate, IntervalWeights, Sign};
///
/// let f = [1.0, 1.0, 1.0];
/// let dt = [0.5, 0.5];
/// let value = integrate(Sign::Negative, &f, IntervalWeights::YearFractions(&dt)).unwrap();
/// assert_eq!(value, -1.0);
///
/// assert!(integrate(Sign::Negative, &f, IntervalWeights::YearFractions(&[0.5])).is_err());
/// ```
pub fn integrate(sign: Sign, integrand: &[f64], weights: IntervalWeights<'_>) -> Result<f64, CcrError> {
    weights.ensure_covers(integrand.len())?;
    Ok(integrate_on_grid(sign, integrand, weights))
}

/// The individual signed interval contributions, for period attribution.
///
/// Summing the result gives exactly [`integrate`].
///
/// # Errors
///
/// As [`integrate`].
pub fn integrate_by_period(
    sign: Sign,
    integrand: &[f64],
    weights: IntervalWeights<'_>,
) -> Result<Vec<f64>, CcrError> {
    weights.ensure_covers(integrand.len())?;
    Ok(integrate_on_grid_by_period(sign, integrand, weights))
}

/// [`integrate`] for callers whose weights come from the integrand's own
/// validated grid.
pub(crate) fn integrate_on_grid(sign: Sign, integrand: &[f64], weights: IntervalWeights<'_>) -> f64 {
    debug_assert!(weights.ensure_covers(integrand.len()).is_ok());
    interval_contributions(sign, integrand, weights).sum()
}

/// [`integrate_by_period`] for callers whose weights come from the
/// integrand's own validated grid.
pub(crate) fn integrate_on_grid_by_period(
    sign: Sign,
    integrand: &[f64],
    weights: IntervalWeights<'_>,
) -> Vec<f64> {
    debug_assert!(weights.ensure_covers(integrand.len()).is_ok());
    interval_contributions(sign, integrand, weights).collect()
}

/// Vertex-wise product of `factors`, each of length `n`.
///
/// Used to assemble integrands such as EPE·S_B·s_B·S_C from curve series.
pub(crate) fn pointwise_product(n: usize, factors: &[&[f64]]) -> Vec<f64> {
    (0..n)
        .map(|i| factors.iter().fold(1.0, |acc, f| acc * f[i]))
        .collect()
}
