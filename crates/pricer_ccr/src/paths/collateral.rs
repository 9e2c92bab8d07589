//! Scenario path of one collateral agreement.

use super::vertex::CollateralGroupVertex;
use crate::error::CcrError;
use chrono::NaiveDate;

/// Time-ordered vertices of one collateral agreement in one scenario.
///
/// Anchor dates are strictly increasing and there is at least one vertex.
///
/// # Examples
///
/// ```
/// use pricer_ccr::paths::{CollateralGroupPath, CollateralGroupVertex};
/// use chrono::NaiveDate;
///
/// let d0 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let d1 = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
///
/// let path = CollateralGroupPath::new(vec![
///     CollateralGroupVertex::new(d0, 10.0, 0.0, 0.0).unwrap(),
///     CollateralGroupVertex::new(d1, 8.0, 0.0, 0.0).unwrap(),
/// ])
/// .unwrap();
///
/// assert_eq!(path.collateralized_exposures(), vec![10.0, 8.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CollateralGroupPath {
    vertices: Vec<CollateralGroupVertex>,
}

impl CollateralGroupPath {
    /// Creates a path from its vertices.
    ///
    /// # Errors
    ///
    /// - [`CcrError::Empty`] if `vertices` is empty.
    /// - [`CcrError::NonIncreasingDates`] if anchor dates are not strictly increasing.
    pub fn new(vertices: Vec<CollateralGroupVertex>) -> Result<Self, CcrError> {
        if vertices.is_empty() {
            return Err(CcrError::Empty("collateral group path"));
        }
        for (i, w) in vertices.windows(2).enumerate() {
            if w[1].anchor() <= w[0].anchor() {
                return Err(CcrError::NonIncreasingDates {
                    index: i + 1,
                    previous: w[0].anchor(),
                    next: w[1].anchor(),
                });
            }
        }
        Ok(Self { vertices })
    }

    /// Builds a path from parallel arrays of dates and values.
    ///
    /// # Errors
    ///
    /// Returns [`CcrError::VertexCountMismatch`] if the arrays differ in
    /// length, plus any error from [`CollateralGroupVertex::new`] or
    /// [`CollateralGroupPath::new`].
    pub fn from_series(
        dates: &[NaiveDate],
        forward_values: &[f64],
        cash_flows: &[f64],
        collateral_balances: &[f64],
    ) -> Result<Self, CcrError> {
        for len in [forward_values.len(), cash_flows.len(), collateral_balances.len()] {
            if len != dates.len() {
                return Err(CcrError::VertexCountMismatch {
                    expected: dates.len(),
                    actual: len,
                });
            }
        }
        let vertices = dates
            .iter()
            .zip(forward_values)
            .zip(cash_flows)
            .zip(collateral_balances)
            .map(|(((&d, &pv), &cf), &cb)| CollateralGroupVertex::new(d, pv, cf, cb))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(vertices)
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false; a path holds at least one vertex.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertices in date order.
    #[inline]
    pub fn vertices(&self) -> &[CollateralGroupVertex] {
        &self.vertices
    }

    /// Vertex at `index`, if any.
    #[inline]
    pub fn vertex(&self, index: usize) -> Option<&CollateralGroupVertex> {
        self.vertices.get(index)
    }

    /// Anchor dates in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.vertices.iter().map(|v| v.anchor()).collect()
    }

    /// Collateralised exposure at every vertex.
    pub fn collateralized_exposures(&self) -> Vec<f64> {
        self.vertices
            .iter()
            .map(|v| v.collateralized_exposure())
            .collect()
    }

    /// Uncollateralised exposure at every vertex.
    pub fn uncollateralized_exposures(&self) -> Vec<f64> {
        self.vertices
            .iter()
            .map(|v| v.uncollateralized_exposure())
            .collect()
    }
}
