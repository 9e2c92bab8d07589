//! One dated exposure snapshot for a collateral agreement.

use crate::error::CcrError;
use chrono::NaiveDate;

/// Forward value, realised cash flow and collateral balance of one
/// collateral agreement at one anchor date of one scenario.
///
/// # Examples
///
/// ```
/// use pricer_ccr::paths::CollateralGroupVertex;
/// use chrono::NaiveDate;
///
/// let anchor = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
/// let vertex = CollateralGroupVertex::new(anchor, 120.0, 5.0, 100.0).unwrap();
///
/// assert_eq!(vertex.collateralized_exposure(), 25.0);
/// assert_eq!(vertex.uncollateralized_exposure(), 125.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollateralGroupVertex {
    anchor: NaiveDate,
    forward_value: f64,
    cash_flow: f64,
    collateral_balance: f64,
}

impl CollateralGroupVertex {
    /// Creates a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`CcrError::NonFinite`] if any value is NaN or infinite.
    pub fn new(
        anchor: NaiveDate,
        forward_value: f64,
        cash_flow: f64,
        collateral_balance: f64,
    ) -> Result<Self, CcrError> {
        Ok(Self {
            anchor,
            forward_value: CcrError::ensure_finite("forward value", forward_value)?,
            cash_flow: CcrError::ensure_finite("cash flow", cash_flow)?,
            collateral_balance: CcrError::ensure_finite("collateral balance", collateral_balance)?,
        })
    }

    /// Anchor date of the snapshot.
    #[inline]
    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Forward present value of the trades under the agreement.
    #[inline]
    pub fn forward_value(&self) -> f64 {
        self.forward_value
    }

    /// Cash flow realised inside the default window.
    #[inline]
    pub fn cash_flow(&self) -> f64 {
        self.cash_flow
    }

    /// Collateral held (positive) or posted (negative).
    #[inline]
    pub fn collateral_balance(&self) -> f64 {
        self.collateral_balance
    }

    /// Forward value + cash flow − collateral balance.
    #[inline]
    pub fn collateralized_exposure(&self) -> f64 {
        self.forward_value + self.cash_flow - self.collateral_balance
    }

    /// Forward value + cash flow.
    #[inline]
    pub fn uncollateralized_exposure(&self) -> f64 {
        self.forward_value + self.cash_flow
    }
}
