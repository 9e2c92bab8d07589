//! Credit and debt valuation adjustments of one netting set.
//!
//! Losses are realised at the moment of default, so these integrals weight
//! each interval by the default-probability mass it carries,
//! `S(vᵢ₋₁) − S(vᵢ)`, rather than by its length.
//!
//! # Formulas
//!
//! ```text
//! L(v)  = EPE_pv(v) × (1 − R_C(v))
//! UCVA  = −Σ ½·(L(vᵢ₋₁) + L(vᵢ)) × (S_C(vᵢ₋₁) − S_C(vᵢ))
//! CVA   = −Σ ½·(L(vᵢ₋₁)·S_B(vᵢ₋₁) + L(vᵢ)·S_B(vᵢ)) × (S_C(vᵢ₋₁) − S_C(vᵢ))
//! L'(v) = ENE_pv(v) × (1 − R_B(v))
//! DVA   = −Σ ½·(L'(vᵢ₋₁) + L'(vᵢ)) × (S_B(vᵢ₋₁) − S_B(vᵢ))
//! ```
//!
//! Where EPE_pv / ENE_pv are the positive / negative parts of the netted
//! collateralised exposure in the collateral numeraire.

use super::{integrand, CurveFactor, ExposureGroupPath, ExposureKind};
use crate::error::CcrError;
use crate::integration::{integrate_on_grid, integrate_on_grid_by_period, IntervalWeights, Sign};
use crate::paths::{CollateralGroupPath, NumerairePath};
use serde::Serialize;
use std::sync::Arc;

/// Survival-decrement adjustments computed on a netting set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CreditMeasure {
    /// Unilateral CVA: the bank is assumed default-free.
    UnilateralCva,
    /// Bilateral CVA: each loss is weighted by the bank's survival.
    BilateralCva,
    /// Debt valuation adjustment.
    Dva,
}

impl CreditMeasure {
    /// All credit measures.
    pub const ALL: [Self; 3] = [Self::UnilateralCva, Self::BilateralCva, Self::Dva];

    fn exposure_kind(self) -> ExposureKind {
        match self {
            CreditMeasure::UnilateralCva | CreditMeasure::BilateralCva => {
                ExposureKind::COLLATERALIZED_POSITIVE_PV
            }
            CreditMeasure::Dva => ExposureKind::COLLATERALIZED_NEGATIVE_PV,
        }
    }

    fn factors(self) -> &'static [CurveFactor] {
        match self {
            CreditMeasure::UnilateralCva => &[CurveFactor::CounterpartyLossGivenDefault],
            CreditMeasure::BilateralCva => &[
                CurveFactor::CounterpartyLossGivenDefault,
                CurveFactor::BankSurvival,
            ],
            CreditMeasure::Dva => &[CurveFactor::BankLossGivenDefault],
        }
    }

    /// Survival curve whose decrements weight the intervals.
    fn defaulting_entity(self) -> CurveFactor {
        match self {
            CreditMeasure::UnilateralCva | CreditMeasure::BilateralCva => {
                CurveFactor::CounterpartySurvival
            }
            CreditMeasure::Dva => CurveFactor::BankSurvival,
        }
    }
}

/// One netting set in one scenario, with its credit and debt adjustments.
///
/// # Examples
///
/// ```
/// use pricer_ccr::groups::NettingGroupPath;
/// use pricer_ccr::paths::{CollateralGroupPath, CreditState, NumeraireCurvePoint, NumerairePath};
/// use chrono::NaiveDate;
/// use std::sync::Arc;
///
/// let dates = [
///     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
/// ];
/// let group = CollateralGroupPath::from_series(&dates, &[100.0, 100.0], &[0.0; 2], &[0.0; 2]).unwrap();
///
/// let bank = CreditState::risk_free(0.4).unwrap();
/// let points = vec![
///     NumeraireCurvePoint::new(dates[0], 0.0, 0.0, bank, 0.0, CreditState::new(1.0, 0.4, 0.02).unwrap()).unwrap(),
///     NumeraireCurvePoint::new(dates[1], 0.0, 0.0, bank, 0.0, CreditState::new(0.98, 0.4, 0.02).unwrap()).unwrap(),
/// ];
/// let numeraire = Arc::new(NumerairePath::new(points).unwrap());
///
/// let netting = NettingGroupPath::new(vec![Arc::new(group)], numeraire).unwrap();
///
/// // −100 × 0.6 × 0.02
/// assert!((netting.credit_adjustment() + 1.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct NettingGroupPath {
    exposure: ExposureGroupPath,
}

impl NettingGroupPath {
    /// Creates a netting group from its collateral groups and numeraire path.
    ///
    /// # Errors
    ///
    /// See [`ExposureGroupPath::new`].
    pub fn new(
        collateral_groups: Vec<Arc<CollateralGroupPath>>,
        numeraire: Arc<NumerairePath>,
    ) -> Result<Self, CcrError> {
        ExposureGroupPath::new(collateral_groups, numeraire).map(Self::from_exposure)
    }

    /// Wraps an existing exposure roll-up.
    pub fn from_exposure(exposure: ExposureGroupPath) -> Self {
        Self { exposure }
    }

    /// The netted exposure series.
    #[inline]
    pub fn exposure_group(&self) -> &ExposureGroupPath {
        &self.exposure
    }

    /// Integrand of `measure` at every vertex.
    pub fn integrand(&self, measure: CreditMeasure) -> Vec<f64> {
        integrand(&self.exposure, measure.exposure_kind(), measure.factors())
    }

    /// Value of `measure` over the whole grid.
    pub fn adjustment(&self, measure: CreditMeasure) -> f64 {
        let f = self.integrand(measure);
        let survival = measure
            .defaulting_entity()
            .series(self.exposure.numeraire());
        integrate_on_grid(
            Sign::Negative,
            &f,
            IntervalWeights::SurvivalDecrements(&survival),
        )
    }

    /// Per-interval contributions of `measure` (`vertex_count() - 1` values).
    pub fn adjustment_by_period(&self, measure: CreditMeasure) -> Vec<f64> {
        let f = self.integrand(measure);
        let survival = measure
            .defaulting_entity()
            .series(self.exposure.numeraire());
        integrate_on_grid_by_period(
            Sign::Negative,
            &f,
            IntervalWeights::SurvivalDecrements(&survival),
        )
    }

    /// Credit valuation adjustment.
    ///
    /// This is the **bilateral** CVA, identical to
    /// [`Self::bilateral_credit_adjustment`]. Use
    /// [`Self::unilateral_credit_adjustment`] for the variant that ignores
    /// the bank's own default.
    pub fn credit_adjustment(&self) -> f64 {
        self.bilateral_credit_adjustment()
    }

    /// Per-period bilateral CVA; see [`Self::credit_adjustment`].
    pub fn credit_adjustment_by_period(&self) -> Vec<f64> {
        self.bilateral_credit_adjustment_by_period()
    }

    /// Unilateral CVA.
    pub fn unilateral_credit_adjustment(&self) -> f64 {
        self.adjustment(CreditMeasure::UnilateralCva)
    }

    /// Per-period unilateral CVA.
    pub fn unilateral_credit_adjustment_by_period(&self) -> Vec<f64> {
        self.adjustment_by_period(CreditMeasure::UnilateralCva)
    }

    /// Bilateral CVA.
    pub fn bilateral_credit_adjustment(&self) -> f64 {
        self.adjustment(CreditMeasure::BilateralCva)
    }

    /// Per-period bilateral CVA.
    pub fn bilateral_credit_adjustment_by_period(&self) -> Vec<f64> {
        self.adjustment_by_period(CreditMeasure::BilateralCva)
    }

    /// Debt valuation adjustment.
    pub fn debt_adjustment(&self) -> f64 {
        self.adjustment(CreditMeasure::Dva)
    }

    /// Per-period DVA.
    pub fn debt_adjustment_by_period(&self) -> Vec<f64> {
        self.adjustment_by_period(CreditMeasure::Dva)
    }
}
