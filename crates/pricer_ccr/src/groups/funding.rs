//! Funding valuation adjustments of one funding set.
//!
//! Funding costs accrue continuously at the bank's funding spread, so each
//! interval is weighted by its year fraction Δtᵢ.
//!
//! # Formulas
//!
//! | Measure | Sign | Integrand                                   |
//! |---------|------|---------------------------------------------|
//! | FVA     | −    | EPE_pv · S_B · s_B · S_C                    |
//! | FDA     | +    | EPE_pv · S_B · (1 − R_B) · λ_B · S_C        |
//! | FCA     | −    | EPE_pv · S_B · s_B                          |
//! | FBA     | −    | ENE_pv · S_B · s_B                          |
//! | SFVA    | −    | CE_pv · S_B · s_B                           |
//!
//! Each value is `sign × Σ ½·(f(vᵢ₋₁) + f(vᵢ))·Δtᵢ`.

use super::{integrand, CurveFactor, ExposureGroupPath, ExposureKind};
use crate::error::CcrError;
use crate::integration::{integrate_on_grid, integrate_on_grid_by_period, IntervalWeights, Sign};
use crate::paths::{CollateralGroupPath, NumerairePath};
use serde::Serialize;
use std::sync::Arc;

/// Continuous-spread adjustments computed on a funding set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FundingMeasure {
    /// Funding value adjustment.
    Fva,
    /// Funding debt adjustment.
    Fda,
    /// Funding cost adjustment.
    Fca,
    /// Funding benefit adjustment.
    Fba,
    /// Symmetric funding value adjustment, on the unsplit exposure.
    SymmetricFva,
}

impl FundingMeasure {
    /// All funding measures.
    pub const ALL: [Self; 5] = [
        Self::Fva,
        Self::Fda,
        Self::Fca,
        Self::Fba,
        Self::SymmetricFva,
    ];

    fn sign(self) -> Sign {
        match self {
            FundingMeasure::Fda => Sign::Positive,
            _ => Sign::Negative,
        }
    }

    fn exposure_kind(self) -> ExposureKind {
        match self {
            FundingMeasure::Fva | FundingMeasure::Fda | FundingMeasure::Fca => {
                ExposureKind::COLLATERALIZED_POSITIVE_PV
            }
            FundingMeasure::Fba => ExposureKind::COLLATERALIZED_NEGATIVE_PV,
            FundingMeasure::SymmetricFva => ExposureKind::COLLATERALIZED_PV,
        }
    }

    fn factors(self) -> &'static [CurveFactor] {
        use CurveFactor::*;
        match self {
            FundingMeasure::Fva => &[BankSurvival, BankFundingSpread, CounterpartySurvival],
            FundingMeasure::Fda => &[
                BankSurvival,
                BankLossGivenDefault,
                BankHazardRate,
                CounterpartySurvival,
            ],
            FundingMeasure::Fca | FundingMeasure::Fba | FundingMeasure::SymmetricFva => {
                &[BankSurvival, BankFundingSpread]
            }
        }
    }
}

/// One funding set in one scenario, with its funding adjustments.
#[derive(Debug, Clone)]
pub struct FundingGroupPath {
    exposure: ExposureGroupPath,
}

impl FundingGroupPath {
    /// Creates a funding group from its collateral groups and numeraire path.
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
    pub fn integrand(&self, measure: FundingMeasure) -> Vec<f64> {
        integrand(&self.exposure, measure.exposure_kind(), measure.factors())
    }

    /// Value of `measure` over the whole grid.
    pub fn adjustment(&self, measure: FundingMeasure) -> f64 {
        integrate_on_grid(
            measure.sign(),
            &self.integrand(measure),
            IntervalWeights::YearFractions(self.exposure.year_fractions()),
        )
    }

    /// Per-interval contributions of `measure` (`vertex_count() - 1` values).
    pub fn adjustment_by_period(&self, measure: FundingMeasure) -> Vec<f64> {
        integrate_on_grid_by_period(
            measure.sign(),
            &self.integrand(measure),
            IntervalWeights::YearFractions(self.exposure.year_fractions()),
        )
    }

    /// Funding value adjustment.
    pub fn funding_value_adjustment(&self) -> f64 {
        self.adjustment(FundingMeasure::Fva)
    }

    /// Per-period FVA.
    pub fn funding_value_adjustment_by_period(&self) -> Vec<f64> {
        self.adjustment_by_period(FundingMeasure::Fva)
    }

    /// Funding debt adjustment.
    pub fn funding_debt_adjustment(&self) -> f64 {
        self.adjustment(FundingMeasure::Fda)
    }

    /// Per-period FDA.
    pub fn funding_debt_adjustment_by_period(&self) -> Vec<f64> {
        self.adjustment_by_period(FundingMeasure::Fda)
    }

    /// Funding cost adjustment.
    pub fn funding_cost_adjustment(&self) -> f64 {
        self.adjustment(FundingMeasure::Fca)
    }

    /// Per-period FCA.
    pub fn funding_cost_adjustment_by_period(&self) -> Vec<f64> {
        self.adjustment_by_period(FundingMeasure::Fca)
    }

    /// Funding benefit adjustment.
    pub fn funding_benefit_adjustment(&self) -> f64 {
        self.adjustment(FundingMeasure::Fba)
    }

    /// Per-period FBA.
    pub fn funding_benefit_adjustment_by_period(&self) -> Vec<f64> {
        self.adjustment_by_period(FundingMeasure::Fba)
    }

    /// Symmetric funding value adjustment.
    pub fn symmetric_funding_value_adjustment(&self) -> f64 {
        self.adjustment(FundingMeasure::SymmetricFva)
    }

    /// Per-period symmetric FVA.
    pub fn symmetric_funding_value_adjustment_by_period(&self) -> Vec<f64> {
        self.adjustment_by_period(FundingMeasure::SymmetricFva)
    }
}
