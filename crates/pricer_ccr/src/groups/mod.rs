//! Group paths: netted exposure and the adjustment integrals built on it.
//!
//! - [`ExposureGroupPath`]: netted, numeraire-discounted, sign-split exposure
//! - [`NettingGroupPath`]: credit and debt adjustments (survival decrements)
//! - [`FundingGroupPath`]: funding adjustments (continuous spread)
//!
//! Every adjustment is one call into [`crate::integration`] with an
//! integrand assembled from one exposure series and a product of curve
//! series. The measure enums below record that recipe as data.

mod exposure;
mod funding;
mod netting;

pub(crate) use exposure::ensure_same_grid;
pub use exposure::{
    Collateralization, ExposureGroupPath, ExposureKind, ExposureSign, Valuation,
};
pub use funding::{FundingGroupPath, FundingMeasure};
pub use netting::{CreditMeasure, NettingGroupPath};

use crate::integration::pointwise_product;
use crate::paths::NumerairePath;

/// A vertex-wise curve series taken from the numeraire path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CurveFactor {
    BankSurvival,
    BankLossGivenDefault,
    BankHazardRate,
    BankFundingSpread,
    CounterpartySurvival,
    CounterpartyLossGivenDefault,
}

impl CurveFactor {
    fn series(self, numeraire: &NumerairePath) -> Vec<f64> {
        match self {
            CurveFactor::BankSurvival => numeraire.bank_survival(),
            CurveFactor::BankLossGivenDefault => numeraire.bank_loss_given_default(),
            CurveFactor::BankHazardRate => numeraire.bank_hazard_rate(),
            CurveFactor::BankFundingSpread => numeraire.bank_funding_spread(),
            CurveFactor::CounterpartySurvival => numeraire.counterparty_survival(),
            CurveFactor::CounterpartyLossGivenDefault => {
                numeraire.counterparty_loss_given_default()
            }
        }
    }
}

/// `exposure(kind)(v) × Π factors(v)` at every vertex.
pub(crate) fn integrand(
    group: &ExposureGroupPath,
    kind: ExposureKind,
    factors: &[CurveFactor],
) -> Vec<f64> {
    let exposure = group.exposure(kind);
    let curves: Vec<Vec<f64>> = factors
        .iter()
        .map(|f| f.series(group.numeraire()))
        .collect();
    let mut columns: Vec<&[f64]> = Vec::with_capacity(curves.len() + 1);
    columns.push(&exposure);
    columns.extend(curves.iter().map(Vec::as_slice));
    pointwise_product(group.vertex_count(), &columns)
}
