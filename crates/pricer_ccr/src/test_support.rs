//! Fixtures shared by unit tests.

use crate::paths::{CollateralGroupPath, CreditState, NumeraireCurvePoint, NumerairePath};
use chrono::NaiveDate;
use std::sync::Arc;

pub fn grid(n: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    (0..n)
        .map(|i| start + chrono::Duration::days(182 * i as i64))
        .collect()
}

/// Collateral group with the given forward values and no cash flow or collateral.
pub fn group(values: &[f64]) -> Arc<CollateralGroupPath> {
    let n = values.len();
    Arc::new(
        CollateralGroupPath::from_series(&grid(n), values, &vec![0.0; n], &vec![0.0; n])
            .unwrap(),
    )
}

/// Numeraire path on [`grid`] with the given survival curves and funding
/// spread. `collateral_rate` is the flat overnight rate; the collateral
/// spread is zero.
#[allow(clippy::too_many_arguments)]
pub fn numeraire_with(
    bank_survival: &[f64],
    bank_recovery: f64,
    bank_hazard: f64,
    funding_spread: f64,
    cpty_survival: &[f64],
    cpty_recovery: f64,
    collateral_rate: f64,
) -> Arc<NumerairePath> {
    let points = grid(bank_survival.len())
        .into_iter()
        .enumerate()
        .map(|(i, d)| {
            NumeraireCurvePoint::new(
                d,
                collateral_rate,
                0.0,
                CreditState::new(bank_survival[i], bank_recovery, bank_hazard).unwrap(),
                funding_spread,
                CreditState::new(cpty_survival[i], cpty_recovery, 0.0).unwrap(),
            )
            .unwrap()
        })
        .collect();
    Arc::new(NumerairePath::new(points).unwrap())
}

/// Numeraire path with unit numeraire and no default risk.
pub fn flat_numeraire(n: usize) -> Arc<NumerairePath> {
    numeraire_with(&vec![1.0; n], 0.4, 0.0, 0.0, &vec![1.0; n], 0.4, 0.0)
}
