//! Credit and funding curve realisations on the exposure date grid.
//!
//! A [`NumerairePath`] carries, for each anchor date, the bank's and the
//! counterparty's credit state, the bank funding spread and the rates of
//! the collateral scheme. It is produced by an external curve generator,
//! either per scenario or once for a deterministic run, and is shared
//! read-only by every group path that references it.

use crate::error::CcrError;
use crate::time::DayCount;
use chrono::NaiveDate;

/// Survival probability, recovery rate and hazard rate of one credit entity
/// at one date.
///
/// # Examples
///
/// ```
/// use pricer_ccr::paths::CreditState;
///
/// let state = CreditState::new(0.98, 0.4, 0.02).unwrap();
/// assert_eq!(state.loss_given_default(), 0.6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreditState {
    survival_probability: f64,
    recovery_rate: f64,
    hazard_rate: f64,
}

impl CreditState {
    /// Creates a credit state.
    ///
    /// # Errors
    ///
    /// - [`CcrError::OutOfUnitRange`] if survival or recovery is outside [0, 1].
    /// - [`CcrError::NegativeHazardRate`] if the hazard rate is negative.
    /// - [`CcrError::NonFinite`] for NaN or infinite inputs.
    pub fn new(
        survival_probability: f64,
        recovery_rate: f64,
        hazard_rate: f64,
    ) -> Result<Self, CcrError> {
        let survival_probability =
            CcrError::ensure_unit_interval("survival probability", survival_probability)?;
        let recovery_rate = CcrError::ensure_unit_interval("recovery rate", recovery_rate)?;
        let hazard_rate = CcrError::ensure_finite("hazard rate", hazard_rate)?;
        if hazard_rate < 0.0 {
            return Err(CcrError::NegativeHazardRate(hazard_rate));
        }
        Ok(Self {
            survival_probability,
            recovery_rate,
            hazard_rate,
        })
    }

    /// A default-free entity: survival 1, no hazard.
    pub fn risk_free(recovery_rate: f64) -> Result<Self, CcrError> {
        Self::new(1.0, recovery_rate, 0.0)
    }

    /// Probability of no default up to the anchor date.
    #[inline]
    pub fn survival_probability(&self) -> f64 {
        self.survival_probability
    }

    /// Recovery rate on default.
    #[inline]
    pub fn recovery_rate(&self) -> f64 {
        self.recovery_rate
    }

    /// Instantaneous default intensity at the anchor date.
    #[inline]
    pub fn hazard_rate(&self) -> f64 {
        self.hazard_rate
    }

    /// 1 − recovery rate.
    #[inline]
    pub fn loss_given_default(&self) -> f64 {
        1.0 - self.recovery_rate
    }
}

/// Market and credit state at one anchor date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumeraireCurvePoint {
    anchor: NaiveDate,
    overnight_rate: f64,
    collateral_spread: f64,
    bank: CreditState,
    bank_funding_spread: f64,
    counterparty: CreditState,
}

impl NumeraireCurvePoint {
    /// Creates a curve point.
    ///
    /// # Arguments
    ///
    /// * `anchor` - Anchor date, matching the collateral path grid
    /// * `overnight_rate` - Overnight index rate
    /// * `collateral_spread` - Spread of the collateral scheme over the overnight rate
    /// * `bank` - The bank's own credit state
    /// * `bank_funding_spread` - Bank unsecured funding spread (signed)
    /// * `counterparty` - The counterparty's credit state
    ///
    /// # Errors
    ///
    /// Returns [`CcrError::NonFinite`] if a rate or spread is not finite.
    pub fn new(
        anchor: NaiveDate,
        overnight_rate: f64,
        collateral_spread: f64,
        bank: CreditState,
        bank_funding_spread: f64,
        counterparty: CreditState,
    ) -> Result<Self, CcrError> {
        Ok(Self {
            anchor,
            overnight_rate: CcrError::ensure_finite("overnight rate", overnight_rate)?,
            collateral_spread: CcrError::ensure_finite("collateral spread", collateral_spread)?,
            bank,
            bank_funding_spread: CcrError::ensure_finite(
                "bank funding spread",
                bank_funding_spread,
            )?,
            counterparty,
        })
    }

    /// Anchor date.
    #[inline]
    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Overnight index rate.
    #[inline]
    pub fn overnight_rate(&self) -> f64 {
        self.overnight_rate
    }

    /// Collateral scheme spread over the overnight rate.
    #[inline]
    pub fn collateral_spread(&self) -> f64 {
        self.collateral_spread
    }

    /// Rate accrued by the collateral scheme: overnight rate + collateral spread.
    #[inline]
    pub fn collateral_rate(&self) -> f64 {
        self.overnight_rate + self.collateral_spread
    }

    /// The bank's credit state.
    #[inline]
    pub fn bank(&self) -> &CreditState {
        &self.bank
    }

    /// Bank unsecured funding spread.
    #[inline]
    pub fn bank_funding_spread(&self) -> f64 {
        self.bank_funding_spread
    }

    /// The counterparty's credit state.
    #[inline]
    pub fn counterparty(&self) -> &CreditState {
        &self.counterparty
    }
}

/// Curve points on a date grid, with the derived collateral-scheme numeraire.
///
/// The numeraire is the collateral bank account: `N(v₀) = 1` and
/// `N(vᵢ) = N(vᵢ₋₁)·exp(r(vᵢ₋₁)·Δtᵢ)` where `r` is the collateral rate
/// and `Δtᵢ` the year fraction under the path's day count.
#[derive(Debug, Clone, PartialEq)]
pub struct NumerairePath {
    points: Vec<NumeraireCurvePoint>,
    day_count: DayCount,
    year_fractions: Vec<f64>,
    collateral_numeraire: Vec<f64>,
}

impl NumerairePath {
    /// Creates a path under the default Act/365.25 day count.
    pub fn new(points: Vec<NumeraireCurvePoint>) -> Result<Self, CcrError> {
        Self::with_day_count(points, DayCount::default())
    }

    /// Creates a path under an explicit day count.
    ///
    /// # Errors
    ///
    /// - [`CcrError::Empty`] for no points.
    /// - [`CcrError::NonIncreasingDates`] if dates are not strictly increasing.
    /// - [`CcrError::IncreasingSurvival`] if bank or counterparty survival rises.
    /// - [`CcrError::NonFinite`] if the accrued numeraire overflows.
    pub fn with_day_count(
        points: Vec<NumeraireCurvePoint>,
        day_count: DayCount,
    ) -> Result<Self, CcrError> {
        if points.is_empty() {
            return Err(CcrError::Empty("numeraire path"));
        }

        for (i, w) in points.windows(2).enumerate() {
            let (prev, next) = (&w[0], &w[1]);
            if next.anchor <= prev.anchor {
                return Err(CcrError::NonIncreasingDates {
                    index: i + 1,
                    previous: prev.anchor,
                    next: next.anchor,
                });
            }
            for (entity, a, b) in [
                ("bank", &prev.bank, &next.bank),
                ("counterparty", &prev.counterparty, &next.counterparty),
            ] {
                if b.survival_probability > a.survival_probability {
                    return Err(CcrError::IncreasingSurvival {
                        entity,
                        index: i + 1,
                        previous: a.survival_probability,
                        next: b.survival_probability,
                    });
                }
            }
        }

        let dates: Vec<NaiveDate> = points.iter().map(|p| p.anchor).collect();
        let year_fractions = day_count.year_fractions(&dates);

        let mut collateral_numeraire = Vec::with_capacity(points.len());
        collateral_numeraire.push(1.0);
        for (i, dt) in year_fractions.iter().enumerate() {
            let accrued = collateral_numeraire[i] * (points[i].collateral_rate() * dt).exp();
            collateral_numeraire.push(CcrError::ensure_finite("collateral numeraire", accrued)?);
        }

        Ok(Self {
            points,
            day_count,
            year_fractions,
            collateral_numeraire,
        })
    }

    /// Number of curve points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a path holds at least one point.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Curve points in date order.
    #[inline]
    pub fn points(&self) -> &[NumeraireCurvePoint] {
        &self.points
    }

    /// Day count used for the year fractions.
    #[inline]
    pub fn day_count(&self) -> DayCount {
        self.day_count
    }

    /// Anchor dates in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.anchor).collect()
    }

    /// Interval lengths Δtᵢ (`len() - 1` values).
    #[inline]
    pub fn year_fractions(&self) -> &[f64] {
        &self.year_fractions
    }

    /// Collateral-scheme numeraire value at every vertex.
    #[inline]
    pub fn collateral_numeraire(&self) -> &[f64] {
        &self.collateral_numeraire
    }

    fn series(&self, f: impl Fn(&NumeraireCurvePoint) -> f64) -> Vec<f64> {
        self.points.iter().map(f).collect()
    }

    /// Bank survival probability at every vertex.
    pub fn bank_survival(&self) -> Vec<f64> {
        self.series(|p| p.bank.survival_probability)
    }

    /// Bank loss given default (1 − recovery) at every vertex.
    pub fn bank_loss_given_default(&self) -> Vec<f64> {
        self.series(|p| p.bank.loss_given_default())
    }

    /// Bank hazard rate at every vertex.
    pub fn bank_hazard_rate(&self) -> Vec<f64> {
        self.series(|p| p.bank.hazard_rate)
    }

    /// Bank funding spread at every vertex.
    pub fn bank_funding_spread(&self) -> Vec<f64> {
        self.series(|p| p.bank_funding_spread)
    }

    /// Counterparty survival probability at every vertex.
    pub fn counterparty_survival(&self) -> Vec<f64> {
        self.series(|p| p.counterparty.survival_probability)
    }

    /// Counterparty loss given default at every vertex.
    pub fn counterparty_loss_given_default(&self) -> Vec<f64> {
        self.series(|p| p.counterparty.loss_given_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(offset_days: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Duration::days(offset_days)
    }

    fn point(offset_days: i64, rate: f64, bank_s: f64, cpty_s: f64) -> NumeraireCurvePoint {
        NumeraireCurvePoint::new(
            date(offset_days),
            rate,
            0.0,
            CreditState::new(bank_s, 0.4, 0.01).unwrap(),
            0.02,
            CreditState::new(cpty_s, 0.3, 0.03).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_credit_state_validation() {
        assert!(CreditState::new(1.1, 0.4, 0.01).is_err());
        assert!(CreditState::new(0.9, -0.1, 0.01).is_err());
        assert_eq!(
            CreditState::new(0.9, 0.4, -0.01),
            Err(CcrError::NegativeHazardRate(-0.01))
        );
        assert!(CreditState::new(f64::NAN, 0.4, 0.01).is_err());
    }

    #[test]
    fn test_credit_state_risk_free() {
        let s = CreditState::risk_free(0.4).unwrap();
        assert_eq!(s.survival_probability(), 1.0);
        assert_eq!(s.hazard_rate(), 0.0);
        assert_relative_eq!(s.loss_given_default(), 0.6, epsilon = 1e-15);
    }

    #[test]
    fn test_curve_point_collateral_rate() {
        let p = NumeraireCurvePoint::new(
            date(0),
            0.03,
            0.001,
            CreditState::risk_free(0.4).unwrap(),
            0.0,
            CreditState::risk_free(0.4).unwrap(),
        )
        .unwrap();
        assert_relative_eq!(p.collateral_rate(), 0.031, epsilon = 1e-15);
    }

    #[test]
    fn test_curve_point_rejects_non_finite_spread() {
        let result = NumeraireCurvePoint::new(
            date(0),
            0.03,
            0.0,
            CreditState::risk_free(0.4).unwrap(),
            f64::NAN,
            CreditState::risk_free(0.4).unwrap(),
        );
        assert!(matches!(
            result,
            Err(CcrError::NonFinite {
                field: "bank funding spread",
                ..
            })
        ));
    }

    #[test]
    fn test_numeraire_accrual() {
        let path = NumerairePath::new(vec![
            point(0, 0.02, 1.0, 1.0),
            point(365, 0.04, 0.99, 0.98),
            point(730, 0.04, 0.98, 0.96),
        ])
        .unwrap();

        let dt0: f64 = 365.0 / 365.25;
        let dt1: f64 = 365.0 / 365.25;
        let n = path.collateral_numeraire();
        assert_eq!(n[0], 1.0);
        assert_relative_eq!(n[1], (0.02 * dt0).exp(), epsilon = 1e-14);
        assert_relative_eq!(n[2], (0.02 * dt0).exp() * (0.04 * dt1).exp(), epsilon = 1e-14);
        assert_eq!(path.year_fractions().len(), 2);
    }

    #[test]
    fn test_numeraire_single_point() {
        let path = NumerairePath::new(vec![point(0, 0.05, 1.0, 1.0)]).unwrap();
        assert_eq!(path.collateral_numeraire(), &[1.0]);
        assert!(path.year_fractions().is_empty());
    }

    #[test]
    fn test_increasing_survival_rejected() {
        let result = NumerairePath::new(vec![point(0, 0.0, 0.98, 1.0), point(30, 0.0, 0.99, 1.0)]);
        assert!(matches!(
            result,
            Err(CcrError::IncreasingSurvival {
                entity: "bank",
                index: 1,
                ..
            })
        ));

        let result = NumerairePath::new(vec![point(0, 0.0, 1.0, 0.9), point(30, 0.0, 1.0, 0.95)]);
        assert!(matches!(
            result,
            Err(CcrError::IncreasingSurvival {
                entity: "counterparty",
                ..
            })
        ));
    }

    #[test]
    fn test_dates_must_increase() {
        let result = NumerairePath::new(vec![point(30, 0.0, 1.0, 1.0), point(30, 0.0, 1.0, 1.0)]);
        assert!(matches!(result, Err(CcrError::NonIncreasingDates { .. })));
    }

    #[test]
    fn test_empty_path_rejected() {
        assert_eq!(
            NumerairePath::new(vec![]),
            Err(CcrError::Empty("numeraire path"))
        );
    }

    #[test]
    fn test_series_accessors() {
        let path =
            NumerairePath::new(vec![point(0, 0.0, 1.0, 1.0), point(90, 0.0, 0.99, 0.97)]).unwrap();
        assert_eq!(path.bank_survival(), vec![1.0, 0.99]);
        assert_eq!(path.counterparty_survival(), vec![1.0, 0.97]);
        assert_eq!(path.bank_funding_spread(), vec![0.02, 0.02]);
        assert_eq!(path.bank_hazard_rate(), vec![0.01, 0.01]);
        assert_relative_eq!(path.bank_loss_given_default()[0], 0.6, epsilon = 1e-15);
        assert_relative_eq!(
            path.counterparty_loss_given_default()[1],
            0.7,
            epsilon = 1e-15
        );
        assert_eq!(path.dates(), vec![date(0), date(90)]);
        assert_eq!(path.day_count(), DayCount::Act36525);
    }

    #[test]
    fn test_explicit_day_count() {
        let path = NumerairePath::with_day_count(
            vec![point(0, 0.0, 1.0, 1.0), point(180, 0.0, 1.0, 1.0)],
            DayCount::Act360,
        )
        .unwrap();
        assert_relative_eq!(path.year_fractions()[0], 0.5, epsilon = 1e-15);
    }
}
