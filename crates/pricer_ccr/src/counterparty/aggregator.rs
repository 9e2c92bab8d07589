//! Ensemble aggregation across Monte Carlo scenarios.
//!
//! Each scenario path is valued independently (map, on rayon for large
//! ensembles), then the per-path results are folded in path order into
//! running means (reduce). The fold order never depends on thread count.

use super::digest::CounterpartyGroupDigest;
use super::measures::{XvaMeasure, XvaMeasures};
use super::path::CounterpartyGroupPath;
use super::statistics::update_mean;
use crate::config::{AggregationConfig, InvalidPathPolicy};
use crate::error::CcrError;
use crate::groups::{ensure_same_grid, ExposureKind};
use crate::time::DayCount;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

/// Everything the aggregator keeps from one valid scenario path.
#[derive(Debug, Clone)]
pub(crate) struct PathValuation {
    /// Exposure series, indexed by [`ExposureKind::index`].
    pub(crate) exposures: Vec<Vec<f64>>,
    /// Period-wise adjustments, indexed by [`XvaMeasure::index`].
    pub(crate) periods: Vec<Vec<f64>>,
    pub(crate) measures: XvaMeasures,
}

/// Mean exposure profile of one flavour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureProfile {
    /// Exposure flavour.
    pub kind: ExposureKind,
    /// Mean across paths at each vertex.
    pub values: Vec<f64>,
}

/// Mean period-wise contributions of one adjustment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustmentProfile {
    /// Adjustment measure.
    pub measure: XvaMeasure,
    /// Mean across paths for each period.
    pub values: Vec<f64>,
}

/// Ensemble-level results of a [`CounterpartyGroupAggregator`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleXva {
    dates: Vec<NaiveDate>,
    path_count: usize,
    excluded_paths: Vec<usize>,
    measures: XvaMeasures,
    exposure_profiles: Vec<ExposureProfile>,
    adjustment_profiles: Vec<AdjustmentProfile>,
}

impl EnsembleXva {
    /// Shared date grid.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of paths that entered the means.
    pub fn path_count(&self) -> usize {
        self.path_count
    }

    /// Indices of paths dropped under [`InvalidPathPolicy::Exclude`].
    pub fn excluded_paths(&self) -> &[usize] {
        &self.excluded_paths
    }

    /// Mean scalar adjustments.
    pub fn measures(&self) -> &XvaMeasures {
        &self.measures
    }

    /// Mean exposure of flavour `kind` at each vertex.
    pub fn expected_exposure(&self, kind: ExposureKind) -> &[f64] {
        &self.exposure_profiles[kind.index()].values
    }

    /// Mean period-wise contributions of `measure`.
    pub fn adjustment_by_period(&self, measure: XvaMeasure) -> &[f64] {
        &self.adjustment_profiles[measure.index()].values
    }

    /// All twelve mean exposure profiles, in [`ExposureKind::ALL`] order.
    pub fn exposure_profiles(&self) -> &[ExposureProfile] {
        &self.exposure_profiles
    }

    /// All eight mean period profiles, in [`XvaMeasure::ALL`] order.
    pub fn adjustment_profiles(&self) -> &[AdjustmentProfile] {
        &self.adjustment_profiles
    }
}

/// Aggregates one counterparty across an ensemble of scenario paths.
///
/// Built eagerly: construction values every path, applies the configured
/// [`InvalidPathPolicy`] and computes the ensemble means. The result is
/// read-only.
///
/// First-to-default CVA and credit-linked CVA are not provided.
///
/// # Examples
///
/// ```rust,ignore
/// let aggregator = CounterpartyGroupAggregator::new(&paths, AggregationConfig::default())?;
/// let cva = aggregator.ensemble().measures().cva;
/// let ee = aggregator.expected_exposure(ExposureKind::COLLATERALIZED_POSITIVE_PV);
/// ```
#[derive(Debug, Clone)]
pub struct CounterpartyGroupAggregator {
    config: AggregationConfig,
    valuations: Vec<PathValuation>,
    ensemble: EnsembleXva,
}

impl CounterpartyGroupAggregator {
    /// Values every path and aggregates the ensemble.
    ///
    /// The first path defines the ensemble grid. A path is invalid when its
    /// grid differs from that grid, when any of its numeraires uses a day
    /// count other than `config.day_count`, or when any per-path result is
    /// non-finite.
    ///
    /// # Errors
    ///
    /// - [`CcrError::Config`] if `config` fails validation.
    /// - [`CcrError::Empty`] if there are no paths, or none survive exclusion.
    /// - [`CcrError::InvalidScenarioPath`] for the first invalid path under
    ///   [`InvalidPathPolicy::Reject`].
    #[tracing::instrument(
        name = "aggregate_counterparty",
        skip_all,
        fields(n_paths = paths.len(), policy = %config.invalid_path_policy)
    )]
    pub fn new(
        paths: &[CounterpartyGroupPath],
        config: AggregationConfig,
    ) -> Result<Self, CcrError> {
        config.validate()?;
        let reference = paths.first().ok_or(CcrError::Empty("scenario paths"))?;
        let grid = reference.dates();

        let value = |(index, path): (usize, &CounterpartyGroupPath)| {
            value_path(index, path, grid, config.day_count)
        };
        let results: Vec<Result<PathValuation, CcrError>> =
            if config.should_parallelize(paths.len()) {
                paths.par_iter().enumerate().map(value).collect()
            } else {
                paths.iter().enumerate().map(value).collect()
            };

        let mut valuations = Vec::with_capacity(results.len());
        let mut excluded_paths = Vec::new();
        for result in results {
            match (result, config.invalid_path_policy) {
                (Ok(valuation), _) => valuations.push(valuation),
                (Err(err), InvalidPathPolicy::Reject) => return Err(err),
                (Err(err), InvalidPathPolicy::Exclude) => {
                    if let CcrError::InvalidScenarioPath { index, .. } = &err {
                        excluded_paths.push(*index);
                    }
                    tracing::warn!(error = %err, "Excluding scenario path from aggregation");
                }
            }
        }
        if valuations.is_empty() {
            return Err(CcrError::Empty("valid scenario paths"));
        }

        let ensemble = reduce(grid, &valuations, excluded_paths);
        tracing::debug!(
            path_count = ensemble.path_count,
            excluded = ensemble.excluded_paths.len(),
            cva = ensemble.measures.cva,
            fva = ensemble.measures.fva,
            "Aggregated counterparty ensemble"
        );

        Ok(Self {
            config,
            valuations,
            ensemble,
        })
    }

    /// Configuration used for the aggregation.
    #[inline]
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Ensemble results.
    #[inline]
    pub fn ensemble(&self) -> &EnsembleXva {
        &self.ensemble
    }

    /// Consumes the aggregator, returning the ensemble results.
    pub fn into_ensemble(self) -> EnsembleXva {
        self.ensemble
    }

    /// Shared date grid.
    #[inline]
    pub fn dates(&self) -> &[NaiveDate] {
        self.ensemble.dates()
    }

    /// Number of paths that entered the means.
    #[inline]
    pub fn path_count(&self) -> usize {
        self.ensemble.path_count()
    }

    /// Indices of excluded paths.
    #[inline]
    pub fn excluded_paths(&self) -> &[usize] {
        self.ensemble.excluded_paths()
    }

    /// Mean scalar value of `measure`.
    #[inline]
    pub fn adjustment(&self, measure: XvaMeasure) -> f64 {
        self.ensemble.measures().get(measure)
    }

    /// Mean period-wise contributions of `measure`.
    #[inline]
    pub fn adjustment_by_period(&self, measure: XvaMeasure) -> &[f64] {
        self.ensemble.adjustment_by_period(measure)
    }

    /// Mean exposure of flavour `kind` at each vertex.
    #[inline]
    pub fn expected_exposure(&self, kind: ExposureKind) -> &[f64] {
        self.ensemble.expected_exposure(kind)
    }

    /// Mean bilateral CVA.
    pub fn credit_adjustment(&self) -> f64 {
        self.ensemble.measures().cva
    }

    /// Mean DVA.
    pub fn debt_adjustment(&self) -> f64 {
        self.ensemble.measures().dva
    }

    /// Mean FVA.
    pub fn funding_value_adjustment(&self) -> f64 {
        self.ensemble.measures().fva
    }

    /// Per-vertex statistics of every exposure flavour across the valid paths.
    pub fn digest(&self) -> Result<CounterpartyGroupDigest, CcrError> {
        CounterpartyGroupDigest::new(self)
    }

    pub(crate) fn valuations(&self) -> &[PathValuation] {
        &self.valuations
    }
}

fn invalid(index: usize, reason: impl Into<String>) -> CcrError {
    CcrError::InvalidScenarioPath {
        index,
        reason: reason.into(),
    }
}

fn value_path(
    index: usize,
    path: &CounterpartyGroupPath,
    grid: &[NaiveDate],
    day_count: DayCount,
) -> Result<PathValuation, CcrError> {
    ensure_same_grid(grid, path.dates()).map_err(|e| invalid(index, e.to_string()))?;

    let day_counts = path
        .netting_groups()
        .iter()
        .map(|g| g.exposure_group().numeraire().day_count())
        .chain(
            path.funding_groups()
                .iter()
                .map(|g| g.exposure_group().numeraire().day_count()),
        );
    for dc in day_counts {
        if dc != day_count {
            return Err(invalid(
                index,
                format!("numeraire day count {} differs from ensemble day count {}", dc, day_count),
            ));
        }
    }

    let exposures: Vec<Vec<f64>> = ExposureKind::ALL.iter().map(|&k| path.exposure(k)).collect();
    if let Some(kind) = ExposureKind::ALL
        .iter()
        .find(|k| exposures[k.index()].iter().any(|x| !x.is_finite()))
    {
        return Err(invalid(index, format!("non-finite {} exposure", kind)));
    }

    let periods: Vec<Vec<f64>> = XvaMeasure::ALL
        .iter()
        .map(|&m| path.adjustment_by_period(m))
        .collect();
    let measures = path.measures();
    if let Some(measure) = XvaMeasure::ALL.iter().find(|m| {
        !measures.get(**m).is_finite() || periods[m.index()].iter().any(|x| !x.is_finite())
    }) {
        return Err(invalid(index, format!("non-finite {}", measure)));
    }

    Ok(PathValuation {
        exposures,
        periods,
        measures,
    })
}

fn reduce(grid: &[NaiveDate], valuations: &[PathValuation], excluded_paths: Vec<usize>) -> EnsembleXva {
    let n = grid.len();
    let mut exposure_means = vec![vec![0.0; n]; ExposureKind::ALL.len()];
    let mut period_means = vec![vec![0.0; n.saturating_sub(1)]; XvaMeasure::ALL.len()];
    let mut measure_means = [0.0; 8];

    for (k, valuation) in valuations.iter().enumerate() {
        let count = k + 1;
        for (mean, sample) in exposure_means.iter_mut().zip(&valuation.exposures) {
            update_mean(mean, sample, count);
        }
        for (mean, sample) in period_means.iter_mut().zip(&valuation.periods) {
            update_mean(mean, sample, count);
        }
        let scalars = XvaMeasure::ALL.map(|m| valuation.measures.get(m));
        update_mean(&mut measure_means, &scalars, count);
    }

    EnsembleXva {
        dates: grid.to_vec(),
        path_count: valuations.len(),
        excluded_paths,
        measures: XvaMeasures::from_fn(|m| measure_means[m.index()]),
        exposure_profiles: ExposureKind::ALL
            .iter()
            .zip(exposure_means)
            .map(|(&kind, values)| ExposureProfile { kind, values })
            .collect(),
        adjustment_profiles: XvaMeasure::ALL
            .iter()
            .zip(period_means)
            .map(|(&measure, values)| AdjustmentProfile { measure, values })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::{FundingGroupPath, NettingGroupPath};
    use crate::paths::{CreditState, NumeraireCurvePoint, NumerairePath};
    use crate::test_support::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn scenario(values: &[f64]) -> CounterpartyGroupPath {
        let n = values.len();
        let bank_s: Vec<f64> = (0..n).map(|i| 1.0 - 0.01 * i as f64).collect();
        let cpty_s: Vec<f64> = (0..n).map(|i| 1.0 - 0.03 * i as f64).collect();
        let numeraire = numeraire_with(&bank_s, 0.4, 0.02, 0.015, &cpty_s, 0.4, 0.01);
        CounterpartyGroupPath::new(
            vec![NettingGroupPath::new(vec![group(values)], numeraire.clone()).unwrap()],
            vec![FundingGroupPath::new(vec![group(values)], numeraire).unwrap()],
        )
        .unwrap()
    }

    fn act360_scenario(values: &[f64]) -> CounterpartyGroupPath {
        let points = grid(values.len())
            .into_iter()
            .map(|d| {
                NumeraireCurvePoint::new(
                    d,
                    0.0,
                    0.0,
                    CreditState::risk_free(0.4).unwrap(),
                    0.0,
                    CreditState::risk_free(0.4).unwrap(),
                )
                .unwrap()
            })
            .collect();
        let numeraire =
            Arc::new(NumerairePath::with_day_count(points, DayCount::Act360).unwrap());
        CounterpartyGroupPath::new(
            vec![NettingGroupPath::new(vec![group(values)], numeraire.clone()).unwrap()],
            vec![FundingGroupPath::new(vec![group(values)], numeraire).unwrap()],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_ensemble_rejected() {
        assert_eq!(
            CounterpartyGroupAggregator::new(&[], AggregationConfig::default()).err(),
            Some(CcrError::Empty("scenario paths"))
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let paths = vec![scenario(&[1.0, 2.0])];
        let config = AggregationConfig::default().with_pfe_quantile(2.0);
        assert!(matches!(
            CounterpartyGroupAggregator::new(&paths, config),
            Err(CcrError::Config(_))
        ));
    }

    #[test]
    fn test_means_across_paths() {
        let paths = vec![scenario(&[10.0, -2.0, 4.0]), scenario(&[20.0, 6.0, -8.0])];
        let aggregator = CounterpartyGroupAggregator::new(&paths, AggregationConfig::default())
            .unwrap();

        assert_eq!(aggregator.path_count(), 2);
        assert!(aggregator.excluded_paths().is_empty());
        assert_eq!(
            aggregator.expected_exposure(ExposureKind::COLLATERALIZED_POSITIVE),
            &[15.0, 3.0, 2.0]
        );
        assert_eq!(
            aggregator.expected_exposure(ExposureKind::COLLATERALIZED_NEGATIVE),
            &[0.0, -1.0, -4.0]
        );

        for m in XvaMeasure::ALL {
            let expected = 0.5 * (paths[0].adjustment(m) + paths[1].adjustment(m));
            assert_relative_eq!(aggregator.adjustment(m), expected, epsilon = 1e-12);
        }
        assert_eq!(aggregator.credit_adjustment(), aggregator.ensemble().measures().cva);
    }

    #[test]
    fn test_identical_paths_reproduce_single_path() {
        let single = scenario(&[12.0, -5.0, 7.0, 3.0]);
        let paths = vec![single.clone(); 7];
        let aggregator = CounterpartyGroupAggregator::new(&paths, AggregationConfig::default())
            .unwrap();

        assert_eq!(*aggregator.ensemble().measures(), single.measures());
        for kind in ExposureKind::ALL {
            assert_eq!(aggregator.expected_exposure(kind), single.exposure(kind).as_slice());
        }
        for m in XvaMeasure::ALL {
            assert_eq!(
                aggregator.adjustment_by_period(m),
                single.adjustment_by_period(m).as_slice()
            );
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let paths: Vec<_> = (0..40)
            .map(|i| {
                let x = i as f64;
                scenario(&[x, 5.0 - x, 0.5 * x, -x])
            })
            .collect();
        let sequential = CounterpartyGroupAggregator::new(
            &paths,
            AggregationConfig::default().with_parallel_threshold(usize::MAX),
        )
        .unwrap();
        let parallel = CounterpartyGroupAggregator::new(
            &paths,
            AggregationConfig::default().with_parallel_threshold(1),
        )
        .unwrap();

        assert_eq!(sequential.ensemble(), parallel.ensemble());
    }

    #[test]
    fn test_reject_policy_fails_on_grid_mismatch() {
        let paths = vec![scenario(&[1.0, 2.0, 3.0]), scenario(&[1.0, 2.0])];
        let err = CounterpartyGroupAggregator::new(&paths, AggregationConfig::default())
            .unwrap_err();
        assert!(matches!(err, CcrError::InvalidScenarioPath { index: 1, .. }));
    }

    #[test]
    fn test_exclude_policy_records_indices() {
        let paths = vec![
            scenario(&[1.0, 2.0, 3.0]),
            scenario(&[1.0, 2.0]),
            scenario(&[3.0, 4.0, 5.0]),
            act360_scenario(&[9.0, 9.0, 9.0]),
        ];
        let config = AggregationConfig::default().with_invalid_path_policy(InvalidPathPolicy::Exclude);
        let aggregator = CounterpartyGroupAggregator::new(&paths, config).unwrap();

        assert_eq!(aggregator.path_count(), 2);
        assert_eq!(aggregator.excluded_paths(), &[1, 3]);
        assert_eq!(
            aggregator.expected_exposure(ExposureKind::COLLATERALIZED),
            &[2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn test_day_count_mismatch_is_invalid() {
        let paths = vec![act360_scenario(&[1.0, 2.0])];
        let err = CounterpartyGroupAggregator::new(&paths, AggregationConfig::default())
            .unwrap_err();
        assert!(matches!(err, CcrError::InvalidScenarioPath { index: 0, .. }));

        let config = AggregationConfig::default().with_day_count(DayCount::Act360);
        assert!(CounterpartyGroupAggregator::new(&paths, config).is_ok());
    }

    #[test]
    fn test_non_finite_exposure_is_invalid() {
        // Netting two groups at f64::MAX overflows.
        let overflow = {
            let numeraire = flat_numeraire(2);
            CounterpartyGroupPath::new(
                vec![NettingGroupPath::new(
                    vec![group(&[f64::MAX, 1.0]), group(&[f64::MAX, 1.0])],
                    numeraire.clone(),
                )
                .unwrap()],
                vec![FundingGroupPath::new(vec![group(&[1.0, 1.0])], numeraire).unwrap()],
            )
            .unwrap()
        };
        let ensemble = vec![scenario(&[1.0, 2.0]), overflow];
        let config = AggregationConfig::default().with_invalid_path_policy(InvalidPathPolicy::Exclude);
        let aggregator = CounterpartyGroupAggregator::new(&ensemble, config).unwrap();
        assert_eq!(aggregator.excluded_paths(), &[1]);
    }

    #[test]
    fn test_all_excluded_fails() {
        let paths = vec![scenario(&[1.0, 2.0]), scenario(&[1.0])];
        // Every path uses Act/365.25.
        let config = AggregationConfig::default()
            .with_invalid_path_policy(InvalidPathPolicy::Exclude)
            .with_day_count(DayCount::Act360);
        assert_eq!(
            CounterpartyGroupAggregator::new(&paths, config).err(),
            Some(CcrError::Empty("valid scenario paths"))
        );
    }
}
