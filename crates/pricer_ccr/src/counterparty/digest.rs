//! Per-vertex ensemble statistics of every exposure flavour.

use super::aggregator::CounterpartyGroupAggregator;
use super::statistics::UnivariateStatistics;
use crate::error::CcrError;
use crate::groups::ExposureKind;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

/// Distribution of each exposure flavour across the valid paths of an
/// aggregation, vertex by vertex.
///
/// Built once from a [`CounterpartyGroupAggregator`]; read-only. The
/// statistics' means agree exactly with the aggregator's expected exposures.
/// The configured PFE quantile is reported as
/// [`UnivariateStatistics::quantile`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterpartyGroupDigest {
    dates: Vec<NaiveDate>,
    path_count: usize,
    quantile_level: f64,
    /// `[kind.index()][vertex]`
    statistics: Vec<Vec<UnivariateStatistics>>,
}

impl CounterpartyGroupDigest {
    /// Computes the statistics from an aggregator's valid paths.
    pub fn new(aggregator: &CounterpartyGroupAggregator) -> Result<Self, CcrError> {
        let valuations = aggregator.valuations();
        let quantile_level = aggregator.config().pfe_quantile;
        let n_vertices = aggregator.dates().len();
        let parallel = aggregator.config().should_parallelize(valuations.len());

        let statistics = ExposureKind::ALL
            .iter()
            .map(|kind| {
                let k = kind.index();
                let vertex_statistics = |t: usize| {
                    let samples: Vec<f64> = valuations.iter().map(|v| v.exposures[k][t]).collect();
                    UnivariateStatistics::from_samples(&samples, quantile_level)
                };
                if parallel {
                    (0..n_vertices)
                        .into_par_iter()
                        .map(vertex_statistics)
                        .collect::<Result<Vec<_>, _>>()
                } else {
                    (0..n_vertices)
                        .map(vertex_statistics)
                        .collect::<Result<Vec<_>, _>>()
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            paths = valuations.len(),
            vertices = n_vertices,
            parallel,
            "Built counterparty digest"
        );

        Ok(Self {
            dates: aggregator.dates().to_vec(),
            path_count: valuations.len(),
            quantile_level,
            statistics,
        })
    }

    /// Shared date grid.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.dates.len()
    }

    /// Number of paths behind every statistic.
    pub fn path_count(&self) -> usize {
        self.path_count
    }

    /// Quantile level used for [`UnivariateStatistics::quantile`].
    pub fn quantile_level(&self) -> f64 {
        self.quantile_level
    }

    /// Statistics of flavour `kind` at every vertex.
    pub fn statistics(&self, kind: ExposureKind) -> &[UnivariateStatistics] {
        &self.statistics[kind.index()]
    }

    /// Statistics of flavour `kind` at one vertex.
    pub fn vertex(&self, kind: ExposureKind, index: usize) -> Option<&UnivariateStatistics> {
        self.statistics[kind.index()].get(index)
    }

    /// Potential future exposure profile: the configured quantile of
    /// flavour `kind` at every vertex.
    pub fn potential_future_exposure(&self, kind: ExposureKind) -> Vec<f64> {
        self.statistics(kind).iter().map(|s| s.quantile()).collect()
    }

    /// Peak of [`CounterpartyGroupDigest::potential_future_exposure`].
    pub fn peak_potential_future_exposure(&self, kind: ExposureKind) -> f64 {
        self.statistics(kind)
            .iter()
            .map(|s| s.quantile())
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AggregationConfig;
    use crate::counterparty::CounterpartyGroupPath;
    use crate::groups::{FundingGroupPath, NettingGroupPath};
    use crate::test_support::*;
    use approx::assert_relative_eq;

    fn scenario(values: &[f64]) -> CounterpartyGroupPath {
        let numeraire = flat_numeraire(values.len());
        CounterpartyGroupPath::new(
            vec![NettingGroupPath::new(vec![group(values)], numeraire.clone()).unwrap()],
            vec![FundingGroupPath::new(vec![group(values)], numeraire).unwrap()],
        )
        .unwrap()
    }

    fn digest(paths: &[CounterpartyGroupPath], config: AggregationConfig) -> CounterpartyGroupDigest {
        CounterpartyGroupAggregator::new(paths, config)
            .unwrap()
            .digest()
            .unwrap()
    }

    #[test]
    fn test_statistics_per_vertex() {
        let paths: Vec<_> = [[0.0, -5.0], [10.0, 5.0], [20.0, 15.0], [30.0, -25.0], [40.0, 10.0]]
            .iter()
            .map(|v| scenario(v))
            .collect();
        let digest = digest(&paths, AggregationConfig::default().with_pfe_quantile(0.8));

        assert_eq!(digest.vertex_count(), 2);
        assert_eq!(digest.path_count(), 5);
        assert_eq!(digest.quantile_level(), 0.8);

        let v0 = digest.vertex(ExposureKind::COLLATERALIZED, 0).unwrap();
        assert_eq!(v0.count(), 5);
        assert_relative_eq!(v0.mean(), 20.0, epsilon = 1e-12);
        assert_relative_eq!(v0.variance(), 250.0, epsilon = 1e-9);
        assert_eq!(v0.min(), 0.0);
        assert_eq!(v0.max(), 40.0);
        assert_eq!(v0.quantile(), 30.0);

        // Positive exposure at vertex 1: [0, 5, 15, 0, 10] → sorted[3] = 10
        assert_eq!(
            digest.potential_future_exposure(ExposureKind::COLLATERALIZED_POSITIVE),
            vec![30.0, 10.0]
        );
        assert_eq!(
            digest.peak_potential_future_exposure(ExposureKind::COLLATERALIZED_POSITIVE),
            30.0
        );
        assert!(digest.vertex(ExposureKind::COLLATERALIZED, 2).is_none());
    }

    #[test]
    fn test_means_match_aggregator() {
        let paths: Vec<_> = (0..9)
            .map(|i| {
                let x = i as f64 * 1.7;
                scenario(&[x, 3.0 - x, x * x])
            })
            .collect();
        let aggregator = CounterpartyGroupAggregator::new(&paths, AggregationConfig::default())
            .unwrap();
        let digest = aggregator.digest().unwrap();

        for kind in ExposureKind::ALL {
            let means: Vec<f64> = digest.statistics(kind).iter().map(|s| s.mean()).collect();
            assert_eq!(means, aggregator.expected_exposure(kind));
        }
    }

    #[test]
    fn test_parallel_threshold_does_not_change_statistics() {
        let paths: Vec<_> = (0..12)
            .map(|i| {
                let x = i as f64;
                scenario(&[x, 4.0 - x, 0.25 * x * x])
            })
            .collect();
        let sequential = digest(
            &paths,
            AggregationConfig::default().with_parallel_threshold(usize::MAX),
        );
        let parallel = digest(&paths, AggregationConfig::default().with_parallel_threshold(1));

        assert_eq!(sequential, parallel);
        assert_eq!(sequential.path_count(), 12);
    }

    #[test]
    fn test_identical_paths_have_zero_dispersion() {
        let paths = vec![scenario(&[3.0, -1.0, 2.5]); 6];
        let digest = digest(&paths, AggregationConfig::default());

        for kind in ExposureKind::ALL {
            let single = paths[0].exposure(kind);
            for (stats, x) in digest.statistics(kind).iter().zip(single) {
                assert_eq!(stats.mean(), x);
                assert_eq!(stats.variance(), 0.0);
                assert_eq!(stats.std_dev(), 0.0);
                assert_eq!(stats.quantile(), x);
            }
        }
    }

    #[test]
    fn test_single_path_reports_zero_dispersion() {
        let digest = digest(&[scenario(&[4.0, 8.0])], AggregationConfig::default());
        let stats = digest.vertex(ExposureKind::UNCOLLATERALIZED_POSITIVE, 1).unwrap();
        assert_eq!(stats.count(), 1);
        assert_eq!(stats.mean(), 8.0);
        assert_eq!(stats.std_dev(), 0.0);
    }
}
