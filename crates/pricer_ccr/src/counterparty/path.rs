//! All netting and funding sets of one counterparty in one scenario.

use super::measures::{GroupMeasure, XvaMeasure, XvaMeasures};
use crate::error::CcrError;
use crate::groups::{ensure_same_grid, ExposureKind, FundingGroupPath, NettingGroupPath};
use chrono::NaiveDate;

/// One counterparty in one Monte Carlo scenario.
///
/// A pure composite: scalar adjustments are the sums of the member groups'
/// values (credit measures over netting groups, funding measures over
/// funding groups), and exposure of any flavour is the sum of the netting
/// groups' series. Netting sets do not offset each other, so the positive
/// exposure here is the sum of per-set positive exposures.
#[derive(Debug, Clone)]
pub struct CounterpartyGroupPath {
    netting_groups: Vec<NettingGroupPath>,
    funding_groups: Vec<FundingGroupPath>,
    dates: Vec<NaiveDate>,
}

impl CounterpartyGroupPath {
    /// Creates a counterparty path.
    ///
    /// # Errors
    ///
    /// - [`CcrError::Empty`] if either list of groups is empty.
    /// - [`CcrError::VertexCountMismatch`] or [`CcrError::DateMismatch`] if
    ///   the groups are not on one date grid.
    pub fn new(
        netting_groups: Vec<NettingGroupPath>,
        funding_groups: Vec<FundingGroupPath>,
    ) -> Result<Self, CcrError> {
        let first = netting_groups
            .first()
            .ok_or(CcrError::Empty("netting groups"))?;
        if funding_groups.is_empty() {
            return Err(CcrError::Empty("funding groups"));
        }

        let dates = first.exposure_group().dates().to_vec();
        for group in netting_groups.iter().skip(1) {
            ensure_same_grid(&dates, group.exposure_group().dates())?;
        }
        for group in &funding_groups {
            ensure_same_grid(&dates, group.exposure_group().dates())?;
        }

        Ok(Self {
            netting_groups,
            funding_groups,
            dates,
        })
    }

    /// Netting groups of the counterparty.
    #[inline]
    pub fn netting_groups(&self) -> &[NettingGroupPath] {
        &self.netting_groups
    }

    /// Funding groups of the counterparty.
    #[inline]
    pub fn funding_groups(&self) -> &[FundingGroupPath] {
        &self.funding_groups
    }

    /// Shared date grid.
    #[inline]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of vertices on the grid.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.dates.len()
    }

    /// Exposure of flavour `kind`, summed over netting groups.
    pub fn exposure(&self, kind: ExposureKind) -> Vec<f64> {
        let mut total = vec![0.0; self.vertex_count()];
        for group in &self.netting_groups {
            for (t, x) in total.iter_mut().zip(group.exposure_group().exposure(kind)) {
                *t += x;
            }
        }
        total
    }

    /// Scalar value of `measure`, summed over the relevant groups.
    pub fn adjustment(&self, measure: XvaMeasure) -> f64 {
        match measure.group_measure() {
            GroupMeasure::Credit(m) => self.netting_groups.iter().map(|g| g.adjustment(m)).sum(),
            GroupMeasure::Funding(m) => self.funding_groups.iter().map(|g| g.adjustment(m)).sum(),
        }
    }

    /// Per-period contributions of `measure`, summed over the relevant groups.
    pub fn adjustment_by_period(&self, measure: XvaMeasure) -> Vec<f64> {
        let per_group: Vec<Vec<f64>> = match measure.group_measure() {
            GroupMeasure::Credit(m) => self
                .netting_groups
                .iter()
                .map(|g| g.adjustment_by_period(m))
                .collect(),
            GroupMeasure::Funding(m) => self
                .funding_groups
                .iter()
                .map(|g| g.adjustment_by_period(m))
                .collect(),
        };
        let mut total = vec![0.0; self.vertex_count().saturating_sub(1)];
        for periods in per_group {
            for (t, x) in total.iter_mut().zip(periods) {
                *t += x;
            }
        }
        total
    }

    /// All eight scalar measures of this path.
    pub fn measures(&self) -> XvaMeasures {
        XvaMeasures::from_fn(|m| self.adjustment(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use approx::assert_relative_eq;

    fn path_with(netting: &[&[f64]], funding: &[&[f64]]) -> CounterpartyGroupPath {
        let n = netting[0].len();
        let bank_s: Vec<f64> = (0..n).map(|i| 1.0 - 0.01 * i as f64).collect();
        let cpty_s: Vec<f64> = (0..n).map(|i| 1.0 - 0.02 * i as f64).collect();
        let numeraire = numeraire_with(&bank_s, 0.4, 0.02, 0.01, &cpty_s, 0.4, 0.01);
        CounterpartyGroupPath::new(
            netting
                .iter()
                .map(|v| NettingGroupPath::new(vec![group(v)], numeraire.clone()).unwrap())
                .collect(),
            funding
                .iter()
                .map(|v| FundingGroupPath::new(vec![group(v)], numeraire.clone()).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_requires_both_group_kinds() {
        let numeraire = flat_numeraire(2);
        let ng = NettingGroupPath::new(vec![group(&[1.0, 2.0])], numeraire.clone()).unwrap();
        let fg = FundingGroupPath::new(vec![group(&[1.0, 2.0])], numeraire).unwrap();

        assert_eq!(
            CounterpartyGroupPath::new(vec![], vec![fg]).err(),
            Some(CcrError::Empty("netting groups"))
        );
        assert_eq!(
            CounterpartyGroupPath::new(vec![ng], vec![]).err(),
            Some(CcrError::Empty("funding groups"))
        );
    }

    #[test]
    fn test_grid_mismatch_rejected() {
        let ng = NettingGroupPath::new(vec![group(&[1.0, 2.0])], flat_numeraire(2)).unwrap();
        let fg = FundingGroupPath::new(vec![group(&[1.0, 2.0, 3.0])], flat_numeraire(3)).unwrap();
        assert!(matches!(
            CounterpartyGroupPath::new(vec![ng], vec![fg]),
            Err(CcrError::VertexCountMismatch { .. })
        ));
    }

    #[test]
    fn test_netting_sets_do_not_offset() {
        let path = path_with(&[&[10.0, -4.0], &[-3.0, 6.0]], &[&[1.0, 1.0]]);

        assert_eq!(
            path.exposure(ExposureKind::COLLATERALIZED_POSITIVE),
            vec![10.0, 6.0]
        );
        assert_eq!(
            path.exposure(ExposureKind::COLLATERALIZED_NEGATIVE),
            vec![-3.0, -4.0]
        );
        assert_eq!(path.exposure(ExposureKind::COLLATERALIZED), vec![7.0, 2.0]);
    }

    #[test]
    fn test_measures_sum_over_groups() {
        let path = path_with(
            &[&[100.0, 80.0, 60.0], &[-20.0, 30.0, 10.0]],
            &[&[50.0, 40.0, 30.0]],
        );

        let cva: f64 = path
            .netting_groups()
            .iter()
            .map(|g| g.credit_adjustment())
            .sum();
        let fva = path.funding_groups()[0].funding_value_adjustment();

        let measures = path.measures();
        assert_eq!(measures.cva, cva);
        assert_eq!(measures.fva, fva);
        assert!(measures.ucva < measures.cva);
    }

    #[test]
    fn test_period_profiles_sum_to_scalars() {
        let path = path_with(
            &[&[100.0, 80.0, 60.0], &[-20.0, 30.0, 10.0]],
            &[&[50.0, -40.0, 30.0], &[5.0, 5.0, 5.0]],
        );
        for m in XvaMeasure::ALL {
            let periods = path.adjustment_by_period(m);
            assert_eq!(periods.len(), 2);
            assert_relative_eq!(
                periods.iter().sum::<f64>(),
                path.adjustment(m),
                epsilon = 1e-12
            );
        }
    }
}
