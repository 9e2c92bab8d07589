//! Netted exposure roll-up for one netting or funding set in one scenario.
//!
//! Member collateral groups are summed vertex by vertex **before** the
//! positive/negative split, so signed exposures offset inside the set:
//!
//! ```text
//! group A:   [ 10, -4 ]
//! group B:   [ -3,  6 ]
//! netted:    [  7,  2 ]   positive: [7, 2]   negative: [0, 0]
//! ```
//!
//! Splitting each group first would give a positive exposure of `[10, 6]`,
//! which ignores the legal netting agreement.

use crate::error::CcrError;
use crate::paths::{CollateralGroupPath, CollateralGroupVertex, NumerairePath};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Whether collateral held is subtracted from the exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Collateralization {
    /// Forward value + cash flow − collateral balance.
    Collateralized,
    /// Forward value + cash flow.
    Uncollateralized,
}

/// Whether the exposure is expressed in the collateral-scheme numeraire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Valuation {
    /// Undiscounted exposure.
    Raw,
    /// Exposure divided by the collateral-scheme numeraire ("PV").
    Discounted,
}

/// Sign projection applied to the netted exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExposureSign {
    /// The signed netted value.
    All,
    /// `max(x, 0)`.
    Positive,
    /// `min(x, 0)`.
    Negative,
}

impl ExposureSign {
    #[inline]
    fn project(self, x: f64) -> f64 {
        match self {
            ExposureSign::All => x,
            ExposureSign::Positive => x.max(0.0),
            ExposureSign::Negative => x.min(0.0),
        }
    }
}

/// One of the twelve exposure flavours.
///
/// # Examples
///
/// ```
/// use pricer_ccr::groups::ExposureKind;
///
/// assert_eq!(ExposureKind::ALL.len(), 12);
/// assert_eq!(ExposureKind::COLLATERALIZED_POSITIVE_PV.to_string(), "collateralized_positive_pv");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ExposureKind {
    /// Collateralised or not.
    pub collateralization: Collateralization,
    /// Raw or numeraire-discounted.
    pub valuation: Valuation,
    /// Sign projection.
    pub sign: ExposureSign,
}

impl ExposureKind {
    /// Creates an exposure kind.
    pub const fn new(
        collateralization: Collateralization,
        valuation: Valuation,
        sign: ExposureSign,
    ) -> Self {
        Self {
            collateralization,
            valuation,
            sign,
        }
    }

    /// Collateralised, raw, signed.
    pub const COLLATERALIZED: Self = Self::new(
        Collateralization::Collateralized,
        Valuation::Raw,
        ExposureSign::All,
    );
    /// Collateralised, raw, positive part.
    pub const COLLATERALIZED_POSITIVE: Self = Self::new(
        Collateralization::Collateralized,
        Valuation::Raw,
        ExposureSign::Positive,
    );
    /// Collateralised, raw, negative part.
    pub const COLLATERALIZED_NEGATIVE: Self = Self::new(
        Collateralization::Collateralized,
        Valuation::Raw,
        ExposureSign::Negative,
    );
    /// Collateralised, discounted, signed.
    pub const COLLATERALIZED_PV: Self = Self::new(
        Collateralization::Collateralized,
        Valuation::Discounted,
        ExposureSign::All,
    );
    /// Collateralised, discounted, positive part.
    pub const COLLATERALIZED_POSITIVE_PV: Self = Self::new(
        Collateralization::Collateralized,
        Valuation::Discounted,
        ExposureSign::Positive,
    );
    /// Collateralised, discounted, negative part.
    pub const COLLATERALIZED_NEGATIVE_PV: Self = Self::new(
        Collateralization::Collateralized,
        Valuation::Discounted,
        ExposureSign::Negative,
    );
    /// Uncollateralised, raw, signed.
    pub const UNCOLLATERALIZED: Self = Self::new(
        Collateralization::Uncollateralized,
        Valuation::Raw,
        ExposureSign::All,
    );
    /// Uncollateralised, raw, positive part.
    pub const UNCOLLATERALIZED_POSITIVE: Self = Self::new(
        Collateralization::Uncollateralized,
        Valuation::Raw,
        ExposureSign::Positive,
    );
    /// Uncollateralised, raw, negative part.
    pub const UNCOLLATERALIZED_NEGATIVE: Self = Self::new(
        Collateralization::Uncollateralized,
        Valuation::Raw,
        ExposureSign::Negative,
    );
    /// Uncollateralised, discounted, signed.
    pub const UNCOLLATERALIZED_PV: Self = Self::new(
        Collateralization::Uncollateralized,
        Valuation::Discounted,
        ExposureSign::All,
    );
    /// Uncollateralised, discounted, positive part.
    pub const UNCOLLATERALIZED_POSITIVE_PV: Self = Self::new(
        Collateralization::Uncollateralized,
        Valuation::Discounted,
        ExposureSign::Positive,
    );
    /// Uncollateralised, discounted, negative part.
    pub const UNCOLLATERALIZED_NEGATIVE_PV: Self = Self::new(
        Collateralization::Uncollateralized,
        Valuation::Discounted,
        ExposureSign::Negative,
    );

    /// All twelve flavours, in [`ExposureKind::index`] order.
    pub const ALL: [Self; 12] = [
        Self::COLLATERALIZED,
        Self::COLLATERALIZED_POSITIVE,
        Self::COLLATERALIZED_NEGATIVE,
        Self::COLLATERALIZED_PV,
        Self::COLLATERALIZED_POSITIVE_PV,
        Self::COLLATERALIZED_NEGATIVE_PV,
        Self::UNCOLLATERALIZED,
        Self::UNCOLLATERALIZED_POSITIVE,
        Self::UNCOLLATERALIZED_NEGATIVE,
        Self::UNCOLLATERALIZED_PV,
        Self::UNCOLLATERALIZED_POSITIVE_PV,
        Self::UNCOLLATERALIZED_NEGATIVE_PV,
    ];

    /// Position of this kind in [`ExposureKind::ALL`].
    pub const fn index(&self) -> usize {
        self.base_index() * 3
            + match self.sign {
                ExposureSign::All => 0,
                ExposureSign::Positive => 1,
                ExposureSign::Negative => 2,
            }
    }

    /// Index of the unsplit base series (0..4).
    const fn base_index(&self) -> usize {
        let c = match self.collateralization {
            Collateralization::Collateralized => 0,
            Collateralization::Uncollateralized => 1,
        };
        let v = match self.valuation {
            Valuation::Raw => 0,
            Valuation::Discounted => 1,
        };
        c * 2 + v
    }
}

impl fmt::Display for ExposureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self.collateralization {
            Collateralization::Collateralized => "collateralized",
            Collateralization::Uncollateralized => "uncollateralized",
        };
        let s = match self.sign {
            ExposureSign::All => "",
            ExposureSign::Positive => "_positive",
            ExposureSign::Negative => "_negative",
        };
        let v = match self.valuation {
            Valuation::Raw => "",
            Valuation::Discounted => "_pv",
        };
        write!(f, "{}{}{}", c, s, v)
    }
}

/// Checks that `dates` matches the reference grid exactly.
pub(crate) fn ensure_same_grid(expected: &[NaiveDate], dates: &[NaiveDate]) -> Result<(), CcrError> {
    if expected.len() != dates.len() {
        return Err(CcrError::VertexCountMismatch {
            expected: expected.len(),
            actual: dates.len(),
        });
    }
    match expected.iter().zip(dates).position(|(a, b)| a != b) {
        Some(index) => Err(CcrError::DateMismatch {
            index,
            expected: expected[index],
            actual: dates[index],
        }),
        None => Ok(()),
    }
}

/// Sum of a base exposure across groups at every vertex, optionally
/// divided by a numeraire.
fn netted_series(
    groups: &[Arc<CollateralGroupPath>],
    n_vertices: usize,
    collateralization: Collateralization,
    numeraire: Option<&[f64]>,
) -> Vec<f64> {
    let base: fn(&CollateralGroupVertex) -> f64 = match collateralization {
        Collateralization::Collateralized => CollateralGroupVertex::collateralized_exposure,
        Collateralization::Uncollateralized => CollateralGroupVertex::uncollateralized_exposure,
    };
    (0..n_vertices)
        .map(|i| {
            let netted: f64 = groups.iter().map(|g| base(&g.vertices()[i])).sum();
            match numeraire {
                Some(n) => netted / n[i],
                None => netted,
            }
        })
        .collect()
}

/// Netted exposure of a set of collateral groups sharing one numeraire path.
///
/// The four unsplit base series are computed once at construction; every
/// flavour is served from them by a sign projection.
#[derive(Debug, Clone)]
pub struct ExposureGroupPath {
    collateral_groups: Vec<Arc<CollateralGroupPath>>,
    numeraire: Arc<NumerairePath>,
    dates: Vec<NaiveDate>,
    /// Indexed by `ExposureKind::base_index`.
    base: [Vec<f64>; 4],
}

impl ExposureGroupPath {
    /// Creates the roll-up of `collateral_groups` against `numeraire`.
    ///
    /// # Errors
    ///
    /// - [`CcrError::Empty`] if there are no collateral groups.
    /// - [`CcrError::VertexCountMismatch`] or [`CcrError::DateMismatch`] if
    ///   any member is not on the numeraire path's date grid.
    pub fn new(
        collateral_groups: Vec<Arc<CollateralGroupPath>>,
        numeraire: Arc<NumerairePath>,
    ) -> Result<Self, CcrError> {
        if collateral_groups.is_empty() {
            return Err(CcrError::Empty("collateral groups"));
        }

        let dates = numeraire.dates();
        for group in &collateral_groups {
            ensure_same_grid(&dates, &group.dates())?;
        }

        let n = dates.len();
        let discount = numeraire.collateral_numeraire();
        let base = [
            netted_series(&collateral_groups, n, Collateralization::Collateralized, None),
            netted_series(
                &collateral_groups,
                n,
                Collateralization::Collateralized,
                Some(discount),
            ),
            netted_series(&collateral_groups, n, Collateralization::Uncollateralized, None),
            netted_series(
                &collateral_groups,
                n,
                Collateralization::Uncollateralized,
                Some(discount),
            ),
        ];

        tracing::trace!(
            collateral_groups = collateral_groups.len(),
            vertices = n,
            "built exposure group path"
        );

        Ok(Self {
            collateral_groups,
            numeraire,
            dates,
            base,
        })
    }

    /// Number of vertices on the grid.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.dates.len()
    }

    /// Anchor dates of the grid.
    #[inline]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Interval lengths Δtᵢ of the grid.
    #[inline]
    pub fn year_fractions(&self) -> &[f64] {
        self.numeraire.year_fractions()
    }

    /// The shared numeraire path.
    #[inline]
    pub fn numeraire(&self) -> &NumerairePath {
        &self.numeraire
    }

    /// Member collateral-group paths.
    #[inline]
    pub fn collateral_groups(&self) -> &[Arc<CollateralGroupPath>] {
        &self.collateral_groups
    }

    /// The unsplit netted series for a collateralisation and valuation.
    #[inline]
    pub fn base_series(&self, collateralization: Collateralization, valuation: Valuation) -> &[f64] {
        &self.base[ExposureKind::new(collateralization, valuation, ExposureSign::All).base_index()]
    }

    /// The exposure series of flavour `kind`.
    pub fn exposure(&self, kind: ExposureKind) -> Vec<f64> {
        self.base[kind.base_index()]
            .iter()
            .map(|&x| kind.sign.project(x))
            .collect()
    }

    /// Netted collateralised exposure.
    pub fn collateralized_exposure(&self) -> Vec<f64> {
        self.exposure(ExposureKind::COLLATERALIZED)
    }

    /// Positive part of the netted collateralised exposure.
    pub fn collateralized_positive_exposure(&self) -> Vec<f64> {
        self.exposure(ExposureKind::COLLATERALIZED_POSITIVE)
    }

    /// Negative part of the netted collateralised exposure.
    pub fn collateralized_negative_exposure(&self) -> Vec<f64> {
        self.exposure(ExposureKind::COLLATERALIZED_NEGATIVE)
    }

    /// Netted collateralised exposure in the collateral numeraire.
    pub fn collateralized_exposure_pv(&self) -> Vec<f64> {
        self.exposure(ExposureKind::COLLATERALIZED_PV)
    }

    /// Positive part of [`Self::collateralized_exposure_pv`].
    pub fn collateralized_positive_exposure_pv(&self) -> Vec<f64> {
        self.exposure(ExposureKind::COLLATERALIZED_POSITIVE_PV)
    }

    /// Negative part of [`Self::collateralized_exposure_pv`].
    pub fn collateralized_negative_exposure_pv(&self) -> Vec<f64> {
        self.exposure(ExposureKind::COLLATERALIZED_NEGATIVE_PV)
    }

    /// Netted uncollateralised exposure.
    pub fn uncollateralized_exposure(&self) -> Vec<f64> {
        self.exposure(ExposureKind::UNCOLLATERALIZED)
    }

    /// Positive part of the netted uncollateralised exposure.
    pub fn uncollateralized_positive_exposure(&self) -> Vec<f64> {
        self.exposure(ExposureKind::UNCOLLATERALIZED_POSITIVE)
    }

    /// Negative part of the netted uncollateralised exposure.
    pub fn uncollateralized_negative_exposure(&self) -> Vec<f64> {
        self.exposure(ExposureKind::UNCOLLATERALIZED_NEGATIVE)
    }

    /// Netted uncollateralised exposure in the collateral numeraire.
    pub fn uncollateralized_exposure_pv(&self) -> Vec<f64> {
        self.exposure(ExposureKind::UNCOLLATERALIZED_PV)
    }

    /// Positive part of [`Self::uncollateralized_exposure_pv`].
    pub fn uncollateralized_positive_exposure_pv(&self) -> Vec<f64> {
        self.exposure(ExposureKind::UNCOLLATERALIZED_POSITIVE_PV)
    }

    /// Negative part of [`Self::uncollateralized_exposure_pv`].
    pub fn uncollateralized_negative_exposure_pv(&self) -> Vec<f64> {
        self.exposure(ExposureKind::UNCOLLATERALIZED_NEGATIVE_PV)
    }
}
