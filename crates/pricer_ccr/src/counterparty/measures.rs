//! Scalar adjustment measures reported per counterparty.

use crate::groups::{CreditMeasure, FundingMeasure};
use serde::Serialize;
use std::fmt;

/// One of the eight scalar adjustments reported per counterparty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum XvaMeasure {
    /// Unilateral CVA.
    Ucva,
    /// Bilateral CVA.
    Cva,
    /// DVA.
    Dva,
    /// FVA.
    Fva,
    /// FDA.
    Fda,
    /// FCA.
    Fca,
    /// FBA.
    Fba,
    /// Symmetric FVA.
    Sfva,
}

/// Where a measure is computed: netting or funding groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GroupMeasure {
    Credit(CreditMeasure),
    Funding(FundingMeasure),
}

impl XvaMeasure {
    /// All measures, in [`XvaMeasure::index`] order.
    pub const ALL: [Self; 8] = [
        Self::Ucva,
        Self::Cva,
        Self::Dva,
        Self::Fva,
        Self::Fda,
        Self::Fca,
        Self::Fba,
        Self::Sfva,
    ];

    /// Position in [`XvaMeasure::ALL`].
    pub const fn index(&self) -> usize {
        match self {
            Self::Ucva => 0,
            Self::Cva => 1,
            Self::Dva => 2,
            Self::Fva => 3,
            Self::Fda => 4,
            Self::Fca => 5,
            Self::Fba => 6,
            Self::Sfva => 7,
        }
    }

    /// Short upper-case name, e.g. `"CVA"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ucva => "UCVA",
            Self::Cva => "CVA",
            Self::Dva => "DVA",
            Self::Fva => "FVA",
            Self::Fda => "FDA",
            Self::Fca => "FCA",
            Self::Fba => "FBA",
            Self::Sfva => "SFVA",
        }
    }

    pub(crate) fn group_measure(&self) -> GroupMeasure {
        match self {
            Self::Ucva => GroupMeasure::Credit(CreditMeasure::UnilateralCva),
            Self::Cva => GroupMeasure::Credit(CreditMeasure::BilateralCva),
            Self::Dva => GroupMeasure::Credit(CreditMeasure::Dva),
            Self::Fva => GroupMeasure::Funding(FundingMeasure::Fva),
            Self::Fda => GroupMeasure::Funding(FundingMeasure::Fda),
            Self::Fca => GroupMeasure::Funding(FundingMeasure::Fca),
            Self::Fba => GroupMeasure::Funding(FundingMeasure::Fba),
            Self::Sfva => GroupMeasure::Funding(FundingMeasure::SymmetricFva),
        }
    }
}

impl fmt::Display for XvaMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The eight scalar adjustments of one path or of an ensemble.
///
/// `cva` is the bilateral CVA; `ucva` the unilateral one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct XvaMeasures {
    /// Unilateral CVA.
    pub ucva: f64,
    /// Bilateral CVA.
    pub cva: f64,
    /// DVA.
    pub dva: f64,
    /// FVA.
    pub fva: f64,
    /// FDA.
    pub fda: f64,
    /// FCA.
    pub fca: f64,
    /// FBA.
    pub fba: f64,
    /// Symmetric FVA.
    pub sfva: f64,
}

impl XvaMeasures {
    /// Builds the measures from a lookup, one call per measure.
    pub fn from_fn(mut f: impl FnMut(XvaMeasure) -> f64) -> Self {
        Self {
            ucva: f(XvaMeasure::Ucva),
            cva: f(XvaMeasure::Cva),
            dva: f(XvaMeasure::Dva),
            fva: f(XvaMeasure::Fva),
            fda: f(XvaMeasure::Fda),
            fca: f(XvaMeasure::Fca),
            fba: f(XvaMeasure::Fba),
            sfva: f(XvaMeasure::Sfva),
        }
    }

    /// Value of one measure.
    pub fn get(&self, measure: XvaMeasure) -> f64 {
        match measure {
            XvaMeasure::Ucva => self.ucva,
            XvaMeasure::Cva => self.cva,
            XvaMeasure::Dva => self.dva,
            XvaMeasure::Fva => self.fva,
            XvaMeasure::Fda => self.fda,
            XvaMeasure::Fca => self.fca,
            XvaMeasure::Fba => self.fba,
            XvaMeasure::Sfva => self.sfva,
        }
    }

    /// Whether every measure is finite.
    pub fn is_finite(&self) -> bool {
        XvaMeasure::ALL.iter().all(|&m| self.get(m).is_finite())
    }
}
