//! # Pricer CCR
//!
//! Pathwise counterparty credit exposure and valuation adjustments.
//!
//! Given Monte Carlo scenario paths of collateral agreements (forward value,
//! cash flow and collateral balance at each grid date) and a numeraire path
//! carrying credit, funding and collateral-rate curves, this crate computes:
//! - Netted exposure in twelve flavours (collateralized or not, raw or
//!   numeraire-discounted, all / positive / negative)
//! - UCVA, bilateral CVA and DVA per netting group
//! - FVA, FDA, FCA, FBA and symmetric FVA per funding group
//! - Counterparty sums, ensemble means and per-vertex statistics (PFE)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  counterparty/ - CounterpartyGroupPath, │
//! │     Aggregator (rayon map + reduce),    │
//! │     Digest (per-vertex statistics)      │
//! ├─────────────────────────────────────────┤
//! │  groups/   - ExposureGroupPath,         │
//! │     NettingGroupPath (CVA, DVA),        │
//! │     FundingGroupPath (FVA family)       │
//! ├─────────────────────────────────────────┤
//! │  paths/    - CollateralGroupVertex,     │
//! │     CollateralGroupPath, NumerairePath  │
//! ├─────────────────────────────────────────┤
//! │  integration/ time/ config/ error/      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use pricer_ccr::{
//!     AggregationConfig, CollateralGroupPath, CounterpartyGroupAggregator,
//!     CounterpartyGroupPath, CreditState, ExposureKind, FundingGroupPath,
//!     NettingGroupPath, NumeraireCurvePoint, NumerairePath,
//! };
//! use std::sync::Arc;
//!
//! let dates: Vec<NaiveDate> = [(2025, 1, 1), (2025, 7, 1), (2026, 1, 1)]
//!     .iter()
//!     .map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
//!     .collect();
//!
//! let points = dates
//!     .iter()
//!     .zip([1.0, 0.99, 0.98])
//!     .zip([1.0, 0.97, 0.94])
//!     .map(|((&date, bank_s), cpty_s)| {
//!         NumeraireCurvePoint::new(
//!             date,
//!             0.02,
//!             0.0,
//!             CreditState::new(bank_s, 0.4, 0.02).unwrap(),
//!             0.01,
//!             CreditState::new(cpty_s, 0.4, 0.06).unwrap(),
//!         )
//!         .unwrap()
//!     })
//!     .collect();
//! let numeraire = Arc::new(NumerairePath::new(points).unwrap());
//!
//! let swaps = Arc::new(
//!     CollateralGroupPath::from_series(&dates, &[100.0, 80.0, -20.0], &[0.0; 3], &[0.0; 3])
//!         .unwrap(),
//! );
//!
//! let path = CounterpartyGroupPath::new(
//!     vec![NettingGroupPath::new(vec![swaps.clone()], numeraire.clone()).unwrap()],
//!     vec![FundingGroupPath::new(vec![swaps], numeraire).unwrap()],
//! )
//! .unwrap();
//!
//! let aggregator =
//!     CounterpartyGroupAggregator::new(&[path], AggregationConfig::default()).unwrap();
//!
//! assert!(aggregator.credit_adjustment() < 0.0);
//! assert_eq!(
//!     aggregator.expected_exposure(ExposureKind::COLLATERALIZED_POSITIVE),
//!     &[100.0, 80.0, 0.0]
//! );
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod counterparty;
pub mod error;
pub mod groups;
pub mod integration;
pub mod paths;
pub mod time;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{AggregationConfig, ConfigError, InvalidPathPolicy};
pub use counterparty::{
    CounterpartyGroupAggregator, CounterpartyGroupDigest, CounterpartyGroupPath, EnsembleXva,
    UnivariateStatistics, XvaMeasure, XvaMeasures,
};
pub use error::CcrError;
pub use groups::{
    CreditMeasure, ExposureGroupPath, ExposureKind, FundingGroupPath, FundingMeasure,
    NettingGroupPath,
};
pub use paths::{
    CollateralGroupPath, CollateralGroupVertex, CreditState, NumeraireCurvePoint, NumerairePath,
};
pub use time::DayCount;
