//! Counterparty level: per-scenario composites and ensemble aggregation.
//!
//! - [`CounterpartyGroupPath`]: sums a counterparty's netting and funding
//!   groups within one scenario
//! - [`CounterpartyGroupAggregator`]: means across scenarios
//! - [`CounterpartyGroupDigest`]: per-vertex distribution statistics

mod aggregator;
mod digest;
mod measures;
mod path;
mod statistics;

pub use aggregator::{AdjustmentProfile, CounterpartyGroupAggregator, EnsembleXva, ExposureProfile};
pub use digest::CounterpartyGroupDigest;
pub use measures::{XvaMeasure, XvaMeasures};
pub use path::CounterpartyGroupPath;
pub use statistics::UnivariateStatistics;
