//! Scenario path data model.
//!
//! - [`CollateralGroupVertex`]: one dated snapshot of one collateral agreement
//! - [`CollateralGroupPath`]: the vertices of one agreement in one scenario
//! - [`NumerairePath`]: credit, funding and collateral-rate curves on the same grid

mod collateral;
mod numeraire;
mod vertex;

pub use collateral::CollateralGroupPath;
pub use numeraire::{CreditState, NumeraireCurvePoint, NumerairePath};
pub use vertex::CollateralGroupVertex;
