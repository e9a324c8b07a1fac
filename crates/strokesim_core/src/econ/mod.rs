//! Health-economic comparison of treatment strategies
//!
//! - [`CostEffectivenessAnalysis`]: dominance screening, frontier, ICERs,
//!   cost-effectiveness table and plane
//! - [`CostBenefitAnalysis`]: incremental net monetary benefit curves over a
//!   willingness-to-pay grid
//!
//! Both take a [`Pairing`](crate::stats::Pairing) that selects the difference
//! estimator used for incremental quantities.

mod cba;
mod cea;
mod strategy;

pub use cba::{CostBenefitAnalysis, NmbCurve, NmbPoint, wtp_grid};
pub use cea::{
    CeTableRow, CostEffectivenessAnalysis, DominanceStatus, Estimate, FrontierPoint,
    IncrementalEstimate, TableOptions, icer,
};
pub use strategy::Strategy;
