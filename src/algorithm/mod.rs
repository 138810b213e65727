//! Selection algorithms: the per-budget fairness optimization and the
//! multi-budget sweep driver.

pub mod selection;
pub mod sweep;

pub use selection::{CandidateSelector, Selection, SelectorConfig};
pub use sweep::{RoundResult, SweepConfig, SweepDriver, SweepProgress, SweepReport};
