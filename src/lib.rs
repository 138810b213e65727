//! A Rust library for selecting disease-testing candidates under a fixed
//! per-round budget, maximizing fair risk coverage across the groups of an
//! organization.
//!
//! The pipeline is: a time-decaying risk model weights people and groups on
//! a bipartite organization graph; a budget-constrained LP maximizes the
//! minimum group coverage; randomized rounding plus deterministic repair
//! turns the fractional solution into an exact-size selection; a sweep
//! driver repeats this across a budget range, simulating each selection
//! forward before recording it.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod graph;
pub mod models;
pub mod risk;

// Re-export the most common types for easier use
// Core types
pub use config::RiskModelConfig;
pub use error::{Result, RiskRosterError};
pub use graph::OrganizationGraph;
pub use risk::{CoefficientKind, DiscountKind, RiskModel};

// Entity models and tables
pub use models::{Group, MembershipTable, Person, PersonIdentity, RiskTable, RosterTable};

// Selection and sweep
pub use algorithm::{
    CandidateSelector, RoundResult, Selection, SelectorConfig, SweepConfig, SweepDriver,
    SweepProgress, SweepReport,
};
