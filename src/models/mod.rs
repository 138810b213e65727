//! Entity models: people, groups and the tabular input/output structures.

pub mod group;
pub mod person;
pub mod tables;

pub use group::Group;
pub use person::{Person, PersonIdentity};
pub use tables::{MembershipTable, RiskTable, RosterTable};
