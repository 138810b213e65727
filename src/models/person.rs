//! Person entity model
//!
//! A person is identified by a composite key of four identity columns and
//! carries both static risk data (fixed at graph construction) and
//! time-varying weight state (recomputed per round).

use chrono::NaiveDate;

/// Composite identity of a person, taken from the four leading columns of
/// both input tables
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonIdentity {
    /// Worker identifier within the organization
    pub worker_id: String,
    /// National citizen identifier
    pub citizen_id: String,
    /// Full name
    pub full_name: String,
    /// Position within the organization
    pub position: String,
}

impl PersonIdentity {
    #[must_use]
    pub fn new(
        worker_id: impl Into<String>,
        citizen_id: impl Into<String>,
        full_name: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            citizen_id: citizen_id.into(),
            full_name: full_name.into(),
            position: position.into(),
        }
    }

    /// Unique string key joining the four identity columns
    #[must_use]
    pub fn key(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.worker_id, self.citizen_id, self.full_name, self.position
        )
    }
}

/// A person node in the organization graph
#[derive(Debug, Clone)]
pub struct Person {
    /// Composite identity
    pub identity: PersonIdentity,
    /// Risk-factor readings multiplied element-wise by the coefficient vector
    pub weighted_risk_vector: Vec<f64>,
    /// Sum of the weighted risk vector; fixed for the graph's lifetime
    pub static_risk: f64,
    /// Date of the most recent disease test, `None` if never tested
    pub last_test_date: Option<NaiveDate>,
    /// Time-decay multiplier in `[0, 1]` relative to the reference date
    pub discount_factor: f64,
    /// `static_risk * discount_factor` as of the last weight recomputation
    pub current_weight: f64,
}
