//! Error handling for the risk-roster selection engine.

/// Specialized error type for the selection engine
#[derive(Debug, thiserror::Error)]
pub enum RiskRosterError {
    /// Risk model kind or vector not set or malformed
    #[error("{kind} configuration error: {detail}")]
    Configuration {
        /// Which part of the risk model is misconfigured
        kind: String,
        /// What is wrong with it
        detail: String,
    },

    /// Organization and risk tables disagree on person identity or count
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The LP/MILP backend reported infeasibility, unboundedness or crashed
    #[error("Solver failure: {0}")]
    Solver(String),

    /// A date column value could not be parsed as ISO `YYYY-MM-DD`
    #[error("Date parsing error: {0}")]
    DateParse(String),

    /// Error reading or writing a configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error serializing or deserializing a configuration file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RiskRosterError {
    /// Shorthand for a [`RiskRosterError::Configuration`] value
    pub fn configuration(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Configuration {
            kind: kind.into(),
            detail: detail.into(),
        }
    }
}

/// Result type for selection engine operations
pub type Result<T> = std::result::Result<T, RiskRosterError>;
