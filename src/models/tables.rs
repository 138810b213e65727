//! Tabular input and output structures.
//!
//! These are the in-memory form of the spreadsheet tables the engine
//! consumes and produces. Reading and writing the actual files is the
//! responsibility of the I/O layer; only the shapes and the date parsing
//! rules live here.

use chrono::NaiveDate;

use crate::error::{Result, RiskRosterError};
use crate::graph::OrganizationGraph;
use crate::models::person::PersonIdentity;

/// Date format used by the "last test date" column
pub const TEST_DATE_FORMAT: &str = "%Y-%m-%d";

/// Organization membership table: four identity columns followed by one
/// boolean column per group.
#[derive(Debug, Clone)]
pub struct MembershipTable {
    /// One identity per row
    pub identities: Vec<PersonIdentity>,
    /// Group column headers, in column order
    pub group_names: Vec<String>,
    /// `membership[row][col]` is true when the row's person belongs to the
    /// col'th group; every row has `group_names.len()` entries
    pub membership: Vec<Vec<bool>>,
}

impl MembershipTable {
    /// Number of people (rows)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.identities.len()
    }
}

/// Risk data table: four identity columns, one last-test-date column, then
/// one numeric column per risk factor.
#[derive(Debug, Clone)]
pub struct RiskTable {
    /// One identity per row, in the same order as the membership table
    pub identities: Vec<PersonIdentity>,
    /// Most recent test date per row, `None` for never tested
    pub last_test_dates: Vec<Option<NaiveDate>>,
    /// `risk_factors[row]` holds the row's risk-factor readings
    pub risk_factors: Vec<Vec<f64>>,
}

impl RiskTable {
    /// Build a risk table from raw column values, parsing the last-test-date
    /// strings.
    ///
    /// An empty date string means the person was never tested; anything else
    /// must be ISO `YYYY-MM-DD`.
    pub fn from_raw(
        identities: Vec<PersonIdentity>,
        last_test_dates: &[String],
        risk_factors: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let last_test_dates = last_test_dates
            .iter()
            .map(|s| parse_test_date(s))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            identities,
            last_test_dates,
            risk_factors,
        })
    }

    /// Number of people (rows)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.identities.len()
    }
}

/// Parse a last-test-date cell: empty means never tested
pub fn parse_test_date(s: &str) -> Result<Option<NaiveDate>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, TEST_DATE_FORMAT)
        .map(Some)
        .map_err(|e| RiskRosterError::DateParse(format!("\"{trimmed}\": {e}")))
}

/// Checklist roster produced for a selection: the identity columns plus an
/// empty "Tested" marker column to be filled in by hand.
#[derive(Debug, Clone)]
pub struct RosterTable {
    /// Column headers
    pub headers: Vec<String>,
    /// One row of cells per selected person
    pub rows: Vec<Vec<String>>,
}

impl RosterTable {
    /// Build the roster for a set of selected people, given by person index
    /// into the graph.
    ///
    /// People are listed in ascending index order; unknown indices are
    /// skipped.
    #[must_use]
    pub fn from_selection(graph: &OrganizationGraph, selected: &[usize]) -> Self {
        let headers = vec![
            "Worker ID".to_string(),
            "Citizen ID".to_string(),
            "Full Name".to_string(),
            "Position".to_string(),
            "Tested".to_string(),
        ];
        let mut indices: Vec<usize> = selected
            .iter()
            .copied()
            .filter(|&idx| idx < graph.person_count())
            .collect();
        indices.sort_unstable();
        indices.dedup();
        let rows = indices
            .into_iter()
            .map(|idx| {
                let identity = &graph.persons()[idx].identity;
                vec![
                    identity.worker_id.clone(),
                    identity.citizen_id.clone(),
                    identity.full_name.clone(),
                    identity.position.clone(),
                    String::new(),
                ]
            })
            .collect();
        Self { headers, rows }
    }
}
