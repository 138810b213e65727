//! Bipartite organization graph of people and groups.
//!
//! The graph exclusively owns the per-entity mutable state (weights,
//! discount factors, test dates). The membership relation is fixed at
//! construction; state changes go through exactly two operations:
//! [`OrganizationGraph::mark_tested`] and
//! [`OrganizationGraph::recompute_weights`].

use chrono::NaiveDate;
use log::debug;
use rustc_hash::FxHashMap;

use crate::error::{Result, RiskRosterError};
use crate::models::{Group, MembershipTable, Person, RiskTable};
use crate::risk::RiskModel;

/// The bipartite structure of people and groups with their weight state
#[derive(Debug, Clone)]
pub struct OrganizationGraph {
    persons: Vec<Person>,
    groups: Vec<Group>,
    person_groups: Vec<Vec<usize>>,
    group_members: Vec<Vec<usize>>,
    person_index: FxHashMap<String, usize>,
    model: RiskModel,
    reference_date: NaiveDate,
}

impl OrganizationGraph {
    /// Build a graph from the two input tables.
    ///
    /// The tables must describe the same people in the same row order: equal
    /// row counts and equal worker id, citizen id and full name per row.
    /// Risk-factor rows must all have the same length. Violations are
    /// [`RiskRosterError::SchemaMismatch`] errors.
    pub fn new(
        membership: &MembershipTable,
        risk: &RiskTable,
        reference_date: NaiveDate,
        model: &RiskModel,
    ) -> Result<Self> {
        validate_tables(membership, risk)?;

        let num_risk_factors = risk.risk_factors.first().map_or(0, Vec::len);
        let coefficients = model.coefficients(num_risk_factors)?;

        let mut persons = Vec::with_capacity(membership.row_count());
        let mut person_index = FxHashMap::default();
        for (row, identity) in membership.identities.iter().enumerate() {
            let weighted_risk_vector: Vec<f64> = risk.risk_factors[row]
                .iter()
                .zip(&coefficients)
                .map(|(reading, coeff)| reading * coeff)
                .collect();
            let static_risk = weighted_risk_vector.iter().sum();
            person_index.insert(identity.key(), row);
            persons.push(Person {
                identity: identity.clone(),
                weighted_risk_vector,
                static_risk,
                last_test_date: risk.last_test_dates[row],
                discount_factor: 1.0,
                current_weight: 0.0,
            });
        }

        let groups = membership
            .group_names
            .iter()
            .map(|name| Group {
                name: name.clone(),
                current_weight: 0.0,
            })
            .collect();
        let mut person_groups = vec![Vec::new(); membership.row_count()];
        let mut group_members = vec![Vec::new(); membership.group_names.len()];
        for (row, flags) in membership.membership.iter().enumerate() {
            for (col, &belongs) in flags.iter().enumerate() {
                if belongs {
                    person_groups[row].push(col);
                    group_members[col].push(row);
                }
            }
        }

        let mut graph = Self {
            persons,
            groups,
            person_groups,
            group_members,
            person_index,
            model: model.clone(),
            reference_date,
        };
        graph.recompute_weights(reference_date)?;
        Ok(graph)
    }

    /// Recompute every person's discount factor and weight relative to
    /// `reference_date`, then every group's aggregate weight.
    ///
    /// Must be called after the reference date or any test date changes;
    /// there is no incremental path, the pass is always full.
    pub fn recompute_weights(&mut self, reference_date: NaiveDate) -> Result<()> {
        self.reference_date = reference_date;
        for person in &mut self.persons {
            let discount = match person.last_test_date {
                None => 1.0,
                Some(last_test) => {
                    let elapsed = reference_date.signed_duration_since(last_test).num_days();
                    self.model.discount(elapsed)?
                }
            };
            person.discount_factor = discount;
            person.current_weight = person.static_risk * discount;
        }
        for (group_idx, group) in self.groups.iter_mut().enumerate() {
            group.current_weight = self.group_members[group_idx]
                .iter()
                .map(|&member| self.persons[member].current_weight)
                .sum();
        }
        debug!(
            "recomputed weights for {} people / {} groups relative to {}",
            self.persons.len(),
            self.groups.len(),
            reference_date
        );
        Ok(())
    }

    /// Set the last test date of each listed person.
    ///
    /// Weights are deliberately left stale so several mutations can be
    /// batched; call [`OrganizationGraph::recompute_weights`] afterwards.
    pub fn mark_tested(&mut self, people: &[usize], test_date: NaiveDate) {
        for &idx in people {
            if let Some(person) = self.persons.get_mut(idx) {
                person.last_test_date = Some(test_date);
            }
        }
    }

    /// Groups incident to any of the listed people, as a map from group
    /// index to the number of listed people belonging to it
    #[must_use]
    pub fn groups_covering(&self, people: &[usize]) -> FxHashMap<usize, usize> {
        let mut covered = FxHashMap::default();
        for &idx in people {
            if let Some(groups) = self.person_groups.get(idx) {
                for &group_idx in groups {
                    *covered.entry(group_idx).or_insert(0) += 1;
                }
            }
        }
        covered
    }

    /// Member person indices of one group; an unknown group index yields an
    /// empty slice
    #[must_use]
    pub fn members_of(&self, group: usize) -> &[usize] {
        self.group_members.get(group).map_or(&[], Vec::as_slice)
    }

    /// Group indices the person belongs to; an unknown person index yields
    /// an empty slice
    #[must_use]
    pub fn groups_of(&self, person: usize) -> &[usize] {
        self.person_groups.get(person).map_or(&[], Vec::as_slice)
    }

    /// Look up a person index by composite identity key
    #[must_use]
    pub fn find_person(&self, key: &str) -> Option<usize> {
        self.person_index.get(key).copied()
    }

    #[must_use]
    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Current weight vector over people, in row order
    #[must_use]
    pub fn person_weights(&self) -> Vec<f64> {
        self.persons.iter().map(|p| p.current_weight).collect()
    }

    /// Current weight vector over groups, in column order
    #[must_use]
    pub fn group_weights(&self) -> Vec<f64> {
        self.groups.iter().map(|g| g.current_weight).collect()
    }

    /// Sum of current weights over all people
    #[must_use]
    pub fn total_person_weight(&self) -> f64 {
        self.persons.iter().map(|p| p.current_weight).sum()
    }

    /// Reference date of the last weight recomputation
    #[must_use]
    pub const fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }
}

fn validate_tables(membership: &MembershipTable, risk: &RiskTable) -> Result<()> {
    if membership.row_count() != risk.row_count() {
        return Err(RiskRosterError::SchemaMismatch(format!(
            "organization table has {} rows but risk table has {}",
            membership.row_count(),
            risk.row_count()
        )));
    }
    if membership.membership.len() != membership.row_count() {
        return Err(RiskRosterError::SchemaMismatch(format!(
            "organization table has {} identity rows but {} membership rows",
            membership.row_count(),
            membership.membership.len()
        )));
    }
    if risk.last_test_dates.len() != risk.row_count()
        || risk.risk_factors.len() != risk.row_count()
    {
        return Err(RiskRosterError::SchemaMismatch(
            "risk table columns have inconsistent row counts".to_string(),
        ));
    }
    for (row, (lhs, rhs)) in membership
        .identities
        .iter()
        .zip(&risk.identities)
        .enumerate()
    {
        // Identity is checked on the first three columns; the position
        // column is informational.
        if lhs.worker_id != rhs.worker_id
            || lhs.citizen_id != rhs.citizen_id
            || lhs.full_name != rhs.full_name
        {
            return Err(RiskRosterError::SchemaMismatch(format!(
                "row {row}: organization identity \"{}\" does not match risk identity \"{}\"",
                lhs.key(),
                rhs.key()
            )));
        }
    }
    let num_risk_factors = risk.risk_factors.first().map_or(0, Vec::len);
    for (row, factors) in risk.risk_factors.iter().enumerate() {
        if factors.len() != num_risk_factors {
            return Err(RiskRosterError::SchemaMismatch(format!(
                "row {row}: expected {num_risk_factors} risk factors, found {}",
                factors.len()
            )));
        }
    }
    for (row, flags) in membership.membership.iter().enumerate() {
        if flags.len() != membership.group_names.len() {
            return Err(RiskRosterError::SchemaMismatch(format!(
                "row {row}: expected {} group flags, found {}",
                membership.group_names.len(),
                flags.len()
            )));
        }
    }
    Ok(())
}
