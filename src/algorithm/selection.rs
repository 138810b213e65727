//! Budget-constrained fairness-maximizing candidate selection.
//!
//! For one graph snapshot and one budget this module formulates a linear
//! program (optionally integer-constrained), solves it, and repairs the
//! fractional solution into an exact-size discrete selection.
//!
//! The formulation maximizes `z + lambda * sum(coverage(g))` where `z` is a
//! lower bound on the coverage of every significant group: fairness first,
//! total coverage as a tie-breaker.

use itertools::Itertools;
use log::{debug, info, warn};
use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};
use rand::Rng;

use crate::graph::OrganizationGraph;

/// Tuning knobs for the selection optimization
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Solve with 0/1 variables instead of fractional variables followed by
    /// randomized rounding
    pub integer_mode: bool,
    /// Divide each group's coverage by the group weight so that every
    /// constraint compares like with like
    pub normalized_coverage: bool,
    /// Weight of the total-coverage tie-breaking term, divided by the group
    /// count before use
    pub secondary_objective_coefficient: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            integer_mode: false,
            normalized_coverage: true,
            secondary_objective_coefficient: 0.01,
        }
    }
}

/// Outcome of one solved selection round
#[derive(Debug, Clone)]
pub struct Selection {
    /// Selected person indices, ascending
    pub people: Vec<usize>,
    /// Solved value of the fairness variable `z`
    pub fairness: f64,
    /// Solved per-person variable values, in row order
    pub fractional: Vec<f64>,
}

/// Formulates and solves the selection problem for one graph snapshot
#[derive(Debug)]
pub struct CandidateSelector<'a> {
    graph: &'a OrganizationGraph,
    budget: usize,
    config: SelectorConfig,
}

impl<'a> CandidateSelector<'a> {
    /// Fallback secondary-objective scale used when there are no groups to
    /// average over
    const EMPTY_GROUP_REGULARIZER: f64 = 0.1;

    /// Create a selector for `budget` tests against one graph snapshot.
    ///
    /// A budget beyond the population size cannot be exploited and is
    /// clamped with a warning.
    #[must_use]
    pub fn new(graph: &'a OrganizationGraph, budget: usize, config: SelectorConfig) -> Self {
        let population = graph.person_count();
        let budget = if budget > population {
            warn!(
                "budget B={budget} cannot be exploited with only {population} people; \
                 truncated to {population}"
            );
            population
        } else {
            budget
        };
        Self {
            graph,
            budget,
            config,
        }
    }

    /// Effective (possibly clamped) budget
    #[must_use]
    pub const fn budget(&self) -> usize {
        self.budget
    }

    /// Solve the selection problem.
    ///
    /// Returns `None` when the backend reports infeasibility, unboundedness
    /// or an internal failure; the round must then be treated as failed.
    /// The rng drives the randomized rounding in fractional mode and is
    /// unused in integer mode.
    pub fn solve<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Selection> {
        let n = self.graph.person_count();
        let num_groups = self.graph.group_count();
        let lambda = if num_groups == 0 {
            Self::EMPTY_GROUP_REGULARIZER
        } else {
            self.config.secondary_objective_coefficient / num_groups as f64
        };

        // Per-person weight contribution to each incident group's coverage,
        // accumulated into the objective; the same contributions feed the
        // per-group constraints below.
        let mut objective = vec![0.0; n];
        let mut group_terms: Vec<Vec<(usize, f64)>> = Vec::with_capacity(num_groups);
        for group_idx in 0..num_groups {
            let group_weight = self.graph.groups()[group_idx].current_weight;
            let terms: Vec<(usize, f64)> = self
                .graph
                .members_of(group_idx)
                .iter()
                .map(|&person| {
                    let person_weight = self.graph.persons()[person].current_weight;
                    let contribution = if self.config.normalized_coverage {
                        if group_weight != 0.0 {
                            person_weight / group_weight
                        } else {
                            0.0
                        }
                    } else {
                        person_weight
                    };
                    (person, contribution)
                })
                .collect();
            for &(person, contribution) in &terms {
                objective[person] += lambda * contribution;
            }
            group_terms.push(terms);
        }

        let mut problem = Problem::new(OptimizationDirection::Maximize);
        let xs: Vec<Variable> = (0..n)
            .map(|person| {
                if self.config.integer_mode {
                    problem.add_integer_var(objective[person], (0, 1))
                } else {
                    problem.add_var(objective[person], (0.0, 1.0))
                }
            })
            .collect();
        let z = problem.add_var(1.0, (f64::NEG_INFINITY, f64::INFINITY));

        // Constrain coverage(g) >= z only for groups carrying a significant
        // share of the total risk; near-zero-risk groups must not drag the
        // fairness bound down.
        let significance_threshold =
            0.5 / n.max(1) as f64 * self.graph.total_person_weight();
        for (group_idx, terms) in group_terms.iter().enumerate() {
            if self.graph.groups()[group_idx].current_weight < significance_threshold {
                continue;
            }
            let mut expr: Vec<(Variable, f64)> = terms
                .iter()
                .map(|&(person, contribution)| (xs[person], contribution))
                .collect();
            expr.push((z, -1.0));
            problem.add_constraint(expr, ComparisonOp::Ge, 0.0);
        }

        let budget_expr: Vec<(Variable, f64)> = xs.iter().map(|&x| (x, 1.0)).collect();
        problem.add_constraint(budget_expr, ComparisonOp::Le, self.budget as f64);

        let solution = match problem.solve() {
            Ok(solution) => solution,
            Err(e) => {
                warn!("selection problem for B={} failed: {e}", self.budget);
                return None;
            }
        };

        let fractional: Vec<f64> = xs.iter().map(|&x| solution[x]).collect();
        let fairness = solution[z];

        let mut selected: Vec<bool> = fractional
            .iter()
            .map(|&value| {
                if self.config.integer_mode {
                    value > 0.5
                } else {
                    rng.random_bool(value.clamp(0.0, 1.0))
                }
            })
            .collect();
        if !self.config.integer_mode {
            self.repair(&mut selected, &fractional);
        }

        let people: Vec<usize> = selected
            .iter()
            .enumerate()
            .filter_map(|(person, &flag)| flag.then_some(person))
            .collect();
        info!(
            "selection for B={} found z={fairness:.4}, {} people chosen",
            self.budget,
            people.len()
        );
        Some(Selection {
            people,
            fairness,
            fractional,
        })
    }

    /// Drive the rounded selection to exactly the budget size.
    ///
    /// People are dropped in ascending and added in descending order of
    /// their fractional value, ties broken by ascending person index.
    fn repair(&self, selected: &mut [bool], fractional: &[f64]) {
        let mut count = selected.iter().filter(|&&flag| flag).count();
        if count == self.budget {
            return;
        }
        debug!(
            "rounded selection has {count} people, repairing towards B={}",
            self.budget
        );
        let order: Vec<usize> = (0..selected.len())
            .sorted_by(|&a, &b| fractional[a].total_cmp(&fractional[b]).then(a.cmp(&b)))
            .collect();
        if count > self.budget {
            for &person in &order {
                if count == self.budget {
                    break;
                }
                if selected[person] {
                    selected[person] = false;
                    count -= 1;
                    debug!("repair: dropping person {person}");
                }
            }
        } else {
            for &person in order.iter().rev() {
                if count == self.budget {
                    break;
                }
                if !selected[person] {
                    selected[person] = true;
                    count += 1;
                    debug!("repair: adding person {person}");
                }
            }
        }
    }
}
