//! Multi-budget "what-if" sweep over the selection problem.
//!
//! For each budget in an ascending range the driver rebuilds a fresh graph
//! from the untouched input tables, solves the selection, then simulates the
//! selection by marking the chosen people as tested today and recomputing
//! weights before recording the round. Rebuilding per budget means rounds
//! are independent what-if simulations; selections at smaller budgets never
//! suppress weights at larger ones.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Instant;

use chrono::NaiveDate;
use indicatif::ProgressBar;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::algorithm::selection::{CandidateSelector, SelectorConfig};
use crate::error::Result;
use crate::graph::OrganizationGraph;
use crate::models::{MembershipTable, RiskTable};
use crate::risk::RiskModel;

/// Configuration for a budget sweep
#[derive(Debug, Clone, Default)]
pub struct SweepConfig {
    /// Per-budget selection settings
    pub selector: SelectorConfig,
    /// Seed for the randomized rounding; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Render a progress bar on stderr while the sweep runs
    pub show_progress: bool,
}

/// Immutable record of one solved budget
#[derive(Debug, Clone)]
pub struct RoundResult {
    /// The requested budget for this round
    pub budget: usize,
    /// Composite keys of the selected people
    pub selected_people: Vec<String>,
    /// Names of the groups covered by the selection, sorted
    pub covered_groups: Vec<String>,
    /// Per-person weights after the selection was applied, in row order
    pub person_weights: Vec<f64>,
    /// Per-group weights after the selection was applied, in column order
    pub group_weights: Vec<f64>,
    /// Solved value of the fairness variable
    pub fairness: f64,
}

/// Outcome of a sweep: the rounds solved so far, ordered by budget, plus
/// the budget at which the solver gave up, if any
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Solved rounds keyed by requested budget
    pub rounds: BTreeMap<usize, RoundResult>,
    /// First budget that failed to solve; later budgets were not attempted
    pub failed_budget: Option<usize>,
}

impl SweepReport {
    /// True when every requested budget was solved
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failed_budget.is_none()
    }
}

const PROGRESS_IDLE: i64 = -1;

/// Cloneable read-only progress signal for a running sweep.
///
/// Holds a `(completed, total)` pair readable at any time without blocking.
/// Total is `-1` while no sweep is running (the idle sentinel).
#[derive(Debug, Clone)]
pub struct SweepProgress {
    inner: Arc<ProgressState>,
}

#[derive(Debug)]
struct ProgressState {
    completed: AtomicI64,
    total: AtomicI64,
}

impl Default for SweepProgress {
    fn default() -> Self {
        Self {
            inner: Arc::new(ProgressState {
                completed: AtomicI64::new(0),
                total: AtomicI64::new(PROGRESS_IDLE),
            }),
        }
    }
}

impl SweepProgress {
    fn start(&self, total: usize) {
        self.inner.completed.store(0, Ordering::SeqCst);
        self.inner.total.store(total as i64, Ordering::SeqCst);
    }

    fn advance(&self) {
        self.inner.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn reset(&self) {
        self.inner.completed.store(0, Ordering::SeqCst);
        self.inner.total.store(PROGRESS_IDLE, Ordering::SeqCst);
    }

    /// Current `(completed, total)` pair; total is `-1` when idle
    #[must_use]
    pub fn snapshot(&self) -> (i64, i64) {
        (
            self.inner.completed.load(Ordering::SeqCst),
            self.inner.total.load(Ordering::SeqCst),
        )
    }

    /// True when no sweep is running
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.inner.total.load(Ordering::SeqCst) == PROGRESS_IDLE
    }
}

/// Iterates the candidate selection across a range of budgets
#[derive(Debug)]
pub struct SweepDriver<'a> {
    membership: &'a MembershipTable,
    risk: &'a RiskTable,
    model: &'a RiskModel,
    config: SweepConfig,
    progress: SweepProgress,
}

impl<'a> SweepDriver<'a> {
    /// Create a driver over one pair of input tables and a risk model
    #[must_use]
    pub fn new(membership: &'a MembershipTable, risk: &'a RiskTable, model: &'a RiskModel) -> Self {
        Self {
            membership,
            risk,
            model,
            config: SweepConfig::default(),
            progress: SweepProgress::default(),
        }
    }

    /// Replace the sweep configuration
    #[must_use]
    pub fn with_config(mut self, config: SweepConfig) -> Self {
        self.config = config;
        self
    }

    /// A handle for polling sweep progress from another thread
    #[must_use]
    pub fn progress(&self) -> SweepProgress {
        self.progress.clone()
    }

    /// Run the sweep for every budget in `budgets`, ascending.
    ///
    /// A solver failure at some budget stops the sweep; the report then
    /// carries the rounds solved so far and the failing budget. Graph
    /// construction and risk-model errors abort with an error instead.
    pub fn run(
        &self,
        budgets: RangeInclusive<usize>,
        reference_date: NaiveDate,
    ) -> Result<SweepReport> {
        let start_time = Instant::now();
        let total = budgets.clone().count();
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let bar = if self.config.show_progress {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };
        self.progress.start(total);

        let mut report = SweepReport::default();
        for budget in budgets {
            // A fresh snapshot per budget overrides the weight updates
            // performed by the previous budget's selection.
            let mut graph =
                match OrganizationGraph::new(self.membership, self.risk, reference_date, self.model)
                {
                    Ok(graph) => graph,
                    Err(e) => {
                        bar.finish_and_clear();
                        self.progress.reset();
                        return Err(e);
                    }
                };
            let solved = {
                let selector =
                    CandidateSelector::new(&graph, budget, self.config.selector.clone());
                selector.solve(&mut rng)
            };
            let Some(selection) = solved else {
                warn!("sweep aborted: no solution for B={budget}");
                report.failed_budget = Some(budget);
                break;
            };

            let covered = graph.groups_covering(&selection.people);
            let mut covered_groups: Vec<String> = covered
                .keys()
                .map(|&group| graph.groups()[group].name.clone())
                .collect();
            covered_groups.sort();

            // Simulate "these people were tested today" so the recorded
            // weights reflect the selection.
            graph.mark_tested(&selection.people, reference_date);
            if let Err(e) = graph.recompute_weights(reference_date) {
                bar.finish_and_clear();
                self.progress.reset();
                return Err(e);
            }

            let selected_people = selection
                .people
                .iter()
                .map(|&person| graph.persons()[person].identity.key())
                .collect();
            report.rounds.insert(
                budget,
                RoundResult {
                    budget,
                    selected_people,
                    covered_groups,
                    person_weights: graph.person_weights(),
                    group_weights: graph.group_weights(),
                    fairness: selection.fairness,
                },
            );
            self.progress.advance();
            bar.inc(1);
        }
        bar.finish_and_clear();
        self.progress.reset();

        info!(
            "sweep over {total} budgets finished in {:.2?}: {} solved{}",
            start_time.elapsed(),
            report.rounds.len(),
            report
                .failed_budget
                .map_or_else(String::new, |b| format!(", failed at B={b}")),
        );
        Ok(report)
    }
}
