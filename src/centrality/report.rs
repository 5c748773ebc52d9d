//! Per-run cost accounting.
//!
//! Costs are returned with the result instead of being gathered in global
//! counters, so concurrent runs never share accounting state.

use std::time::Duration;

use serde::Serialize;

use crate::centrality::schedule::{Direction, LevelStep, StepOutcome};

/// Accumulated multiply and bookkeeping time of one phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhaseCost {
    /// Total time spent in push multiplies.
    pub push: Duration,
    /// Total time spent in pull multiplies.
    pub pull: Duration,
    /// Total time of the kept result of each step; with both strategies run this
    /// is the cost of a perfect push/pull oracle.
    pub chosen: Duration,
    /// Everything that is not a multiply: accumulation, ratios, pattern copies.
    pub other: Duration,
    /// Number of multiplies executed in this phase.
    pub steps: usize,
    /// Number of steps on which push ran.
    pub push_runs: usize,
    /// Number of steps on which pull ran.
    pub pull_runs: usize,
}

impl PhaseCost {
    pub(crate) fn record<R>(&mut self, outcome: &StepOutcome<R>) {
        self.steps += 1;
        if let Some(t) = outcome.push {
            self.push += t;
            self.push_runs += 1;
        }
        if let Some(t) = outcome.pull {
            self.pull += t;
            self.pull_runs += 1;
        }
        self.chosen += outcome.chosen();
    }

    /// Records a level's multiply and bookkeeping, returning its stat line.
    pub(crate) fn record_level<R>(&mut self, step: &LevelStep<R>) -> LevelStat {
        self.record(&step.outcome);
        self.other += step.other;
        LevelStat {
            level: step.level,
            nnz: step.operand_nnz,
            direction: step.outcome.direction,
        }
    }

    /// Phase cost had every step pushed, if push ran on every step.
    pub fn all_push(&self) -> Option<Duration> {
        (self.push_runs == self.steps).then(|| self.push + self.other)
    }

    /// Phase cost had every step pulled, if pull ran on every step.
    pub fn all_pull(&self) -> Option<Duration> {
        (self.pull_runs == self.steps).then(|| self.pull + self.other)
    }

    /// Phase cost of the kept results.
    pub fn total_chosen(&self) -> Duration {
        self.chosen + self.other
    }
}

/// Size and strategy of one multiply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelStat {
    /// History level the step produced (forward) or consumed (backward).
    pub level: usize,
    /// Entries in the operand the step started from.
    pub nnz: usize,
    /// Strategy whose result was kept.
    pub direction: Direction,
}

/// Timing of every stage of one betweenness run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostReport {
    /// Validation, allocation and frontier seeding.
    pub setup: Duration,
    /// The breadth-first phase.
    pub forward: PhaseCost,
    /// Dependency allocation and freezing the path counts.
    pub backward_setup: Duration,
    /// The dependency accumulation phase.
    pub backward: PhaseCost,
    /// Final reduction into the centrality vector.
    pub wrapup: Duration,
    /// Number of history levels recorded.
    pub depth: usize,
    /// One entry per forward multiply.
    pub forward_levels: Vec<LevelStat>,
    /// One entry per backward multiply.
    pub backward_levels: Vec<LevelStat>,
}

impl CostReport {
    fn fixed(&self) -> Duration {
        self.setup + self.backward_setup + self.wrapup
    }

    /// Wall time of the run as executed.
    pub fn total_chosen(&self) -> Duration {
        self.fixed() + self.forward.total_chosen() + self.backward.total_chosen()
    }

    /// Run time with push on every step; `None` unless push ran on every step.
    pub fn total_push(&self) -> Option<Duration> {
        Some(self.fixed() + self.forward.all_push()? + self.backward.all_push()?)
    }

    /// Run time with pull on every step; `None` unless pull ran on every step.
    pub fn total_pull(&self) -> Option<Duration> {
        Some(self.fixed() + self.forward.all_pull()? + self.backward.all_pull()?)
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    /// Propagates `serde_json` serialization failures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
