//! Push/pull strategy selection for each sparse multiply.
//!
//! Push scatters from the entries of the operand (saxpy form); pull gathers into
//! the rows the mask allows (dot form). They compute the same matrix, with costs
//! that depend on how the frontier compares to the unvisited region, so the
//! choice is a policy, not a correctness concern.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::BcError;

/// Scatter strategy: walk the stored entries and push along their edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Push;

/// Gather strategy: walk the admissible output rows and pull along their edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pull;

/// Which strategy produced a step's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Saxpy / scatter.
    Push,
    /// Dot / gather.
    Pull,
}

/// Run-time policy deciding which strategy each multiply uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schedule {
    /// Always push.
    Push,
    /// Always pull.
    Pull,
    /// Run both, time both, keep the faster result.
    ///
    /// Costs of both strategies are recorded for every step, which is what the
    /// push/pull/pushpull totals of [`CostReport`](crate::CostReport) are built from.
    Compare,
    /// Push while the frontier is small relative to the unvisited region.
    #[default]
    Heuristic,
}

impl Schedule {
    /// Resolves the policy for one step.
    ///
    /// `push_work` and `pull_work` are the caller's estimates of the edges each
    /// strategy would touch; `ratio` biases the heuristic toward push (`> 1`) or
    /// pull (`< 1`).
    pub(crate) fn plan(self, push_work: f64, pull_work: f64, ratio: f64) -> Plan {
        match self {
            Self::Push => Plan::Only(Direction::Push),
            Self::Pull => Plan::Only(Direction::Pull),
            Self::Compare => Plan::Both,
            Self::Heuristic => {
                if push_work <= ratio * pull_work {
                    Plan::Only(Direction::Push)
                } else {
                    Plan::Only(Direction::Pull)
                }
            }
        }
    }
}

/// What to execute for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Plan {
    Only(Direction),
    Both,
}

/// The kept result of a step together with what it cost.
pub(crate) struct StepOutcome<R> {
    pub(crate) result: R,
    pub(crate) direction: Direction,
    pub(crate) push: Option<Duration>,
    pub(crate) pull: Option<Duration>,
}

impl<R> StepOutcome<R> {
    /// Time of the kept result.
    pub(crate) fn chosen(&self) -> Duration {
        match self.direction {
            Direction::Push => self.push.unwrap_or_default(),
            Direction::Pull => self.pull.unwrap_or_default(),
        }
    }

    /// Replaces the kept result, keeping the timings.
    pub(crate) fn map<S>(self, f: impl FnOnce(R) -> S) -> StepOutcome<S> {
        StepOutcome {
            result: f(self.result),
            direction: self.direction,
            push: self.push,
            pull: self.pull,
        }
    }
}

/// One executed level of either phase.
pub(crate) struct LevelStep<R> {
    /// History level produced (forward) or consumed (backward).
    pub(crate) level: usize,
    /// Entries in the operand the multiply started from.
    pub(crate) operand_nnz: usize,
    pub(crate) outcome: StepOutcome<R>,
    /// Bookkeeping around the multiply.
    pub(crate) other: Duration,
}

/// Executes a plan. With [`Plan::Both`], pull runs first, then push; the faster
/// result is kept and the two are checked for equality in debug builds.
///
/// # Errors
/// Returns the first error either strategy reports.
pub(crate) fn execute<R, P, Q>(plan: Plan, push: P, pull: Q) -> Result<StepOutcome<R>, BcError>
where
    R: PartialEq + core::fmt::Debug,
    P: FnOnce() -> Result<R, BcError>,
    Q: FnOnce() -> Result<R, BcError>,
{
    let outcome = match plan {
        Plan::Only(Direction::Push) => {
            let (result, t) = timed(push);
            StepOutcome {
                result: result?,
                direction: Direction::Push,
                push: Some(t),
                pull: None,
            }
        }
        Plan::Only(Direction::Pull) => {
            let (result, t) = timed(pull);
            StepOutcome {
                result: result?,
                direction: Direction::Pull,
                push: None,
                pull: Some(t),
            }
        }
        Plan::Both => {
            let (pulled, pull_t) = timed(pull);
            let pulled = pulled?;
            let (pushed, push_t) = timed(push);
            let pushed = pushed?;
            debug_assert_eq!(pushed, pulled, "push and pull disagree");
            let (result, direction) = if push_t < pull_t {
                (pushed, Direction::Push)
            } else {
                (pulled, Direction::Pull)
            };
            StepOutcome {
                result,
                direction,
                push: Some(push_t),
                pull: Some(pull_t),
            }
        }
    };
    Ok(outcome)
}

fn timed<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let r = f();
    (r, start.elapsed())
}
