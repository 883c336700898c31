use crate::{
    plan::route_schedule::RouteSchedule,
    problem::scenario::Scenario,
    solver::{optimizer_params::TimeWindowMode, score::Score, score_level::ScoreLevel},
    time::DurationExt,
};

use super::route_constraint::RouteConstraint;

/// Minutes of late arrival, a hard violation or a priced soft penalty depending
/// on the mode.
#[derive(Clone, Debug)]
pub struct TimeWindowConstraint {
    mode: TimeWindowMode,
}

impl TimeWindowConstraint {
    pub fn new(mode: TimeWindowMode) -> Self {
        TimeWindowConstraint { mode }
    }
}

impl RouteConstraint for TimeWindowConstraint {
    fn score_level(&self) -> ScoreLevel {
        match self.mode {
            TimeWindowMode::Hard => ScoreLevel::Hard,
            TimeWindowMode::Soft { .. } => ScoreLevel::Soft,
        }
    }

    fn compute_score(&self, _scenario: &Scenario, schedule: &RouteSchedule) -> Score {
        let lateness = schedule.total_lateness().as_minutes_f64();
        match self.mode {
            TimeWindowMode::Hard => Score::hard(lateness),
            TimeWindowMode::Soft { penalty_per_minute } => Score::soft(lateness * penalty_per_minute),
        }
    }
}
