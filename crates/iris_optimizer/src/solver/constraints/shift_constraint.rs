use jiff::SignedDuration;

use crate::{
    plan::route_schedule::RouteSchedule,
    problem::scenario::Scenario,
    solver::{score::Score, score_level::ScoreLevel},
    time::{DurationExt, positive_part},
};

use super::route_constraint::RouteConstraint;

/// Prices overtime at the scenario's overtime rate. Overtime past
/// `max_overtime` is additionally a hard violation.
#[derive(Clone, Debug)]
pub struct ShiftConstraint {
    max_overtime: Option<SignedDuration>,
}

impl ShiftConstraint {
    pub fn new(max_overtime: Option<SignedDuration>) -> Self {
        ShiftConstraint { max_overtime }
    }
}

impl RouteConstraint for ShiftConstraint {
    fn score_level(&self) -> ScoreLevel {
        ScoreLevel::Soft
    }

    fn compute_score(&self, scenario: &Scenario, schedule: &RouteSchedule) -> Score {
        let overtime = schedule.overtime();
        let excess = match self.max_overtime {
            Some(max_overtime) => positive_part(overtime - max_overtime).as_minutes_f64(),
            None => 0.0,
        };

        Score::new(excess, scenario.costs().overtime_cost(overtime))
    }
}
