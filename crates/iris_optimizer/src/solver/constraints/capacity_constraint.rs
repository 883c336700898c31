use crate::{
    plan::route_schedule::RouteSchedule,
    problem::scenario::Scenario,
    solver::{score::Score, score_level::ScoreLevel},
};

use super::route_constraint::RouteConstraint;

/// Load carried beyond the vehicle capacity.
#[derive(Clone, Debug)]
pub struct CapacityConstraint;

const SCORE_LEVEL: ScoreLevel = ScoreLevel::Hard;

impl RouteConstraint for CapacityConstraint {
    fn score_level(&self) -> ScoreLevel {
        SCORE_LEVEL
    }

    fn compute_score(&self, scenario: &Scenario, schedule: &RouteSchedule) -> Score {
        let capacity = scenario.vehicle(schedule.vehicle_id()).capacity();
        Score::of(SCORE_LEVEL, (schedule.load() - capacity).max(0.0))
    }
}
