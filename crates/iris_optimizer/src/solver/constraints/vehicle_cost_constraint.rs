use crate::{
    plan::route_schedule::RouteSchedule,
    problem::scenario::Scenario,
    solver::{score::Score, score_level::ScoreLevel},
};

use super::route_constraint::RouteConstraint;

/// Fixed dispatch cost of every vehicle that leaves the depot.
#[derive(Clone, Debug)]
pub struct VehicleCostConstraint;

const SCORE_LEVEL: ScoreLevel = ScoreLevel::Soft;

impl RouteConstraint for VehicleCostConstraint {
    fn score_level(&self) -> ScoreLevel {
        SCORE_LEVEL
    }

    fn compute_score(&self, scenario: &Scenario, schedule: &RouteSchedule) -> Score {
        if schedule.is_empty() {
            Score::zero()
        } else {
            Score::of(SCORE_LEVEL, scenario.costs().fixed_vehicle_cost)
        }
    }
}
