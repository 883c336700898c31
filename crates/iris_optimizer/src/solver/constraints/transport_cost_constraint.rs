use crate::{
    plan::route_schedule::RouteSchedule,
    problem::scenario::Scenario,
    solver::{score::Score, score_level::ScoreLevel},
};

use super::route_constraint::RouteConstraint;

#[derive(Clone, Debug)]
pub struct TransportCostConstraint;

const SCORE_LEVEL: ScoreLevel = ScoreLevel::Soft;

impl RouteConstraint for TransportCostConstraint {
    fn score_level(&self) -> ScoreLevel {
        SCORE_LEVEL
    }

    fn compute_score(&self, scenario: &Scenario, schedule: &RouteSchedule) -> Score {
        Score::of(
            SCORE_LEVEL,
            scenario.costs().travel_cost(schedule.travel_time()),
        )
    }
}
