use crate::solver::{
    score::Score, score_level::ScoreLevel, solution::working_solution::WorkingSolution,
};

use super::global_constraint::GlobalConstraint;

#[derive(Clone, Debug)]
pub struct UnassignedCustomerConstraint;

const SCORE_LEVEL: ScoreLevel = ScoreLevel::Hard;

impl GlobalConstraint for UnassignedCustomerConstraint {
    fn score_level(&self) -> ScoreLevel {
        SCORE_LEVEL
    }

    fn compute_score(&self, solution: &WorkingSolution) -> Score {
        Score::of(SCORE_LEVEL, solution.unassigned().len() as f64)
    }
}
