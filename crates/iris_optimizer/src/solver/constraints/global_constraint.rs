use crate::solver::{
    score::Score, score_level::ScoreLevel, solution::working_solution::WorkingSolution,
};

use super::unassigned_customer_constraint::UnassignedCustomerConstraint;

pub trait GlobalConstraint {
    fn score_level(&self) -> ScoreLevel;
    fn compute_score(&self, solution: &WorkingSolution) -> Score;
}

#[derive(Clone, Debug)]
pub enum GlobalConstraintType {
    UnassignedCustomer(UnassignedCustomerConstraint),
}

impl GlobalConstraintType {
    pub fn constraint_name(&self) -> &'static str {
        match self {
            Self::UnassignedCustomer(_) => "unassigned_customer",
        }
    }
}

impl GlobalConstraint for GlobalConstraintType {
    fn score_level(&self) -> ScoreLevel {
        match self {
            Self::UnassignedCustomer(constraint) => constraint.score_level(),
        }
    }

    fn compute_score(&self, solution: &WorkingSolution) -> Score {
        match self {
            Self::UnassignedCustomer(constraint) => constraint.compute_score(solution),
        }
    }
}
