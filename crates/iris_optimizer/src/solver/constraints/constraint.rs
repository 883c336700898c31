use crate::{
    plan::route_schedule::RouteSchedule,
    problem::scenario::Scenario,
    solver::{score::Score, score_level::ScoreLevel, solution::working_solution::WorkingSolution},
};

use super::{
    global_constraint::{GlobalConstraint, GlobalConstraintType},
    route_constraint::{RouteConstraint, RouteConstraintType},
};

#[derive(Clone, Debug)]
pub enum Constraint {
    Global(GlobalConstraintType),
    Route(RouteConstraintType),
}

impl Constraint {
    pub fn score_level(&self) -> ScoreLevel {
        match self {
            Constraint::Global(constraint) => constraint.score_level(),
            Constraint::Route(constraint) => constraint.score_level(),
        }
    }

    /// Route constraints score a single route, global constraints contribute nothing here.
    pub fn compute_route_score(&self, scenario: &Scenario, schedule: &RouteSchedule) -> Score {
        match self {
            Constraint::Global(_) => Score::zero(),
            Constraint::Route(constraint) => constraint.compute_score(scenario, schedule),
        }
    }

    pub fn compute_score(&self, scenario: &Scenario, solution: &WorkingSolution) -> Score {
        match self {
            Constraint::Global(constraint) => constraint.compute_score(solution),
            Constraint::Route(constraint) => solution
                .non_empty_routes_iter()
                .fold(Score::zero(), |acc, route| {
                    acc + constraint.compute_score(scenario, route.schedule())
                }),
        }
    }

    pub fn constraint_name(&self) -> &'static str {
        match self {
            Constraint::Global(c) => c.constraint_name(),
            Constraint::Route(c) => c.constraint_name(),
        }
    }
}
