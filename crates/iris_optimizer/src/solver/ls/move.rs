use crate::solver::{
    score::Score,
    solution::{
        route::WorkingRoute,
        route_id::RouteIdx,
        working_solution::{RouteUpdate, WorkingSolution},
    },
};

use super::{
    relocate::RelocateOperator, swap::SwapOperator, two_opt::TwoOptOperator,
    two_opt_star::TwoOptStarOperator,
};

pub trait LocalSearchOperator {
    /// Customer sequences of the routes the move rewrites.
    fn route_updates(&self, solution: &WorkingSolution) -> Vec<RouteUpdate>;

    /// Quick rejection before the routes are re-evaluated.
    fn is_valid(&self, _solution: &WorkingSolution) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub enum LocalSearchMove {
    /// Moves one customer to another position, in the same route or another one.
    Relocate(RelocateOperator),
    /// Exchanges two customers, in the same route or across two routes.
    Swap(SwapOperator),
    /// Reverses a segment of a route.
    TwoOpt(TwoOptOperator),
    /// Exchanges the tails of two routes.
    TwoOptStar(TwoOptStarOperator),
}

impl LocalSearchMove {
    pub fn operator_name(&self) -> &'static str {
        match self {
            LocalSearchMove::Relocate(_) => "Relocate",
            LocalSearchMove::Swap(_) => "Swap",
            LocalSearchMove::TwoOpt(_) => "Two-Opt",
            LocalSearchMove::TwoOptStar(_) => "Two-Opt*",
        }
    }

    fn operator(&self) -> &dyn LocalSearchOperator {
        match self {
            LocalSearchMove::Relocate(op) => op,
            LocalSearchMove::Swap(op) => op,
            LocalSearchMove::TwoOpt(op) => op,
            LocalSearchMove::TwoOptStar(op) => op,
        }
    }

    pub fn evaluate(self, solution: &WorkingSolution) -> Option<EvaluatedMove> {
        if !self.operator().is_valid(solution) {
            return None;
        }

        let (delta, routes) = solution.evaluate_updates(self.operator().route_updates(solution));

        Some(EvaluatedMove {
            operator: self,
            delta,
            routes,
        })
    }
}

/// A move together with its score delta and the re-evaluated routes.
#[derive(Debug, Clone)]
pub struct EvaluatedMove {
    pub operator: LocalSearchMove,
    pub delta: Score,
    pub routes: Vec<(RouteIdx, WorkingRoute)>,
}

impl EvaluatedMove {
    pub fn apply(self, solution: &mut WorkingSolution) {
        for (route_id, route) in self.routes {
            solution.replace_route(route_id, route);
        }
    }
}
