use crate::solver::{
    score::SCORE_EPSILON,
    solution::{
        route_id::RouteIdx,
        working_solution::{RouteUpdate, WorkingSolution},
    },
};

use super::r#move::LocalSearchOperator;

/// Cuts both routes and exchanges their tails: the first route keeps
/// `[..first_position]` and continues with the second route's
/// `[second_position..]`, and the other way around.
#[derive(Debug, Clone)]
pub struct TwoOptStarOperator {
    pub first_route: RouteIdx,
    pub first_position: usize,
    pub second_route: RouteIdx,
    pub second_position: usize,
}

impl TwoOptStarOperator {
    pub fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(TwoOptStarOperator),
    {
        if r1 >= r2 {
            return;
        }

        let first = solution.route(r1);
        let second = solution.route(r2);
        if first.is_empty() && second.is_empty() {
            return;
        }

        for first_position in 0..=first.len() {
            for second_position in 0..=second.len() {
                let keeps_everything = first_position == 0 && second_position == 0
                    || first_position == first.len() && second_position == second.len();
                if keeps_everything {
                    continue;
                }

                consumer(TwoOptStarOperator {
                    first_route: r1,
                    first_position,
                    second_route: r2,
                    second_position,
                });
            }
        }
    }

    fn tail_demand(solution: &WorkingSolution, route_id: RouteIdx, position: usize) -> f64 {
        let scenario = solution.scenario();
        solution.route(route_id).customers()[position..]
            .iter()
            .map(|&customer_id| scenario.customer(customer_id).demand())
            .sum()
    }
}

impl LocalSearchOperator for TwoOptStarOperator {
    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        let scenario = solution.scenario();
        let first = solution.route(self.first_route);
        let second = solution.route(self.second_route);
        let first_tail = Self::tail_demand(solution, self.first_route, self.first_position);
        let second_tail = Self::tail_demand(solution, self.second_route, self.second_position);

        first.load() - first_tail + second_tail
            <= scenario.vehicle(first.vehicle_id()).capacity() + SCORE_EPSILON
            && second.load() - second_tail + first_tail
                <= scenario.vehicle(second.vehicle_id()).capacity() + SCORE_EPSILON
    }

    fn route_updates(&self, solution: &WorkingSolution) -> Vec<RouteUpdate> {
        let first = solution.route(self.first_route).customers();
        let second = solution.route(self.second_route).customers();

        let mut new_first = first[..self.first_position].to_vec();
        new_first.extend_from_slice(&second[self.second_position..]);

        let mut new_second = second[..self.second_position].to_vec();
        new_second.extend_from_slice(&first[self.first_position..]);

        vec![
            (self.first_route, new_first),
            (self.second_route, new_second),
        ]
    }
}
