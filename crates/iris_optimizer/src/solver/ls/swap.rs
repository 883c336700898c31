use crate::solver::{
    score::SCORE_EPSILON,
    solution::{
        route_id::RouteIdx,
        working_solution::{RouteUpdate, WorkingSolution},
    },
};

use super::r#move::LocalSearchOperator;

/// Exchanges the customer at `first_position` of `first_route` with the one at
/// `second_position` of `second_route`.
#[derive(Debug, Clone)]
pub struct SwapOperator {
    pub first_route: RouteIdx,
    pub first_position: usize,
    pub second_route: RouteIdx,
    pub second_position: usize,
}

impl SwapOperator {
    pub fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(SwapOperator),
    {
        let first = solution.route(r1);

        if r1 == r2 {
            for first_position in 0..first.len() {
                for second_position in (first_position + 1)..first.len() {
                    consumer(SwapOperator {
                        first_route: r1,
                        first_position,
                        second_route: r2,
                        second_position,
                    });
                }
            }
        } else if r1 < r2 {
            let second = solution.route(r2);
            for first_position in 0..first.len() {
                for second_position in 0..second.len() {
                    consumer(SwapOperator {
                        first_route: r1,
                        first_position,
                        second_route: r2,
                        second_position,
                    });
                }
            }
        }
    }
}

impl LocalSearchOperator for SwapOperator {
    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        if self.first_route == self.second_route {
            return true;
        }

        let scenario = solution.scenario();
        let first = solution.route(self.first_route);
        let second = solution.route(self.second_route);
        let first_demand = scenario.customer(first.customer(self.first_position)).demand();
        let second_demand = scenario.customer(second.customer(self.second_position)).demand();

        first.load() - first_demand + second_demand
            <= scenario.vehicle(first.vehicle_id()).capacity() + SCORE_EPSILON
            && second.load() - second_demand + first_demand
                <= scenario.vehicle(second.vehicle_id()).capacity() + SCORE_EPSILON
    }

    fn route_updates(&self, solution: &WorkingSolution) -> Vec<RouteUpdate> {
        if self.first_route == self.second_route {
            let mut customers = solution.route(self.first_route).customers().to_vec();
            customers.swap(self.first_position, self.second_position);
            return vec![(self.first_route, customers)];
        }

        let mut first = solution.route(self.first_route).customers().to_vec();
        let mut second = solution.route(self.second_route).customers().to_vec();
        std::mem::swap(
            &mut first[self.first_position],
            &mut second[self.second_position],
        );

        vec![(self.first_route, first), (self.second_route, second)]
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::customer::CustomerIdx,
        solver::{objective::Objective, optimizer_params::TimeWindowMode},
        test_utils::{self, TestCustomer},
    };

    use super::*;

    #[test]
    fn test_inter_swap_exchanges_customers() {
        let scenario = test_utils::create_scenario(
            test_utils::line_matrix(5, 10.0),
            vec![
                TestCustomer::new(1, 1.0, 0, (0, 480)),
                TestCustomer::new(4, 1.0, 0, (0, 480)),
                TestCustomer::new(2, 1.0, 0, (0, 480)),
                TestCustomer::new(3, 1.0, 0, (0, 480)),
            ],
            vec![10.0, 10.0],
            (0, 480),
        );
        let objective = Objective::new(TimeWindowMode::Hard, None);
        let mut solution =
            WorkingSolution::new(&scenario, &objective, &scenario.fleet().available_vehicle_ids());
        for (route, customers) in [(0, [0, 1]), (1, [2, 3])] {
            let route_id = RouteIdx::new(route);
            let route = solution.evaluate_route(
                route_id,
                customers.iter().copied().map(CustomerIdx::new).collect(),
            );
            solution.replace_route(route_id, route);
        }

        let operator = SwapOperator {
            first_route: RouteIdx::new(0),
            first_position: 1,
            second_route: RouteIdx::new(1),
            second_position: 0,
        };
        let updates = operator.route_updates(&solution);
        let (delta, _) = solution.evaluate_updates(updates.clone());

        assert!(operator.is_valid(&solution));
        assert_eq!(updates[0].1, vec![CustomerIdx::new(0), CustomerIdx::new(2)]);
        assert_eq!(updates[1].1, vec![CustomerIdx::new(1), CustomerIdx::new(3)]);
        // 80 + 60 before, 40 + 80 after
        assert_eq!(delta.soft_score, -20.0);
    }
}
