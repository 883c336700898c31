use crate::solver::{
    score::SCORE_EPSILON,
    solution::{
        route_id::RouteIdx,
        working_solution::{RouteUpdate, WorkingSolution},
    },
};

use super::r#move::LocalSearchOperator;

/// Moves the customer at `from_position` of `from_route` so that it ends up at
/// `to_position` of `to_route`.
///
/// For intra-route moves `to_position` indexes the route after removal.
#[derive(Debug, Clone)]
pub struct RelocateOperator {
    pub from_route: RouteIdx,
    pub from_position: usize,
    pub to_route: RouteIdx,
    pub to_position: usize,
}

impl RelocateOperator {
    pub fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(RelocateOperator),
    {
        let from = solution.route(r1);

        if r1 == r2 {
            for from_position in 0..from.len() {
                for to_position in 0..from.len() {
                    if to_position == from_position {
                        continue;
                    }
                    consumer(RelocateOperator {
                        from_route: r1,
                        from_position,
                        to_route: r2,
                        to_position,
                    });
                }
            }
        } else {
            let to = solution.route(r2);
            for from_position in 0..from.len() {
                for to_position in 0..=to.len() {
                    consumer(RelocateOperator {
                        from_route: r1,
                        from_position,
                        to_route: r2,
                        to_position,
                    });
                }
            }
        }
    }
}

impl LocalSearchOperator for RelocateOperator {
    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        if self.from_route == self.to_route {
            return true;
        }

        let scenario = solution.scenario();
        let to = solution.route(self.to_route);
        let customer = solution.route(self.from_route).customer(self.from_position);

        to.load() + scenario.customer(customer).demand()
            <= scenario.vehicle(to.vehicle_id()).capacity() + SCORE_EPSILON
    }

    fn route_updates(&self, solution: &WorkingSolution) -> Vec<RouteUpdate> {
        let mut from = solution.route(self.from_route).customers().to_vec();
        let customer = from.remove(self.from_position);

        if self.from_route == self.to_route {
            from.insert(self.to_position, customer);
            return vec![(self.from_route, from)];
        }

        let mut to = solution.route(self.to_route).customers().to_vec();
        to.insert(self.to_position, customer);

        vec![(self.from_route, from), (self.to_route, to)]
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
    fn test_intra_relocate_fixes_detour() {
        let scenario = test_utils::create_scenario(
            test_utils::line_matrix(4, 10.0),
            vec![
                TestCustomer::new(1, 1.0, 0, (0, 480)),
                TestCustomer::new(2, 1.0, 0, (0, 480)),
                TestCustomer::new(3, 1.0, 0, (0, 480)),
            ],
            vec![10.0],
            (0, 480),
        );
        let objective = Objective::new(TimeWindowMode::Hard, None);
        let mut solution =
            WorkingSolution::new(&scenario, &objective, &scenario.fleet().available_vehicle_ids());
        let route_id = RouteIdx::new(0);
        // 3 -> 1 -> 2 travels 30 + 20 + 10 + 20
        let route = solution.evaluate_route(
            route_id,
            vec![CustomerIdx::new(2), CustomerIdx::new(0), CustomerIdx::new(1)],
        );
        solution.replace_route(route_id, route);

        let operator = RelocateOperator {
            from_route: route_id,
            from_position: 0,
            to_route: route_id,
            to_position: 2,
        };
        let updates = operator.route_updates(&solution);
        let (delta, _) = solution.evaluate_updates(updates.clone());

        assert_eq!(
            updates[0].1,
            vec![CustomerIdx::new(0), CustomerIdx::new(1), CustomerIdx::new(2)]
        );
        assert_eq!(delta.soft_score, -20.0);
    }

    #[test]
    fn test_inter_relocate_respects_capacity() {
        let scenario = test_utils::create_scenario(
            test_utils::line_matrix(3, 10.0),
            vec![
                TestCustomer::new(1, 6.0, 0, (0, 480)),
                TestCustomer::new(2, 6.0, 0, (0, 480)),
            ],
            vec![10.0, 10.0],
            (0, 480),
        );
        let objective = Objective::new(TimeWindowMode::Hard, None);
        let mut solution =
            WorkingSolution::new(&scenario, &objective, &scenario.fleet().available_vehicle_ids());
        for (route, customer) in [(0, 0), (1, 1)] {
            let route_id = RouteIdx::new(route);
            let route = solution.evaluate_route(route_id, vec![CustomerIdx::new(customer)]);
            solution.replace_route(route_id, route);
        }

        let mut moves = 0;
        RelocateOperator::generate_moves(&solution, (RouteIdx::new(0), RouteIdx::new(1)), |op| {
            moves += 1;
            assert!(!op.is_valid(&solution));
        });

        assert_eq!(moves, 2);
    }
}
