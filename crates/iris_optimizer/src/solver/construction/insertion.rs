use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    problem::customer::CustomerIdx,
    solver::{
        score::{SCORE_EPSILON, Score},
        solution::{route::WorkingRoute, route_id::RouteIdx, working_solution::WorkingSolution},
    },
};

/// Cheapest feasible position of a customer in a route.
#[derive(Debug, Clone)]
pub struct Insertion {
    pub route_id: RouteIdx,
    pub position: usize,
    pub customer_id: CustomerIdx,
    pub delta: Score,
    pub route: WorkingRoute,
}

impl Insertion {
    pub fn apply(self, solution: &mut WorkingSolution) {
        solution.assign(self.route_id, self.customer_id, self.route);
    }
}

/// Best position for `customer_id` in the route, `None` when every position
/// adds a hard violation.
pub fn best_insertion_in_route(
    solution: &WorkingSolution,
    route_id: RouteIdx,
    customer_id: CustomerIdx,
) -> Option<Insertion> {
    let route = solution.route(route_id);
    let customer = solution.scenario().customer(customer_id);
    let capacity = solution.scenario().vehicle(route.vehicle_id()).capacity();

    if route.load() + customer.demand() > capacity + SCORE_EPSILON {
        return None;
    }

    let mut best: Option<Insertion> = None;

    for position in 0..=route.len() {
        let candidate = solution.evaluate_route(route_id, route.with_insertion(position, customer_id));
        let delta = candidate.score() - route.score();

        if delta.hard_score > SCORE_EPSILON {
            continue;
        }

        if best.as_ref().is_none_or(|best| delta < best.delta) {
            best = Some(Insertion {
                route_id,
                position,
                customer_id,
                delta,
                route: candidate,
            });
        }
    }

    best
}

/// Cheapest feasible insertion of `customer_id` over every route. Ties go to the
/// lowest route index so the result does not depend on thread scheduling.
pub fn best_insertion(
    solution: &WorkingSolution,
    customer_id: CustomerIdx,
    parallel: bool,
) -> Option<Insertion> {
    let route_ids: Vec<RouteIdx> = solution.route_ids().collect();
    let compare = |a: &Insertion, b: &Insertion| {
        a.delta
            .cmp(&b.delta)
            .then_with(|| a.route_id.cmp(&b.route_id))
    };

    if parallel {
        route_ids
            .into_par_iter()
            .filter_map(|route_id| best_insertion_in_route(solution, route_id, customer_id))
            .min_by(compare)
    } else {
        route_ids
            .into_iter()
            .filter_map(|route_id| best_insertion_in_route(solution, route_id, customer_id))
            .min_by(compare)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::scenario::Scenario,
        solver::{objective::Objective, optimizer_params::TimeWindowMode},
        test_utils::{self, TestCustomer},
    };

    use super::*;

    fn scenario(customers: Vec<TestCustomer>, capacity: f64) -> Scenario {
        test_utils::create_scenario(
            test_utils::line_matrix(4, 10.0),
            customers,
            vec![capacity, capacity],
            (0, 480),
        )
    }

    #[test]
    fn test_insertion_between_existing_stops() {
        let scenario = scenario(
            vec![
                TestCustomer::new(1, 4.0, 0, (0, 480)),
                TestCustomer::new(3, 4.0, 0, (0, 480)),
                TestCustomer::new(2, 4.0, 0, (0, 15)),
            ],
            12.0,
        );
        let objective = Objective::new(TimeWindowMode::Soft { penalty_per_minute: 1.0 }, None);
        let mut solution =
            WorkingSolution::new(&scenario, &objective, &scenario.fleet().available_vehicle_ids());
        let route_id = RouteIdx::new(0);
        let route = solution.evaluate_route(route_id, vec![CustomerIdx::new(0), CustomerIdx::new(1)]);
        solution.replace_route(route_id, route);

        let insertion = best_insertion_in_route(&solution, route_id, CustomerIdx::new(2)).unwrap();

        // Location 2 lies between locations 1 and 3 on the line, no detour.
        assert_eq!(insertion.position, 1);
        assert_eq!(insertion.delta.soft_score, 5.0);
    }

    #[test]
    fn test_hard_window_blocks_late_positions() {
        let scenario = scenario(
            vec![
                TestCustomer::new(1, 4.0, 10, (0, 10)),
                TestCustomer::new(3, 4.0, 0, (0, 480)),
                TestCustomer::new(2, 4.0, 0, (0, 25)),
            ],
            12.0,
        );
        let objective = Objective::new(TimeWindowMode::Hard, None);
        let mut solution =
            WorkingSolution::new(&scenario, &objective, &scenario.fleet().available_vehicle_ids());
        let route_id = RouteIdx::new(0);
        let route = solution.evaluate_route(route_id, vec![CustomerIdx::new(0)]);
        solution.replace_route(route_id, route);

        // Before the first stop it makes that stop late, after it arrives at 30.
        assert!(best_insertion_in_route(&solution, route_id, CustomerIdx::new(2)).is_none());

        let insertion = best_insertion(&solution, CustomerIdx::new(2), false).unwrap();
        assert_eq!(insertion.route_id, RouteIdx::new(1));
    }

    #[test]
    fn test_capacity_blocks_insertion() {
        let scenario = scenario(
            vec![
                TestCustomer::new(1, 4.0, 0, (0, 480)),
                TestCustomer::new(3, 4.0, 0, (0, 480)),
                TestCustomer::new(2, 4.0, 0, (0, 480)),
            ],
            10.0,
        );
        let objective = Objective::new(TimeWindowMode::Hard, None);
        let mut solution =
            WorkingSolution::new(&scenario, &objective, &scenario.fleet().available_vehicle_ids());
        let route_id = RouteIdx::new(0);
        let route = solution.evaluate_route(route_id, vec![CustomerIdx::new(0), CustomerIdx::new(1)]);
        solution.replace_route(route_id, route);

        assert!(best_insertion_in_route(&solution, route_id, CustomerIdx::new(2)).is_none());
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let scenario = scenario(
            vec![
                TestCustomer::new(1, 4.0, 0, (0, 480)),
                TestCustomer::new(3, 4.0, 0, (0, 480)),
            ],
            10.0,
        );
        let objective = Objective::new(TimeWindowMode::Hard, None);
        let solution =
            WorkingSolution::new(&scenario, &objective, &scenario.fleet().available_vehicle_ids());

        let sequential = best_insertion(&solution, CustomerIdx::new(1), false).unwrap();
        let parallel = best_insertion(&solution, CustomerIdx::new(1), true).unwrap();

        assert_eq!(sequential.route_id, parallel.route_id);
        assert_eq!(sequential.position, parallel.position);
        assert_eq!(sequential.delta, parallel.delta);
    }
}
