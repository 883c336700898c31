use std::cmp::Ordering;

use crate::{
    problem::{customer::CustomerIdx, scenario::Scenario, vehicle::VehicleIdx},
    solver::{
        objective::Objective,
        score::{SCORE_EPSILON, Score, ScoreAnalysis},
    },
};

use super::{route::WorkingRoute, route_id::RouteIdx};

/// New customer sequence for a route, produced by a move or an insertion.
pub type RouteUpdate = (RouteIdx, Vec<CustomerIdx>);

/// Mutable solution the construction and local search operate on. One route per
/// vehicle the search is allowed to use, routes may be empty.
#[derive(Clone)]
pub struct WorkingSolution<'a> {
    scenario: &'a Scenario,
    objective: &'a Objective,
    routes: Vec<WorkingRoute>,
    unassigned: Vec<CustomerIdx>,
}

impl<'a> WorkingSolution<'a> {
    pub fn new(scenario: &'a Scenario, objective: &'a Objective, vehicle_ids: &[VehicleIdx]) -> Self {
        let routes = vehicle_ids
            .iter()
            .map(|&vehicle_id| WorkingRoute::new(scenario, objective, vehicle_id, Vec::new()))
            .collect();

        WorkingSolution {
            scenario,
            objective,
            routes,
            unassigned: scenario.customer_ids().collect(),
        }
    }

    pub fn scenario(&self) -> &'a Scenario {
        self.scenario
    }

    pub fn objective(&self) -> &'a Objective {
        self.objective
    }

    pub fn routes(&self) -> &[WorkingRoute] {
        &self.routes
    }

    #[inline]
    pub fn route(&self, route_id: RouteIdx) -> &WorkingRoute {
        &self.routes[route_id]
    }

    pub fn route_ids(&self) -> impl Iterator<Item = RouteIdx> + use<> {
        (0..self.routes.len()).map(RouteIdx::new)
    }

    pub fn non_empty_routes_iter(&self) -> impl Iterator<Item = &WorkingRoute> {
        self.routes.iter().filter(|route| !route.is_empty())
    }

    /// Customers not served by any route, in index order.
    pub fn unassigned(&self) -> &[CustomerIdx] {
        &self.unassigned
    }

    pub fn evaluate_route(&self, route_id: RouteIdx, customers: Vec<CustomerIdx>) -> WorkingRoute {
        WorkingRoute::new(
            self.scenario,
            self.objective,
            self.route(route_id).vehicle_id(),
            customers,
        )
    }

    /// Score change of replacing the given routes, with the evaluated routes.
    pub fn evaluate_updates(&self, updates: Vec<RouteUpdate>) -> (Score, Vec<(RouteIdx, WorkingRoute)>) {
        let mut delta = Score::zero();
        let routes = updates
            .into_iter()
            .map(|(route_id, customers)| {
                let route = self.evaluate_route(route_id, customers);
                delta += route.score() - self.route(route_id).score();
                (route_id, route)
            })
            .collect();

        (delta, routes)
    }

    /// Replaces a route whose customer set is unchanged or moved between routes.
    pub fn replace_route(&mut self, route_id: RouteIdx, route: WorkingRoute) {
        self.routes[route_id] = route;
    }

    /// Replaces a route that now also serves `customer_id`.
    pub fn assign(&mut self, route_id: RouteIdx, customer_id: CustomerIdx, route: WorkingRoute) {
        if let Ok(position) = self.unassigned.binary_search(&customer_id) {
            self.unassigned.remove(position);
        }
        self.routes[route_id] = route;
    }

    pub fn score(&self) -> Score {
        self.routes.iter().map(WorkingRoute::score).sum::<Score>() + self.objective.global_score(self)
    }

    pub fn score_analysis(&self) -> ScoreAnalysis {
        self.objective.analyze(self)
    }

    pub fn vehicles_used(&self) -> usize {
        self.non_empty_routes_iter().count()
    }

    pub fn total_travel_minutes(&self) -> f64 {
        self.routes
            .iter()
            .map(|route| route.schedule().travel_minutes())
            .sum()
    }

    /// Unassigned count first, then score, then fewer vehicles, then less travel.
    pub fn compare(&self, other: &WorkingSolution) -> Ordering {
        compare_solutions(
            (self.unassigned.len(), self.score(), self.vehicles_used(), self.total_travel_minutes()),
            (other.unassigned.len(), other.score(), other.vehicles_used(), other.total_travel_minutes()),
        )
    }

    pub fn into_sequences(self) -> (Vec<(VehicleIdx, Vec<CustomerIdx>)>, Vec<CustomerIdx>) {
        let sequences = self
            .routes
            .into_iter()
            .map(|route| (route.vehicle_id(), route.customers().to_vec()))
            .collect();

        (sequences, self.unassigned)
    }
}

/// Orders `(unassigned, score, vehicles used, travel minutes)` tuples, scores
/// closer than the score tolerance count as ties.
pub fn compare_solutions(
    (unassigned_a, score_a, vehicles_a, travel_a): (usize, Score, usize, f64),
    (unassigned_b, score_b, vehicles_b, travel_b): (usize, Score, usize, f64),
) -> Ordering {
    unassigned_a
        .cmp(&unassigned_b)
        .then_with(|| compare_with_tolerance(score_a.hard_score, score_b.hard_score))
        .then_with(|| compare_with_tolerance(score_a.soft_score, score_b.soft_score))
        .then_with(|| vehicles_a.cmp(&vehicles_b))
        .then_with(|| travel_a.total_cmp(&travel_b))
}

fn compare_with_tolerance(a: f64, b: f64) -> Ordering {
    if (a - b).abs() <= SCORE_EPSILON {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        solver::optimizer_params::TimeWindowMode,
        test_utils::{self, TestCustomer},
    };

    use super::*;

    #[test]
    fn test_new_solution_leaves_everything_unassigned() {
        let scenario = test_utils::create_scenario(
            test_utils::line_matrix(3, 10.0),
            vec![
                TestCustomer::new(1, 1.0, 0, (0, 480)),
                TestCustomer::new(2, 1.0, 0, (0, 480)),
            ],
            vec![10.0, 10.0],
            (0, 480),
        );
        let objective = Objective::new(TimeWindowMode::Hard, None);
        let vehicle_ids = scenario.fleet().available_vehicle_ids();

        let solution = WorkingSolution::new(&scenario, &objective, &vehicle_ids);

        assert_eq!(solution.routes().len(), 2);
        assert_eq!(solution.unassigned().len(), 2);
        assert_eq!(solution.score(), Score::hard(2.0));
    }

    #[test]
    fn test_assign_updates_unassigned_and_score() {
        let scenario = test_utils::create_scenario(
            test_utils::line_matrix(3, 10.0),
            vec![
                TestCustomer::new(1, 1.0, 0, (0, 480)),
                TestCustomer::new(2, 1.0, 0, (0, 480)),
            ],
            vec![10.0],
            (0, 480),
        );
        let objective = Objective::new(TimeWindowMode::Hard, None);
        let mut solution =
            WorkingSolution::new(&scenario, &objective, &scenario.fleet().available_vehicle_ids());

        let route_id = RouteIdx::new(0);
        let route = solution.evaluate_route(route_id, vec![CustomerIdx::new(1)]);
        solution.assign(route_id, CustomerIdx::new(1), route);

        assert_eq!(solution.unassigned(), &[CustomerIdx::new(0)]);
        assert_eq!(solution.vehicles_used(), 1);
        // one unassigned, fixed 150 + 40 minutes of travel
        assert_eq!(solution.score(), Score::new(1.0, 190.0));
    }

    #[test]
    fn test_fewer_vehicles_break_score_ties() {
        let a = (0, Score::new(0.0, 100.0), 2, 50.0);
        let b = (0, Score::new(0.0, 100.0 + 1e-9), 3, 40.0);

        assert_eq!(compare_solutions(a, b), Ordering::Less);
        assert_eq!(
            compare_solutions((0, Score::new(0.0, 100.0), 2, 50.0), (0, Score::new(0.0, 100.0), 2, 40.0)),
            Ordering::Greater
        );
    }
}
