use tracing::{debug, instrument};

use crate::{
    problem::{scenario::Scenario, vehicle::VehicleIdx},
    solver::{
        objective::Objective,
        search_budget::SearchBudget,
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    },
};

use super::insertion::{best_insertion, best_insertion_in_route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionStrategy {
    /// Seeds every route with a far-apart customer, then inserts the remaining
    /// customers at their cheapest position, tightest window first.
    Urgency,
    /// Places the largest demands first into the first route that accepts them.
    DemandDescending,
}

impl ConstructionStrategy {
    pub const ALL: [ConstructionStrategy; 2] = [
        ConstructionStrategy::Urgency,
        ConstructionStrategy::DemandDescending,
    ];

    pub fn strategy_name(&self) -> &'static str {
        match self {
            ConstructionStrategy::Urgency => "urgency",
            ConstructionStrategy::DemandDescending => "demand_descending",
        }
    }
}

/// Builds one solution per strategy and keeps the best. Strategies after the
/// first are skipped once the budget is spent.
#[instrument(skip_all, level = "debug")]
pub fn construct_solution<'a>(
    scenario: &'a Scenario,
    objective: &'a Objective,
    vehicle_ids: &[VehicleIdx],
    parallel: bool,
    budget: &mut SearchBudget,
) -> WorkingSolution<'a> {
    let mut best: Option<WorkingSolution<'a>> = None;

    for strategy in ConstructionStrategy::ALL {
        if best.is_some() && (budget.is_past_deadline() || budget.was_exhausted()) {
            break;
        }

        let solution =
            construct_with_strategy(scenario, objective, vehicle_ids, strategy, parallel, budget);
        debug!(
            strategy = strategy.strategy_name(),
            unassigned = solution.unassigned().len(),
            score = ?solution.score(),
            "Constructed solution"
        );

        if best
            .as_ref()
            .is_none_or(|best| solution.compare(best).is_lt())
        {
            best = Some(solution);
        }
    }

    best.unwrap_or_else(|| WorkingSolution::new(scenario, objective, vehicle_ids))
}

/// Inserts customers one at a time. Customers still waiting when the deadline
/// passes stay unassigned.
pub fn construct_with_strategy<'a>(
    scenario: &'a Scenario,
    objective: &'a Objective,
    vehicle_ids: &[VehicleIdx],
    strategy: ConstructionStrategy,
    parallel: bool,
    budget: &mut SearchBudget,
) -> WorkingSolution<'a> {
    let mut solution = WorkingSolution::new(scenario, objective, vehicle_ids);

    match strategy {
        ConstructionStrategy::Urgency => {
            seed_routes(&mut solution, budget);

            let mut customers = solution.unassigned().to_vec();
            customers.sort_by_key(|&customer_id| {
                let window = scenario.customer(customer_id).time_window();
                (window.latest(), window.earliest(), customer_id)
            });

            for customer_id in customers {
                if budget.is_past_deadline() {
                    debug!("Urgency construction stopped by the deadline");
                    break;
                }
                if let Some(insertion) = best_insertion(&solution, customer_id, parallel) {
                    insertion.apply(&mut solution);
                }
            }
        }
        ConstructionStrategy::DemandDescending => {
            let mut customers = solution.unassigned().to_vec();
            customers.sort_by(|&a, &b| {
                scenario
                    .customer(b)
                    .demand()
                    .total_cmp(&scenario.customer(a).demand())
                    .then_with(|| a.cmp(&b))
            });

            for customer_id in customers {
                if budget.is_past_deadline() {
                    debug!("Demand construction stopped by the deadline");
                    break;
                }
                let insertion = solution
                    .route_ids()
                    .find_map(|route_id| best_insertion_in_route(&solution, route_id, customer_id));
                if let Some(insertion) = insertion {
                    insertion.apply(&mut solution);
                }
            }
        }
    }

    solution
}

/// Opens every route with the customer farthest from the depot and from the
/// seeds already placed.
fn seed_routes(solution: &mut WorkingSolution, budget: &mut SearchBudget) {
    let scenario = solution.scenario();
    let depot = scenario.depot_location_id();
    let mut anchors = vec![depot];

    for route_id in solution.route_ids().collect::<Vec<RouteIdx>>() {
        if budget.is_past_deadline() {
            break;
        }

        let seed = solution
            .unassigned()
            .iter()
            .copied()
            .filter_map(|customer_id| {
                let location = scenario.customer(customer_id).location_id();
                let distance = anchors
                    .iter()
                    .map(|&anchor| scenario.travel_minutes(anchor, location))
                    .fold(f64::INFINITY, f64::min);
                best_insertion_in_route(solution, route_id, customer_id)
                    .map(|insertion| (distance, customer_id, insertion))
            })
            .max_by(|(a, a_id, _), (b, b_id, _)| a.total_cmp(b).then_with(|| b_id.cmp(a_id)));

        let Some((_, customer_id, insertion)) = seed else {
            break;
        };

        anchors.push(scenario.customer(customer_id).location_id());
        insertion.apply(solution);
    }
}
