use rayon::ThreadPoolBuilder;
use tracing::{info, instrument, warn};

use crate::{
    plan::{fleet_utilization::FleetUtilization, route_plan::RoutePlan},
    problem::scenario::Scenario,
};

use super::{
    fleet_search::FleetSearch,
    optimization_result::{Coverage, OptimizationResult, SearchStatus, Violation},
    optimizer_params::{OptimizerParams, Threads},
    search_budget::SearchBudget,
};

/// Plans routes for a scenario. Never fails: infeasibility, relaxations and
/// budget exhaustion are reported in the [`OptimizationResult`].
pub struct RouteOptimizer {
    params: OptimizerParams,
}

impl RouteOptimizer {
    pub fn new(params: OptimizerParams) -> Self {
        RouteOptimizer { params }
    }

    pub fn params(&self) -> &OptimizerParams {
        &self.params
    }

    #[instrument(skip_all, level = "debug", fields(scenario = scenario.id()))]
    pub fn optimize(&self, scenario: &Scenario) -> OptimizationResult {
        match &self.params.search_threads {
            Threads::Single => self.run(scenario, false),
            threads => {
                let num_threads = threads.number_of_threads();
                match ThreadPoolBuilder::new().num_threads(num_threads).build() {
                    Ok(pool) => pool.install(|| self.run(scenario, num_threads > 1)),
                    Err(error) => {
                        warn!(
                            %error,
                            "Could not build the search thread pool, searching on the current thread"
                        );
                        self.run(scenario, false)
                    }
                }
            }
        }
    }

    fn run(&self, scenario: &Scenario, parallel: bool) -> OptimizationResult {
        let mut budget = SearchBudget::new(&self.params.terminations);
        let candidate = FleetSearch::new(scenario, &self.params, parallel).run(&mut budget);

        let plan = RoutePlan::from_sequences(scenario, candidate.sequences, candidate.unassigned);
        let coverage = Coverage::from_plan(scenario, &plan);
        let violations = Violation::from_plan(&plan);
        let utilization = FleetUtilization::from_plan(scenario, &plan);
        let status = if budget.was_exhausted() {
            warn!(
                iterations = budget.iterations(),
                "Search budget exhausted, returning the best plan found"
            );
            SearchStatus::BudgetExhausted
        } else {
            SearchStatus::Completed
        };

        info!(
            vehicles = plan.vehicles_used(),
            unassigned = plan.unassigned().len(),
            violations = violations.len(),
            relaxed = candidate.relaxed,
            score = ?candidate.score,
            "Optimization finished"
        );

        OptimizationResult {
            plan,
            status,
            relaxed: candidate.relaxed,
            coverage,
            violations,
            score: candidate.score,
            score_analysis: candidate.score_analysis,
            utilization,
            iterations: budget.iterations(),
            duration: budget.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use crate::{
        problem::vehicle::VehicleIdx,
        solver::optimizer_params::Termination,
        test_utils::{self, TestCustomer},
    };

    use super::*;

    #[test]
    fn test_empty_scenario_yields_empty_plan() {
        let scenario = test_utils::create_scenario(
            test_utils::line_matrix(1, 10.0),
            vec![],
            vec![10.0],
            (0, 480),
        );

        let result = RouteOptimizer::new(OptimizerParams::default()).optimize(&scenario);

        assert!(result.plan.routes().is_empty());
        assert!(result.coverage.is_complete());
        assert_eq!(result.status, SearchStatus::Completed);
    }

    #[test]
    fn test_overtime_within_bound_is_reported() {
        // A single customer 150 minutes away on a 4 hour shift.
        let scenario = test_utils::create_scenario(
            test_utils::line_matrix(2, 150.0),
            vec![TestCustomer::new(1, 1.0, 0, (0, 480))],
            vec![10.0],
            (0, 240),
        );

        let result = RouteOptimizer::new(OptimizerParams::default()).optimize(&scenario);

        assert!(result.coverage.is_complete());
        assert!(!result.relaxed);
        assert_eq!(
            result.violations,
            vec![Violation::Overtime {
                vehicle_id: VehicleIdx::new(0),
                vehicle_external_id: String::from("vehicle-0"),
                overtime: SignedDuration::from_mins(60),
            }]
        );
    }

    #[test]
    fn test_multi_threaded_search_matches_single() {
        let points = [(0.0, 0.0), (5.0, 5.0), (-5.0, 5.0), (5.0, -5.0), (-5.0, -5.0), (8.0, 0.0)];
        let scenario = test_utils::create_scenario(
            test_utils::euclidean_matrix(&points),
            (1..points.len())
                .map(|location| TestCustomer::new(location, 3.0, 5, (0, 480)))
                .collect(),
            vec![9.0, 9.0],
            (0, 480),
        );

        let single = RouteOptimizer::new(OptimizerParams {
            terminations: vec![Termination::Iterations(500)],
            ..OptimizerParams::default()
        })
        .optimize(&scenario);
        let multi = RouteOptimizer::new(OptimizerParams {
            terminations: vec![Termination::Iterations(500)],
            search_threads: Threads::Multi(2),
            ..OptimizerParams::default()
        })
        .optimize(&scenario);

        assert_eq!(single.plan, multi.plan);
    }
}
