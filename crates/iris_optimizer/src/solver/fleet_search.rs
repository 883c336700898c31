use std::cmp::Ordering;

use tracing::{debug, info, instrument, warn};

use crate::{
    problem::{customer::CustomerIdx, scenario::Scenario, vehicle::VehicleIdx},
    timer_debug,
};

use super::{
    construction::construct_solution::construct_solution,
    ls::local_search::LocalSearch,
    objective::Objective,
    optimizer_params::{OptimizerParams, TimeWindowMode},
    score::{Score, ScoreAnalysis},
    search_budget::SearchBudget,
    solution::working_solution::{WorkingSolution, compare_solutions},
};

/// Best solution found for one fleet size and objective.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub sequences: Vec<(VehicleIdx, Vec<CustomerIdx>)>,
    pub unassigned: Vec<CustomerIdx>,
    pub score: Score,
    pub score_analysis: ScoreAnalysis,
    pub vehicles_used: usize,
    pub travel_minutes: f64,
    pub relaxed: bool,
}

impl Candidate {
    fn from_solution(solution: WorkingSolution, relaxed: bool) -> Self {
        let score = solution.score();
        let score_analysis = solution.score_analysis();
        let vehicles_used = solution.vehicles_used();
        let travel_minutes = solution.total_travel_minutes();
        let (sequences, unassigned) = solution.into_sequences();

        Candidate {
            sequences,
            unassigned,
            score,
            score_analysis,
            vehicles_used,
            travel_minutes,
            relaxed,
        }
    }

    fn empty() -> Self {
        Candidate {
            sequences: Vec::new(),
            unassigned: Vec::new(),
            score: Score::zero(),
            score_analysis: ScoreAnalysis::default(),
            vehicles_used: 0,
            travel_minutes: 0.0,
            relaxed: false,
        }
    }

    /// Serves everybody without any hard violation.
    pub fn is_acceptable(&self) -> bool {
        self.unassigned.is_empty() && !self.score.is_failure()
    }

    fn compare(&self, other: &Candidate) -> Ordering {
        compare_solutions(
            (self.unassigned.len(), self.score, self.vehicles_used, self.travel_minutes),
            (other.unassigned.len(), other.score, other.vehicles_used, other.travel_minutes),
        )
    }
}

/// Grows the fleet from the demand lower bound up to the available-vehicle
/// ceiling, and relaxes time windows when no fleet size serves everybody.
pub struct FleetSearch<'a> {
    scenario: &'a Scenario,
    params: &'a OptimizerParams,
    local_search: LocalSearch,
    parallel: bool,
}

impl<'a> FleetSearch<'a> {
    pub fn new(scenario: &'a Scenario, params: &'a OptimizerParams, parallel: bool) -> Self {
        FleetSearch {
            scenario,
            params,
            local_search: LocalSearch::new(parallel),
            parallel,
        }
    }

    #[instrument(skip_all, level = "debug")]
    pub fn run(&self, budget: &mut SearchBudget) -> Candidate {
        if self.scenario.customers().is_empty() {
            return Candidate::empty();
        }

        let fleet = self.scenario.fleet();
        let vehicle_ids = fleet.available_vehicle_ids();
        let bound = fleet.minimum_vehicles(self.scenario.total_demand());
        let objective = Objective::new(self.params.time_windows, self.params.max_overtime);

        let mut best: Option<Candidate> = None;

        if bound.sufficient && !vehicle_ids.is_empty() {
            let first = bound.vehicles.clamp(1, vehicle_ids.len());
            for vehicles in first..=vehicle_ids.len() {
                let candidate = self.solve(&objective, &vehicle_ids[..vehicles], budget, false);
                debug!(
                    vehicles,
                    unassigned = candidate.unassigned.len(),
                    score = ?candidate.score,
                    "Fleet size evaluated"
                );

                if candidate.is_acceptable() {
                    info!(
                        vehicles,
                        used = candidate.vehicles_used,
                        "Found a plan serving every customer"
                    );
                    return candidate;
                }

                best = Some(Self::better(best, candidate));

                if budget.is_exhausted() {
                    warn!(vehicles, "Search budget exhausted during the fleet size search");
                    break;
                }
            }
        } else {
            warn!(
                demand = self.scenario.total_demand(),
                capacity = fleet.available_capacity(),
                "Demand exceeds the capacity of the available fleet"
            );
            best = Some(self.solve(&objective, &vehicle_ids, budget, false));
        }

        warn!("No fleet size serves every customer, relaxing time windows");

        // Overtime stays bounded, customers beyond the bound remain unassigned.
        // Once the budget is spent this is a single construction pass.
        let relaxed_objective = Objective::new(
            TimeWindowMode::Soft {
                penalty_per_minute: self.params.relaxation_penalty_per_minute,
            },
            self.params.max_overtime,
        );
        let relaxed = self.solve(&relaxed_objective, &vehicle_ids, budget, true);

        match best {
            // Relaxing only pays off when it serves more customers.
            Some(best) if best.unassigned.len() <= relaxed.unassigned.len() => best,
            _ => relaxed,
        }
    }

    fn solve(
        &self,
        objective: &Objective,
        vehicle_ids: &[VehicleIdx],
        budget: &mut SearchBudget,
        relaxed: bool,
    ) -> Candidate {
        let mut solution = timer_debug!(
            "Construction",
            construct_solution(self.scenario, objective, vehicle_ids, self.parallel, budget)
        );

        timer_debug!(
            "Local search",
            self.local_search.intensify(&mut solution, budget)
        );

        Candidate::from_solution(solution, relaxed)
    }

    fn better(best: Option<Candidate>, candidate: Candidate) -> Candidate {
        match best {
            Some(best) if best.compare(&candidate).is_le() => best,
            _ => candidate,
        }
    }
}
