use jiff::SignedDuration;

use crate::{plan::route_schedule::RouteSchedule, problem::scenario::Scenario};

use super::{
    constraints::{
        capacity_constraint::CapacityConstraint,
        constraint::Constraint,
        global_constraint::GlobalConstraintType,
        route_constraint::RouteConstraintType,
        shift_constraint::ShiftConstraint,
        time_window_constraint::TimeWindowConstraint,
        transport_cost_constraint::TransportCostConstraint,
        unassigned_customer_constraint::UnassignedCustomerConstraint,
        vehicle_cost_constraint::VehicleCostConstraint,
    },
    optimizer_params::TimeWindowMode,
    score::{Score, ScoreAnalysis},
    solution::working_solution::WorkingSolution,
};

/// Weighted objective minimized by the search: fixed vehicle cost, travel cost and
/// overtime cost, with capacity, time windows and unserved customers as
/// constraints.
#[derive(Clone, Debug)]
pub struct Objective {
    constraints: Vec<Constraint>,
    time_windows: TimeWindowMode,
}

impl Objective {
    pub fn new(time_windows: TimeWindowMode, max_overtime: Option<SignedDuration>) -> Self {
        let constraints = vec![
            Constraint::Global(GlobalConstraintType::UnassignedCustomer(
                UnassignedCustomerConstraint,
            )),
            Constraint::Route(RouteConstraintType::Capacity(CapacityConstraint)),
            Constraint::Route(RouteConstraintType::TimeWindow(TimeWindowConstraint::new(
                time_windows,
            ))),
            Constraint::Route(RouteConstraintType::Shift(ShiftConstraint::new(
                max_overtime,
            ))),
            Constraint::Route(RouteConstraintType::TransportCost(TransportCostConstraint)),
            Constraint::Route(RouteConstraintType::VehicleCost(VehicleCostConstraint)),
        ];

        Objective {
            constraints,
            time_windows,
        }
    }

    pub fn time_windows(&self) -> TimeWindowMode {
        self.time_windows
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn route_score(&self, scenario: &Scenario, schedule: &RouteSchedule) -> Score {
        self.constraints
            .iter()
            .map(|constraint| constraint.compute_route_score(scenario, schedule))
            .sum()
    }

    pub fn global_score(&self, solution: &WorkingSolution) -> Score {
        self.constraints
            .iter()
            .filter(|constraint| matches!(constraint, Constraint::Global(_)))
            .map(|constraint| constraint.compute_score(solution.scenario(), solution))
            .sum()
    }

    pub fn analyze(&self, solution: &WorkingSolution) -> ScoreAnalysis {
        let mut analysis = ScoreAnalysis::default();
        for constraint in &self.constraints {
            let score = constraint.compute_score(solution.scenario(), solution);
            *analysis
                .scores
                .entry(constraint.constraint_name())
                .or_insert(Score::zero()) += score;
        }
        analysis
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{customer::CustomerIdx, vehicle::VehicleIdx},
        test_utils::{self, TestCustomer},
    };

    use super::*;

    fn late_scenario() -> Scenario {
        // Second stop is reached at 60 but closes at 40.
        test_utils::create_scenario(
            test_utils::line_matrix(3, 30.0),
            vec![
                TestCustomer::new(1, 1.0, 0, (0, 480)),
                TestCustomer::new(2, 1.0, 0, (0, 40)),
            ],
            vec![10.0],
            (0, 480),
        )
    }

    fn schedule(scenario: &Scenario) -> RouteSchedule {
        RouteSchedule::compute(
            scenario,
            VehicleIdx::new(0),
            &[CustomerIdx::new(0), CustomerIdx::new(1)],
        )
    }

    #[test]
    fn test_hard_windows_count_late_minutes_as_hard_score() {
        let scenario = late_scenario();
        let objective = Objective::new(TimeWindowMode::Hard, None);

        let score = objective.route_score(&scenario, &schedule(&scenario));

        // fixed 150 + travel 120 minutes
        assert_eq!(score, Score::new(20.0, 270.0));
    }

    #[test]
    fn test_soft_windows_price_lateness() {
        let scenario = late_scenario();
        let objective = Objective::new(
            TimeWindowMode::Soft {
                penalty_per_minute: 3.0,
            },
            None,
        );

        let score = objective.route_score(&scenario, &schedule(&scenario));

        assert_eq!(score, Score::new(0.0, 270.0 + 60.0));
    }

    #[test]
    fn test_overtime_beyond_bound_is_hard() {
        let scenario = test_utils::create_scenario(
            test_utils::line_matrix(2, 50.0),
            vec![TestCustomer::new(1, 1.0, 0, (0, 480))],
            vec![10.0],
            (0, 60),
        );
        let schedule = RouteSchedule::compute(&scenario, VehicleIdx::new(0), &[CustomerIdx::new(0)]);

        let bounded = Objective::new(TimeWindowMode::Hard, Some(SignedDuration::from_mins(30)));
        let unbounded = Objective::new(TimeWindowMode::Hard, None);

        // 40 minutes of overtime at 2.5
        assert_eq!(
            bounded.route_score(&scenario, &schedule),
            Score::new(10.0, 150.0 + 100.0 + 100.0)
        );
        assert_eq!(
            unbounded.route_score(&scenario, &schedule),
            Score::new(0.0, 150.0 + 100.0 + 100.0)
        );
    }
}
