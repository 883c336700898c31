use crate::{
    plan::route_schedule::RouteSchedule,
    problem::scenario::Scenario,
    solver::{score::Score, score_level::ScoreLevel},
};

use super::{
    capacity_constraint::CapacityConstraint, shift_constraint::ShiftConstraint,
    time_window_constraint::TimeWindowConstraint,
    transport_cost_constraint::TransportCostConstraint,
    vehicle_cost_constraint::VehicleCostConstraint,
};

pub trait RouteConstraint {
    fn score_level(&self) -> ScoreLevel;
    fn compute_score(&self, scenario: &Scenario, schedule: &RouteSchedule) -> Score;
}

#[derive(Clone, Debug)]
pub enum RouteConstraintType {
    Capacity(CapacityConstraint),
    TimeWindow(TimeWindowConstraint),
    Shift(ShiftConstraint),
    TransportCost(TransportCostConstraint),
    VehicleCost(VehicleCostConstraint),
}

impl RouteConstraintType {
    pub fn constraint_name(&self) -> &'static str {
        match self {
            RouteConstraintType::Capacity(_) => "capacity",
            RouteConstraintType::TimeWindow(_) => "time_window",
            RouteConstraintType::Shift(_) => "shift",
            RouteConstraintType::TransportCost(_) => "transport_cost",
            RouteConstraintType::VehicleCost(_) => "vehicle_cost",
        }
    }
}

impl RouteConstraint for RouteConstraintType {
    fn score_level(&self) -> ScoreLevel {
        match self {
            RouteConstraintType::Capacity(c) => c.score_level(),
            RouteConstraintType::TimeWindow(c) => c.score_level(),
            RouteConstraintType::Shift(c) => c.score_level(),
            RouteConstraintType::TransportCost(c) => c.score_level(),
            RouteConstraintType::VehicleCost(c) => c.score_level(),
        }
    }

    fn compute_score(&self, scenario: &Scenario, schedule: &RouteSchedule) -> Score {
        match self {
            RouteConstraintType::Capacity(c) => c.compute_score(scenario, schedule),
            RouteConstraintType::TimeWindow(c) => c.compute_score(scenario, schedule),
            RouteConstraintType::Shift(c) => c.compute_score(scenario, schedule),
            RouteConstraintType::TransportCost(c) => c.compute_score(scenario, schedule),
            RouteConstraintType::VehicleCost(c) => c.compute_score(scenario, schedule),
        }
    }
}
