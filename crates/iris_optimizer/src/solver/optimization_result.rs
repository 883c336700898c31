use jiff::SignedDuration;
use serde::Serialize;

use crate::{
    plan::{fleet_utilization::FleetUtilization, route_plan::RoutePlan},
    problem::{customer::CustomerIdx, scenario::Scenario, vehicle::VehicleIdx},
};

use super::score::{Score, ScoreAnalysis};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// The search reached a local optimum within its budget.
    Completed,
    /// The budget ran out, the plan is the best incumbent found so far.
    BudgetExhausted,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UnservedCustomer {
    pub customer_id: CustomerIdx,
    pub customer_external_id: String,
    pub demand: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Coverage {
    Complete,
    /// Customers no vehicle could take, even with every relaxation applied.
    Infeasible {
        unserved: Vec<UnservedCustomer>,
        unmet_demand: f64,
    },
}

impl Coverage {
    pub fn from_plan(scenario: &Scenario, plan: &RoutePlan) -> Self {
        if plan.unassigned().is_empty() {
            return Coverage::Complete;
        }

        let unserved: Vec<UnservedCustomer> = plan
            .unassigned()
            .iter()
            .map(|&customer_id| {
                let customer = scenario.customer(customer_id);
                UnservedCustomer {
                    customer_id,
                    customer_external_id: customer.external_id().to_owned(),
                    demand: customer.demand(),
                }
            })
            .collect();
        let unmet_demand = unserved.iter().map(|customer| customer.demand).sum();

        Coverage::Infeasible {
            unserved,
            unmet_demand,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Coverage::Complete)
    }
}

/// Planned breach of a nominal constraint, accepted to keep every customer served.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Violation {
    LateArrival {
        vehicle_id: VehicleIdx,
        customer_id: CustomerIdx,
        customer_external_id: String,
        lateness: SignedDuration,
    },
    Overtime {
        vehicle_id: VehicleIdx,
        vehicle_external_id: String,
        overtime: SignedDuration,
    },
}

impl Violation {
    pub fn from_plan(plan: &RoutePlan) -> Vec<Violation> {
        let mut violations = Vec::new();

        for route in plan.routes() {
            for stop in &route.stops {
                if stop.lateness.is_positive() {
                    violations.push(Violation::LateArrival {
                        vehicle_id: route.vehicle_id,
                        customer_id: stop.customer_id,
                        customer_external_id: stop.customer_external_id.clone(),
                        lateness: stop.lateness,
                    });
                }
            }

            if route.overtime.is_positive() {
                violations.push(Violation::Overtime {
                    vehicle_id: route.vehicle_id,
                    vehicle_external_id: route.vehicle_external_id.clone(),
                    overtime: route.overtime,
                });
            }
        }

        violations
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct OptimizationResult {
    pub plan: RoutePlan,
    pub status: SearchStatus,
    /// Whether time windows had to be softened to serve more customers.
    pub relaxed: bool,
    pub coverage: Coverage,
    pub violations: Vec<Violation>,
    pub score: Score,
    pub score_analysis: ScoreAnalysis,
    pub utilization: FleetUtilization,
    pub iterations: usize,
    pub duration: SignedDuration,
}

impl OptimizationResult {
    pub fn is_feasible(&self) -> bool {
        self.coverage.is_complete() && self.violations.is_empty()
    }
}
