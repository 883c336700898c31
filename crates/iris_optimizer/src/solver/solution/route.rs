use crate::{
    plan::route_schedule::RouteSchedule,
    problem::{customer::CustomerIdx, scenario::Scenario, vehicle::VehicleIdx},
    solver::{objective::Objective, score::Score},
};

/// A vehicle's customer sequence with its schedule and score kept in sync.
#[derive(Debug, Clone)]
pub struct WorkingRoute {
    customers: Vec<CustomerIdx>,
    schedule: RouteSchedule,
    score: Score,
}

impl WorkingRoute {
    pub fn new(
        scenario: &Scenario,
        objective: &Objective,
        vehicle_id: VehicleIdx,
        customers: Vec<CustomerIdx>,
    ) -> Self {
        let schedule = RouteSchedule::compute(scenario, vehicle_id, &customers);
        let score = objective.route_score(scenario, &schedule);

        WorkingRoute {
            customers,
            schedule,
            score,
        }
    }

    pub fn vehicle_id(&self) -> VehicleIdx {
        self.schedule.vehicle_id()
    }

    pub fn customers(&self) -> &[CustomerIdx] {
        &self.customers
    }

    #[inline]
    pub fn customer(&self, position: usize) -> CustomerIdx {
        self.customers[position]
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn schedule(&self) -> &RouteSchedule {
        &self.schedule
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn load(&self) -> f64 {
        self.schedule.load()
    }

    pub fn with_insertion(&self, position: usize, customer_id: CustomerIdx) -> Vec<CustomerIdx> {
        let mut customers = Vec::with_capacity(self.customers.len() + 1);
        customers.extend_from_slice(&self.customers[..position]);
        customers.push(customer_id);
        customers.extend_from_slice(&self.customers[position..]);
        customers
    }
}
