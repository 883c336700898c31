use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::Serialize;

use crate::problem::{
    customer::CustomerIdx,
    scenario::Scenario,
    vehicle::VehicleIdx,
};

use super::{plan_error::PlanError, route_schedule::RouteSchedule};

const CAPACITY_TOLERANCE: f64 = 1e-9;

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct PlannedStop {
    pub customer_id: CustomerIdx,
    pub customer_external_id: String,
    pub planned_arrival: SignedDuration,
    pub service_start: SignedDuration,
    pub departure: SignedDuration,
    pub lateness: SignedDuration,
}

/// Depot, then `stops` in order, then depot again.
#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct VehicleRoute {
    pub vehicle_id: VehicleIdx,
    pub vehicle_external_id: String,
    pub stops: Vec<PlannedStop>,
    pub departure: SignedDuration,
    pub planned_return: SignedDuration,
    pub load: f64,
    pub travel_time: SignedDuration,
    pub overtime: SignedDuration,
}

impl VehicleRoute {
    pub fn customer_ids(&self) -> impl Iterator<Item = CustomerIdx> + '_ {
        self.stops.iter().map(|stop| stop.customer_id)
    }
}

/// Assignment of customers to vehicles with a visiting order per vehicle.
///
/// Only used vehicles carry a route. Customers that could not be placed are
/// enumerated in `unassigned`.
#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct RoutePlan {
    routes: Vec<VehicleRoute>,
    unassigned: Vec<CustomerIdx>,
}

impl RoutePlan {
    /// Builds the planned timing of every non-empty sequence.
    ///
    /// Indices are trusted here, `validate` checks them against the scenario.
    pub fn from_sequences(
        scenario: &Scenario,
        sequences: Vec<(VehicleIdx, Vec<CustomerIdx>)>,
        mut unassigned: Vec<CustomerIdx>,
    ) -> Self {
        let routes = sequences
            .into_iter()
            .filter(|(_, customers)| !customers.is_empty())
            .map(|(vehicle_id, customers)| {
                let schedule = RouteSchedule::compute(scenario, vehicle_id, &customers);
                Self::vehicle_route(scenario, &customers, &schedule)
            })
            .collect();

        unassigned.sort_unstable();

        RoutePlan { routes, unassigned }
    }

    fn vehicle_route(
        scenario: &Scenario,
        customers: &[CustomerIdx],
        schedule: &RouteSchedule,
    ) -> VehicleRoute {
        let stops = customers
            .iter()
            .zip(schedule.stops())
            .map(|(&customer_id, stop)| PlannedStop {
                customer_id,
                customer_external_id: scenario.customer(customer_id).external_id().to_owned(),
                planned_arrival: stop.arrival,
                service_start: stop.service_start,
                departure: stop.departure,
                lateness: stop.lateness,
            })
            .collect();

        VehicleRoute {
            vehicle_id: schedule.vehicle_id(),
            vehicle_external_id: scenario
                .vehicle(schedule.vehicle_id())
                .external_id()
                .to_owned(),
            stops,
            departure: schedule.departure(),
            planned_return: schedule.return_time(),
            load: schedule.load(),
            travel_time: schedule.travel_time(),
            overtime: schedule.overtime(),
        }
    }

    pub fn routes(&self) -> &[VehicleRoute] {
        &self.routes
    }

    pub fn unassigned(&self) -> &[CustomerIdx] {
        &self.unassigned
    }

    pub fn vehicles_used(&self) -> usize {
        self.routes.len()
    }

    pub fn total_travel_time(&self) -> SignedDuration {
        self.routes
            .iter()
            .fold(SignedDuration::ZERO, |acc, route| acc + route.travel_time)
    }

    pub fn total_overtime(&self) -> SignedDuration {
        self.routes
            .iter()
            .fold(SignedDuration::ZERO, |acc, route| acc + route.overtime)
    }

    pub fn served_demand(&self) -> f64 {
        self.routes.iter().map(|route| route.load).sum()
    }

    /// Checks that every customer is either routed exactly once or listed as
    /// unassigned, and that no route exceeds its vehicle capacity.
    pub fn validate(&self, scenario: &Scenario) -> Result<(), PlanError> {
        let num_vehicles = scenario.fleet().len();
        let num_customers = scenario.customers().len();
        let mut vehicle_seen = vec![false; num_vehicles];
        let mut customer_seen = vec![false; num_customers];

        let mut visit = |customer_id: CustomerIdx| -> Result<(), PlanError> {
            let seen = customer_seen
                .get_mut(customer_id.get())
                .ok_or(PlanError::UnknownCustomer(customer_id))?;
            if *seen {
                return Err(PlanError::DuplicateCustomer(customer_id));
            }
            *seen = true;
            Ok(())
        };

        for route in &self.routes {
            let used = vehicle_seen
                .get_mut(route.vehicle_id.get())
                .ok_or(PlanError::UnknownVehicle(route.vehicle_id))?;
            if *used {
                return Err(PlanError::DuplicateVehicle(route.vehicle_id));
            }
            *used = true;

            let mut load = 0.0;
            for customer_id in route.customer_ids() {
                visit(customer_id)?;
                load += scenario.customer(customer_id).demand();
            }

            let capacity = scenario.vehicle(route.vehicle_id).capacity();
            if load > capacity + CAPACITY_TOLERANCE {
                return Err(PlanError::CapacityExceeded {
                    vehicle_id: route.vehicle_id,
                    load,
                    capacity,
                });
            }
        }

        for &customer_id in &self.unassigned {
            visit(customer_id)?;
        }

        match customer_seen.iter().position(|&seen| !seen) {
            Some(missing) => Err(PlanError::MissingCustomer(CustomerIdx::new(missing))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{self, TestCustomer};

    use super::*;

    fn scenario() -> Scenario {
        test_utils::create_scenario(
            test_utils::line_matrix(4, 10.0),
            vec![
                TestCustomer::new(1, 6.0, 5, (0, 480)),
                TestCustomer::new(2, 6.0, 5, (0, 480)),
                TestCustomer::new(3, 6.0, 5, (0, 480)),
            ],
            vec![12.0, 12.0],
            (0, 480),
        )
    }

    fn ids(ids: &[usize]) -> Vec<CustomerIdx> {
        ids.iter().copied().map(CustomerIdx::new).collect()
    }

    #[test]
    fn test_from_sequences_skips_empty_routes() {
        let scenario = scenario();
        let plan = RoutePlan::from_sequences(
            &scenario,
            vec![
                (VehicleIdx::new(0), ids(&[0, 1])),
                (VehicleIdx::new(1), vec![]),
            ],
            ids(&[2]),
        );

        assert_eq!(plan.vehicles_used(), 1);
        assert_eq!(plan.routes()[0].stops[1].planned_arrival, SignedDuration::from_mins(25));
        assert_eq!(plan.served_demand(), 12.0);
        assert_eq!(plan.validate(&scenario), Ok(()));
    }

    #[test]
    fn test_validate_detects_duplicates() {
        let scenario = scenario();
        let plan = RoutePlan::from_sequences(
            &scenario,
            vec![
                (VehicleIdx::new(0), ids(&[0])),
                (VehicleIdx::new(1), ids(&[0, 2])),
            ],
            ids(&[1]),
        );

        assert_eq!(
            plan.validate(&scenario),
            Err(PlanError::DuplicateCustomer(CustomerIdx::new(0)))
        );
    }

    #[test]
    fn test_validate_detects_missing_customer() {
        let scenario = scenario();
        let plan = RoutePlan::from_sequences(&scenario, vec![(VehicleIdx::new(0), ids(&[0, 1]))], vec![]);

        assert_eq!(
            plan.validate(&scenario),
            Err(PlanError::MissingCustomer(CustomerIdx::new(2)))
        );
    }

    #[test]
    fn test_validate_detects_capacity_excess() {
        let scenario = scenario();
        let plan = RoutePlan::from_sequences(
            &scenario,
            vec![(VehicleIdx::new(0), ids(&[0, 1, 2]))],
            vec![],
        );

        assert_eq!(
            plan.validate(&scenario),
            Err(PlanError::CapacityExceeded {
                vehicle_id: VehicleIdx::new(0),
                load: 18.0,
                capacity: 12.0
            })
        );
    }
}
