use jiff::SignedDuration;

use crate::{
    problem::{
        customer::CustomerIdx,
        scenario::Scenario,
        vehicle::VehicleIdx,
    },
    time::DurationExt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledStop {
    pub arrival: SignedDuration,
    pub service_start: SignedDuration,
    pub departure: SignedDuration,
    pub lateness: SignedDuration,
}

/// Clear-weather timing of a vehicle visiting `customers` in order, leaving the
/// depot at shift start and returning to it after the last stop.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSchedule {
    vehicle_id: VehicleIdx,
    stops: Vec<ScheduledStop>,
    departure: SignedDuration,
    return_time: SignedDuration,
    load: f64,
    travel_time: SignedDuration,
    total_lateness: SignedDuration,
    overtime: SignedDuration,
}

impl RouteSchedule {
    pub fn compute(scenario: &Scenario, vehicle_id: VehicleIdx, customers: &[CustomerIdx]) -> Self {
        let vehicle = scenario.vehicle(vehicle_id);
        let depot = scenario.depot_location_id();
        let departure = vehicle.shift().start();

        if customers.is_empty() {
            return RouteSchedule {
                vehicle_id,
                stops: Vec::new(),
                departure,
                return_time: departure,
                load: 0.0,
                travel_time: SignedDuration::ZERO,
                total_lateness: SignedDuration::ZERO,
                overtime: SignedDuration::ZERO,
            };
        }

        let mut stops = Vec::with_capacity(customers.len());
        let mut load = 0.0;
        let mut travel_time = SignedDuration::ZERO;
        let mut total_lateness = SignedDuration::ZERO;
        let mut current_location = depot;
        let mut clock = departure;

        for &customer_id in customers {
            let customer = scenario.customer(customer_id);
            let travel = scenario.travel_time(current_location, customer.location_id());

            let arrival = clock + travel;
            let time_window = customer.time_window();
            let service_start = time_window.service_start(arrival);
            let lateness = time_window.lateness(arrival);
            let stop_departure = service_start + customer.service_duration();

            stops.push(ScheduledStop {
                arrival,
                service_start,
                departure: stop_departure,
                lateness,
            });

            load += customer.demand();
            travel_time += travel;
            total_lateness += lateness;
            current_location = customer.location_id();
            clock = stop_departure;
        }

        let travel_back = scenario.travel_time(current_location, depot);
        travel_time += travel_back;
        let return_time = clock + travel_back;

        RouteSchedule {
            vehicle_id,
            stops,
            departure,
            return_time,
            load,
            travel_time,
            total_lateness,
            overtime: vehicle.shift().overtime(return_time),
        }
    }

    pub fn vehicle_id(&self) -> VehicleIdx {
        self.vehicle_id
    }

    pub fn stops(&self) -> &[ScheduledStop] {
        &self.stops
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn departure(&self) -> SignedDuration {
        self.departure
    }

    pub fn return_time(&self) -> SignedDuration {
        self.return_time
    }

    pub fn load(&self) -> f64 {
        self.load
    }

    pub fn travel_time(&self) -> SignedDuration {
        self.travel_time
    }

    pub fn travel_minutes(&self) -> f64 {
        self.travel_time.as_minutes_f64()
    }

    pub fn total_lateness(&self) -> SignedDuration {
        self.total_lateness
    }

    pub fn overtime(&self) -> SignedDuration {
        self.overtime
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{self, TestCustomer};

    use super::*;

    #[test]
    fn test_schedule_waits_for_window_and_returns_to_depot() {
        // depot(0) --10-- c0(1) --10-- c1(2)
        let scenario = test_utils::create_scenario(
            test_utils::line_matrix(3, 10.0),
            vec![
                TestCustomer::new(1, 5.0, 5, (30, 120)),
                TestCustomer::new(2, 3.0, 5, (0, 60)),
            ],
            vec![20.0],
            (0, 480),
        );

        let schedule = RouteSchedule::compute(
            &scenario,
            VehicleIdx::new(0),
            &[CustomerIdx::new(0), CustomerIdx::new(1)],
        );

        assert_eq!(schedule.stops()[0].arrival, SignedDuration::from_mins(10));
        assert_eq!(schedule.stops()[0].service_start, SignedDuration::from_mins(30));
        assert_eq!(schedule.stops()[0].departure, SignedDuration::from_mins(35));
        assert_eq!(schedule.stops()[1].arrival, SignedDuration::from_mins(45));
        assert_eq!(schedule.return_time(), SignedDuration::from_mins(70));
        assert_eq!(schedule.travel_time(), SignedDuration::from_mins(40));
        assert_eq!(schedule.load(), 8.0);
        assert_eq!(schedule.total_lateness(), SignedDuration::ZERO);
        assert_eq!(schedule.overtime(), SignedDuration::ZERO);
    }

    #[test]
    fn test_schedule_records_lateness_and_overtime() {
        let scenario = test_utils::create_scenario(
            test_utils::line_matrix(3, 30.0),
            vec![
                TestCustomer::new(2, 1.0, 0, (0, 40)),
                TestCustomer::new(1, 1.0, 0, (0, 480)),
            ],
            vec![20.0],
            (0, 100),
        );

        let schedule = RouteSchedule::compute(
            &scenario,
            VehicleIdx::new(0),
            &[CustomerIdx::new(0), CustomerIdx::new(1)],
        );

        assert_eq!(schedule.stops()[0].lateness, SignedDuration::from_mins(20));
        assert_eq!(schedule.return_time(), SignedDuration::from_mins(120));
        assert_eq!(schedule.overtime(), SignedDuration::from_mins(20));
    }

    #[test]
    fn test_empty_schedule() {
        let scenario = test_utils::create_scenario(
            test_utils::line_matrix(2, 10.0),
            vec![TestCustomer::new(1, 1.0, 0, (0, 60))],
            vec![20.0],
            (60, 480),
        );

        let schedule = RouteSchedule::compute(&scenario, VehicleIdx::new(0), &[]);

        assert!(schedule.is_empty());
        assert_eq!(schedule.return_time(), SignedDuration::from_mins(60));
        assert_eq!(schedule.travel_time(), SignedDuration::ZERO);
    }
}
