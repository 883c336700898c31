use jiff::SignedDuration;

use crate::problem::{
    costs::CostParams,
    customer::CustomerBuilder,
    distance_matrix::DistanceMatrix,
    scenario::Scenario,
    time_window::TimeWindow,
    vehicle::{VehicleBuilder, VehicleShift},
};

pub struct TestCustomer {
    pub location_id: usize,
    pub demand: f64,
    pub service_minutes: i64,
    pub window: (i64, i64),
}

impl TestCustomer {
    pub fn new(location_id: usize, demand: f64, service_minutes: i64, window: (i64, i64)) -> Self {
        TestCustomer {
            location_id,
            demand,
            service_minutes,
            window,
        }
    }
}

/// Locations evenly spaced on a line, location 0 being the depot.
pub fn line_matrix(num_locations: usize, step_minutes: f64) -> DistanceMatrix {
    let rows = (0..num_locations)
        .map(|from| {
            (0..num_locations)
                .map(|to| from.abs_diff(to) as f64 * step_minutes)
                .collect()
        })
        .collect();

    DistanceMatrix::from_rows(rows).unwrap()
}

/// Locations on the grid `points`, travel time is the euclidean distance in minutes.
pub fn euclidean_matrix(points: &[(f64, f64)]) -> DistanceMatrix {
    let rows = points
        .iter()
        .map(|&(x1, y1)| {
            points
                .iter()
                .map(|&(x2, y2)| ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt())
                .collect()
        })
        .collect();

    DistanceMatrix::from_rows(rows).unwrap()
}

pub fn create_scenario(
    distance_matrix: DistanceMatrix,
    customers: Vec<TestCustomer>,
    capacities: Vec<f64>,
    shift: (i64, i64),
) -> Scenario {
    create_scenario_with_costs(
        distance_matrix,
        customers,
        capacities,
        shift,
        CostParams::default(),
    )
}

pub fn create_scenario_with_costs(
    distance_matrix: DistanceMatrix,
    customers: Vec<TestCustomer>,
    capacities: Vec<f64>,
    shift: (i64, i64),
    costs: CostParams,
) -> Scenario {
    let mut builder = Scenario::builder();
    builder
        .set_id(String::from("test"))
        .set_depot_location_id(0)
        .set_distance_matrix(distance_matrix)
        .set_costs(costs);

    for (index, test_customer) in customers.into_iter().enumerate() {
        let mut customer = CustomerBuilder::default();
        customer
            .set_external_id(format!("customer-{index}"))
            .set_location_id(test_customer.location_id)
            .set_demand(test_customer.demand)
            .set_service_duration(SignedDuration::from_mins(test_customer.service_minutes))
            .set_time_window(TimeWindow::from_mins(
                test_customer.window.0,
                test_customer.window.1,
            ));
        builder.add_customer(customer.build().unwrap());
    }

    for (index, capacity) in capacities.into_iter().enumerate() {
        let mut vehicle = VehicleBuilder::default();
        vehicle
            .set_vehicle_id(format!("vehicle-{index}"))
            .set_capacity(capacity)
            .set_vehicle_shift(VehicleShift::new(
                SignedDuration::from_mins(shift.0),
                SignedDuration::from_mins(shift.1),
            ));
        builder.add_vehicle(vehicle.build().unwrap());
    }

    builder.build().unwrap()
}
