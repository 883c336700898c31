use iris_optimizer::problem::{
    customer::CustomerBuilder,
    distance_matrix::DistanceMatrix,
    scenario::Scenario,
    time_window::TimeWindow,
    vehicle::{VehicleBuilder, VehicleShift},
};
use jiff::SignedDuration;
use rand::{Rng, SeedableRng, rngs::SmallRng};

pub struct TestCustomer {
    pub point: (f64, f64),
    pub demand: f64,
    pub window: (i64, i64),
}

/// Customers clustered around two hubs on either side of the depot.
pub fn two_hub_customers(count: usize, demand: f64) -> Vec<TestCustomer> {
    (0..count)
        .map(|index| {
            let hub = if index % 2 == 0 { 30.0 } else { -30.0 };
            let offset = (index / 2) as f64 * 2.0;
            TestCustomer {
                point: (hub + offset, offset - 4.0),
                demand,
                window: (0, 480),
            }
        })
        .collect()
}

/// Customers spread uniformly over a 100 x 100 square centred on the depot.
pub fn random_customers(seed: u64, count: usize) -> Vec<TestCustomer> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|_| TestCustomer {
            point: (rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0)),
            demand: rng.random_range(1..=9) as f64,
            window: (0, 1440),
        })
        .collect()
}

pub fn create_scenario(customers: Vec<TestCustomer>, capacities: &[f64], shift: (i64, i64)) -> Scenario {
    let points: Vec<(f64, f64)> = std::iter::once((0.0, 0.0))
        .chain(customers.iter().map(|customer| customer.point))
        .collect();
    let rows = points
        .iter()
        .map(|&(x1, y1)| {
            points
                .iter()
                .map(|&(x2, y2)| ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt())
                .collect()
        })
        .collect();

    let mut builder = Scenario::builder();
    builder
        .set_depot_location_id(0)
        .set_distance_matrix(DistanceMatrix::from_rows(rows).unwrap());

    for (index, customer) in customers.into_iter().enumerate() {
        let mut customer_builder = CustomerBuilder::default();
        customer_builder
            .set_external_id(format!("customer-{index}"))
            .set_location_id(index + 1)
            .set_demand(customer.demand)
            .set_service_duration(SignedDuration::from_mins(10))
            .set_time_window(TimeWindow::from_mins(customer.window.0, customer.window.1));
        builder.add_customer(customer_builder.build().unwrap());
    }

    for (index, &capacity) in capacities.iter().enumerate() {
        let mut vehicle_builder = VehicleBuilder::default();
        vehicle_builder
            .set_vehicle_id(format!("vehicle-{index}"))
            .set_capacity(capacity)
            .set_vehicle_shift(VehicleShift::new(
                SignedDuration::from_mins(shift.0),
                SignedDuration::from_mins(shift.1),
            ));
        builder.add_vehicle(vehicle_builder.build().unwrap());
    }

    builder.build().unwrap()
}
