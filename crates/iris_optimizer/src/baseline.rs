use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{debug, instrument};

use crate::{
    plan::route_plan::RoutePlan,
    problem::{customer::CustomerIdx, scenario::Scenario, vehicle::VehicleIdx},
};

const CAPACITY_TOLERANCE: f64 = 1e-9;

/// Greedy nearest-neighbour planner standing in for manual dispatching.
///
/// Each vehicle in turn drives to the nearest customer that still fits its
/// remaining capacity and lets it return to the depot before shift end, until
/// nothing fits. Time windows are ignored. Customers left once every vehicle has
/// been filled are appended capacity-only, the rest is reported unassigned.
///
/// With `noise > 0` every distance the dispatcher compares is inflated by a
/// random factor in `[1, 1 + noise)`, drawn from a stream seeded with `seed`.
pub struct BaselineBuilder {
    seed: u64,
    noise: f64,
}

impl BaselineBuilder {
    pub fn new(seed: u64) -> Self {
        BaselineBuilder { seed, noise: 0.0 }
    }

    pub fn set_noise(&mut self, noise: f64) -> &mut BaselineBuilder {
        self.noise = if noise.is_finite() { noise.max(0.0) } else { 0.0 };
        self
    }

    #[instrument(skip_all, level = "debug")]
    pub fn build(&self, scenario: &Scenario) -> RoutePlan {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut remaining: Vec<CustomerIdx> = scenario.customer_ids().collect();
        let mut sequences: Vec<(VehicleIdx, Vec<CustomerIdx>, f64)> = Vec::new();

        for vehicle_id in scenario.fleet().available_vehicle_ids() {
            let (customers, load) = self.fill_vehicle(scenario, vehicle_id, &mut remaining, &mut rng);
            sequences.push((vehicle_id, customers, load));
        }

        let mut unassigned = Vec::new();
        for customer_id in remaining {
            let demand = scenario.customer(customer_id).demand();
            let route = sequences.iter_mut().find(|(vehicle_id, _, load)| {
                *load + demand <= scenario.vehicle(*vehicle_id).capacity() + CAPACITY_TOLERANCE
            });

            match route {
                Some((_, customers, load)) => {
                    customers.push(customer_id);
                    *load += demand;
                }
                None => unassigned.push(customer_id),
            }
        }

        debug!(
            vehicles = sequences.iter().filter(|(_, customers, _)| !customers.is_empty()).count(),
            unassigned = unassigned.len(),
            "Baseline plan built"
        );

        RoutePlan::from_sequences(
            scenario,
            sequences
                .into_iter()
                .map(|(vehicle_id, customers, _)| (vehicle_id, customers))
                .collect(),
            unassigned,
        )
    }

    fn fill_vehicle(
        &self,
        scenario: &Scenario,
        vehicle_id: VehicleIdx,
        remaining: &mut Vec<CustomerIdx>,
        rng: &mut SmallRng,
    ) -> (Vec<CustomerIdx>, f64) {
        let vehicle = scenario.vehicle(vehicle_id);
        let depot = scenario.depot_location_id();
        let mut customers = Vec::new();
        let mut load = 0.0;
        let mut clock = vehicle.shift().start();
        let mut current_location = depot;

        loop {
            let mut nearest: Option<(f64, usize)> = None;

            for (index, &customer_id) in remaining.iter().enumerate() {
                let customer = scenario.customer(customer_id);
                if load + customer.demand() > vehicle.capacity() + CAPACITY_TOLERANCE {
                    continue;
                }

                let travel = scenario.travel_time(current_location, customer.location_id());
                let back = scenario.travel_time(customer.location_id(), depot);
                if clock + travel + customer.service_duration() + back > vehicle.shift().end() {
                    continue;
                }

                let mut distance = scenario.travel_minutes(current_location, customer.location_id());
                if self.noise > 0.0 {
                    distance *= 1.0 + self.noise * rng.random::<f64>();
                }

                if nearest.is_none_or(|(best, _)| distance < best) {
                    nearest = Some((distance, index));
                }
            }

            let Some((_, index)) = nearest else {
                break;
            };

            let customer_id = remaining.remove(index);
            let customer = scenario.customer(customer_id);
            clock += scenario.travel_time(current_location, customer.location_id())
                + customer.service_duration();
            load += customer.demand();
            current_location = customer.location_id();
            customers.push(customer_id);
        }

        (customers, load)
    }
}
