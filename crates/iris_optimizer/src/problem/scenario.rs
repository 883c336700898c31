use fxhash::FxHashSet;
use jiff::SignedDuration;

use super::{
    costs::CostParams,
    customer::{Customer, CustomerIdx},
    distance_matrix::DistanceMatrix,
    fleet::Fleet,
    location::LocationIdx,
    scenario_error::ScenarioError,
    vehicle::{Vehicle, VehicleIdx},
};

/// Validated, immutable planning input shared by the optimizer, the baseline and
/// the simulator.
#[derive(Debug, Clone)]
pub struct Scenario {
    id: String,
    depot_location_id: LocationIdx,
    distance_matrix: DistanceMatrix,
    customers: Vec<Customer>,
    fleet: Fleet,
    costs: CostParams,
    total_demand: f64,
    horizon_end: SignedDuration,
}

impl Scenario {
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder::default()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn depot_location_id(&self) -> LocationIdx {
        self.depot_location_id
    }

    pub fn distance_matrix(&self) -> &DistanceMatrix {
        &self.distance_matrix
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    #[inline]
    pub fn customer(&self, customer_id: CustomerIdx) -> &Customer {
        &self.customers[customer_id]
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    #[inline]
    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &Vehicle {
        self.fleet.vehicle(vehicle_id)
    }

    pub fn costs(&self) -> &CostParams {
        &self.costs
    }

    pub fn total_demand(&self) -> f64 {
        self.total_demand
    }

    /// Latest shift end across the whole fleet.
    pub fn horizon_end(&self) -> SignedDuration {
        self.horizon_end
    }

    #[inline]
    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> SignedDuration {
        self.distance_matrix.travel_time(from, to)
    }

    #[inline]
    pub fn travel_minutes(&self, from: LocationIdx, to: LocationIdx) -> f64 {
        self.distance_matrix.travel_minutes(from, to)
    }

    pub fn customer_ids(&self) -> impl Iterator<Item = CustomerIdx> + use<> {
        (0..self.customers.len()).map(CustomerIdx::new)
    }
}

#[derive(Default)]
pub struct ScenarioBuilder {
    id: Option<String>,
    depot_location_id: Option<LocationIdx>,
    distance_matrix: Option<DistanceMatrix>,
    customers: Vec<Customer>,
    vehicles: Vec<Vehicle>,
    available_vehicles: Option<usize>,
    costs: Option<CostParams>,
}

impl ScenarioBuilder {
    pub fn set_id(&mut self, id: String) -> &mut ScenarioBuilder {
        self.id = Some(id);
        self
    }

    pub fn set_depot_location_id(&mut self, depot_location_id: usize) -> &mut ScenarioBuilder {
        self.depot_location_id = Some(LocationIdx::new(depot_location_id));
        self
    }

    pub fn set_distance_matrix(&mut self, distance_matrix: DistanceMatrix) -> &mut ScenarioBuilder {
        self.distance_matrix = Some(distance_matrix);
        self
    }

    pub fn set_customers(&mut self, customers: Vec<Customer>) -> &mut ScenarioBuilder {
        self.customers = customers;
        self
    }

    pub fn add_customer(&mut self, customer: Customer) -> &mut ScenarioBuilder {
        self.customers.push(customer);
        self
    }

    pub fn set_vehicles(&mut self, vehicles: Vec<Vehicle>) -> &mut ScenarioBuilder {
        self.vehicles = vehicles;
        self
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> &mut ScenarioBuilder {
        self.vehicles.push(vehicle);
        self
    }

    /// Ceiling on dispatched vehicles, defaults to the whole fleet.
    pub fn set_available_vehicles(&mut self, available_vehicles: usize) -> &mut ScenarioBuilder {
        self.available_vehicles = Some(available_vehicles);
        self
    }

    pub fn set_costs(&mut self, costs: CostParams) -> &mut ScenarioBuilder {
        self.costs = Some(costs);
        self
    }

    pub fn build(self) -> Result<Scenario, ScenarioError> {
        let distance_matrix = self.distance_matrix.ok_or(ScenarioError::MissingField {
            field: "travel_times",
        })?;
        let depot_location_id = self.depot_location_id.ok_or(ScenarioError::MissingField {
            field: "depot_location_id",
        })?;
        let num_locations = distance_matrix.num_locations();

        if depot_location_id.get() >= num_locations {
            return Err(ScenarioError::LocationOutOfBounds {
                entity: "depot",
                id: String::from("depot"),
                location: depot_location_id.get(),
                locations: num_locations,
            });
        }

        if self.vehicles.is_empty() {
            return Err(ScenarioError::EmptyFleet);
        }

        let available_vehicles = self.available_vehicles.unwrap_or(self.vehicles.len());
        if available_vehicles == 0 || available_vehicles > self.vehicles.len() {
            return Err(ScenarioError::InvalidVehicleCeiling {
                ceiling: available_vehicles,
                fleet_size: self.vehicles.len(),
            });
        }

        let mut customer_ids = FxHashSet::default();
        for customer in &self.customers {
            if customer.location_id().get() >= num_locations {
                return Err(ScenarioError::LocationOutOfBounds {
                    entity: "customer",
                    id: customer.external_id().to_owned(),
                    location: customer.location_id().get(),
                    locations: num_locations,
                });
            }

            if !customer_ids.insert(customer.external_id()) {
                return Err(ScenarioError::DuplicateId {
                    entity: "customer",
                    id: customer.external_id().to_owned(),
                });
            }
        }

        let mut vehicle_ids = FxHashSet::default();
        for vehicle in &self.vehicles {
            if !vehicle_ids.insert(vehicle.external_id()) {
                return Err(ScenarioError::DuplicateId {
                    entity: "vehicle",
                    id: vehicle.external_id().to_owned(),
                });
            }
        }

        let costs = self.costs.unwrap_or_default();
        costs.validate()?;

        let total_demand = self.customers.iter().map(Customer::demand).sum();
        let horizon_end = self
            .vehicles
            .iter()
            .map(|vehicle| vehicle.shift().end())
            .max()
            .unwrap_or(SignedDuration::ZERO);

        Ok(Scenario {
            id: self.id.unwrap_or_else(|| String::from("scenario")),
            depot_location_id,
            distance_matrix,
            customers: self.customers,
            fleet: Fleet::new(self.vehicles, available_vehicles),
            costs,
            total_demand,
            horizon_end,
        })
    }
}
