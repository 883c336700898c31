use super::vehicle::{Vehicle, VehicleIdx};

/// Vehicles of the scenario together with the number the planner may dispatch.
#[derive(Debug, Clone)]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
    available_vehicles: usize,
}

/// Smallest number of vehicles whose capacity can hold the total demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetBound {
    pub vehicles: usize,
    /// False when even every available vehicle cannot carry the demand.
    pub sufficient: bool,
}

impl Fleet {
    pub fn new(vehicles: Vec<Vehicle>, available_vehicles: usize) -> Self {
        Fleet {
            vehicles,
            available_vehicles,
        }
    }

    #[inline]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    #[inline]
    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &Vehicle {
        &self.vehicles[vehicle_id]
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn ceiling(&self) -> usize {
        self.available_vehicles
    }

    /// Vehicles the planner may use, largest capacity first, truncated to the ceiling.
    /// Equal capacities keep their declaration order.
    pub fn available_vehicle_ids(&self) -> Vec<VehicleIdx> {
        let mut ids: Vec<VehicleIdx> = (0..self.vehicles.len()).map(VehicleIdx::new).collect();
        ids.sort_by(|&a, &b| {
            self.vehicles[b]
                .capacity()
                .total_cmp(&self.vehicles[a].capacity())
        });
        ids.truncate(self.available_vehicles);
        ids
    }

    pub fn available_capacity(&self) -> f64 {
        self.available_vehicle_ids()
            .into_iter()
            .map(|id| self.vehicles[id].capacity())
            .sum()
    }

    pub fn minimum_vehicles(&self, demand: f64) -> FleetBound {
        let mut capacity = 0.0;
        let mut vehicles = 0;

        for id in self.available_vehicle_ids() {
            if capacity >= demand {
                break;
            }
            capacity += self.vehicles[id].capacity();
            vehicles += 1;
        }

        FleetBound {
            vehicles,
            sufficient: capacity >= demand,
        }
    }
}
