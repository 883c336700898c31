use schemars::JsonSchema;
use serde::Serialize;

use crate::problem::{scenario::Scenario, vehicle::VehicleIdx};

use super::route_plan::RoutePlan;

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct VehicleLoad {
    pub vehicle_id: VehicleIdx,
    pub vehicle_external_id: String,
    pub load: f64,
    pub capacity: f64,
    pub load_ratio: f64,
}

/// How much of the fleet a plan uses and how much of the demand it serves.
#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct FleetUtilization {
    pub vehicles_available: usize,
    pub vehicles_used: usize,
    /// Fewest vehicles whose capacity can hold the total demand.
    pub vehicles_lower_bound: usize,
    pub loads: Vec<VehicleLoad>,
    pub mean_load_ratio: f64,
    pub served_demand: f64,
    pub total_demand: f64,
    /// Served demand over total demand, 1 when there is nothing to deliver.
    pub fill_rate: f64,
}

impl FleetUtilization {
    pub fn from_plan(scenario: &Scenario, plan: &RoutePlan) -> Self {
        let loads: Vec<VehicleLoad> = plan
            .routes()
            .iter()
            .map(|route| {
                let capacity = scenario.vehicle(route.vehicle_id).capacity();
                VehicleLoad {
                    vehicle_id: route.vehicle_id,
                    vehicle_external_id: route.vehicle_external_id.clone(),
                    load: route.load,
                    capacity,
                    load_ratio: route.load / capacity,
                }
            })
            .collect();

        let mean_load_ratio = if loads.is_empty() {
            0.0
        } else {
            loads.iter().map(|load| load.load_ratio).sum::<f64>() / loads.len() as f64
        };

        let served_demand = plan.served_demand();
        let total_demand = scenario.total_demand();
        let fill_rate = if total_demand > 0.0 {
            served_demand / total_demand
        } else {
            1.0
        };

        FleetUtilization {
            vehicles_available: scenario.fleet().ceiling(),
            vehicles_used: plan.vehicles_used(),
            vehicles_lower_bound: scenario.fleet().minimum_vehicles(total_demand).vehicles,
            loads,
            mean_load_ratio,
            served_demand,
            total_demand,
            fill_rate,
        }
    }
}
