use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::problem::{
    costs::CostParams,
    customer::{Customer, CustomerBuilder},
    distance_matrix::DistanceMatrix,
    scenario::Scenario,
    scenario_error::ScenarioError,
    time_window::TimeWindow,
    vehicle::{Vehicle, VehicleBuilder, VehicleShift},
};

/// Serialized scenario. Durations are ISO 8601 strings (`"PT8H"`) measured from
/// the start of the planning day, travel times are minutes.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename = "Scenario")]
pub struct JsonScenario {
    pub id: Option<String>,
    pub depot_location_id: usize,
    /// Symmetric matrix of travel minutes between locations.
    pub travel_times: Vec<Vec<f64>>,
    pub customers: Vec<JsonCustomer>,
    pub vehicles: Vec<JsonVehicle>,
    /// Ceiling on dispatched vehicles, the whole fleet when absent.
    pub available_vehicles: Option<usize>,
    #[serde(default)]
    pub costs: CostParams,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename = "Customer")]
pub struct JsonCustomer {
    pub id: String,
    pub location_id: usize,
    pub demand: f64,
    pub service_duration: Option<SignedDuration>,
    pub time_window: TimeWindow,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename = "Vehicle")]
pub struct JsonVehicle {
    pub id: String,
    pub capacity: f64,
    pub shift: VehicleShift,
}

impl From<&Customer> for JsonCustomer {
    fn from(customer: &Customer) -> Self {
        JsonCustomer {
            id: customer.external_id().to_owned(),
            location_id: customer.location_id().get(),
            demand: customer.demand(),
            service_duration: Some(customer.service_duration()),
            time_window: *customer.time_window(),
        }
    }
}

impl From<&Vehicle> for JsonVehicle {
    fn from(vehicle: &Vehicle) -> Self {
        JsonVehicle {
            id: vehicle.external_id().to_owned(),
            capacity: vehicle.capacity(),
            shift: *vehicle.shift(),
        }
    }
}

impl From<&Scenario> for JsonScenario {
    fn from(scenario: &Scenario) -> Self {
        JsonScenario {
            id: Some(scenario.id().to_owned()),
            depot_location_id: scenario.depot_location_id().get(),
            travel_times: scenario
                .distance_matrix()
                .rows()
                .map(<[f64]>::to_vec)
                .collect(),
            customers: scenario.customers().iter().map(JsonCustomer::from).collect(),
            vehicles: scenario
                .fleet()
                .vehicles()
                .iter()
                .map(JsonVehicle::from)
                .collect(),
            available_vehicles: Some(scenario.fleet().ceiling()),
            costs: *scenario.costs(),
        }
    }
}

impl JsonScenario {
    #[instrument(skip_all, level = "debug")]
    pub fn build_scenario(self) -> Result<Scenario, ScenarioError> {
        let mut builder = Scenario::builder();

        if let Some(id) = self.id {
            builder.set_id(id);
        }

        builder
            .set_depot_location_id(self.depot_location_id)
            .set_distance_matrix(DistanceMatrix::from_rows(self.travel_times)?)
            .set_costs(self.costs);

        if let Some(available_vehicles) = self.available_vehicles {
            builder.set_available_vehicles(available_vehicles);
        }

        for json_customer in self.customers {
            let mut customer = CustomerBuilder::default();
            customer
                .set_external_id(json_customer.id)
                .set_location_id(json_customer.location_id)
                .set_demand(json_customer.demand)
                .set_time_window(json_customer.time_window);

            if let Some(service_duration) = json_customer.service_duration {
                customer.set_service_duration(service_duration);
            }

            builder.add_customer(customer.build()?);
        }

        for json_vehicle in self.vehicles {
            let mut vehicle = VehicleBuilder::default();
            vehicle
                .set_vehicle_id(json_vehicle.id)
                .set_capacity(json_vehicle.capacity)
                .set_vehicle_shift(json_vehicle.shift);

            builder.add_vehicle(vehicle.build()?);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "id": "two-stops",
        "depot_location_id": 0,
        "travel_times": [[0, 12, 20], [12, 0, 9], [20, 9, 0]],
        "customers": [
            {
                "id": "c1",
                "location_id": 1,
                "demand": 4,
                "service_duration": "PT10M",
                "time_window": { "earliest": "PT9H", "latest": "PT12H" }
            },
            {
                "id": "c2",
                "location_id": 2,
                "demand": 3,
                "time_window": { "earliest": "PT8H", "latest": "PT11H" }
            }
        ],
        "vehicles": [
            { "id": "v1", "capacity": 20, "shift": { "start": "PT8H", "end": "PT16H" } }
        ]
    }"#;

    #[test]
    fn test_parse_scenario() {
        let json: JsonScenario = serde_json::from_str(SCENARIO).unwrap();
        let scenario = json.build_scenario().unwrap();

        assert_eq!(scenario.id(), "two-stops");
        assert_eq!(scenario.customers().len(), 2);
        assert_eq!(scenario.total_demand(), 7.0);
        assert_eq!(
            scenario.customers()[0].service_duration(),
            SignedDuration::from_mins(10)
        );
        assert_eq!(
            scenario.customers()[1].time_window().earliest(),
            SignedDuration::from_hours(8)
        );
        assert_eq!(scenario.fleet().ceiling(), 1);
        assert_eq!(scenario.costs(), &CostParams::default());
    }

    #[test]
    fn test_scenario_round_trips_through_json() {
        let json: JsonScenario = serde_json::from_str(SCENARIO).unwrap();
        let scenario = json.build_scenario().unwrap();

        let serialized = serde_json::to_string(&JsonScenario::from(&scenario)).unwrap();
        let reparsed: JsonScenario = serde_json::from_str(&serialized).unwrap();

        assert_eq!(reparsed, JsonScenario::from(&scenario));
        let rebuilt = reparsed.build_scenario().unwrap();
        assert_eq!(rebuilt.total_demand(), scenario.total_demand());
        assert_eq!(
            rebuilt.distance_matrix().rows().collect::<Vec<_>>(),
            scenario.distance_matrix().rows().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_negative_demand_is_reported_with_customer_id() {
        let json = SCENARIO.replace("\"demand\": 3", "\"demand\": -3");
        let json: JsonScenario = serde_json::from_str(&json).unwrap();

        assert_eq!(
            json.build_scenario().unwrap_err(),
            ScenarioError::InvalidDemand {
                id: String::from("c2"),
                demand: -3.0
            }
        );
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let json = SCENARIO.replace("\"depot_location_id\"", "\"depot\": 1, \"depot_location_id\"");

        assert!(serde_json::from_str::<JsonScenario>(&json).is_err());
    }

    #[test]
    fn test_schema_generation() {
        let schema = crate::json::schema::generate_json_schema().unwrap();

        assert!(schema.contains("travel_times"));
    }
}
