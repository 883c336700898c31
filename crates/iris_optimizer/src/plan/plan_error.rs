use thiserror::Error;

use crate::problem::{customer::CustomerIdx, vehicle::VehicleIdx};

/// Broken structural invariant of a route plan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("plan references unknown vehicle {0}")]
    UnknownVehicle(VehicleIdx),

    #[error("vehicle {0} has more than one route")]
    DuplicateVehicle(VehicleIdx),

    #[error("plan references unknown customer {0}")]
    UnknownCustomer(CustomerIdx),

    #[error("customer {0} appears more than once")]
    DuplicateCustomer(CustomerIdx),

    #[error("customer {0} is neither routed nor listed as unassigned")]
    MissingCustomer(CustomerIdx),

    #[error("vehicle {vehicle_id} carries {load} but its capacity is {capacity}")]
    CapacityExceeded {
        vehicle_id: VehicleIdx,
        load: f64,
        capacity: f64,
    },
}
