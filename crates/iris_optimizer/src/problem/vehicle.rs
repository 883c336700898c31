use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{define_index_newtype, time::positive_part};

use super::scenario_error::ScenarioError;

define_index_newtype!(VehicleIdx, Vehicle);

#[derive(Serialize, Debug, Clone)]
pub struct Vehicle {
    external_id: String,
    capacity: f64,
    shift: VehicleShift,
}

impl Vehicle {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn shift(&self) -> &VehicleShift {
        &self.shift
    }
}

/// Nominal working period of a vehicle. Work past `end` is overtime.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleShift {
    start: SignedDuration,
    end: SignedDuration,
}

impl VehicleShift {
    pub fn new(start: SignedDuration, end: SignedDuration) -> Self {
        VehicleShift { start, end }
    }

    pub fn start(&self) -> SignedDuration {
        self.start
    }

    pub fn end(&self) -> SignedDuration {
        self.end
    }

    pub fn length(&self) -> SignedDuration {
        self.end - self.start
    }

    pub fn overtime(&self, return_time: SignedDuration) -> SignedDuration {
        positive_part(return_time - self.end)
    }
}

#[derive(Default)]
pub struct VehicleBuilder {
    external_id: Option<String>,
    capacity: Option<f64>,
    shift: Option<VehicleShift>,
}

impl VehicleBuilder {
    pub fn set_vehicle_id(&mut self, external_id: String) -> &mut VehicleBuilder {
        self.external_id = Some(external_id);
        self
    }

    pub fn set_capacity(&mut self, capacity: f64) -> &mut VehicleBuilder {
        self.capacity = Some(capacity);
        self
    }

    pub fn set_vehicle_shift(&mut self, shift: VehicleShift) -> &mut VehicleBuilder {
        self.shift = Some(shift);
        self
    }

    pub fn build(self) -> Result<Vehicle, ScenarioError> {
        let external_id = self
            .external_id
            .ok_or(ScenarioError::MissingField { field: "id" })?;
        let capacity = self
            .capacity
            .ok_or(ScenarioError::MissingField { field: "capacity" })?;
        let shift = self
            .shift
            .ok_or(ScenarioError::MissingField { field: "shift" })?;

        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(ScenarioError::InvalidCapacity {
                id: external_id,
                capacity,
            });
        }

        if shift.start > shift.end {
            return Err(ScenarioError::InvertedShift {
                id: external_id,
                start: shift.start,
                end: shift.end,
            });
        }

        Ok(Vehicle {
            external_id,
            capacity,
            shift,
        })
    }
}
