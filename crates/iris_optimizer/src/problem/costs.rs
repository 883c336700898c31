use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::time::DurationExt;

use super::scenario_error::ScenarioError;

/// Prices shared by the optimizer objective and the simulator.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CostParams {
    /// Cost of dispatching a vehicle, paid once per used vehicle.
    pub fixed_vehicle_cost: f64,
    pub travel_cost_per_minute: f64,
    /// Premium paid for every minute a vehicle returns after its shift end.
    pub overtime_cost_per_minute: f64,
    /// Price of a minute of late arrival at a customer. Zero keeps lateness out of
    /// the operating cost and only reports it as delay.
    pub lateness_cost_per_minute: f64,
}

impl Default for CostParams {
    fn default() -> Self {
        CostParams {
            fixed_vehicle_cost: 150.0,
            travel_cost_per_minute: 1.0,
            overtime_cost_per_minute: 2.5,
            lateness_cost_per_minute: 0.0,
        }
    }
}

impl CostParams {
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let fields = [
            ("fixed_vehicle_cost", self.fixed_vehicle_cost),
            ("travel_cost_per_minute", self.travel_cost_per_minute),
            ("overtime_cost_per_minute", self.overtime_cost_per_minute),
            ("lateness_cost_per_minute", self.lateness_cost_per_minute),
        ];

        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ScenarioError::InvalidCost { field, value });
            }
        }

        Ok(())
    }

    pub fn travel_cost(&self, travel_time: SignedDuration) -> f64 {
        travel_time.as_minutes_f64() * self.travel_cost_per_minute
    }

    pub fn overtime_cost(&self, overtime: SignedDuration) -> f64 {
        overtime.as_minutes_f64() * self.overtime_cost_per_minute
    }

    pub fn lateness_cost(&self, lateness: SignedDuration) -> f64 {
        lateness.as_minutes_f64() * self.lateness_cost_per_minute
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_negative_rates() {
        let costs = CostParams {
            overtime_cost_per_minute: -1.0,
            ..CostParams::default()
        };

        assert_eq!(
            costs.validate(),
            Err(ScenarioError::InvalidCost {
                field: "overtime_cost_per_minute",
                value: -1.0
            })
        );
    }

    #[test]
    fn test_pricing() {
        let costs = CostParams::default();

        assert_eq!(costs.travel_cost(SignedDuration::from_mins(30)), 30.0);
        assert_eq!(costs.overtime_cost(SignedDuration::from_mins(10)), 25.0);
        assert_eq!(costs.lateness_cost(SignedDuration::from_mins(10)), 0.0);
    }
}
