use jiff::SignedDuration;
use serde::Serialize;

use crate::define_index_newtype;

use super::{location::LocationIdx, scenario_error::ScenarioError, time_window::TimeWindow};

define_index_newtype!(CustomerIdx, Customer);

#[derive(Serialize, Debug, Clone)]
pub struct Customer {
    external_id: String,
    location_id: LocationIdx,
    demand: f64,
    service_duration: SignedDuration,
    time_window: TimeWindow,
}

impl Customer {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn location_id(&self) -> LocationIdx {
        self.location_id
    }

    pub fn demand(&self) -> f64 {
        self.demand
    }

    pub fn service_duration(&self) -> SignedDuration {
        self.service_duration
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }
}

#[derive(Default)]
pub struct CustomerBuilder {
    external_id: Option<String>,
    location_id: Option<LocationIdx>,
    demand: Option<f64>,
    service_duration: Option<SignedDuration>,
    time_window: Option<TimeWindow>,
}

impl CustomerBuilder {
    pub fn set_external_id(&mut self, external_id: String) -> &mut CustomerBuilder {
        self.external_id = Some(external_id);
        self
    }

    pub fn set_location_id(&mut self, location_id: usize) -> &mut CustomerBuilder {
        self.location_id = Some(LocationIdx::new(location_id));
        self
    }

    pub fn set_demand(&mut self, demand: f64) -> &mut CustomerBuilder {
        self.demand = Some(demand);
        self
    }

    pub fn set_service_duration(&mut self, service_duration: SignedDuration) -> &mut CustomerBuilder {
        self.service_duration = Some(service_duration);
        self
    }

    pub fn set_time_window(&mut self, time_window: TimeWindow) -> &mut CustomerBuilder {
        self.time_window = Some(time_window);
        self
    }

    pub fn build(self) -> Result<Customer, ScenarioError> {
        let external_id = self
            .external_id
            .ok_or(ScenarioError::MissingField { field: "id" })?;
        let location_id = self
            .location_id
            .ok_or(ScenarioError::MissingField {
                field: "location_id",
            })?;
        let time_window = self
            .time_window
            .ok_or(ScenarioError::MissingField {
                field: "time_window",
            })?;
        let demand = self.demand.unwrap_or(0.0);
        let service_duration = self.service_duration.unwrap_or(SignedDuration::ZERO);

        if !demand.is_finite() || demand < 0.0 {
            return Err(ScenarioError::InvalidDemand {
                id: external_id,
                demand,
            });
        }

        if service_duration.is_negative() {
            return Err(ScenarioError::NegativeServiceDuration {
                id: external_id,
                duration: service_duration,
            });
        }

        if !time_window.is_valid() {
            return Err(ScenarioError::InvertedTimeWindow {
                id: external_id,
                earliest: time_window.earliest(),
                latest: time_window.latest(),
            });
        }

        Ok(Customer {
            external_id,
            location_id,
            demand,
            service_duration,
            time_window,
        })
    }
}
