use std::ops::{Add, AddAssign};

use iris_optimizer::problem::{customer::CustomerIdx, location::LocationIdx, vehicle::VehicleIdx};
use jiff::SignedDuration;
use serde::Serialize;

use crate::weather::weather_regime::{PerRegime, WeatherRegime};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StopOutcome {
    pub customer_id: CustomerIdx,
    pub customer_external_id: String,
    pub planned_arrival: SignedDuration,
    pub arrival: SignedDuration,
    pub service_start: SignedDuration,
    pub departure: SignedDuration,
    /// Realized minus planned arrival, negative when ahead of plan.
    pub delay: SignedDuration,
    /// Arrival past the latest bound of the time window.
    pub lateness: SignedDuration,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LegRecord {
    pub from: LocationIdx,
    pub to: LocationIdx,
    pub departure: SignedDuration,
    pub arrival: SignedDuration,
    pub base_travel_time: SignedDuration,
    pub travel_time: SignedDuration,
    pub multiplier: f64,
    pub regime: WeatherRegime,
    /// Travel time added by the weather.
    pub weather_delay: SignedDuration,
    #[serde(skip)]
    pub exposure: PerRegime<SignedDuration>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct CostBreakdown {
    pub fixed: f64,
    pub travel: f64,
    pub overtime: f64,
    pub lateness: f64,
    pub total: f64,
}

impl CostBreakdown {
    pub fn new(fixed: f64, travel: f64, overtime: f64, lateness: f64) -> Self {
        CostBreakdown {
            fixed,
            travel,
            overtime,
            lateness,
            total: fixed + travel + overtime + lateness,
        }
    }
}

impl Add for CostBreakdown {
    type Output = CostBreakdown;

    fn add(self, rhs: Self) -> Self::Output {
        CostBreakdown::new(
            self.fixed + rhs.fixed,
            self.travel + rhs.travel,
            self.overtime + rhs.overtime,
            self.lateness + rhs.lateness,
        )
    }
}

impl AddAssign for CostBreakdown {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VehicleOutcome {
    pub vehicle_id: VehicleIdx,
    pub vehicle_external_id: String,
    pub stops: Vec<StopOutcome>,
    pub legs: Vec<LegRecord>,
    pub departure: SignedDuration,
    pub return_time: SignedDuration,
    pub planned_return: SignedDuration,
    pub travel_time: SignedDuration,
    pub total_lateness: SignedDuration,
    /// Return past the shift end, uncapped.
    pub overtime: SignedDuration,
    pub cost: CostBreakdown,
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct FleetTotals {
    pub vehicles_used: usize,
    pub stops: usize,
    pub late_stops: usize,
    pub total_lateness: SignedDuration,
    pub max_lateness: SignedDuration,
    /// Sum of the positive stop delays against the plan.
    pub total_delay: SignedDuration,
    pub travel_time: SignedDuration,
    pub weather_delay: SignedDuration,
    pub overtime: SignedDuration,
}

/// Realized execution of a route plan under one weather timeline.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OutcomeReport {
    pub vehicles: Vec<VehicleOutcome>,
    pub totals: FleetTotals,
    pub cost: CostBreakdown,
    /// Travel time spent under each regime.
    pub exposure: PerRegime<SignedDuration>,
    /// Share of legs mostly driven through a severe storm.
    pub storm_exposure: f64,
    /// Customers the plan left unassigned, never visited.
    pub unserved: Vec<CustomerIdx>,
}

impl OutcomeReport {
    pub fn new(vehicles: Vec<VehicleOutcome>, unserved: Vec<CustomerIdx>) -> Self {
        let mut totals = FleetTotals {
            vehicles_used: vehicles.len(),
            ..FleetTotals::default()
        };
        let mut cost = CostBreakdown::default();
        let mut exposure = PerRegime::<SignedDuration>::default();
        let mut legs = 0;
        let mut storm_legs = 0;

        for vehicle in &vehicles {
            for stop in &vehicle.stops {
                totals.stops += 1;
                if stop.lateness.is_positive() {
                    totals.late_stops += 1;
                }
                totals.total_lateness += stop.lateness;
                totals.max_lateness = totals.max_lateness.max(stop.lateness);
                if stop.delay.is_positive() {
                    totals.total_delay += stop.delay;
                }
            }

            for leg in &vehicle.legs {
                legs += 1;
                if leg.regime == WeatherRegime::SevereStorm {
                    storm_legs += 1;
                }
                totals.weather_delay += leg.weather_delay;
                for regime in WeatherRegime::ALL {
                    exposure[regime] += leg.exposure[regime];
                }
            }

            totals.travel_time += vehicle.travel_time;
            totals.overtime += vehicle.overtime;
            cost += vehicle.cost;
        }

        let storm_exposure = if legs == 0 {
            0.0
        } else {
            storm_legs as f64 / legs as f64
        };

        OutcomeReport {
            vehicles,
            totals,
            cost,
            exposure,
            storm_exposure,
            unserved,
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.cost.total
    }
}
