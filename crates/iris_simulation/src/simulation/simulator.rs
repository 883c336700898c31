use iris_optimizer::{
    plan::route_plan::{RoutePlan, VehicleRoute},
    problem::{location::LocationIdx, scenario::Scenario},
    time::{self, DurationExt},
};
use jiff::SignedDuration;
use tracing::{debug, info, instrument};

use crate::weather::weather_timeline::WeatherSegment;

use super::{
    event::{EventKind, EventQueue},
    outcome_report::{CostBreakdown, LegRecord, OutcomeReport, StopOutcome, VehicleOutcome},
    simulation_error::SimulationError,
    weather_track::WeatherTrack,
};

struct VehicleState<'p> {
    route: &'p VehicleRoute,
    location: LocationIdx,
    next_stop: usize,
    stops: Vec<StopOutcome>,
    legs: Vec<LegRecord>,
    return_time: Option<SignedDuration>,
}

impl<'p> VehicleState<'p> {
    fn new(route: &'p VehicleRoute, depot: LocationIdx) -> Self {
        VehicleState {
            route,
            location: depot,
            next_stop: 0,
            stops: Vec::with_capacity(route.stops.len()),
            legs: Vec::with_capacity(route.stops.len() + 1),
            return_time: None,
        }
    }
}

/// Replays route plans against a weather timeline, event by event.
///
/// Vehicles leave the depot at their shift start. Early arrivals wait for the
/// window to open, late ones are served anyway and the lateness is recorded.
/// The plan is only read.
pub struct Simulator<'a> {
    scenario: &'a Scenario,
}

impl<'a> Simulator<'a> {
    pub fn new(scenario: &'a Scenario) -> Self {
        Simulator { scenario }
    }

    #[instrument(skip_all, level = "debug", fields(routes = plan.routes().len()))]
    pub fn run(
        &self,
        plan: &RoutePlan,
        timeline: impl IntoIterator<Item = WeatherSegment>,
    ) -> Result<OutcomeReport, SimulationError> {
        plan.validate(self.scenario)?;
        let track = WeatherTrack::new(timeline)?;
        debug!(segments = track.segments().len(), "Weather track loaded");

        let depot = self.scenario.depot_location_id();
        let mut states: Vec<VehicleState> = plan
            .routes()
            .iter()
            .map(|route| VehicleState::new(route, depot))
            .collect();

        let mut queue = EventQueue::new();
        for (index, state) in states.iter().enumerate() {
            queue.push(state.route.departure, index, EventKind::Depart);
        }

        while let Some(event) = queue.pop() {
            let state = &mut states[event.route];
            match event.kind {
                EventKind::Depart => {
                    let arrival = self.depart(state, &track, event.time);
                    queue.push(arrival, event.route, EventKind::Arrive);
                }
                EventKind::Arrive => {
                    if let Some(departure) = self.arrive(state, event.time) {
                        queue.push(departure, event.route, EventKind::Depart);
                    }
                }
            }
        }

        let vehicles: Vec<VehicleOutcome> = states
            .into_iter()
            .map(|state| self.vehicle_outcome(state))
            .collect();
        let report = OutcomeReport::new(vehicles, plan.unassigned().to_vec());

        info!(
            vehicles = report.totals.vehicles_used,
            late_stops = report.totals.late_stops,
            lateness = %report.totals.total_lateness,
            overtime = %report.totals.overtime,
            cost = report.cost.total,
            "Simulation finished"
        );

        Ok(report)
    }

    /// Starts the next leg and returns its arrival time.
    fn depart(
        &self,
        state: &mut VehicleState,
        track: &WeatherTrack,
        departure: SignedDuration,
    ) -> SignedDuration {
        let destination = match state.route.stops.get(state.next_stop) {
            Some(stop) => self.scenario.customer(stop.customer_id).location_id(),
            None => self.scenario.depot_location_id(),
        };

        let base_minutes = self.scenario.travel_minutes(state.location, destination);
        let base_travel_time = time::from_minutes_f64(base_minutes);
        let travel = track.travel(departure, base_minutes);
        let arrival = departure + travel.duration;

        state.legs.push(LegRecord {
            from: state.location,
            to: destination,
            departure,
            arrival,
            base_travel_time,
            travel_time: travel.duration,
            multiplier: travel.multiplier,
            regime: travel.dominant_regime,
            weather_delay: time::positive_part(travel.duration - base_travel_time),
            exposure: travel.exposure,
        });
        state.location = destination;

        arrival
    }

    /// Serves the stop reached at `arrival` and returns when the vehicle leaves
    /// it, `None` once back at the depot.
    fn arrive(&self, state: &mut VehicleState, arrival: SignedDuration) -> Option<SignedDuration> {
        let Some(planned) = state.route.stops.get(state.next_stop) else {
            state.return_time = Some(arrival);
            return None;
        };

        let customer = self.scenario.customer(planned.customer_id);
        let time_window = customer.time_window();
        let service_start = time_window.service_start(arrival);
        let departure = service_start + customer.service_duration();

        state.stops.push(StopOutcome {
            customer_id: planned.customer_id,
            customer_external_id: planned.customer_external_id.clone(),
            planned_arrival: planned.planned_arrival,
            arrival,
            service_start,
            departure,
            delay: arrival - planned.planned_arrival,
            lateness: time_window.lateness(arrival),
        });
        state.next_stop += 1;

        Some(departure)
    }

    fn vehicle_outcome(&self, state: VehicleState) -> VehicleOutcome {
        let route = state.route;
        let vehicle = self.scenario.vehicle(route.vehicle_id);
        let costs = self.scenario.costs();

        let return_time = state.return_time.unwrap_or(route.planned_return);
        let overtime = vehicle.shift().overtime(return_time);
        let travel_time = state
            .legs
            .iter()
            .fold(SignedDuration::ZERO, |acc, leg| acc + leg.travel_time);
        let total_lateness = state
            .stops
            .iter()
            .fold(SignedDuration::ZERO, |acc, stop| acc + stop.lateness);

        let cost = CostBreakdown::new(
            costs.fixed_vehicle_cost,
            costs.travel_cost(travel_time),
            costs.overtime_cost(overtime),
            costs.lateness_cost(total_lateness),
        );

        debug!(
            vehicle = %route.vehicle_external_id,
            travel = travel_time.as_minutes_f64(),
            overtime = overtime.as_minutes_f64(),
            "Vehicle returned"
        );

        VehicleOutcome {
            vehicle_id: route.vehicle_id,
            vehicle_external_id: route.vehicle_external_id.clone(),
            stops: state.stops,
            legs: state.legs,
            departure: route.departure,
            return_time,
            planned_return: route.planned_return,
            travel_time,
            total_lateness,
            overtime,
            cost,
        }
    }
}
