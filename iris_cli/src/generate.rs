use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand, ValueEnum};
use geo::{Distance, Haversine, Point};
use iris_optimizer::{
    json::types::{JsonCustomer, JsonScenario, JsonVehicle},
    problem::{costs::CostParams, time_window::TimeWindow, vehicle::VehicleShift},
};
use iris_simulation::{json::JsonWeatherModel, weather::weather_regime::PerRegime};
use jiff::SignedDuration;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rand_distr::{Distribution, Normal};
use tracing::info;

use crate::{
    parsers,
    scenario_file::{self, ScenarioDocument},
};

/// Delivery hubs as (name, latitude, longitude). The first one hosts the depot.
const HUBS: [(&str, f64, f64); 4] = [
    ("centro", -23.5505, -46.6333),
    ("itaim", -23.5840, -46.6780),
    ("guarulhos", -23.4628, -46.5333),
    ("osasco", -23.5329, -46.7920),
];

/// Spread of customers around their hub, in degrees.
const HUB_SPREAD: f64 = 0.02;
const URBAN_SPEED_KMH: f64 = 20.0;
/// Added to every trip for lights, turns and parking.
const TRIP_FRICTION_MINUTES: f64 = 3.0;
const WINDOW_LENGTH_MINUTES: i64 = 180;

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    /// Writes a synthetic scenario around clustered delivery hubs
    Scenario {
        #[command(flatten)]
        args: GenerateScenarioArgs,
    },
    JsonSchema {
        /// Output file of the schema
        #[arg(long, short = 'o')]
        out: PathBuf,

        #[arg(long, value_enum, default_value_t = SchemaKind::Document)]
        kind: SchemaKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SchemaKind {
    /// Scenario file with its weather model
    Document,
    Scenario,
    Weather,
}

#[derive(Args)]
pub struct GenerateScenarioArgs {
    /// Output scenario file
    #[arg(long, short = 'o')]
    out: PathBuf,

    #[arg(long, short = 'c', default_value_t = 50)]
    customers: usize,

    /// Fleet size, sized from the demand when absent
    #[arg(long)]
    vehicles: Option<usize>,

    #[arg(long, default_value_t = 50.0)]
    capacity: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, value_parser = parsers::parse_duration, default_value = "PT8H")]
    shift_start: SignedDuration,

    #[arg(long, value_parser = parsers::parse_duration, default_value = "PT8H")]
    shift_length: SignedDuration,

    #[arg(long, value_parser = parsers::parse_duration, default_value = "PT30M")]
    service: SignedDuration,

    #[arg(long, value_parser = parsers::parse_probability, default_value = "0.2")]
    rain_probability: f64,

    #[arg(long, value_parser = parsers::parse_probability, default_value = "0.1")]
    storm_probability: f64,
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    match subcommand {
        GenerateSubcommands::Scenario { args } => {
            let document = generate_scenario(&args)?;

            // Rejects inconsistent arguments before anything is written.
            document.scenario.clone().build_scenario()?;
            document.weather.clone().build_weather_model()?;

            document.write(&args.out)?;
            info!(
                customers = document.scenario.customers.len(),
                vehicles = document.scenario.vehicles.len(),
                "Scenario written to {}",
                args.out.display()
            );
        }
        GenerateSubcommands::JsonSchema { out, kind } => {
            let schema = match kind {
                SchemaKind::Document => scenario_file::generate_json_schema()?,
                SchemaKind::Scenario => iris_optimizer::json::schema::generate_json_schema()?,
                SchemaKind::Weather => iris_simulation::json::generate_json_schema()?,
            };

            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(out, schema)?;
        }
    }

    Ok(())
}

fn generate_scenario(args: &GenerateScenarioArgs) -> Result<ScenarioDocument, anyhow::Error> {
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let spread = Normal::new(0.0, HUB_SPREAD).context("invalid hub spread")?;

    let (_, depot_lat, depot_lon) = HUBS[0];
    let mut points = vec![Point::new(depot_lon, depot_lat)];
    let mut demands = Vec::with_capacity(args.customers);

    for (index, &(hub, lat, lon)) in HUBS.iter().enumerate() {
        let count = args.customers / HUBS.len() + usize::from(index < args.customers % HUBS.len());
        for _ in 0..count {
            points.push(Point::new(
                lon + spread.sample(&mut rng),
                lat + spread.sample(&mut rng),
            ));
            demands.push((hub, rng.random_range(1..=9) as f64));
        }
    }

    let travel_times = travel_time_matrix(&points);

    let shift_minutes = args.shift_length.as_mins();
    let service_minutes = args.service.as_mins();
    let customers = demands
        .iter()
        .enumerate()
        .map(|(index, &(hub, demand))| {
            let location_id = index + 1;
            let earliest = travel_times[0][location_id] as i64;
            let mut latest_start = shift_minutes - service_minutes - 30;
            if latest_start < earliest {
                latest_start = earliest + 10;
            }
            let start = rng.random_range(earliest..latest_start.max(earliest + 1));
            let end = (start + WINDOW_LENGTH_MINUTES).min(shift_minutes).max(start);

            JsonCustomer {
                id: format!("{hub}-{location_id}"),
                location_id,
                demand,
                service_duration: Some(args.service),
                time_window: TimeWindow::new(
                    args.shift_start + SignedDuration::from_mins(start),
                    args.shift_start + SignedDuration::from_mins(end),
                ),
            }
        })
        .collect::<Vec<_>>();

    let total_demand: f64 = demands.iter().map(|(_, demand)| demand).sum();
    let num_vehicles = args
        .vehicles
        .unwrap_or_else(|| ((total_demand / args.capacity * 1.2).ceil() as usize).max(5));
    let shift = VehicleShift::new(args.shift_start, args.shift_start + args.shift_length);
    let vehicles = (0..num_vehicles)
        .map(|index| JsonVehicle {
            id: format!("vehicle-{index}"),
            capacity: args.capacity,
            shift,
        })
        .collect();

    Ok(ScenarioDocument {
        scenario: JsonScenario {
            id: Some(format!("generated-{}", args.seed)),
            depot_location_id: 0,
            travel_times,
            customers,
            vehicles,
            available_vehicles: None,
            costs: CostParams::default(),
        },
        weather: JsonWeatherModel {
            probabilities: Some(PerRegime::new(
                1.0 - args.rain_probability - args.storm_probability,
                args.rain_probability,
                args.storm_probability,
            )),
            ..JsonWeatherModel::default()
        },
    })
}

/// Whole minutes of haversine distance at urban speed plus the trip friction.
fn travel_time_matrix(points: &[Point]) -> Vec<Vec<f64>> {
    let mut matrix = vec![vec![0.0; points.len()]; points.len()];

    for from in 0..points.len() {
        for to in (from + 1)..points.len() {
            let kilometers = Haversine.distance(points[from], points[to]) / 1000.0;
            let minutes = (kilometers / URBAN_SPEED_KMH * 60.0 + TRIP_FRICTION_MINUTES).round();
            matrix[from][to] = minutes;
            matrix[to][from] = minutes;
        }
    }

    matrix
}
