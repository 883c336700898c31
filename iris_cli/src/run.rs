use std::path::PathBuf;

use clap::{Args, ValueEnum};
use iris_optimizer::{
    baseline::BaselineBuilder,
    plan::route_plan::RoutePlan,
    solver::{
        optimization_result::OptimizationResult,
        optimizer::RouteOptimizer,
        optimizer_params::{OptimizerParams, Termination, Threads, TimeWindowMode},
    },
};
use iris_simulation::comparison::{
    ComparisonReport, PlanComparison, ReplicationSummary, WeatherSharing,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    parsers, report,
    scenario_file::{self, ScenarioDocument},
};

#[derive(Clone, Copy, ValueEnum)]
enum SharingArg {
    /// Both plans face the same weather draw
    Shared,
    /// Each plan gets its own draw
    Independent,
}

impl From<SharingArg> for WeatherSharing {
    fn from(value: SharingArg) -> Self {
        match value {
            SharingArg::Shared => WeatherSharing::Shared,
            SharingArg::Independent => WeatherSharing::Independent,
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// The scenario file
    #[arg(short = 'i', long)]
    input: PathBuf,

    #[arg(short, long, value_parser = parsers::parse_duration, default_value = "10s")]
    duration: jiff::SignedDuration,

    #[arg(long, short = 'n')]
    iterations: Option<usize>,

    /// Search threads, 0 uses every available core
    #[arg(long, default_value_t = 1)]
    threads: u8,

    /// Lateness penalty per minute, makes time windows soft
    #[arg(long)]
    soft_windows: Option<f64>,

    /// Seed of the weather draw
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Seed of the baseline tie-breaking, defaults to the weather seed
    #[arg(long)]
    baseline_seed: Option<u64>,

    #[arg(long, default_value_t = 0.0)]
    baseline_noise: f64,

    #[arg(long, value_enum, default_value_t = SharingArg::Shared)]
    weather_sharing: SharingArg,

    /// Additional comparisons on consecutive seeds
    #[arg(long, default_value_t = 0)]
    replications: usize,

    /// Writes the full run report as JSON
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct RunReport<'a> {
    scenario_id: Option<&'a str>,
    optimization: &'a OptimizationResult,
    baseline: &'a RoutePlan,
    comparison: &'a ComparisonReport,
    replications: Option<&'a ReplicationSummary>,
}

impl RunArgs {
    fn optimizer_params(&self) -> OptimizerParams {
        let mut terminations = vec![Termination::Duration(self.duration)];
        if let Some(iterations) = self.iterations {
            terminations.push(Termination::Iterations(iterations));
        }

        OptimizerParams {
            terminations,
            search_threads: match self.threads {
                0 => Threads::Auto,
                1 => Threads::Single,
                threads => Threads::Multi(threads as usize),
            },
            time_windows: match self.soft_windows {
                Some(penalty_per_minute) => TimeWindowMode::Soft { penalty_per_minute },
                None => TimeWindowMode::Hard,
            },
            ..OptimizerParams::default()
        }
    }
}

pub fn run(args: RunArgs) -> Result<(), anyhow::Error> {
    let document = ScenarioDocument::read(&args.input)?;
    let scenario_id = document.scenario.id.clone();
    let scenario = document.scenario.build_scenario()?;
    let weather = document.weather.build_weather_model()?;

    info!(
        customers = scenario.customers().len(),
        vehicles = scenario.fleet().len(),
        "Scenario loaded from {}",
        args.input.display()
    );

    let optimizer = RouteOptimizer::new(args.optimizer_params());
    let result = optimizer.optimize(&scenario);
    if !result.is_feasible() {
        warn!(
            violations = result.violations.len(),
            unserved = result.plan.unassigned().len(),
            relaxed = result.relaxed,
            "The optimized plan breaks nominal constraints"
        );
    }

    let mut baseline_builder = BaselineBuilder::new(args.baseline_seed.unwrap_or(args.seed));
    baseline_builder.set_noise(args.baseline_noise);
    let baseline = baseline_builder.build(&scenario);

    let mut comparison = PlanComparison::new(&scenario, &weather);
    comparison
        .set_seed(args.seed)
        .set_sharing(args.weather_sharing.into());
    let comparison_report = comparison.run(&result.plan, &baseline)?;
    let replications = if args.replications > 0 {
        Some(comparison.replicate(&result.plan, &baseline, args.replications)?)
    } else {
        None
    };

    println!("Optimized routes");
    println!("{}", report::build_routes_table(&result.plan));
    if let Some(issues) = report::build_issues_table(&result) {
        println!("{issues}");
    }
    println!("Baseline routes");
    println!("{}", report::build_routes_table(&baseline));
    println!("{}", report::build_comparison_table(&comparison_report));
    println!("{}", report::build_saving_table(&comparison_report));
    if let Some(summary) = &replications {
        println!("{}", report::build_replications_table(summary));
    }

    if let Some(output) = &args.output {
        scenario_file::write_json(
            output,
            &RunReport {
                scenario_id: scenario_id.as_deref(),
                optimization: &result,
                baseline: &baseline,
                comparison: &comparison_report,
                replications: replications.as_ref(),
            },
        )?;
        info!("Run report written to {}", output.display());
    }

    Ok(())
}
