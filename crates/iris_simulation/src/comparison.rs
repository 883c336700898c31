use iris_optimizer::{
    plan::route_plan::RoutePlan, problem::scenario::Scenario, time::DurationExt,
};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    simulation::{
        outcome_report::OutcomeReport, simulation_error::SimulationError, simulator::Simulator,
    },
    weather::weather_model::WeatherModel,
};

/// Whether both plans face the same weather draw.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSharing {
    /// One timeline for both plans, the saving only reflects the plans.
    #[default]
    Shared,
    /// One timeline per plan, both derived from the comparison seed.
    Independent,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub sharing: WeatherSharing,
    pub optimized_seed: u64,
    pub baseline_seed: u64,
    pub optimized: OutcomeReport,
    pub baseline: OutcomeReport,
    /// Baseline total cost minus optimized total cost.
    pub saving: f64,
    /// Saving relative to the baseline total cost, zero when that cost is zero.
    pub saving_ratio: f64,
    pub coverage: CoverageGap,
}

/// Demand each plan leaves undelivered. Unserved customers cost nothing, the
/// saving only compares equal work when both plans serve the same customers.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CoverageGap {
    pub optimized_unserved: usize,
    pub baseline_unserved: usize,
    pub optimized_unserved_demand: f64,
    pub baseline_unserved_demand: f64,
    pub same_customers_served: bool,
}

impl CoverageGap {
    fn new(scenario: &Scenario, optimized: &OutcomeReport, baseline: &OutcomeReport) -> Self {
        let unserved_demand = |report: &OutcomeReport| -> f64 {
            report
                .unserved
                .iter()
                .map(|&customer_id| scenario.customer(customer_id).demand())
                .sum()
        };

        let mut optimized_unserved = optimized.unserved.clone();
        let mut baseline_unserved = baseline.unserved.clone();
        optimized_unserved.sort_unstable();
        baseline_unserved.sort_unstable();

        CoverageGap {
            optimized_unserved: optimized_unserved.len(),
            baseline_unserved: baseline_unserved.len(),
            optimized_unserved_demand: unserved_demand(optimized),
            baseline_unserved_demand: unserved_demand(baseline),
            same_customers_served: optimized_unserved == baseline_unserved,
        }
    }
}

impl ComparisonReport {
    fn new(
        sharing: WeatherSharing,
        (optimized_seed, baseline_seed): (u64, u64),
        optimized: OutcomeReport,
        baseline: OutcomeReport,
        coverage: CoverageGap,
    ) -> Self {
        let saving = baseline.total_cost() - optimized.total_cost();
        let saving_ratio = if baseline.total_cost() > 0.0 {
            saving / baseline.total_cost()
        } else {
            0.0
        };

        ComparisonReport {
            sharing,
            optimized_seed,
            baseline_seed,
            optimized,
            baseline,
            saving,
            saving_ratio,
            coverage,
        }
    }
}

/// Aggregate of many comparisons drawn from consecutive seeds.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReplicationSummary {
    pub replications: usize,
    pub mean_optimized_cost: f64,
    pub mean_baseline_cost: f64,
    pub mean_saving: f64,
    pub min_saving: f64,
    /// Share of replications where the optimized plan was not more expensive.
    pub non_negative_saving_share: f64,
    pub mean_optimized_lateness_minutes: f64,
    pub mean_baseline_lateness_minutes: f64,
}

impl ReplicationSummary {
    fn from_reports(reports: &[ComparisonReport]) -> Self {
        let replications = reports.len();
        let mean = |value: &dyn Fn(&ComparisonReport) -> f64| {
            if replications == 0 {
                0.0
            } else {
                reports.iter().map(value).sum::<f64>() / replications as f64
            }
        };
        let lateness = |report: &OutcomeReport| report.totals.total_lateness.as_minutes_f64();

        ReplicationSummary {
            replications,
            mean_optimized_cost: mean(&|report| report.optimized.total_cost()),
            mean_baseline_cost: mean(&|report| report.baseline.total_cost()),
            mean_saving: mean(&|report| report.saving),
            min_saving: reports
                .iter()
                .map(|report| report.saving)
                .reduce(f64::min)
                .unwrap_or(0.0),
            non_negative_saving_share: mean(&|report| {
                if report.saving >= 0.0 { 1.0 } else { 0.0 }
            }),
            mean_optimized_lateness_minutes: mean(&|report| lateness(&report.optimized)),
            mean_baseline_lateness_minutes: mean(&|report| lateness(&report.baseline)),
        }
    }
}

/// Simulates an optimized and a baseline plan of the same scenario.
pub struct PlanComparison<'a> {
    scenario: &'a Scenario,
    weather: &'a WeatherModel,
    seed: u64,
    sharing: WeatherSharing,
}

impl<'a> PlanComparison<'a> {
    pub fn new(scenario: &'a Scenario, weather: &'a WeatherModel) -> Self {
        PlanComparison {
            scenario,
            weather,
            seed: 0,
            sharing: WeatherSharing::default(),
        }
    }

    pub fn set_seed(&mut self, seed: u64) -> &mut PlanComparison<'a> {
        self.seed = seed;
        self
    }

    pub fn set_sharing(&mut self, sharing: WeatherSharing) -> &mut PlanComparison<'a> {
        self.sharing = sharing;
        self
    }

    fn seeds(&self, seed: u64) -> (u64, u64) {
        match self.sharing {
            WeatherSharing::Shared => (seed, seed),
            WeatherSharing::Independent => {
                let mut rng = SmallRng::seed_from_u64(seed);
                (rng.random(), rng.random())
            }
        }
    }

    /// Both simulations run in parallel, each on its own timeline.
    #[instrument(skip_all, level = "debug")]
    pub fn run(
        &self,
        optimized: &RoutePlan,
        baseline: &RoutePlan,
    ) -> Result<ComparisonReport, SimulationError> {
        let report = self.run_with_seed(self.seed, optimized, baseline)?;
        if !report.coverage.same_customers_served {
            warn!(
                optimized_unserved = report.coverage.optimized_unserved,
                baseline_unserved = report.coverage.baseline_unserved,
                "The plans serve different customers, the saving compares unequal work"
            );
        }

        info!(
            optimized_cost = report.optimized.total_cost(),
            baseline_cost = report.baseline.total_cost(),
            saving = report.saving,
            "Comparison finished"
        );

        Ok(report)
    }

    /// Runs `replications` comparisons on the seeds following the comparison seed.
    #[instrument(skip_all, level = "debug")]
    pub fn replicate(
        &self,
        optimized: &RoutePlan,
        baseline: &RoutePlan,
        replications: usize,
    ) -> Result<ReplicationSummary, SimulationError> {
        let reports = (0..replications)
            .into_par_iter()
            .map(|replication| {
                self.run_with_seed(self.seed.wrapping_add(replication as u64), optimized, baseline)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let summary = ReplicationSummary::from_reports(&reports);
        info!(
            replications,
            mean_saving = summary.mean_saving,
            non_negative_saving_share = summary.non_negative_saving_share,
            "Replications finished"
        );

        Ok(summary)
    }

    fn run_with_seed(
        &self,
        seed: u64,
        optimized: &RoutePlan,
        baseline: &RoutePlan,
    ) -> Result<ComparisonReport, SimulationError> {
        let horizon = self.scenario.horizon_end();
        let simulator = Simulator::new(self.scenario);
        let seeds = self.seeds(seed);

        let (optimized_report, baseline_report) = rayon::join(
            || simulator.run(optimized, self.weather.timeline(seeds.0, horizon)),
            || simulator.run(baseline, self.weather.timeline(seeds.1, horizon)),
        );

        let (optimized_report, baseline_report) = (optimized_report?, baseline_report?);
        let coverage = CoverageGap::new(self.scenario, &optimized_report, &baseline_report);

        Ok(ComparisonReport::new(
            self.sharing,
            seeds,
            optimized_report,
            baseline_report,
            coverage,
        ))
    }
}
