use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How arrival windows enter the objective.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Copy, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimeWindowMode {
    /// Late arrivals are violations, the optimizer leaves a customer unserved
    /// rather than arrive late.
    Hard,
    /// Late arrivals cost `penalty_per_minute` for every minute past the window.
    Soft { penalty_per_minute: f64 },
}

#[derive(Clone, Debug)]
pub struct OptimizerParams {
    pub terminations: Vec<Termination>,
    pub search_threads: Threads,
    pub time_windows: TimeWindowMode,

    /// Lateness penalty used when no plan serves every customer under the
    /// configured windows and the search falls back to soft windows.
    pub relaxation_penalty_per_minute: f64,

    /// Overtime past the shift end tolerated before it becomes a violation.
    /// `None` leaves overtime unbounded, it is then only priced.
    pub max_overtime: Option<SignedDuration>,
}

impl Default for OptimizerParams {
    fn default() -> Self {
        OptimizerParams {
            terminations: vec![
                Termination::Iterations(20_000),
                Termination::Duration(SignedDuration::from_secs(10)),
            ],
            search_threads: Threads::Single,
            time_windows: TimeWindowMode::Hard,
            relaxation_penalty_per_minute: 10.0,
            max_overtime: Some(SignedDuration::from_mins(60)),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Termination {
    Duration(SignedDuration),
    Iterations(usize),
}

#[derive(Clone, Debug)]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => *num,
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}
