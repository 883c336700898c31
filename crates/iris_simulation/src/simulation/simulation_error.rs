use iris_optimizer::plan::plan_error::PlanError;
use jiff::SignedDuration;
use thiserror::Error;

use crate::weather::weather_regime::WeatherRegime;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid route plan: {0}")]
    InvalidPlan(#[from] PlanError),

    #[error("weather timeline has no segment")]
    EmptyTimeline,

    #[error("weather segment starting at {start} does not follow the one starting at {previous}")]
    UnorderedTimeline {
        previous: SignedDuration,
        start: SignedDuration,
    },

    #[error("weather segment {regime} has multiplier {multiplier}, it must be finite and at least 1")]
    InvalidMultiplier {
        regime: WeatherRegime,
        multiplier: f64,
    },
}
