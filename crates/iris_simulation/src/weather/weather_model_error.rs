use jiff::SignedDuration;
use thiserror::Error;

use super::weather_regime::WeatherRegime;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherModelError {
    #[error("multiplier of {regime} must be finite and at least 1, got {multiplier}")]
    InvalidMultiplier {
        regime: WeatherRegime,
        multiplier: f64,
    },

    #[error("probability of {regime} in {distribution} must be within [0, 1], got {probability}")]
    InvalidProbability {
        distribution: String,
        regime: WeatherRegime,
        probability: f64,
    },

    #[error("probabilities of {distribution} must sum to 1, got {sum}")]
    DistributionSum { distribution: String, sum: f64 },

    #[error("persistence must be within [0, 1], got {0}")]
    InvalidPersistence(f64),

    #[error("transition interval must be positive, got {0}")]
    InvalidInterval(SignedDuration),
}
