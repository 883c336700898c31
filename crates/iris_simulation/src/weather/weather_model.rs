use jiff::SignedDuration;
use rand::{Rng, rngs::SmallRng};

use super::{
    weather_model_error::WeatherModelError,
    weather_regime::{PerRegime, WeatherRegime},
    weather_timeline::{WeatherSegment, WeatherTimeline},
};

const PROBABILITY_TOLERANCE: f64 = 1e-6;

pub const DEFAULT_INTERVAL: SignedDuration = SignedDuration::from_mins(30);

pub const DEFAULT_MULTIPLIERS: PerRegime<f64> = PerRegime {
    clear: 1.0,
    light_rain: 1.25,
    severe_storm: 1.6,
};

pub const DEFAULT_PROBABILITIES: PerRegime<f64> = PerRegime {
    clear: 0.7,
    light_rain: 0.2,
    severe_storm: 0.1,
};

/// Markov chain over weather regimes, re-rolled every `interval`.
///
/// Row `from` of `transitions` is the distribution of the next regime given the
/// current one. Multipliers scale the base travel time and are never below 1.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherModel {
    multipliers: PerRegime<f64>,
    initial_distribution: PerRegime<f64>,
    transitions: PerRegime<PerRegime<f64>>,
    interval: SignedDuration,
}

impl Default for WeatherModel {
    fn default() -> Self {
        WeatherModel {
            multipliers: DEFAULT_MULTIPLIERS,
            initial_distribution: DEFAULT_PROBABILITIES,
            transitions: stationary_transitions(&DEFAULT_PROBABILITIES, 0.0),
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl WeatherModel {
    pub fn builder() -> WeatherModelBuilder {
        WeatherModelBuilder::default()
    }

    /// Same regime for the whole day.
    pub fn constant(regime: WeatherRegime) -> Self {
        let one_hot = |target: WeatherRegime| {
            PerRegime::from_fn(|other| if other == target { 1.0 } else { 0.0 })
        };

        WeatherModel {
            multipliers: DEFAULT_MULTIPLIERS,
            initial_distribution: one_hot(regime),
            transitions: PerRegime::from_fn(one_hot),
            interval: DEFAULT_INTERVAL,
        }
    }

    pub fn multiplier(&self, regime: WeatherRegime) -> f64 {
        self.multipliers[regime]
    }

    pub fn multipliers(&self) -> &PerRegime<f64> {
        &self.multipliers
    }

    pub fn initial_distribution(&self) -> &PerRegime<f64> {
        &self.initial_distribution
    }

    pub fn transitions(&self) -> &PerRegime<PerRegime<f64>> {
        &self.transitions
    }

    pub fn interval(&self) -> SignedDuration {
        self.interval
    }

    /// Draws a timeline covering `[0, horizon]` from a dedicated random stream.
    pub fn timeline(&self, seed: u64, horizon: SignedDuration) -> WeatherTimeline<'_> {
        WeatherTimeline::new(self, seed, horizon)
    }

    pub(crate) fn segment(&self, regime: WeatherRegime, start: SignedDuration) -> WeatherSegment {
        WeatherSegment {
            regime,
            start,
            multiplier: self.multiplier(regime),
        }
    }

    pub(crate) fn draw_initial(&self, rng: &mut SmallRng) -> WeatherRegime {
        sample(&self.initial_distribution, rng.random::<f64>())
    }

    pub(crate) fn draw_next(&self, current: WeatherRegime, rng: &mut SmallRng) -> WeatherRegime {
        sample(&self.transitions[current], rng.random::<f64>())
    }
}

/// Inverse CDF walked from the most severe regime down, so that moving
/// probability mass towards severe regimes never turns a draw milder.
fn sample(distribution: &PerRegime<f64>, draw: f64) -> WeatherRegime {
    let mut cumulative = 0.0;
    for regime in WeatherRegime::ALL.into_iter().rev() {
        cumulative += distribution[regime];
        if draw < cumulative {
            return regime;
        }
    }

    WeatherRegime::Clear
}

/// Keeps the current regime with probability `persistence`, otherwise redraws it
/// from `probabilities`.
fn stationary_transitions(
    probabilities: &PerRegime<f64>,
    persistence: f64,
) -> PerRegime<PerRegime<f64>> {
    PerRegime::from_fn(|from| {
        PerRegime::from_fn(|to| {
            let stay = if from == to { persistence } else { 0.0 };
            stay + (1.0 - persistence) * probabilities[to]
        })
    })
}

fn validate_distribution(
    distribution: &PerRegime<f64>,
    name: impl Fn() -> String,
) -> Result<(), WeatherModelError> {
    for (regime, &probability) in distribution.iter() {
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(WeatherModelError::InvalidProbability {
                distribution: name(),
                regime,
                probability,
            });
        }
    }

    let sum: f64 = distribution.iter().map(|(_, probability)| probability).sum();
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(WeatherModelError::DistributionSum {
            distribution: name(),
            sum,
        });
    }

    Ok(())
}

#[derive(Default)]
pub struct WeatherModelBuilder {
    multipliers: Option<PerRegime<f64>>,
    probabilities: Option<PerRegime<f64>>,
    initial_distribution: Option<PerRegime<f64>>,
    transitions: Option<PerRegime<PerRegime<f64>>>,
    persistence: Option<f64>,
    interval: Option<SignedDuration>,
}

impl WeatherModelBuilder {
    pub fn set_multipliers(&mut self, multipliers: PerRegime<f64>) -> &mut WeatherModelBuilder {
        self.multipliers = Some(multipliers);
        self
    }

    /// Occurrence probability of each regime, used for the initial draw and for
    /// every re-roll unless explicit transitions are set.
    pub fn set_probabilities(&mut self, probabilities: PerRegime<f64>) -> &mut WeatherModelBuilder {
        self.probabilities = Some(probabilities);
        self
    }

    pub fn set_initial_distribution(
        &mut self,
        initial_distribution: PerRegime<f64>,
    ) -> &mut WeatherModelBuilder {
        self.initial_distribution = Some(initial_distribution);
        self
    }

    pub fn set_transitions(
        &mut self,
        transitions: PerRegime<PerRegime<f64>>,
    ) -> &mut WeatherModelBuilder {
        self.transitions = Some(transitions);
        self
    }

    /// Probability of keeping the current regime at a re-roll, on top of drawing
    /// it again from the occurrence probabilities. Ignored with explicit transitions.
    pub fn set_persistence(&mut self, persistence: f64) -> &mut WeatherModelBuilder {
        self.persistence = Some(persistence);
        self
    }

    pub fn set_interval(&mut self, interval: SignedDuration) -> &mut WeatherModelBuilder {
        self.interval = Some(interval);
        self
    }

    pub fn build(self) -> Result<WeatherModel, WeatherModelError> {
        let multipliers = self.multipliers.unwrap_or(DEFAULT_MULTIPLIERS);
        for (regime, &multiplier) in multipliers.iter() {
            if !multiplier.is_finite() || multiplier < 1.0 {
                return Err(WeatherModelError::InvalidMultiplier { regime, multiplier });
            }
        }

        let probabilities = self.probabilities.unwrap_or(DEFAULT_PROBABILITIES);
        validate_distribution(&probabilities, || String::from("probabilities"))?;

        let persistence = self.persistence.unwrap_or(0.0);
        if !persistence.is_finite() || !(0.0..=1.0).contains(&persistence) {
            return Err(WeatherModelError::InvalidPersistence(persistence));
        }

        let initial_distribution = self.initial_distribution.unwrap_or(probabilities);
        validate_distribution(&initial_distribution, || {
            String::from("initial_distribution")
        })?;

        let transitions = self
            .transitions
            .unwrap_or_else(|| stationary_transitions(&probabilities, persistence));
        for (from, row) in transitions.iter() {
            validate_distribution(row, || format!("transitions from {from}"))?;
        }

        let interval = self.interval.unwrap_or(DEFAULT_INTERVAL);
        if !interval.is_positive() {
            return Err(WeatherModelError::InvalidInterval(interval));
        }

        Ok(WeatherModel {
            multipliers,
            initial_distribution,
            transitions,
            interval,
        })
    }
}
