use jiff::SignedDuration;
use rand::{SeedableRng, rngs::SmallRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{weather_model::WeatherModel, weather_regime::WeatherRegime};

/// Regime in force from `start` until the start of the next segment.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq)]
pub struct WeatherSegment {
    pub regime: WeatherRegime,
    pub start: SignedDuration,
    pub multiplier: f64,
}

/// Lazily drawn regime changes tiling `[0, horizon]`.
///
/// The regime is re-rolled at every model interval, consecutive equal draws are
/// merged, so segments are only emitted on an actual change. The last segment
/// holds past the horizon. At least one segment is always produced.
pub struct WeatherTimeline<'a> {
    model: &'a WeatherModel,
    rng: SmallRng,
    horizon: SignedDuration,
    pending: Option<WeatherSegment>,
    next_draw: SignedDuration,
}

impl<'a> WeatherTimeline<'a> {
    pub(crate) fn new(model: &'a WeatherModel, seed: u64, horizon: SignedDuration) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let initial = model.draw_initial(&mut rng);

        WeatherTimeline {
            model,
            rng,
            horizon,
            pending: Some(model.segment(initial, SignedDuration::ZERO)),
            next_draw: model.interval(),
        }
    }

    pub fn horizon(&self) -> SignedDuration {
        self.horizon
    }
}

impl Iterator for WeatherTimeline<'_> {
    type Item = WeatherSegment;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.pending.take()?;

        while self.next_draw < self.horizon {
            let start = self.next_draw;
            let regime = self.model.draw_next(current.regime, &mut self.rng);
            self.next_draw += self.model.interval();

            if regime != current.regime {
                self.pending = Some(self.model.segment(regime, start));
                break;
            }
        }

        Some(current)
    }
}

impl std::iter::FusedIterator for WeatherTimeline<'_> {}
