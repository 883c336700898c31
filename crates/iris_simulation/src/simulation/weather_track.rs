use iris_optimizer::time::{self, DurationExt};
use jiff::SignedDuration;

use crate::weather::{
    weather_regime::{PerRegime, WeatherRegime},
    weather_timeline::WeatherSegment,
};

use super::simulation_error::SimulationError;

/// Weather experienced over one travel leg.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherTravel {
    pub duration: SignedDuration,
    /// Time-weighted mean multiplier over the leg.
    pub multiplier: f64,
    pub exposure: PerRegime<SignedDuration>,
    /// Regime the leg spent the most time under, the most severe on ties.
    pub dominant_regime: WeatherRegime,
}

/// Materialized weather timeline, queried by departure time.
#[derive(Debug, Clone)]
pub struct WeatherTrack {
    segments: Vec<WeatherSegment>,
    starts: Vec<f64>,
}

impl WeatherTrack {
    pub fn new(timeline: impl IntoIterator<Item = WeatherSegment>) -> Result<Self, SimulationError> {
        let segments: Vec<WeatherSegment> = timeline.into_iter().collect();

        if segments.is_empty() {
            return Err(SimulationError::EmptyTimeline);
        }

        for segment in &segments {
            if !segment.multiplier.is_finite() || segment.multiplier < 1.0 {
                return Err(SimulationError::InvalidMultiplier {
                    regime: segment.regime,
                    multiplier: segment.multiplier,
                });
            }
        }

        if let Some(pair) = segments.windows(2).find(|pair| pair[0].start >= pair[1].start) {
            return Err(SimulationError::UnorderedTimeline {
                previous: pair[0].start,
                start: pair[1].start,
            });
        }

        let starts = segments
            .iter()
            .map(|segment| segment.start.as_minutes_f64())
            .collect();

        Ok(WeatherTrack { segments, starts })
    }

    pub fn segments(&self) -> &[WeatherSegment] {
        &self.segments
    }

    /// Segment in force at `minutes`. The first segment also covers any earlier time.
    fn segment_index(&self, minutes: f64) -> usize {
        self.starts
            .partition_point(|&start| start <= minutes)
            .saturating_sub(1)
    }

    pub fn segment_at(&self, time: SignedDuration) -> &WeatherSegment {
        &self.segments[self.segment_index(time.as_minutes_f64())]
    }

    /// Realized travel of `base_minutes` leaving at `departure`.
    ///
    /// The realized duration `T` satisfies `T = base * m̄`, where `m̄` is the mean
    /// multiplier over `[departure, departure + T]`. Inside a segment of multiplier
    /// `m` that is a quadratic in `T`, solved segment after segment until its root
    /// falls before the next change.
    pub fn travel(&self, departure: SignedDuration, base_minutes: f64) -> WeatherTravel {
        let origin = departure.as_minutes_f64();
        let mut index = self.segment_index(origin);

        if base_minutes <= 0.0 {
            let segment = &self.segments[index];
            return WeatherTravel {
                duration: SignedDuration::ZERO,
                multiplier: segment.multiplier,
                exposure: PerRegime::default(),
                dominant_regime: segment.regime,
            };
        }

        let mut exposure = PerRegime::<f64>::default();
        let mut elapsed = 0.0;
        let mut integral = 0.0;

        loop {
            let segment = &self.segments[index];
            let multiplier = segment.multiplier;
            let b = base_minutes * multiplier;
            let c = base_minutes * (integral - multiplier * elapsed);
            let root = (b + (b * b + 4.0 * c).max(0.0).sqrt()) / 2.0;

            match self.starts.get(index + 1).map(|start| start - origin) {
                Some(segment_end) if root > segment_end => {
                    exposure[segment.regime] += segment_end - elapsed;
                    integral += multiplier * (segment_end - elapsed);
                    elapsed = segment_end;
                    index += 1;
                }
                _ => {
                    exposure[segment.regime] += root - elapsed;
                    elapsed = root;
                    break;
                }
            }
        }

        let mut dominant_regime = WeatherRegime::Clear;
        for regime in WeatherRegime::ALL {
            if exposure[regime] >= exposure[dominant_regime] {
                dominant_regime = regime;
            }
        }

        WeatherTravel {
            duration: time::from_minutes_f64(elapsed),
            multiplier: elapsed / base_minutes,
            exposure: PerRegime::from_fn(|regime| time::from_minutes_f64(exposure[regime])),
            dominant_regime,
        }
    }
}
