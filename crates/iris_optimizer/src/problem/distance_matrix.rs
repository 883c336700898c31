use std::sync::Arc;

use jiff::SignedDuration;

use crate::time::from_minutes_f64;

use super::{location::LocationIdx, scenario_error::ScenarioError};

const SYMMETRY_TOLERANCE: f64 = 1e-6;

/// Longest accepted trip, one week. Route sums stay far from the duration range.
pub const MAX_TRAVEL_MINUTES: f64 = 7.0 * 24.0 * 60.0;

/// Symmetric travel durations in minutes between every pair of locations, the
/// depot included.
///
/// Stored flat, `index = from * num_locations + to`. Cloning shares the storage.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    minutes: Arc<[f64]>,
    num_locations: usize,
}

impl DistanceMatrix {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ScenarioError> {
        let num_locations = rows.len();
        if num_locations == 0 {
            return Err(ScenarioError::EmptyMatrix);
        }

        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != num_locations {
                return Err(ScenarioError::NonSquareMatrix {
                    row: row_index,
                    len: row.len(),
                    expected: num_locations,
                });
            }

            for (column, &value) in row.iter().enumerate() {
                if !value.is_finite() || !(0.0..=MAX_TRAVEL_MINUTES).contains(&value) {
                    return Err(ScenarioError::InvalidTravelTime {
                        from: row_index,
                        to: column,
                        value,
                    });
                }
            }
        }

        for from in 0..num_locations {
            for to in (from + 1)..num_locations {
                let forward = rows[from][to];
                let backward = rows[to][from];
                if (forward - backward).abs() > SYMMETRY_TOLERANCE {
                    return Err(ScenarioError::AsymmetricMatrix {
                        from,
                        to,
                        forward,
                        backward,
                    });
                }
            }
        }

        Ok(DistanceMatrix {
            minutes: rows.into_iter().flatten().collect(),
            num_locations,
        })
    }

    #[inline]
    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    #[inline]
    pub fn travel_minutes(&self, from: LocationIdx, to: LocationIdx) -> f64 {
        self.minutes[from.get() * self.num_locations + to.get()]
    }

    #[inline]
    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> SignedDuration {
        from_minutes_f64(self.travel_minutes(from, to))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.minutes.chunks(self.num_locations)
    }
}
