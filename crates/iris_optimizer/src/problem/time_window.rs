use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::time::positive_part;

/// Arrival window `[earliest, latest]`, both expressed as offsets from the start
/// of the planning day.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    earliest: SignedDuration,
    latest: SignedDuration,
}

impl TimeWindow {
    pub fn new(earliest: SignedDuration, latest: SignedDuration) -> Self {
        TimeWindow { earliest, latest }
    }

    pub fn from_mins(earliest: i64, latest: i64) -> Self {
        TimeWindow {
            earliest: SignedDuration::from_mins(earliest),
            latest: SignedDuration::from_mins(latest),
        }
    }

    pub fn earliest(&self) -> SignedDuration {
        self.earliest
    }

    pub fn latest(&self) -> SignedDuration {
        self.latest
    }

    pub fn is_valid(&self) -> bool {
        self.earliest <= self.latest
    }

    pub fn is_satisfied(&self, arrival: SignedDuration) -> bool {
        arrival <= self.latest
    }

    pub fn lateness(&self, arrival: SignedDuration) -> SignedDuration {
        positive_part(arrival - self.latest)
    }

    /// Vehicles arriving early wait for the window to open.
    pub fn service_start(&self, arrival: SignedDuration) -> SignedDuration {
        arrival.max(self.earliest)
    }
}
