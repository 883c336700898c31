use jiff::SignedDuration;
use thiserror::Error;

/// Field-level reasons a scenario is rejected before any optimization starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScenarioError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("scenario has no vehicles")]
    EmptyFleet,

    #[error("available vehicles must be between 1 and {fleet_size}, got {ceiling}")]
    InvalidVehicleCeiling { ceiling: usize, fleet_size: usize },

    #[error("distance matrix is empty")]
    EmptyMatrix,

    #[error("distance matrix row {row} has {len} entries, expected {expected}")]
    NonSquareMatrix {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("travel time from {from} to {to} must be between 0 and one week in minutes, got {value}")]
    InvalidTravelTime { from: usize, to: usize, value: f64 },

    #[error("distance matrix is not symmetric: {from}->{to} is {forward}, {to}->{from} is {backward}")]
    AsymmetricMatrix {
        from: usize,
        to: usize,
        forward: f64,
        backward: f64,
    },

    #[error("{entity} `{id}` references location {location}, the matrix only has {locations}")]
    LocationOutOfBounds {
        entity: &'static str,
        id: String,
        location: usize,
        locations: usize,
    },

    #[error("customer `{id}` demand must be finite and non-negative, got {demand}")]
    InvalidDemand { id: String, demand: f64 },

    #[error("customer `{id}` service duration must be non-negative, got {duration}")]
    NegativeServiceDuration { id: String, duration: SignedDuration },

    #[error("customer `{id}` time window opens at {earliest} after it closes at {latest}")]
    InvertedTimeWindow {
        id: String,
        earliest: SignedDuration,
        latest: SignedDuration,
    },

    #[error("vehicle `{id}` capacity must be finite and positive, got {capacity}")]
    InvalidCapacity { id: String, capacity: f64 },

    #[error("vehicle `{id}` shift starts at {start} after it ends at {end}")]
    InvertedShift {
        id: String,
        start: SignedDuration,
        end: SignedDuration,
    },

    #[error("duplicate {entity} id `{id}`")]
    DuplicateId { entity: &'static str, id: String },

    #[error("cost parameter `{field}` must be finite and non-negative, got {value}")]
    InvalidCost { field: &'static str, value: f64 },
}
