pub mod costs;
pub mod customer;
pub mod distance_matrix;
pub mod fleet;
pub mod location;
pub mod scenario;
pub mod scenario_error;
pub mod time_window;
pub mod vehicle;
