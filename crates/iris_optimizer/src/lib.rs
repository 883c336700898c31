pub mod baseline;
pub mod json;
pub mod plan;
pub mod problem;
pub mod solver;
mod utils;

pub use utils::time;

#[cfg(test)]
pub(crate) mod test_utils;
