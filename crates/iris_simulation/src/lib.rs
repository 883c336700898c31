pub mod comparison;
pub mod json;
pub mod simulation;
pub mod weather;

#[cfg(test)]
pub(crate) mod test_utils;
