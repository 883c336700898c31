pub mod construct_solution;
pub mod insertion;
