pub mod constraints;
pub mod construction;
pub mod fleet_search;
pub mod ls;
pub mod objective;
pub mod optimization_result;
pub mod optimizer;
pub mod optimizer_params;
pub mod score;
pub mod score_level;
pub mod search_budget;
pub mod solution;
