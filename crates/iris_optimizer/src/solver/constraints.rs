pub mod capacity_constraint;
pub mod constraint;
pub mod global_constraint;
pub mod route_constraint;
pub mod shift_constraint;
pub mod time_window_constraint;
pub mod transport_cost_constraint;
pub mod unassigned_customer_constraint;
pub mod vehicle_cost_constraint;
