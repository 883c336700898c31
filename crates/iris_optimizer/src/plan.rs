pub mod fleet_utilization;
pub mod plan_error;
pub mod route_plan;
pub mod route_schedule;
