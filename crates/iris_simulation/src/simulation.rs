pub mod event;
pub mod outcome_report;
pub mod simulation_error;
pub mod simulator;
pub mod weather_track;
