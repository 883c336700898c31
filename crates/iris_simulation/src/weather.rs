pub mod weather_model;
pub mod weather_model_error;
pub mod weather_regime;
pub mod weather_timeline;
