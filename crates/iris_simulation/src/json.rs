use jiff::SignedDuration;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};

use crate::weather::{
    weather_model::WeatherModel, weather_model_error::WeatherModelError,
    weather_regime::PerRegime,
};

/// Serialized weather model. Every field is optional and falls back to the
/// default model: 70% clear, 20% light rain, 10% severe storm, re-rolled every
/// 30 minutes.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields, rename = "WeatherModel")]
pub struct JsonWeatherModel {
    pub probabilities: Option<PerRegime<f64>>,
    pub multipliers: Option<PerRegime<f64>>,
    pub initial_distribution: Option<PerRegime<f64>>,
    /// Next-regime distribution per current regime, overrides `persistence`.
    pub transitions: Option<PerRegime<PerRegime<f64>>>,
    pub persistence: Option<f64>,
    pub interval: Option<SignedDuration>,
}

impl JsonWeatherModel {
    pub fn build_weather_model(self) -> Result<WeatherModel, WeatherModelError> {
        let mut builder = WeatherModel::builder();

        if let Some(probabilities) = self.probabilities {
            builder.set_probabilities(probabilities);
        }
        if let Some(multipliers) = self.multipliers {
            builder.set_multipliers(multipliers);
        }
        if let Some(initial_distribution) = self.initial_distribution {
            builder.set_initial_distribution(initial_distribution);
        }
        if let Some(transitions) = self.transitions {
            builder.set_transitions(transitions);
        }
        if let Some(persistence) = self.persistence {
            builder.set_persistence(persistence);
        }
        if let Some(interval) = self.interval {
            builder.set_interval(interval);
        }

        builder.build()
    }
}

impl From<&WeatherModel> for JsonWeatherModel {
    fn from(model: &WeatherModel) -> Self {
        JsonWeatherModel {
            probabilities: None,
            multipliers: Some(*model.multipliers()),
            initial_distribution: Some(*model.initial_distribution()),
            transitions: Some(*model.transitions()),
            persistence: None,
            interval: Some(model.interval()),
        }
    }
}

pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(JsonWeatherModel))
}

#[cfg(test)]
mod tests {
    use crate::weather::weather_regime::WeatherRegime;

    use super::*;

    #[test]
    fn test_empty_document_is_default_model() {
        let json: JsonWeatherModel = serde_json::from_str("{}").unwrap();

        assert_eq!(json.build_weather_model().unwrap(), WeatherModel::default());
    }

    #[test]
    fn test_parse_probabilities() {
        let json: JsonWeatherModel = serde_json::from_str(
            r#"{
                "probabilities": { "clear": 0.8, "light_rain": 0.15, "severe_storm": 0.05 },
                "interval": "PT15M"
            }"#,
        )
        .unwrap();
        let model = json.build_weather_model().unwrap();

        assert_eq!(model.interval(), SignedDuration::from_mins(15));
        assert_eq!(model.initial_distribution().severe_storm, 0.05);
        assert_eq!(model.multiplier(WeatherRegime::SevereStorm), 1.6);
    }

    #[test]
    fn test_model_round_trips() {
        let mut builder = WeatherModel::builder();
        builder.set_persistence(0.3);
        let model = builder.build().unwrap();

        let serialized = serde_json::to_string(&JsonWeatherModel::from(&model)).unwrap();
        let parsed: JsonWeatherModel = serde_json::from_str(&serialized).unwrap();

        assert_eq!(parsed.build_weather_model().unwrap(), model);
    }

    #[test]
    fn test_invalid_probabilities_are_reported() {
        let json: JsonWeatherModel = serde_json::from_str(
            r#"{ "probabilities": { "clear": 0.8, "light_rain": 0.3, "severe_storm": 0.05 } }"#,
        )
        .unwrap();

        assert!(matches!(
            json.build_weather_model(),
            Err(WeatherModelError::DistributionSum { .. })
        ));
    }

    #[test]
    fn test_schema_generation() {
        assert!(generate_json_schema().unwrap().contains("severe_storm"));
    }
}
