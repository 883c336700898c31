use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(
    Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "snake_case")]
pub enum WeatherRegime {
    Clear,
    LightRain,
    SevereStorm,
}

impl WeatherRegime {
    /// Every regime, from the mildest to the most severe.
    pub const ALL: [WeatherRegime; 3] = [
        WeatherRegime::Clear,
        WeatherRegime::LightRain,
        WeatherRegime::SevereStorm,
    ];

    pub fn regime_name(&self) -> &'static str {
        match self {
            WeatherRegime::Clear => "clear",
            WeatherRegime::LightRain => "light_rain",
            WeatherRegime::SevereStorm => "severe_storm",
        }
    }
}

impl std::fmt::Display for WeatherRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.regime_name())
    }
}

/// One value for every [`WeatherRegime`].
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Default)]
pub struct PerRegime<T> {
    pub clear: T,
    pub light_rain: T,
    pub severe_storm: T,
}

impl<T> PerRegime<T> {
    pub fn new(clear: T, light_rain: T, severe_storm: T) -> Self {
        PerRegime {
            clear,
            light_rain,
            severe_storm,
        }
    }

    pub fn from_fn(mut f: impl FnMut(WeatherRegime) -> T) -> Self {
        PerRegime {
            clear: f(WeatherRegime::Clear),
            light_rain: f(WeatherRegime::LightRain),
            severe_storm: f(WeatherRegime::SevereStorm),
        }
    }

    pub fn get(&self, regime: WeatherRegime) -> &T {
        match regime {
            WeatherRegime::Clear => &self.clear,
            WeatherRegime::LightRain => &self.light_rain,
            WeatherRegime::SevereStorm => &self.severe_storm,
        }
    }

    pub fn get_mut(&mut self, regime: WeatherRegime) -> &mut T {
        match regime {
            WeatherRegime::Clear => &mut self.clear,
            WeatherRegime::LightRain => &mut self.light_rain,
            WeatherRegime::SevereStorm => &mut self.severe_storm,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (WeatherRegime, &T)> {
        WeatherRegime::ALL
            .into_iter()
            .map(move |regime| (regime, self.get(regime)))
    }
}

impl<T> std::ops::Index<WeatherRegime> for PerRegime<T> {
    type Output = T;

    fn index(&self, regime: WeatherRegime) -> &Self::Output {
        self.get(regime)
    }
}

impl<T> std::ops::IndexMut<WeatherRegime> for PerRegime<T> {
    fn index_mut(&mut self, regime: WeatherRegime) -> &mut Self::Output {
        self.get_mut(regime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regimes_are_ordered_by_severity() {
        assert!(WeatherRegime::Clear < WeatherRegime::LightRain);
        assert!(WeatherRegime::LightRain < WeatherRegime::SevereStorm);
    }

    #[test]
    fn test_per_regime_indexing() {
        let mut values = PerRegime::new(1, 2, 3);
        values[WeatherRegime::LightRain] += 10;

        assert_eq!(values[WeatherRegime::LightRain], 12);
        assert_eq!(
            values.iter().map(|(_, value)| *value).collect::<Vec<_>>(),
            vec![1, 12, 3]
        );
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_string(&PerRegime::new(1.0, 1.25, 1.6)).unwrap();

        assert_eq!(json, r#"{"clear":1.0,"light_rain":1.25,"severe_storm":1.6}"#);
    }
}
