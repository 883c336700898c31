use std::path::Path;

use anyhow::Context;
use iris_optimizer::json::types::JsonScenario;
use iris_simulation::json::JsonWeatherModel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Scenario file read by `iris run` and written by `iris generate scenario`.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ScenarioDocument {
    pub scenario: JsonScenario,
    #[serde(default)]
    pub weather: JsonWeatherModel,
}

impl ScenarioDocument {
    pub fn read(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read scenario file {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("invalid scenario file {}", path.display()))
    }

    pub fn write(&self, path: &Path) -> Result<(), anyhow::Error> {
        write_json(path, self)
    }
}

pub fn write_json(path: &Path, value: &impl Serialize) -> Result<(), anyhow::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, serde_json::to_string_pretty(value)?)
        .with_context(|| format!("could not write {}", path.display()))
}

pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schemars::schema_for!(ScenarioDocument))
}
