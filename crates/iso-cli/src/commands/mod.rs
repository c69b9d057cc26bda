pub mod calendar;
pub mod config;
pub mod demo;

use std::path::Path;

use iso_simulation::EngineConfig;

/// Read an engine configuration file, or the defaults when none is given.
fn load_config(path: Option<&Path>) -> Result<EngineConfig, String> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid config {}: {e}", path.display()))
}
