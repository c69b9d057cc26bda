use std::path::Path;

use iso_simulation::EngineConfig;

pub fn run(output: Option<&Path>) -> Result<(), String> {
    let json = serde_json::to_string_pretty(&EngineConfig::default()).map_err(|e| format!("serialization error: {e}"))?;

    match output {
        Some(path) => {
            std::fs::write(path, &json).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
            println!("  Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
