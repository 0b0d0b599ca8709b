use springmesh_core::SimulationConfig;
use std::fs;
use std::path::Path;

/// Read and validate a TOML config, or fall back to the built-in scene
pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => {
            let source = fs::read_to_string(path.as_ref())?;
            parse(&source)?
        }
        None => SimulationConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

pub fn parse(source: &str) -> Result<SimulationConfig, toml::de::Error> {
    toml::from_str(source)
}
