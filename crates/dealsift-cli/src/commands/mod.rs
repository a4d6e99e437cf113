//! CLI command implementations.

pub mod config;
pub mod detect;
pub mod run;

use std::path::Path;

use dealsift::PipelineConfig;

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(p) => PipelineConfig::from_file(p)?,
        None => PipelineConfig::default(),
    };
    log::debug!("configuration: {:?}", config);
    Ok(config)
}
