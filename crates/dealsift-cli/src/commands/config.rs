//! Config command - print the default configuration.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use dealsift::PipelineConfig;

pub fn run(output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let text = serde_json::to_string_pretty(&PipelineConfig::default())?;

    match output {
        Some(path) => {
            fs::write(&path, format!("{}\n", text))?;
            println!(
                "{} {}",
                "Saved to".green().bold(),
                path.display().to_string().white()
            );
        }
        None => println!("{}", text),
    }

    Ok(())
}
