//! Detect command - show the column mapping for an export.

use std::path::PathBuf;

use colored::Colorize;
use dealsift::{CanonicalField, Sifter};

use super::load_config;

pub fn run(
    file: PathBuf,
    config: Option<PathBuf>,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let sifter = Sifter::with_config(load_config(config.as_deref())?);
    let detection = sifter.detect_file(&file)?;

    if json {
        let output = serde_json::json!({
            "mapping": detection.mapping.report(),
            "warnings": detection.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Detected".cyan().bold(),
        file.display().to_string().white()
    );
    println!();

    // Every mapped field when verbose, the reported subset otherwise
    let fields: Vec<CanonicalField> = if verbose {
        CanonicalField::all().filter(|f| detection.mapping.contains(*f)).collect()
    } else {
        CanonicalField::REPORTED.to_vec()
    };
    for field in fields {
        match detection.mapping.get(field) {
            Some(column) => {
                let mut line = format!("  {:18} {}", field.to_string(), column.column.white());
                if verbose {
                    line.push_str(&format!(" ({:.1})", column.score).dimmed().to_string());
                }
                println!("{}", line);
            }
            None => println!("  {:18} {}", field.to_string(), "-".dimmed()),
        }
    }

    if !detection.warnings.is_empty() {
        println!();
        for warning in &detection.warnings {
            println!("{} {}", "warning:".yellow().bold(), warning);
        }
    }

    Ok(())
}
