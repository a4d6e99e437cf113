//! Run command - detect, filter and deduplicate an export.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use colored::Colorize;
use dealsift::export;
use dealsift::{ErrorSummary, RunReport, Sifter};

use super::load_config;

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    audit_dir: Option<PathBuf>,
    report: Option<PathBuf>,
    today: Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Validate input file exists
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let config = load_config(config.as_deref())?;
    let mut sifter = Sifter::with_config(config);
    if let Some(ref date) = today {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| format!("Invalid --today '{}': {}", date, e))?;
        sifter = sifter.with_today(date);
    }

    let to_stdout = output.as_deref().is_some_and(|p| p == Path::new("-"));
    if !to_stdout {
        println!(
            "{} {}",
            "Sifting".cyan().bold(),
            file.display().to_string().white()
        );
    }

    let result = match sifter.sift_file(&file) {
        Ok(result) => result,
        Err(e) => {
            // Keep a report of the failed run when one was asked for
            if let Some(ref path) = report {
                let mut failed = RunReport::new(0);
                failed.error = Some(ErrorSummary::from(&e));
                export::write_report(&failed, path)?;
            }
            return Err(e.into());
        }
    };

    // Determine output path
    let output_path = output.unwrap_or_else(|| {
        let mut p = file.clone();
        let stem = p.file_stem().unwrap_or_default().to_string_lossy();
        p.set_file_name(format!("{}.clean.csv", stem));
        p
    });
    export::write_csv(&result.table, Some(&output_path))?;

    if let Some(ref path) = report {
        export::write_report(&result.report, path)?;
    }

    let mut audits = Vec::new();
    if let Some(ref dir) = audit_dir {
        let stem = file.file_stem().unwrap_or_default().to_string_lossy();
        audits = export::write_audits(dir, &stem, &result)?;
    }

    if to_stdout {
        return Ok(());
    }

    if verbose {
        println!();
        println!("{}", "Mapping:".yellow().bold());
        for entry in &result.report.mapping {
            println!(
                "  {:10} {}",
                entry.field.to_string(),
                entry.column.as_deref().unwrap_or("-")
            );
        }
    }

    for warning in &result.report.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }

    println!();
    println!("{}", "Stages:".yellow().bold());
    for stage in &result.report.stages {
        match stage.skipped {
            Some(ref reason) => {
                let note = format!("skipped ({})", reason);
                println!("  {:16} {}", stage.name, note.dimmed());
            }
            None => println!(
                "  {:16} {:>7} -> {:>7}  ({} removed)",
                stage.name,
                stage.rows_before,
                stage.rows_after,
                stage.removed().to_string().red()
            ),
        }
    }

    if let Some(ref verification) = result.report.verification {
        if !verification.passed() {
            println!(
                "{} {} verification failures",
                "warning:".yellow().bold(),
                verification.violations.len()
            );
        }
    }

    println!();
    println!(
        "Kept {} of {} rows",
        result.report.rows_out.to_string().white().bold(),
        result.report.rows_in
    );
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );
    for path in audits {
        println!("  audit: {}", path.display());
    }

    Ok(())
}
