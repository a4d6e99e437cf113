//! Dealsift CLI - clean and deduplicate vehicle-sale customer exports.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Run {
            file,
            output,
            config,
            audit_dir,
            report,
            today,
        } => commands::run::run(file, output, config, audit_dir, report, today, cli.verbose),

        Commands::Detect { file, config, json } => {
            commands::detect::run(file, config, json, cli.verbose)
        }

        Commands::Config { output } => commands::config::run(output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
