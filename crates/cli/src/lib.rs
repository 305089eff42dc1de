pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "snapactivate",
    about = "SnapActivate operator CLI",
    long_about = "Apply migrations, load the demo dataset, inspect configuration and check readiness of the SnapActivate assistant backend.",
    after_help = "Examples:\n  snapactivate migrate\n  snapactivate seed\n  snapactivate doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the demo brands, campaigns, reporting rows and packages")]
    Seed,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, LLM provider settings, database connectivity and schema")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", outcome.output);
    ExitCode::from(outcome.exit_code)
}
