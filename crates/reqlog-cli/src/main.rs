//! reqlog CLI
//!
//! Drives the logging façade from environment configuration

use clap::{Parser, Subcommand};
use reqlog_logging::{
    init, parse_log_level_strict, report_dotenv_error, LoggingConfig, Profile,
};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "reqlog")]
#[command(about = "reqlog - request-scoped structured logging", long_about = None)]
struct Cli {
    /// Deployment environment, overrides ENVIRONMENT ("production" emits JSON)
    #[arg(long, global = true)]
    environment: Option<String>,

    /// Minimum level (debug, info, warn, error), overrides LOG_LEVEL
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Emit a single record
    Emit(commands::emit::EmitArgs),
    /// Run simulated requests on worker threads
    Simulate(commands::simulate::SimulateArgs),
    /// Log an unrecoverable error and exit with status 1
    Fatal(commands::fatal::FatalArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // .env problems are reported once diagnostics are installed
    let (mut config, dotenv_error) = LoggingConfig::load();
    if let Some(environment) = cli.environment {
        config.environment = environment;
    }
    if let Some(level) = cli.log_level.as_deref() {
        config.log_level = parse_log_level_strict(level)?;
    }

    init(Profile::for_environment(&config.environment));
    if let Some(err) = dotenv_error {
        report_dotenv_error(&err);
    }
    let logger = config.build_logger();

    match cli.command {
        Commands::Emit(args) => commands::emit::execute(&logger, args),
        Commands::Simulate(args) => commands::simulate::execute(&logger, args),
        Commands::Fatal(args) => commands::fatal::execute(&logger, args),
    }
}
