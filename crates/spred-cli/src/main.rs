use clap::Parser;
use spred_cli::cli::{Cli, Commands};
use spred_cli::config::load_spred_config;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The config chooses the default log level, so it is read before the
    // subscriber exists; its errors are reported once logging is up.
    let config = load_spred_config(cli.config.as_deref());
    let log_level = cli.log_level.unwrap_or_else(|| match &config {
        Ok(config) => config.logging.level(),
        Err(_) => tracing::Level::INFO,
    });

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Config failed: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let result = match &cli.command {
        Commands::Solve { netlist, format } => {
            commands::solve::handle(netlist, *format, &config)
        }
        Commands::Check { netlist } => {
            info!("Checking netlist {}", netlist.display());
            commands::check::handle(netlist, &config)
        }
        Commands::Graph { netlist, out } => {
            info!("Exporting graph for {}", netlist.display());
            commands::graph::handle(netlist, out.as_ref(), &config)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
