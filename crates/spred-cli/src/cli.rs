use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spred", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level (overrides `[logging] level` in the config file)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// Config file (defaults to <config dir>/spred/config.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve a netlist and print per-element currents and voltages
    Solve {
        /// Path to the netlist (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        netlist: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Load and validate a netlist without solving it
    Check {
        /// Path to the netlist (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        netlist: PathBuf,
    },
    /// Export the circuit topology as Graphviz DOT
    Graph {
        /// Path to the netlist (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        netlist: PathBuf,
        /// Write DOT here instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
}

/// Output format for solve results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default for interactive use)
    #[default]
    Table,
    /// JSON object with summary and per-element rows
    Json,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn test_solve_defaults_to_table() {
        let cli = Cli::try_parse_from(["spred", "solve", "circuit.toml"]).unwrap();
        match cli.command {
            Commands::Solve { netlist, format } => {
                assert_eq!(netlist, PathBuf::from("circuit.toml"));
                assert_eq!(format, OutputFormat::Table);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "spred",
            "check",
            "circuit.toml",
            "--log-level",
            "debug",
            "--config",
            "spred.toml",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(tracing::Level::DEBUG));
        assert_eq!(cli.config, Some(PathBuf::from("spred.toml")));
    }
}
