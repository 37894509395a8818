use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use tracing::Level;

use crate::entrypoint::{SimulationConfig, DEFAULT_OUTPUT, DEFAULT_ROUNDS};

/// Play random vs. mirroring rock-paper-scissors and save the rounds as JSON.
#[derive(Parser, Debug)]
#[command(name = "rps-sim", version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub simulate: SimulateArgs,

    /// Maximum log level
    #[arg(long, global = true, default_value = "info")]
    pub log_level: Level,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a saved history file
    Check {
        /// History file to read
        #[arg(default_value = DEFAULT_OUTPUT)]
        path: PathBuf,

        /// Fail unless the file holds exactly this many rounds
        #[arg(long)]
        rounds: Option<u32>,
    },
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of rounds to play
    #[arg(long, default_value_t = DEFAULT_ROUNDS)]
    pub rounds: u32,

    /// Where to write the history
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Seed for player one; defaults to the current time
    #[arg(long)]
    pub seed: Option<u64>,

    /// How long to wait for each move
    #[arg(long, default_value_t = 1000)]
    pub move_timeout_ms: u64,

    /// Also print the history to stdout
    #[arg(long)]
    pub print: bool,
}

impl From<SimulateArgs> for SimulationConfig {
    fn from(args: SimulateArgs) -> Self {
        SimulationConfig {
            rounds: args.rounds,
            output: args.output,
            seed: args.seed,
            move_timeout: Duration::from_millis(args.move_timeout_ms),
            print: args.print,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_means_default_simulation() {
        let cli = Cli::try_parse_from(["rps-sim"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, Level::INFO);

        let config = SimulationConfig::from(cli.simulate);
        let defaults = SimulationConfig::default();
        assert_eq!(config.rounds, defaults.rounds);
        assert_eq!(config.output, defaults.output);
        assert_eq!(config.move_timeout, defaults.move_timeout);
        assert_eq!(config.seed, None);
        assert!(!config.print);
    }

    #[test]
    fn simulation_flags() {
        let cli = Cli::try_parse_from([
            "rps-sim",
            "--rounds",
            "7",
            "-o",
            "out.json",
            "--seed",
            "42",
            "--move-timeout-ms",
            "250",
            "--print",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Level::DEBUG);
        let config = SimulationConfig::from(cli.simulate);
        assert_eq!(config.rounds, 7);
        assert_eq!(config.output, PathBuf::from("out.json"));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.move_timeout, Duration::from_millis(250));
        assert!(config.print);
    }

    #[test]
    fn check_subcommand() {
        let cli = Cli::try_parse_from(["rps-sim", "check", "saved.json", "--rounds", "100"]).unwrap();
        match cli.command {
            Some(Command::Check { path, rounds }) => {
                assert_eq!(path, PathBuf::from("saved.json"));
                assert_eq!(rounds, Some(100));
            }
            other => panic!("Expected check, got {:?}", other),
        }
    }
}
