use clap::Parser;
use common::utility::shutdown_signal;
use simulator::{
    cli::{Cli, Command},
    entrypoint::{self, SimulationConfig},
};
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_line_number(true)
        .with_file(true)
        .with_max_level(cli.log_level)
        .init();

    match cli.command {
        Some(Command::Check { path, rounds }) => {
            entrypoint::check(&path, rounds)?;
        }
        None => {
            let config = SimulationConfig::from(cli.simulate);
            // All or nothing: an interrupted run writes no history
            tokio::select! {
                result = entrypoint::run(config) => {
                    result?;
                }
                _ = shutdown_signal() => {
                    warn!("Interrupted before the simulation finished, nothing was saved");
                }
            }
        }
    }
    Ok(())
}
