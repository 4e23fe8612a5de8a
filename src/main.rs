use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use epigrid::manager::Manager;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML configuration file (defaults are used when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run every trial of the sweep and report the confidence interval.
    Sweep,

    /// Run a single trial and report the final census.
    Trial {
        #[arg(long)]
        n_infected: usize,

        #[arg(long)]
        n_days: usize,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(args.config.as_ref()).context("failed to construct mgr")?;

    match args.command {
        Command::Sweep => {
            let report = mgr.run_sweep()?;
            log::info!(
                "n_vals = {}, std_dev = {:.4}, sem = {:.4}",
                report.n_vals,
                report.std_dev,
                report.sem
            );
            println!("Mean: {:.2}", report.mean);
            println!(
                "95% Confidence interval: [{:.2}, {:.2}]",
                report.conf_int.0, report.conf_int.1
            );
        }
        Command::Trial { n_infected, n_days } => {
            let census = mgr.run_trial(n_infected, n_days)?;
            println!("Healthy: {}", census.healthy);
            println!("Incubating: {}", census.incubating);
            println!("Infectious: {}", census.infectious);
            println!("Recovered: {}", census.recovered);
            println!("Infected: {}", census.n_infected());
        }
    }

    Ok(())
}
