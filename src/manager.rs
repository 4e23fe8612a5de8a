use crate::config::Config;
use crate::engine::Engine;
use crate::model::Census;
use crate::stats::{Accumulator, AccumulatorReport};
use anyhow::{Context, Result};
use std::path::Path;

pub struct Manager {
    cfg: Config,
}

impl Manager {
    /// Load the configuration from `config_file`, or use the default one.
    pub fn new<P: AsRef<Path>>(config_file: Option<P>) -> Result<Self> {
        let cfg = match config_file {
            Some(file) => Config::from_file(file).context("failed to construct cfg")?,
            None => Config::default(),
        };
        log::info!("{cfg:#?}");

        Ok(Self { cfg })
    }

    /// Run one trial for every combination of initial infections and days.
    ///
    /// Trials run in sweep order on a single generator, so the report is a
    /// pure function of the configuration.
    pub fn run_sweep(&self) -> Result<AccumulatorReport> {
        let mut engine =
            Engine::new(self.cfg.model.clone(), &self.cfg.rng).context("failed to construct engine")?;
        let mut acc = Accumulator::new();

        let n_trials = self.cfg.sweep.initial_infected.len() * self.cfg.sweep.days.len();
        let mut i_trial = 0;
        for &n_infected in &self.cfg.sweep.initial_infected {
            for &n_days in &self.cfg.sweep.days {
                let census = engine
                    .run_trial(n_infected, n_days)
                    .with_context(|| format!("failed to run trial {i_trial}"))?;
                acc.add(census.n_infected() as f64);

                i_trial += 1;
                let progress = 100.0 * i_trial as f64 / n_trials as f64;
                log::info!(
                    "completed {progress:06.2}% (n_infected = {n_infected}, n_days = {n_days}, outcome = {})",
                    census.n_infected()
                );
            }
        }

        acc.report().context("failed to compute statistics")
    }

    /// Run a single trial with a freshly seeded generator.
    pub fn run_trial(&self, n_infected: usize, n_days: usize) -> Result<Census> {
        let mut engine =
            Engine::new(self.cfg.model.clone(), &self.cfg.rng).context("failed to construct engine")?;
        engine.run_trial(n_infected, n_days)
    }
}
