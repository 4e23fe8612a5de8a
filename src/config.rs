use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Simulation configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Population and grid parameters.
    pub model: ModelConfig,
    /// Parameter lists of the experiment sweep.
    pub sweep: SweepConfig,
    /// Seeding of the random number generator.
    #[serde(default)]
    pub rng: RngConfig,
}

#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Side length of the square grid.
    pub grid_size: usize,
    /// Number of agents.
    pub n_agents: usize,
}

#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    /// Initial numbers of infected agents.
    pub initial_infected: Vec<usize>,
    /// Numbers of simulated days per trial.
    pub days: Vec<usize>,
}

/// Without `seed` or `seed_key` the generator seeds itself with its default seed.
#[derive(Debug, Default, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RngConfig {
    pub seed: Option<u32>,
    pub seed_key: Option<Vec<u32>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                grid_size: 50,
                n_agents: 100,
            },
            sweep: SweepConfig {
                initial_infected: (1..=10).collect(),
                days: vec![30, 90, 180, 365],
            },
            rng: RngConfig::default(),
        }
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded and contain a serialized [`Config`].
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_num(self.model.grid_size, 1..=10_000).context("invalid grid size")?;
        let capacity = self.model.grid_size * self.model.grid_size;
        check_num(self.model.n_agents, 1..=capacity).context("invalid number of agents")?;

        if self.sweep.initial_infected.is_empty() {
            bail!("initial infected list must not be empty");
        }
        for &n_infected in &self.sweep.initial_infected {
            check_num(n_infected, 0..=self.model.n_agents)
                .context("invalid initial number of infected agents")?;
        }
        if self.sweep.days.is_empty() {
            bail!("days list must not be empty");
        }
        for &n_days in &self.sweep.days {
            check_num(n_days, 0..=100_000).context("invalid number of days")?;
        }

        match (&self.rng.seed, &self.rng.seed_key) {
            (Some(_), Some(_)) => bail!("seed and seed_key are mutually exclusive"),
            (None, Some(key)) if key.is_empty() => bail!("seed_key must not be empty"),
            _ => {}
        }

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
