use crate::config::{ModelConfig, RngConfig};
use crate::model::{Census, State};
use crate::rng::Mt19937;
use anyhow::{Context, Result};

/// Simulation engine.
///
/// Holds the model configuration and the random number generator shared by
/// every trial it runs. Each trial starts from a freshly initialized [`State`].
pub struct Engine {
    cfg: ModelConfig,
    rng: Mt19937,
}

impl Engine {
    /// Create a new `Engine`, seeding its generator as requested by `rng_cfg`.
    pub fn new(cfg: ModelConfig, rng_cfg: &RngConfig) -> Result<Self> {
        let rng = match (rng_cfg.seed, &rng_cfg.seed_key) {
            (Some(seed), _) => Mt19937::with_seed(seed),
            (None, Some(key)) => Mt19937::with_key(key).context("failed to seed rng")?,
            (None, None) => Mt19937::new(),
        };
        Ok(Self { cfg, rng })
    }

    /// Run a single trial and return the final census.
    pub fn run_trial(&mut self, n_infected: usize, n_days: usize) -> Result<Census> {
        let mut state = State::initialize(
            self.cfg.grid_size,
            self.cfg.n_agents,
            n_infected,
            &mut self.rng,
        )
        .context("failed to initialize state")?;

        for _ in 0..n_days {
            state.step(&mut self.rng);
        }

        let census = state.census();
        log::debug!("{census:?}");

        Ok(census)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_cfg(grid_size: usize, n_agents: usize) -> ModelConfig {
        ModelConfig {
            grid_size,
            n_agents,
        }
    }

    #[test]
    fn zero_days_counts_nobody_infectious() {
        let mut engine = Engine::new(model_cfg(50, 100), &RngConfig::default()).unwrap();
        let census = engine.run_trial(1, 0).unwrap();
        assert_eq!(census.n_ever_infected(), 1);
        assert_eq!(census.n_infected(), 0);
    }

    #[test]
    fn no_initial_infection_stays_clean() {
        let mut engine = Engine::new(model_cfg(50, 100), &RngConfig::default()).unwrap();
        for n_days in [0, 1, 30, 365] {
            assert_eq!(engine.run_trial(0, n_days).unwrap().n_ever_infected(), 0);
        }
    }

    #[test]
    fn lone_agent_is_the_only_case() {
        let mut engine = Engine::new(model_cfg(1, 1), &RngConfig::default()).unwrap();
        for n_days in [3, 10, 13, 100] {
            let census = engine.run_trial(1, n_days).unwrap();
            assert_eq!(census.n_infected(), 1);
        }
    }

    #[test]
    fn trials_share_one_sequence() {
        let rng_cfg = RngConfig {
            seed: Some(2024),
            seed_key: None,
        };
        let run = || {
            let mut engine = Engine::new(model_cfg(30, 100), &rng_cfg).unwrap();
            (0..4)
                .map(|n_infected| engine.run_trial(n_infected + 1, 60).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn seed_key_is_used() {
        let rng_cfg = RngConfig {
            seed: None,
            seed_key: Some(vec![0x123, 0x234, 0x345, 0x456]),
        };
        let mut engine = Engine::new(model_cfg(10, 10), &rng_cfg).unwrap();
        let mut expected = Mt19937::with_key(&[0x123, 0x234, 0x345, 0x456]).unwrap();
        assert_eq!(engine.rng.next_uint32(), expected.next_uint32());
    }

    #[test]
    fn population_above_capacity_fails() {
        let mut engine = Engine::new(model_cfg(2, 5), &RngConfig::default()).unwrap();
        assert!(engine.run_trial(1, 1).is_err());
    }
}
