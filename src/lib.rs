//! Stochastic agent-based epidemic simulation on a toroidal grid.
//!
//! Agents walk randomly on the grid, infect their neighbours with a
//! probability that depends on how long they have been infected, and
//! eventually recover. Repeated trials estimate the expected number of
//! infections together with a 95% confidence interval.

pub mod config;
pub mod engine;
pub mod manager;
pub mod model;
pub mod rng;
pub mod stats;
