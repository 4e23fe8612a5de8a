//! Population, grid and the daily update rules of the epidemic.

use crate::rng::Mt19937;
use anyhow::{Result, bail};
use rand::Rng;

/// Days spent incubating before becoming infectious.
pub const INCUBATION_DAYS: i32 = 2;
/// Days since infection after which an infectious agent recovers.
pub const RECOVERY_DAYS: i32 = 12;

/// Health state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Health {
    Healthy,
    Incubating,
    Infectious,
    Recovered,
}

/// Probability that an infectious agent infects a healthy neighbour,
/// given the infector's days since infection.
pub fn infection_probability(days_infected: i32) -> f64 {
    match days_infected {
        2 => 0.6,
        3 => 0.8,
        4 => 0.7,
        5 => 0.6,
        6 => 0.5,
        7 => 0.4,
        8 => 0.3,
        9 => 0.2,
        10 => 0.1,
        _ => 0.0,
    }
}

/// Grid cell coordinates, each below the grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

/// Agent of the simulation.
///
/// Its identity is its index in [`State::agents`].
#[derive(Debug, Clone)]
pub struct Agent {
    pos: Pos,
    health: Health,
    days_infected: i32,
}

impl Agent {
    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn health(&self) -> Health {
        self.health
    }

    /// Days since infection, or -1 if never infected.
    pub fn days_infected(&self) -> i32 {
        self.days_infected
    }

    fn infect(&mut self) {
        self.health = Health::Incubating;
        self.days_infected = 0;
    }
}

/// Square toroidal lattice holding at most one agent index per cell.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<usize>>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, pos: Pos) -> Option<usize> {
        self.cells[self.cell_idx(pos)]
    }

    pub fn n_occupied(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Position reached from `pos` by a step of `(dx, dy)`, wrapping around the edges.
    pub fn offset(&self, pos: Pos, dx: i32, dy: i32) -> Pos {
        let size = self.size as i64;
        Pos {
            x: (pos.x as i64 + dx as i64).rem_euclid(size) as usize,
            y: (pos.y as i64 + dy as i64).rem_euclid(size) as usize,
        }
    }

    fn set(&mut self, pos: Pos, cell: Option<usize>) {
        let idx = self.cell_idx(pos);
        self.cells[idx] = cell;
    }

    fn cell_idx(&self, pos: Pos) -> usize {
        debug_assert!(
            pos.x < self.size && pos.y < self.size,
            "{pos:?} is outside a grid of size {}",
            self.size
        );
        pos.x * self.size + pos.y
    }
}

/// Agent counts per health state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Census {
    pub healthy: usize,
    pub incubating: usize,
    pub infectious: usize,
    pub recovered: usize,
}

impl Census {
    /// Trial outcome: agents that are infectious or have recovered.
    pub fn n_infected(&self) -> usize {
        self.infectious + self.recovered
    }

    /// Agents that are no longer healthy.
    pub fn n_ever_infected(&self) -> usize {
        self.incubating + self.infectious + self.recovered
    }
}

/// State of a single trial: the population and the grid it lives on.
#[derive(Debug, Clone)]
pub struct State {
    pub agents: Vec<Agent>,
    pub grid: Grid,
}

impl State {
    /// Place `n_agents` agents on distinct random cells.
    ///
    /// The first `n_infected` agents start incubating, the rest healthy.
    pub fn initialize(
        grid_size: usize,
        n_agents: usize,
        n_infected: usize,
        rng: &mut Mt19937,
    ) -> Result<Self> {
        if grid_size == 0 {
            bail!("grid size must be positive");
        }
        let mut grid = Grid::new(grid_size);
        if n_agents > grid.capacity() {
            bail!(
                "population of {n_agents} exceeds grid capacity of {}",
                grid.capacity()
            );
        }
        if n_infected > n_agents {
            bail!("initially infected ({n_infected}) exceeds population ({n_agents})");
        }

        let mut agents = Vec::with_capacity(n_agents);
        for i_agt in 0..n_agents {
            let mut pos = random_pos(grid_size, rng);
            while grid.get(pos).is_some() {
                pos = random_pos(grid_size, rng);
            }
            grid.set(pos, Some(i_agt));

            let (health, days_infected) = if i_agt < n_infected {
                (Health::Incubating, 0)
            } else {
                (Health::Healthy, -1)
            };
            agents.push(Agent {
                pos,
                health,
                days_infected,
            });
        }

        Ok(Self { agents, grid })
    }

    /// Advance one simulated day.
    pub fn step(&mut self, rng: &mut Mt19937) {
        self.move_agents(rng);
        self.propagate_infection(rng);
        self.update_health();
    }

    /// Move every agent one random step, in index order.
    ///
    /// An agent whose target cell is occupied stays put.
    pub fn move_agents(&mut self, rng: &mut Mt19937) {
        for i_agt in 0..self.agents.len() {
            let dx = rng.random_range(-1..=1);
            let dy = rng.random_range(-1..=1);

            let old_pos = self.agents[i_agt].pos;
            let new_pos = self.grid.offset(old_pos, dx, dy);
            if self.grid.get(new_pos).is_some() {
                continue;
            }

            self.grid.set(old_pos, None);
            self.grid.set(new_pos, Some(i_agt));
            self.agents[i_agt].pos = new_pos;
        }
    }

    /// Let every infectious agent try to infect the healthy agents around it.
    pub fn propagate_infection(&mut self, rng: &mut Mt19937) {
        for i_agt in 0..self.agents.len() {
            let infector = &self.agents[i_agt];
            if infector.health != Health::Infectious {
                continue;
            }
            let pos = infector.pos;
            let prob = infection_probability(infector.days_infected);

            for dx in -1..=1 {
                for dy in -1..=1 {
                    let Some(i_nbr) = self.grid.get(self.grid.offset(pos, dx, dy)) else {
                        continue;
                    };
                    let nbr = &mut self.agents[i_nbr];
                    if nbr.health == Health::Healthy && rng.uniform_float(0.0, 1.0) < prob {
                        nbr.infect();
                    }
                }
            }
        }
    }

    /// Advance the disease progression of every agent by one day.
    pub fn update_health(&mut self) {
        for agt in &mut self.agents {
            if agt.health == Health::Incubating && agt.days_infected >= INCUBATION_DAYS {
                agt.health = Health::Infectious;
            } else if agt.health == Health::Infectious && agt.days_infected >= RECOVERY_DAYS {
                agt.health = Health::Recovered;
            }
            if matches!(agt.health, Health::Incubating | Health::Infectious) {
                agt.days_infected += 1;
            }
        }
    }

    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for agt in &self.agents {
            match agt.health {
                Health::Healthy => census.healthy += 1,
                Health::Incubating => census.incubating += 1,
                Health::Infectious => census.infectious += 1,
                Health::Recovered => census.recovered += 1,
            }
        }
        census
    }

    /// Check that occupied cells and agent positions are in bijection.
    pub fn check_consistency(&self) -> Result<()> {
        let n_occupied = self.grid.n_occupied();
        if n_occupied != self.agents.len() {
            bail!(
                "{n_occupied} occupied cells for {} agents",
                self.agents.len()
            );
        }
        for (i_agt, agt) in self.agents.iter().enumerate() {
            if self.grid.get(agt.pos) != Some(i_agt) {
                bail!("agent {i_agt} is not on its cell {:?}", agt.pos);
            }
        }
        Ok(())
    }
}

fn random_pos(grid_size: usize, rng: &mut Mt19937) -> Pos {
    // A unit draw of exactly 1.0 would land one past the last cell.
    let mut coord = || {
        let coord = (rng.uniform_float(0.0, 1.0) * grid_size as f64) as usize;
        coord.min(grid_size - 1)
    };
    let x = coord();
    let y = coord();
    Pos { x, y }
}
