//! World: the simulation driver.
//!
//! The world owns the population, the chemistry and the random number
//! generator. Each tick:
//! 1. The live list is snapshotted
//! 2. Every cell in the snapshot reacts, takes at most one step, and ages
//! 3. The tick counter advances
//! 4. On a flood boundary, the active half of the grid is wiped and reseeded

use crate::cell::{Cell, CellSnapshot};
use crate::chemistry::Chemistry;
use crate::metrics::Census;
use crate::population::Population;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use squirm_core::error::{Result, SquirmError};
use squirm_core::presets::Preset;
use squirm_core::reaction::ReactionRule;
use squirm_core::types::*;
use tracing::{debug, info};

/// The seed polymer placed at start-up, top to bottom.
const SEED_POLYMER: [(Species, State); 5] = [
    (Species::E, 8),
    (Species::A, 1),
    (Species::B, 1),
    (Species::C, 1),
    (Species::F, 1),
];

/// Column of the seed polymer.
const SEED_COLUMN: usize = 10;

/// Configuration for a world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Grid width in slots (default: 50).
    pub width: usize,
    /// Grid height in slots (default: 50).
    pub height: usize,
    /// Whether periodic floods run (default: false).
    pub flood_enabled: bool,
    /// Ticks between floods (default: 10000).
    pub flood_period: u64,
    /// Random monomer draws at start-up (default: 500).
    pub initial_quota: usize,
    /// Random monomer draws after each flood (default: 250).
    pub reseed_quota: usize,
    /// Place the `e8-a1-b1-c1-f1` seed polymer at start-up (default: true).
    pub seed_polymer: bool,
    /// How cells move (default: brownian).
    pub movement: MovementPolicy,
    /// Seed for the random number generator; drawn from entropy if absent.
    pub rng_seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            flood_enabled: false,
            flood_period: 10_000,
            initial_quota: 500,
            reseed_quota: 250,
            seed_polymer: true,
            movement: MovementPolicy::Brownian,
            rng_seed: None,
        }
    }
}

impl WorldConfig {
    /// An empty grid: no seed polymer, no random monomers.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            initial_quota: 0,
            seed_polymer: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width < 2 {
            return Err(SquirmError::invalid_config(
                "width",
                self.width,
                "the grid needs two halves to flood",
            ));
        }
        if self.height == 0 {
            return Err(SquirmError::invalid_config("height", self.height, "must be positive"));
        }
        if self.flood_period == 0 {
            return Err(SquirmError::invalid_config(
                "flood_period",
                self.flood_period,
                "must be at least one tick",
            ));
        }
        if self.seed_polymer {
            if self.width <= SEED_COLUMN {
                return Err(SquirmError::invalid_config(
                    "width",
                    self.width,
                    format!("the seed polymer needs column {SEED_COLUMN}"),
                ));
            }
            if self.height / 2 + SEED_POLYMER.len() > self.height {
                return Err(SquirmError::invalid_config(
                    "height",
                    self.height,
                    "too short for the seed polymer",
                ));
            }
        }
        Ok(())
    }
}

/// Running totals for a world.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorldStats {
    pub tick: Tick,
    pub alive: usize,
    pub spawned: u64,
    pub destroyed: u64,
    pub reactions: u64,
    pub moves: u64,
    pub floods: u64,
}

/// Serializable view of the whole world.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub tick: Tick,
    pub width: usize,
    pub height: usize,
    pub cells: Vec<CellSnapshot>,
    pub stats: WorldStats,
}

/// The simulation driver.
#[derive(Debug, Clone)]
pub struct World {
    population: Population,
    chemistry: Chemistry,
    rng: SmallRng,
    config: WorldConfig,
    tick: Tick,
    flood_on_right: bool,
    stats: WorldStats,
}

impl World {
    /// Build a world with an empty chemistry and run the initial seeding.
    pub fn new(config: WorldConfig) -> Result<Self> {
        Self::with_chemistry(config, Chemistry::new())
    }

    /// Build a world with the given chemistry and run the initial seeding.
    pub fn with_chemistry(config: WorldConfig, chemistry: Chemistry) -> Result<Self> {
        config.validate()?;
        let rng = match config.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let mut world = Self {
            population: Population::new(config.width, config.height),
            chemistry,
            rng,
            config,
            tick: 0,
            flood_on_right: true,
            stats: WorldStats::default(),
        };
        world.seed_initial()?;
        info!(
            width = world.config.width,
            height = world.config.height,
            cells = world.population.len(),
            rules = world.chemistry.len(),
            "world created"
        );
        Ok(world)
    }

    fn seed_initial(&mut self) -> Result<()> {
        if self.config.seed_polymer {
            let top = self.config.height / 2;
            let mut previous: Option<CellId> = None;
            for (i, (species, state)) in SEED_POLYMER.into_iter().enumerate() {
                let id = self.place_at(species, state, Position::new(SEED_COLUMN, top + i))?;
                if let Some(prev) = previous {
                    self.population.try_bond(prev, id)?;
                }
                previous = Some(id);
            }
        }
        let width = self.config.width;
        self.scatter(self.config.initial_quota, width, 0);
        Ok(())
    }

    /// `quota` random draws over `columns` columns starting at `offset`,
    /// placing a fresh monomer wherever a draw lands on an empty slot.
    fn scatter(&mut self, quota: usize, columns: usize, offset: usize) -> usize {
        let height = self.config.height;
        let mut placed = 0;
        for _ in 0..quota {
            let x = self.rng.gen_range(0..columns) + offset;
            let y = self.rng.gen_range(0..height);
            let species = Species::random(&mut self.rng);
            let position = Position::new(x, y);
            if self.population.cell_at(&position).is_none()
                && self.place_at(species, 0, position).is_ok()
            {
                placed += 1;
            }
        }
        placed
    }

    fn place_at(&mut self, species: Species, state: State, position: Position) -> Result<CellId> {
        let id = self.population.spawn(species, state, position)?;
        self.stats.spawned += 1;
        Ok(id)
    }

    // --- Simulation ---

    /// Advance exactly one timestep.
    pub fn tick(&mut self) {
        let snapshot = self.population.order().to_vec();
        let movement = self.config.movement;
        for id in snapshot {
            if !self.population.contains(id) {
                continue;
            }
            let fired = self.chemistry.react(&mut self.population, id);
            self.stats.reactions += fired as u64;
            if self.population.step_cell(id, movement, &mut self.rng) {
                self.stats.moves += 1;
            }
            self.population.age_cell(id);
        }

        self.tick += 1;
        if self.config.flood_enabled && self.tick % self.config.flood_period == 0 {
            self.flood();
        }
    }

    /// Run `ticks` timesteps.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Wipe the active half of the grid, reseed it, and switch halves.
    /// Returns `(removed, placed)`.
    pub fn flood(&mut self) -> (usize, usize) {
        let half = self.config.width / 2;
        let (start, end) = if self.flood_on_right {
            (half, self.config.width)
        } else {
            (0, half)
        };
        let removed = self.population.remove_where(|p| p.x >= start && p.x < end);
        self.stats.destroyed += removed as u64;
        let placed = self.scatter(self.config.reseed_quota, half, start);
        self.stats.floods += 1;
        info!(
            tick = self.tick,
            side = if self.flood_on_right { "right" } else { "left" },
            removed,
            placed,
            "flood"
        );
        self.flood_on_right = !self.flood_on_right;
        (removed, placed)
    }

    /// Whether the next flood hits the right half.
    pub fn flood_on_right(&self) -> bool {
        self.flood_on_right
    }

    // --- Rules ---

    /// Register a rule from its eight primitive fields.
    #[allow(clippy::too_many_arguments)]
    pub fn add_reaction(
        &mut self,
        us: &str,
        us_state: i64,
        bonded: bool,
        them: &str,
        them_state: i64,
        future_us_state: i64,
        bond_after: bool,
        future_them_state: i64,
    ) -> Result<()> {
        self.chemistry.add_reaction(
            us,
            us_state,
            bonded,
            them,
            them_state,
            future_us_state,
            bond_after,
            future_them_state,
        )
    }

    pub fn add_rule(&mut self, rule: ReactionRule) {
        self.chemistry.add_rule(rule);
    }

    pub fn clear_reactions(&mut self) {
        self.chemistry.clear();
    }

    /// Replace the chemistry with a built-in reaction set.
    pub fn load_preset(&mut self, preset: Preset) -> Result<()> {
        let chemistry = Chemistry::from_preset(preset)?;
        debug!(%preset, rules = chemistry.len(), "loaded preset");
        self.chemistry = chemistry;
        Ok(())
    }

    pub fn chemistry(&self) -> &Chemistry {
        &self.chemistry
    }

    // --- Configuration ---

    pub fn set_flood_enabled(&mut self, enabled: bool) {
        self.config.flood_enabled = enabled;
    }

    pub fn set_flood_period(&mut self, period: u64) -> Result<()> {
        if period == 0 {
            return Err(SquirmError::invalid_config(
                "flood_period",
                period,
                "must be at least one tick",
            ));
        }
        self.config.flood_period = period;
        Ok(())
    }

    pub fn set_movement(&mut self, movement: MovementPolicy) {
        self.config.movement = movement;
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // --- Cells ---

    /// Place an unbonded cell. Fails if the slot is taken or out of bounds.
    pub fn place(&mut self, species: Species, state: State, x: usize, y: usize) -> Result<CellId> {
        self.place_at(species, state, Position::new(x, y))
    }

    /// Bond two adjacent cells.
    pub fn bond(&mut self, a: CellId, b: CellId) -> Result<()> {
        self.population.try_bond(a, b)
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.population.get(id)
    }

    /// Label of the cell at `(x, y)`, e.g. `e8`. Empty when the slot is
    /// vacant or the coordinate lies outside the grid.
    pub fn contents(&self, x: i64, y: i64) -> String {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return String::new();
        };
        self.population
            .cell_at(&Position::new(x, y))
            .map(|(_, cell)| cell.label())
            .unwrap_or_default()
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn width(&self) -> usize {
        self.config.width
    }

    pub fn height(&self) -> usize {
        self.config.height
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    // --- Reporting ---

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            tick: self.tick,
            alive: self.population.len(),
            ..self.stats.clone()
        }
    }

    pub fn census(&self) -> Census {
        Census::take(&self.population, self.tick)
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            width: self.config.width,
            height: self.config.height,
            cells: self.population.iter().map(|(_, cell)| cell.snapshot()).collect(),
            stats: self.stats(),
        }
    }

    /// Check the grid, live list and bond graph for consistency.
    pub fn audit(&self) -> Result<()> {
        self.population.audit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(config: WorldConfig, seed: u64) -> WorldConfig {
        WorldConfig {
            rng_seed: Some(seed),
            ..config
        }
    }

    #[test]
    fn default_world_has_seed_polymer() {
        let world = World::new(seeded(WorldConfig::default(), 1)).unwrap();
        let labels: Vec<String> = (25..30).map(|y| world.contents(10, y)).collect();
        assert_eq!(labels, ["e8", "a1", "b1", "c1", "f1"]);
        assert!(world.population().len() > 5);
        assert!(world.population().len() <= 505);
        assert_eq!(world.census().longest_polymer, 5);
        world.audit().unwrap();
    }

    #[test]
    fn contents_out_of_bounds_is_empty() {
        let mut world = World::new(WorldConfig::empty(20, 20)).unwrap();
        world.place(Species::B, 3, 0, 0).unwrap();
        assert_eq!(world.contents(0, 0), "b3");
        assert_eq!(world.contents(1, 0), "");
        assert_eq!(world.contents(-1, 0), "");
        assert_eq!(world.contents(0, -5), "");
        assert_eq!(world.contents(20, 0), "");
        assert_eq!(world.contents(0, 20), "");
    }

    #[test]
    fn placing_twice_fails_and_world_stays_usable() {
        let mut world = World::new(WorldConfig::empty(20, 20)).unwrap();
        world.place(Species::A, 0, 3, 3).unwrap();
        assert!(world.place(Species::B, 0, 3, 3).is_err());
        assert!(world.place(Species::B, 0, 30, 3).is_err());
        world.tick();
        assert_eq!(world.population().len(), 1);
        world.audit().unwrap();
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let narrow = WorldConfig { width: 8, ..WorldConfig::default() };
        assert!(World::new(narrow).is_err());
        let flat = WorldConfig { height: 6, ..WorldConfig::default() };
        assert!(World::new(flat).is_err());
        assert!(World::new(WorldConfig::empty(1, 5)).is_err());
        let never = WorldConfig { flood_period: 0, ..WorldConfig::empty(4, 4) };
        assert!(World::new(never).is_err());
        assert!(World::new(WorldConfig::empty(2, 1)).is_ok());
    }

    #[test]
    fn reaction_fires_during_tick() {
        let mut world = World::new(seeded(WorldConfig::empty(10, 10), 5)).unwrap();
        let a = world.place(Species::E, 8, 5, 5).unwrap();
        let b = world.place(Species::E, 0, 5, 6).unwrap();
        world.add_reaction("e", 8, false, "e", 0, 4, true, 3).unwrap();

        world.tick();
        assert_eq!(world.cell(a).unwrap().label(), "e4");
        assert_eq!(world.cell(b).unwrap().label(), "e3");
        assert!(world.population().are_bonded(a, b));
        assert_eq!(world.stats().reactions, 1);
        world.audit().unwrap();
    }

    #[test]
    fn age_counts_quiet_ticks() {
        let mut world = World::new(seeded(WorldConfig::empty(10, 10), 5)).unwrap();
        let a = world.place(Species::C, 2, 5, 5).unwrap();
        world.run(3);
        assert_eq!(world.cell(a).unwrap().age(), 3);
    }

    #[test]
    fn flood_alternates_halves() {
        let config = WorldConfig {
            reseed_quota: 0,
            ..WorldConfig::empty(10, 4)
        };
        let mut world = World::new(config).unwrap();
        world.place(Species::A, 0, 0, 0).unwrap();
        world.place(Species::B, 0, 4, 0).unwrap();
        world.place(Species::C, 0, 5, 0).unwrap();
        world.place(Species::D, 0, 9, 3).unwrap();

        assert!(world.flood_on_right());
        assert_eq!(world.flood(), (2, 0));
        assert_eq!(world.contents(4, 0), "b0");
        assert_eq!(world.contents(5, 0), "");

        assert!(!world.flood_on_right());
        assert_eq!(world.flood(), (2, 0));
        assert!(world.population().is_empty());
        assert_eq!(world.stats().destroyed, 4);
        assert_eq!(world.stats().floods, 2);
    }

    #[test]
    fn flood_only_on_period_boundary_and_when_enabled() {
        let mut world = World::new(seeded(WorldConfig::empty(10, 10), 2)).unwrap();
        world.set_flood_period(3).unwrap();
        world.run(6);
        assert_eq!(world.stats().floods, 0);

        world.set_flood_enabled(true);
        world.run(2);
        assert_eq!(world.stats().floods, 0);
        world.tick(); // tick 9
        assert_eq!(world.stats().floods, 1);
        assert!(world.set_flood_period(0).is_err());
    }

    #[test]
    fn load_preset_replaces_rules() {
        let mut world = World::new(WorldConfig::empty(10, 10)).unwrap();
        world.add_reaction("a", 0, false, "b", 0, 1, true, 1).unwrap();
        world.load_preset(Preset::Membrane).unwrap();
        assert_eq!(
            world.chemistry().rules(),
            Preset::Membrane.rules().unwrap().as_slice()
        );
        world.clear_reactions();
        assert!(world.chemistry().is_empty());
    }

    #[test]
    fn snapshot_lists_cells_in_processing_order() {
        let mut world = World::new(WorldConfig::empty(10, 10)).unwrap();
        world.place(Species::F, 1, 2, 2).unwrap();
        world.place(Species::E, 0, 1, 1).unwrap();
        let snapshot = world.snapshot();
        assert_eq!(snapshot.cells.len(), 2);
        assert_eq!(snapshot.cells[0].species, Species::F);
        assert_eq!(snapshot.stats.alive, 2);
        assert_eq!(snapshot.stats.spawned, 2);
    }
}
