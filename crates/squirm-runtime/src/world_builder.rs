//! Builder for worlds.
//!
//! Collects configuration, an optional preset and extra rules, then
//! validates everything at once in [`WorldBuilder::build`].
//!
//! # Example
//!
//! ```rust
//! use squirm_runtime::world_builder::WorldBuilder;
//! use squirm_core::presets::Preset;
//!
//! let mut world = WorldBuilder::new()
//!     .size(40, 30)
//!     .seed(7)
//!     .preset(Preset::Replicator)
//!     .flood_every(500)
//!     .build()?;
//!
//! world.run(10);
//! assert_eq!(world.current_tick(), 10);
//! # Ok::<(), squirm_core::error::SquirmError>(())
//! ```

use crate::chemistry::Chemistry;
use crate::world::{World, WorldConfig};
use squirm_core::error::Result;
use squirm_core::presets::Preset;
use squirm_core::reaction::ReactionRule;
use squirm_core::types::MovementPolicy;

/// A rule as given to the builder; text is parsed at build time.
#[derive(Debug, Clone)]
enum RuleSource {
    Rule(ReactionRule),
    Text(String),
}

/// Builder for [`World`].
#[derive(Debug, Clone, Default)]
pub struct WorldBuilder {
    config: WorldConfig,
    preset: Option<Preset>,
    rules: Vec<RuleSource>,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: WorldConfig) -> Self {
        self.config = config;
        self
    }

    pub fn size(mut self, width: usize, height: usize) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Fix the random seed for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.rng_seed = Some(seed);
        self
    }

    /// Enable floods with the given period.
    pub fn flood_every(mut self, period: u64) -> Self {
        self.config.flood_enabled = true;
        self.config.flood_period = period;
        self
    }

    pub fn quotas(mut self, initial: usize, reseed: usize) -> Self {
        self.config.initial_quota = initial;
        self.config.reseed_quota = reseed;
        self
    }

    pub fn movement(mut self, movement: MovementPolicy) -> Self {
        self.config.movement = movement;
        self
    }

    /// Start with an empty grid: no seed polymer and no random monomers.
    pub fn empty(mut self) -> Self {
        self.config.seed_polymer = false;
        self.config.initial_quota = 0;
        self
    }

    /// Load a built-in reaction set before any explicit rules.
    pub fn preset(mut self, preset: Preset) -> Self {
        self.preset = Some(preset);
        self
    }

    pub fn rule(mut self, rule: ReactionRule) -> Self {
        self.rules.push(RuleSource::Rule(rule));
        self
    }

    /// Add a rule in notation form, e.g. `"e8 e0 => e4-e3"`.
    pub fn rule_text(mut self, text: impl Into<String>) -> Self {
        self.rules.push(RuleSource::Text(text.into()));
        self
    }

    /// Validate the configuration, assemble the chemistry and seed the world.
    pub fn build(self) -> Result<World> {
        let mut chemistry = match self.preset {
            Some(preset) => Chemistry::from_preset(preset)?,
            None => Chemistry::new(),
        };
        for source in self.rules {
            let rule = match source {
                RuleSource::Rule(rule) => rule,
                RuleSource::Text(text) => text.parse()?,
            };
            chemistry.add_rule(rule);
        }
        World::with_chemistry(self.config, chemistry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squirm_core::error::SquirmError;

    #[test]
    fn preset_rules_come_before_explicit_ones() {
        let extra: ReactionRule = "f1 f1 => f2-f2".parse().unwrap();
        let world = WorldBuilder::new()
            .empty()
            .preset(Preset::Replicator)
            .rule(extra)
            .rule_text("d0 d0 => d1-d1")
            .build()
            .unwrap();

        let rules = world.chemistry().rules();
        let preset_len = Preset::Replicator.rules().unwrap().len();
        assert_eq!(rules.len(), preset_len + 2);
        assert_eq!(rules[preset_len], extra);
        assert_eq!(rules[preset_len + 1].to_string(), "d0 d0 => d1-d1");
    }

    #[test]
    fn bad_rule_text_fails_the_build() {
        let err = WorldBuilder::new()
            .empty()
            .rule_text("e8 e0 -> e4-e3")
            .build()
            .unwrap_err();
        assert!(matches!(err, SquirmError::Rule(_)));
    }

    #[test]
    fn invalid_size_fails_the_build() {
        assert!(WorldBuilder::new().size(5, 50).build().is_err());
        assert!(WorldBuilder::new().size(5, 50).empty().build().is_ok());
    }

    #[test]
    fn settings_reach_the_world() {
        let world = WorldBuilder::new()
            .size(30, 20)
            .seed(11)
            .quotas(0, 9)
            .flood_every(7)
            .movement(MovementPolicy::Momentum)
            .build()
            .unwrap();
        let config = world.config();
        assert_eq!((config.width, config.height), (30, 20));
        assert!(config.flood_enabled);
        assert_eq!(config.flood_period, 7);
        assert_eq!(config.reseed_quota, 9);
        assert_eq!(config.movement, MovementPolicy::Momentum);
        assert_eq!(world.population().len(), 5);
    }
}
