//! # Squirm
//!
//! An artificial chemistry on a bonded cellular grid.
//!
//! Molecules ("cells") of six species sit on a 2-D grid. Each carries a
//! small integer state and may bond to its 8-neighbours. A list of
//! reaction rules decides, every tick, which neighbouring pairs change
//! state and make or break bonds. With the right rules, strings of
//! bonded cells copy themselves out of the surrounding soup.
//!
//! ## Quick Start
//!
//! ```rust
//! use squirm::prelude::*;
//!
//! // A 50x50 world with the seed polymer, 500 random monomers and the
//! // replicator chemistry.
//! let mut world = WorldBuilder::new()
//!     .seed(1)
//!     .preset(Preset::Replicator)
//!     .build()?;
//!
//! // Add one more rule in notation form.
//! world.add_rule("f1 f0 => f1-f2".parse()?);
//!
//! world.run(100);
//!
//! let census = world.census();
//! println!("{} cells, {} polymers", census.cells, census.polymers);
//! # Ok::<(), SquirmError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`squirm_core`] - Species, positions, reaction rules, presets, errors
//! - [`squirm_runtime`] - Grid, bond graph, reaction engine, world driver
//!
//! ## Reaction Rules
//!
//! A rule reads like `e8 e0 => e4-e3`: a cell of species `e` in state 8
//! next to an unbonded `e` in state 0 becomes `e4`, bonds, and turns its
//! partner into `e3`. A `-` marks a bond, a space its absence.
//!
//! | Code | Meaning |
//! |------|---------|
//! | `e f a b c d` | a literal species |
//! | `x` | reacting side: any species. Partner side: same species as the reacting cell |
//! | `y` | partner side only: any species |
//!
//! Rules are tried in order for every cell on every tick, and each rule
//! sees the effects of the ones before it.
//!
//! ## Floods
//!
//! With floods enabled, every `flood_period` ticks one half of the grid
//! (right first, then alternating) is wiped and refilled with fresh
//! monomers, so the soup never settles.

// Re-export all subcrates
pub use squirm_core as core;
pub use squirm_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use squirm::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use squirm_core::types::{
        CellId, Direction, MovementPolicy, Position, Species, State, Tick,
    };
    pub use squirm_core::reaction::{BondChange, ReactionRule, ThemPattern, UsPattern};
    pub use squirm_core::presets::Preset;

    // Core traits
    pub use squirm_core::occupancy::Occupancy;

    // Error types
    pub use squirm_core::error::{Result, SquirmError};

    // Runtime
    pub use squirm_runtime::chemistry::Chemistry;
    pub use squirm_runtime::cell::{Cell, CellSnapshot};
    pub use squirm_runtime::metrics::Census;
    pub use squirm_runtime::world::{World, WorldConfig, WorldSnapshot, WorldStats};
    pub use squirm_runtime::world_builder::WorldBuilder;
}
