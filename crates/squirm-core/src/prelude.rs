//! Squirm Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use squirm_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{
    CellId, Direction, MovementPolicy, Position, Species, State, Tick,
};

// Re-export rule types
pub use crate::reaction::{BondChange, ReactionRule, ThemPattern, UsPattern};
pub use crate::presets::Preset;

// Re-export the Occupancy trait
pub use crate::occupancy::Occupancy;

// Re-export error types
pub use crate::error::{Result, SquirmError};
