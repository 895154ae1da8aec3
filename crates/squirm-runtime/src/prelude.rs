//! Squirm Runtime Prelude: convenient imports for common usage.
//!
//! ```rust
//! use squirm_runtime::prelude::*;
//! ```

// Re-export the world
pub use crate::world::{World, WorldConfig, WorldSnapshot, WorldStats};
pub use crate::world_builder::WorldBuilder;

// Re-export engine parts
pub use crate::cell::{Cell, CellSnapshot};
pub use crate::chemistry::Chemistry;
pub use crate::grid_impl::SlotGrid;
pub use crate::population::Population;

// Re-export metrics
pub use crate::metrics::Census;

// Re-export from core
pub use squirm_core::prelude::*;
