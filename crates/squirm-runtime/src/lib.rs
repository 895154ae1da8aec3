//! # Squirm Runtime
//!
//! The simulation engine: the slot grid, the cell arena with its bond
//! graph, the reaction engine and the tick-driven world.
//!
//! Everything here is single-threaded and synchronous. A [`world::World`]
//! owns all of its state, including the random number generator, so a
//! seeded run is fully reproducible.

pub mod grid_impl;
pub mod cell;
pub mod population;
pub mod chemistry;
pub mod world;
pub mod world_builder;
pub mod metrics;
pub mod prelude;
