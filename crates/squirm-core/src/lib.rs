//! # Squirm Core
//!
//! Core traits and types for the Squirm artificial chemistry.
//!
//! Squirm is a cellular automaton of "molecules": each cell on a bounded
//! grid has one of six species (`e f a b c d`), a non-negative state, and
//! a set of bonds to 8-adjacent neighbours. A chemistry of declarative
//! reaction rules rewrites states and makes or breaks bonds, which is
//! enough for strings of molecules to copy themselves.
//!
//! This crate holds what every other crate shares:
//!
//! - **types**: species, positions, directions, cell handles
//! - **reaction**: validated reaction rules and their text notation
//! - **presets**: the built-in chemistries
//! - **occupancy**: the grid contract
//! - **error**: validation and audit errors
//!
//! ## Quick Start
//!
//! ```rust
//! use squirm_core::prelude::*;
//!
//! let rule = ReactionRule::from_fields("e", 8, false, "e", 0, 4, true, 3).unwrap();
//! assert_eq!(rule.to_string(), "e8 e0 => e4-e3");
//!
//! let replicator = Preset::Replicator.rules().unwrap();
//! assert_eq!(replicator[0], rule);
//! ```

pub mod types;
pub mod reaction;
pub mod presets;
pub mod occupancy;
pub mod error;
pub mod prelude;
