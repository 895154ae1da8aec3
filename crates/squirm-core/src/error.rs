//! Error types for Squirm operations.
//!
//! Everything here is a *validation* failure: a bad rule, a bad placement,
//! a bad bond request or bad configuration. The engine stays usable after
//! any of them. Broken core invariants (a bond missing its reciprocal
//! entry, a slot that disagrees with its occupant) are not routed through
//! these types during simulation; they panic. [`InvariantError`] exists so
//! that audits can report such corruption without aborting.

use crate::types::Position;
use thiserror::Error;

/// Result type for Squirm operations.
pub type Result<T> = std::result::Result<T, SquirmError>;

/// Errors that can occur during Squirm operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquirmError {
    /// Reaction rule construction or parsing errors.
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),
    /// Grid placement errors.
    #[error("Placement error: {0}")]
    Placement(#[from] PlacementError),
    /// Explicit bond requests that would break the bond rules.
    #[error("Bond error: {0}")]
    Bond(#[from] BondError),
    /// Configuration errors.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// Model corruption found by an audit.
    #[error("Invariant violated: {0}")]
    Invariant(#[from] InvariantError),
}

/// Which side of a reaction a species code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSide {
    Us,
    Them,
}

impl std::fmt::Display for RuleSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleSide::Us => write!(f, "us"),
            RuleSide::Them => write!(f, "them"),
        }
    }
}

/// Reaction-rule errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Not one of `e f a b c d`.
    #[error("Unknown species code '{0}'")]
    UnknownSpecies(char),
    /// A wildcard used on a side that does not accept it.
    #[error("Wildcard '{code}' is not allowed on the {side} side")]
    WildcardNotAllowed { side: RuleSide, code: char },
    /// Species code string was empty or longer than one character.
    #[error("Species code must be a single character, got {0:?}")]
    MalformedCode(String),
    /// A state below zero.
    #[error("{field} must not be negative (got {value})")]
    NegativeState { field: &'static str, value: i64 },
    /// Rule notation could not be parsed.
    #[error("Cannot parse rule {text:?}: {reason}")]
    Syntax { text: String, reason: String },
}

/// Grid placement errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// Slot already holds a cell.
    #[error("Slot {0} is already occupied")]
    Occupied(Position),
    /// Slot holds no cell.
    #[error("Slot {0} is empty")]
    Vacant(Position),
    /// Coordinate outside the grid.
    #[error("Position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        position: Position,
        width: usize,
        height: usize,
    },
}

/// Errors for explicitly requested bonds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BondError {
    #[error("A cell cannot bond to itself")]
    SelfBond,
    #[error("Cells at {0} and {1} are already bonded")]
    AlreadyBonded(Position, Position),
    #[error("Cells at {0} and {1} are not 8-adjacent")]
    NotAdjacent(Position, Position),
    #[error("No live cell for the given handle")]
    UnknownCell,
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid value.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    /// Unknown preset name.
    #[error("Unknown reaction preset: {0}")]
    UnknownPreset(String),
}

/// Inconsistencies between the grid, the live list and the bond graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("Bond from {from} to {to} has no reciprocal entry")]
    AsymmetricBond { from: Position, to: Position },
    #[error("Cell at {0} is bonded to itself")]
    ReflexiveBond(Position),
    #[error("Bonded cells at {0} and {1} are more than one step apart")]
    StretchedBond(Position, Position),
    #[error("Cell believes it is at {recorded} but the slot there holds another occupant")]
    SlotMismatch { recorded: Position },
    #[error("Slot {0} references a cell that is not in the live list")]
    OrphanSlot(Position),
    #[error("Live list holds {listed} cells but the arena holds {stored}")]
    CountMismatch { listed: usize, stored: usize },
    #[error("Grid has {occupied} occupied slots but the arena holds {stored} cells")]
    OccupancyMismatch { occupied: usize, stored: usize },
}

// Convenience constructors
impl SquirmError {
    pub fn unknown_species(code: char) -> Self {
        SquirmError::Rule(RuleError::UnknownSpecies(code))
    }

    pub fn negative_state(field: &'static str, value: i64) -> Self {
        SquirmError::Rule(RuleError::NegativeState { field, value })
    }

    pub fn rule_syntax(text: impl Into<String>, reason: impl Into<String>) -> Self {
        SquirmError::Rule(RuleError::Syntax {
            text: text.into(),
            reason: reason.into(),
        })
    }

    pub fn occupied(position: Position) -> Self {
        SquirmError::Placement(PlacementError::Occupied(position))
    }

    pub fn invalid_config(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        SquirmError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        })
    }

    /// Whether this error reports corrupted model state rather than bad input.
    pub fn is_invariant(&self) -> bool {
        matches!(self, SquirmError::Invariant(_))
    }
}
