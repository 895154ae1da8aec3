//! Shared types used across the Squirm crates.

use crate::error::{Result, SquirmError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Stable handle for a cell held in the population arena.
    ///
    /// Bonds store these handles instead of references, so removing a
    /// cell never leaves a dangling pointer behind: a stale handle simply
    /// stops resolving.
    pub struct CellId;
}

/// Internal state of a cell. Rules may drive it arbitrarily high.
pub type State = u64;

/// The current tick of the simulation.
pub type Tick = u64;

/// One of the six molecule kinds.
///
/// The discriminant order matches the historical type numbering
/// (`e`=0 … `d`=5), which is also the order used for random draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    E,
    F,
    A,
    B,
    C,
    D,
}

impl Species {
    /// All species in draw order.
    pub const ALL: [Species; 6] = [
        Species::E,
        Species::F,
        Species::A,
        Species::B,
        Species::C,
        Species::D,
    ];

    /// Parse a single-letter species code.
    pub fn from_code(code: char) -> Result<Self> {
        match code {
            'e' => Ok(Species::E),
            'f' => Ok(Species::F),
            'a' => Ok(Species::A),
            'b' => Ok(Species::B),
            'c' => Ok(Species::C),
            'd' => Ok(Species::D),
            other => Err(SquirmError::unknown_species(other)),
        }
    }

    /// The single-letter code of this species.
    pub fn code(self) -> char {
        match self {
            Species::E => 'e',
            Species::F => 'f',
            Species::A => 'a',
            Species::B => 'b',
            Species::C => 'c',
            Species::D => 'd',
        }
    }

    /// Index into [`Species::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Draw a species uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Species::ALL[rng.gen_range(0..Species::ALL.len())]
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validate a raw state value coming from an untyped source.
pub fn validate_state(field: &'static str, value: i64) -> Result<State> {
    if value < 0 {
        return Err(SquirmError::negative_state(field, value));
    }
    Ok(value as State)
}

/// A grid coordinate. Always non-negative; bounds are checked by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Largest per-axis distance. Bonded cells must stay within 1.
    pub fn chebyshev(&self, other: &Position) -> usize {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Sum of per-axis distances.
    pub fn manhattan(&self, other: &Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Whether the two positions share an edge.
    pub fn is_orthogonal_to(&self, other: &Position) -> bool {
        self.manhattan(other) == 1
    }

    /// The neighbouring position in `direction`, or `None` if it would
    /// leave `[0, width) x [0, height)`.
    pub fn step(&self, direction: Direction, width: usize, height: usize) -> Option<Position> {
        let (dx, dy) = direction.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        (x < width && y < height).then_some(Position { x, y })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the eight compass offsets of the Moore neighbourhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    West,
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
}

impl Direction {
    /// Neighbourhood scan order, clockwise starting west.
    pub const ALL: [Direction; 8] = [
        Direction::West,
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
    ];

    /// `(dx, dy)` with y growing downwards.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
    }
}

/// How a cell picks its move each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementPolicy {
    /// Uniform choice among all bond-preserving empty neighbours.
    #[default]
    Brownian,
    /// Keep going in the last heading while possible, otherwise pick a
    /// new random heading and wait.
    Momentum,
}
