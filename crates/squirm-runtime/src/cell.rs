//! Cell: one molecule on the grid.

use serde::Serialize;
use squirm_core::types::*;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::BuildHasherDefault;

/// Bond partners of a cell.
///
/// Membership is what matters, so this is a hash set. The hasher has
/// fixed keys: iteration order then depends only on the sequence of
/// inserts and removes, which keeps seeded runs reproducible.
pub type BondSet = HashSet<CellId, BuildHasherDefault<DefaultHasher>>;

/// A molecule: fixed species, mutable state, a position and its bonds.
#[derive(Debug, Clone)]
pub struct Cell {
    species: Species,
    state: State,
    position: Position,
    pub(crate) bonds: BondSet,
    /// Ticks since the state last changed.
    age: u64,
    /// Last heading, used only by momentum movement.
    pub(crate) heading: Option<Direction>,
}

impl Cell {
    pub(crate) fn new(species: Species, state: State, position: Position) -> Self {
        Self {
            species,
            state,
            position,
            bonds: BondSet::default(),
            age: 0,
            heading: None,
        }
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn bonds(&self) -> &BondSet {
        &self.bonds
    }

    pub fn is_bonded_to(&self, other: CellId) -> bool {
        self.bonds.contains(&other)
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    /// Change the state. A real change resets the age counter; setting
    /// the same value again is a no-op.
    pub(crate) fn set_state(&mut self, state: State) {
        if self.state != state {
            self.state = state;
            self.age = 0;
        }
    }

    /// Count one more tick without a state change.
    pub(crate) fn age_self(&mut self) {
        self.age = self.age.saturating_add(1);
    }

    /// Species code followed by state, e.g. `e8`.
    pub fn label(&self) -> String {
        format!("{}{}", self.species.code(), self.state)
    }

    pub fn snapshot(&self) -> CellSnapshot {
        CellSnapshot {
            species: self.species,
            state: self.state,
            position: self.position,
            bond_count: self.bonds.len(),
            age: self.age,
        }
    }
}

/// A serializable view of a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellSnapshot {
    pub species: Species,
    pub state: State,
    pub position: Position,
    pub bond_count: usize,
    pub age: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_change_resets_age() {
        let mut cell = Cell::new(Species::A, 1, Position::new(0, 0));
        cell.age_self();
        cell.age_self();
        assert_eq!(cell.age(), 2);

        cell.set_state(1);
        assert_eq!(cell.age(), 2, "same state is not a change");

        cell.set_state(4);
        assert_eq!(cell.state(), 4);
        assert_eq!(cell.age(), 0);
    }

    #[test]
    fn label_is_code_then_state() {
        let cell = Cell::new(Species::F, 12, Position::new(3, 4));
        assert_eq!(cell.label(), "f12");
        assert_eq!(cell.snapshot().bond_count, 0);
    }
}
