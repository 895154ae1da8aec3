//! Population: the cells, the grid they sit on, and the bond graph.
//!
//! Cells live in a generational arena and refer to each other only by
//! [`CellId`]. The grid stores the same handles, and an ordered live list
//! fixes the order in which a tick visits cells. Every mutation here keeps
//! three things in step:
//!
//! 1. a cell's recorded position and the slot holding its handle
//! 2. the live list and the arena
//! 3. both directions of every bond
//!
//! Requests that can legitimately be refused (placing onto an occupied
//! slot, bonding far-apart cells) return errors. Discovering that one of
//! the three properties above already broke is a panic.

use crate::cell::Cell;
use crate::grid_impl::SlotGrid;
use rand::Rng;
use slotmap::SlotMap;
use squirm_core::error::{BondError, InvariantError, Result, SquirmError};
use squirm_core::occupancy::Occupancy;
use squirm_core::types::*;
use tracing::{debug, trace};

/// All live cells plus their grid and bonds.
#[derive(Debug, Clone)]
pub struct Population {
    grid: SlotGrid,
    cells: SlotMap<CellId, Cell>,
    order: Vec<CellId>,
}

impl Population {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid: SlotGrid::new(width, height),
            cells: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.cells.contains_key(id)
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// Live cell handles in processing order.
    pub fn order(&self) -> &[CellId] {
        &self.order
    }

    /// Live cells in processing order.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Cell)> + '_ {
        self.order.iter().map(move |&id| (id, &self.cells[id]))
    }

    /// The cell occupying a position, if the position is in bounds and occupied.
    pub fn cell_at(&self, position: &Position) -> Option<(CellId, &Cell)> {
        if !self.grid.contains(position) {
            return None;
        }
        let id = self.grid.occupant(position)?;
        Some((id, &self.cells[id]))
    }

    /// Create an unbonded cell in an empty slot.
    pub fn spawn(&mut self, species: Species, state: State, position: Position) -> Result<CellId> {
        self.grid.check_bounds(&position)?;
        if !self.grid.is_empty(&position) {
            return Err(SquirmError::occupied(position));
        }
        let id = self.cells.insert(Cell::new(species, state, position));
        self.grid.place(id, &position)?;
        self.order.push(id);
        Ok(id)
    }

    /// Remove a cell, severing its bonds first.
    pub fn remove(&mut self, id: CellId) {
        self.detach(id);
        self.order.retain(|&live| live != id);
    }

    /// Remove every cell whose position satisfies `doomed`, severing
    /// bonds first. Returns how many cells were removed.
    pub fn remove_where<F>(&mut self, mut doomed: F) -> usize
    where
        F: FnMut(&Position) -> bool,
    {
        let victims: Vec<CellId> = self
            .iter()
            .filter(|(_, cell)| doomed(&cell.position()))
            .map(|(id, _)| id)
            .collect();
        for &id in &victims {
            self.detach(id);
        }
        let cells = &self.cells;
        self.order.retain(|&id| cells.contains_key(id));
        victims.len()
    }

    /// Break bonds, vacate the slot and drop the cell from the arena.
    /// The live list is fixed up by the caller.
    fn detach(&mut self, id: CellId) {
        let partners: Vec<CellId> = self.cells[id].bonds.iter().copied().collect();
        for partner in partners {
            self.unbond(id, partner);
        }
        let position = self.cells[id].position();
        self.grid.vacate(&position);
        self.cells.remove(id);
    }

    // --- Bonds ---

    pub fn are_bonded(&self, a: CellId, b: CellId) -> bool {
        self.cells.get(a).is_some_and(|cell| cell.is_bonded_to(b))
    }

    /// Bond two cells. Avoiding duplicate or self bonds is the caller's job.
    pub(crate) fn bond(&mut self, a: CellId, b: CellId) {
        debug_assert_ne!(a, b, "self-bond requested");
        debug_assert!(!self.are_bonded(a, b), "duplicate bond requested");
        self.cells[a].bonds.insert(b);
        self.cells[b].bonds.insert(a);
        debug!(
            us = %self.cells[a].label(),
            them = %self.cells[b].label(),
            bonds_us = self.cells[a].bonds.len(),
            "making bond"
        );
    }

    /// Bond two cells after checking the request makes sense.
    pub fn try_bond(&mut self, a: CellId, b: CellId) -> Result<()> {
        if a == b {
            return Err(BondError::SelfBond.into());
        }
        let (Some(first), Some(second)) = (self.cells.get(a), self.cells.get(b)) else {
            return Err(BondError::UnknownCell.into());
        };
        let (pa, pb) = (first.position(), second.position());
        if first.is_bonded_to(b) {
            return Err(BondError::AlreadyBonded(pa, pb).into());
        }
        if pa.chebyshev(&pb) > 1 {
            return Err(BondError::NotAdjacent(pa, pb).into());
        }
        self.bond(a, b);
        Ok(())
    }

    /// Break a bond that must exist on both sides.
    ///
    /// # Panics
    ///
    /// If either side lacks the entry: the bond graph is corrupt.
    pub(crate) fn unbond(&mut self, a: CellId, b: CellId) {
        if !self.cells[a].bonds.remove(&b) {
            panic!(
                "breaking bond: {} at {} has no bond with {}",
                self.cells[a].label(),
                self.cells[a].position(),
                self.cells[b].label()
            );
        }
        if !self.cells[b].bonds.remove(&a) {
            panic!(
                "breaking bond: {} at {} has no reciprocal bond with {}",
                self.cells[b].label(),
                self.cells[b].position(),
                self.cells[a].label()
            );
        }
        debug!(us = %self.cells[a].label(), them = %self.cells[b].label(), "breaking bond");
    }

    /// Total number of bonds (each counted once).
    pub fn bond_count(&self) -> usize {
        self.cells.values().map(|cell| cell.bonds.len()).sum::<usize>() / 2
    }

    // --- State ---

    pub(crate) fn set_state(&mut self, id: CellId, state: State) {
        self.cells[id].set_state(state);
    }

    pub(crate) fn age_cell(&mut self, id: CellId) {
        self.cells[id].age_self();
    }

    // --- Neighbourhood ---

    /// Occupied 8-neighbours not already bonded to `id`, in direction order.
    pub fn unbonded_neighbours(&self, id: CellId) -> Vec<CellId> {
        let cell = &self.cells[id];
        let (width, height) = (self.width(), self.height());
        Direction::ALL
            .iter()
            .filter_map(|&dir| cell.position().step(dir, width, height))
            .filter_map(|pos| self.grid.occupant(&pos))
            .filter(|other| !cell.is_bonded_to(*other))
            .collect()
    }

    /// Current bond partners of `id`.
    pub fn bond_partners(&self, id: CellId) -> Vec<CellId> {
        self.cells[id].bonds.iter().copied().collect()
    }

    // --- Movement ---

    /// Would every bond of `id` stay 8-adjacent if it stood at `target`?
    pub fn would_keep_bonds(&self, id: CellId, target: &Position) -> bool {
        self.cells[id]
            .bonds
            .iter()
            .all(|&partner| self.cells[partner].position().chebyshev(target) <= 1)
    }

    fn is_valid_move(&self, id: CellId, target: &Position) -> bool {
        self.grid.is_empty(target) && self.would_keep_bonds(id, target)
    }

    /// Directions `id` may move in: in bounds, empty, bonds preserved.
    pub fn valid_moves(&self, id: CellId) -> Vec<Direction> {
        let from = self.cells[id].position();
        let (width, height) = (self.width(), self.height());
        Direction::ALL
            .into_iter()
            .filter(|&dir| {
                from.step(dir, width, height)
                    .is_some_and(|target| self.is_valid_move(id, &target))
            })
            .collect()
    }

    /// Relocate a cell to an empty slot.
    ///
    /// # Panics
    ///
    /// If the target slot is occupied; callers only pass validated targets.
    pub(crate) fn move_cell(&mut self, id: CellId, target: Position) {
        let from = self.cells[id].position();
        self.grid.vacate(&from);
        if let Err(err) = self.grid.place(id, &target) {
            panic!("moving {} from {from}: {err}", self.cells[id].label());
        }
        self.cells[id].set_position(target);
        trace!(cell = %self.cells[id].label(), %from, to = %target, "moved");
    }

    /// Let a cell take at most one step according to `policy`.
    /// Returns whether it moved.
    pub fn step_cell<R: Rng + ?Sized>(
        &mut self,
        id: CellId,
        policy: MovementPolicy,
        rng: &mut R,
    ) -> bool {
        let from = self.cells[id].position();
        let (width, height) = (self.width(), self.height());
        match policy {
            MovementPolicy::Brownian => {
                let choices = self.valid_moves(id);
                if choices.is_empty() {
                    return false;
                }
                let dir = choices[rng.gen_range(0..choices.len())];
                match from.step(dir, width, height) {
                    Some(target) => {
                        self.move_cell(id, target);
                        true
                    }
                    None => false,
                }
            }
            MovementPolicy::Momentum => {
                let heading = match self.cells[id].heading {
                    Some(heading) => heading,
                    None => Direction::random(rng),
                };
                match from.step(heading, width, height) {
                    Some(target) if self.is_valid_move(id, &target) => {
                        self.cells[id].heading = Some(heading);
                        self.move_cell(id, target);
                        true
                    }
                    _ => {
                        self.cells[id].heading = Some(Direction::random(rng));
                        false
                    }
                }
            }
        }
    }

    // --- Consistency ---

    /// Check every structural invariant, reporting the first violation.
    pub fn audit(&self) -> Result<()> {
        if self.order.len() != self.cells.len() {
            return Err(InvariantError::CountMismatch {
                listed: self.order.len(),
                stored: self.cells.len(),
            }
            .into());
        }
        if self.grid.occupied_count() != self.cells.len() {
            return Err(InvariantError::OccupancyMismatch {
                occupied: self.grid.occupied_count(),
                stored: self.cells.len(),
            }
            .into());
        }

        for (id, cell) in self.iter() {
            let position = cell.position();
            if self.grid.occupant(&position) != Some(id) {
                return Err(InvariantError::SlotMismatch { recorded: position }.into());
            }
            for &partner in cell.bonds() {
                if partner == id {
                    return Err(InvariantError::ReflexiveBond(position).into());
                }
                let Some(other) = self.cells.get(partner) else {
                    return Err(InvariantError::AsymmetricBond {
                        from: position,
                        to: position,
                    }
                    .into());
                };
                if !other.is_bonded_to(id) {
                    return Err(InvariantError::AsymmetricBond {
                        from: position,
                        to: other.position(),
                    }
                    .into());
                }
                if position.chebyshev(&other.position()) > 1 {
                    return Err(InvariantError::StretchedBond(position, other.position()).into());
                }
            }
        }

        for (position, id) in self.grid.iter_occupied() {
            if !self.cells.contains_key(id) {
                return Err(InvariantError::OrphanSlot(position).into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn pos(x: usize, y: usize) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn spawn_rejects_occupied_and_out_of_bounds() {
        let mut pop = Population::new(10, 10);
        pop.spawn(Species::A, 0, pos(2, 2)).unwrap();
        assert_eq!(
            pop.spawn(Species::B, 0, pos(2, 2)).unwrap_err(),
            SquirmError::occupied(pos(2, 2))
        );
        assert!(pop.spawn(Species::B, 0, pos(10, 0)).is_err());
        assert_eq!(pop.len(), 1);
        pop.audit().unwrap();
    }

    #[test]
    fn bonds_are_symmetric() {
        let mut pop = Population::new(10, 10);
        let a = pop.spawn(Species::A, 0, pos(2, 2)).unwrap();
        let b = pop.spawn(Species::B, 0, pos(3, 3)).unwrap();
        pop.try_bond(a, b).unwrap();
        assert!(pop.are_bonded(a, b));
        assert!(pop.are_bonded(b, a));
        assert_eq!(pop.bond_count(), 1);

        pop.unbond(b, a);
        assert!(!pop.are_bonded(a, b));
        assert!(!pop.are_bonded(b, a));
        pop.audit().unwrap();
    }

    #[test]
    fn checked_bond_rejects_bad_requests() {
        let mut pop = Population::new(10, 10);
        let a = pop.spawn(Species::A, 0, pos(2, 2)).unwrap();
        let b = pop.spawn(Species::B, 0, pos(3, 2)).unwrap();
        let far = pop.spawn(Species::C, 0, pos(5, 2)).unwrap();

        assert_eq!(pop.try_bond(a, a), Err(BondError::SelfBond.into()));
        assert!(matches!(pop.try_bond(a, far), Err(SquirmError::Bond(BondError::NotAdjacent(..)))));
        pop.try_bond(a, b).unwrap();
        assert!(matches!(pop.try_bond(b, a), Err(SquirmError::Bond(BondError::AlreadyBonded(..)))));
        assert_eq!(pop.bond_count(), 1);
    }

    #[test]
    #[should_panic(expected = "has no bond")]
    fn breaking_a_missing_bond_panics() {
        let mut pop = Population::new(10, 10);
        let a = pop.spawn(Species::A, 0, pos(2, 2)).unwrap();
        let b = pop.spawn(Species::B, 0, pos(3, 2)).unwrap();
        pop.unbond(a, b);
    }

    #[test]
    #[should_panic(expected = "reciprocal")]
    fn breaking_a_one_sided_bond_panics() {
        let mut pop = Population::new(10, 10);
        let a = pop.spawn(Species::A, 0, pos(2, 2)).unwrap();
        let b = pop.spawn(Species::B, 0, pos(3, 2)).unwrap();
        pop.cells[a].bonds.insert(b);
        pop.unbond(a, b);
    }

    #[test]
    fn audit_catches_one_sided_bond() {
        let mut pop = Population::new(10, 10);
        let a = pop.spawn(Species::A, 0, pos(2, 2)).unwrap();
        let b = pop.spawn(Species::B, 0, pos(3, 2)).unwrap();
        pop.cells[a].bonds.insert(b);
        let err = pop.audit().unwrap_err();
        assert!(err.is_invariant());
    }

    #[test]
    fn audit_reports_grid_count_separately_from_live_list() {
        let mut pop = Population::new(10, 10);
        pop.spawn(Species::A, 0, pos(2, 2)).unwrap();
        pop.spawn(Species::B, 0, pos(5, 5)).unwrap();
        pop.grid.vacate(&pos(5, 5));

        assert_eq!(
            pop.audit(),
            Err(SquirmError::Invariant(InvariantError::OccupancyMismatch {
                occupied: 1,
                stored: 2,
            }))
        );
    }

    #[test]
    fn audit_reports_live_list_shorter_than_arena() {
        let mut pop = Population::new(10, 10);
        pop.spawn(Species::A, 0, pos(2, 2)).unwrap();
        pop.spawn(Species::B, 0, pos(5, 5)).unwrap();
        pop.order.pop();

        assert_eq!(
            pop.audit(),
            Err(SquirmError::Invariant(InvariantError::CountMismatch {
                listed: 1,
                stored: 2,
            }))
        );
    }

    #[test]
    fn unbonded_neighbours_skip_partners_and_follow_direction_order() {
        let mut pop = Population::new(10, 10);
        let centre = pop.spawn(Species::A, 0, pos(5, 5)).unwrap();
        let east = pop.spawn(Species::B, 0, pos(6, 5)).unwrap();
        let west = pop.spawn(Species::C, 0, pos(4, 5)).unwrap();
        let north = pop.spawn(Species::D, 0, pos(5, 4)).unwrap();
        pop.spawn(Species::E, 0, pos(7, 5)).unwrap(); // two steps away
        pop.try_bond(centre, north).unwrap();

        assert_eq!(pop.unbonded_neighbours(centre), vec![west, east]);
        assert_eq!(pop.bond_partners(centre), vec![north]);
    }

    #[test]
    fn neighbours_at_the_border_stay_in_bounds() {
        let mut pop = Population::new(3, 3);
        let corner = pop.spawn(Species::A, 0, pos(0, 0)).unwrap();
        let diag = pop.spawn(Species::B, 0, pos(1, 1)).unwrap();
        assert_eq!(pop.unbonded_neighbours(corner), vec![diag]);
        assert_eq!(pop.valid_moves(corner).len(), 2);
    }

    #[test]
    fn move_that_would_stretch_a_bond_is_rejected() {
        // a at (5,5) bonded diagonally to b at (6,6); every neighbour of a
        // except (4,4) is filled, and (4,4) is two steps from b.
        let mut pop = Population::new(10, 10);
        let a = pop.spawn(Species::A, 0, pos(5, 5)).unwrap();
        let b = pop.spawn(Species::B, 0, pos(6, 6)).unwrap();
        pop.try_bond(a, b).unwrap();
        for (x, y) in [(4, 5), (5, 4), (6, 4), (6, 5), (5, 6), (4, 6)] {
            pop.spawn(Species::C, 0, pos(x, y)).unwrap();
        }
        assert!(!pop.would_keep_bonds(a, &pos(4, 4)));
        assert!(pop.valid_moves(a).is_empty());

        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..20 {
            assert!(!pop.step_cell(a, MovementPolicy::Brownian, &mut rng));
        }
        assert_eq!(pop.get(a).unwrap().position(), pos(5, 5));
        pop.audit().unwrap();
    }

    #[test]
    fn brownian_moves_keep_bonds_adjacent() {
        let mut pop = Population::new(12, 12);
        let ids: Vec<_> = (0..5)
            .map(|i| pop.spawn(Species::A, 1, pos(6, 3 + i)).unwrap())
            .collect();
        for pair in ids.windows(2) {
            pop.try_bond(pair[0], pair[1]).unwrap();
        }

        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..200 {
            for &id in &ids {
                pop.step_cell(id, MovementPolicy::Brownian, &mut rng);
                for partner in pop.bond_partners(id) {
                    let here = pop.get(id).unwrap().position();
                    let there = pop.get(partner).unwrap().position();
                    assert!(here.chebyshev(&there) <= 1);
                }
            }
        }
        pop.audit().unwrap();
    }

    #[test]
    fn momentum_keeps_heading_until_blocked() {
        let mut pop = Population::new(10, 1);
        let id = pop.spawn(Species::E, 0, pos(0, 0)).unwrap();
        pop.cells[id].heading = Some(Direction::East);

        let mut rng = SmallRng::seed_from_u64(3);
        for step in 1..10 {
            assert!(pop.step_cell(id, MovementPolicy::Momentum, &mut rng));
            assert_eq!(pop.get(id).unwrap().position(), pos(step, 0));
        }
        // blocked by the east wall: no move, new heading drawn
        assert!(!pop.step_cell(id, MovementPolicy::Momentum, &mut rng));
        assert_eq!(pop.get(id).unwrap().position(), pos(9, 0));
        assert!(pop.get(id).unwrap().heading().is_some());
    }

    #[test]
    fn removal_severs_bonds_and_frees_slot() {
        let mut pop = Population::new(10, 10);
        let a = pop.spawn(Species::A, 0, pos(1, 1)).unwrap();
        let b = pop.spawn(Species::B, 0, pos(2, 1)).unwrap();
        let c = pop.spawn(Species::C, 0, pos(3, 1)).unwrap();
        pop.try_bond(a, b).unwrap();
        pop.try_bond(b, c).unwrap();

        pop.remove(b);
        assert!(!pop.contains(b));
        assert!(pop.get(a).unwrap().bonds().is_empty());
        assert!(pop.get(c).unwrap().bonds().is_empty());
        assert!(pop.cell_at(&pos(2, 1)).is_none());
        assert_eq!(pop.order(), &[a, c]);
        pop.audit().unwrap();
    }

    #[test]
    fn remove_where_clears_a_region_and_keeps_order() {
        let mut pop = Population::new(10, 4);
        let left = pop.spawn(Species::A, 0, pos(1, 1)).unwrap();
        let right = pop.spawn(Species::B, 0, pos(5, 1)).unwrap();
        let edge = pop.spawn(Species::C, 0, pos(4, 1)).unwrap();
        let far = pop.spawn(Species::D, 0, pos(9, 3)).unwrap();
        pop.try_bond(edge, right).unwrap();

        let removed = pop.remove_where(|p| p.x >= 5);
        assert_eq!(removed, 2);
        assert!(!pop.contains(right));
        assert!(!pop.contains(far));
        assert_eq!(pop.order(), &[left, edge]);
        assert!(pop.get(edge).unwrap().bonds().is_empty());
        pop.audit().unwrap();
    }
}
