//! Concrete implementation of the Occupancy trait.
//!
//! Slots are stored row-major in a single `Vec<Option<CellId>>`, so every
//! query is one index computation.

use squirm_core::error::{PlacementError, Result, SquirmError};
use squirm_core::occupancy::Occupancy;
use squirm_core::types::*;

/// Dense slot grid.
#[derive(Debug, Clone)]
pub struct SlotGrid {
    width: usize,
    height: usize,
    slots: Vec<Option<CellId>>,
    occupied: usize,
}

impl SlotGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            slots: vec![None; width * height],
            occupied: 0,
        }
    }

    #[inline]
    fn index(&self, position: &Position) -> usize {
        assert!(
            self.contains(position),
            "{position} outside {}x{} grid",
            self.width,
            self.height
        );
        position.y * self.width + position.x
    }

    /// Check a position against the grid bounds, as a typed error.
    pub fn check_bounds(&self, position: &Position) -> Result<()> {
        if self.contains(position) {
            Ok(())
        } else {
            Err(PlacementError::OutOfBounds {
                position: *position,
                width: self.width,
                height: self.height,
            }
            .into())
        }
    }

    /// Iterate over every occupied slot in row-major order.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (Position, CellId)> + '_ {
        let width = self.width;
        self.slots.iter().enumerate().filter_map(move |(i, slot)| {
            slot.map(|id| (Position::new(i % width, i / width), id))
        })
    }
}

impl Occupancy for SlotGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn is_empty(&self, position: &Position) -> bool {
        self.slots[self.index(position)].is_none()
    }

    fn occupant(&self, position: &Position) -> Option<CellId> {
        self.slots[self.index(position)]
    }

    fn occupant_at(&self, position: &Position) -> Result<CellId> {
        self.occupant(position)
            .ok_or(SquirmError::Placement(PlacementError::Vacant(*position)))
    }

    fn place(&mut self, cell: CellId, position: &Position) -> Result<()> {
        let index = self.index(position);
        if self.slots[index].is_some() {
            return Err(SquirmError::occupied(*position));
        }
        self.slots[index] = Some(cell);
        self.occupied += 1;
        Ok(())
    }

    fn vacate(&mut self, position: &Position) {
        let index = self.index(position);
        if self.slots[index].take().is_some() {
            self.occupied -= 1;
        }
    }

    fn occupied_count(&self) -> usize {
        self.occupied
    }
}
