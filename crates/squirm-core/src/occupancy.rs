//! Occupancy: the grid contract the chemistry is written against.
//!
//! The grid is a fixed width × height array of slots. Each slot holds at
//! most one cell handle. Cells also record their own position; keeping
//! the two views in agreement is the job of whoever mutates them.

use crate::error::Result;
use crate::types::*;

/// A bounded 2-D array of single-occupant slots.
///
/// Every position handed to the slot methods must already be in bounds.
/// Callers check with [`Occupancy::contains`] or generate positions via
/// [`Position::step`].
pub trait Occupancy {
    /// Number of columns.
    fn width(&self) -> usize;

    /// Number of rows.
    fn height(&self) -> usize;

    /// Whether the position lies inside the grid.
    fn contains(&self, position: &Position) -> bool {
        position.x < self.width() && position.y < self.height()
    }

    /// Whether the slot holds no cell.
    fn is_empty(&self, position: &Position) -> bool;

    /// The occupant of a slot, if any.
    fn occupant(&self, position: &Position) -> Option<CellId>;

    /// The occupant of a slot. Fails if the slot is empty.
    fn occupant_at(&self, position: &Position) -> Result<CellId>;

    /// Put a cell into an empty slot. Fails if the slot is occupied.
    fn place(&mut self, cell: CellId, position: &Position) -> Result<()>;

    /// Empty a slot. Vacating an empty slot is a no-op.
    fn vacate(&mut self, position: &Position);

    /// Number of occupied slots.
    fn occupied_count(&self) -> usize;
}
