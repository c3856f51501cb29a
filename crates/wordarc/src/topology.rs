// topology.rs
//
// Static grid shape: which cells exist and which word slots run through them.
// Built once per level, immutable afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction a slot runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Identifier of one of the four word slots in the cross grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotId {
    Top,
    Left,
    Mid,
    Bottom,
}

impl SlotId {
    /// Assignment order. The tie-break policy in `assign` depends on this.
    pub const ALL: [SlotId; 4] = [SlotId::Top, SlotId::Left, SlotId::Mid, SlotId::Bottom];
}

/// A grid cell coordinate. (0, 0) is the top-left of the cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: u8,
    pub y: u8,
}

impl GridCoord {
    pub const fn new(x: u8, y: u8) -> Self {
        GridCoord { x, y }
    }
}

/// One fixed line segment a single word occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub origin: GridCoord,
    pub dir: Direction,
    pub len: usize,
}

impl Slot {
    pub const fn new(id: SlotId, origin: GridCoord, dir: Direction, len: usize) -> Self {
        Slot { id, origin, dir, len }
    }

    /// Cell coordinates this slot covers, in index order.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.len).map(move |i| match self.dir {
            Direction::Horizontal => GridCoord::new(self.origin.x + i as u8, self.origin.y),
            Direction::Vertical => GridCoord::new(self.origin.x, self.origin.y + i as u8),
        })
    }

    /// Whether this slot covers the given coordinate.
    pub fn covers(&self, coord: GridCoord) -> bool {
        self.cells().any(|c| c == coord)
    }
}

/// Why a topology failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("slot {slot:?} covers ({},{}) which is outside the grid shape", cell.x, cell.y)]
    SlotOutsideShape { slot: SlotId, cell: GridCoord },
    #[error("cell ({},{}) is not covered by any slot", cell.x, cell.y)]
    UncoveredCell { cell: GridCoord },
    #[error("cell ({},{}) is covered by {covers} slots, expected 1 or 2", cell.x, cell.y)]
    OvercrossedCell { cell: GridCoord, covers: usize },
}

/// The fixed cross shape plus its four slot definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridTopology {
    /// Ordered set of cell coordinates forming the shape.
    pub shape: Vec<GridCoord>,
    pub slots: [Slot; 4],
}

impl GridTopology {
    /// The cross layout used by the level: a 4-cell horizontal top row,
    /// two vertical 3-cell columns hanging from its ends' neighbourhood,
    /// and a 3-cell horizontal bottom row.
    ///
    /// ```text
    ///   T T T T      Top    (0,0) → (3,0)
    ///   L . M .      Left   (0,0) ↓ (0,2)
    ///   B B B .      Mid    (2,0) ↓ (2,2)
    ///                Bottom (0,2) → (2,2)
    /// ```
    pub fn cross() -> Self {
        let shape = vec![
            GridCoord::new(0, 0),
            GridCoord::new(1, 0),
            GridCoord::new(2, 0),
            GridCoord::new(3, 0),
            GridCoord::new(0, 1),
            GridCoord::new(2, 1),
            GridCoord::new(0, 2),
            GridCoord::new(1, 2),
            GridCoord::new(2, 2),
        ];
        let slots = [
            Slot::new(SlotId::Top, GridCoord::new(0, 0), Direction::Horizontal, 4),
            Slot::new(SlotId::Left, GridCoord::new(0, 0), Direction::Vertical, 3),
            Slot::new(SlotId::Mid, GridCoord::new(2, 0), Direction::Vertical, 3),
            Slot::new(SlotId::Bottom, GridCoord::new(0, 2), Direction::Horizontal, 3),
        ];
        GridTopology { shape, slots }
    }

    pub fn slot(&self, id: SlotId) -> &Slot {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .expect("all four slots present by construction")
    }

    /// Number of slots covering a coordinate.
    pub fn cover_count(&self, coord: GridCoord) -> usize {
        self.slots.iter().filter(|s| s.covers(coord)).count()
    }

    /// Cells covered by two slots simultaneously.
    pub fn crossings(&self) -> Vec<GridCoord> {
        self.shape
            .iter()
            .copied()
            .filter(|&c| self.cover_count(c) == 2)
            .collect()
    }

    /// Check the coverage invariant: every slot cell lies inside the shape,
    /// every shape cell is covered by at least one slot, and no cell is
    /// covered by more than two.
    pub fn validate(&self) -> Result<(), TopologyError> {
        for slot in &self.slots {
            for cell in slot.cells() {
                if !self.shape.contains(&cell) {
                    return Err(TopologyError::SlotOutsideShape { slot: slot.id, cell });
                }
            }
        }
        for &cell in &self.shape {
            match self.cover_count(cell) {
                0 => return Err(TopologyError::UncoveredCell { cell }),
                1 | 2 => {}
                covers => return Err(TopologyError::OvercrossedCell { cell, covers }),
            }
        }
        Ok(())
    }
}
