// events.rs
//
// Presentation-layer notifications. The core owns all game truth and emits
// these one-way; the host drains them each frame and renders accordingly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::topology::GridCoord;

/// Stable identifier for a tray button. Identities survive shuffles: a
/// shuffle permutes positions, never letters or ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ButtonId(pub u32);

/// An event communicated from the core to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PresentationEvent {
    /// A grid cell should display `ch`.
    CellRevealed { cell: GridCoord, ch: char },
    /// Toggle a tray button's active visual state.
    ButtonActivated { button: ButtonId, active: bool },
    /// Redraw the connecting line through these points (empty = clear).
    PathUpdated { points: Vec<Vec2> },
    /// Show (`Some`) or hide (`None`) the floating word-in-progress label.
    WordPreview { text: Option<String> },
    /// The released word was not a valid remaining word; shake and hide.
    WordRejected,
    /// Show or hide the tutorial hint panel text.
    HintShown { word: Option<String> },
    /// The tutorial hand moved.
    HandMoved { pos: Vec2 },
    /// Tray buttons were re-ordered; `order` is the new ring order.
    TrayShuffled { order: Vec<ButtonId> },
    /// All words found; trigger the end-of-level screen.
    GameComplete,
}
