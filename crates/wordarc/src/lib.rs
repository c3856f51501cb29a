// wordarc: headless connect-the-letters word puzzle core. The host feeds
// pointer input and ticks, then drains presentation events to drive
// whatever renderer it has.

pub mod assign;
pub mod config;
pub mod easing;
pub mod events;
pub mod gesture;
pub mod input;
pub mod level;
pub mod rng;
pub mod session;
pub mod topology;
pub mod tray;
pub mod tutorial;

// Re-export key types at crate root for convenience
pub use assign::{assign, AssignError, SlotAssignment};
pub use config::SessionConfig;
pub use easing::{ease, ease_vec2, lerp, lerp_vec2, Easing};
pub use events::{ButtonId, PresentationEvent};
pub use gesture::{GestureOrigin, GestureSession, GestureTracker};
pub use input::{InputEvent, InputQueue};
pub use level::{LevelData, LevelError};
pub use rng::Rng;
pub use session::{GameSession, TurnState};
pub use topology::{Direction, GridCoord, GridTopology, Slot, SlotId, TopologyError};
pub use tray::{Tray, TrayButton};
pub use tutorial::{TutorialCmd, TutorialCoordinator};
