// config.rs
//
// All tunable timing and geometry for a session. The source drafts disagree
// on several durations, so every such constant is configuration with the
// newest draft's values as defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Configuration for a game session, provided by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Center of the circular letter tray in world units.
    pub tray_center: Vec2,
    /// Ring radius the buttons sit on.
    pub tray_radius: f32,
    /// Pointer-to-button distance that activates a button during a swipe.
    pub activation_radius: f32,
    /// Player idle time before the tutorial hand appears (seconds).
    pub idle_delay: f32,
    /// Duration of one hand movement between buttons while demonstrating.
    pub hand_step_duration: f32,
    /// Gap between successive hand movements.
    pub hand_step_gap: f32,
    /// Pause after a full demonstration sweep before it repeats.
    pub loop_pause: f32,
    /// Completed demonstration loops before autoplay takes over.
    pub autoplay_after_loops: u32,
    /// Duration of one hand movement between buttons during autoplay.
    pub autoplay_step_duration: f32,
    /// Delay between the last autoplay activation and the simulated release.
    pub release_delay: f32,
    /// Vertical offset of the hand sprite above a button center.
    pub hand_lift: f32,
    /// Seed for the shuffle RNG.
    pub rng_seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tray_center: Vec2::new(240.0, 580.0),
            tray_radius: 70.0,
            activation_radius: 36.0,
            idle_delay: 7.0,
            hand_step_duration: 0.7,
            hand_step_gap: 0.04,
            loop_pause: 0.7,
            autoplay_after_loops: 2,
            autoplay_step_duration: 1.2,
            release_delay: 0.18,
            hand_lift: 10.0,
            rng_seed: 42,
        }
    }
}
