// tutorial.rs
//
// Supervises player idle time. After a quiet period it demonstrates the next
// unsolved word with a looping hand sweep, and after enough loops it engages
// autoplay: a synthetic gesture driven through the same activation path as a
// real swipe. The phase enum is the only motion driver; replacing the phase
// disposes the previous timeline, so drivers cannot stack.

use glam::Vec2;

use crate::config::SessionConfig;
use crate::easing::{ease_vec2, Easing};
use crate::events::ButtonId;
use crate::tray::Tray;

/// What the coordinator wants done this tick, applied by the session in
/// order. The coordinator never touches session state directly.
#[derive(Debug, Clone, PartialEq)]
pub enum TutorialCmd {
    /// Show the hint panel for the demonstrated word.
    ShowHint(String),
    /// Move the simulated hand.
    HandTo(Vec2),
    /// Open a system-originated gesture on the first button.
    BeginAutoplay { first: ButtonId },
    /// Activate a button the hand has arrived at.
    Activate(ButtonId),
    /// Simulated release: run the shared commit/reject path.
    FinishGesture,
}

/// A looping hand sweep over the tutorial word's buttons.
#[derive(Debug, Clone)]
struct HandLoop {
    word: String,
    /// Button ids with their lifted hand positions, in word order.
    stops: Vec<(ButtonId, Vec2)>,
    /// Index of the stop the hand is moving toward.
    leg: usize,
    from: Vec2,
    elapsed: f32,
    /// Remaining inter-leg gap or end-of-loop pause.
    wait: f32,
    loops_done: u32,
    hand: Vec2,
}

/// The synthetic gesture timeline.
#[derive(Debug, Clone)]
struct AutoplayRun {
    stops: Vec<(ButtonId, Vec2)>,
    leg: usize,
    from: Vec2,
    elapsed: f32,
    hand: Vec2,
    /// Countdown between the last activation and the simulated release.
    releasing: Option<f32>,
}

#[derive(Debug, Clone)]
enum Phase {
    Dormant,
    Scheduled { remaining: f32 },
    Demonstrating(HandLoop),
    Autoplay(AutoplayRun),
}

/// The tutorial/autoplay state machine.
#[derive(Debug)]
pub struct TutorialCoordinator {
    phase: Phase,
}

impl TutorialCoordinator {
    pub fn new() -> Self {
        TutorialCoordinator { phase: Phase::Dormant }
    }

    /// (Re)arm the idle timer. Any call cancels a prior pending timer and
    /// disposes an in-flight demonstration. No-op while autoplay is engaged.
    pub fn schedule(&mut self, delay: f32) {
        if matches!(self.phase, Phase::Autoplay(_)) {
            return;
        }
        log::debug!("tutorial armed in {delay}s");
        self.phase = Phase::Scheduled { remaining: delay };
    }

    /// Cancel everything and go dormant. Disposes any simulated-motion
    /// timeline.
    pub fn cancel(&mut self) {
        self.phase = Phase::Dormant;
    }

    /// A demonstration or autoplay is currently showing visuals.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Demonstrating(_) | Phase::Autoplay(_))
    }

    pub fn is_demonstrating(&self) -> bool {
        matches!(self.phase, Phase::Demonstrating(_))
    }

    pub fn is_autoplaying(&self) -> bool {
        matches!(self.phase, Phase::Autoplay(_))
    }

    /// Advance timers and the hand. `next_word` is the first unsolved word
    /// in level order, or `None` when the level is complete.
    pub fn tick(
        &mut self,
        dt: f32,
        tray: &Tray,
        next_word: Option<&str>,
        cfg: &SessionConfig,
        out: &mut Vec<TutorialCmd>,
    ) {
        enum Transition {
            None,
            StartDemo,
            Engage,
            Dispose,
        }

        let transition = match &mut self.phase {
            Phase::Dormant => Transition::None,
            Phase::Scheduled { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    Transition::StartDemo
                } else {
                    Transition::None
                }
            }
            Phase::Demonstrating(hand_loop) => {
                if tick_hand_loop(hand_loop, dt, cfg, out) {
                    Transition::Engage
                } else {
                    Transition::None
                }
            }
            Phase::Autoplay(run) => {
                if tick_autoplay(run, dt, cfg, out) {
                    Transition::Dispose
                } else {
                    Transition::None
                }
            }
        };

        match transition {
            Transition::None => {}
            Transition::StartDemo => self.start_demonstration(tray, next_word, cfg, out),
            Transition::Engage => self.engage_autoplay(out),
            Transition::Dispose => self.phase = Phase::Dormant,
        }
    }

    fn start_demonstration(
        &mut self,
        tray: &Tray,
        next_word: Option<&str>,
        cfg: &SessionConfig,
        out: &mut Vec<TutorialCmd>,
    ) {
        let Some(word) = next_word else {
            self.phase = Phase::Dormant;
            return;
        };
        let Some(stops) = resolve_stops(tray, word, cfg.hand_lift) else {
            // Letters missing from the tray; nothing to demonstrate.
            log::debug!("tutorial word '{word}' not resolvable, aborting demonstration");
            self.phase = Phase::Dormant;
            return;
        };
        log::debug!("demonstrating '{word}'");
        let start = stops[0].1;
        out.push(TutorialCmd::ShowHint(word.to_string()));
        out.push(TutorialCmd::HandTo(start));
        self.phase = Phase::Demonstrating(HandLoop {
            word: word.to_string(),
            stops,
            leg: 0,
            from: start,
            elapsed: 0.0,
            wait: 0.0,
            loops_done: 0,
            hand: start,
        });
    }

    fn engage_autoplay(&mut self, out: &mut Vec<TutorialCmd>) {
        let Phase::Demonstrating(hand_loop) = &self.phase else {
            return;
        };
        log::info!("autoplay engaged for '{}'", hand_loop.word);
        let stops = hand_loop.stops.clone();
        let start = stops[0].1;
        out.push(TutorialCmd::BeginAutoplay { first: stops[0].0 });
        out.push(TutorialCmd::HandTo(start));
        self.phase = Phase::Autoplay(AutoplayRun {
            stops,
            leg: 1,
            from: start,
            elapsed: 0.0,
            hand: start,
            releasing: None,
        });
    }
}

impl Default for TutorialCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Map the word to button stops, hand positions lifted above the centers.
fn resolve_stops(tray: &Tray, word: &str, lift: f32) -> Option<Vec<(ButtonId, Vec2)>> {
    let ids = tray.buttons_for_word(word)?;
    if ids.is_empty() {
        return None;
    }
    Some(
        ids.into_iter()
            .map(|id| {
                let pos = tray.get(id).map(|b| b.pos).unwrap_or_default();
                (id, pos - Vec2::new(0.0, lift))
            })
            .collect(),
    )
}

/// Advance a demonstration sweep. Returns true when the loop count reaches
/// the autoplay threshold.
fn tick_hand_loop(
    hand_loop: &mut HandLoop,
    dt: f32,
    cfg: &SessionConfig,
    out: &mut Vec<TutorialCmd>,
) -> bool {
    let mut remaining = dt;
    while remaining > 0.0 {
        if hand_loop.wait > 0.0 {
            let step = remaining.min(hand_loop.wait);
            hand_loop.wait -= step;
            remaining -= step;
            if hand_loop.wait > 0.0 {
                break;
            }
            if hand_loop.leg >= hand_loop.stops.len() {
                // End-of-loop pause finished.
                hand_loop.loops_done += 1;
                if hand_loop.loops_done >= cfg.autoplay_after_loops {
                    return true;
                }
                hand_loop.leg = 0;
                hand_loop.from = hand_loop.hand;
                hand_loop.elapsed = 0.0;
            }
            continue;
        }

        if hand_loop.leg >= hand_loop.stops.len() {
            hand_loop.wait = cfg.loop_pause.max(f32::MIN_POSITIVE);
            continue;
        }

        let target = hand_loop.stops[hand_loop.leg].1;
        let duration = cfg.hand_step_duration;
        let step = remaining.min((duration - hand_loop.elapsed).max(0.0));
        hand_loop.elapsed += step;
        remaining -= step;
        let t = if duration > 0.0 {
            (hand_loop.elapsed / duration).min(1.0)
        } else {
            1.0
        };
        hand_loop.hand = ease_vec2(hand_loop.from, target, t, Easing::QuadInOut);
        out.push(TutorialCmd::HandTo(hand_loop.hand));
        if hand_loop.elapsed >= duration {
            hand_loop.from = target;
            hand_loop.leg += 1;
            hand_loop.elapsed = 0.0;
            if hand_loop.leg < hand_loop.stops.len() {
                hand_loop.wait = cfg.hand_step_gap;
            }
        }
    }
    false
}

/// Advance the synthetic gesture. Returns true once the release fires.
fn tick_autoplay(
    run: &mut AutoplayRun,
    dt: f32,
    cfg: &SessionConfig,
    out: &mut Vec<TutorialCmd>,
) -> bool {
    let mut remaining = dt;
    while remaining > 0.0 {
        if let Some(release) = &mut run.releasing {
            *release -= remaining.min(*release);
            if *release <= 0.0 {
                out.push(TutorialCmd::FinishGesture);
                return true;
            }
            break;
        }

        if run.leg >= run.stops.len() {
            run.releasing = Some(cfg.release_delay);
            continue;
        }

        let target = run.stops[run.leg].1;
        let duration = cfg.autoplay_step_duration;
        let step = remaining.min((duration - run.elapsed).max(0.0));
        run.elapsed += step;
        remaining -= step;
        let t = if duration > 0.0 {
            (run.elapsed / duration).min(1.0)
        } else {
            1.0
        };
        run.hand = ease_vec2(run.from, target, t, Easing::QuadInOut);
        out.push(TutorialCmd::HandTo(run.hand));
        if run.elapsed >= duration {
            out.push(TutorialCmd::Activate(run.stops[run.leg].0));
            run.from = target;
            run.leg += 1;
            run.elapsed = 0.0;
        }
    }
    false
}
