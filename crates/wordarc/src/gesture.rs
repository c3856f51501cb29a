// gesture.rs
//
// Turns a pointer-position stream into an ordered, duplicate-free sequence
// of activated tray buttons. One session per pointer-down; the session is
// consumed on release. Word validation lives in the session layer so manual
// and automated completion share one commit path.

use glam::Vec2;

use crate::events::{ButtonId, PresentationEvent};
use crate::tray::Tray;

/// Who is driving the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOrigin {
    /// A real pointer.
    Player,
    /// The autoplay driver.
    System,
}

/// Ephemeral record of one continuous pointer-down-to-up interaction.
#[derive(Debug, Clone)]
pub struct GestureSession {
    pub origin: GestureOrigin,
    /// Activated buttons in activation order, duplicate-free.
    pub buttons: Vec<ButtonId>,
    /// Concatenation of the activated buttons' letters.
    pub word: String,
}

/// Tracks the currently open gesture, if any.
#[derive(Debug, Default)]
pub struct GestureTracker {
    session: Option<GestureSession>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn origin(&self) -> Option<GestureOrigin> {
        self.session.as_ref().map(|s| s.origin)
    }

    pub fn active_word(&self) -> &str {
        self.session.as_ref().map(|s| s.word.as_str()).unwrap_or("")
    }

    /// Open a session and activate the first button. No-op if a session is
    /// already open (a second pointer is rejected, not queued).
    pub fn begin(
        &mut self,
        origin: GestureOrigin,
        button: ButtonId,
        tray: &mut Tray,
        events: &mut Vec<PresentationEvent>,
    ) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(GestureSession {
            origin,
            buttons: Vec::with_capacity(8),
            word: String::with_capacity(8),
        });
        self.activate(button, tray, events);
        true
    }

    /// Proximity test against the moving pointer. At most one button is
    /// taken per call: the first in tray order within `radius` that is not
    /// already part of the session. Always recomputes the full polyline.
    pub fn extend(
        &mut self,
        pointer: Vec2,
        radius: f32,
        tray: &mut Tray,
        events: &mut Vec<PresentationEvent>,
    ) {
        let Some(session) = &self.session else {
            return;
        };
        if let Some(id) = tray.hit(pointer, radius, &session.buttons) {
            self.activate(id, tray, events);
        }
        events.push(PresentationEvent::PathUpdated {
            points: self.path(tray, Some(pointer)),
        });
    }

    /// Activate a button in the open session. Re-activation is a no-op.
    /// Used for both proximity hits and autoplay arrivals.
    pub fn activate(
        &mut self,
        id: ButtonId,
        tray: &mut Tray,
        events: &mut Vec<PresentationEvent>,
    ) {
        let Some(session) = &mut self.session else {
            return;
        };
        if session.buttons.contains(&id) {
            return;
        }
        let Some(button) = tray.get_mut(id) else {
            return;
        };
        button.active = true;
        session.buttons.push(id);
        session.word.push(button.letter);
        events.push(PresentationEvent::ButtonActivated { button: id, active: true });
        events.push(PresentationEvent::WordPreview { text: Some(session.word.clone()) });
    }

    /// The polyline through all activated button centers in activation
    /// order, plus the live pointer position if given.
    pub fn path(&self, tray: &Tray, pointer: Option<Vec2>) -> Vec<Vec2> {
        let mut points: Vec<Vec2> = self
            .session
            .iter()
            .flat_map(|s| s.buttons.iter())
            .filter_map(|&id| tray.get(id).map(|b| b.pos))
            .collect();
        if let Some(p) = pointer {
            if !points.is_empty() {
                points.push(p);
            }
        }
        points
    }

    /// Close and consume the session. `None` if no session is open, so a
    /// second release in a row has no additional effect.
    pub fn take(&mut self) -> Option<GestureSession> {
        self.session.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_tray() -> Tray {
        Tray::new(&['G', 'O', 'D', 'L'], Vec2::new(240.0, 580.0), 70.0)
    }

    #[test]
    fn begin_opens_and_activates() {
        let mut tray = demo_tray();
        let mut tracker = GestureTracker::new();
        let mut events = Vec::new();
        assert!(tracker.begin(GestureOrigin::Player, ButtonId(0), &mut tray, &mut events));
        assert!(tracker.is_open());
        assert_eq!(tracker.active_word(), "G");
        assert!(tray.get(ButtonId(0)).unwrap().active);
        assert!(events.contains(&PresentationEvent::ButtonActivated {
            button: ButtonId(0),
            active: true
        }));
    }

    #[test]
    fn begin_while_open_is_rejected() {
        let mut tray = demo_tray();
        let mut tracker = GestureTracker::new();
        let mut events = Vec::new();
        tracker.begin(GestureOrigin::Player, ButtonId(0), &mut tray, &mut events);
        assert!(!tracker.begin(GestureOrigin::Player, ButtonId(1), &mut tray, &mut events));
        assert_eq!(tracker.active_word(), "G");
    }

    #[test]
    fn duplicate_activation_is_noop() {
        let mut tray = demo_tray();
        let mut tracker = GestureTracker::new();
        let mut events = Vec::new();
        tracker.begin(GestureOrigin::Player, ButtonId(0), &mut tray, &mut events);
        tracker.activate(ButtonId(0), &mut tray, &mut events);
        assert_eq!(tracker.active_word(), "G");
        assert_eq!(tracker.take().unwrap().buttons, vec![ButtonId(0)]);
    }

    #[test]
    fn extend_takes_at_most_one_button_per_call() {
        // Two buttons stacked on the same spot: one call picks only the
        // first in tray order.
        let mut tray = Tray::new(&['A', 'B'], Vec2::ZERO, 0.0);
        let mut tracker = GestureTracker::new();
        let mut events = Vec::new();
        tracker.begin(GestureOrigin::Player, ButtonId(0), &mut tray, &mut events);
        tracker.extend(Vec2::ZERO, 36.0, &mut tray, &mut events);
        assert_eq!(tracker.active_word(), "AB");
        // The second call has nothing left to take.
        tracker.extend(Vec2::ZERO, 36.0, &mut tray, &mut events);
        assert_eq!(tracker.active_word(), "AB");
    }

    #[test]
    fn extend_recomputes_full_path() {
        let mut tray = demo_tray();
        let mut tracker = GestureTracker::new();
        let mut events = Vec::new();
        tracker.begin(GestureOrigin::Player, ButtonId(0), &mut tray, &mut events);
        events.clear();

        let pointer = Vec2::new(200.0, 500.0);
        tracker.extend(pointer, 1.0, &mut tray, &mut events);
        let path = events
            .iter()
            .find_map(|e| match e {
                PresentationEvent::PathUpdated { points } => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path[0], tray.get(ButtonId(0)).unwrap().pos);
        assert_eq!(path[1], pointer);
    }

    #[test]
    fn extend_without_session_is_noop() {
        let mut tray = demo_tray();
        let mut tracker = GestureTracker::new();
        let mut events = Vec::new();
        tracker.extend(Vec2::new(240.0, 510.0), 36.0, &mut tray, &mut events);
        assert!(events.is_empty());
        assert!(!tracker.is_open());
    }

    #[test]
    fn take_is_idempotent() {
        let mut tray = demo_tray();
        let mut tracker = GestureTracker::new();
        let mut events = Vec::new();
        tracker.begin(GestureOrigin::System, ButtonId(2), &mut tray, &mut events);
        let session = tracker.take().unwrap();
        assert_eq!(session.origin, GestureOrigin::System);
        assert_eq!(session.word, "D");
        assert!(tracker.take().is_none());
    }

    #[test]
    fn swipe_across_ring_builds_word() {
        let mut tray = demo_tray();
        let mut tracker = GestureTracker::new();
        let mut events = Vec::new();
        let order: Vec<ButtonId> = tray.buttons_for_word("GOLD").unwrap();
        tracker.begin(GestureOrigin::Player, order[0], &mut tray, &mut events);
        for &id in &order[1..] {
            let pos = tray.get(id).unwrap().pos;
            tracker.extend(pos, 36.0, &mut tray, &mut events);
        }
        assert_eq!(tracker.active_word(), "GOLD");
    }
}
