// session.rs
//
// The root aggregate: found/remaining words, turn state, and the wiring
// between tray, gesture tracker and tutorial coordinator. All mutation
// enters through pointer_down/pointer_move/pointer_up/shuffle/tick; the
// presentation layer drains `PresentationEvent`s and owns no game truth.

use std::collections::HashSet;

use glam::Vec2;

use crate::assign::{assign, SlotAssignment};
use crate::config::SessionConfig;
use crate::events::{ButtonId, PresentationEvent};
use crate::gesture::{GestureOrigin, GestureTracker};
use crate::input::{InputEvent, InputQueue};
use crate::level::{LevelData, LevelError};
use crate::rng::Rng;
use crate::topology::GridTopology;
use crate::tray::Tray;
use crate::tutorial::{TutorialCmd, TutorialCoordinator};

/// Whose turn the interaction is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    /// A player gesture is open.
    Swiping,
    /// The autoplay driver owns the gesture.
    Autoplaying,
    /// All words found. Terminal: every further input is ignored.
    GameOver,
}

/// A loaded, playable puzzle.
pub struct GameSession {
    cfg: SessionConfig,
    topology: GridTopology,
    assignment: SlotAssignment,
    /// Target words in level order.
    words: Vec<String>,
    found: HashSet<String>,
    tray: Tray,
    tracker: GestureTracker,
    tutorial: TutorialCoordinator,
    turn: TurnState,
    rng: Rng,
    events: Vec<PresentationEvent>,
}

impl GameSession {
    /// Build a session from level data. Fails fast on malformed levels:
    /// wrong word count, inconsistent crossing letters, or words the tray
    /// cannot spell.
    pub fn new(level: LevelData, cfg: SessionConfig) -> Result<Self, LevelError> {
        let topology = GridTopology::cross();
        topology.validate()?;
        level.validate()?;
        let assignment = assign(&level.words, &topology)?;
        let tray = Tray::new(&level.letters, cfg.tray_center, cfg.tray_radius);

        let mut tutorial = TutorialCoordinator::new();
        tutorial.schedule(cfg.idle_delay);

        log::info!(
            "session ready: {} words, {} tray letters",
            level.words.len(),
            level.letters.len()
        );

        Ok(GameSession {
            rng: Rng::new(cfg.rng_seed),
            cfg,
            topology,
            assignment,
            words: level.words,
            found: HashSet::new(),
            tray,
            tracker: GestureTracker::new(),
            tutorial,
            turn: TurnState::Idle,
            events: Vec::new(),
        })
    }

    // -- Input surface --

    /// A touch began on a tray button. Preempts any demonstration or
    /// autoplay before the player's gesture opens.
    pub fn pointer_down(&mut self, button: ButtonId) {
        if self.turn == TurnState::GameOver {
            return;
        }
        self.preempt_tutorial();
        if self
            .tracker
            .begin(GestureOrigin::Player, button, &mut self.tray, &mut self.events)
        {
            self.turn = TurnState::Swiping;
        }
    }

    /// The pointer moved. Only a player-owned gesture follows the pointer.
    pub fn pointer_move(&mut self, pos: Vec2) {
        if self.turn != TurnState::Swiping {
            return;
        }
        self.tracker
            .extend(pos, self.cfg.activation_radius, &mut self.tray, &mut self.events);
    }

    /// The pointer was released.
    pub fn pointer_up(&mut self) {
        if self.turn != TurnState::Swiping {
            return;
        }
        self.finish_gesture();
    }

    /// Re-order the tray. Rejected while a gesture or autoplay is running.
    pub fn shuffle(&mut self) {
        match self.turn {
            TurnState::Swiping | TurnState::Autoplaying | TurnState::GameOver => return,
            TurnState::Idle => {}
        }
        self.preempt_tutorial();
        let order = self.tray.shuffle(&mut self.rng);
        log::debug!("tray shuffled: {order:?}");
        self.events.push(PresentationEvent::TrayShuffled { order });
        self.tutorial.schedule(self.cfg.idle_delay);
    }

    /// Advance timers and any tutorial motion by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if self.turn == TurnState::GameOver {
            return;
        }
        let next_word = self.next_unfound().map(str::to_string);
        let mut cmds = Vec::new();
        self.tutorial
            .tick(dt, &self.tray, next_word.as_deref(), &self.cfg, &mut cmds);
        for cmd in cmds {
            self.apply(cmd);
        }
    }

    /// Drain queued input events into the session.
    pub fn process(&mut self, input: &mut InputQueue) {
        for event in input.drain() {
            match event {
                InputEvent::PointerDown { button } => self.pointer_down(button),
                InputEvent::PointerMove { x, y } => self.pointer_move(Vec2::new(x, y)),
                InputEvent::PointerUp => self.pointer_up(),
                InputEvent::Shuffle => self.shuffle(),
            }
        }
    }

    // -- State access --

    /// Drain all pending presentation events.
    pub fn drain_events(&mut self) -> Vec<PresentationEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn turn_state(&self) -> TurnState {
        self.turn
    }

    pub fn is_game_over(&self) -> bool {
        self.turn == TurnState::GameOver
    }

    pub fn found_words(&self) -> &HashSet<String> {
        &self.found
    }

    /// Target words not yet found, in level order.
    pub fn remaining_words(&self) -> Vec<&str> {
        self.words
            .iter()
            .filter(|w| !self.found.contains(*w))
            .map(String::as_str)
            .collect()
    }

    pub fn tray(&self) -> &Tray {
        &self.tray
    }

    pub fn assignment(&self) -> &SlotAssignment {
        &self.assignment
    }

    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    // -- Internals --

    fn next_unfound(&self) -> Option<&str> {
        self.words
            .iter()
            .find(|w| !self.found.contains(*w))
            .map(String::as_str)
    }

    fn apply(&mut self, cmd: TutorialCmd) {
        match cmd {
            TutorialCmd::ShowHint(word) => {
                self.events.push(PresentationEvent::HintShown { word: Some(word) });
            }
            TutorialCmd::HandTo(pos) => {
                self.events.push(PresentationEvent::HandMoved { pos });
                if self.turn == TurnState::Autoplaying && self.tracker.is_open() {
                    self.events.push(PresentationEvent::PathUpdated {
                        points: self.tracker.path(&self.tray, Some(pos)),
                    });
                }
            }
            TutorialCmd::BeginAutoplay { first } => {
                self.turn = TurnState::Autoplaying;
                self.tracker
                    .begin(GestureOrigin::System, first, &mut self.tray, &mut self.events);
            }
            TutorialCmd::Activate(button) => {
                self.tracker.activate(button, &mut self.tray, &mut self.events);
            }
            TutorialCmd::FinishGesture => {
                self.finish_gesture();
            }
        }
    }

    /// Shared commit/reject path for manual release and autoplay release.
    fn finish_gesture(&mut self) {
        let Some(session) = self.tracker.take() else {
            return;
        };

        let word = session.word;
        let valid = self.words.contains(&word) && !self.found.contains(&word);

        if valid {
            log::info!("found '{word}' ({:?})", session.origin);
            self.found.insert(word.clone());
            self.events.push(PresentationEvent::WordPreview { text: None });
            self.reveal(&word);
        } else {
            log::debug!("rejected '{word}'");
            self.events.push(PresentationEvent::WordRejected);
            self.events.push(PresentationEvent::WordPreview { text: None });
        }

        // Deactivate touched buttons and clear the drawn path.
        for id in session.buttons {
            self.tray.set_active(id, false);
            self.events.push(PresentationEvent::ButtonActivated { button: id, active: false });
        }
        self.events.push(PresentationEvent::PathUpdated { points: Vec::new() });
        self.events.push(PresentationEvent::HintShown { word: None });

        if self.found.len() == self.words.len() {
            self.end_game();
            return;
        }

        self.turn = TurnState::Idle;
        self.tutorial.cancel();
        self.tutorial.schedule(self.cfg.idle_delay);
    }

    fn reveal(&mut self, word: &str) {
        let Some(slot) = self.assignment.slot_for_word(word) else {
            return;
        };
        for (cell, ch) in self.assignment.reveal_slot(slot, &self.topology) {
            self.events.push(PresentationEvent::CellRevealed { cell, ch });
        }
    }

    fn end_game(&mut self) {
        log::info!("all {} words found, game over", self.words.len());
        self.turn = TurnState::GameOver;
        self.tutorial.cancel();
        self.events.push(PresentationEvent::GameComplete);
    }

    /// Cancel any demonstration or autoplay, disposing its timeline and
    /// resetting the synthetic gesture, before a real input takes effect.
    fn preempt_tutorial(&mut self) {
        if self.turn == TurnState::Autoplaying {
            if let Some(session) = self.tracker.take() {
                for id in session.buttons {
                    self.tray.set_active(id, false);
                    self.events
                        .push(PresentationEvent::ButtonActivated { button: id, active: false });
                }
                self.events.push(PresentationEvent::PathUpdated { points: Vec::new() });
                self.events.push(PresentationEvent::WordPreview { text: None });
            }
            self.turn = TurnState::Idle;
        }
        if self.tutorial.is_active() {
            self.events.push(PresentationEvent::HintShown { word: None });
        }
        self.tutorial.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_session() -> GameSession {
        GameSession::new(LevelData::demo(), SessionConfig::default()).unwrap()
    }

    fn swipe(session: &mut GameSession, word: &str) {
        let ids = session.tray().buttons_for_word(word).unwrap();
        session.pointer_down(ids[0]);
        for &id in &ids[1..] {
            let pos = session.tray().get(id).unwrap().pos;
            session.pointer_move(pos);
        }
        session.pointer_up();
    }

    #[test]
    fn construction_validates_level() {
        let bad = LevelData::new(
            vec!['G', 'O', 'D', 'L'],
            vec!["GOLD".into(), "GOD".into(), "DOG".into()],
        );
        assert!(matches!(
            GameSession::new(bad, SessionConfig::default()),
            Err(LevelError::Assign(_))
        ));
    }

    #[test]
    fn manual_swipe_commits_word() {
        let mut session = demo_session();
        swipe(&mut session, "GOLD");
        assert!(session.found_words().contains("GOLD"));
        assert_eq!(session.remaining_words(), vec!["GOD", "DOG", "LOG"]);
        assert_eq!(session.turn_state(), TurnState::Idle);

        let events = session.drain_events();
        let revealed = events
            .iter()
            .filter(|e| matches!(e, PresentationEvent::CellRevealed { .. }))
            .count();
        assert_eq!(revealed, 4, "GOLD fills the four top cells");
    }

    #[test]
    fn invalid_word_is_rejected_not_an_error() {
        let mut session = demo_session();
        // G then L spells "GL".
        let g = session.tray().buttons_for_word("GL").unwrap();
        session.pointer_down(g[0]);
        session.pointer_move(session.tray().get(g[1]).unwrap().pos);
        session.pointer_up();

        assert!(session.found_words().is_empty());
        let events = session.drain_events();
        assert!(events.contains(&PresentationEvent::WordRejected));
        assert_eq!(session.turn_state(), TurnState::Idle);
    }

    #[test]
    fn already_found_word_is_rejected() {
        let mut session = demo_session();
        swipe(&mut session, "GOD");
        session.drain_events();
        swipe(&mut session, "GOD");
        let events = session.drain_events();
        assert!(events.contains(&PresentationEvent::WordRejected));
        assert_eq!(session.found_words().len(), 1);
    }

    #[test]
    fn double_pointer_up_is_noop() {
        let mut session = demo_session();
        swipe(&mut session, "GOD");
        let before = session.drain_events();
        assert!(!before.is_empty());
        session.pointer_up();
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn release_with_no_activated_buttons_rejects() {
        let mut session = demo_session();
        // An unknown button opens the session but activates nothing, so the
        // release resolves an empty word.
        session.pointer_down(ButtonId(99));
        assert_eq!(session.turn_state(), TurnState::Swiping);
        session.pointer_up();

        let events = session.drain_events();
        assert!(events.contains(&PresentationEvent::WordRejected));
        assert_eq!(session.turn_state(), TurnState::Idle);
        assert!(session.found_words().is_empty());
    }

    #[test]
    fn empty_release_without_down_is_noop() {
        let mut session = demo_session();
        session.pointer_up();
        session.pointer_move(Vec2::new(240.0, 580.0));
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn completion_in_any_order_ends_game_once() {
        let orders: [[&str; 4]; 3] = [
            ["GOLD", "GOD", "DOG", "LOG"],
            ["LOG", "DOG", "GOD", "GOLD"],
            ["DOG", "GOLD", "LOG", "GOD"],
        ];
        for order in orders {
            let mut session = demo_session();
            for word in order {
                swipe(&mut session, word);
            }
            assert!(session.is_game_over(), "order {order:?} should finish");
            let events = session.drain_events();
            let completions = events
                .iter()
                .filter(|e| matches!(e, PresentationEvent::GameComplete))
                .count();
            assert_eq!(completions, 1, "GameComplete must fire exactly once");
        }
    }

    #[test]
    fn input_ignored_after_game_over() {
        let mut session = demo_session();
        for word in ["GOLD", "GOD", "DOG", "LOG"] {
            swipe(&mut session, word);
        }
        session.drain_events();

        session.pointer_down(ButtonId(0));
        session.pointer_move(Vec2::new(240.0, 510.0));
        session.pointer_up();
        session.shuffle();
        session.tick(100.0);

        assert!(session.drain_events().is_empty());
        assert_eq!(session.turn_state(), TurnState::GameOver);
    }

    #[test]
    fn shuffle_rejected_while_swiping() {
        let mut session = demo_session();
        let ids = session.tray().buttons_for_word("GOLD").unwrap();
        session.pointer_down(ids[0]);
        session.drain_events();
        session.shuffle();
        assert!(session.drain_events().is_empty());
        assert_eq!(session.turn_state(), TurnState::Swiping);
    }

    #[test]
    fn shuffle_keeps_words_valid() {
        let mut session = demo_session();
        session.shuffle();
        session.drain_events();
        swipe(&mut session, "DOG");
        assert!(session.found_words().contains("DOG"));
    }

    #[test]
    fn tutorial_fires_after_idle_and_autoplay_completes_word() {
        let cfg = SessionConfig::default();
        let mut session = demo_session();

        // Sit idle until the demonstration appears.
        for _ in 0..((cfg.idle_delay / 0.1) as usize + 2) {
            session.tick(0.1);
        }
        let events = session.drain_events();
        assert!(
            events.contains(&PresentationEvent::HintShown { word: Some("GOLD".into()) }),
            "demonstration should hint the first unfound word"
        );
        assert!(events
            .iter()
            .any(|e| matches!(e, PresentationEvent::HandMoved { .. })));

        // Two demonstration loops, then the autoplay run, then release.
        // Generous upper bound; stop as soon as the word lands.
        for _ in 0..2000 {
            session.tick(0.1);
            if !session.found_words().is_empty() {
                break;
            }
        }
        assert!(
            session.found_words().contains("GOLD"),
            "autoplay should commit the demonstrated word"
        );
        assert_eq!(session.turn_state(), TurnState::Idle);

        let events = session.drain_events();
        let revealed = events
            .iter()
            .filter(|e| matches!(e, PresentationEvent::CellRevealed { .. }))
            .count();
        assert_eq!(revealed, 4, "autoplay reveal must match a manual commit");
    }

    #[test]
    fn player_input_preempts_autoplay() {
        let mut session = demo_session();

        // Drive the session into autoplay.
        for _ in 0..2000 {
            session.tick(0.1);
            if session.turn_state() == TurnState::Autoplaying {
                break;
            }
        }
        assert_eq!(session.turn_state(), TurnState::Autoplaying);
        session.drain_events();

        // Real input cancels the autoplay and opens a player gesture.
        let ids = session.tray().buttons_for_word("DOG").unwrap();
        session.pointer_down(ids[0]);
        assert_eq!(session.turn_state(), TurnState::Swiping);

        // No stale motion driver: ticking emits no further hand movement.
        session.drain_events();
        session.tick(1.0);
        let events = session.drain_events();
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, PresentationEvent::HandMoved { .. })),
            "cancelled autoplay must not keep moving the hand"
        );

        // The player's gesture still works end to end.
        for &id in &ids[1..] {
            let pos = session.tray().get(id).unwrap().pos;
            session.pointer_move(pos);
        }
        session.pointer_up();
        assert!(session.found_words().contains("DOG"));
    }

    #[test]
    fn gesture_resets_rearm_tutorial() {
        let cfg = SessionConfig::default();
        let mut session = demo_session();
        swipe(&mut session, "GOD");
        session.drain_events();

        // The idle timer restarts after the gesture resolves.
        for _ in 0..((cfg.idle_delay / 0.1) as usize + 2) {
            session.tick(0.1);
        }
        let events = session.drain_events();
        assert!(
            events.contains(&PresentationEvent::HintShown { word: Some("GOLD".into()) }),
            "hint should name the next unfound word in level order"
        );
    }

    #[test]
    fn process_drains_input_queue() {
        let mut session = demo_session();
        let ids = session.tray().buttons_for_word("LOG").unwrap();
        let mut queue = InputQueue::new();
        queue.push(InputEvent::PointerDown { button: ids[0] });
        for &id in &ids[1..] {
            let pos = session.tray().get(id).unwrap().pos;
            queue.push(InputEvent::PointerMove { x: pos.x, y: pos.y });
        }
        queue.push(InputEvent::PointerUp);

        session.process(&mut queue);
        assert!(queue.is_empty());
        assert!(session.found_words().contains("LOG"));
    }

    #[test]
    fn turn_state_invariant_holds() {
        let mut session = demo_session();
        assert_eq!(session.turn_state(), TurnState::Idle);
        let ids = session.tray().buttons_for_word("GOD").unwrap();
        session.pointer_down(ids[0]);
        assert_eq!(session.turn_state(), TurnState::Swiping);
        session.pointer_up();
        assert_eq!(session.turn_state(), TurnState::Idle);
    }
}
