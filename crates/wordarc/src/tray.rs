// tray.rs
//
// The circular arrangement of letter buttons the player drags across.
// The tray owns the current ordered button list; a shuffle replaces the
// order and re-lays positions, never mutating letters in place.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::events::ButtonId;
use crate::rng::Rng;

/// One letter position in the circular tray.
#[derive(Debug, Clone, PartialEq)]
pub struct TrayButton {
    pub id: ButtonId,
    pub letter: char,
    pub pos: Vec2,
    /// Part of an in-progress swipe.
    pub active: bool,
}

/// The circular letter tray.
#[derive(Debug, Clone)]
pub struct Tray {
    center: Vec2,
    radius: f32,
    buttons: Vec<TrayButton>,
}

impl Tray {
    pub fn new(letters: &[char], center: Vec2, radius: f32) -> Self {
        let positions = ring_positions(letters.len(), center, radius);
        let buttons = letters
            .iter()
            .zip(positions)
            .enumerate()
            .map(|(i, (&letter, pos))| TrayButton {
                id: ButtonId(i as u32),
                letter,
                pos,
                active: false,
            })
            .collect();
        Tray { center, radius, buttons }
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Buttons in current ring order.
    pub fn buttons(&self) -> &[TrayButton] {
        &self.buttons
    }

    pub fn get(&self, id: ButtonId) -> Option<&TrayButton> {
        self.buttons.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: ButtonId) -> Option<&mut TrayButton> {
        self.buttons.iter_mut().find(|b| b.id == id)
    }

    /// First button in ring order within `radius` of `pos` that is not in
    /// `skip`. At most one hit per call.
    pub fn hit(&self, pos: Vec2, radius: f32, skip: &[ButtonId]) -> Option<ButtonId> {
        self.buttons
            .iter()
            .find(|b| !skip.contains(&b.id) && pos.distance(b.pos) < radius)
            .map(|b| b.id)
    }

    /// Resolve a word to an ordered button sequence, using each button at
    /// most once so repeated letters map to distinct buttons. `None` if the
    /// tray has fewer occurrences of some letter than the word needs.
    pub fn buttons_for_word(&self, word: &str) -> Option<Vec<ButtonId>> {
        let mut used: Vec<ButtonId> = Vec::with_capacity(word.len());
        for ch in word.chars() {
            let id = self
                .buttons
                .iter()
                .find(|b| b.letter == ch && !used.contains(&b.id))
                .map(|b| b.id)?;
            used.push(id);
        }
        Some(used)
    }

    /// Permute the ring order and re-lay positions. Returns the new order.
    pub fn shuffle(&mut self, rng: &mut Rng) -> Vec<ButtonId> {
        rng.shuffle(&mut self.buttons);
        let positions = ring_positions(self.buttons.len(), self.center, self.radius);
        for (button, pos) in self.buttons.iter_mut().zip(positions) {
            button.pos = pos;
        }
        self.buttons.iter().map(|b| b.id).collect()
    }

    pub fn set_active(&mut self, id: ButtonId, active: bool) {
        if let Some(button) = self.get_mut(id) {
            button.active = active;
        }
    }

    pub fn deactivate_all(&mut self) {
        for button in &mut self.buttons {
            button.active = false;
        }
    }

    /// The tray's letter multiset, in ring order.
    pub fn letters(&self) -> Vec<char> {
        self.buttons.iter().map(|b| b.letter).collect()
    }
}

/// Evenly spaced ring positions starting at twelve o'clock.
fn ring_positions(n: usize, center: Vec2, radius: f32) -> Vec<Vec2> {
    (0..n)
        .map(|i| {
            let angle = TAU / n as f32 * i as f32 - PI / 2.0;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}
