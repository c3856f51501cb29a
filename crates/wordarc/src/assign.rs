// assign.rs
//
// Word → slot assignment. Pure: same word list in the same order always
// yields the same mapping. The tie-break policy is part of the contract.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::topology::{GridCoord, GridTopology, SlotId};

/// Why an assignment failed. All variants are fatal at level load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error("need 4 distinct words, got {0}")]
    InsufficientWords(usize),
    #[error("word '{word}' is shorter than the {len}-cell {slot:?} slot")]
    WordTooShort { word: String, slot: SlotId, len: usize },
    #[error(
        "crossing cell ({},{}) receives '{existing}' from {existing_slot:?} but '{incoming}' from {incoming_slot:?}",
        cell.x, cell.y
    )]
    InconsistentCrossing {
        cell: GridCoord,
        existing_slot: SlotId,
        existing: char,
        incoming_slot: SlotId,
        incoming: char,
    },
}

/// One grid cell: the character each covering slot contributes, plus the
/// single revealed character shown once any slot through it is solved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub coord: GridCoord,
    /// `slot → char` for every slot covering this cell (1 or 2 entries).
    pub slot_chars: Vec<(SlotId, char)>,
    pub revealed: Option<char>,
}

impl Cell {
    fn new(coord: GridCoord) -> Self {
        Cell { coord, slot_chars: Vec::with_capacity(2), revealed: None }
    }

    /// The character a given slot contributes to this cell, if it covers it.
    pub fn char_for(&self, slot: SlotId) -> Option<char> {
        self.slot_chars
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|&(_, ch)| ch)
    }
}

/// Total mapping from slots to words, plus the derived per-cell characters.
#[derive(Debug, Clone)]
pub struct SlotAssignment {
    words: [(SlotId, String); 4],
    cells: BTreeMap<GridCoord, Cell>,
}

impl SlotAssignment {
    /// The word assigned to a slot.
    pub fn word(&self, slot: SlotId) -> &str {
        &self
            .words
            .iter()
            .find(|(s, _)| *s == slot)
            .expect("assignment is total")
            .1
    }

    /// The slot a word was assigned to, if any.
    pub fn slot_for_word(&self, word: &str) -> Option<SlotId> {
        self.words
            .iter()
            .find(|(_, w)| w == word)
            .map(|&(slot, _)| slot)
    }

    pub fn cell(&self, coord: GridCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Mark every cell of `slot` revealed, in slot index order.
    /// Returns the `(coord, char)` pairs for presentation.
    pub fn reveal_slot(
        &mut self,
        slot: SlotId,
        topology: &GridTopology,
    ) -> Vec<(GridCoord, char)> {
        let mut revealed = Vec::new();
        for coord in topology.slot(slot).cells() {
            if let Some(cell) = self.cells.get_mut(&coord) {
                if let Some(ch) = cell.char_for(slot) {
                    cell.revealed = Some(ch);
                    revealed.push((coord, ch));
                }
            }
        }
        revealed
    }
}

/// Assign one word per slot.
///
/// Policy (first occurrence wins every tie):
/// 1. Top: the word of length 4 if one exists, else the longest word.
/// 2. Left: first remaining word whose first letter equals Top's first.
/// 3. Mid: first word remaining after Left whose first letter equals Top's
///    third.
/// 4. Bottom: the sole word left over.
///
/// Afterwards each slot's word is written into its cells index by index; a
/// crossing cell receiving two different characters is a data defect and
/// fails with `InconsistentCrossing` rather than silently overwriting.
pub fn assign(words: &[String], topology: &GridTopology) -> Result<SlotAssignment, AssignError> {
    let mut distinct: Vec<&String> = Vec::new();
    for w in words {
        if !distinct.contains(&w) {
            distinct.push(w);
        }
    }
    if distinct.len() < 4 {
        return Err(AssignError::InsufficientWords(distinct.len()));
    }

    let top = distinct
        .iter()
        .find(|w| w.chars().count() == 4)
        .copied()
        .unwrap_or_else(|| {
            distinct
                .iter()
                .copied()
                .fold(distinct[0], |a, b| if b.len() > a.len() { b } else { a })
        });

    let top_first = top.chars().next();
    let top_third = top.chars().nth(2);

    let rem1: Vec<&String> = distinct.iter().copied().filter(|w| *w != top).collect();
    let left = rem1
        .iter()
        .find(|w| w.chars().next() == top_first)
        .copied()
        .unwrap_or(rem1[0]);

    let rem2: Vec<&String> = rem1.iter().copied().filter(|w| *w != left).collect();
    let mid = rem2
        .iter()
        .find(|w| w.chars().next() == top_third)
        .copied()
        .unwrap_or(rem2[0]);

    let bottom = rem2
        .iter()
        .copied()
        .find(|w| *w != mid)
        .expect("four distinct words leave one for the bottom slot");

    let chosen = [
        (SlotId::Top, top.clone()),
        (SlotId::Left, left.clone()),
        (SlotId::Mid, mid.clone()),
        (SlotId::Bottom, bottom.clone()),
    ];

    let mut cells: BTreeMap<GridCoord, Cell> = topology
        .shape
        .iter()
        .map(|&c| (c, Cell::new(c)))
        .collect();

    for (slot_id, word) in &chosen {
        let slot = topology.slot(*slot_id);
        let chars: Vec<char> = word.chars().collect();
        if chars.len() < slot.len {
            return Err(AssignError::WordTooShort {
                word: word.clone(),
                slot: *slot_id,
                len: slot.len,
            });
        }
        for (i, coord) in slot.cells().enumerate() {
            let cell = cells
                .get_mut(&coord)
                .expect("topology validated: slot cells lie inside the shape");
            let ch = chars[i];
            if let Some(&(existing_slot, existing)) = cell.slot_chars.first() {
                if existing != ch {
                    return Err(AssignError::InconsistentCrossing {
                        cell: coord,
                        existing_slot,
                        existing,
                        incoming_slot: *slot_id,
                        incoming: ch,
                    });
                }
            }
            cell.slot_chars.push((*slot_id, ch));
        }
    }

    Ok(SlotAssignment { words: chosen, cells })
}
