// level.rs
//
// Level data: the tray letters and the target words, supplied as plain data
// at construction. Validation is fatal and happens before any state is built.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assign::AssignError;
use crate::topology::TopologyError;

/// Why a level failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level has no tray letters")]
    EmptyTray,
    #[error("level has no words")]
    NoWords,
    #[error("word '{word}' cannot be spelled from the tray letters")]
    UnspellableWord { word: String },
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Assign(#[from] AssignError),
}

/// A level: tray letters plus the ordered target words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    pub letters: Vec<char>,
    pub words: Vec<String>,
}

impl LevelData {
    pub fn new(letters: Vec<char>, words: Vec<String>) -> Self {
        LevelData { letters, words }
    }

    /// Build a level from the packed authoring strings: letters as a
    /// comma-separated list (`"G,O,D,L"`), words either comma-separated
    /// (`"GOLD,GOD,DOG,LOG"`) or in the pipe-delimited triple form
    /// (`"0,0,GOLD|1,0,GOD"`) where the word is the third field.
    pub fn from_packed(letters: &str, words: &str) -> Self {
        let letters = letters
            .split(',')
            .filter_map(|s| s.trim().chars().next())
            .collect();
        LevelData { letters, words: parse_packed_words(words) }
    }

    /// The demo puzzle shipped with the game.
    pub fn demo() -> Self {
        LevelData::from_packed("G,O,D,L", "GOLD,GOD,DOG,LOG")
    }

    /// Check the parts of the level the assigner does not cover: a
    /// non-empty tray and every word individually spellable from the tray
    /// letters (each tray letter usable once per occurrence).
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.letters.is_empty() {
            return Err(LevelError::EmptyTray);
        }
        if self.words.is_empty() {
            return Err(LevelError::NoWords);
        }
        let available = letter_counts(self.letters.iter().copied());
        for word in &self.words {
            let needed = letter_counts(word.chars());
            for (ch, count) in &needed {
                if available.get(ch).copied().unwrap_or(0) < *count {
                    return Err(LevelError::UnspellableWord { word: word.clone() });
                }
            }
        }
        Ok(())
    }
}

fn letter_counts(chars: impl Iterator<Item = char>) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for ch in chars {
        *counts.entry(ch).or_insert(0) += 1;
    }
    counts
}

/// Extract words from the packed string form. Pipe-delimited entries carry
/// `x,y,WORD` triples; entries without coordinates are taken verbatim.
pub fn parse_packed_words(input: &str) -> Vec<String> {
    input
        .split('|')
        .flat_map(|entry| {
            let fields: Vec<&str> = entry.split(',').map(str::trim).collect();
            // "x,y,WORD" authoring triples carry numeric coordinates first.
            if fields.len() >= 3
                && fields[0].parse::<i32>().is_ok()
                && fields[1].parse::<i32>().is_ok()
            {
                return vec![fields[2].to_string()];
            }
            fields
                .into_iter()
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect()
        })
        .collect()
}
