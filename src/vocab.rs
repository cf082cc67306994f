//! Vocabulary indexing
//!
//! Selects the most frequent words of a corpus and assigns every context
//! word a left and a right slot in the context vectors.

use crate::types::{START, STOP, UNKNOWN};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the target word a context word was observed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Marker prefixed to a word to form its decorated key
    pub fn marker(&self) -> &'static str {
        match self {
            Side::Left => "<LEFT>",
            Side::Right => "<RIGHT>",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Check whether a token is made only of word characters (letters, digits, `_`)
pub fn is_word_like(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Return the `k` most frequent tokens of the corpus.
///
/// Ties keep encounter order. With `include_boundaries`, [`START`] and
/// [`STOP`] are counted once per sentence and [`START`], [`STOP`],
/// [`UNKNOWN`] are appended after truncation. Without it, only word-like
/// tokens are counted, so punctuation never makes the list.
pub fn build_top_k_list<S: AsRef<str>>(
    sentences: &[Vec<S>],
    k: usize,
    include_boundaries: bool,
) -> Vec<String> {
    let mut position: FxHashMap<&str, usize> = FxHashMap::default();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for sent in sentences {
        if include_boundaries {
            tally(START, &mut position, &mut counts);
        }
        for token in sent {
            let token = token.as_ref();
            if include_boundaries || is_word_like(token) {
                tally(token, &mut position, &mut counts);
            }
        }
        if include_boundaries {
            tally(STOP, &mut position, &mut counts);
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let mut top_k: Vec<String> = counts
        .into_iter()
        .take(k)
        .map(|(token, _)| token.to_string())
        .collect();

    if include_boundaries {
        top_k.extend([START, STOP, UNKNOWN].iter().map(|s| s.to_string()));
    }
    top_k
}

fn tally<'a>(
    token: &'a str,
    position: &mut FxHashMap<&'a str, usize>,
    counts: &mut Vec<(&'a str, usize)>,
) {
    match position.get(token) {
        Some(&idx) => counts[idx].1 += 1,
        None => {
            position.insert(token, counts.len());
            counts.push((token, 1));
        }
    }
}

/// Maps decorated context words to context-vector slots.
///
/// Slots are assigned in insertion order, left before right for each word,
/// so the layout is fully determined by the word list.
#[derive(Debug, Clone, Default)]
pub struct ContextIndex {
    left: FxHashMap<String, u32>,
    right: FxHashMap<String, u32>,
    keys: Vec<(Side, String)>,
}

impl ContextIndex {
    /// Build an index over the given context words
    pub fn build<S: AsRef<str>>(words: &[S]) -> Self {
        let mut index = Self::default();
        for word in words {
            let word = word.as_ref();
            index.insert(Side::Left, word);
            index.insert(Side::Right, word);
        }
        index
    }

    fn insert(&mut self, side: Side, word: &str) {
        let slot = self.keys.len() as u32;
        let table = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        if table.contains_key(word) {
            return;
        }
        table.insert(word.to_string(), slot);
        self.keys.push((side, word.to_string()));
    }

    /// Slot of a decorated context word, if indexed
    pub fn get(&self, side: Side, word: &str) -> Option<u32> {
        match side {
            Side::Left => self.left.get(word).copied(),
            Side::Right => self.right.get(word).copied(),
        }
    }

    /// Slot of a context word, falling back to the decorated [`UNKNOWN`] slot
    pub fn slot_or_unknown(&self, side: Side, word: &str) -> Option<u32> {
        self.get(side, word).or_else(|| self.get(side, UNKNOWN))
    }

    /// Decorated key stored at a slot, e.g. `<LEFT>the`
    pub fn decorated_key(&self, slot: u32) -> Option<String> {
        self.keys
            .get(slot as usize)
            .map(|(side, word)| format!("{}{}", side, word))
    }

    /// Number of slots (the context-vector length)
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if no slots have been assigned
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
