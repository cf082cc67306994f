//! Context-vector model
//!
//! One [`WordType`] per distinct word form, accumulating its POS tag counts
//! and how often each indexed context word appears immediately to its left
//! or right. The table is filled in a single-threaded accumulation pass and
//! only read afterwards.

use crate::errors::{Result, WordClusterError};
use crate::types::{Corpus, START, STOP};
use crate::vocab::{ContextIndex, Side};
use rustc_hash::FxHashMap;

/// Distributional profile of one word form
#[derive(Debug, Clone, PartialEq)]
pub struct WordType {
    /// The (lowercased) surface form
    pub form: String,
    /// POS tag -> number of tagged occurrences
    pub pos_frequencies: FxHashMap<String, usize>,
    /// Most frequent tag so far; first tag to reach the maximum wins ties
    pub dominant_tag: Option<String>,
    /// Left-context counts followed by right-context counts, one per index slot
    pub context_vector: Vec<u32>,
}

impl WordType {
    /// Create an empty word type with a zeroed context vector
    pub fn new(form: impl Into<String>, vector_len: usize) -> Self {
        Self {
            form: form.into(),
            pos_frequencies: FxHashMap::default(),
            dominant_tag: None,
            context_vector: vec![0; vector_len],
        }
    }

    /// Count one tagged occurrence and update the dominant tag
    pub fn observe(&mut self, tag: &str) {
        let count = {
            let entry = self.pos_frequencies.entry(tag.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };

        let current_max = self
            .dominant_tag
            .as_ref()
            .and_then(|t| self.pos_frequencies.get(t))
            .copied()
            .unwrap_or(0);
        if self.dominant_tag.is_none() || count > current_max {
            self.dominant_tag = Some(tag.to_string());
        }
    }

    /// Total number of tagged occurrences
    pub fn frequency(&self) -> usize {
        self.pos_frequencies.values().sum()
    }

    fn increment(&mut self, slot: Option<u32>) {
        if let Some(count) = slot.and_then(|s| self.context_vector.get_mut(s as usize)) {
            *count += 1;
        }
    }
}

/// All word types of a corpus, keyed by form
#[derive(Debug, Clone, Default)]
pub struct WordTypes {
    types: FxHashMap<String, WordType>,
    vector_len: usize,
}

impl WordTypes {
    /// Create an empty table whose context vectors have `vector_len` slots
    pub fn new(vector_len: usize) -> Self {
        Self {
            types: FxHashMap::default(),
            vector_len,
        }
    }

    /// Run the full accumulation pass: tag counts, then context counts
    pub fn from_corpus(corpus: &Corpus, index: &ContextIndex) -> Result<Self> {
        let mut types = Self::new(index.len());
        for sent in &corpus.sentences {
            for token in sent {
                types.observe(&token.word, &token.tag);
            }
        }
        types.populate_contexts(&corpus.plain_sentences(), index)?;
        Ok(types)
    }

    /// Record a tagged occurrence of `word`, creating its type on first sight
    pub fn observe(&mut self, word: &str, tag: &str) {
        let vector_len = self.vector_len;
        self.types
            .entry(word.to_string())
            .or_insert_with(|| WordType::new(word, vector_len))
            .observe(tag);
    }

    /// Count the immediate neighbors of one occurrence of `word`.
    ///
    /// Neighbors missing from the index are counted in the decorated
    /// `UNKNOWN` slot; if the index has no such slot the neighbor is dropped.
    pub fn record_context(
        &mut self,
        word: &str,
        left_neighbor: &str,
        right_neighbor: &str,
        index: &ContextIndex,
    ) -> Result<()> {
        let word_type = self
            .types
            .get_mut(word)
            .ok_or_else(|| WordClusterError::unknown_word(word))?;
        word_type.increment(index.slot_or_unknown(Side::Left, left_neighbor));
        word_type.increment(index.slot_or_unknown(Side::Right, right_neighbor));
        Ok(())
    }

    /// Update context vectors from untagged sentences.
    ///
    /// Each sentence is padded with exactly one `START` and one `STOP`.
    pub fn populate_contexts<S: AsRef<str>>(
        &mut self,
        sentences: &[Vec<S>],
        index: &ContextIndex,
    ) -> Result<()> {
        for sent in sentences {
            let padded: Vec<&str> = std::iter::once(START)
                .chain(sent.iter().map(|w| w.as_ref()))
                .chain(std::iter::once(STOP))
                .collect();
            for window in padded.windows(3) {
                self.record_context(window[1], window[0], window[2], index)?;
            }
        }
        Ok(())
    }

    /// Look up a word type
    pub fn get(&self, word: &str) -> Option<&WordType> {
        self.types.get(word)
    }

    /// Look up a word type, failing for forms never seen in the corpus
    pub fn require(&self, word: &str) -> Result<&WordType> {
        self.get(word)
            .ok_or_else(|| WordClusterError::unknown_word(word))
    }

    /// Context vector length shared by every type
    pub fn vector_len(&self) -> usize {
        self.vector_len
    }

    /// Number of word types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all word types
    pub fn iter(&self) -> impl Iterator<Item = &WordType> {
        self.types.values()
    }
}

/// Divide every entry by the vector's total; an all-zero vector stays zero
pub fn normalize(vec: &[u32]) -> Vec<f64> {
    let total: u64 = vec.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return vec![0.0; vec.len()];
    }
    let total = total as f64;
    vec.iter().map(|&c| c as f64 / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UNKNOWN;

    #[test]
    fn test_observe_tracks_dominant_tag() {
        let mut word = WordType::new("run", 0);
        word.observe("VERB");
        assert_eq!(word.dominant_tag.as_deref(), Some("VERB"));

        word.observe("NOUN");
        // Tie: the tag that reached the maximum first is kept
        assert_eq!(word.dominant_tag.as_deref(), Some("VERB"));

        word.observe("NOUN");
        assert_eq!(word.dominant_tag.as_deref(), Some("NOUN"));
        assert_eq!(word.frequency(), 3);
        assert_eq!(word.pos_frequencies["NOUN"], 2);
    }

    #[test]
    fn test_record_context_uses_unknown_slot() {
        let index = ContextIndex::build(&["the", START, STOP, UNKNOWN]);
        let mut types = WordTypes::new(index.len());
        types.observe("cat", "NOUN");

        types.record_context("cat", "the", "sat", &index).unwrap();
        let vec = &types.get("cat").unwrap().context_vector;
        assert_eq!(vec.len(), 8);
        assert_eq!(vec[index.get(Side::Left, "the").unwrap() as usize], 1);
        assert_eq!(vec[index.get(Side::Right, UNKNOWN).unwrap() as usize], 1);
        assert_eq!(vec.iter().sum::<u32>(), 2);
    }

    #[test]
    fn test_record_context_requires_observed_word() {
        let index = ContextIndex::build(&["the"]);
        let mut types = WordTypes::new(index.len());
        let err = types.record_context("ghost", "the", "the", &index).unwrap_err();
        assert_eq!(err, WordClusterError::unknown_word("ghost"));
    }

    #[test]
    fn test_populate_contexts_pads_sentences() {
        let corpus = Corpus::from_pairs(&[vec![("the", "DET"), ("cat", "NOUN")]]);
        let index = ContextIndex::build(&["the", "cat", START, STOP, UNKNOWN]);
        let types = WordTypes::from_corpus(&corpus, &index).unwrap();

        let the = &types.get("the").unwrap().context_vector;
        assert_eq!(the[index.get(Side::Left, START).unwrap() as usize], 1);
        assert_eq!(the[index.get(Side::Right, "cat").unwrap() as usize], 1);

        let cat = &types.get("cat").unwrap().context_vector;
        assert_eq!(cat[index.get(Side::Left, "the").unwrap() as usize], 1);
        assert_eq!(cat[index.get(Side::Right, STOP).unwrap() as usize], 1);
    }

    #[test]
    fn test_from_corpus_dominant_tags() {
        let corpus = Corpus::from_pairs(&[
            vec![("the", "DET"), ("cat", "NOUN")],
            vec![("the", "DET"), ("dog", "NOUN")],
        ]);
        let index = ContextIndex::build(&[START, STOP, UNKNOWN]);
        let types = WordTypes::from_corpus(&corpus, &index).unwrap();
        assert_eq!(types.len(), 3);
        assert_eq!(types.require("the").unwrap().dominant_tag.as_deref(), Some("DET"));
        assert!(types.require("bird").is_err());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(&[1, 1, 2]), vec![0.25, 0.25, 0.5]);
        assert_eq!(normalize(&[0, 0, 0]), vec![0.0, 0.0, 0.0]);
        assert!(normalize(&[]).is_empty());
    }
}
