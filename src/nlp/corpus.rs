//! Tagged corpus loading
//!
//! Reads sentences in the Brown raw format: one sentence per line, tokens
//! separated by whitespace, each token written `word/TAG`.

use crate::errors::{Result, WordClusterError};
use crate::nlp::tagset::normalize_tag;
use crate::types::{Corpus, TaggedToken};
use std::path::{Path, PathBuf};
use tracing::info;

/// Something the pipeline can pull a tagged corpus from
pub trait CorpusSource {
    /// Load the corpus, lowercasing words and normalizing tags
    fn load(&self, use_universal: bool) -> Result<Corpus>;
}

/// A `word/TAG` corpus stored in a text file
#[derive(Debug, Clone)]
pub struct TaggedCorpusFile {
    path: PathBuf,
}

impl TaggedCorpusFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CorpusSource for TaggedCorpusFile {
    fn load(&self, use_universal: bool) -> Result<Corpus> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| WordClusterError::Io {
            message: format!("{}: {}", self.path.display(), e),
        })?;
        let corpus = parse_tagged_text(&text, use_universal)?;
        info!(
            path = %self.path.display(),
            sentences = corpus.len(),
            tokens = corpus.num_tokens(),
            "corpus loaded"
        );
        Ok(corpus)
    }
}

/// A corpus already held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    corpus: Corpus,
}

impl InMemoryCorpus {
    pub fn new(corpus: Corpus) -> Self {
        Self { corpus }
    }
}

impl CorpusSource for InMemoryCorpus {
    fn load(&self, use_universal: bool) -> Result<Corpus> {
        let sentences = self
            .corpus
            .sentences
            .iter()
            .map(|sent| {
                sent.iter()
                    .map(|t| TaggedToken::new(t.word.to_lowercase(), normalize_tag(&t.tag, use_universal)))
                    .collect()
            })
            .collect();
        Ok(Corpus::new(sentences))
    }
}

/// Parse `word/TAG` text, one sentence per non-blank line.
///
/// The tag is everything after the last `/`, so words containing slashes
/// (`1/2/cd`) survive.
pub fn parse_tagged_text(text: &str, use_universal: bool) -> Result<Corpus> {
    let mut sentences = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let sentence = line
            .split_whitespace()
            .map(|raw| parse_token(raw, use_universal).map_err(|msg| WordClusterError::corpus(line_idx + 1, msg)))
            .collect::<Result<Vec<_>>>()?;
        sentences.push(sentence);
    }
    Ok(Corpus::new(sentences))
}

fn parse_token(raw: &str, use_universal: bool) -> std::result::Result<TaggedToken, String> {
    match raw.rsplit_once('/') {
        Some((word, tag)) if !word.is_empty() && !tag.is_empty() => Ok(TaggedToken::new(
            word.to_lowercase(),
            normalize_tag(tag, use_universal),
        )),
        _ => Err(format!("token '{}' is not of the form word/TAG", raw)),
    }
}
