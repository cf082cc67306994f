//! Core types for rapid_wordcluster
//!
//! This module defines the data shared across the pipeline: sentence
//! boundary markers, tagged tokens, the in-memory corpus and the run
//! configuration.

use crate::distance::DistanceMetric;
use crate::errors::{Result, WordClusterError};
use crate::linkage::LinkageMethod;
use serde::{Deserialize, Serialize};

// ============================================================================
// Boundary markers
// ============================================================================

/// Synthetic token placed before the first word of every sentence
pub const START: &str = "<START>";
/// Synthetic token placed after the last word of every sentence
pub const STOP: &str = "<STOP>";
/// Context word standing in for anything outside the context index
pub const UNKNOWN: &str = "<UNK>";

// ============================================================================
// Corpus
// ============================================================================

/// A single `(word, tag)` observation from the tagged corpus.
///
/// Words are lowercased and tags normalized by the corpus reader before
/// they reach this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub word: String,
    pub tag: String,
}

impl TaggedToken {
    /// Create a new tagged token
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }
}

/// A tokenized, tagged corpus.
///
/// Sentences never store [`START`]/[`STOP`]; every consumer adds exactly one
/// of each around a sentence, so the tagged and plain views share the same
/// boundary convention.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    pub sentences: Vec<Vec<TaggedToken>>,
}

impl Corpus {
    /// Create a corpus from tagged sentences
    pub fn new(sentences: Vec<Vec<TaggedToken>>) -> Self {
        Self { sentences }
    }

    /// Build a corpus from `(word, tag)` string pairs, lowercasing words
    pub fn from_pairs<W, T>(sentences: &[Vec<(W, T)>]) -> Self
    where
        W: AsRef<str>,
        T: AsRef<str>,
    {
        let sentences = sentences
            .iter()
            .map(|sent| {
                sent.iter()
                    .map(|(w, t)| TaggedToken::new(w.as_ref().to_lowercase(), t.as_ref()))
                    .collect()
            })
            .collect();
        Self { sentences }
    }

    /// The same sentences with tags stripped
    pub fn plain_sentences(&self) -> Vec<Vec<String>> {
        self.sentences
            .iter()
            .map(|sent| sent.iter().map(|t| t.word.clone()).collect())
            .collect()
    }

    /// Number of sentences
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Check if the corpus has no sentences
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Total number of tokens across all sentences
    pub fn num_tokens(&self) -> usize {
        self.sentences.iter().map(Vec::len).sum()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for a clustering run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Map raw corpus tags onto the universal tagset
    pub use_universal_tagset: bool,
    /// Number of most frequent words to cluster
    pub cluster_vocab_size: usize,
    /// Number of most frequent words used as context dimensions
    pub context_vocab_size: usize,
    /// Fraction of the maximum join distance used as the cut threshold
    pub cutoff_fraction: f64,
    /// Distance metric over context vectors
    pub metric: DistanceMetric,
    /// Linkage criterion for the agglomerative tree
    pub linkage: LinkageMethod,
    /// Number of row/column partitions for the distance matrix
    pub num_splits: usize,
    /// Weight of homogeneity vs. completeness in the V-measure
    pub v_measure_beta: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            use_universal_tagset: true,
            cluster_vocab_size: 100,
            context_vocab_size: 100,
            cutoff_fraction: 0.5,
            metric: DistanceMetric::Cosine,
            linkage: LinkageMethod::Average,
            num_splits: 8,
            v_measure_beta: 2.0,
        }
    }
}

impl ClusterConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    ///
    /// Any decoding problem (including an unknown metric or linkage name)
    /// is reported as a configuration error.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| WordClusterError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.cutoff_fraction) {
            return Err(WordClusterError::invalid_config(format!(
                "cutoff_fraction must be between 0 and 1, got {}",
                self.cutoff_fraction
            )));
        }

        if self.cluster_vocab_size == 0 {
            return Err(WordClusterError::invalid_config(
                "cluster_vocab_size must be > 0",
            ));
        }

        if self.context_vocab_size == 0 {
            return Err(WordClusterError::invalid_config(
                "context_vocab_size must be > 0",
            ));
        }

        if self.num_splits == 0 {
            return Err(WordClusterError::invalid_config("num_splits must be > 0"));
        }

        if self.v_measure_beta.is_nan() || self.v_measure_beta < 0.0 {
            return Err(WordClusterError::invalid_config(format!(
                "v_measure_beta must be >= 0, got {}",
                self.v_measure_beta
            )));
        }

        Ok(())
    }

    /// Builder method: toggle universal tagset mapping
    pub fn with_universal_tagset(mut self, enabled: bool) -> Self {
        self.use_universal_tagset = enabled;
        self
    }

    /// Builder method: set number of words to cluster
    pub fn with_cluster_vocab_size(mut self, k: usize) -> Self {
        self.cluster_vocab_size = k;
        self
    }

    /// Builder method: set number of context words
    pub fn with_context_vocab_size(mut self, k: usize) -> Self {
        self.context_vocab_size = k;
        self
    }

    /// Builder method: set cutoff fraction
    pub fn with_cutoff_fraction(mut self, fraction: f64) -> Self {
        self.cutoff_fraction = fraction;
        self
    }

    /// Builder method: set distance metric
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Builder method: set distance metric by name
    pub fn with_metric_name(mut self, name: &str) -> Result<Self> {
        self.metric = name.parse()?;
        Ok(self)
    }

    /// Builder method: set linkage method
    pub fn with_linkage(mut self, linkage: LinkageMethod) -> Self {
        self.linkage = linkage;
        self
    }

    /// Builder method: set matrix partition count
    pub fn with_num_splits(mut self, num_splits: usize) -> Self {
        self.num_splits = num_splits;
        self
    }

    /// Builder method: set V-measure beta
    pub fn with_v_measure_beta(mut self, beta: f64) -> Self {
        self.v_measure_beta = beta;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_plain_sentences() {
        let corpus = Corpus::from_pairs(&[
            vec![("The", "DET"), ("Cat", "NOUN")],
            vec![("a", "DET")],
        ]);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.num_tokens(), 3);
        assert_eq!(
            corpus.plain_sentences(),
            vec![vec!["the".to_string(), "cat".to_string()], vec!["a".to_string()]]
        );
        assert_eq!(corpus.sentences[0][0].tag, "DET");
    }

    #[test]
    fn test_config_validation() {
        let config = ClusterConfig::default();
        assert!(config.validate().is_ok());

        let bad = ClusterConfig::default().with_cutoff_fraction(1.5);
        assert!(bad.validate().is_err());

        let bad = ClusterConfig::default().with_cutoff_fraction(-0.1);
        assert!(bad.validate().is_err());

        let bad = ClusterConfig::default().with_num_splits(0);
        assert!(bad.validate().is_err());

        let bad = ClusterConfig::default().with_v_measure_beta(f64::NAN);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_cutoff_bounds_inclusive() {
        assert!(ClusterConfig::default().with_cutoff_fraction(0.0).validate().is_ok());
        assert!(ClusterConfig::default().with_cutoff_fraction(1.0).validate().is_ok());
    }

    #[test]
    fn test_with_metric_name() {
        let config = ClusterConfig::default().with_metric_name("kl").unwrap();
        assert_eq!(config.metric, DistanceMetric::KlDivergence);

        let err = ClusterConfig::default()
            .with_metric_name("unknown_metric")
            .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_config_from_json() {
        let config = ClusterConfig::from_json_str(
            r#"{"metric": "manhattan", "cutoff_fraction": 0.25, "num_splits": 4}"#,
        )
        .unwrap();
        assert_eq!(config.metric, DistanceMetric::Manhattan);
        assert_eq!(config.num_splits, 4);
        assert_eq!(config.cluster_vocab_size, 100);

        let err = ClusterConfig::from_json_str(r#"{"metric": "hamming"}"#).unwrap_err();
        assert!(err.is_config_error());

        let err = ClusterConfig::from_json_str(r#"{"cutoff_fraction": 2.0}"#).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_config_json_roundtrip_names() {
        let config = ClusterConfig::default().with_metric(DistanceMetric::Euclidean);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"euclidean\""));
        assert!(json.contains("\"average\""));
        let back = ClusterConfig::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
