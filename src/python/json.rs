//! JSON interface for clustering whole corpora
//!
//! The corpus and the configuration cross the Python boundary as one JSON
//! document, and the report comes back as JSON, so only two strings are
//! copied between the runtimes.

use crate::errors::WordClusterError;
use crate::nlp::corpus::{parse_tagged_text, CorpusSource, InMemoryCorpus};
use crate::pipeline::run_pipeline;
use crate::types::{ClusterConfig, Corpus, TaggedToken};
use pyo3::prelude::*;
use serde::Deserialize;

/// Input document from JSON.
///
/// Sentences may be given as `[word, tag]` pairs or as raw `word/TAG`
/// lines in `text`; both are merged when present.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonDocument {
    #[serde(default)]
    pub sentences: Vec<Vec<(String, String)>>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub config: Option<ClusterConfig>,
}

/// Corpus source backed by a decoded [`JsonDocument`]
struct JsonCorpus<'a> {
    doc: &'a JsonDocument,
}

impl CorpusSource for JsonCorpus<'_> {
    fn load(&self, use_universal: bool) -> crate::errors::Result<Corpus> {
        let pairs = self
            .doc
            .sentences
            .iter()
            .map(|sent| {
                sent.iter()
                    .map(|(word, tag)| TaggedToken::new(word.as_str(), tag.as_str()))
                    .collect()
            })
            .collect();
        let mut corpus = InMemoryCorpus::new(Corpus::new(pairs)).load(use_universal)?;
        if let Some(text) = &self.doc.text {
            corpus
                .sentences
                .extend(parse_tagged_text(text, use_universal)?.sentences);
        }
        Ok(corpus)
    }
}

fn to_py_err(e: WordClusterError) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(e.to_string())
}

/// Cluster a JSON corpus and return the report as JSON
#[pyfunction]
#[pyo3(signature = (json_input))]
pub fn cluster_from_json(json_input: &str) -> PyResult<String> {
    let doc: JsonDocument = serde_json::from_str(json_input)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(format!("Invalid JSON: {}", e)))?;
    let config = doc.config.clone().unwrap_or_default();

    let report = run_pipeline(&config, &JsonCorpus { doc: &doc }, None).map_err(to_py_err)?;
    report.to_json().map_err(to_py_err)
}

/// Check a JSON config without running anything; returns the normalized config
#[pyfunction]
#[pyo3(signature = (json_input))]
pub fn validate_config_json(json_input: &str) -> PyResult<String> {
    let config = ClusterConfig::from_json_str(json_input).map_err(to_py_err)?;
    serde_json::to_string(&config)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_document_pairs_and_text() {
        let json = r#"{
            "sentences": [[["The", "DET"], ["cat", "NOUN"]]],
            "text": "the/at dog/nn\n",
            "config": {"metric": "manhattan", "cutoff_fraction": 0.2}
        }"#;
        let doc: JsonDocument = serde_json::from_str(json).unwrap();
        let corpus = JsonCorpus { doc: &doc }.load(true).unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.sentences[0][0], TaggedToken::new("the", "DET"));
        assert_eq!(corpus.sentences[1][1], TaggedToken::new("dog", "NOUN"));

        let config = doc.config.unwrap();
        assert_eq!(config.cutoff_fraction, 0.2);
        assert_eq!(config.num_splits, 8);
    }

    #[test]
    fn test_json_document_defaults() {
        let doc: JsonDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.sentences.is_empty());
        assert!(doc.text.is_none());
        assert!(doc.config.is_none());
    }

    #[test]
    fn test_json_document_rejects_unknown_metric() {
        let json = r#"{"config": {"metric": "unknown_metric"}}"#;
        assert!(serde_json::from_str::<JsonDocument>(json).is_err());
    }
}
