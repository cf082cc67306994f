//! Native Python classes

use crate::distance::DistanceMetric;
use crate::linkage::LinkageMethod;
use crate::nlp::corpus::{InMemoryCorpus, TaggedCorpusFile};
use crate::pipeline::{run_pipeline, PipelineReport};
use crate::types::{ClusterConfig, Corpus};
use pyo3::prelude::*;
use std::path::PathBuf;

fn value_error(e: impl ToString) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(e.to_string())
}

/// Configuration for word clustering
#[pyclass(name = "ClusterConfig")]
#[derive(Clone)]
pub struct PyClusterConfig {
    inner: ClusterConfig,
}

#[pymethods]
impl PyClusterConfig {
    #[new]
    #[pyo3(signature = (
        use_universal_tagset=true,
        cluster_vocab_size=100,
        context_vocab_size=100,
        cutoff_fraction=0.5,
        metric="cosine",
        linkage="average",
        num_splits=8,
        v_measure_beta=2.0
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        use_universal_tagset: bool,
        cluster_vocab_size: usize,
        context_vocab_size: usize,
        cutoff_fraction: f64,
        metric: &str,
        linkage: &str,
        num_splits: usize,
        v_measure_beta: f64,
    ) -> PyResult<Self> {
        let metric: DistanceMetric = metric.parse().map_err(value_error)?;
        let linkage: LinkageMethod = linkage.parse().map_err(value_error)?;

        let config = ClusterConfig {
            use_universal_tagset,
            cluster_vocab_size,
            context_vocab_size,
            cutoff_fraction,
            metric,
            linkage,
            num_splits,
            v_measure_beta,
        };
        config.validate().map_err(value_error)?;

        Ok(Self { inner: config })
    }

    /// Re-check the configuration; raises ValueError when invalid
    fn validate(&self) -> PyResult<()> {
        self.inner.validate().map_err(value_error)
    }

    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner).map_err(value_error)
    }

    fn __repr__(&self) -> String {
        format!(
            "ClusterConfig(metric='{}', linkage='{}', cutoff_fraction={}, cluster_vocab_size={})",
            self.inner.metric,
            self.inner.linkage,
            self.inner.cutoff_fraction,
            self.inner.cluster_vocab_size
        )
    }
}

/// Result of a clustering run
#[pyclass(name = "ClusterReport")]
pub struct PyClusterReport {
    inner: PipelineReport,
}

#[pymethods]
impl PyClusterReport {
    #[getter]
    fn words(&self) -> Vec<String> {
        self.inner.words.clone()
    }

    #[getter]
    fn threshold(&self) -> f64 {
        self.inner.threshold
    }

    #[getter]
    fn homogeneity(&self) -> f64 {
        self.inner.scores.homogeneity
    }

    #[getter]
    fn completeness(&self) -> f64 {
        self.inner.scores.completeness
    }

    #[getter]
    fn v_measure(&self) -> f64 {
        self.inner.scores.v_measure
    }

    /// Accepted clusters as `(id, join_distance, members)` tuples
    fn clusters(&self) -> Vec<(usize, f64, Vec<String>)> {
        self.inner
            .clusters
            .iter()
            .map(|c| (c.id, c.join_distance, c.members.clone()))
            .collect()
    }

    fn to_json(&self) -> PyResult<String> {
        self.inner.to_json().map_err(value_error)
    }

    fn __len__(&self) -> usize {
        self.inner.num_clusters()
    }

    fn __repr__(&self) -> String {
        format!(
            "ClusterReport(words={}, clusters={}, {})",
            self.inner.words.len(),
            self.inner.num_clusters(),
            self.inner.score_line()
        )
    }
}

/// Cluster tagged sentences given as lists of `(word, tag)` pairs
#[pyfunction]
#[pyo3(signature = (sentences, config=None, output_svg=None))]
pub fn cluster_sentences(
    sentences: Vec<Vec<(String, String)>>,
    config: Option<PyClusterConfig>,
    output_svg: Option<PathBuf>,
) -> PyResult<PyClusterReport> {
    let config = config.map(|c| c.inner).unwrap_or_default();
    let source = InMemoryCorpus::new(Corpus::from_pairs(&sentences));
    let report = run_pipeline(&config, &source, output_svg.as_deref()).map_err(value_error)?;
    Ok(PyClusterReport { inner: report })
}

/// Cluster a `word/TAG` corpus file
#[pyfunction]
#[pyo3(signature = (path, config=None, output_svg=None))]
pub fn cluster_file(
    path: PathBuf,
    config: Option<PyClusterConfig>,
    output_svg: Option<PathBuf>,
) -> PyResult<PyClusterReport> {
    let config = config.map(|c| c.inner).unwrap_or_default();
    let source = TaggedCorpusFile::new(path);
    let report = run_pipeline(&config, &source, output_svg.as_deref()).map_err(value_error)?;
    Ok(PyClusterReport { inner: report })
}
