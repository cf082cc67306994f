//! # rapid_wordcluster
//!
//! Distributional word clustering with Python bindings.
//!
//! Word types are described by how often each frequent context word
//! appears immediately to their left and right. Pairwise distances between
//! those context vectors are computed in parallel blocks, an agglomerative
//! tree is grown over them and cut at a fraction of its height, and the
//! resulting classes are scored against the words' dominant POS tags.
//!
//! ## Features
//!
//! - **Four metrics**: Euclidean, Manhattan, cosine and symmetric KL
//! - **Parallel**: block-partitioned distance matrix on a rayon pool
//! - **Deterministic**: identical matrices for every partition count
//! - **Python bindings**: via PyO3 (feature `python`)
//!
//! ```
//! use rapid_wordcluster::{cluster_corpus, ClusterConfig, Corpus};
//!
//! let corpus = Corpus::from_pairs(&[
//!     vec![("the", "DET"), ("cat", "NOUN")],
//!     vec![("the", "DET"), ("dog", "NOUN")],
//! ]);
//! let run = cluster_corpus(&ClusterConfig::new(), &corpus).unwrap();
//! assert_eq!(run.words, vec!["the", "cat", "dog"]);
//! ```

pub mod clustering;
pub mod context;
pub mod dendrogram;
pub mod distance;
pub mod errors;
pub mod evaluation;
pub mod linkage;
pub mod matrix;
pub mod nlp;
pub mod pipeline;
pub mod types;
pub mod vocab;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use errors::{Result, WordClusterError};
pub use types::{ClusterConfig, Corpus, TaggedToken, START, STOP, UNKNOWN};

// Re-export main functionality
pub use clustering::{build_tree, extract_clusters, filter_clusters, Cluster, ClusterForest, Partition};
pub use context::{normalize, WordType, WordTypes};
pub use dendrogram::{render_dendrogram_svg, write_dendrogram};
pub use distance::DistanceMetric;
pub use evaluation::{to_label_sequences, ClusterScores, LabelSequences};
pub use linkage::{linkage, JoinRecord, LinkageMethod};
pub use matrix::{DistanceMatrix, MatrixBuilder};
pub use nlp::corpus::{CorpusSource, InMemoryCorpus, TaggedCorpusFile};
pub use nlp::tagset::UniversalTag;
pub use pipeline::{cluster_corpus, run_pipeline, run_with_metric_name, ClusterRun, PipelineReport};
pub use vocab::{build_top_k_list, ContextIndex, Side};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Initialize the Python module
#[cfg(feature = "python")]
#[pymodule]
fn _rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    python::register_module(m)?;
    Ok(())
}
