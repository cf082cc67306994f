//! Serializable summary of a clustering run

use crate::clustering::{Cluster, Partition};
use crate::evaluation::ClusterScores;
use crate::types::ClusterConfig;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// An accepted cluster resolved to its member words
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub id: usize,
    pub join_distance: f64,
    pub members: Vec<String>,
}

impl ClusterSummary {
    pub fn from_cluster<S: AsRef<str>>(cluster: &Cluster, words: &[S]) -> Self {
        Self {
            id: cluster.id,
            join_distance: cluster.join_distance,
            members: cluster
                .member_words(words)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Wall-clock time spent in one pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTiming {
    pub stage: String,
    pub elapsed_ms: f64,
}

/// Measures a single stage
#[derive(Debug, Clone, Copy)]
pub struct StageClock {
    start: Instant,
}

impl StageClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Finish the measurement under the given stage name
    pub fn finish(self, stage: &str) -> StageTiming {
        StageTiming {
            stage: stage.to_string(),
            elapsed_ms: self.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

/// Everything a caller needs from a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// The configuration the run used
    pub config: ClusterConfig,
    /// Clustered words; leaf `i` of the tree is `words[i]`
    pub words: Vec<String>,
    /// Join-distance threshold the partition was cut at
    pub threshold: f64,
    /// Largest join distance in the tree
    pub max_join_distance: f64,
    /// Accepted clusters, ascending by id
    pub clusters: Vec<ClusterSummary>,
    pub scores: ClusterScores,
    #[serde(default)]
    pub timings: Vec<StageTiming>,
}

impl PipelineReport {
    pub(crate) fn new(
        config: &ClusterConfig,
        words: Vec<String>,
        partition: &Partition,
        max_join_distance: f64,
        scores: ClusterScores,
        timings: Vec<StageTiming>,
    ) -> Self {
        let clusters = partition
            .clusters
            .iter()
            .map(|c| ClusterSummary::from_cluster(c, &words))
            .collect();
        Self {
            config: config.clone(),
            words,
            threshold: partition.threshold,
            max_join_distance,
            clusters,
            scores,
            timings,
        }
    }

    /// Number of accepted clusters
    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Id of the accepted cluster containing `word`
    pub fn cluster_of(&self, word: &str) -> Option<usize> {
        self.clusters
            .iter()
            .find(|c| c.members.iter().any(|m| m == word))
            .map(|c| c.id)
    }

    /// One-line score summary
    pub fn score_line(&self) -> String {
        format!(
            "H: {:.4} C: {:.4} V: {:.4}",
            self.scores.homogeneity, self.scores.completeness, self.scores.v_measure
        )
    }

    pub fn to_json(&self) -> crate::errors::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
