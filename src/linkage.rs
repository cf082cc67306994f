//! Generic agglomerative linkage
//!
//! Consumes a condensed distance vector and repeatedly merges the closest
//! pair of clusters, producing one [`JoinRecord`] per merge. Numbering
//! follows the usual convention: leaves are `0..n`, the `k`-th merge
//! creates cluster `n + k`. Cluster-to-cluster distances after a merge are
//! derived with the Lance–Williams update for the chosen method.

use crate::errors::{Result, WordClusterError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Linkage criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LinkageMethod {
    /// Nearest members
    Single,
    /// Farthest members
    Complete,
    /// Mean over all member pairs (UPGMA)
    #[default]
    Average,
    /// Mean of the two merged clusters' distances (WPGMA)
    Weighted,
}

impl LinkageMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkageMethod::Single => "single",
            LinkageMethod::Complete => "complete",
            LinkageMethod::Average => "average",
            LinkageMethod::Weighted => "weighted",
        }
    }

    /// Distance from the merge of `a` and `b` to a third cluster `k`
    fn update(&self, d_ak: f64, d_bk: f64, size_a: usize, size_b: usize) -> f64 {
        match self {
            LinkageMethod::Single => d_ak.min(d_bk),
            LinkageMethod::Complete => d_ak.max(d_bk),
            LinkageMethod::Average => {
                let (sa, sb) = (size_a as f64, size_b as f64);
                (sa * d_ak + sb * d_bk) / (sa + sb)
            }
            LinkageMethod::Weighted => (d_ak + d_bk) / 2.0,
        }
    }
}

impl fmt::Display for LinkageMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkageMethod {
    type Err = WordClusterError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "single" => Ok(LinkageMethod::Single),
            "complete" => Ok(LinkageMethod::Complete),
            "average" | "upgma" => Ok(LinkageMethod::Average),
            "weighted" | "wpgma" => Ok(LinkageMethod::Weighted),
            other => Err(WordClusterError::invalid_config(format!(
                "unknown linkage method '{}' (expected one of: single, complete, average, weighted)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for LinkageMethod {
    type Error = WordClusterError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// One merge of the agglomerative tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JoinRecord {
    /// Smaller of the two merged cluster ids
    pub left: usize,
    /// Larger of the two merged cluster ids
    pub right: usize,
    /// Linkage distance at which the merge happened
    pub distance: f64,
    /// Number of leaves under the new cluster
    pub size: usize,
}

/// Agglomerate `n` items given their condensed distance vector.
///
/// Returns `n - 1` join records in merge order, which is non-decreasing in
/// distance for every supported method. Ties go to the lowest
/// `(row, column)` pair of active clusters.
pub fn linkage(condensed: &[f64], n: usize, method: LinkageMethod) -> Result<Vec<JoinRecord>> {
    let expected = n * n.saturating_sub(1) / 2;
    if condensed.len() != expected {
        return Err(WordClusterError::invalid_input(format!(
            "condensed vector of length {} does not describe {} points (expected {})",
            condensed.len(),
            n,
            expected
        )));
    }
    if let Some(pos) = condensed.iter().position(|d| !d.is_finite()) {
        return Err(WordClusterError::invalid_input(format!(
            "non-finite distance at condensed position {}",
            pos
        )));
    }
    if n < 2 {
        return Ok(Vec::new());
    }

    let mut dist = vec![0.0; n * n];
    let mut k = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            dist[i * n + j] = condensed[k];
            dist[j * n + i] = condensed[k];
            k += 1;
        }
    }

    let mut active: Vec<usize> = (0..n).collect();
    let mut ids: Vec<usize> = (0..n).collect();
    let mut sizes = vec![1usize; n];
    let mut joins = Vec::with_capacity(n - 1);

    for step in 0..(n - 1) {
        let (mut best_a, mut best_b) = (0, 0);
        let mut best = f64::INFINITY;
        for (pos, &a) in active.iter().enumerate() {
            for &b in &active[pos + 1..] {
                let d = dist[a * n + b];
                if d < best {
                    best = d;
                    best_a = a;
                    best_b = b;
                }
            }
        }

        let (a, b) = (best_a, best_b);
        joins.push(JoinRecord {
            left: ids[a].min(ids[b]),
            right: ids[a].max(ids[b]),
            distance: best,
            size: sizes[a] + sizes[b],
        });

        for &other in &active {
            if other == a || other == b {
                continue;
            }
            let d = method.update(dist[a * n + other], dist[b * n + other], sizes[a], sizes[b]);
            dist[a * n + other] = d;
            dist[other * n + a] = d;
        }

        active.retain(|&slot| slot != b);
        ids[a] = n + step;
        sizes[a] += sizes[b];
    }

    Ok(joins)
}
