//! Cluster evaluation against dominant POS tags
//!
//! Each clustered word contributes one `(gold, predicted)` label pair: its
//! dominant tag and the id of the cluster it landed in. The external
//! clustering scores (homogeneity, completeness, V-measure) are computed
//! from the contingency table of those pairs.

use crate::clustering::Partition;
use crate::context::WordTypes;
use crate::errors::{Result, WordClusterError};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Parallel gold / predicted label sequences, one entry per clustered word
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelSequences {
    pub gold: Vec<String>,
    pub predicted: Vec<usize>,
}

impl LabelSequences {
    pub fn len(&self) -> usize {
        self.gold.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gold.is_empty()
    }
}

/// Emit a `(dominant tag, cluster id)` pair for every member of every cluster.
///
/// `words` is the clustered word list the partition's leaf ids refer to.
pub fn to_label_sequences<S: AsRef<str>>(
    partition: &Partition,
    words: &[S],
    word_types: &WordTypes,
) -> Result<LabelSequences> {
    let mut labels = LabelSequences::default();
    for cluster in &partition.clusters {
        for &leaf in &cluster.members {
            let word = words.get(leaf).map(|w| w.as_ref()).ok_or_else(|| {
                WordClusterError::invalid_input(format!(
                    "cluster {} references leaf {} outside the word list",
                    cluster.id, leaf
                ))
            })?;
            let tag = word_types
                .require(word)?
                .dominant_tag
                .clone()
                .ok_or_else(|| WordClusterError::unknown_word(word))?;
            labels.gold.push(tag);
            labels.predicted.push(cluster.id);
        }
    }
    Ok(labels)
}

/// Homogeneity, completeness and V-measure of one clustering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterScores {
    pub homogeneity: f64,
    pub completeness: f64,
    pub v_measure: f64,
}

impl ClusterScores {
    /// Score label sequences, weighting the V-measure by `beta`
    pub fn compute(labels: &LabelSequences, beta: f64) -> Result<Self> {
        let (h, c) = homogeneity_completeness(&labels.gold, &labels.predicted)?;
        Ok(Self {
            homogeneity: h,
            completeness: c,
            v_measure: combine(h, c, beta),
        })
    }
}

/// Each cluster contains only members of a single gold class
pub fn homogeneity<G, P>(gold: &[G], predicted: &[P]) -> Result<f64>
where
    G: Eq + Hash,
    P: Eq + Hash,
{
    homogeneity_completeness(gold, predicted).map(|(h, _)| h)
}

/// All members of a gold class are assigned to the same cluster
pub fn completeness<G, P>(gold: &[G], predicted: &[P]) -> Result<f64>
where
    G: Eq + Hash,
    P: Eq + Hash,
{
    homogeneity_completeness(gold, predicted).map(|(_, c)| c)
}

/// Weighted harmonic mean of homogeneity and completeness.
///
/// `beta > 1` weights completeness more strongly, `beta < 1` homogeneity.
pub fn v_measure<G, P>(gold: &[G], predicted: &[P], beta: f64) -> Result<f64>
where
    G: Eq + Hash,
    P: Eq + Hash,
{
    let (h, c) = homogeneity_completeness(gold, predicted)?;
    Ok(combine(h, c, beta))
}

fn combine(h: f64, c: f64, beta: f64) -> f64 {
    let denom = beta * h + c;
    if denom == 0.0 {
        0.0
    } else {
        (1.0 + beta) * h * c / denom
    }
}

fn homogeneity_completeness<G, P>(gold: &[G], predicted: &[P]) -> Result<(f64, f64)>
where
    G: Eq + Hash,
    P: Eq + Hash,
{
    if gold.len() != predicted.len() {
        return Err(WordClusterError::invalid_input(format!(
            "label sequences differ in length: {} gold vs {} predicted",
            gold.len(),
            predicted.len()
        )));
    }
    if gold.is_empty() {
        return Ok((1.0, 1.0));
    }

    let classes = dense_ids(gold);
    let clusters = dense_ids(predicted);
    let n_classes = classes.iter().max().map_or(0, |&m| m + 1);
    let n_clusters = clusters.iter().max().map_or(0, |&m| m + 1);

    let mut class_counts = vec![0usize; n_classes];
    let mut cluster_counts = vec![0usize; n_clusters];
    let mut contingency: FxHashMap<(usize, usize), usize> = FxHashMap::default();
    for (&c, &k) in classes.iter().zip(&clusters) {
        class_counts[c] += 1;
        cluster_counts[k] += 1;
        *contingency.entry((c, k)).or_insert(0) += 1;
    }

    let n = gold.len() as f64;
    let entropy_classes = entropy(&class_counts, n);
    let entropy_clusters = entropy(&cluster_counts, n);

    // Mutual information between classes and clusters
    let mut mutual_info = 0.0;
    for (&(c, k), &count) in &contingency {
        let nck = count as f64;
        mutual_info +=
            (nck / n) * (nck * n / (class_counts[c] as f64 * cluster_counts[k] as f64)).ln();
    }

    let homogeneity = if entropy_classes == 0.0 {
        1.0
    } else {
        mutual_info / entropy_classes
    };
    let completeness = if entropy_clusters == 0.0 {
        1.0
    } else {
        mutual_info / entropy_clusters
    };
    Ok((clamp_unit(homogeneity), clamp_unit(completeness)))
}

fn dense_ids<T: Eq + Hash>(labels: &[T]) -> Vec<usize> {
    let mut ids: FxHashMap<&T, usize> = FxHashMap::default();
    labels
        .iter()
        .map(|label| {
            let next = ids.len();
            *ids.entry(label).or_insert(next)
        })
        .collect()
}

fn entropy(counts: &[usize], n: f64) -> f64 {
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.ln()
        })
        .sum()
}

fn clamp_unit(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::Cluster;
    use crate::types::Corpus;
    use crate::vocab::ContextIndex;

    #[test]
    fn test_perfect_clustering() {
        let gold = ["a", "a", "b", "b"];
        let pred = [7, 7, 3, 3];
        assert!((homogeneity(&gold, &pred).unwrap() - 1.0).abs() < 1e-12);
        assert!((completeness(&gold, &pred).unwrap() - 1.0).abs() < 1e-12);
        assert!((v_measure(&gold, &pred, 2.0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_singletons_are_homogeneous_not_complete() {
        let gold = ["a", "a", "b", "b"];
        let pred = [0, 1, 2, 3];
        assert!((homogeneity(&gold, &pred).unwrap() - 1.0).abs() < 1e-12);
        // I(C;K) = ln 2, H(K) = ln 4
        assert!((completeness(&gold, &pred).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_one_cluster_is_complete_not_homogeneous() {
        let gold = ["a", "a", "b", "b"];
        let pred = [0, 0, 0, 0];
        assert!(homogeneity(&gold, &pred).unwrap().abs() < 1e-12);
        assert_eq!(completeness(&gold, &pred).unwrap(), 1.0);
        assert_eq!(v_measure(&gold, &pred, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_v_measure_beta_weighting() {
        let gold = ["a", "a", "b", "b"];
        let pred = [0, 1, 2, 3];
        // h = 1, c = 0.5
        let v1 = v_measure(&gold, &pred, 1.0).unwrap();
        assert!((v1 - 2.0 / 3.0).abs() < 1e-12);
        let v2 = v_measure(&gold, &pred, 2.0).unwrap();
        assert!((v2 - 3.0 * 0.5 / 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_mismatched_lengths() {
        assert!(homogeneity(&["a"], &[0, 1]).is_err());
    }

    #[test]
    fn test_to_label_sequences() {
        let corpus = Corpus::from_pairs(&[
            vec![("the", "DET"), ("cat", "NOUN")],
            vec![("a", "DET"), ("dog", "NOUN")],
        ]);
        let types = WordTypes::from_corpus(&corpus, &ContextIndex::build(&["the"])).unwrap();
        let words = ["the", "cat", "a", "dog"];

        let mut dets = Cluster::leaf(4);
        dets.members = vec![0, 2];
        let mut nouns = Cluster::leaf(5);
        nouns.members = vec![1, 3];
        let partition = Partition {
            threshold: 1.0,
            clusters: vec![dets, nouns],
        };

        let labels = to_label_sequences(&partition, &words, &types).unwrap();
        assert_eq!(labels.gold, vec!["DET", "DET", "NOUN", "NOUN"]);
        assert_eq!(labels.predicted, vec![4, 4, 5, 5]);

        let scores = ClusterScores::compute(&labels, 2.0).unwrap();
        assert!((scores.v_measure - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_to_label_sequences_unknown_word() {
        let types = WordTypes::new(0);
        let partition = Partition {
            threshold: 0.0,
            clusters: vec![Cluster::leaf(0)],
        };
        let err = to_label_sequences(&partition, &["ghost"], &types).unwrap_err();
        assert_eq!(err, WordClusterError::unknown_word("ghost"));
    }
}
