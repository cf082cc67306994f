//! Agglomerative cluster extraction
//!
//! Turns the join records of a linkage run into an arena of [`Cluster`]s
//! (leaves first, then one internal node per join) and cuts the resulting
//! forest into a flat partition at a fraction of the largest join distance.

use crate::errors::{Result, WordClusterError};
use crate::linkage::{linkage, JoinRecord, LinkageMethod};
use crate::matrix::DistanceMatrix;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A node of the agglomerative forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Leaves are `0..n` in word-list order; joins continue from `n`
    pub id: usize,
    /// Leaf ids under this node, ascending
    pub members: Vec<usize>,
    /// Distance at which this node was formed (0 for leaves)
    pub join_distance: f64,
    /// The two merged clusters, `None` for leaves
    pub children: Option<(usize, usize)>,
}

impl Cluster {
    /// Create a singleton leaf cluster
    pub fn leaf(id: usize) -> Self {
        Self {
            id,
            members: vec![id],
            join_distance: 0.0,
            children: None,
        }
    }

    /// Check if this is a singleton leaf
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Number of leaves under this node
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false: every cluster holds at least one leaf
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member leaves resolved against the clustered word list
    pub fn member_words<'a, S: AsRef<str>>(&self, words: &'a [S]) -> Vec<&'a str> {
        self.members
            .iter()
            .filter_map(|&leaf| words.get(leaf).map(|w| w.as_ref()))
            .collect()
    }
}

/// Arena of clusters indexed by cluster id
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClusterForest {
    clusters: Vec<Cluster>,
    num_leaves: usize,
}

impl ClusterForest {
    /// All clusters, ordered by id
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Cluster by id
    pub fn get(&self, id: usize) -> Option<&Cluster> {
        self.clusters.get(id)
    }

    /// Number of leaves (clustered words)
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// Clusters that were never merged into a parent, ascending by id
    pub fn roots(&self) -> Vec<&Cluster> {
        let mut has_parent = vec![false; self.clusters.len()];
        for cluster in &self.clusters {
            if let Some((l, r)) = cluster.children {
                has_parent[l] = true;
                has_parent[r] = true;
            }
        }
        self.clusters
            .iter()
            .filter(|c| !has_parent[c.id])
            .collect()
    }

    /// Largest join distance in the forest (0 if nothing was joined)
    pub fn max_join_distance(&self) -> f64 {
        self.clusters
            .iter()
            .map(|c| c.join_distance)
            .fold(0.0, f64::max)
    }
}

/// Run the linkage over a square distance matrix
pub fn build_tree(matrix: &DistanceMatrix, method: LinkageMethod) -> Result<Vec<JoinRecord>> {
    linkage(&matrix.to_condensed(), matrix.len(), method)
}

/// Rebuild the cluster arena from join records over `num_leaves` leaves.
///
/// Each join may only reference clusters that already exist and have not
/// been merged yet.
pub fn extract_clusters(joins: &[JoinRecord], num_leaves: usize) -> Result<ClusterForest> {
    let mut clusters: Vec<Cluster> = (0..num_leaves).map(Cluster::leaf).collect();
    let mut merged = vec![false; num_leaves + joins.len()];

    for join in joins {
        let id = clusters.len();
        for child in [join.left, join.right] {
            if child >= id {
                return Err(WordClusterError::invalid_input(format!(
                    "join {} references cluster {} that does not exist yet",
                    id, child
                )));
            }
            if merged[child] {
                return Err(WordClusterError::invalid_input(format!(
                    "join {} reuses cluster {} that was already merged",
                    id, child
                )));
            }
        }
        if join.left == join.right {
            return Err(WordClusterError::invalid_input(format!(
                "join {} merges cluster {} with itself",
                id, join.left
            )));
        }
        merged[join.left] = true;
        merged[join.right] = true;

        let mut members = Vec::with_capacity(clusters[join.left].len() + clusters[join.right].len());
        members.extend_from_slice(&clusters[join.left].members);
        members.extend_from_slice(&clusters[join.right].members);
        members.sort_unstable();

        clusters.push(Cluster {
            id,
            members,
            join_distance: join.distance,
            children: Some((join.left, join.right)),
        });
    }

    Ok(ClusterForest {
        clusters,
        num_leaves,
    })
}

/// A flat clustering cut from the forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    /// Join-distance threshold the cut was made at
    pub threshold: f64,
    /// Accepted clusters, ascending by id
    pub clusters: Vec<Cluster>,
}

impl Partition {
    /// Number of accepted clusters
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Check if nothing was accepted (only for an empty forest)
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// Cut the forest at `cutoff_fraction` of its largest join distance.
///
/// Every leaf ends up in the highest cluster on its path to the root whose
/// join distance is at or below the threshold, or alone if none is. The
/// result covers each leaf exactly once.
pub fn filter_clusters(forest: &ClusterForest, cutoff_fraction: f64) -> Result<Partition> {
    if !(0.0..=1.0).contains(&cutoff_fraction) {
        return Err(WordClusterError::invalid_config(format!(
            "cutoff_fraction must be between 0 and 1, got {}",
            cutoff_fraction
        )));
    }

    let threshold = cutoff_fraction * forest.max_join_distance();
    let mut covered = vec![false; forest.num_leaves];
    let mut accepted = Vec::new();

    // Parents always have larger ids than their children, so walking ids
    // downward visits every ancestor before its descendants.
    for cluster in forest.clusters.iter().rev() {
        let Some(&first) = cluster.members.first() else {
            continue;
        };
        if covered[first] || cluster.join_distance > threshold {
            continue;
        }
        for &leaf in &cluster.members {
            covered[leaf] = true;
        }
        accepted.push(cluster.clone());
    }

    accepted.reverse();
    debug!(
        threshold,
        clusters = accepted.len(),
        leaves = forest.num_leaves,
        "forest cut"
    );
    Ok(Partition {
        threshold,
        clusters: accepted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(left: usize, right: usize, distance: f64, size: usize) -> JoinRecord {
        JoinRecord {
            left,
            right,
            distance,
            size,
        }
    }

    /// ((0,1)@1, (2,3)@2)@5, then 4 joins the root @10
    fn sample_forest() -> ClusterForest {
        let joins = vec![
            join(0, 1, 1.0, 2),
            join(2, 3, 2.0, 2),
            join(5, 6, 5.0, 4),
            join(4, 7, 10.0, 5),
        ];
        extract_clusters(&joins, 5).unwrap()
    }

    fn members(partition: &Partition) -> Vec<Vec<usize>> {
        partition.clusters.iter().map(|c| c.members.clone()).collect()
    }

    #[test]
    fn test_extract_clusters() {
        let forest = sample_forest();
        assert_eq!(forest.clusters().len(), 9);
        assert_eq!(forest.get(5).unwrap().members, vec![0, 1]);
        assert_eq!(forest.get(7).unwrap().members, vec![0, 1, 2, 3]);
        assert_eq!(forest.get(8).unwrap().members, vec![0, 1, 2, 3, 4]);
        assert_eq!(forest.get(8).unwrap().join_distance, 10.0);
        assert_eq!(forest.get(6).unwrap().children, Some((2, 3)));
        assert!(forest.get(4).unwrap().is_leaf());

        let roots = forest.roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id, 8);
        assert_eq!(forest.max_join_distance(), 10.0);
    }

    #[test]
    fn test_extract_rejects_forward_and_reused_references() {
        assert!(extract_clusters(&[join(0, 3, 1.0, 2)], 3).is_err());
        assert!(extract_clusters(&[join(0, 1, 1.0, 2), join(0, 2, 2.0, 2)], 3).is_err());
        assert!(extract_clusters(&[join(1, 1, 1.0, 2)], 3).is_err());
    }

    #[test]
    fn test_filter_middle_cutoff() {
        let forest = sample_forest();
        let partition = filter_clusters(&forest, 0.5).unwrap();
        assert_eq!(partition.threshold, 5.0);
        assert_eq!(members(&partition), vec![vec![4], vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_filter_low_cutoff() {
        let forest = sample_forest();
        let partition = filter_clusters(&forest, 0.15).unwrap();
        assert_eq!(members(&partition), vec![vec![2], vec![3], vec![4], vec![0, 1]]);
    }

    #[test]
    fn test_filter_extremes() {
        let forest = sample_forest();

        let all = filter_clusters(&forest, 1.0).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all.clusters[0].members, vec![0, 1, 2, 3, 4]);

        let none = filter_clusters(&forest, 0.0).unwrap();
        assert_eq!(none.len(), 5);
        assert!(none.clusters.iter().all(Cluster::is_leaf));
    }

    #[test]
    fn test_filter_zero_distance_join_survives_zero_cutoff() {
        let forest = extract_clusters(&[join(0, 1, 0.0, 2), join(2, 3, 0.4, 3)], 3).unwrap();
        let partition = filter_clusters(&forest, 0.0).unwrap();
        assert_eq!(members(&partition), vec![vec![2], vec![0, 1]]);
    }

    #[test]
    fn test_filter_rejects_bad_cutoff() {
        let forest = sample_forest();
        assert!(filter_clusters(&forest, 1.01).unwrap_err().is_config_error());
        assert!(filter_clusters(&forest, f64::NAN).is_err());
    }

    #[test]
    fn test_filter_without_joins() {
        let forest = extract_clusters(&[], 3).unwrap();
        let partition = filter_clusters(&forest, 0.7).unwrap();
        assert_eq!(partition.len(), 3);
        assert_eq!(partition.threshold, 0.0);
    }

    #[test]
    fn test_build_tree_from_matrix() {
        let matrix = DistanceMatrix::from_condensed(&[0.2, 0.9, 0.8], 3).unwrap();
        let joins = build_tree(&matrix, LinkageMethod::Average).unwrap();
        assert_eq!(joins.len(), 2);
        assert_eq!((joins[0].left, joins[0].right), (0, 1));
        assert!((joins[1].distance - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_member_words() {
        let forest = sample_forest();
        let words = ["a", "b", "c", "d", "e"];
        assert_eq!(forest.get(6).unwrap().member_words(&words), vec!["c", "d"]);
    }
}
