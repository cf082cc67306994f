//! Distance metrics over context vectors
//!
//! Every metric takes two raw count vectors of equal length, normalizes both
//! to relative frequencies and compares the results. All metrics are pure,
//! total functions: undefined numeric cases resolve to fixed conventions
//! instead of errors so the parallel matrix computation never fails on data.

use crate::context::normalize;
use crate::errors::{Result, WordClusterError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Probability floor substituted for `q_i = 0` in a KL-divergence term.
///
/// A term with `p_i > 0` and `q_i = 0` therefore contributes the finite
/// penalty `p_i * ln(p_i / KL_EPSILON)`.
pub const KL_EPSILON: f64 = 1e-10;

/// Number of decimal digits kept by the cosine distance
const COSINE_DECIMALS: i32 = 5;

/// The closed set of metrics selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DistanceMetric {
    Euclidean,
    Manhattan,
    Cosine,
    #[serde(rename = "kl")]
    KlDivergence,
}

impl DistanceMetric {
    /// All metrics, in declaration order
    pub const ALL: [DistanceMetric; 4] = [
        DistanceMetric::Euclidean,
        DistanceMetric::Manhattan,
        DistanceMetric::Cosine,
        DistanceMetric::KlDivergence,
    ];

    /// Canonical name used in configs and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Manhattan => "manhattan",
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::KlDivergence => "kl",
        }
    }

    /// Distance between two unnormalized context vectors
    pub fn distance(&self, w: &[u32], v: &[u32]) -> f64 {
        match self {
            DistanceMetric::Euclidean => euclidean(w, v),
            DistanceMetric::Manhattan => manhattan(w, v),
            DistanceMetric::Cosine => cosine(w, v),
            DistanceMetric::KlDivergence => symmetric_kl(w, v),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = WordClusterError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "euclidean" | "dist_euclidean" => Ok(DistanceMetric::Euclidean),
            "manhattan" | "dist_manhattan" | "cityblock" => Ok(DistanceMetric::Manhattan),
            "cosine" | "cossim" | "dist_cossim" => Ok(DistanceMetric::Cosine),
            "kl" | "dist_kl" | "kl_divergence" => Ok(DistanceMetric::KlDivergence),
            other => Err(WordClusterError::invalid_config(format!(
                "unknown distance metric '{}' (expected one of: euclidean, manhattan, cosine, kl)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for DistanceMetric {
    type Error = WordClusterError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Euclidean distance between the normalized vectors
pub fn euclidean(w: &[u32], v: &[u32]) -> f64 {
    let (p, q) = (normalize(w), normalize(v));
    p.iter()
        .zip(&q)
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}

/// Manhattan (L1) distance between the normalized vectors
pub fn manhattan(w: &[u32], v: &[u32]) -> f64 {
    let (p, q) = (normalize(w), normalize(v));
    p.iter().zip(&q).map(|(a, b)| (a - b).abs()).sum()
}

/// Cosine similarity of two vectors; 0 when either has zero magnitude
pub fn cosine_similarity(p: &[f64], q: &[f64]) -> f64 {
    let dot: f64 = p.iter().zip(q).map(|(a, b)| a * b).sum();
    let norm_p = p.iter().map(|a| a * a).sum::<f64>().sqrt();
    let norm_q = q.iter().map(|b| b * b).sum::<f64>().sqrt();
    if norm_p == 0.0 || norm_q == 0.0 {
        0.0
    } else {
        dot / (norm_p * norm_q)
    }
}

/// `1 - cosine_similarity`, rounded to 5 decimal digits
pub fn cosine(w: &[u32], v: &[u32]) -> f64 {
    let (p, q) = (normalize(w), normalize(v));
    let scale = 10f64.powi(COSINE_DECIMALS);
    let dist = ((1.0 - cosine_similarity(&p, &q)) * scale).round() / scale;
    // Rounding noise on identical vectors can land a hair below zero.
    if dist > 0.0 {
        dist
    } else {
        0.0
    }
}

/// One-directional KL divergence `KL(p || q)` over probability vectors.
///
/// Positions with `p_i = 0` contribute nothing; `q_i = 0` is floored at
/// [`KL_EPSILON`].
pub fn kl_divergence(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q)
        .filter(|(pi, _)| **pi > 0.0)
        .map(|(&pi, &qi)| pi * (pi / qi.max(KL_EPSILON)).ln())
        .sum()
}

/// Symmetric KL divergence `KL(w || v) + KL(v || w)` of the normalized vectors
pub fn symmetric_kl(w: &[u32], v: &[u32]) -> f64 {
    let (p, q) = (normalize(w), normalize(v));
    kl_divergence(&p, &q) + kl_divergence(&q, &p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metric_names() {
        assert_eq!("euclidean".parse::<DistanceMetric>().unwrap(), DistanceMetric::Euclidean);
        assert_eq!("Manhattan".parse::<DistanceMetric>().unwrap(), DistanceMetric::Manhattan);
        assert_eq!("dist_cossim".parse::<DistanceMetric>().unwrap(), DistanceMetric::Cosine);
        assert_eq!("kl".parse::<DistanceMetric>().unwrap(), DistanceMetric::KlDivergence);

        let err = "unknown_metric".parse::<DistanceMetric>().unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("unknown_metric"));
    }

    #[test]
    fn test_metric_names_roundtrip() {
        for metric in DistanceMetric::ALL {
            assert_eq!(metric.as_str().parse::<DistanceMetric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_euclidean() {
        // normalized: [0.5, 0.5, 0] vs [0, 0, 1]
        let d = euclidean(&[1, 1, 0], &[0, 0, 3]);
        assert!((d - 1.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_manhattan() {
        let d = manhattan(&[1, 1, 0], &[0, 0, 3]);
        assert!((d - 2.0).abs() < 1e-12);

        let d = manhattan(&[2, 2], &[1, 3]);
        assert!((d - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_scale_invariance() {
        // Normalization makes raw counts irrelevant, only proportions matter
        for metric in DistanceMetric::ALL {
            assert_eq!(metric.distance(&[1, 2, 3], &[2, 4, 6]), 0.0, "{}", metric);
        }
    }

    #[test]
    fn test_cosine_orthogonal_and_rounded() {
        assert_eq!(cosine(&[1, 0], &[0, 1]), 1.0);

        let d = cosine(&[3, 1, 0], &[1, 2, 2]);
        let scaled = d * 1e5;
        assert!((scaled - scaled.round()).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector_is_max_distance() {
        assert_eq!(cosine(&[0, 0, 0], &[1, 2, 3]), 1.0);
        assert_eq!(cosine(&[0, 0, 0], &[0, 0, 0]), 1.0);
    }

    #[test]
    fn test_kl_identical_is_zero() {
        assert_eq!(symmetric_kl(&[1, 2, 3], &[1, 2, 3]), 0.0);
        assert_eq!(symmetric_kl(&[0, 0], &[0, 0]), 0.0);
    }

    #[test]
    fn test_kl_known_value() {
        // p = [0.5, 0.5], q = [0.25, 0.75]
        let expected = 0.5 * (0.5f64 / 0.25).ln()
            + 0.5 * (0.5f64 / 0.75).ln()
            + 0.25 * (0.25f64 / 0.5).ln()
            + 0.75 * (0.75f64 / 0.5).ln();
        let d = symmetric_kl(&[1, 1], &[1, 3]);
        assert!((d - expected).abs() < 1e-12);
    }

    #[test]
    fn test_kl_zero_probability_penalty_is_finite() {
        let d = symmetric_kl(&[1, 1, 0], &[0, 1, 1]);
        assert!(d.is_finite());
        assert!(d > 0.0);
        assert_eq!(d, symmetric_kl(&[0, 1, 1], &[1, 1, 0]));
    }

    #[test]
    fn test_identity_and_symmetry_all_metrics() {
        let a = [4, 0, 1, 7, 0, 2];
        let b = [0, 3, 1, 1, 9, 0];
        for metric in DistanceMetric::ALL {
            assert_eq!(metric.distance(&a, &a), 0.0, "{}", metric);
            assert_eq!(metric.distance(&a, &b), metric.distance(&b, &a), "{}", metric);
        }
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&DistanceMetric::KlDivergence).unwrap();
        assert_eq!(json, "\"kl\"");
        let metric: DistanceMetric = serde_json::from_str("\"dist_euclidean\"").unwrap();
        assert_eq!(metric, DistanceMetric::Euclidean);
        assert!(serde_json::from_str::<DistanceMetric>("\"jaccard\"").is_err());
    }
}
