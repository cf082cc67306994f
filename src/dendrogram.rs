//! SVG dendrogram rendering
//!
//! Draws the agglomerative forest with leaves along the bottom and join
//! height proportional to join distance. Links inside an accepted cluster
//! share that cluster's color; links above the cut threshold are gray and
//! the threshold itself is a dashed line.

use crate::clustering::{ClusterForest, Partition};
use crate::errors::{Result, WordClusterError};
use std::fmt::Write as _;
use std::path::Path;

const DPI: f64 = 72.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const LABEL_SPACE: f64 = 90.0;
const ABOVE_THRESHOLD: &str = "#555555";
const PALETTE: [&str; 8] = [
    "#d62728", "#2ca02c", "#9467bd", "#ff7f0e", "#17becf", "#8c564b", "#e377c2", "#bcbd22",
];

/// Leaf ids in drawing order.
///
/// At every join the child formed at the larger distance is drawn first.
pub fn leaf_order(forest: &ClusterForest) -> Vec<usize> {
    let mut order = Vec::with_capacity(forest.num_leaves());
    for root in forest.roots() {
        let mut stack = vec![root.id];
        while let Some(id) = stack.pop() {
            let Some(cluster) = forest.get(id) else {
                continue;
            };
            match cluster.children {
                None => order.push(id),
                Some((a, b)) => {
                    let (first, second) = if join_distance(forest, b) > join_distance(forest, a) {
                        (b, a)
                    } else {
                        (a, b)
                    };
                    stack.push(second);
                    stack.push(first);
                }
            }
        }
    }
    order
}

fn join_distance(forest: &ClusterForest, id: usize) -> f64 {
    forest.get(id).map_or(0.0, |c| c.join_distance)
}

/// Render the forest as a standalone SVG document
pub fn render_dendrogram_svg<S: AsRef<str>>(
    forest: &ClusterForest,
    partition: &Partition,
    labels: &[S],
    title: &str,
) -> String {
    let k = forest.num_leaves();
    let width = (0.45 * k as f64).max(4.0) * DPI;
    let height = (0.4 * k as f64).max(3.0) * DPI;
    let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = (height - MARGIN_TOP - LABEL_SPACE).max(1.0);
    let baseline = MARGIN_TOP + plot_h;

    let max_d = forest.max_join_distance();
    let scale = if max_d > 0.0 { max_d } else { 1.0 };
    let y_of = |d: f64| baseline - plot_h * (d / scale);

    // Horizontal position of every cluster, leaves spaced evenly
    let order = leaf_order(forest);
    let spacing = plot_w / order.len().max(1) as f64;
    let mut x = vec![0.0; forest.clusters().len()];
    for (pos, &leaf) in order.iter().enumerate() {
        x[leaf] = MARGIN_LEFT + (pos as f64 + 0.5) * spacing;
    }
    for cluster in forest.clusters() {
        if let Some((a, b)) = cluster.children {
            x[cluster.id] = (x[a] + x[b]) / 2.0;
        }
    }

    // Color of the accepted (multi-member) cluster each leaf belongs to
    let mut leaf_color: Vec<Option<&str>> = vec![None; k];
    let mut next_color = 0;
    for accepted in partition.clusters.iter().filter(|c| !c.is_leaf()) {
        let color = PALETTE[next_color % PALETTE.len()];
        next_color += 1;
        for &leaf in &accepted.members {
            if let Some(slot) = leaf_color.get_mut(leaf) {
                *slot = Some(color);
            }
        }
    }

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
        width, height, width, height
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="14" text-anchor="middle">{}</text>"#,
        width / 2.0,
        MARGIN_TOP / 2.0,
        escape(title)
    );

    // Distance axis
    let _ = writeln!(
        svg,
        r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black"/>"#,
        MARGIN_LEFT - 10.0,
        MARGIN_TOP,
        MARGIN_LEFT - 10.0,
        baseline
    );
    for tick in 0..=4 {
        let d = scale * tick as f64 / 4.0;
        let y = y_of(d);
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="9" text-anchor="end">{:.3}</text>"#,
            MARGIN_LEFT - 14.0,
            y + 3.0,
            d
        );
    }

    for cluster in forest.clusters() {
        let Some((a, b)) = cluster.children else {
            continue;
        };
        let color = if cluster.join_distance <= partition.threshold {
            cluster
                .members
                .first()
                .and_then(|&leaf| leaf_color.get(leaf).copied().flatten())
                .unwrap_or(ABOVE_THRESHOLD)
        } else {
            ABOVE_THRESHOLD
        };
        let y = y_of(cluster.join_distance);
        let _ = writeln!(
            svg,
            r#"<path d="M{:.1},{:.1} V{:.1} H{:.1} V{:.1}" fill="none" stroke="{}" stroke-width="1.2"/>"#,
            x[a],
            y_of(join_distance(forest, a)),
            y,
            x[b],
            y_of(join_distance(forest, b)),
            color
        );
    }

    if partition.threshold > 0.0 {
        let y = y_of(partition.threshold);
        let _ = writeln!(
            svg,
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black" stroke-dasharray="4,3"/>"#,
            MARGIN_LEFT,
            y,
            MARGIN_LEFT + plot_w,
            y
        );
    }

    for &leaf in &order {
        let label = labels.get(leaf).map_or("", |l| l.as_ref());
        let _ = writeln!(
            svg,
            r#"<text transform="translate({:.1},{:.1}) rotate(90)" font-family="sans-serif" font-size="8">{}</text>"#,
            x[leaf],
            baseline + 6.0,
            escape(label)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Render and write the dendrogram to `path`
pub fn write_dendrogram<S: AsRef<str>>(
    path: &Path,
    forest: &ClusterForest,
    partition: &Partition,
    labels: &[S],
    title: &str,
) -> Result<()> {
    let svg = render_dendrogram_svg(forest, partition, labels, title);
    std::fs::write(path, svg).map_err(|e| WordClusterError::Io {
        message: format!("{}: {}", path.display(), e),
    })
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
