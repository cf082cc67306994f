//! Pairwise distance matrix construction
//!
//! The `n x n` index space is cut into a grid of blocks by evenly dividing
//! `n` into `num_splits` ranges. Only blocks on or below the diagonal are
//! scheduled; each computes the cells `(i, j)` with `j < i` inside its
//! ranges and the mirror `(j, i)` is filled from the same value. No two
//! blocks share a cell, so workers run without synchronization and write
//! into private buffers that are scattered into the matrix once every
//! worker has finished.

use crate::context::WordTypes;
use crate::distance::DistanceMetric;
use crate::errors::{Result, WordClusterError};
use rayon::prelude::*;
use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, info};

/// A dense, symmetric, zero-diagonal distance matrix
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Create an `n x n` matrix of zeros
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Rebuild a square matrix from its condensed (upper-triangular) form
    pub fn from_condensed(condensed: &[f64], n: usize) -> Result<Self> {
        if condensed.len() != n * n.saturating_sub(1) / 2 {
            return Err(WordClusterError::invalid_input(format!(
                "condensed vector of length {} does not describe {} points",
                condensed.len(),
                n
            )));
        }
        let mut matrix = Self::zeros(n);
        let mut k = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                matrix.set_pair(i, j, condensed[k]);
                k += 1;
            }
        }
        Ok(matrix)
    }

    /// Number of rows (and columns)
    pub fn len(&self) -> usize {
        self.n
    }

    /// Check if the matrix has no rows
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between items `i` and `j`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// One row of the matrix
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    fn set_pair(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
        self.data[j * self.n + i] = value;
    }

    /// Upper triangle without the diagonal, row by row (the linkage input)
    pub fn to_condensed(&self) -> Vec<f64> {
        let mut condensed = Vec::with_capacity(self.n * self.n.saturating_sub(1) / 2);
        for i in 0..self.n {
            condensed.extend_from_slice(&self.row(i)[i + 1..]);
        }
        condensed
    }

    /// Largest entry (0 for empty or single-item matrices)
    pub fn max_value(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    /// Check symmetry and the zero diagonal exactly
    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| {
            self.get(i, i) == 0.0 && (0..i).all(|j| self.get(i, j) == self.get(j, i))
        })
    }
}

/// Split `0..n` into `num_splits` contiguous ranges.
///
/// Returns `num_splits + 1` boundaries; the remainder of `n / num_splits`
/// goes one extra item each to the first ranges.
pub fn partition_bounds(n: usize, num_splits: usize) -> Vec<usize> {
    let num_splits = num_splits.max(1);
    let (q, r) = (n / num_splits, n % num_splits);
    (0..=num_splits).map(|i| q * i + i.min(r)).collect()
}

/// One independently computable unit of the matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Position in the schedule
    pub index: usize,
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl Block {
    /// Cells `(i, j)` owned by this block, strictly below the diagonal
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.clone().flat_map(move |i| {
            self.cols
                .clone()
                .take_while(move |&j| j < i)
                .map(move |j| (i, j))
        })
    }
}

/// All blocks on or below the diagonal of the partition grid
pub fn schedule_blocks(n: usize, num_splits: usize) -> Vec<Block> {
    let bounds = partition_bounds(n, num_splits);
    let splits = bounds.len() - 1;
    let mut blocks = Vec::with_capacity(splits * (splits + 1) / 2);
    for bi in 0..splits {
        for bj in 0..=bi {
            blocks.push(Block {
                index: blocks.len(),
                rows: bounds[bi]..bounds[bi + 1],
                cols: bounds[bj]..bounds[bj + 1],
            });
        }
    }
    blocks
}

/// Builds distance matrices over context vectors
#[derive(Debug, Clone, Copy)]
pub struct MatrixBuilder {
    metric: DistanceMetric,
    num_splits: usize,
}

impl MatrixBuilder {
    /// Create a builder for the given metric with 8 partitions
    pub fn new(metric: DistanceMetric) -> Self {
        Self {
            metric,
            num_splits: 8,
        }
    }

    /// Set the partition count (also the worker thread count)
    pub fn with_num_splits(mut self, num_splits: usize) -> Self {
        self.num_splits = num_splits;
        self
    }

    /// Matrix over the context vectors of `words`, in list order.
    ///
    /// Every word must have a word type; a missing one is reported before
    /// any distance is computed.
    pub fn build<S: AsRef<str>>(&self, word_types: &WordTypes, words: &[S]) -> Result<DistanceMatrix> {
        let vectors = context_vectors(word_types, words)?;
        self.build_from_vectors(&vectors)
    }

    /// Block-parallel computation over raw context vectors
    pub fn build_from_vectors(&self, vectors: &[&[u32]]) -> Result<DistanceMatrix> {
        if self.num_splits == 0 {
            return Err(WordClusterError::invalid_config("num_splits must be > 0"));
        }

        let n = vectors.len();
        let blocks = schedule_blocks(n, self.num_splits);
        let metric = self.metric;
        let start = Instant::now();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_splits)
            .build()
            .map_err(|e| WordClusterError::worker_failed(0, e.to_string()))?;

        let results: Vec<Result<Vec<f64>>> = pool.install(|| {
            blocks
                .par_iter()
                .map(|block| {
                    panic::catch_unwind(AssertUnwindSafe(|| {
                        compute_block(block, vectors, metric)
                    }))
                    .map_err(|payload| {
                        WordClusterError::worker_failed(block.index, panic_message(&*payload))
                    })
                })
                .collect()
        });

        // Every worker has joined here; any failure discards the whole matrix.
        let mut matrix = DistanceMatrix::zeros(n);
        for (block, cells) in blocks.iter().zip(results) {
            let cells = cells?;
            for ((i, j), value) in block.cells().zip(cells) {
                matrix.set_pair(i, j, value);
            }
        }

        info!(
            words = n,
            blocks = blocks.len(),
            metric = %metric,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "distance matrix built"
        );
        Ok(matrix)
    }

    /// Naive double loop, used as the reference for the block decomposition
    pub fn build_sequential(&self, vectors: &[&[u32]]) -> DistanceMatrix {
        let n = vectors.len();
        let mut matrix = DistanceMatrix::zeros(n);
        for i in 0..n {
            for j in 0..i {
                matrix.set_pair(i, j, self.metric.distance(vectors[i], vectors[j]));
            }
        }
        matrix
    }
}

/// Collect the context vectors of `words`, failing on the first unknown word
pub fn context_vectors<'a, S: AsRef<str>>(
    word_types: &'a WordTypes,
    words: &[S],
) -> Result<Vec<&'a [u32]>> {
    words
        .iter()
        .map(|w| {
            word_types
                .require(w.as_ref())
                .map(|t| t.context_vector.as_slice())
        })
        .collect()
}

fn compute_block(block: &Block, vectors: &[&[u32]], metric: DistanceMetric) -> Vec<f64> {
    let start = Instant::now();
    let cells: Vec<f64> = block
        .cells()
        .map(|(i, j)| metric.distance(vectors[i], vectors[j]))
        .collect();
    debug!(
        block = block.index,
        rows = ?block.rows,
        cols = ?block.cols,
        cells = cells.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "block computed"
    );
    cells
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "worker panicked".to_string()
    }
}
