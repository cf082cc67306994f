//! Benchmarks for rapid_wordcluster

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rapid_wordcluster::*;

/// Deterministic pseudo-random context vectors
fn context_vectors(n: usize, len: usize) -> Vec<Vec<u32>> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    (0..n)
        .map(|_| {
            (0..len)
                .map(|_| {
                    state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                    let r = (state >> 33) as u32;
                    // Mostly sparse, like real context counts
                    if r % 4 == 0 {
                        r % 50
                    } else {
                        0
                    }
                })
                .collect()
        })
        .collect()
}

fn tagged_corpus(sentences: usize) -> Corpus {
    const DETS: [&str; 3] = ["the", "a", "this"];
    const NOUNS: [&str; 10] = [
        "cat", "dog", "house", "tree", "river", "city", "child", "road", "stone", "ship",
    ];
    const VERBS: [&str; 8] = ["saw", "found", "left", "kept", "met", "built", "heard", "liked"];
    const ADJS: [&str; 5] = ["big", "old", "red", "cold", "quiet"];

    let sents: Vec<Vec<(&str, &str)>> = (0..sentences)
        .map(|i| {
            vec![
                (DETS[i % 3], "DET"),
                (ADJS[(i * 3) % 5], "ADJ"),
                (NOUNS[(i * 7) % 10], "NOUN"),
                (VERBS[(i * 3) % 8], "VERB"),
                (DETS[(i + 1) % 3], "DET"),
                (NOUNS[(i * 3 + 1) % 10], "NOUN"),
                (".", "."),
            ]
        })
        .collect();
    Corpus::from_pairs(&sents)
}

fn benchmark_metrics(c: &mut Criterion) {
    let vectors = context_vectors(2, 400);
    let (w, v) = (&vectors[0], &vectors[1]);

    let mut group = c.benchmark_group("metric");
    for metric in DistanceMetric::ALL {
        group.bench_function(metric.as_str(), |b| {
            b.iter(|| metric.distance(black_box(w), black_box(v)))
        });
    }
    group.finish();
}

fn benchmark_matrix(c: &mut Criterion) {
    let vectors = context_vectors(300, 200);
    let refs: Vec<&[u32]> = vectors.iter().map(Vec::as_slice).collect();
    let builder = MatrixBuilder::new(DistanceMetric::Cosine);

    let mut group = c.benchmark_group("distance_matrix");
    group.throughput(Throughput::Elements((refs.len() * (refs.len() - 1) / 2) as u64));
    group.bench_function("sequential", |b| {
        b.iter(|| builder.build_sequential(black_box(&refs)))
    });
    for splits in [1, 2, 4, 8, 16] {
        let builder = builder.with_num_splits(splits);
        group.bench_with_input(BenchmarkId::new("parallel", splits), &refs, |b, refs| {
            b.iter(|| builder.build_from_vectors(black_box(refs)))
        });
    }
    group.finish();
}

fn benchmark_linkage(c: &mut Criterion) {
    let vectors = context_vectors(150, 100);
    let refs: Vec<&[u32]> = vectors.iter().map(Vec::as_slice).collect();
    let matrix = MatrixBuilder::new(DistanceMetric::Euclidean).build_sequential(&refs);

    let mut group = c.benchmark_group("linkage");
    for method in [
        LinkageMethod::Single,
        LinkageMethod::Complete,
        LinkageMethod::Average,
        LinkageMethod::Weighted,
    ] {
        group.bench_function(method.as_str(), |b| {
            b.iter(|| build_tree(black_box(&matrix), method))
        });
    }
    group.finish();
}

fn benchmark_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    group.sample_size(20);
    for size in [100, 500, 2000] {
        let corpus = tagged_corpus(size);
        group.throughput(Throughput::Elements(corpus.num_tokens() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &corpus, |b, corpus| {
            b.iter(|| cluster_corpus(black_box(&ClusterConfig::new()), black_box(corpus)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_metrics,
    benchmark_matrix,
    benchmark_linkage,
    benchmark_full_pipeline
);
criterion_main!(benches);
