//! Pipeline runner: corpus in, scored partition (and optionally a
//! dendrogram) out.
//!
//! Stages run strictly in order. Each one is wrapped in a tracing span and
//! timed; the word-type accumulation pass finishes before the parallel
//! distance phase starts and is read-only from then on.

use crate::clustering::{build_tree, extract_clusters, filter_clusters, ClusterForest, Partition};
use crate::context::WordTypes;
use crate::dendrogram::write_dendrogram;
use crate::errors::Result;
use crate::evaluation::{to_label_sequences, ClusterScores};
use crate::matrix::{DistanceMatrix, MatrixBuilder};
use crate::nlp::corpus::CorpusSource;
use crate::pipeline::report::{PipelineReport, StageClock, StageTiming};
use crate::types::{ClusterConfig, Corpus};
use crate::vocab::{build_top_k_list, ContextIndex};
use std::path::Path;
use tracing::{debug, info};

pub const STAGE_LOAD: &str = "load";
pub const STAGE_VOCAB: &str = "vocab";
pub const STAGE_CONTEXT: &str = "context";
pub const STAGE_MATRIX: &str = "matrix";
pub const STAGE_LINKAGE: &str = "linkage";
pub const STAGE_FILTER: &str = "filter";
pub const STAGE_EVALUATE: &str = "evaluate";
pub const STAGE_DENDROGRAM: &str = "dendrogram";

/// Enter a tracing span for a pipeline stage until the end of the block
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

/// Intermediate artifacts of a clustering run over an in-memory corpus
#[derive(Debug, Clone)]
pub struct ClusterRun {
    pub words: Vec<String>,
    pub word_types: WordTypes,
    pub context_index: ContextIndex,
    pub matrix: DistanceMatrix,
    pub forest: ClusterForest,
    pub partition: Partition,
    pub scores: ClusterScores,
    pub timings: Vec<StageTiming>,
}

/// Run the whole pipeline.
///
/// The configuration is validated before the corpus is touched, so a bad
/// metric or cutoff never costs a corpus read. When `output` is given the
/// dendrogram is written there as SVG.
pub fn run_pipeline(
    config: &ClusterConfig,
    source: &dyn CorpusSource,
    output: Option<&Path>,
) -> Result<PipelineReport> {
    config.validate()?;

    let (corpus, load_timing) = {
        trace_stage!(STAGE_LOAD);
        let clock = StageClock::start();
        let corpus = source.load(config.use_universal_tagset)?;
        info!(
            sentences = corpus.len(),
            tokens = corpus.num_tokens(),
            "corpus ready"
        );
        (corpus, clock.finish(STAGE_LOAD))
    };

    let mut run = cluster_corpus(config, &corpus)?;
    run.timings.insert(0, load_timing);

    if let Some(path) = output {
        trace_stage!(STAGE_DENDROGRAM);
        let clock = StageClock::start();
        let title = format!(
            "{} / {} linkage, cutoff {}",
            config.metric, config.linkage, config.cutoff_fraction
        );
        write_dendrogram(path, &run.forest, &run.partition, &run.words, &title)?;
        info!(path = %path.display(), "dendrogram written");
        run.timings.push(clock.finish(STAGE_DENDROGRAM));
    }

    let max_join_distance = run.forest.max_join_distance();
    Ok(PipelineReport::new(
        config,
        run.words,
        &run.partition,
        max_join_distance,
        run.scores,
        run.timings,
    ))
}

/// Pipeline driver taking the metric by name, as the command line does.
///
/// An unknown metric name fails before `source` is read.
pub fn run_with_metric_name(
    source: &dyn CorpusSource,
    use_universal_tagset: bool,
    cluster_vocab_size: usize,
    context_vocab_size: usize,
    cutoff_fraction: f64,
    metric_name: &str,
    output: Option<&Path>,
) -> Result<PipelineReport> {
    let config = ClusterConfig::new()
        .with_universal_tagset(use_universal_tagset)
        .with_cluster_vocab_size(cluster_vocab_size)
        .with_context_vocab_size(context_vocab_size)
        .with_cutoff_fraction(cutoff_fraction)
        .with_metric_name(metric_name)?;
    run_pipeline(&config, source, output)
}

/// Cluster an already loaded corpus
pub fn cluster_corpus(config: &ClusterConfig, corpus: &Corpus) -> Result<ClusterRun> {
    config.validate()?;
    let mut timings = Vec::new();
    let plain = corpus.plain_sentences();

    let (context_words, words) = {
        trace_stage!(STAGE_VOCAB);
        let clock = StageClock::start();
        let context_words = build_top_k_list(&plain, config.context_vocab_size, true);
        let words = build_top_k_list(&plain, config.cluster_vocab_size, false);
        debug!(
            context_words = context_words.len(),
            cluster_words = words.len(),
            "vocabularies selected"
        );
        timings.push(clock.finish(STAGE_VOCAB));
        (context_words, words)
    };

    let (context_index, word_types) = {
        trace_stage!(STAGE_CONTEXT);
        let clock = StageClock::start();
        let index = ContextIndex::build(&context_words);
        let word_types = WordTypes::from_corpus(corpus, &index)?;
        info!(
            word_types = word_types.len(),
            vector_len = word_types.vector_len(),
            "context vectors populated"
        );
        timings.push(clock.finish(STAGE_CONTEXT));
        (index, word_types)
    };

    let matrix = {
        trace_stage!(STAGE_MATRIX);
        let clock = StageClock::start();
        let matrix = MatrixBuilder::new(config.metric)
            .with_num_splits(config.num_splits)
            .build(&word_types, &words)?;
        timings.push(clock.finish(STAGE_MATRIX));
        matrix
    };

    let forest = {
        trace_stage!(STAGE_LINKAGE);
        let clock = StageClock::start();
        let joins = build_tree(&matrix, config.linkage)?;
        let forest = extract_clusters(&joins, words.len())?;
        info!(
            joins = joins.len(),
            max_distance = forest.max_join_distance(),
            "tree built"
        );
        timings.push(clock.finish(STAGE_LINKAGE));
        forest
    };

    let partition = {
        trace_stage!(STAGE_FILTER);
        let clock = StageClock::start();
        let partition = filter_clusters(&forest, config.cutoff_fraction)?;
        info!(
            threshold = partition.threshold,
            clusters = partition.len(),
            "partition selected"
        );
        timings.push(clock.finish(STAGE_FILTER));
        partition
    };

    let scores = {
        trace_stage!(STAGE_EVALUATE);
        let clock = StageClock::start();
        let labels = to_label_sequences(&partition, &words, &word_types)?;
        let scores = ClusterScores::compute(&labels, config.v_measure_beta)?;
        info!(
            homogeneity = scores.homogeneity,
            completeness = scores.completeness,
            v_measure = scores.v_measure,
            "clusters scored"
        );
        timings.push(clock.finish(STAGE_EVALUATE));
        scores
    };

    Ok(ClusterRun {
        words,
        word_types,
        context_index,
        matrix,
        forest,
        partition,
        scores,
        timings,
    })
}
