//! Pipeline orchestration and run reports.
//!
//! ## Submodules
//!
//! - [`runner`]: stage sequencing from corpus to scored partition
//! - [`report`]: serializable [`PipelineReport`] and stage timings

pub mod report;
pub mod runner;

pub use report::{ClusterSummary, PipelineReport, StageClock, StageTiming};
pub use runner::{cluster_corpus, run_pipeline, run_with_metric_name, ClusterRun};
