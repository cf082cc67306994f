//! wordcluster CLI
//!
//! Clusters the most frequent words of a `word/TAG` corpus by their
//! left/right contexts, writes the dendrogram as SVG and prints how well
//! the clusters match the words' dominant part-of-speech tags.
//!
//! ```text
//! wordcluster true 200 100 0.4 cosine tree.svg --corpus brown.txt
//! ```

use clap::builder::BoolishValueParser;
use clap::Parser;
use rapid_wordcluster::{
    run_pipeline, ClusterConfig, DistanceMetric, LinkageMethod, Result, TaggedCorpusFile,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

/// Distributional word clustering
#[derive(Parser, Debug)]
#[command(name = "wordcluster")]
#[command(version)]
#[command(about = "Cluster words by context and score the clusters against POS tags")]
struct Cli {
    /// Map corpus tags onto the universal tagset (true/false)
    #[arg(value_parser = BoolishValueParser::new())]
    use_universal: bool,

    /// Number of most frequent words to cluster
    k_tree: usize,

    /// Number of most frequent words used as context
    k_context: usize,

    /// Fraction of the largest join distance to cut the tree at
    cutoff: f64,

    /// Distance metric: euclidean, manhattan, cosine or kl
    metric: String,

    /// Where to write the SVG dendrogram
    output_svg: PathBuf,

    /// Tagged corpus, one sentence per line, tokens written word/TAG
    #[arg(long)]
    corpus: PathBuf,

    /// Linkage criterion: single, complete, average or weighted
    #[arg(long)]
    linkage: Option<String>,

    /// Number of row/column partitions for the distance matrix
    #[arg(long)]
    splits: Option<usize>,

    /// JSON config supplying defaults for anything not given on the command line
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full report as JSON instead of the score line
    #[arg(long)]
    json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn to_config(&self) -> Result<ClusterConfig> {
        let base = match &self.config {
            Some(path) => ClusterConfig::from_json_str(&std::fs::read_to_string(path)?)?,
            None => ClusterConfig::default(),
        };

        let metric: DistanceMetric = self.metric.parse()?;
        let mut config = base
            .with_universal_tagset(self.use_universal)
            .with_cluster_vocab_size(self.k_tree)
            .with_context_vocab_size(self.k_context)
            .with_cutoff_fraction(self.cutoff)
            .with_metric(metric);
        if let Some(name) = &self.linkage {
            config = config.with_linkage(name.parse::<LinkageMethod>()?);
        }
        if let Some(splits) = self.splits {
            config = config.with_num_splits(splits);
        }
        config.validate()?;
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.to_config()?;
    let source = TaggedCorpusFile::new(&cli.corpus);
    let report = run_pipeline(&config, &source, Some(&cli.output_svg))?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.score_line());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "wordcluster failed");
            eprintln!("error: {}", e);
            if e.is_config_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
