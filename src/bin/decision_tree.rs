//! Train a decision tree on one TSV file, evaluate it on another and write
//! predictions, error metrics and the printed tree.
//!
//! `decision_tree train.tsv test.tsv 3 train.labels test.labels metrics.txt tree.txt`
use clap::Parser;
use infotree::config::{ConfigIO, TreeConfig};
use infotree::driver::{run, RunPaths};
use infotree::errors::TreeError;
use infotree::utils::parse_max_depth;
use log::info;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Parser)]
#[command(name = "decision_tree", about = "Grow a decision tree by mutual information and report its error")]
struct Args {
    /// Path to the training input .tsv file.
    train_input: PathBuf,
    /// Path to the test input .tsv file.
    test_input: PathBuf,
    /// Maximum depth to which the tree should be built.
    #[arg(allow_negative_numbers = true)]
    max_depth: String,
    /// Path of the file the training set predictions are written to.
    train_out: PathBuf,
    /// Path of the file the test set predictions are written to.
    test_out: PathBuf,
    /// Path of the file the train and test error are written to.
    metrics_out: PathBuf,
    /// Path of the file the printed tree is written to.
    print_out: PathBuf,
    /// JSON tree configuration; positional and flag values override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Grow subtrees and predict rows on a thread pool.
    #[arg(long)]
    parallel: bool,
    /// Number of threads used with --parallel.
    #[arg(long)]
    num_threads: Option<usize>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run_cli(args) {
        eprintln!("decision_tree: {}", e);
        process::exit(1);
    }
}

fn run_cli(args: Args) -> Result<(), TreeError> {
    let mut config = match &args.config {
        Some(path) => TreeConfig::load_config(path)?,
        None => TreeConfig::default(),
    };
    config = config.set_max_depth(parse_max_depth(&args.max_depth)?);
    if args.parallel {
        config = config.set_parallel(true);
    }
    if args.num_threads.is_some() {
        config = config.set_num_threads(args.num_threads);
    }
    info!("Running with {:?}", config);

    let paths = RunPaths {
        train_input: args.train_input,
        test_input: args.test_input,
        train_out: args.train_out,
        test_out: args.test_out,
        metrics_out: args.metrics_out,
        print_out: args.print_out,
    };
    let report = run(&paths, config)?;
    print!("{}", report.tree_dump);
    Ok(())
}
