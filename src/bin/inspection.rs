//! Report the label entropy of a TSV file and the error of always
//! predicting its majority label.
use clap::Parser;
use infotree::data::Dataset;
use infotree::errors::TreeError;
use infotree::metric::LabelSummary;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Parser)]
#[command(name = "inspection", about = "Label entropy and majority-vote error of a dataset")]
struct Args {
    /// Path to the input .tsv file.
    input: PathBuf,
    /// Path of the file the statistics are written to.
    output: PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run_cli(&args) {
        eprintln!("inspection: {}", e);
        process::exit(1);
    }
}

fn run_cli(args: &Args) -> Result<(), TreeError> {
    let data = Dataset::from_tsv_path(&args.input)?;
    let summary = LabelSummary::from_labels(data.labels())?;
    info!("{}: entropy {:.4}, error {:.4}", args.input.display(), summary.entropy, summary.error);
    fs::write(&args.output, summary.report())
        .map_err(|e| TreeError::UnableToWrite(format!("{}: {}", args.output.display(), e)))?;
    Ok(())
}
