//! Driver
//!
//! Train on one file, score on another and write the reports. Every output
//! is computed and staged before any target file is replaced, so a failure
//! leaves none of the outputs behind.
use crate::config::TreeConfig;
use crate::data::Dataset;
use crate::errors::TreeError;
use crate::metric::error_rate;
use crate::tree::DecisionTree;
use crate::utils::fmt_vec_output;
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Input and output locations for one run.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub train_input: PathBuf,
    pub test_input: PathBuf,
    pub train_out: PathBuf,
    pub test_out: PathBuf,
    pub metrics_out: PathBuf,
    pub print_out: PathBuf,
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub train_predictions: Vec<String>,
    pub test_predictions: Vec<String>,
    pub train_error: f64,
    pub test_error: f64,
    pub tree_dump: String,
}

impl RunReport {
    /// `error(train): <float>` and `error(test): <float>` lines.
    pub fn metrics(&self) -> String {
        format!("error(train): {:?}\nerror(test): {:?}\n", self.train_error, self.test_error)
    }

    /// Write all four outputs. Each one is staged in a temporary file next to
    /// its target and only moved into place once every output is staged.
    pub fn write(&self, paths: &RunPaths) -> Result<(), TreeError> {
        let outputs = [
            (&paths.train_out, format!("{}\n", fmt_vec_output(&self.train_predictions))),
            (&paths.test_out, format!("{}\n", fmt_vec_output(&self.test_predictions))),
            (&paths.metrics_out, self.metrics()),
            (&paths.print_out, self.tree_dump.clone()),
        ];
        let mut staged = Vec::with_capacity(outputs.len());
        for (path, contents) in outputs.iter() {
            staged.push((stage(path, contents)?, *path));
        }
        for (file, path) in staged {
            file.persist(path)
                .map_err(|e| TreeError::UnableToWrite(format!("{}: {}", path.display(), e.error)))?;
        }
        Ok(())
    }
}

fn stage(path: &Path, contents: &str) -> Result<NamedTempFile, TreeError> {
    let unable = |e: std::io::Error| TreeError::UnableToWrite(format!("{}: {}", path.display(), e));
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(unable)?;
    file.write_all(contents.as_bytes()).map_err(unable)?;
    Ok(file)
}

/// Fit on `train`, then predict and score both datasets.
pub fn evaluate(config: TreeConfig, train: &Dataset, test: &Dataset) -> Result<RunReport, TreeError> {
    let mut tree = DecisionTree::new(config);
    tree.fit(train)?;

    let train_predictions = tree.predict(train)?;
    let train_error = error_rate(&train_predictions, train.labels())?;
    let test_predictions = tree.predict(test)?;
    let test_error = error_rate(&test_predictions, test.labels())?;
    info!("error(train): {:.4}, error(test): {:.4}", train_error, test_error);

    Ok(RunReport {
        train_predictions,
        test_predictions,
        train_error,
        test_error,
        tree_dump: tree.dump()?,
    })
}

/// Load both inputs, evaluate, then write all four outputs.
pub fn run(paths: &RunPaths, config: TreeConfig) -> Result<RunReport, TreeError> {
    config.validate()?;
    let train = Dataset::from_tsv_path(&paths.train_input)?;
    let test = Dataset::from_tsv_path(&paths.test_input)?;
    let report = evaluate(config, &train, &test)?;
    report.write(paths)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    const TRAIN: &str = "Weather\tWind\tPlay\n\
                         Sunny\tWeak\tPlay\n\
                         Sunny\tStrong\tPlay\n\
                         Rainy\tWeak\tNoPlay\n\
                         Rainy\tStrong\tNoPlay\n\
                         Sunny\tWeak\tNoPlay\n";
    const TEST: &str = "Weather\tWind\tPlay\n\
                        Sunny\tWeak\tPlay\n\
                        Foggy\tWeak\tPlay\n\
                        Rainy\tStrong\tNoPlay\n";

    fn setup(train: &str, test: &str) -> (TempDir, RunPaths) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("train.tsv"), train).unwrap();
        fs::write(dir.path().join("test.tsv"), test).unwrap();
        let paths = RunPaths {
            train_input: dir.path().join("train.tsv"),
            test_input: dir.path().join("test.tsv"),
            train_out: dir.path().join("train.labels"),
            test_out: dir.path().join("test.labels"),
            metrics_out: dir.path().join("metrics.txt"),
            print_out: dir.path().join("tree.txt"),
        };
        (dir, paths)
    }

    #[test]
    fn test_run_writes_outputs() {
        let (_dir, paths) = setup(TRAIN, TEST);
        let report = run(&paths, TreeConfig::default().set_max_depth(1)).unwrap();

        assert_eq!(report.train_error, 0.2);
        // Foggy is unseen and falls back to the root majority, NoPlay.
        assert_eq!(report.test_predictions, vec!["Play", "NoPlay", "NoPlay"]);
        assert_eq!(report.test_error, 1.0 / 3.0);

        assert_eq!(
            fs::read_to_string(&paths.train_out).unwrap(),
            "['Play', 'Play', 'NoPlay', 'NoPlay', 'Play']\n"
        );
        assert_eq!(
            fs::read_to_string(&paths.metrics_out).unwrap(),
            "error(train): 0.2\nerror(test): 0.3333333333333333\n"
        );
        let dump = fs::read_to_string(&paths.print_out).unwrap();
        assert_eq!(dump, report.tree_dump);
        assert!(dump.starts_with("[2 Play/3 NoPlay] root --> split on Weather\n"));
    }

    #[test]
    fn test_depth_zero_metrics() {
        let (_dir, paths) = setup(TRAIN, TEST);
        let report = run(&paths, TreeConfig::default().set_max_depth(0)).unwrap();
        assert!(report.train_predictions.iter().all(|p| p == "NoPlay"));
        assert_eq!(report.metrics(), "error(train): 0.4\nerror(test): 0.6666666666666666\n");
        assert_eq!(report.tree_dump, "[2 Play/3 NoPlay] root --> NoPlay\n");
    }

    #[test]
    fn test_bad_input_writes_nothing() {
        let (_dir, paths) = setup(TRAIN, "Weather\tWind\tPlay\nSunny\tPlay\n");
        assert!(matches!(
            run(&paths, TreeConfig::default()),
            Err(TreeError::Format(..))
        ));
        for out in [&paths.train_out, &paths.test_out, &paths.metrics_out, &paths.print_out] {
            assert!(!out.exists());
        }
    }

    #[test]
    fn test_weather_resources() {
        let resources = Path::new(env!("CARGO_MANIFEST_DIR")).join("resources");
        let train = Dataset::from_tsv_path(resources.join("weather_train.tsv")).unwrap();
        let test = Dataset::from_tsv_path(resources.join("weather_test.tsv")).unwrap();
        let report = evaluate(TreeConfig::default().set_max_depth(3), &train, &test).unwrap();
        // Three attributes are enough to separate every training row.
        assert_eq!(report.train_error, 0.0);
        assert_eq!(report.test_predictions.len(), 4);
        assert!((0.0..=1.0).contains(&report.test_error));
        assert!(report.tree_dump.starts_with("[4 NoPlay/6 Play] root --> split on "));
    }

    #[test]
    fn test_unwritable_output_writes_nothing() {
        let (dir, mut paths) = setup(TRAIN, TEST);
        paths.metrics_out = dir.path().join("missing_dir").join("metrics.txt");
        match run(&paths, TreeConfig::default().set_max_depth(1)) {
            Err(TreeError::UnableToWrite(msg)) => assert!(msg.contains("metrics.txt")),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(!paths.train_out.exists());
        assert!(!paths.test_out.exists());
        assert!(!paths.print_out.exists());
        // Staged files are cleaned up too.
        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["test.tsv", "train.tsv"]);
    }

    #[test]
    fn test_bad_config_writes_nothing() {
        let (_dir, paths) = setup(TRAIN, TEST);
        let config = TreeConfig::default().set_max_depth(usize::MAX);
        assert!(matches!(run(&paths, config), Err(TreeError::Config(..))));
        assert!(!paths.metrics_out.exists());
    }
}
