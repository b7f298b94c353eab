//! Splitter
//!
//! Information-theoretic scoring of candidate split attributes.
use crate::data::Dataset;
use crate::histogram::LabelHistogram;

/// The attribute chosen to split a node on.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitInfo {
    /// Column index of the attribute in the node's dataset.
    pub split_feature: usize,
    pub attribute: String,
    /// Mutual information between the attribute and the labels.
    pub split_gain: f64,
}

/// Chooses which attribute, if any, a node should split on.
pub trait Splitter: Sync {
    /// Score of splitting `data` on the attribute at column `feature`.
    fn gain(&self, data: &Dataset, feature: usize) -> f64;

    /// Best attribute by `gain`, ties resolved towards the lower column index.
    /// `None` when there are no attributes to split on.
    fn best_split(&self, data: &Dataset) -> Option<SplitInfo> {
        let mut best: Option<SplitInfo> = None;
        for feature in 0..data.n_attributes() {
            let gain = self.gain(data, feature);
            if best.as_ref().map_or(true, |b| gain > b.split_gain) {
                best = Some(SplitInfo {
                    split_feature: feature,
                    attribute: data.attributes()[feature].clone(),
                    split_gain: gain,
                });
            }
        }
        best
    }
}

/// Splits on the attribute with the highest mutual information with the labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct MutualInformationSplitter;

impl Splitter for MutualInformationSplitter {
    fn gain(&self, data: &Dataset, feature: usize) -> f64 {
        mutual_information(data, feature)
    }
}

/// Entropy of the labels of `data`.
pub fn label_entropy(data: &Dataset) -> f64 {
    LabelHistogram::from_labels(data.labels().iter().map(String::as_str)).entropy()
}

/// Entropy of the labels given the attribute at `feature`: label entropy of every
/// value group, weighted by the share of rows in that group.
pub fn conditional_entropy(data: &Dataset, feature: usize) -> f64 {
    let n = data.n_rows();
    if n == 0 {
        return 0.0;
    }
    let labels = data.labels();
    data.value_groups(feature)
        .iter()
        .map(|(_, rows)| {
            let ratio = rows.len() as f64 / n as f64;
            ratio * LabelHistogram::from_indices(labels, rows).entropy()
        })
        .sum()
}

/// Information gain of the attribute at `feature`. Clamped at zero since
/// rounding can leave an independent attribute a hair below it.
pub fn mutual_information(data: &Dataset, feature: usize) -> f64 {
    (label_entropy(data) - conditional_entropy(data, feature)).max(0.0)
}
