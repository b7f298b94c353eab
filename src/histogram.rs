//! Histogram
//!
//! Ordered label counts for a set of training rows. Labels keep the order in
//! which they were first encountered, which is what makes majority-vote
//! tie-breaking deterministic.
use hashbrown::HashMap;
use std::fmt;

/// Count of every distinct label in a subset, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelHistogram {
    bins: Vec<(String, usize)>,
    total: usize,
}

impl LabelHistogram {
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut position: HashMap<&'a str, usize> = HashMap::new();
        let mut bins: Vec<(String, usize)> = Vec::new();
        let mut total = 0;
        for label in labels {
            total += 1;
            match position.get(label) {
                Some(&i) => bins[i].1 += 1,
                None => {
                    position.insert(label, bins.len());
                    bins.push((label.to_string(), 1));
                }
            }
        }
        LabelHistogram { bins, total }
    }

    /// Build the histogram of the rows at `index` in `labels`.
    pub fn from_indices(labels: &[String], index: &[usize]) -> Self {
        LabelHistogram::from_labels(index.iter().map(|&i| labels[i].as_str()))
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// `(label, count)` pairs in first-seen order.
    pub fn bins(&self) -> &[(String, usize)] {
        &self.bins
    }

    pub fn count(&self, label: &str) -> usize {
        self.bins.iter().find(|(l, _)| l == label).map_or(0, |(_, c)| *c)
    }

    /// At most one distinct label.
    pub fn is_pure(&self) -> bool {
        self.bins.len() <= 1
    }

    /// Most frequent label. Ties go to the label encountered first.
    pub fn majority(&self) -> Option<&str> {
        let mut best: Option<&(String, usize)> = None;
        for bin in &self.bins {
            match best {
                Some((_, c)) if bin.1 <= *c => {}
                _ => best = Some(bin),
            }
        }
        best.map(|(l, _)| l.as_str())
    }

    /// Shannon entropy in bits, `-Σ p log2(p)` over observed labels.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        let mut entropy = 0.0;
        for (_, count) in &self.bins {
            let p = *count as f64 / total;
            entropy -= p * p.log2();
        }
        entropy
    }

    /// Error rate of always predicting the majority label.
    pub fn majority_error(&self) -> f64 {
        match self.bins.iter().map(|(_, c)| *c).max() {
            Some(max) => 1.0 - max as f64 / self.total as f64,
            None => 0.0,
        }
    }
}

impl fmt::Display for LabelHistogram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, (label, count)) in self.bins.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{} {}", count, label)?;
        }
        write!(f, "]")
    }
}
