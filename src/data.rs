//! Data
//!
//! Column-oriented categorical datasets and the tab-separated loader that builds them.
use crate::constants::DELIMITER;
use crate::errors::TreeError;
use hashbrown::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Anything that can answer "what is the value of this attribute".
/// Prediction is generic over this so a borrowed dataset row and an
/// owned map can both be routed through a tree.
pub trait AttributeSource {
    fn value(&self, attribute: &str) -> Option<&str>;
}

impl AttributeSource for HashMap<String, String> {
    fn value(&self, attribute: &str) -> Option<&str> {
        self.get(attribute).map(String::as_str)
    }
}

impl AttributeSource for std::collections::HashMap<String, String> {
    fn value(&self, attribute: &str) -> Option<&str> {
        self.get(attribute).map(String::as_str)
    }
}

/// A categorical dataset: named attribute columns plus an aligned label column.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    attributes: Vec<String>,
    columns: Vec<Vec<String>>,
    label_name: String,
    labels: Vec<String>,
}

/// A borrowed view of one row of a [`Dataset`].
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    data: &'a Dataset,
    row: usize,
}

impl<'a> AttributeSource for RowView<'a> {
    fn value(&self, attribute: &str) -> Option<&str> {
        self.data.column(attribute).map(|c| c[self.row].as_str())
    }
}

impl<'a> RowView<'a> {
    /// The true label of this row.
    pub fn label(&self) -> &'a str {
        &self.data.labels[self.row]
    }

    /// Copy the row out into an owned attribute map.
    pub fn to_map(&self) -> HashMap<String, String> {
        self.data
            .attributes
            .iter()
            .zip(self.data.columns.iter())
            .map(|(a, c)| (a.clone(), c[self.row].clone()))
            .collect()
    }
}

/// Column indices `(first, repeat)` of the first attribute name that appears twice.
fn first_duplicate(attributes: &[String]) -> Option<(usize, usize)> {
    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(attributes.len());
    for (i, name) in attributes.iter().enumerate() {
        if let Some(first) = seen.insert(name.as_str(), i) {
            return Some((first, i));
        }
    }
    None
}

impl Dataset {
    /// Create a dataset, checking that every column is aligned with the labels
    /// and that attribute names are unique.
    ///
    /// * `attributes` - Attribute names, in column order.
    /// * `columns` - One column of values per attribute.
    /// * `label_name` - Name of the label column.
    /// * `labels` - Label of every row.
    pub fn new(
        attributes: Vec<String>,
        columns: Vec<Vec<String>>,
        label_name: String,
        labels: Vec<String>,
    ) -> Result<Self, TreeError> {
        if attributes.len() != columns.len() {
            return Err(TreeError::Format(
                "dataset".to_string(),
                format!("{} attribute names for {} columns", attributes.len(), columns.len()),
            ));
        }
        if let Some((first, i)) = first_duplicate(&attributes) {
            return Err(TreeError::Format(
                "dataset".to_string(),
                format!("attribute {} appears in columns {} and {}", attributes[i], first, i),
            ));
        }
        for (name, column) in attributes.iter().zip(columns.iter()) {
            if column.len() != labels.len() {
                return Err(TreeError::Format(
                    "dataset".to_string(),
                    format!(
                        "attribute {} has {} values but there are {} labels",
                        name,
                        column.len(),
                        labels.len()
                    ),
                ));
            }
        }
        Ok(Dataset {
            attributes,
            columns,
            label_name,
            labels,
        })
    }

    /// Build a dataset from `(attribute, column)` pairs.
    pub fn from_columns<S: Into<String>>(
        columns: Vec<(S, Vec<S>)>,
        label_name: S,
        labels: Vec<S>,
    ) -> Result<Self, TreeError> {
        let (attributes, columns): (Vec<String>, Vec<Vec<String>>) = columns
            .into_iter()
            .map(|(a, c)| (a.into(), c.into_iter().map(Into::into).collect()))
            .unzip();
        Dataset::new(
            attributes,
            columns,
            label_name.into(),
            labels.into_iter().map(Into::into).collect(),
        )
    }

    /// Load a tab-separated file. The first row is the header and its last
    /// column names the label.
    pub fn from_tsv_path<P: AsRef<Path>>(path: P) -> Result<Self, TreeError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TreeError::UnableToRead(format!("{}: {}", path.display(), e)))?;
        Dataset::from_tsv_reader(file, &path.display().to_string())
    }

    /// Load tab-separated text from any reader. `source` names the input in errors.
    pub fn from_tsv_reader<R: Read>(reader: R, source: &str) -> Result<Self, TreeError> {
        let format_err = |msg: String| TreeError::Format(source.to_string(), msg);

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = csv_reader.records();
        let header = match records.next() {
            Some(record) => record.map_err(|e| format_err(e.to_string()))?,
            None => return Err(format_err("no header row".to_string())),
        };
        let width = header.len();
        if width == 0 {
            return Err(format_err("empty header row".to_string()));
        }

        let mut columns: Vec<Vec<String>> = vec![Vec::new(); width - 1];
        let mut labels = Vec::new();
        for (i, record) in records.enumerate() {
            let record = record.map_err(|e| format_err(e.to_string()))?;
            if record.len() != width {
                // Header is line 1; blank lines are skipped by the reader.
                let line = record.position().map_or(i as u64 + 2, |p| p.line());
                return Err(format_err(format!(
                    "line {} has {} columns, expected {}",
                    line,
                    record.len(),
                    width
                )));
            }
            for (column, value) in columns.iter_mut().zip(record.iter()) {
                column.push(value.to_string());
            }
            labels.push(record[width - 1].to_string());
        }
        if labels.is_empty() {
            return Err(format_err("no data rows after the header".to_string()));
        }

        let attributes = header.iter().take(width - 1).map(str::to_string).collect();
        Dataset::new(attributes, columns, header[width - 1].to_string(), labels)
            .map_err(|e| match e {
                TreeError::Format(_, msg) => format_err(msg),
                other => other,
            })
    }

    pub fn n_rows(&self) -> usize {
        self.labels.len()
    }

    pub fn n_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Attribute names in column order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn label_name(&self) -> &str {
        &self.label_name
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Values of the named attribute, if present.
    pub fn column(&self, attribute: &str) -> Option<&[String]> {
        self.attributes
            .iter()
            .position(|a| a == attribute)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn row(&self, row: usize) -> RowView<'_> {
        RowView { data: self, row }
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> + '_ {
        (0..self.n_rows()).map(move |row| self.row(row))
    }

    /// Group row indices by the value of the attribute at `index`,
    /// values in the order they are first encountered.
    pub fn value_groups(&self, index: usize) -> Vec<(&str, Vec<usize>)> {
        let mut position: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
        for (row, value) in self.columns[index].iter().enumerate() {
            match position.get(value.as_str()) {
                Some(&g) => groups[g].1.push(row),
                None => {
                    position.insert(value.as_str(), groups.len());
                    groups.push((value.as_str(), vec![row]));
                }
            }
        }
        groups
    }

    /// Split the dataset into one subset per distinct value of the attribute at
    /// `index`. The attribute column is removed from each subset.
    pub fn partition(&self, index: usize) -> Vec<(String, Dataset)> {
        self.value_groups(index)
            .into_iter()
            .map(|(value, rows)| (value.to_string(), self.select(&rows, Some(index))))
            .collect()
    }

    /// Take the given rows, optionally dropping one column.
    fn select(&self, rows: &[usize], drop: Option<usize>) -> Dataset {
        let keep = |i: &usize| Some(*i) != drop;
        let attributes = (0..self.attributes.len())
            .filter(keep)
            .map(|i| self.attributes[i].clone())
            .collect();
        let columns = (0..self.columns.len())
            .filter(keep)
            .map(|i| rows.iter().map(|&r| self.columns[i][r].clone()).collect())
            .collect();
        Dataset {
            attributes,
            columns,
            label_name: self.label_name.clone(),
            labels: rows.iter().map(|&r| self.labels[r].clone()).collect(),
        }
    }
}
