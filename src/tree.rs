use crate::config::TreeConfig;
use crate::data::{AttributeSource, Dataset};
use crate::errors::TreeError;
use crate::node::{GrowParams, Node, Route};
use crate::splitter::{MutualInformationSplitter, Splitter};
use log::{info, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::fmt::{self, Display};

/// A categorical decision tree grown by mutual information.
#[derive(Debug, Clone)]
pub struct DecisionTree<S: Splitter = MutualInformationSplitter> {
    pub config: TreeConfig,
    splitter: S,
    root: Option<Node>,
    attributes: Vec<String>,
    label_name: String,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        DecisionTree::with_splitter(config, MutualInformationSplitter)
    }
}

impl<S: Splitter> DecisionTree<S> {
    /// Create an unfitted tree that picks splits with `splitter`.
    pub fn with_splitter(config: TreeConfig, splitter: S) -> Self {
        DecisionTree {
            config,
            splitter,
            root: None,
            attributes: Vec::new(),
            label_name: String::new(),
        }
    }

    /// Grow the tree on `data`. Any previously fitted tree is replaced.
    pub fn fit(&mut self, data: &Dataset) -> Result<(), TreeError> {
        self.config.validate()?;
        if data.is_empty() {
            return Err(TreeError::EmptyInput("a decision tree".to_string()));
        }
        info!(
            "Growing tree on {} rows and {} attributes, max depth {}.",
            data.n_rows(),
            data.n_attributes(),
            self.config.max_depth
        );

        let params = GrowParams {
            max_depth: self.config.max_depth,
            parallel: self.config.parallel,
            splitter: &self.splitter,
        };
        let root = if self.config.parallel {
            let pool = self.thread_pool()?;
            pool.install(|| Node::grow(data.clone(), 0, None, &params))
        } else {
            Node::grow(data.clone(), 0, None, &params)
        };
        info!(
            "Finished growing tree: depth {}, {} leaves, {} nodes.",
            root.depth_reached(),
            root.n_leaves(),
            root.n_nodes()
        );

        self.attributes = data.attributes().to_vec();
        self.label_name = data.label_name().to_string();
        self.root = Some(root);
        Ok(())
    }

    fn thread_pool(&self) -> Result<rayon::ThreadPool, TreeError> {
        let mut builder = ThreadPoolBuilder::new();
        if let Some(n) = self.config.num_threads {
            builder = builder.num_threads(n);
        }
        builder
            .build()
            .map_err(|e| TreeError::Config("num_threads".to_string(), "a buildable thread pool".to_string(), e.to_string()))
    }

    pub fn root(&self) -> Result<&Node, TreeError> {
        self.root.as_ref().ok_or(TreeError::NotFitted)
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    /// Attribute names seen during training, in column order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn label_name(&self) -> &str {
        &self.label_name
    }

    /// Predict the label of a single example, falling back to the majority
    /// vote of the deepest reachable node on unseen values.
    pub fn predict_row<'a, A: AttributeSource + ?Sized>(&'a self, example: &'a A) -> Result<&'a str, TreeError> {
        Ok(self.root()?.predict(example))
    }

    /// Predict the label of a single example, failing on unseen values.
    pub fn try_predict_row<'a, A: AttributeSource + ?Sized>(&'a self, example: &'a A) -> Result<&'a str, TreeError> {
        self.root()?.try_predict(example)
    }

    /// Predict every row of `data`, in row order. Unseen values never abort the batch.
    pub fn predict(&self, data: &Dataset) -> Result<Vec<String>, TreeError> {
        let root = self.root()?;
        let predict_one = |row: usize| {
            let view = data.row(row);
            match root.route(&view) {
                Route::Leaf(node) => (node.vote().to_string(), false),
                Route::Unseen { node, .. } => (node.vote().to_string(), true),
            }
        };
        let routed: Vec<(String, bool)> = if self.config.parallel {
            let pool = self.thread_pool()?;
            pool.install(|| (0..data.n_rows()).into_par_iter().map(predict_one).collect())
        } else {
            (0..data.n_rows()).map(predict_one).collect()
        };

        let n_fallback = routed.iter().filter(|(_, unseen)| *unseen).count();
        if n_fallback > 0 {
            warn!(
                "{} of {} rows reached a value not seen during training; used the node majority vote.",
                n_fallback,
                data.n_rows()
            );
        }
        Ok(routed.into_iter().map(|(label, _)| label).collect())
    }

    /// Depth of the deepest leaf.
    pub fn depth(&self) -> Result<usize, TreeError> {
        Ok(self.root()?.depth_reached())
    }

    pub fn n_leaves(&self) -> Result<usize, TreeError> {
        Ok(self.root()?.n_leaves())
    }

    pub fn n_nodes(&self) -> Result<usize, TreeError> {
        Ok(self.root()?.n_nodes())
    }

    /// Attributes used for splitting, in pre-order of first use.
    pub fn split_attributes(&self) -> Result<Vec<String>, TreeError> {
        let mut out: Vec<String> = Vec::new();
        let mut stack = vec![self.root()?];
        while let Some(node) = stack.pop() {
            if let Some(attribute) = node.split_attribute() {
                if !out.iter().any(|a| a == attribute) {
                    out.push(attribute.to_string());
                }
            }
            stack.extend(node.children().iter().rev());
        }
        Ok(out)
    }

    /// Indented, one line per node listing of the fitted tree.
    pub fn dump(&self) -> Result<String, TreeError> {
        let mut out = String::new();
        self.root()?
            .write_tree(&mut out)
            .map_err(|e| TreeError::UnableToWrite(e.to_string()))?;
        Ok(out)
    }
}

impl<S: Splitter> Display for DecisionTree<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => root.write_tree(f),
            None => writeln!(f, "<unfitted decision tree>"),
        }
    }
}
