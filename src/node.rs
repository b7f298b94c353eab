use crate::constants::{DEPTH_MARKER, ROOT_MARKER};
use crate::data::{AttributeSource, Dataset};
use crate::errors::TreeError;
use crate::histogram::LabelHistogram;
use crate::splitter::Splitter;
use log::debug;
use rayon::prelude::*;
use std::fmt::{self, Write};

/// The parent attribute and value that routed rows into a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub attribute: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    depth: usize,
    branch: Option<Branch>,
    histogram: LabelHistogram,
    vote: String,
    split_attribute: Option<String>,
    children: Vec<Node>,
}

/// Where a row ended up while walking down the tree.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Route<'a> {
    Leaf(&'a Node),
    /// No child matches the row's value for `node`'s split attribute.
    Unseen { node: &'a Node, value: Option<&'a str> },
}

/// Settings shared by every node of one training run.
pub(crate) struct GrowParams<'a, S: Splitter> {
    pub max_depth: usize,
    pub parallel: bool,
    pub splitter: &'a S,
}

impl Node {
    /// Grow a node from its subset of training rows, recursing into children
    /// until the depth limit, a pure subset, or the attributes run out.
    /// The subset is consumed.
    pub(crate) fn grow<S: Splitter>(data: Dataset, depth: usize, branch: Option<Branch>, params: &GrowParams<S>) -> Node {
        let histogram = LabelHistogram::from_labels(data.labels().iter().map(String::as_str));
        let vote = histogram.majority().unwrap_or_default().to_string();
        let mut node = Node {
            depth,
            branch,
            histogram,
            vote,
            split_attribute: None,
            children: Vec::new(),
        };

        if depth >= params.max_depth || data.n_attributes() == 0 || node.histogram.is_pure() {
            return node;
        }
        let split = match params.splitter.best_split(&data) {
            Some(s) => s,
            None => return node,
        };
        debug!(
            "depth {}: splitting {} rows on {} (gain {:.6})",
            depth,
            data.n_rows(),
            split.attribute,
            split.split_gain
        );

        let partitions = data.partition(split.split_feature);
        drop(data);
        let attribute = split.attribute;
        let child = |(value, subset): (String, Dataset)| {
            let branch = Branch {
                attribute: attribute.clone(),
                value,
            };
            Node::grow(subset, depth + 1, Some(branch), params)
        };
        // Indexed collect keeps first-seen value order, so parallel and
        // sequential growth produce the same tree.
        node.children = if params.parallel {
            partitions.into_par_iter().map(child).collect()
        } else {
            partitions.into_iter().map(child).collect()
        };
        node.split_attribute = Some(attribute);
        node
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// `None` for the root.
    pub fn branch(&self) -> Option<&Branch> {
        self.branch.as_ref()
    }

    pub fn histogram(&self) -> &LabelHistogram {
        &self.histogram
    }

    /// Majority label of the training rows that reached this node.
    pub fn vote(&self) -> &str {
        &self.vote
    }

    /// Attribute this node splits on, `None` for leaves.
    pub fn split_attribute(&self) -> Option<&str> {
        self.split_attribute.as_deref()
    }

    /// Children in first-seen value order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Child whose training-time branch value equals `value`.
    pub fn get_child(&self, value: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|c| c.branch.as_ref().map_or(false, |b| b.value == value))
    }

    pub(crate) fn route<'a, A: AttributeSource + ?Sized>(&'a self, example: &'a A) -> Route<'a> {
        let mut node = self;
        loop {
            let attribute = match &node.split_attribute {
                Some(a) if !node.is_leaf() => a,
                _ => return Route::Leaf(node),
            };
            let value = example.value(attribute);
            match value.and_then(|v| node.get_child(v)) {
                Some(child) => node = child,
                None => return Route::Unseen { node, value },
            }
        }
    }

    /// Predict a label. A value never seen during training for a split
    /// attribute falls back to the majority vote of the node where the
    /// walk stopped.
    pub fn predict<'a, A: AttributeSource + ?Sized>(&'a self, example: &'a A) -> &'a str {
        match self.route(example) {
            Route::Leaf(node) | Route::Unseen { node, .. } => &node.vote,
        }
    }

    /// Like [`Node::predict`] but surfaces unseen values as an error.
    pub fn try_predict<'a, A: AttributeSource + ?Sized>(&'a self, example: &'a A) -> Result<&'a str, TreeError> {
        match self.route(example) {
            Route::Leaf(node) => Ok(&node.vote),
            Route::Unseen { node, value } => Err(TreeError::UnseenValue {
                attribute: node.split_attribute.clone().unwrap_or_default(),
                value: value.map(str::to_string),
            }),
        }
    }

    /// Write this node and its subtree, one line per node, pre-order.
    pub fn write_tree<W: Write>(&self, out: &mut W) -> fmt::Result {
        for _ in 0..self.depth {
            out.write_char(DEPTH_MARKER)?;
        }
        if self.depth > 0 {
            out.write_char(' ')?;
        }
        writeln!(out, "{}", self)?;
        for child in &self.children {
            child.write_tree(out)?;
        }
        Ok(())
    }

    pub fn n_nodes(&self) -> usize {
        1 + self.children.iter().map(Node::n_nodes).sum::<usize>()
    }

    pub fn n_leaves(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(Node::n_leaves).sum()
        }
    }

    /// Depth of the deepest node below (and including) this one.
    pub fn depth_reached(&self) -> usize {
        self.children.iter().map(Node::depth_reached).max().unwrap_or(self.depth)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ", self.histogram)?;
        match &self.branch {
            Some(b) => write!(f, "{} = {}", b.attribute, b.value)?,
            None => write!(f, "{}", ROOT_MARKER)?,
        }
        match (&self.split_attribute, self.is_leaf()) {
            (Some(attribute), false) => write!(f, " --> split on {}", attribute),
            _ => write!(f, " --> {}", self.vote),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitter::MutualInformationSplitter;
    use hashbrown::HashMap;

    fn weather() -> Dataset {
        Dataset::from_columns(
            vec![
                ("Weather", vec!["Sunny", "Sunny", "Rainy"]),
                ("Wind", vec!["Weak", "Strong", "Weak"]),
            ],
            "Play",
            vec!["Play", "Play", "NoPlay"],
        )
        .unwrap()
    }

    fn grow(data: Dataset, max_depth: usize) -> Node {
        let params = GrowParams {
            max_depth,
            parallel: false,
            splitter: &MutualInformationSplitter,
        };
        Node::grow(data, 0, None, &params)
    }

    fn example(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(a, v)| (a.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_grow_weather() {
        let root = grow(weather(), 1);
        assert_eq!(root.split_attribute(), Some("Weather"));
        assert_eq!(root.depth(), 0);
        assert_eq!(root.branch(), None);
        assert_eq!(root.histogram().count("Play"), 2);
        let children = root.children();
        assert_eq!(children.len(), 2);
        assert_eq!(
            children[0].branch(),
            Some(&Branch {
                attribute: "Weather".to_string(),
                value: "Sunny".to_string()
            })
        );
        assert_eq!(children[0].depth(), 1);
        assert_eq!(children[0].vote(), "Play");
        assert_eq!(children[1].vote(), "NoPlay");
        assert_eq!(children[1].split_attribute(), None);
        assert!(children.iter().all(Node::is_leaf));
        assert_eq!(root.predict(&example(&[("Weather", "Rainy"), ("Wind", "Weak")])), "NoPlay");
    }

    #[test]
    fn test_depth_zero_is_a_leaf() {
        let root = grow(weather(), 0);
        assert!(root.is_leaf());
        assert_eq!(root.vote(), "Play");
        assert_eq!(root.predict(&example(&[("Weather", "Rainy")])), "Play");
    }

    #[test]
    fn test_pure_subset_gets_a_vote() {
        let data = Dataset::from_columns(vec![("a", vec!["x", "y"])], "y", vec!["yes", "yes"]).unwrap();
        let root = grow(data, 5);
        assert!(root.is_leaf());
        assert_eq!(root.vote(), "yes");
        assert_eq!(root.split_attribute(), None);
    }

    #[test]
    fn test_children_do_not_reuse_parent_attribute() {
        let data = Dataset::from_columns(
            vec![("a", vec!["0", "0", "1", "1"]), ("b", vec!["0", "1", "0", "1"])],
            "y",
            vec!["0", "1", "1", "0"],
        )
        .unwrap();
        let root = grow(data, 10);
        let first = root.split_attribute().unwrap();
        for child in root.children() {
            let second = child.split_attribute().unwrap();
            assert_ne!(first, second);
            assert!(child.children().iter().all(Node::is_leaf));
        }
        assert_eq!(root.depth_reached(), 2);
        assert_eq!(root.n_leaves(), 4);
        assert_eq!(root.n_nodes(), 7);
    }

    #[test]
    fn test_unseen_value_falls_back_to_node_vote() {
        let root = grow(weather(), 2);
        let row = example(&[("Weather", "Foggy"), ("Wind", "Weak")]);
        assert_eq!(root.predict(&row), root.vote());
        match root.try_predict(&row) {
            Err(TreeError::UnseenValue { attribute, value }) => {
                assert_eq!(attribute, "Weather");
                assert_eq!(value.as_deref(), Some("Foggy"));
            }
            other => panic!("unexpected result {:?}", other),
        }
        let missing = example(&[("Wind", "Weak")]);
        assert_eq!(root.predict(&missing), "Play");
        assert!(matches!(
            root.try_predict(&missing),
            Err(TreeError::UnseenValue { value: None, .. })
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let data = Dataset::from_columns(
            vec![
                ("a", vec!["0", "0", "1", "1", "2", "2", "0", "1"]),
                ("b", vec!["0", "1", "0", "1", "0", "1", "1", "1"]),
                ("c", vec!["x", "x", "y", "y", "x", "y", "y", "x"]),
            ],
            "y",
            vec!["0", "1", "1", "0", "1", "0", "1", "0"],
        )
        .unwrap();
        let sequential = grow(data.clone(), 3);
        let params = GrowParams {
            max_depth: 3,
            parallel: true,
            splitter: &MutualInformationSplitter,
        };
        let parallel = Node::grow(data, 0, None, &params);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_write_tree() {
        let root = grow(weather(), 1);
        let mut out = String::new();
        root.write_tree(&mut out).unwrap();
        let expected = "[2 Play/1 NoPlay] root --> split on Weather\n\
                        | [2 Play] Weather = Sunny --> Play\n\
                        | [1 NoPlay] Weather = Rainy --> NoPlay\n";
        assert_eq!(out, expected);
    }
}
