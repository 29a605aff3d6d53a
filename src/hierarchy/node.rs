//! Dendrogram node.

use core::fmt;

/// A node in a dendrogram.
///
/// Leaves cover a single original item (a row or a column of the table).
/// Internal nodes own their children and record the dissimilarity at which
/// they were formed. Nodes are never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterNode {
    /// Covered item indices, in merge order.
    elements: Vec<usize>,
    /// Merge dissimilarity (0 for leaves).
    height: f64,
    /// Child nodes (empty for leaves).
    children: Vec<ClusterNode>,
}

impl ClusterNode {
    /// Create a leaf for original item `index`.
    pub fn leaf(index: usize) -> Self {
        Self {
            elements: vec![index],
            height: 0.0,
            children: Vec::new(),
        }
    }

    /// Merge `a` and `b` at dissimilarity `height`.
    ///
    /// If `height` equals the recorded height of either operand, the result
    /// flattens both operands into one level: its children are `a`'s children
    /// (or `a` itself, for a leaf) followed by `b`'s children (or `b`).
    /// Otherwise the result is the binary node `[a, b]`.
    ///
    /// Returns the new node and whether it was flattened.
    pub fn merge(a: ClusterNode, b: ClusterNode, height: f64) -> (Self, bool) {
        let mut elements = Vec::with_capacity(a.elements.len() + b.elements.len());
        elements.extend_from_slice(&a.elements);
        elements.extend_from_slice(&b.elements);

        let collapsed = a.height == height || b.height == height;
        let children = if collapsed {
            let mut children = a.into_level();
            children.extend(b.into_level());
            children
        } else {
            vec![a, b]
        };

        (
            Self {
                elements,
                height,
                children,
            },
            collapsed,
        )
    }

    // Children of an internal node, or the leaf itself.
    fn into_level(self) -> Vec<ClusterNode> {
        if self.children.is_empty() {
            vec![self]
        } else {
            self.children
        }
    }

    /// Check if this is a leaf node.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Covered item indices.
    pub fn elements(&self) -> &[usize] {
        &self.elements
    }

    /// Number of covered items.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the node covers no items. Nodes built by `leaf`/`merge` never do.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Merge height (0 for leaves).
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Child nodes in stored order.
    pub fn children(&self) -> &[ClusterNode] {
        &self.children
    }

    /// Leaf indices in left-to-right (child) order.
    pub fn leaves(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.elements.len());
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<usize>) {
        if self.is_leaf() {
            out.extend_from_slice(&self.elements);
        } else {
            for child in &self.children {
                child.collect_leaves(out);
            }
        }
    }

    /// Number of edges on the longest path down to a leaf.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Bracketed label of this subtree.
    ///
    /// A leaf renders as `labels[index]`; an internal node as its children's
    /// labels joined by `", "` inside `[` `]`.
    pub fn label<L: fmt::Display>(&self, labels: &[L]) -> String {
        let mut out = String::new();
        self.write_label(labels, &mut out);
        out
    }

    fn write_label<L: fmt::Display>(&self, labels: &[L], out: &mut String) {
        use fmt::Write;
        if self.is_leaf() {
            let _ = write!(out, "{}", labels[self.elements[0]]);
            return;
        }
        out.push('[');
        for (k, child) in self.children.iter().enumerate() {
            if k > 0 {
                out.push_str(", ");
            }
            child.write_label(labels, out);
        }
        out.push(']');
    }

    /// Plot coordinate: `(leftmost leaf index, height)`.
    pub fn position(&self) -> (usize, f64) {
        match self.children.first() {
            None => (self.elements[0], 0.0),
            Some(first) => (first.position().0, self.height),
        }
    }
}

impl fmt::Display for ClusterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            write!(f, "Leaf[{}]", self.elements[0])
        } else {
            write!(
                f,
                "Node h={} ({} items, {} children)",
                self.height,
                self.elements.len(),
                self.children.len()
            )
        }
    }
}
