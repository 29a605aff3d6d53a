//! Dendrogram health checks.
//!
//! A finished tree must satisfy:
//! - leaves sit at height 0 and cover exactly one item
//! - internal nodes have at least two children
//! - an internal node covers exactly the disjoint union of its children
//! - the root covers every item `0..n` exactly once
//!
//! A child taller than its parent is only a warning: flattened merges compare
//! the two candidates' own heights, not their children's.
//!
//! Issues name nodes by pre-order index (root = 0).
//!
//! ```rust
//! use repgrid::hierarchy::{ClusterNode, HealthCheck};
//!
//! let (root, _) = ClusterNode::merge(ClusterNode::leaf(0), ClusterNode::leaf(1), 2.0);
//! let report = root.health_check();
//! assert!(report.is_healthy(), "{}", report);
//! ```

use std::fmt;

use super::ClusterNode;

/// How bad an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Unusual but allowed.
    Warning,
    /// The tree is malformed.
    Error,
}

/// One broken (or suspicious) invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Severity.
    pub severity: Severity,
    /// Pre-order index of the offending node.
    pub node: usize,
    /// What went wrong.
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{level} at node {}: {}", self.node, self.message)
    }
}

/// Issues collected over a tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Issues in the order found.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning on `node`.
    pub fn warn(&mut self, node: usize, message: impl Into<String>) {
        self.push(Severity::Warning, node, message.into());
    }

    /// Record an error on `node`.
    pub fn error(&mut self, node: usize, message: impl Into<String>) {
        self.push(Severity::Error, node, message.into());
    }

    fn push(&mut self, severity: Severity, node: usize, message: String) {
        self.issues.push(ValidationIssue {
            severity,
            node,
            message,
        });
    }

    /// Issues of exactly `severity`.
    pub fn of(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    /// No errors (warnings allowed).
    pub fn is_healthy(&self) -> bool {
        self.of(Severity::Error).next().is_none()
    }

    /// No issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return f.write_str("no issues");
        }
        for (k, issue) in self.issues.iter().enumerate() {
            if k > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// Validation issues plus the shape of the tree they were found in.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    /// Issues found.
    pub validation: ValidationReport,
    /// Nodes in the tree.
    pub node_count: usize,
    /// Leaves in the tree.
    pub leaf_count: usize,
    /// Edges on the longest root-to-leaf path.
    pub max_depth: usize,
}

impl HealthReport {
    /// See [`ValidationReport::is_healthy`].
    pub fn is_healthy(&self) -> bool {
        self.validation.is_healthy()
    }
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} nodes, {} leaves, depth {}",
            self.node_count, self.leaf_count, self.max_depth
        )?;
        write!(f, "{}", self.validation)
    }
}

/// Types whose structure can be checked.
pub trait HealthCheck {
    /// Check every invariant and summarize the tree.
    fn health_check(&self) -> HealthReport;

    /// Shorthand for `health_check().is_healthy()`.
    fn is_healthy(&self) -> bool {
        self.health_check().is_healthy()
    }
}

impl HealthCheck for ClusterNode {
    fn health_check(&self) -> HealthReport {
        let mut validation = validate_node(self);

        // Root coverage: every item 0..n exactly once.
        let n = self.len();
        let mut seen = vec![0usize; n];
        let mut out_of_range = Vec::new();
        for &e in self.elements() {
            match seen.get_mut(e) {
                Some(count) => *count += 1,
                None => out_of_range.push(e),
            }
        }
        if !out_of_range.is_empty() {
            validation.error(0, format!("items {out_of_range:?} outside 0..{n}"));
        }
        let duplicated: Vec<usize> = (0..n).filter(|&i| seen[i] > 1).collect();
        if !duplicated.is_empty() {
            validation.error(0, format!("items {duplicated:?} covered more than once"));
        }

        HealthReport {
            validation,
            node_count: self.node_count(),
            leaf_count: self.leaves().len(),
            max_depth: self.depth(),
        }
    }
}

/// Check per-node invariants of the subtree under `root`.
///
/// Root coverage is left to [`HealthCheck::health_check`], since a subtree
/// legitimately covers only part of `0..n`.
pub fn validate_node(root: &ClusterNode) -> ValidationReport {
    let mut report = ValidationReport::new();
    let mut next_id = 0;
    check(root, &mut next_id, &mut report);
    report
}

fn check(node: &ClusterNode, next_id: &mut usize, report: &mut ValidationReport) {
    let id = *next_id;
    *next_id += 1;

    if node.is_leaf() {
        if node.height() != 0.0 {
            report.error(id, format!("leaf at height {}", node.height()));
        }
        if node.len() != 1 {
            report.error(id, format!("leaf covers {:?}", node.elements()));
        }
        return;
    }

    if node.children().len() < 2 {
        report.error(id, "internal node with a single child");
    }

    let mut union: Vec<usize> = node
        .children()
        .iter()
        .flat_map(|c| c.elements().iter().copied())
        .collect();
    let mut own = node.elements().to_vec();
    union.sort_unstable();
    own.sort_unstable();
    if union != own {
        report.error(id, format!("covers {own:?} but children cover {union:?}"));
    }

    for child in node.children() {
        if child.height() > node.height() {
            report.warn(
                id,
                format!("child at {} above parent at {}", child.height(), node.height()),
            );
        }
        check(child, next_id, report);
    }
}
