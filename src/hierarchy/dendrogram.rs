//! Completed clustering run.
//!
//! A [`Dendrogram`] pairs the root [`ClusterNode`] with the labels of the axis
//! that was clustered (row labels for elements, column labels for features)
//! and the merge history that produced it.

use super::plot::{draw_node, PlotRequest, Renderer};
use super::validate::{HealthCheck, HealthReport};
use super::ClusterNode;
use crate::cluster::Merge;

/// A dendrogram over labelled items.
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram {
    name: String,
    root: ClusterNode,
    labels: Vec<String>,
    merges: Vec<Merge>,
    label_points: bool,
}

impl Dendrogram {
    /// Wrap a finished tree.
    ///
    /// `labels[i]` names item `i`; `merges` is the history returned by
    /// [`reduce`](crate::cluster::reduce).
    pub fn new(
        name: impl Into<String>,
        root: ClusterNode,
        labels: Vec<String>,
        merges: Vec<Merge>,
    ) -> Self {
        Self {
            name: name.into(),
            root,
            labels,
            merges,
            label_points: false,
        }
    }

    /// Annotate plotted points with their subtree labels.
    pub fn with_label_points(mut self, label_points: bool) -> Self {
        self.label_points = label_points;
        self
    }

    /// Run name ("Elements", "Features", ...).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root node.
    pub fn root(&self) -> &ClusterNode {
        &self.root
    }

    /// Item labels, indexed by item.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.labels.len()
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Iterate over merges.
    pub fn merges(&self) -> impl Iterator<Item = &Merge> {
        self.merges.iter()
    }

    /// Get the merge distances (for visualization).
    pub fn distances(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.distance).collect()
    }

    /// Bracketed label of the whole tree, e.g. `"[[a, b], c]"`.
    pub fn label(&self) -> String {
        self.root.label(&self.labels)
    }

    /// Whether plotted points are annotated.
    pub fn label_points(&self) -> bool {
        self.label_points
    }

    /// Send the whole tree to `renderer`.
    pub fn plot<R: Renderer>(&self, renderer: &mut R) {
        renderer.begin(&PlotRequest::for_run(&self.name));
        draw_node(&self.root, &self.labels, self.label_points, renderer);
        renderer.finish();
    }
}

impl HealthCheck for Dendrogram {
    fn health_check(&self) -> HealthReport {
        let mut report = self.root.health_check();
        let (covered, n) = (self.root.len(), self.labels.len());
        if covered != n {
            report
                .validation
                .error(0, format!("root covers {covered} items but {n} labels were given"));
        }
        if self.merges.len() + 1 != n {
            report
                .validation
                .error(0, format!("{} merges recorded for {n} items", self.merges.len()));
        }
        report
    }
}
