//! Render requests for drawing a dendrogram.
//!
//! The crate does not draw anything itself. [`Dendrogram::plot`] walks the
//! tree and issues points and segments to a [`Renderer`], using
//! [`ClusterNode::position`] for coordinates: x is the node's leftmost leaf
//! index, y its merge height.
//!
//! [`Dendrogram::plot`]: super::Dendrogram::plot

use super::ClusterNode;

/// Axis titles and heading for one plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotRequest {
    /// Plot heading.
    pub title: String,
    /// Horizontal axis title.
    pub x_label: String,
    /// Vertical axis title.
    pub y_label: String,
}

impl PlotRequest {
    /// Standard request for a clustering run called `name`.
    pub fn for_run(name: &str) -> Self {
        Self {
            title: format!("Classification of {name}"),
            x_label: "Elements".to_string(),
            y_label: "Height".to_string(),
        }
    }
}

/// Drawing backend driven by [`Dendrogram::plot`](super::Dendrogram::plot).
pub trait Renderer {
    /// Start a new plot.
    fn begin(&mut self, request: &PlotRequest);

    /// Draw a node marker, optionally annotated.
    fn point(&mut self, x: f64, y: f64, label: Option<&str>);

    /// Draw a connecting line.
    fn segment(&mut self, from: (f64, f64), to: (f64, f64));

    /// Called once after the last primitive.
    fn finish(&mut self) {}
}

/// One recorded call on a [`PlotRecorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlotCommand {
    /// [`Renderer::begin`].
    Begin(PlotRequest),
    /// [`Renderer::point`].
    Point {
        /// Horizontal coordinate.
        x: f64,
        /// Vertical coordinate.
        y: f64,
        /// Annotation, if labels were requested.
        label: Option<String>,
    },
    /// [`Renderer::segment`].
    Segment {
        /// Start point.
        from: (f64, f64),
        /// End point.
        to: (f64, f64),
    },
    /// [`Renderer::finish`].
    Finish,
}

/// A [`Renderer`] that records every call, for replay on another backend.
#[derive(Debug, Clone, Default)]
pub struct PlotRecorder {
    /// Recorded calls, in order.
    pub commands: Vec<PlotCommand>,
}

impl PlotRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded points as `(x, y)`.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                PlotCommand::Point { x, y, .. } => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    /// Recorded segments.
    pub fn segments(&self) -> Vec<((f64, f64), (f64, f64))> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                PlotCommand::Segment { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for PlotRecorder {
    fn begin(&mut self, request: &PlotRequest) {
        self.commands.push(PlotCommand::Begin(request.clone()));
    }

    fn point(&mut self, x: f64, y: f64, label: Option<&str>) {
        self.commands.push(PlotCommand::Point {
            x,
            y,
            label: label.map(str::to_string),
        });
    }

    fn segment(&mut self, from: (f64, f64), to: (f64, f64)) {
        self.commands.push(PlotCommand::Segment { from, to });
    }

    fn finish(&mut self) {
        self.commands.push(PlotCommand::Finish);
    }
}

fn coords(node: &ClusterNode) -> (f64, f64) {
    let (x, y) = node.position();
    (x as f64, y)
}

/// Pre-order walk: the node's point, its subtrees, then one segment per child.
pub(crate) fn draw_node<R: Renderer>(
    node: &ClusterNode,
    labels: &[String],
    label_points: bool,
    renderer: &mut R,
) {
    let here = coords(node);
    let label = label_points.then(|| node.label(labels));
    renderer.point(here.0, here.1, label.as_deref());

    for child in node.children() {
        draw_node(child, labels, label_points, renderer);
    }
    for child in node.children() {
        renderer.segment(here, coords(child));
    }
}
