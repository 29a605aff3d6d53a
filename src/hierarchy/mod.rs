//! Dendrogram structures.
//!
//! ```text
//!          *  (height=3)           [d, [c, [a, b]]]
//!         / \
//!        d   *  (height=2)
//!           / \
//!          c   *  (height=1)
//!             / \
//!            a   b
//! ```
//!
//! - [`ClusterNode`]: immutable tree node with merge height and covered items
//! - [`Dendrogram`]: a finished run, i.e. root + item labels + merge history
//! - [`Renderer`]: drawing backend driven by [`Dendrogram::plot`]
//! - [`HealthCheck`]: structural invariants of a finished tree
//!
//! Flattened merges produce n-ary levels: when two clusters join at the height
//! already recorded on one of them, their children share a single parent.
//!
//! ```text
//!        *  (height=3)             [a, b, c, d]
//!     / | | \
//!    a  b c  d
//! ```

mod dendrogram;
mod node;
mod plot;
mod validate;

pub use dendrogram::Dendrogram;
pub use node::ClusterNode;
pub use plot::{PlotCommand, PlotRecorder, PlotRequest, Renderer};
pub use validate::{
    validate_node, HealthCheck, HealthReport, Severity, ValidationIssue, ValidationReport,
};
