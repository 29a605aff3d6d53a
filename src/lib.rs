//! # repgrid
//!
//! Hierarchical clustering for repertory grids: rows are elements, columns are
//! constructs (features), and a single-linkage dendrogram groups either one.
//!
//! ```text
//! RawTable ──Relation──▶ Table ──▶ DissimilarityMatrix ──reduce──▶ Dendrogram
//! ```
//!
//! - [`relation`]: validate and normalize dichotomous, ranked, or interval ratings
//! - [`cluster`]: L1 dissimilarities and single-linkage agglomeration
//! - [`hierarchy`]: dendrogram nodes, labels, plot requests, health checks
//! - [`RepertoryGrid`]: the whole pipeline behind one type
//!
//! The library logs through the [`log`] facade and never installs a logger.

pub mod cluster;
/// Error types used across `repgrid`.
pub mod error;
pub mod grid;
pub mod hierarchy;
pub mod relation;
pub mod table;

pub use cluster::{DissimilarityMatrix, Mode};
pub use error::{Error, Result};
pub use grid::{GridConfig, RepertoryGrid};
pub use hierarchy::{ClusterNode, Dendrogram, HealthCheck, Renderer};
pub use relation::{Cell, Metadata, RawTable, Relation};
pub use table::Table;
