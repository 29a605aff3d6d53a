//! Repertory grid: validate, normalize, then classify.
//!
//! ```rust
//! use repgrid::{Cell, GridConfig, RawTable, Relation, RepertoryGrid};
//!
//! let raw = RawTable::from_columns(vec![
//!     ("A".to_string(), vec![Cell::from(1), Cell::from(2), Cell::from(3), Cell::from(4)]),
//!     ("B".to_string(), vec![Cell::from(2), Cell::from(3), Cell::from(4), Cell::from(5)]),
//!     ("C".to_string(), vec![Cell::from(3), Cell::from(4), Cell::from(5), Cell::from(6)]),
//! ])?;
//!
//! let grid = RepertoryGrid::new(raw, Relation::interval(5)?, GridConfig::default())?;
//! let features = grid.classify_features()?;
//! assert_eq!(features.n_merges(), 2);
//! assert_eq!(features.labels(), &["A", "B", "C"]);
//! # Ok::<(), repgrid::Error>(())
//! ```

use crate::cluster::{cluster, DissimilarityMatrix, Mode};
use crate::error::{Error, Result};
use crate::hierarchy::Dendrogram;
use crate::relation::{Metadata, RawTable, Relation};
use crate::table::Table;

/// Options for a [`RepertoryGrid`].
#[derive(Debug, Clone, Default)]
pub struct GridConfig {
    /// Annotate plotted points with their subtree labels.
    pub label_points: bool,
}

impl GridConfig {
    /// Create a new configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set point annotation.
    pub fn with_label_points(mut self, label_points: bool) -> Self {
        self.label_points = label_points;
        self
    }
}

/// A validated, normalized grid ready for clustering.
#[derive(Debug, Clone)]
pub struct RepertoryGrid {
    table: Table,
    metadata: Metadata,
    relation: Relation,
    row_labels: Vec<String>,
    col_labels: Vec<String>,
    config: GridConfig,
}

impl RepertoryGrid {
    /// Check `raw` against `relation` and normalize it.
    ///
    /// Fails with [`Error::InvalidRelation`] if the data does not fit the
    /// relation.
    pub fn new(raw: RawTable, relation: Relation, config: GridConfig) -> Result<Self> {
        let (table, metadata) = relation.process(&raw).map_err(|e| {
            log::warn!("rejected grid as {relation}: {e}");
            e
        })?;
        log::info!(
            "loaded {relation} grid: {} elements x {} features",
            table.n_rows(),
            table.n_cols()
        );

        Ok(Self {
            table,
            metadata,
            relation,
            row_labels: raw.row_labels().to_vec(),
            col_labels: raw.col_labels().to_vec(),
            config,
        })
    }

    /// Cluster the rows.
    pub fn classify_elements(&self) -> Result<Dendrogram> {
        self.classify(Mode::Elements, "Elements", &self.row_labels)
    }

    /// Cluster the columns, treating reversed constructs as close.
    pub fn classify_features(&self) -> Result<Dendrogram> {
        self.classify(Mode::Features, "Features", &self.col_labels)
    }

    fn classify(&self, mode: Mode, name: &str, labels: &[String]) -> Result<Dendrogram> {
        let matrix = DissimilarityMatrix::build(&self.table, mode);
        let out = cluster(&matrix);
        let root = out.root.ok_or(Error::EmptyInput)?;
        log::info!(
            "classified {} {}: {} merges, root height {}",
            matrix.len(),
            name.to_lowercase(),
            out.merges.len(),
            root.height()
        );
        Ok(Dendrogram::new(name, root, labels.to_vec(), out.merges)
            .with_label_points(self.config.label_points))
    }

    /// Normalized table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Normalization side information.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Relation the grid was rated under.
    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// Configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Element (row) labels.
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Feature (column) labels.
    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }
}
