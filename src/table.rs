//! Validated numeric table.
//!
//! Rows are elements, columns are features (constructs). Every clustering
//! entry point takes a [`Table`], so shape and finiteness are checked once,
//! before any distance is computed.

use crate::error::{Error, Result};

/// A rectangular table of finite `f64` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: Vec<Vec<f64>>,
    n_cols: usize,
    min: f64,
    max: f64,
}

impl Table {
    /// Build a table from rows, rejecting empty, ragged, or non-finite input.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let first = rows.first().ok_or(Error::EmptyInput)?;
        let n_cols = first.len();
        if n_cols == 0 {
            return Err(Error::EmptyInput);
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(Error::DimensionMismatch {
                    expected: n_cols,
                    found: row.len(),
                });
            }
            for (j, &x) in row.iter().enumerate() {
                if !x.is_finite() {
                    return Err(Error::NonFinite { row: i, col: j });
                }
                min = min.min(x);
                max = max.max(x);
            }
        }

        Ok(Self {
            rows,
            n_cols,
            min,
            max,
        })
    }

    /// Number of rows (elements).
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (features).
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Row `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.rows[i]
    }

    /// All rows, in order.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Column `j`, top to bottom.
    pub fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row[j])
    }

    /// Cell at row `i`, column `j`.
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.rows[i][j]
    }

    /// Global minimum over every cell.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Global maximum over every cell.
    pub fn max(&self) -> f64 {
        self.max
    }
}
