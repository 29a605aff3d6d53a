//! Pairwise dissimilarity between elements or features.
//!
//! Both modes use the L1 (city block) distance, which is the natural choice
//! for ordinal grid ratings: one step on the scale costs one unit, wherever
//! on the scale it happens.
//!
//! ## Construct bipolarity
//!
//! A construct such as "warm – cold" can be rated with either pole on the
//! left. Two features that are mirror images of each other describe the same
//! construct, so feature distances compare column `i` both as rated and
//! reflected through the scale:
//!
//! ```text
//! reflected(x) = max_all - x + min_all
//! d(i, j)      = min( Σ_r |x_ri - x_rj|, Σ_r |reflected(x_ri) - x_rj| )
//! ```

use crate::table::Table;

/// Which axis of the table is being clustered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Cluster rows.
    Elements,
    /// Cluster columns, allowing for reversed constructs.
    Features,
}

impl Mode {
    /// Number of items clustered in this mode.
    pub fn n_items(&self, table: &Table) -> usize {
        match self {
            Mode::Elements => table.n_rows(),
            Mode::Features => table.n_cols(),
        }
    }
}

/// Symmetric, zero-diagonal distance matrix.
///
/// Stored as a condensed upper triangle (row-major, `n·(n−1)/2` entries), the
/// same layout SciPy and `kodama` use.
#[derive(Debug, Clone, PartialEq)]
pub struct DissimilarityMatrix {
    n: usize,
    mode: Mode,
    condensed: Vec<f64>,
}

impl DissimilarityMatrix {
    /// Build the matrix for `mode` over `table`.
    pub fn build(table: &Table, mode: Mode) -> Self {
        let n = mode.n_items(table);
        let mut condensed = Vec::with_capacity(n * n.saturating_sub(1) / 2);

        match mode {
            Mode::Elements => {
                for i in 0..n {
                    for j in (i + 1)..n {
                        condensed.push(l1(table.row(i), table.row(j)));
                    }
                }
            }
            Mode::Features => {
                let columns: Vec<Vec<f64>> = (0..n).map(|j| table.column(j).collect()).collect();
                let (lo, hi) = (table.min(), table.max());
                for i in 0..n {
                    for j in (i + 1)..n {
                        let direct = l1(&columns[i], &columns[j]);
                        let reflected = columns[i]
                            .iter()
                            .zip(&columns[j])
                            .map(|(&a, &b)| ((hi - a + lo) - b).abs())
                            .sum::<f64>();
                        condensed.push(direct.min(reflected));
                    }
                }
            }
        }

        log::debug!(
            "built {:?} dissimilarity matrix over {} items ({} pairs)",
            mode,
            n,
            condensed.len()
        );

        Self { n, mode, condensed }
    }

    /// Matrix side length.
    pub fn len(&self) -> usize {
        self.n
    }

    /// True when there are no items.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Mode the matrix was built for.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Distance between items `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        use std::cmp::Ordering;
        match i.cmp(&j) {
            Ordering::Equal => 0.0,
            Ordering::Less => self.condensed[self.offset(i, j)],
            Ordering::Greater => self.condensed[self.offset(j, i)],
        }
    }

    /// Condensed upper triangle, row-major.
    pub fn condensed(&self) -> &[f64] {
        &self.condensed
    }

    /// Expand into a full `n × n` matrix.
    pub fn to_square(&self) -> Vec<Vec<f64>> {
        (0..self.n)
            .map(|i| (0..self.n).map(|j| self.get(i, j)).collect())
            .collect()
    }

    // i < j
    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        self.n * i - i * (i + 1) / 2 + (j - i - 1)
    }
}

#[inline]
fn l1(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}
