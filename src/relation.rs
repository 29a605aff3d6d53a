//! Relation types: how raw grid ratings become a numeric [`Table`].
//!
//! A repertory grid is rated in one of three ways, and each way has its own
//! validity rule and its own mapping onto a common numeric scale:
//!
//! | Relation | Valid when | Numeric form |
//! |----------|------------|--------------|
//! | [`Relation::Dichotomous`] | exactly two distinct values, no NaN or infinity | codes `{0, 1}` |
//! | [`Relation::Ranked`] | all numeric, columns already rankings (unless generated) | ranks `1..=rows` per column |
//! | [`Relation::Interval`] | `max_scale >= 2`, all numeric | `floor(1 + (x − min)·(max_scale − 1)/(max − min))` |
//!
//! The set is closed: clustering only needs [`Relation::is_valid`] and
//! [`Relation::process`].

use core::fmt;

use crate::error::{Error, Result};
use crate::table::Table;

/// A raw grid cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A numeric rating.
    Number(f64),
    /// Any non-numeric rating ("yes", "x", ...).
    Text(String),
}

impl Cell {
    /// Numeric value, if this cell is a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(x) if x.is_finite() => Some(*x),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(x) => write!(f, "{x}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Cell::Number(x)
    }
}

impl From<i32> for Cell {
    fn from(x: i32) -> Self {
        Cell::Number(f64::from(x))
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// Raw, labelled grid as entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    row_labels: Vec<String>,
    col_labels: Vec<String>,
    cells: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Build a labelled grid, checking that rows and labels line up.
    pub fn new(row_labels: Vec<String>, col_labels: Vec<String>, cells: Vec<Vec<Cell>>) -> Result<Self> {
        if cells.is_empty() || col_labels.is_empty() {
            return Err(Error::EmptyInput);
        }
        if row_labels.len() != cells.len() {
            return Err(Error::DimensionMismatch {
                expected: cells.len(),
                found: row_labels.len(),
            });
        }
        if let Some(row) = cells.iter().find(|r| r.len() != col_labels.len()) {
            return Err(Error::DimensionMismatch {
                expected: col_labels.len(),
                found: row.len(),
            });
        }
        Ok(Self {
            row_labels,
            col_labels,
            cells,
        })
    }

    /// Build from rows, labelling rows and columns by position (`"0"`, `"1"`, ...).
    pub fn from_rows(cells: Vec<Vec<Cell>>) -> Result<Self> {
        let n_cols = cells.first().map_or(0, Vec::len);
        Self::new(positional(cells.len()), positional(n_cols), cells)
    }

    /// Build from named columns, labelling rows by position.
    pub fn from_columns(columns: Vec<(String, Vec<Cell>)>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, |(_, c)| c.len());
        if let Some((_, col)) = columns.iter().find(|(_, c)| c.len() != n_rows) {
            return Err(Error::DimensionMismatch {
                expected: n_rows,
                found: col.len(),
            });
        }
        let mut col_labels = Vec::with_capacity(columns.len());
        let mut cells: Vec<Vec<Cell>> = (0..n_rows).map(|_| Vec::with_capacity(columns.len())).collect();
        for (name, col) in columns {
            col_labels.push(name);
            for (row, cell) in cells.iter_mut().zip(col) {
                row.push(cell);
            }
        }
        Self::new(positional(n_rows), col_labels, cells)
    }

    /// Replace the row labels.
    pub fn with_row_labels(mut self, labels: Vec<String>) -> Result<Self> {
        if labels.len() != self.cells.len() {
            return Err(Error::DimensionMismatch {
                expected: self.cells.len(),
                found: labels.len(),
            });
        }
        self.row_labels = labels;
        Ok(self)
    }

    /// Element (row) labels.
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Feature (column) labels.
    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    /// Cells, row-major.
    pub fn cells(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    fn numeric_rows(&self) -> Option<Vec<Vec<f64>>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(Cell::as_number).collect())
            .collect()
    }

    // Distinct values in row-major order of first appearance.
    fn distinct(&self) -> Vec<&Cell> {
        let mut seen: Vec<&Cell> = Vec::new();
        for cell in self.iter() {
            if !seen.contains(&cell) {
                seen.push(cell);
            }
        }
        seen
    }
}

fn positional(n: usize) -> Vec<String> {
    (0..n).map(|i| i.to_string()).collect()
}

/// Side information produced while normalizing. Clustering never reads it.
#[derive(Debug, Clone, PartialEq)]
pub enum Metadata {
    /// Nothing to report.
    None,
    /// Raw value → numeric code, one entry per distinct value.
    ///
    /// Grids already rated `0`/`1` keep their numbers. Any other pair of
    /// values is coded `0` then `1` in row-major order of first appearance,
    /// so `[["y", "n"]]` codes `"y"` as 0 even though `"n"` sorts first.
    /// Swapping the two codes leaves every L1 distance unchanged.
    Codes(Vec<(Cell, f64)>),
    /// Bounds used for interval rescaling.
    Interval {
        /// Top of the target scale.
        interval_max: u32,
        /// Smallest raw value.
        min: f64,
        /// Largest raw value.
        max: f64,
    },
}

/// How a grid was rated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Two-valued ratings (yes/no, ✓/✗, 0/1).
    Dichotomous,
    /// Each construct ranks the elements.
    Ranked {
        /// Rank raw numbers instead of requiring ready-made rankings.
        generate_ranking: bool,
    },
    /// Ratings on a numeric scale, rescaled to `1..=max`.
    Interval {
        /// Top of the target scale (at least 2).
        max: u32,
    },
}

impl Relation {
    /// Ranked relation that ranks raw numbers itself.
    pub fn ranked() -> Self {
        Relation::Ranked {
            generate_ranking: true,
        }
    }

    /// Interval relation rescaling onto `1..=max`.
    pub fn interval(max: u32) -> Result<Self> {
        if max < 2 {
            return Err(Error::InvalidParameter {
                name: "max",
                message: "interval scale needs at least two points",
            });
        }
        Ok(Relation::Interval { max })
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Relation::Dichotomous => "dichotomous",
            Relation::Ranked { .. } => "ranked",
            Relation::Interval { .. } => "interval",
        }
    }

    /// Whether `raw` can be processed under this relation.
    pub fn is_valid(&self, raw: &RawTable) -> bool {
        self.rejection(raw).is_none()
    }

    /// Why `raw` is not valid under this relation, if it is not.
    pub fn rejection(&self, raw: &RawTable) -> Option<String> {
        match self {
            Relation::Dichotomous => {
                if raw
                    .iter()
                    .any(|c| matches!(c, Cell::Number(x) if !x.is_finite()))
                {
                    return Some("numeric values must be finite".to_string());
                }
                let distinct = raw.distinct().len();
                (distinct != 2).then(|| format!("expected 2 distinct values, found {distinct}"))
            }
            Relation::Ranked { generate_ranking } => {
                let Some(rows) = raw.numeric_rows() else {
                    return Some("all values must be finite numbers".to_string());
                };
                if *generate_ranking {
                    return None;
                }
                let n_cols = raw.col_labels.len();
                (0..n_cols)
                    .find(|&j| {
                        let col: Vec<f64> = rows.iter().map(|r| r[j]).collect();
                        rank_column(&col) != col
                    })
                    .map(|j| format!("column '{}' is not a ranking", raw.col_labels[j]))
            }
            Relation::Interval { max } if *max < 2 => {
                Some(format!("interval scale needs at least two points, got {max}"))
            }
            Relation::Interval { .. } => raw
                .numeric_rows()
                .is_none()
                .then(|| "all values must be finite numbers".to_string()),
        }
    }

    /// Map `raw` onto a numeric table.
    ///
    /// Fails with [`Error::InvalidRelation`] when [`is_valid`](Self::is_valid)
    /// would return false.
    pub fn process(&self, raw: &RawTable) -> Result<(Table, Metadata)> {
        if let Some(reason) = self.rejection(raw) {
            return Err(Error::InvalidRelation {
                relation: self.name(),
                reason,
            });
        }

        match *self {
            Relation::Dichotomous => {
                let distinct = raw.distinct();
                let is_binary = distinct.iter().all(|c| {
                    matches!(c.as_number(), Some(x) if x == 0.0 || x == 1.0)
                });
                let codes: Vec<(Cell, f64)> = if is_binary {
                    distinct
                        .into_iter()
                        .filter_map(|c| c.as_number().map(|x| (c.clone(), x)))
                        .collect()
                } else {
                    distinct
                        .into_iter()
                        .enumerate()
                        .map(|(i, c)| (c.clone(), i as f64))
                        .collect()
                };
                let code_of = |cell: &Cell| {
                    codes
                        .iter()
                        .find(|(c, _)| c == cell)
                        .map(|(_, code)| *code)
                        .ok_or_else(|| Error::InvalidRelation {
                            relation: self.name(),
                            reason: format!("no code for value {cell}"),
                        })
                };
                let rows = raw
                    .cells
                    .iter()
                    .map(|row| row.iter().map(&code_of).collect::<Result<Vec<f64>>>())
                    .collect::<Result<Vec<_>>>()?;
                Ok((Table::new(rows)?, Metadata::Codes(codes)))
            }
            Relation::Ranked { .. } => {
                let rows = raw.numeric_rows().ok_or(Error::EmptyInput)?;
                let n_cols = raw.col_labels.len();
                let ranked_cols: Vec<Vec<f64>> = (0..n_cols)
                    .map(|j| rank_column(&rows.iter().map(|r| r[j]).collect::<Vec<_>>()))
                    .collect();
                let ranked = (0..rows.len())
                    .map(|i| ranked_cols.iter().map(|c| c[i]).collect())
                    .collect();
                Ok((Table::new(ranked)?, Metadata::None))
            }
            Relation::Interval { max: interval_max } => {
                let table = Table::new(raw.numeric_rows().ok_or(Error::EmptyInput)?)?;
                let (lo, hi) = (table.min(), table.max());
                let span = hi - lo;
                let scale = f64::from(interval_max - 1);
                let rows = table
                    .rows()
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|&x| {
                                if span == 0.0 {
                                    1.0
                                } else {
                                    (1.0 + (x - lo) * scale / span).floor()
                                }
                            })
                            .collect()
                    })
                    .collect();
                Ok((
                    Table::new(rows)?,
                    Metadata::Interval {
                        interval_max,
                        min: lo,
                        max: hi,
                    },
                ))
            }
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ascending ranks `1..=n`; equal values ranked by first occurrence.
fn rank_column(col: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..col.len()).collect();
    order.sort_by(|&a, &b| col[a].total_cmp(&col[b]));
    let mut ranks = vec![0.0; col.len()];
    for (rank, &i) in order.iter().enumerate() {
        ranks[i] = (rank + 1) as f64;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(cols: &[(&str, &[i32])]) -> RawTable {
        RawTable::from_columns(
            cols.iter()
                .map(|(name, v)| (name.to_string(), v.iter().map(|&x| Cell::from(x)).collect()))
                .collect(),
        )
        .unwrap()
    }

    fn ranked_raw() -> RawTable {
        columns(&[("A", &[1, 2, 3, 4]), ("B", &[2, 3, 4, 5]), ("C", &[3, 4, 5, 6])])
    }

    #[test]
    fn test_raw_table_from_columns() {
        let raw = ranked_raw();
        assert_eq!(raw.col_labels(), &["A", "B", "C"]);
        assert_eq!(raw.row_labels(), &["0", "1", "2", "3"]);
        assert_eq!(raw.cells()[1], vec![Cell::from(2), Cell::from(3), Cell::from(4)]);
    }

    #[test]
    fn test_raw_table_rejects_mismatched_labels() {
        let err = RawTable::new(
            vec!["a".into()],
            vec!["x".into()],
            vec![vec![Cell::from(1)], vec![Cell::from(2)]],
        )
        .unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { expected: 2, found: 1 });

        let err = RawTable::from_columns(vec![
            ("A".into(), vec![Cell::from(1), Cell::from(2)]),
            ("B".into(), vec![Cell::from(1)]),
        ])
        .unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { expected: 2, found: 1 });

        assert_eq!(RawTable::from_rows(vec![]), Err(Error::EmptyInput));
    }

    #[test]
    fn test_dichotomous_keeps_zero_one() {
        let raw = columns(&[("A", &[0, 1, 1, 0]), ("B", &[1, 0, 1, 0]), ("C", &[1, 0, 1, 1])]);
        assert!(Relation::Dichotomous.is_valid(&raw));

        let (table, meta) = Relation::Dichotomous.process(&raw).unwrap();
        assert_eq!(table.row(0), &[0.0, 1.0, 1.0]);
        assert_eq!(table.row(3), &[0.0, 0.0, 1.0]);
        assert!(matches!(meta, Metadata::Codes(ref c) if c.len() == 2));
    }

    #[test]
    fn test_dichotomous_recodes_text() {
        let raw = RawTable::from_rows(vec![
            vec![Cell::from("yes"), Cell::from("no")],
            vec![Cell::from("no"), Cell::from("no")],
        ])
        .unwrap();
        let (table, meta) = Relation::Dichotomous.process(&raw).unwrap();
        assert_eq!(table.rows(), &[vec![0.0, 1.0], vec![1.0, 1.0]]);
        assert_eq!(
            meta,
            Metadata::Codes(vec![(Cell::from("yes"), 0.0), (Cell::from("no"), 1.0)])
        );
    }

    #[test]
    fn test_dichotomous_rejects_three_values() {
        let raw = columns(&[("A", &[0, 1, 2])]);
        assert!(!Relation::Dichotomous.is_valid(&raw));
        assert!(matches!(
            Relation::Dichotomous.process(&raw),
            Err(Error::InvalidRelation { relation: "dichotomous", .. })
        ));
    }

    #[test]
    fn test_ranked_generates_ranking() {
        let raw = columns(&[("A", &[10, 30, 20, 30]), ("B", &[4, 3, 2, 1])]);
        let (table, meta) = Relation::ranked().process(&raw).unwrap();
        assert_eq!(table.column(0).collect::<Vec<_>>(), vec![1.0, 3.0, 2.0, 4.0]);
        assert_eq!(table.column(1).collect::<Vec<_>>(), vec![4.0, 3.0, 2.0, 1.0]);
        assert_eq!(meta, Metadata::None);
    }

    #[test]
    fn test_ranked_requires_existing_ranking_when_not_generating() {
        let strict = Relation::Ranked {
            generate_ranking: false,
        };
        assert!(strict.is_valid(&columns(&[("A", &[2, 1, 3]), ("B", &[1, 2, 3])])));
        let bad = columns(&[("A", &[2, 1, 3]), ("B", &[5, 6, 7])]);
        assert!(!strict.is_valid(&bad));
        assert!(strict.rejection(&bad).unwrap().contains("'B'"));
        assert!(Relation::ranked().is_valid(&bad));
    }

    #[test]
    fn test_numeric_relations_reject_text() {
        let raw = RawTable::from_columns(vec![
            ("A".into(), vec![Cell::from(1), Cell::from(2)]),
            ("B".into(), vec![Cell::from(3), Cell::from("invalid")]),
        ])
        .unwrap();
        assert!(!Relation::ranked().is_valid(&raw));
        assert!(!Relation::interval(5).unwrap().is_valid(&raw));
    }

    #[test]
    fn test_interval_rescales() {
        let raw = columns(&[("A", &[0, 10]), ("B", &[5, 9])]);
        let (table, meta) = Relation::interval(5).unwrap().process(&raw).unwrap();
        // floor(1 + x * 4 / 10)
        assert_eq!(table.rows(), &[vec![1.0, 3.0], vec![5.0, 4.0]]);
        assert_eq!(
            meta,
            Metadata::Interval {
                interval_max: 5,
                min: 0.0,
                max: 10.0
            }
        );
    }

    #[test]
    fn test_interval_constant_table_maps_to_one() {
        let raw = columns(&[("A", &[7, 7]), ("B", &[7, 7])]);
        let (table, _) = Relation::interval(5).unwrap().process(&raw).unwrap();
        assert!(table.rows().iter().flatten().all(|&x| x == 1.0));
    }

    #[test]
    fn test_interval_parameter_check() {
        assert!(matches!(
            Relation::interval(1),
            Err(Error::InvalidParameter { name: "max", .. })
        ));
    }

    #[test]
    fn test_interval_below_two_points_is_invalid() {
        let raw = columns(&[("A", &[1, 2])]);
        for max in [0, 1] {
            let relation = Relation::Interval { max };
            assert!(!relation.is_valid(&raw));
            assert!(matches!(
                relation.process(&raw),
                Err(Error::InvalidRelation { relation: "interval", .. })
            ));
        }
        assert!(Relation::Interval { max: 2 }.is_valid(&raw));
    }

    #[test]
    fn test_dichotomous_rejects_non_finite() {
        let two_nans = RawTable::from_rows(vec![vec![Cell::from(f64::NAN), Cell::from(f64::NAN)]]).unwrap();
        assert!(!Relation::Dichotomous.is_valid(&two_nans));

        let nan_and_one = RawTable::from_rows(vec![vec![Cell::from(f64::NAN), Cell::from(1)]]).unwrap();
        assert!(matches!(
            Relation::Dichotomous.process(&nan_and_one),
            Err(Error::InvalidRelation { relation: "dichotomous", .. })
        ));

        let infinite = RawTable::from_rows(vec![vec![Cell::from(f64::INFINITY), Cell::from(0)]]).unwrap();
        assert!(!Relation::Dichotomous.is_valid(&infinite));
    }
}
