use thiserror::Error;

/// Result alias for `repgrid`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned while preparing a grid for clustering.
///
/// Once a [`Table`](crate::Table) exists, matrix construction and reduction
/// cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input was empty (no rows, or no columns).
    #[error("empty input provided")]
    EmptyInput,

    /// Row length or label count does not match.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// A cell holds NaN or an infinity.
    #[error("non-finite value at row {row}, column {col}")]
    NonFinite {
        /// Row index of the offending cell.
        row: usize,
        /// Column index of the offending cell.
        col: usize,
    },

    /// Raw data does not satisfy the declared relation.
    #[error("data is not a valid {relation} relation: {reason}")]
    InvalidRelation {
        /// Relation name.
        relation: &'static str,
        /// Why the data was rejected.
        reason: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },
}
