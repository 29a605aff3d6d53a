//! Agglomerative clustering of grid elements or features.
//!
//! Two steps:
//!
//! 1. [`DissimilarityMatrix::build`] computes L1 distances between rows
//!    ([`Mode::Elements`]) or between columns ([`Mode::Features`], which also
//!    matches a construct against the reversed form of another).
//! 2. [`reduce`] merges the two closest clusters under single linkage until
//!    one root remains.
//!
//! | Linkage | Distance | Effect |
//! |---------|----------|--------|
//! | Single | min(pairwise) | Chaining; elongated clusters |
//!
//! ## Usage
//!
//! ```rust
//! use repgrid::cluster::{cluster, DissimilarityMatrix, Mode};
//! use repgrid::Table;
//!
//! let table = Table::new(vec![
//!     vec![1.0, 2.0, 3.0],
//!     vec![2.0, 3.0, 4.0],
//!     vec![9.0, 9.0, 9.0],
//! ]).unwrap();
//!
//! let matrix = DissimilarityMatrix::build(&table, Mode::Elements);
//! let out = cluster(&matrix);
//! assert_eq!(out.merges.len(), 2);
//! assert_eq!(out.root.unwrap().label(&["a", "b", "c"]), "[c, [a, b]]");
//! ```

mod agglomerative;
mod dissimilarity;

pub use agglomerative::{cluster, reduce, single_linkage, Agglomeration, Merge};
pub use dissimilarity::{DissimilarityMatrix, Mode};
