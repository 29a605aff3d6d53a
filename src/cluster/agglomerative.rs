//! Single-linkage agglomeration with height collapsing.
//!
//! Start with one singleton [`ClusterNode`] per item and repeatedly merge the
//! two closest live clusters until one remains. The distance between two
//! clusters is the smallest item-to-item distance between them:
//!
//! ```text
//! d(A, B) = min { m[a][b] : a ∈ A, b ∈ B }
//! ```
//!
//! # Deterministic ties
//!
//! Live clusters are kept in *forest order*: survivors keep their relative
//! order and every merged cluster is appended at the end. Candidate pairs are
//! scanned as `(i, j)` with `i < j` in that order, and the first pair at the
//! minimum distance wins. Repeated runs on the same input always yield the
//! same tree.
//!
//! # Height collapsing
//!
//! When the merge distance equals the height already recorded on either
//! candidate, the candidates are flattened into one n-ary level instead of
//! stacking two binary merges at the same height (see [`ClusterNode::merge`]).
//! Only the two candidates' own heights are compared, never the heights of
//! their children.
//!
//! # Complexity
//!
//! Cluster distances are kept in a lower-triangular table over arena slots
//! and updated with `d(A ∪ B, k) = min(d(A, k), d(B, k))`, which is exactly the
//! minimum over item pairs. Each merge scans all live pairs: O(n³) time,
//! O(n²) space.

use super::dissimilarity::DissimilarityMatrix;
use crate::hierarchy::ClusterNode;

/// A single merge performed during reduction.
///
/// Cluster handles follow the SciPy convention: leaves are `0..n`, and the
/// `k`-th merge creates handle `n + k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// Handle of the earlier cluster in forest order.
    pub cluster_a: usize,
    /// Handle of the later cluster in forest order.
    pub cluster_b: usize,
    /// Dissimilarity at which the merge occurred.
    pub distance: f64,
    /// Number of items in the merged cluster.
    pub size: usize,
    /// Whether the merge was flattened into an existing level.
    pub collapsed: bool,
}

/// Output of [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub struct Agglomeration {
    /// Root of the tree, or `None` for an empty forest.
    pub root: Option<ClusterNode>,
    /// Merges in the order they were performed.
    pub merges: Vec<Merge>,
}

/// Single-linkage distance between two clusters.
pub fn single_linkage(a: &ClusterNode, b: &ClusterNode, matrix: &DissimilarityMatrix) -> f64 {
    a.elements()
        .iter()
        .flat_map(|&i| b.elements().iter().map(move |&j| matrix.get(i, j)))
        .fold(f64::INFINITY, f64::min)
}

/// Arena of clusters indexed by stable handle; slot order is forest order.
struct Forest {
    slots: Vec<Option<ClusterNode>>,
    // linkage[k][j] = d(k, j) for j < k.
    linkage: Vec<Vec<f64>>,
    live: usize,
}

impl Forest {
    fn new(seed: Vec<ClusterNode>, matrix: &DissimilarityMatrix) -> Self {
        let mut linkage: Vec<Vec<f64>> = Vec::with_capacity(2 * seed.len());
        for k in 0..seed.len() {
            let row = (0..k)
                .map(|j| single_linkage(&seed[k], &seed[j], matrix))
                .collect();
            linkage.push(row);
        }
        let live = seed.len();
        Self {
            slots: seed.into_iter().map(Some).collect(),
            linkage,
            live,
        }
    }

    #[inline]
    fn distance(&self, a: usize, b: usize) -> f64 {
        if a > b {
            self.linkage[a][b]
        } else {
            self.linkage[b][a]
        }
    }

    /// First live pair `(a, b)`, `a < b`, at the minimum distance.
    fn closest_pair(&self) -> Option<(usize, usize, f64)> {
        let live: Vec<usize> = (0..self.slots.len())
            .filter(|&s| self.slots[s].is_some())
            .collect();

        let mut best: Option<(usize, usize, f64)> = None;
        for (x, &a) in live.iter().enumerate() {
            for &b in &live[x + 1..] {
                let d = self.distance(a, b);
                if best.map_or(true, |(_, _, bd)| d < bd) {
                    best = Some((a, b, d));
                }
            }
        }
        best
    }

    fn merge(&mut self, a: usize, b: usize, distance: f64) -> Option<Merge> {
        let row: Vec<f64> = (0..self.slots.len())
            .map(|k| {
                if self.slots[k].is_some() && k != a && k != b {
                    self.distance(a, k).min(self.distance(b, k))
                } else {
                    f64::INFINITY
                }
            })
            .collect();

        let node_a = self.slots[a].take()?;
        let node_b = self.slots[b].take()?;
        let (node, collapsed) = ClusterNode::merge(node_a, node_b, distance);
        let size = node.len();

        self.slots.push(Some(node));
        self.linkage.push(row);
        self.live -= 1;

        Some(Merge {
            cluster_a: a,
            cluster_b: b,
            distance,
            size,
            collapsed,
        })
    }

    fn into_root(mut self) -> Option<ClusterNode> {
        self.slots.iter_mut().rev().find_map(Option::take)
    }
}

/// Reduce a forest of clusters into a single tree.
///
/// Performs exactly `forest.len() - 1` merges (none for 0 or 1 clusters).
/// Usually seeded with one [`ClusterNode::leaf`] per item of `matrix`.
pub fn reduce(forest: Vec<ClusterNode>, matrix: &DissimilarityMatrix) -> Agglomeration {
    let n = forest.len();
    let mut forest = Forest::new(forest, matrix);
    let mut merges = Vec::with_capacity(n.saturating_sub(1));

    while forest.live > 1 {
        let Some(merge) = forest
            .closest_pair()
            .and_then(|(a, b, distance)| forest.merge(a, b, distance))
        else {
            break;
        };
        log::debug!(
            "merge {}: clusters {} + {} at {} -> {} items{}",
            merges.len(),
            merge.cluster_a,
            merge.cluster_b,
            merge.distance,
            merge.size,
            if merge.collapsed { " (collapsed)" } else { "" }
        );
        merges.push(merge);
    }

    Agglomeration {
        root: forest.into_root(),
        merges,
    }
}

/// Seed one leaf per item of `matrix` and reduce.
pub fn cluster(matrix: &DissimilarityMatrix) -> Agglomeration {
    let forest = (0..matrix.len()).map(ClusterNode::leaf).collect();
    reduce(forest, matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Mode;
    use crate::table::Table;
    use proptest::prelude::*;

    fn table(rows: &[&[f64]]) -> Table {
        Table::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn ranked_table() -> Table {
        table(&[
            &[1.0, 2.0, 3.0],
            &[2.0, 3.0, 4.0],
            &[3.0, 4.0, 5.0],
            &[4.0, 5.0, 6.0],
        ])
    }

    #[test]
    fn test_worked_example_elements() {
        let m = DissimilarityMatrix::build(&ranked_table(), Mode::Elements);
        let out = cluster(&m);
        let root = out.root.unwrap();

        assert_eq!(out.merges.len(), 3);
        // (0,1), (1,2) and (2,3) all tie at 3: the first enumerated pair wins.
        assert_eq!((out.merges[0].cluster_a, out.merges[0].cluster_b), (0, 1));
        assert_eq!((out.merges[1].cluster_a, out.merges[1].cluster_b), (2, 3));
        assert_eq!((out.merges[2].cluster_a, out.merges[2].cluster_b), (4, 5));
        assert!(out.merges.iter().all(|m| m.distance == 3.0));
        assert!(out.merges[2].collapsed);

        let mut covered = root.elements().to_vec();
        covered.sort_unstable();
        assert_eq!(covered, vec![0, 1, 2, 3]);

        assert_eq!(root.height(), 3.0);
        assert_eq!(root.children().len(), 4);
        assert_eq!(root.label(&["0", "1", "2", "3"]), "[0, 1, 2, 3]");
    }

    #[test]
    fn test_worked_example_features() {
        let m = DissimilarityMatrix::build(&ranked_table(), Mode::Features);
        let out = cluster(&m);
        let root = out.root.unwrap();

        // (A, B) merge at 4 and move behind C, so C leads the flattened root.
        assert_eq!(out.merges.len(), 2);
        assert_eq!((out.merges[0].cluster_a, out.merges[0].cluster_b), (0, 1));
        assert!(!out.merges[0].collapsed);
        assert_eq!((out.merges[1].cluster_a, out.merges[1].cluster_b), (2, 3));
        assert!(out.merges[1].collapsed);

        assert_eq!(root.height(), 4.0);
        assert_eq!(root.elements(), &[2, 0, 1]);
        assert_eq!(root.label(&["A", "B", "C"]), "[C, A, B]");
    }

    #[test]
    fn test_merged_cluster_moves_to_end_of_forest() {
        // d01 = 1, d12 = 2, d02 = 3, d23 = 3, d13 = 5, d03 = 6
        let m = DissimilarityMatrix::build(&table(&[&[0.0], &[1.0], &[3.0], &[6.0]]), Mode::Elements);
        let out = cluster(&m);
        let root = out.root.unwrap();

        assert_eq!(out.merges.iter().map(|m| m.distance).collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
        assert!(out.merges.iter().all(|m| !m.collapsed));
        assert_eq!(root.label(&["a", "b", "c", "d"]), "[d, [c, [a, b]]]");
        assert_eq!(root.position(), (3, 3.0));
    }

    #[test]
    fn test_single_item() {
        let m = DissimilarityMatrix::build(&table(&[&[1.0, 2.0]]), Mode::Elements);
        let out = cluster(&m);
        assert!(out.merges.is_empty());
        assert_eq!(out.root, Some(ClusterNode::leaf(0)));
    }

    #[test]
    fn test_empty_forest() {
        let m = DissimilarityMatrix::build(&table(&[&[1.0]]), Mode::Elements);
        let out = reduce(Vec::new(), &m);
        assert!(out.root.is_none());
        assert!(out.merges.is_empty());
    }

    #[test]
    fn test_duplicate_items_merge_at_zero() {
        let m = DissimilarityMatrix::build(&table(&[&[2.0], &[2.0], &[5.0]]), Mode::Elements);
        let out = cluster(&m);
        assert_eq!(out.merges[0].distance, 0.0);
        // Leaves sit at height 0, so the zero-distance merge flattens them.
        assert!(out.merges[0].collapsed);
        let root = out.root.unwrap();
        assert_eq!(root.label(&["x", "y", "z"]), "[z, [x, y]]");
    }

    #[test]
    fn test_single_linkage_uses_nearest_members() {
        let m = DissimilarityMatrix::build(&ranked_table(), Mode::Elements);
        let (ab, _) = ClusterNode::merge(ClusterNode::leaf(0), ClusterNode::leaf(1), 3.0);
        assert_eq!(single_linkage(&ab, &ClusterNode::leaf(3), &m), 6.0);
        assert_eq!(single_linkage(&ClusterNode::leaf(3), &ab, &m), 6.0);
    }

    fn table_strategy() -> impl Strategy<Value = Table> {
        (1usize..5)
            .prop_flat_map(|cols| {
                proptest::collection::vec(proptest::collection::vec(0i32..5, cols), 1..10)
            })
            .prop_map(|rows| {
                Table::new(
                    rows.into_iter()
                        .map(|r| r.into_iter().map(f64::from).collect())
                        .collect(),
                )
                .unwrap()
            })
    }

    fn mode_strategy() -> impl Strategy<Value = Mode> {
        prop_oneof![Just(Mode::Elements), Just(Mode::Features)]
    }

    fn check_binary_monotone(node: &ClusterNode) -> bool {
        let here = node.children().len() != 2
            || node.children().iter().all(|c| c.height() <= node.height());
        here && node.children().iter().all(check_binary_monotone)
    }

    proptest! {
        #[test]
        fn reduce_covers_every_item_once(table in table_strategy(), mode in mode_strategy()) {
            let m = DissimilarityMatrix::build(&table, mode);
            let n = m.len();
            let out = cluster(&m);
            prop_assert_eq!(out.merges.len(), n - 1);

            let root = out.root.unwrap();
            let mut covered = root.elements().to_vec();
            covered.sort_unstable();
            prop_assert_eq!(covered, (0..n).collect::<Vec<_>>());

            let mut leaves = root.leaves();
            leaves.sort_unstable();
            prop_assert_eq!(leaves, (0..n).collect::<Vec<_>>());
        }

        #[test]
        fn reduce_is_deterministic(table in table_strategy(), mode in mode_strategy()) {
            let m = DissimilarityMatrix::build(&table, mode);
            prop_assert_eq!(cluster(&m), cluster(&m));
        }

        #[test]
        fn binary_merges_are_height_monotone(table in table_strategy(), mode in mode_strategy()) {
            let m = DissimilarityMatrix::build(&table, mode);
            let root = cluster(&m).root.unwrap();
            prop_assert!(check_binary_monotone(&root));
        }

        #[test]
        fn merge_heights_never_decrease(table in table_strategy(), mode in mode_strategy()) {
            let m = DissimilarityMatrix::build(&table, mode);
            let merges = cluster(&m).merges;
            for w in merges.windows(2) {
                prop_assert!(w[0].distance <= w[1].distance);
            }
        }

        #[test]
        fn merge_heights_match_kodama_single_linkage(
            table in table_strategy(),
            mode in mode_strategy(),
        ) {
            let m = DissimilarityMatrix::build(&table, mode);
            prop_assume!(m.len() >= 2);
            let ours: Vec<f64> = cluster(&m).merges.iter().map(|x| x.distance).collect();

            let mut condensed = m.condensed().to_vec();
            let dend = kodama::linkage(&mut condensed, m.len(), kodama::Method::Single);
            let mut theirs: Vec<f64> = dend.steps().iter().map(|s| s.dissimilarity).collect();
            theirs.sort_by(|a, b| a.total_cmp(b));

            prop_assert_eq!(ours, theirs);
        }
    }
}
