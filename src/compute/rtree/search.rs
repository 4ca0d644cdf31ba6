//! Box search over the tree.

use super::node::{Arena, LeafEntry, NodeId, NodeKind};
use fnrtree_types::bbox::{Coordinate, Mbr};

/// How a query box selects entries.
///
/// The same predicate prunes internal nodes (tested against the cached child
/// box) and selects leaf entries, so a search never misses an entry whose
/// ancestors were pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchMode {
    /// Entries whose box shares at least one point with the query.
    #[default]
    Overlap,
    /// Entries whose box encloses the whole query.
    Containing,
}

impl SearchMode {
    /// Whether an entry (or subtree) with box `candidate` qualifies for `query`.
    #[inline]
    pub fn admits<C: Coordinate, const D: usize>(self, candidate: &Mbr<C, D>, query: &Mbr<C, D>) -> bool {
        match self {
            SearchMode::Overlap => candidate.intersects(query),
            SearchMode::Containing => candidate.contains(query),
        }
    }
}

/// Lazy depth-first search yielding `(box, payload)` for every qualifying leaf
/// entry, in entry order.
///
/// Created by [`RTree::search_iter`](super::RTree::search_iter).
pub struct SearchIter<'a, T, C: Coordinate, const D: usize> {
    nodes: &'a Arena<T, C, D>,
    query: Mbr<C, D>,
    mode: SearchMode,
    stack: Vec<NodeId>,
    leaf: std::slice::Iter<'a, LeafEntry<T, C, D>>,
}

impl<'a, T, C: Coordinate, const D: usize> SearchIter<'a, T, C, D> {
    pub(crate) fn new(nodes: &'a Arena<T, C, D>, root: NodeId, query: Mbr<C, D>, mode: SearchMode) -> Self {
        Self {
            nodes,
            query,
            mode,
            stack: vec![root],
            leaf: Default::default(),
        }
    }
}

impl<'a, T, C: Coordinate, const D: usize> Iterator for SearchIter<'a, T, C, D> {
    type Item = (&'a Mbr<C, D>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let (mode, query) = (self.mode, self.query);
        loop {
            for entry in self.leaf.by_ref() {
                if mode.admits(&entry.mbr, &query) {
                    return Some((&entry.mbr, &entry.payload));
                }
            }

            let nodes = self.nodes;
            let id = self.stack.pop()?;
            match &nodes[id].kind {
                NodeKind::Leaf(entries) => self.leaf = entries.iter(),
                NodeKind::Internal(children) => {
                    // Reversed so the first child is popped first.
                    self.stack.extend(
                        children
                            .iter()
                            .rev()
                            .filter(|c| mode.admits(&c.mbr, &query))
                            .map(|c| c.child),
                    );
                }
            }
        }
    }
}

impl<T, C: Coordinate, const D: usize> std::fmt::Debug for SearchIter<'_, T, C, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIter")
            .field("query", &self.query)
            .field("mode", &self.mode)
            .field("pending_nodes", &self.stack.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_admits_touching_boxes() {
        let query = Mbr::new([2.0], [3.0]);
        assert!(SearchMode::Overlap.admits(&Mbr::new([1.0], [5.0]), &query));
        assert!(SearchMode::Overlap.admits(&Mbr::new([3.0], [4.0]), &query));
        assert!(!SearchMode::Overlap.admits(&Mbr::new([3.5], [4.0]), &query));
    }

    #[test]
    fn test_containing_requires_enclosure() {
        let query = Mbr::new([0, 0], [10, 10]);
        assert!(SearchMode::Containing.admits(&query, &query));
        assert!(SearchMode::Containing.admits(&Mbr::new([-1, -1], [10, 10]), &query));
        assert!(!SearchMode::Containing.admits(&Mbr::new([0, 0], [9, 10]), &query));
    }

    #[test]
    fn test_default_mode_is_overlap() {
        assert_eq!(SearchMode::default(), SearchMode::Overlap);
    }
}
