//! Generic balanced box tree (Guttman R-tree, quadratic split).
//!
//! The tree is generic over the payload `T`, the coordinate type `C` and the
//! number of dimensions `D`. The FNR index instantiates it twice: once over
//! 2-D integer segment boxes and once per segment over 1-D time intervals.
//!
//! ## Layout
//!
//! Nodes live in an arena and refer to each other by id. Every node records
//! its parent, so the upward passes after an insert or a removal are plain
//! id lookups. Internal entries cache the box of their child; the cache is
//! refreshed on the way back up.
//!
//! ## Example
//!
//! ```rust
//! use fnrtree::compute::rtree::{RTree, SearchMode};
//! use fnrtree_types::bbox::Mbr;
//! use std::ops::ControlFlow;
//!
//! let mut tree: RTree<&str, i32, 2> = RTree::new();
//! tree.insert("a", Mbr::new([0, 0], [10, 10]));
//! tree.insert("b", Mbr::new([20, 20], [30, 30]));
//!
//! let mut hits = Vec::new();
//! let visited = tree.search(&Mbr::new([5, 5], [6, 6]), SearchMode::Overlap, |_, name| {
//!     hits.push(*name);
//!     ControlFlow::Continue(())
//! });
//! assert_eq!(visited, 1);
//! assert_eq!(hits, vec!["a"]);
//! assert_eq!(tree.find(&Mbr::new([20, 20], [30, 30])), Some(&"b"));
//! ```

mod node;
mod search;
mod split;


pub use search::{SearchIter, SearchMode};

use crate::error::{FnrError, Result};
use crate::types::NodeCapacity;
use fnrtree_types::bbox::{Coordinate, Mbr};
use node::{Arena, ChildEntry, Entries, LeafEntry, Node, NodeId, NodeKind};
use split::quadratic_split;
use std::ops::ControlFlow;

/// A balanced tree of boxes carrying payloads of type `T`.
#[derive(Debug)]
pub struct RTree<T, C: Coordinate, const D: usize> {
    capacity: NodeCapacity,
    nodes: Arena<T, C, D>,
    root: NodeId,
    len: usize,
}

impl<T, C: Coordinate, const D: usize> Default for RTree<T, C, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Coordinate, const D: usize> RTree<T, C, D> {
    /// Empty tree with the default fanout of 8 entries per node.
    pub fn new() -> Self {
        Self::with_valid_capacity(NodeCapacity::default())
    }

    /// Empty tree with a custom fanout.
    ///
    /// # Errors
    ///
    /// Returns [`FnrError::InvalidConfig`] if the capacity does not allow a
    /// split to leave both halves at least `min_entries` full.
    pub fn with_node_capacity(capacity: NodeCapacity) -> Result<Self> {
        capacity.validate().map_err(FnrError::InvalidConfig)?;
        Ok(Self::with_valid_capacity(capacity))
    }

    /// Empty tree for a capacity the caller has already validated.
    pub(crate) fn with_valid_capacity(capacity: NodeCapacity) -> Self {
        debug_assert!(capacity.validate().is_ok(), "unvalidated capacity {:?}", capacity);
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::leaf(None, capacity.max_entries));
        Self {
            capacity,
            nodes,
            root,
            len: 0,
        }
    }

    pub fn node_capacity(&self) -> NodeCapacity {
        self.capacity
    }

    /// Number of stored payloads.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels; a tree whose root is a leaf has height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut id = self.root;
        while let NodeKind::Internal(children) = &self.nodes[id].kind
            && let Some(first) = children.first()
        {
            id = first.child;
            height += 1;
        }
        height
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Box of the root, the all-zero box when the tree is empty.
    pub fn bounds(&self) -> Mbr<C, D> {
        self.nodes[self.root].mbr
    }

    /// Insert `payload` under `mbr`.
    ///
    /// The box is stored as given. Several payloads may share a box.
    pub fn insert(&mut self, payload: T, mbr: Mbr<C, D>) {
        let leaf = self.choose_leaf(&mbr);
        let sibling = self.add_to_leaf(leaf, LeafEntry { payload, mbr });
        self.correct_tree(leaf, sibling);
        self.len += 1;
    }

    /// Visit every entry selected by `query` under `mode`.
    ///
    /// The visitor may stop the traversal by returning `ControlFlow::Break`.
    /// Returns the number of times the visitor ran.
    pub fn search<F>(&self, query: &Mbr<C, D>, mode: SearchMode, mut visit: F) -> usize
    where
        F: FnMut(&Mbr<C, D>, &T) -> ControlFlow<()>,
    {
        let mut visited = 0;
        for (mbr, payload) in self.search_iter(query, mode) {
            visited += 1;
            if visit(mbr, payload).is_break() {
                break;
            }
        }
        visited
    }

    /// Lazy form of [`search`](Self::search).
    pub fn search_iter(&self, query: &Mbr<C, D>, mode: SearchMode) -> SearchIter<'_, T, C, D> {
        SearchIter::new(&self.nodes, self.root, *query, mode)
    }

    /// Like [`search`](Self::search), with mutable access to the payloads.
    ///
    /// Boxes cannot be changed through this call, so the structure of the
    /// tree stays valid whatever the visitor does.
    pub fn search_mut<F>(&mut self, query: &Mbr<C, D>, mode: SearchMode, mut visit: F) -> usize
    where
        F: FnMut(&Mbr<C, D>, &mut T) -> ControlFlow<()>,
    {
        let mut visited = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match &mut self.nodes[id].kind {
                NodeKind::Leaf(entries) => {
                    for entry in entries.iter_mut() {
                        if !mode.admits(&entry.mbr, query) {
                            continue;
                        }
                        visited += 1;
                        if visit(&entry.mbr, &mut entry.payload).is_break() {
                            return visited;
                        }
                    }
                }
                NodeKind::Internal(children) => stack.extend(
                    children
                        .iter()
                        .rev()
                        .filter(|c| mode.admits(&c.mbr, query))
                        .map(|c| c.child),
                ),
            }
        }
        visited
    }

    /// First payload stored under a box equal to `mbr`.
    pub fn find(&self, mbr: &Mbr<C, D>) -> Option<&T> {
        self.search_iter(mbr, SearchMode::Containing)
            .find(|(stored, _)| *stored == mbr)
            .map(|(_, payload)| payload)
    }

    /// Every stored `(box, payload)` pair, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Mbr<C, D>, &T)> {
        self.nodes
            .iter()
            .flat_map(|node| match &node.kind {
                NodeKind::Leaf(entries) => entries.iter(),
                NodeKind::Internal(_) => Default::default(),
            })
            .map(|entry| (&entry.mbr, &entry.payload))
    }

    /// Approximate bytes held by the tree.
    ///
    /// Counts the tree header, every node with its entries, and whatever
    /// `payload_heap` reports for each payload's own heap allocations.
    pub fn memory_size<F>(&self, payload_heap: F) -> usize
    where
        F: Fn(&T) -> usize,
    {
        let nodes: usize = self.nodes.iter().map(Node::footprint).sum();
        let heap: usize = self.iter().map(|(_, payload)| payload_heap(payload)).sum();
        std::mem::size_of::<Self>() + nodes + heap
    }

    /// Walk the whole tree and verify its structure.
    ///
    /// Checks parent links, fill bounds, that every node box is the union of
    /// its entries, that cached child boxes are current, that all leaves sit
    /// at the same depth and that the payload count matches [`len`](Self::len).
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |msg: String| FnrError::InvariantViolation(msg);
        let NodeCapacity {
            max_entries,
            min_entries,
        } = self.capacity;

        let root = self
            .nodes
            .get(self.root)
            .ok_or_else(|| violation(format!("root {:?} is not allocated", self.root)))?;
        if root.parent.is_some() {
            return Err(violation("root has a parent".to_string()));
        }

        let mut leaf_depth = None;
        let mut payloads = 0;
        let mut reachable = 0;
        let mut stack = vec![(self.root, 1_usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = self
                .nodes
                .get(id)
                .ok_or_else(|| violation(format!("dangling node id {:?}", id)))?;
            reachable += 1;

            if node.len() > max_entries {
                return Err(violation(format!(
                    "node {:?} holds {} entries, more than {}",
                    id,
                    node.len(),
                    max_entries
                )));
            }
            if id != self.root && node.len() < min_entries {
                return Err(violation(format!(
                    "node {:?} holds {} entries, fewer than {}",
                    id,
                    node.len(),
                    min_entries
                )));
            }
            if node.mbr != node.entries_mbr() {
                return Err(violation(format!(
                    "node {:?} box {:?} is not the union of its entries",
                    id, node.mbr
                )));
            }

            match &node.kind {
                NodeKind::Leaf(entries) => {
                    payloads += entries.len();
                    match leaf_depth {
                        None => leaf_depth = Some(depth),
                        Some(expected) if expected != depth => {
                            return Err(violation(format!(
                                "leaf {:?} at depth {}, expected {}",
                                id, depth, expected
                            )));
                        }
                        Some(_) => {}
                    }
                }
                NodeKind::Internal(children) => {
                    if children.is_empty() {
                        return Err(violation(format!("internal node {:?} has no children", id)));
                    }
                    for entry in children {
                        let child = self
                            .nodes
                            .get(entry.child)
                            .ok_or_else(|| violation(format!("dangling child id {:?}", entry.child)))?;
                        if child.parent != Some(id) {
                            return Err(violation(format!(
                                "child {:?} points to parent {:?}, expected {:?}",
                                entry.child, child.parent, id
                            )));
                        }
                        if child.mbr != entry.mbr {
                            return Err(violation(format!(
                                "cached box of child {:?} is stale",
                                entry.child
                            )));
                        }
                        stack.push((entry.child, depth + 1));
                    }
                }
            }
        }

        if payloads != self.len {
            return Err(violation(format!(
                "found {} payloads, length says {}",
                payloads, self.len
            )));
        }
        if reachable != self.nodes.len() {
            return Err(violation(format!(
                "{} nodes reachable, {} allocated",
                reachable,
                self.nodes.len()
            )));
        }
        Ok(())
    }

    /// Leaf whose box grows least when extended by `mbr`. Ties go to the
    /// last child with the least growth.
    fn choose_leaf(&self, mbr: &Mbr<C, D>) -> NodeId {
        let mut id = self.root;
        loop {
            let NodeKind::Internal(children) = &self.nodes[id].kind else {
                return id;
            };
            let mut best: Option<(NodeId, C::Area)> = None;
            for entry in children {
                let growth = entry.mbr.enlargement(mbr);
                if best.is_none_or(|(_, least)| growth <= least) {
                    best = Some((entry.child, growth));
                }
            }
            match best {
                Some((child, _)) => id = child,
                None => return id,
            }
        }
    }

    /// Append `entry` to `leaf`, splitting it when full. Returns the new
    /// sibling produced by a split.
    fn add_to_leaf(&mut self, leaf: NodeId, entry: LeafEntry<T, C, D>) -> Option<NodeId> {
        let NodeCapacity {
            max_entries,
            min_entries,
        } = self.capacity;
        let node = &mut self.nodes[leaf];
        let NodeKind::Leaf(entries) = &mut node.kind else {
            unreachable!("choose_leaf returned internal node {:?}", leaf);
        };

        if entries.len() < max_entries {
            node.mbr = if entries.is_empty() {
                entry.mbr
            } else {
                node.mbr.union(&entry.mbr)
            };
            entries.push(entry);
            return None;
        }

        let mut candidates: Vec<_> = entries.drain(..).collect();
        candidates.push(entry);
        let (keep, moved) = quadratic_split(candidates, min_entries);
        entries.extend(keep.entries);
        node.mbr = keep.mbr;

        let sibling = Node {
            parent: node.parent,
            mbr: moved.mbr,
            kind: NodeKind::Leaf(moved.entries.into_iter().collect::<Entries<_>>()),
        };
        let sibling = self.nodes.alloc(sibling);
        log::trace!("split leaf {:?} into {:?}", leaf, sibling);
        Some(sibling)
    }

    /// Append a child reference to `parent`, splitting it when full. Returns
    /// the new sibling produced by a split.
    fn add_child(&mut self, parent: NodeId, entry: ChildEntry<C, D>) -> Option<NodeId> {
        let NodeCapacity {
            max_entries,
            min_entries,
        } = self.capacity;
        self.nodes[entry.child].parent = Some(parent);
        let node = &mut self.nodes[parent];
        let NodeKind::Internal(children) = &mut node.kind else {
            unreachable!("node {:?} gained a child but is a leaf", parent);
        };

        if children.len() < max_entries {
            node.mbr = if children.is_empty() {
                entry.mbr
            } else {
                node.mbr.union(&entry.mbr)
            };
            children.push(entry);
            return None;
        }

        let mut candidates: Vec<_> = children.drain(..).collect();
        candidates.push(entry);
        let (keep, moved) = quadratic_split(candidates, min_entries);
        children.extend(keep.entries);
        node.mbr = keep.mbr;

        let sibling = Node {
            parent: node.parent,
            mbr: moved.mbr,
            kind: NodeKind::Internal(moved.entries.iter().copied().collect()),
        };
        let sibling = self.nodes.alloc(sibling);
        for moved_child in &moved.entries {
            self.nodes[moved_child.child].parent = Some(sibling);
        }
        log::trace!("split internal node {:?} into {:?}", parent, sibling);
        Some(sibling)
    }

    /// Propagate a change at `node` up to the root: refresh cached boxes,
    /// place a pending split sibling, and grow a new root if the old one split.
    fn correct_tree(&mut self, mut node: NodeId, mut sibling: Option<NodeId>) {
        while let Some(parent) = self.nodes[node].parent {
            let mbr = self.nodes[node].mbr;
            self.nodes[parent].refresh_child(node, mbr);
            self.nodes[parent].recompute_mbr();
            sibling = sibling.and_then(|sib| {
                let mbr = self.nodes[sib].mbr;
                self.add_child(parent, ChildEntry { child: sib, mbr })
            });
            node = parent;
        }

        if let Some(sibling) = sibling {
            self.grow_root(node, sibling);
        }
    }

    fn grow_root(&mut self, old_root: NodeId, sibling: NodeId) {
        let left = ChildEntry {
            child: old_root,
            mbr: self.nodes[old_root].mbr,
        };
        let right = ChildEntry {
            child: sibling,
            mbr: self.nodes[sibling].mbr,
        };
        let mut children = Entries::with_capacity(self.capacity.max_entries);
        children.push(left);
        children.push(right);
        let root = self.nodes.alloc(Node {
            parent: None,
            mbr: left.mbr.union(&right.mbr),
            kind: NodeKind::Internal(children),
        });
        self.nodes[old_root].parent = Some(root);
        self.nodes[sibling].parent = Some(root);
        self.root = root;
        log::trace!("grew new root {:?}, height now {}", root, self.height());
    }
}

impl<T: PartialEq, C: Coordinate, const D: usize> RTree<T, C, D> {
    /// Remove one payload equal to `payload` stored under a box equal to `mbr`.
    ///
    /// Nodes left under-full are dissolved and their payloads inserted again.
    /// Returns `false`, leaving the tree untouched, when no such entry exists.
    pub fn remove(&mut self, mbr: &Mbr<C, D>, payload: &T) -> bool {
        let Some((leaf, position)) = self.locate(mbr, payload) else {
            return false;
        };
        if let NodeKind::Leaf(entries) = &mut self.nodes[leaf].kind {
            entries.remove(position);
        }
        self.len -= 1;

        let orphans = self.condense_tree(leaf);
        if !orphans.is_empty() {
            log::trace!("reinserting {} orphaned entries", orphans.len());
        }
        self.len -= orphans.len();
        for orphan in orphans {
            self.insert(orphan.payload, orphan.mbr);
        }
        true
    }

    /// Leaf and position of the entry matching both box and payload.
    fn locate(&self, mbr: &Mbr<C, D>, payload: &T) -> Option<(NodeId, usize)> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match &self.nodes[id].kind {
                NodeKind::Leaf(entries) => {
                    if let Some(position) = entries
                        .iter()
                        .position(|e| e.mbr == *mbr && e.payload == *payload)
                    {
                        return Some((id, position));
                    }
                }
                NodeKind::Internal(children) => stack.extend(
                    children
                        .iter()
                        .rev()
                        .filter(|c| c.mbr.contains(mbr))
                        .map(|c| c.child),
                ),
            }
        }
        None
    }

    /// Walk up from `leaf` after a removal. Under-full nodes are cut loose and
    /// their payloads returned for reinsertion; the rest get fresh boxes.
    fn condense_tree(&mut self, leaf: NodeId) -> Vec<LeafEntry<T, C, D>> {
        let mut orphans = Vec::new();
        let mut id = leaf;
        while let Some(parent) = self.nodes[id].parent {
            if self.nodes[id].len() < self.capacity.min_entries {
                self.nodes[parent].detach_child(id);
                self.collect_subtree(id, &mut orphans);
                log::trace!("dissolved under-full node {:?}", id);
            } else {
                self.nodes[id].recompute_mbr();
                let mbr = self.nodes[id].mbr;
                self.nodes[parent].refresh_child(id, mbr);
            }
            id = parent;
        }

        self.nodes[id].recompute_mbr();
        self.shrink_root();
        orphans
    }

    /// Free every node below and including `id`, collecting its payloads.
    fn collect_subtree(&mut self, id: NodeId, out: &mut Vec<LeafEntry<T, C, D>>) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.release(id) else {
                continue;
            };
            match node.kind {
                NodeKind::Leaf(entries) => out.extend(entries),
                NodeKind::Internal(children) => stack.extend(children.iter().map(|c| c.child)),
            }
        }
    }

    /// Drop internal roots with a single child, and turn an internal root
    /// with no children back into an empty leaf.
    fn shrink_root(&mut self) {
        loop {
            let root = self.root;
            let (count, first) = match &self.nodes[root].kind {
                NodeKind::Leaf(_) => return,
                NodeKind::Internal(children) => (children.len(), children.first().map(|c| c.child)),
            };
            match (count, first) {
                (1, Some(child)) => {
                    self.nodes.release(root);
                    self.nodes[child].parent = None;
                    self.root = child;
                    log::trace!("root shrank to {:?}", child);
                }
                (0, _) => {
                    self.nodes[root] = Node::leaf(None, self.capacity.max_entries);
                    return;
                }
                _ => return,
            }
        }
    }
}
