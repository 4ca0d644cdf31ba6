//! Arena storage for R-tree nodes.
//!
//! Nodes never point at each other directly. Each node is addressed by a
//! [`NodeId`] into the arena and records the id of its parent, so walking
//! from a leaf back to the root is a chain of lookups instead of a search.

use fnrtree_types::bbox::{Coordinate, Mbr};
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

/// Entries kept inline before a node spills to the heap.
pub(crate) const INLINE_ENTRIES: usize = 8;

pub(crate) type Entries<E> = SmallVec<[E; INLINE_ENTRIES]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// Anything with a box that a split can distribute.
pub(crate) trait Bounded<C: Coordinate, const D: usize> {
    fn mbr(&self) -> Mbr<C, D>;
}

/// A payload stored in a leaf.
#[derive(Debug)]
pub(crate) struct LeafEntry<T, C: Coordinate, const D: usize> {
    pub payload: T,
    pub mbr: Mbr<C, D>,
}

/// A child reference stored in an internal node, with a copy of the child's box.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChildEntry<C: Coordinate, const D: usize> {
    pub child: NodeId,
    pub mbr: Mbr<C, D>,
}

impl<T, C: Coordinate, const D: usize> Bounded<C, D> for LeafEntry<T, C, D> {
    fn mbr(&self) -> Mbr<C, D> {
        self.mbr
    }
}

impl<C: Coordinate, const D: usize> Bounded<C, D> for ChildEntry<C, D> {
    fn mbr(&self) -> Mbr<C, D> {
        self.mbr
    }
}

#[derive(Debug)]
pub(crate) enum NodeKind<T, C: Coordinate, const D: usize> {
    Leaf(Entries<LeafEntry<T, C, D>>),
    Internal(Entries<ChildEntry<C, D>>),
}

#[derive(Debug)]
pub(crate) struct Node<T, C: Coordinate, const D: usize> {
    pub parent: Option<NodeId>,
    pub mbr: Mbr<C, D>,
    pub kind: NodeKind<T, C, D>,
}

impl<T, C: Coordinate, const D: usize> Node<T, C, D> {
    pub fn leaf(parent: Option<NodeId>, capacity: usize) -> Self {
        Self {
            parent,
            mbr: Mbr::empty(),
            kind: NodeKind::Leaf(Entries::with_capacity(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(entries) => entries.len(),
            NodeKind::Internal(children) => children.len(),
        }
    }

    /// Union of the entry boxes, or the empty box for a node with no entries.
    pub fn entries_mbr(&self) -> Mbr<C, D> {
        match &self.kind {
            NodeKind::Leaf(entries) => union_all(entries.iter().map(|e| e.mbr)),
            NodeKind::Internal(children) => union_all(children.iter().map(|c| c.mbr)),
        }
    }

    pub fn recompute_mbr(&mut self) {
        self.mbr = self.entries_mbr();
    }

    /// Update the cached box of `child`. Returns `false` if `child` is not
    /// referenced by this node.
    pub fn refresh_child(&mut self, child: NodeId, mbr: Mbr<C, D>) -> bool {
        if let NodeKind::Internal(children) = &mut self.kind
            && let Some(entry) = children.iter_mut().find(|c| c.child == child)
        {
            entry.mbr = mbr;
            return true;
        }
        false
    }

    /// Drop the reference to `child`, keeping the order of the other entries.
    pub fn detach_child(&mut self, child: NodeId) -> bool {
        if let NodeKind::Internal(children) = &mut self.kind
            && let Some(pos) = children.iter().position(|c| c.child == child)
        {
            children.remove(pos);
            return true;
        }
        false
    }

    /// Approximate footprint of the node and its entries, payload heap excluded.
    pub fn footprint(&self) -> usize {
        let entries = match &self.kind {
            NodeKind::Leaf(entries) => entries.len() * std::mem::size_of::<LeafEntry<T, C, D>>(),
            NodeKind::Internal(children) => children.len() * std::mem::size_of::<ChildEntry<C, D>>(),
        };
        std::mem::size_of::<Self>() + entries
    }
}

fn union_all<C: Coordinate, const D: usize>(mut boxes: impl Iterator<Item = Mbr<C, D>>) -> Mbr<C, D> {
    match boxes.next() {
        Some(first) => boxes.fold(first, |acc, b| acc.union(&b)),
        None => Mbr::empty(),
    }
}

/// Slot storage for nodes with id reuse.
#[derive(Debug)]
pub(crate) struct Arena<T, C: Coordinate, const D: usize> {
    slots: Vec<Option<Node<T, C, D>>>,
    free: Vec<NodeId>,
}

impl<T, C: Coordinate, const D: usize> Arena<T, C, D> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn alloc(&mut self, node: Node<T, C, D>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Take the node out of its slot. The id may be handed out again.
    pub fn release(&mut self, id: NodeId) -> Option<Node<T, C, D>> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id);
        Some(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<T, C, D>> {
        self.slots.get(id.0)?.as_ref()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node<T, C, D>> {
        self.slots.iter().flatten()
    }
}

impl<T, C: Coordinate, const D: usize> Index<NodeId> for Arena<T, C, D> {
    type Output = Node<T, C, D>;

    fn index(&self, id: NodeId) -> &Self::Output {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => unreachable!("stale node id {:?}", id),
        }
    }
}

impl<T, C: Coordinate, const D: usize> IndexMut<NodeId> for Arena<T, C, D> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => unreachable!("stale node id {:?}", id),
        }
    }
}
