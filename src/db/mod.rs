//! The two-level FNR index.
//!
//! This module defines [`FnrTree`]: a spatial R-tree over the boxes of road
//! segments in which every segment owns a private temporal R-tree over the
//! time intervals of the trips that travelled it.
//!
//! - `network`: segment registration and [`SegmentEntry`]
//! - `trips`: attaching a trip to the segment it travelled
//! - `query`: window queries

use crate::compute::rtree::RTree;
use crate::error::{FnrError, Result};
use crate::types::{Config, IndexStats};
use std::cell::Cell;
use std::fmt::Debug;

mod network;
mod query;
mod trips;

pub use network::{SegmentEntry, TripsDuring};
pub use trips::TripEntry;

/// Fixed Network R-tree over a road network and the trips travelled on it.
///
/// Segments are registered once, then trips are attached to the segment
/// whose box they match exactly, and window queries return the set of object
/// ids seen inside a rectangle during a time window.
///
/// `FnrTree` is single-threaded. Queries take `&self`; the only state they
/// touch is a query counter reported by [`stats`](Self::stats).
///
/// # Examples
///
/// ```rust
/// use fnrtree::FnrTree;
///
/// let mut index: FnrTree<i64> = FnrTree::new();
/// index.register_segment(0, 0, 10, 0, "Main St");
/// assert!(index.insert_trip(7, 0, 0, 10, 0, 1.0, 5.0));
///
/// let seen = index.query(0, -1, 10, 1, 2.0, 3.0);
/// assert!(seen.contains(&7));
/// ```
#[derive(Debug)]
pub struct FnrTree<Id = i64> {
    config: Config,
    spatial: RTree<SegmentEntry<Id>, i32, 2>,
    stats: IndexStats,
    queries: Cell<u64>,
}

impl<Id: Clone + Ord + Debug> Default for FnrTree<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Clone + Ord + Debug> FnrTree<Id> {
    /// Empty index with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(Config::default())
    }

    /// Empty index with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FnrError::InvalidConfig`] if either node capacity is invalid.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().map_err(FnrError::InvalidConfig)?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: Config) -> Self {
        Self {
            spatial: RTree::with_valid_capacity(config.spatial),
            config,
            stats: IndexStats::new(),
            queries: Cell::new(0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of registered segments.
    pub fn segment_count(&self) -> usize {
        self.spatial.len()
    }

    /// Number of trips stored across all segments.
    pub fn trip_count(&self) -> usize {
        self.stats.trips
    }

    /// Registered segments, in no particular order.
    pub fn segments(&self) -> impl Iterator<Item = &SegmentEntry<Id>> {
        self.spatial.iter().map(|(_, segment)| segment)
    }

    /// Approximate bytes held by the index, both levels included.
    ///
    /// Grows with every registered segment and every stored trip. Object ids
    /// are counted by their inline size only.
    pub fn memory_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.spatial.memory_size(SegmentEntry::heap_size)
    }

    /// Snapshot of the index counters and sizes.
    pub fn stats(&self) -> IndexStats {
        let mut stats = self.stats.clone();
        stats.queries = self.queries.get();
        stats.spatial_nodes = self.spatial.node_count();
        stats.temporal_nodes = self.segments().map(|s| s.trips.node_count()).sum();
        stats.memory_bytes = self.memory_size();
        stats
    }

    /// Verify the structure of the spatial tree and of every temporal tree.
    pub fn check_invariants(&self) -> Result<()> {
        self.spatial.check_invariants()?;
        for (stored, segment) in self.spatial.iter() {
            if *stored != segment.mbr {
                return Err(FnrError::InvariantViolation(format!(
                    "segment {:?} stored under {:?} but spans {:?}",
                    segment.name, stored, segment.mbr
                )));
            }
            segment.trips.check_invariants().map_err(|e| match e {
                FnrError::InvariantViolation(msg) => {
                    FnrError::InvariantViolation(format!("segment {:?}: {}", segment.name, msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}
