//! Road segment registration.

use super::FnrTree;
use super::trips::TripEntry;
use crate::compute::rtree::{RTree, SearchIter, SearchMode};
use crate::types::NodeCapacity;
use fnrtree_types::bbox::SpatialBox;
use fnrtree_types::interval::TimeInterval;
use fnrtree_types::segment::{Orientation, Segment};
use std::fmt::Debug;

/// A registered road segment and the trips that travelled it.
///
/// The segment is kept as its canonical box plus the [`Orientation`] flag
/// telling which diagonal of the box it runs along.
#[derive(Debug)]
pub struct SegmentEntry<Id> {
    pub(super) name: String,
    pub(super) mbr: SpatialBox,
    pub(super) orientation: Orientation,
    pub(super) trips: RTree<TripEntry<Id>, f64, 1>,
}

impl<Id> SegmentEntry<Id> {
    fn new(segment: &Segment, name: String, capacity: NodeCapacity) -> Self {
        Self {
            name,
            mbr: segment.canonical_box(),
            orientation: segment.orientation(),
            trips: RTree::with_valid_capacity(capacity),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mbr(&self) -> &SpatialBox {
        &self.mbr
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The segment rebuilt from its box and orientation, endpoints ordered
    /// left to right.
    pub fn segment(&self) -> Segment {
        self.orientation.diagonal(&self.mbr)
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    /// Every trip on this segment, in no particular order.
    pub fn trips(&self) -> impl Iterator<Item = &TripEntry<Id>> {
        self.trips.iter().map(|(_, trip)| trip)
    }

    /// Trips whose interval shares an instant with `window`.
    pub fn trips_during(&self, window: &TimeInterval) -> TripsDuring<'_, Id> {
        TripsDuring {
            inner: self.trips.search_iter(&window.to_box(), SearchMode::Overlap),
        }
    }

    pub(super) fn add_trip(&mut self, trip: TripEntry<Id>) {
        let mbr = trip.interval.to_box();
        self.trips.insert(trip, mbr);
    }

    /// Heap bytes owned by the entry: its name and its temporal tree.
    pub(super) fn heap_size(&self) -> usize {
        self.name.capacity() + self.trips.memory_size(|_| 0) - std::mem::size_of_val(&self.trips)
    }
}

/// Iterator returned by [`SegmentEntry::trips_during`].
#[derive(Debug)]
pub struct TripsDuring<'a, Id> {
    inner: SearchIter<'a, TripEntry<Id>, f64, 1>,
}

impl<'a, Id> Iterator for TripsDuring<'a, Id> {
    type Item = &'a TripEntry<Id>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, trip)| trip)
    }
}

impl<Id: Clone + Ord + Debug> FnrTree<Id> {
    /// Register the road segment `(x1, y1) -> (x2, y2)` under `name`.
    ///
    /// The segment is indexed by its canonical box. Registering the same
    /// endpoints twice creates two entries; trips go to the first one found.
    ///
    /// # Arguments
    ///
    /// * `x1`, `y1` - First endpoint
    /// * `x2`, `y2` - Second endpoint
    /// * `name` - Display name, typically the road name
    pub fn register_segment(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, name: impl Into<String>) {
        let segment = Segment::new(x1, y1, x2, y2);
        let entry = SegmentEntry::new(&segment, name.into(), self.config.temporal);
        log::debug!(
            "registering segment {:?} at {:?} ({:?})",
            entry.name,
            entry.mbr,
            entry.orientation
        );
        let mbr = entry.mbr;
        self.spatial.insert(entry, mbr);
        self.stats.record_segment();
    }

    /// Same as [`register_segment`](Self::register_segment), taking a [`Segment`].
    pub fn register(&mut self, segment: &Segment, name: impl Into<String>) {
        self.register_segment(segment.x1, segment.y1, segment.x2, segment.y2, name);
    }

    /// First segment registered with exactly the box spanned by the given
    /// endpoints, in either order.
    pub fn find_segment(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> Option<&SegmentEntry<Id>> {
        self.spatial.find(&Segment::new(x1, y1, x2, y2).canonical_box())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnrtree_types::bbox::Mbr;

    #[test]
    fn test_register_stores_canonical_box_and_orientation() {
        let mut index: FnrTree = FnrTree::new();
        index.register_segment(10, 0, 0, 10, "Diagonal Rd");
        let entry = index.find_segment(0, 0, 10, 10).unwrap();
        assert_eq!(entry.name(), "Diagonal Rd");
        assert_eq!(entry.mbr(), &Mbr::new([0, 0], [10, 10]));
        assert_eq!(entry.orientation(), Orientation::Descending);
        assert_eq!(entry.segment(), Segment::new(0, 10, 10, 0));
        assert_eq!(entry.trip_count(), 0);
    }

    #[test]
    fn test_ascending_orientation() {
        let mut index: FnrTree = FnrTree::new();
        index.register_segment(0, 0, 10, 10, "Up");
        let entry = index.find_segment(0, 0, 10, 10).unwrap();
        assert_eq!(entry.orientation(), Orientation::Ascending);
    }

    #[test]
    fn test_duplicate_segments_are_kept() {
        let mut index: FnrTree = FnrTree::new();
        index.register_segment(0, 0, 5, 0, "first");
        index.register_segment(5, 0, 0, 0, "second");
        assert_eq!(index.segment_count(), 2);
        let mut names: Vec<_> = index.segments().map(|s| s.name().to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_register_from_segment_value() {
        let mut index: FnrTree = FnrTree::new();
        index.register(&Segment::new(3, 4, 3, 9), "vertical");
        assert!(index.find_segment(3, 9, 3, 4).is_some());
        assert!(index.find_segment(3, 4, 3, 8).is_none());
    }

    #[test]
    fn test_trips_during_window() {
        let mut index: FnrTree<u8> = FnrTree::new();
        index.register_segment(0, 0, 10, 0, "road");
        for (id, enter) in [(1_u8, 0.0), (2, 10.0), (3, 20.0)] {
            assert!(index.insert_trip(id, 0, 0, 10, 0, enter, enter + 5.0));
        }
        let entry = index.find_segment(0, 0, 10, 0).unwrap();
        let mut ids: Vec<u8> = entry
            .trips_during(&TimeInterval::new(4.0, 11.0))
            .map(|t| t.object_id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(entry.trips().count(), 3);
    }
}
