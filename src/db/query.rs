//! Spatio-temporal window queries.

use super::FnrTree;
use crate::compute::rtree::SearchMode;
use fnrtree_types::bbox::SpatialBox;
use fnrtree_types::interval::TimeInterval;
use fnrtree_types::segment::Segment;
use fnrtree_types::trajectory::QueryWindow;
use std::collections::BTreeSet;
use std::fmt::Debug;
use std::ops::ControlFlow;

impl<Id: Clone + Ord + Debug> FnrTree<Id> {
    /// Ids of the objects that travelled a segment crossing the rectangle
    /// `(x1, y1)-(x2, y2)` during a trip overlapping `[t0, t1]`.
    ///
    /// The rectangle corners may be given in any order. A candidate segment
    /// counts only if its actual line, not just its box, reaches into the
    /// rectangle.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fnrtree::FnrTree;
    ///
    /// let mut index: FnrTree<u32> = FnrTree::new();
    /// index.register_segment(0, 10, 10, 0, "Descending Ave");
    /// index.insert_trip(1, 0, 10, 10, 0, 0.0, 10.0);
    ///
    /// // Touches the box of the segment, misses the segment itself.
    /// assert!(index.query(0, 0, 2, 2, 0.0, 10.0).is_empty());
    /// assert_eq!(index.query(4, 4, 6, 6, 0.0, 10.0).len(), 1);
    /// ```
    pub fn query(&self, x1: i32, y1: i32, x2: i32, y2: i32, t0: f64, t1: f64) -> BTreeSet<Id> {
        self.query_box(
            &Segment::new(x1, y1, x2, y2).canonical_box(),
            &TimeInterval::new(t0, t1),
        )
    }

    /// Same as [`query`](Self::query) for a `geo::Rect`.
    pub fn query_rect(&self, rect: geo::Rect<i32>, t0: f64, t1: f64) -> BTreeSet<Id> {
        self.query_box(&SpatialBox::from(rect), &TimeInterval::new(t0, t1))
    }

    /// Same as [`query`](Self::query) for a [`QueryWindow`].
    pub fn query_window(&self, window: &QueryWindow) -> BTreeSet<Id> {
        self.query_box(&window.spatial_box(), &window.time_window())
    }

    fn query_box(&self, window: &SpatialBox, period: &TimeInterval) -> BTreeSet<Id> {
        self.queries.set(self.queries.get() + 1);

        let period = period.to_box();
        let mut objects = BTreeSet::new();
        let mut candidates = 0;
        self.spatial.search(window, SearchMode::Overlap, |_, segment| {
            candidates += 1;
            if !segment.segment().intersects_rect(window) {
                return ControlFlow::Continue(());
            }
            segment.trips.search(&period, SearchMode::Overlap, |_, trip| {
                objects.insert(trip.object_id.clone());
                ControlFlow::Continue(())
            });
            ControlFlow::Continue(())
        });

        log::trace!(
            "window {:?} during {:?}: {} candidate segments, {} objects",
            window,
            period,
            candidates,
            objects.len()
        );
        objects
    }
}
