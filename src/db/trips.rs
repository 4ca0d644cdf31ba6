//! Trip insertion.

use super::FnrTree;
use crate::compute::rtree::SearchMode;
use fnrtree_types::interval::TimeInterval;
use fnrtree_types::segment::{Segment, TravelDirection};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::ops::ControlFlow;

/// One pass of an object over a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripEntry<Id> {
    pub object_id: Id,
    /// Direction of travel, from the endpoint order the trip was reported in
    pub direction: TravelDirection,
    /// Time the object entered and left the segment, stored as given
    pub interval: TimeInterval,
}

impl<Id> TripEntry<Id> {
    pub fn new(object_id: Id, direction: TravelDirection, interval: TimeInterval) -> Self {
        Self {
            object_id,
            direction,
            interval,
        }
    }
}

impl<Id: Clone + Ord + Debug> FnrTree<Id> {
    /// Record that `object_id` travelled `(x1, y1) -> (x2, y2)` between
    /// `enter` and `exit`.
    ///
    /// The trip is attached to the first registered segment whose box equals
    /// the box of the given endpoints. Returns `false` when no segment matches;
    /// the trip is then dropped.
    ///
    /// # Arguments
    ///
    /// * `object_id` - Moving object identifier
    /// * `x1`, `y1` - Position at `enter`
    /// * `x2`, `y2` - Position at `exit`
    /// * `enter`, `exit` - Time interval; not reordered
    #[allow(clippy::too_many_arguments)]
    pub fn insert_trip(
        &mut self,
        object_id: Id,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        enter: f64,
        exit: f64,
    ) -> bool {
        self.insert_leg(
            object_id,
            &Segment::new(x1, y1, x2, y2),
            TimeInterval::new(enter, exit),
        )
    }

    /// Same as [`insert_trip`](Self::insert_trip), taking the travelled
    /// segment and the interval as values.
    pub fn insert_leg(&mut self, object_id: Id, leg: &Segment, interval: TimeInterval) -> bool {
        let mbr = leg.canonical_box();
        let mut pending = Some(TripEntry::new(object_id, leg.travel_direction(), interval));

        self.spatial.search_mut(&mbr, SearchMode::Containing, |stored, segment| {
            if *stored != mbr {
                return ControlFlow::Continue(());
            }
            if let Some(trip) = pending.take() {
                segment.add_trip(trip);
            }
            ControlFlow::Break(())
        });

        match pending {
            None => {
                self.stats.record_trip();
                true
            }
            Some(trip) => {
                log::debug!(
                    "no segment spans {:?}; dropping trip of {:?} over {:?}",
                    mbr,
                    trip.object_id,
                    trip.interval
                );
                self.stats.record_unmatched_trip();
                false
            }
        }
    }
}
