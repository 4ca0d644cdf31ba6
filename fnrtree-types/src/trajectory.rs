use crate::bbox::SpatialBox;
use crate::interval::TimeInterval;
use crate::segment::Segment;
use serde::{Deserialize, Serialize};

/// One timestamped position report of a moving object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSample<Id> {
    pub object_id: Id,
    pub timestamp: f64,
    pub x: i32,
    pub y: i32,
    /// Marks the first report of a new trip; the previous position of the
    /// object, if any, is forgotten.
    #[serde(default)]
    pub restart: bool,
}

impl<Id> TripSample<Id> {
    /// A report continuing the object's current trip.
    pub fn new(object_id: Id, timestamp: f64, x: i32, y: i32) -> Self {
        Self {
            object_id,
            timestamp,
            x,
            y,
            restart: false,
        }
    }

    /// The first report of a trip.
    pub fn start(object_id: Id, timestamp: f64, x: i32, y: i32) -> Self {
        Self {
            restart: true,
            ..Self::new(object_id, timestamp, x, y)
        }
    }

    /// Segment and time interval covered between `previous` and this report.
    pub fn leg_from(&self, previous: &TripSample<Id>) -> (Segment, TimeInterval) {
        (
            Segment::new(previous.x, previous.y, self.x, self.y),
            TimeInterval::new(previous.timestamp, self.timestamp),
        )
    }
}

pub type Trajectory<Id> = Vec<TripSample<Id>>;

/// A spatial window plus a time window, as submitted by a query source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryWindow {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub t0: f64,
    pub t1: f64,
}

impl QueryWindow {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32, t0: f64, t1: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            t0,
            t1,
        }
    }

    /// Spatial part of the window with ordered corners.
    pub fn spatial_box(&self) -> SpatialBox {
        Segment::new(self.x1, self.y1, self.x2, self.y2).canonical_box()
    }

    pub fn time_window(&self) -> TimeInterval {
        TimeInterval::new(self.t0, self.t1)
    }
}
