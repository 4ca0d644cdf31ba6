use crate::bbox::{Mbr, TemporalBox};
use serde::{Deserialize, Serialize};

/// Time span during which an object travelled a segment.
///
/// No ordering between `enter` and `exit` is enforced. A reversed interval is
/// stored as given and compared with plain float comparisons later on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeInterval {
    /// Time the object entered the segment
    pub enter: f64,
    /// Time the object left the segment
    pub exit: f64,
}

impl TimeInterval {
    pub fn new(enter: f64, exit: f64) -> Self {
        Self { enter, exit }
    }

    /// The interval as a one-dimensional box, `[enter, exit]`.
    pub fn to_box(&self) -> TemporalBox {
        Mbr::new([self.enter], [self.exit])
    }

    pub fn duration(&self) -> f64 {
        self.exit - self.enter
    }

    /// Check whether the two closed intervals share an instant.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.to_box().intersects(&other.to_box())
    }
}

impl From<TimeInterval> for TemporalBox {
    fn from(interval: TimeInterval) -> Self {
        interval.to_box()
    }
}
