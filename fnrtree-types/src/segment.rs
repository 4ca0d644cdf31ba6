//! Road segments and the geometry needed to index them as boxes.
//!
//! A segment is stored in the index under its canonical box, which forgets
//! which diagonal of the box the segment actually runs along. The
//! [`Orientation`] flag keeps that information so the real line can be
//! rebuilt at query time, and [`TravelDirection`] records which way an object
//! moved along it.

use crate::bbox::{Mbr, SpatialBox};
use serde::{Deserialize, Serialize};

/// Which diagonal of its box a segment occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Bottom-left to top-right, `/`.
    Ascending,
    /// Top-left to bottom-right, `\`.
    Descending,
}

impl Orientation {
    /// Orientation of the segment `(x1, y1) -> (x2, y2)`.
    ///
    /// Horizontal and vertical segments are `Ascending`.
    pub fn of(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let slope_sign = (i128::from(x2) - i128::from(x1)) * (i128::from(y2) - i128::from(y1));
        if slope_sign >= 0 {
            Orientation::Ascending
        } else {
            Orientation::Descending
        }
    }

    pub fn is_descending(self) -> bool {
        self == Orientation::Descending
    }

    /// Rebuild the segment lying on this diagonal of `bbox`.
    pub fn diagonal(self, bbox: &SpatialBox) -> Segment {
        match self {
            Orientation::Descending => {
                Segment::new(bbox.low[0], bbox.high[1], bbox.high[0], bbox.low[1])
            }
            Orientation::Ascending => {
                Segment::new(bbox.low[0], bbox.low[1], bbox.high[0], bbox.high[1])
            }
        }
    }
}

/// Direction an object travelled along a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelDirection {
    /// Towards increasing x, or increasing y on a vertical segment.
    Forward,
    /// Towards decreasing x, or non-increasing y on a vertical segment.
    Backward,
}

impl TravelDirection {
    /// Direction of a move from `(x1, y1)` to `(x2, y2)`, taken from the raw
    /// endpoint order.
    pub fn of(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let backward = if x1 != x2 { x1 >= x2 } else { y1 >= y2 };
        if backward {
            TravelDirection::Backward
        } else {
            TravelDirection::Forward
        }
    }

    pub fn is_backward(self) -> bool {
        self == TravelDirection::Backward
    }
}

/// A line segment between two integer points, endpoints in caller order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Segment {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box with ordered corners spanned by the two endpoints.
    pub fn canonical_box(&self) -> SpatialBox {
        Mbr::from_corners([self.x1, self.y1], [self.x2, self.y2])
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::of(self.x1, self.y1, self.x2, self.y2)
    }

    pub fn travel_direction(&self) -> TravelDirection {
        TravelDirection::of(self.x1, self.y1, self.x2, self.y2)
    }

    /// Clip this segment against `rect` and report whether anything is left.
    ///
    /// The x-range of the segment is clamped to the rectangle first. Unless the
    /// segment is vertical, the y values at the clamped x ends are then taken
    /// from the line equation and truncated toward zero; a vertical segment
    /// keeps its own y endpoints. The resulting y-range is clamped to the
    /// rectangle as well.
    ///
    /// # Examples
    ///
    /// ```
    /// use fnrtree_types::bbox::Mbr;
    /// use fnrtree_types::segment::Segment;
    ///
    /// let diagonal = Segment::new(0, 0, 10, 10);
    /// assert!(diagonal.intersects_rect(&Mbr::new([4, 4], [6, 6])));
    /// assert!(!diagonal.intersects_rect(&Mbr::new([0, 8], [2, 10])));
    /// ```
    pub fn intersects_rect(&self, rect: &SpatialBox) -> bool {
        let (mut min_x, mut max_x) = if self.x1 > self.x2 {
            (self.x2, self.x1)
        } else {
            (self.x1, self.x2)
        };
        max_x = max_x.min(rect.high[0]);
        min_x = min_x.max(rect.low[0]);
        if min_x > max_x {
            return false;
        }

        let (mut min_y, mut max_y) = (self.y1, self.y2);
        let dx = f64::from(self.x2) - f64::from(self.x1);
        if dx != 0.0 {
            let slope = (f64::from(self.y2) - f64::from(self.y1)) / dx;
            let intercept = f64::from(self.y1) - slope * f64::from(self.x1);
            min_y = (slope * f64::from(min_x) + intercept) as i32;
            max_y = (slope * f64::from(max_x) + intercept) as i32;
        }
        if min_y > max_y {
            std::mem::swap(&mut min_y, &mut max_y);
        }

        max_y = max_y.min(rect.high[1]);
        min_y = min_y.max(rect.low[1]);
        min_y <= max_y
    }

    /// The segment as a `geo::Line`.
    pub fn to_line(&self) -> geo::Line<i32> {
        geo::Line::new(
            geo::coord! { x: self.x1, y: self.y1 },
            geo::coord! { x: self.x2, y: self.y2 },
        )
    }
}

impl From<geo::Line<i32>> for Segment {
    fn from(line: geo::Line<i32>) -> Self {
        Segment::new(line.start.x, line.start.y, line.end.x, line.end.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_follows_slope_sign() {
        assert_eq!(Orientation::of(0, 0, 10, 10), Orientation::Ascending);
        assert_eq!(Orientation::of(10, 0, 0, 10), Orientation::Descending);
        assert_eq!(Orientation::of(10, 10, 0, 0), Orientation::Ascending);
        assert_eq!(Orientation::of(0, 0, 10, 0), Orientation::Ascending);
        assert_eq!(Orientation::of(5, 9, 5, 1), Orientation::Ascending);
    }

    #[test]
    fn test_orientation_does_not_overflow() {
        let o = Orientation::of(i32::MIN, i32::MAX, i32::MAX, i32::MIN);
        assert_eq!(o, Orientation::Descending);
    }

    #[test]
    fn test_diagonal_rebuilds_segment() {
        let seg = Segment::new(10, 0, 0, 10);
        let bbox = seg.canonical_box();
        let rebuilt = seg.orientation().diagonal(&bbox);
        assert_eq!(rebuilt, Segment::new(0, 10, 10, 0));

        let seg = Segment::new(10, 10, 0, 0);
        let rebuilt = seg.orientation().diagonal(&seg.canonical_box());
        assert_eq!(rebuilt, Segment::new(0, 0, 10, 10));
    }

    #[test]
    fn test_travel_direction_uses_raw_order() {
        assert_eq!(TravelDirection::of(0, 0, 10, 0), TravelDirection::Forward);
        assert_eq!(TravelDirection::of(10, 0, 0, 0), TravelDirection::Backward);
        assert_eq!(TravelDirection::of(3, 0, 3, 7), TravelDirection::Forward);
        assert_eq!(TravelDirection::of(3, 7, 3, 0), TravelDirection::Backward);
        assert_eq!(TravelDirection::of(3, 3, 3, 3), TravelDirection::Backward);
    }

    #[test]
    fn test_clip_horizontal_segment() {
        let road = Segment::new(0, 0, 10, 0);
        assert!(road.intersects_rect(&Mbr::new([0, 0], [10, 0])));
        assert!(road.intersects_rect(&Mbr::new([5, -1], [20, 1])));
        assert!(!road.intersects_rect(&Mbr::new([11, -1], [20, 1])));
        assert!(!road.intersects_rect(&Mbr::new([0, 1], [10, 5])));
    }

    #[test]
    fn test_clip_vertical_segment_keeps_endpoints() {
        let road = Segment::new(4, 10, 4, 0);
        assert!(road.intersects_rect(&Mbr::new([0, 2], [8, 3])));
        assert!(!road.intersects_rect(&Mbr::new([0, 11], [8, 12])));
        assert!(!road.intersects_rect(&Mbr::new([5, 0], [8, 10])));
    }

    #[test]
    fn test_clip_descending_diagonal_misses_opposite_corner() {
        let road = Orientation::Descending.diagonal(&Mbr::new([0, 0], [10, 10]));
        assert!(road.intersects_rect(&Mbr::new([0, 8], [2, 10])));
        assert!(!road.intersects_rect(&Mbr::new([0, 0], [2, 2])));
    }

    #[test]
    fn test_line_conversion() {
        let seg = Segment::new(1, 2, 3, 4);
        assert_eq!(Segment::from(seg.to_line()), seg);
    }
}
