use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

/// Scalar type usable as a box coordinate.
///
/// Areas are accumulated in [`Coordinate::Area`]. For `i16` and `i32` it is
/// wide enough for the area of a box spanning the whole coordinate range in
/// two dimensions. `i64` coordinates share the `i128` accumulator and may
/// still overflow on near-full-range boxes.
pub trait Coordinate: Copy + PartialOrd + Debug {
    /// Accumulator used for areas and area differences.
    type Area: Copy
        + PartialOrd
        + Debug
        + Add<Output = Self::Area>
        + Sub<Output = Self::Area>
        + Mul<Output = Self::Area>;

    /// The zero coordinate, used for the empty box.
    const ZERO: Self;

    /// Multiplicative identity of the area accumulator.
    const AREA_ONE: Self::Area;

    /// Smallest representable area value.
    const AREA_LOWEST: Self::Area;

    /// `|high - low|` converted to the area accumulator.
    fn extent(low: Self, high: Self) -> Self::Area;

    /// Absolute value in the area accumulator.
    fn area_abs(area: Self::Area) -> Self::Area;
}

macro_rules! impl_int_coordinate {
    ($($coord:ty => $area:ty),* $(,)?) => {
        $(
            impl Coordinate for $coord {
                type Area = $area;
                const ZERO: Self = 0;
                const AREA_ONE: $area = 1;
                const AREA_LOWEST: $area = <$area>::MIN;

                #[inline]
                fn extent(low: Self, high: Self) -> $area {
                    (<$area>::from(high) - <$area>::from(low)).abs()
                }

                #[inline]
                fn area_abs(area: $area) -> $area {
                    area.abs()
                }
            }
        )*
    };
}

macro_rules! impl_float_coordinate {
    ($($coord:ty => $area:ty),* $(,)?) => {
        $(
            impl Coordinate for $coord {
                type Area = $area;
                const ZERO: Self = 0.0;
                const AREA_ONE: $area = 1.0;
                const AREA_LOWEST: $area = <$area>::MIN;

                #[inline]
                fn extent(low: Self, high: Self) -> $area {
                    (<$area>::from(high) - <$area>::from(low)).abs()
                }

                #[inline]
                fn area_abs(area: $area) -> $area {
                    area.abs()
                }
            }
        )*
    };
}

impl_int_coordinate!(i16 => i64, i32 => i128, i64 => i128);
impl_float_coordinate!(f32 => f64, f64 => f64);

#[inline]
fn partial_min<C: PartialOrd>(a: C, b: C) -> C {
    if b < a { b } else { a }
}

#[inline]
fn partial_max<C: PartialOrd>(a: C, b: C) -> C {
    if b > a { b } else { a }
}

/// Axis-aligned minimum bounding rectangle in `D` dimensions.
///
/// `low[i] <= high[i]` is expected on every axis but never enforced: callers
/// that build boxes from unordered endpoints should go through
/// [`Mbr::from_corners`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mbr<C: Coordinate, const D: usize> {
    /// Lower corner
    pub low: [C; D],
    /// Upper corner
    pub high: [C; D],
}

/// Box of a road segment in the plane.
pub type SpatialBox = Mbr<i32, 2>;

/// Box of a time interval on the time axis.
pub type TemporalBox = Mbr<f64, 1>;

impl<C: Coordinate, const D: usize> Mbr<C, D> {
    /// Create a box from its lower and upper corners, as given.
    pub fn new(low: [C; D], high: [C; D]) -> Self {
        Self { low, high }
    }

    /// Create the canonical box spanned by two arbitrary corners.
    ///
    /// # Examples
    ///
    /// ```
    /// use fnrtree_types::bbox::Mbr;
    ///
    /// let b = Mbr::from_corners([10, 0], [0, 10]);
    /// assert_eq!(b, Mbr::new([0, 0], [10, 10]));
    /// ```
    pub fn from_corners(a: [C; D], b: [C; D]) -> Self {
        let mut low = a;
        let mut high = b;
        for axis in 0..D {
            low[axis] = partial_min(a[axis], b[axis]);
            high[axis] = partial_max(a[axis], b[axis]);
        }
        Self { low, high }
    }

    /// Degenerate box covering a single point.
    pub fn point(p: [C; D]) -> Self {
        Self { low: p, high: p }
    }

    /// The all-zero box carried by an empty node.
    pub fn empty() -> Self {
        Self {
            low: [C::ZERO; D],
            high: [C::ZERO; D],
        }
    }

    /// Smallest box enclosing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        for axis in 0..D {
            out.low[axis] = partial_min(self.low[axis], other.low[axis]);
            out.high[axis] = partial_max(self.high[axis], other.high[axis]);
        }
        out
    }

    /// Product of the extents on every axis; zero when any axis is degenerate.
    pub fn area(&self) -> C::Area {
        (0..D).fold(C::AREA_ONE, |acc, axis| {
            acc * C::extent(self.low[axis], self.high[axis])
        })
    }

    /// `|area(self) - area(other)|`.
    pub fn area_diff(&self, other: &Self) -> C::Area {
        C::area_abs(self.area() - other.area())
    }

    /// Area growth needed for `self` to also enclose `other`.
    pub fn enlargement(&self, other: &Self) -> C::Area {
        self.union(other).area_diff(self)
    }

    /// Area wasted by covering `self` and `other` with one box.
    ///
    /// Negative when the two boxes overlap enough.
    pub fn dead_space(&self, other: &Self) -> C::Area {
        self.union(other).area() - self.area() - other.area()
    }

    /// `true` when `inner` lies within `self` on every axis (boundaries included).
    pub fn contains(&self, inner: &Self) -> bool {
        (0..D).all(|axis| self.low[axis] <= inner.low[axis] && self.high[axis] >= inner.high[axis])
    }

    /// `true` when the two closed boxes share at least one point.
    pub fn intersects(&self, other: &Self) -> bool {
        (0..D).all(|axis| self.low[axis] <= other.high[axis] && other.low[axis] <= self.high[axis])
    }
}

impl<C: Coordinate, const D: usize> Default for Mbr<C, D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<geo::Rect<i32>> for SpatialBox {
    fn from(rect: geo::Rect<i32>) -> Self {
        Mbr::new([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
    }
}

impl From<SpatialBox> for geo::Rect<i32> {
    fn from(mbr: SpatialBox) -> Self {
        geo::Rect::new(
            geo::coord! { x: mbr.low[0], y: mbr.low[1] },
            geo::coord! { x: mbr.high[0], y: mbr.high[1] },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_takes_extremes_per_axis() {
        let a = Mbr::new([0, 5], [3, 8]);
        let b = Mbr::new([2, -1], [7, 6]);
        assert_eq!(a.union(&b), Mbr::new([0, -1], [7, 8]));
    }

    #[test]
    fn test_area_of_degenerate_box_is_zero() {
        let line = Mbr::new([0, 0], [10, 0]);
        assert_eq!(line.area(), 0);
        assert_eq!(Mbr::new([0, 0], [4, 5]).area(), 20);
    }

    #[test]
    fn test_area_is_widened() {
        let big = Mbr::new([0, 0], [100_000, 100_000]);
        assert_eq!(big.area(), 10_000_000_000_i128);
    }

    #[test]
    fn test_full_range_i32_area_fits() {
        let all = Mbr::new([i32::MIN, i32::MIN], [i32::MAX, i32::MAX]);
        let side = i128::from(u32::MAX);
        assert_eq!(all.area(), side * side);
        let small = Mbr::new([0, 0], [1, 1]);
        assert_eq!(all.enlargement(&small), 0);
        assert_eq!(small.enlargement(&all), side * side - 1);
        assert!(all.dead_space(&small) < 0);
    }

    #[test]
    fn test_area_diff_is_symmetric() {
        let a = Mbr::new([0, 0], [2, 2]);
        let b = Mbr::new([0, 0], [3, 3]);
        assert_eq!(a.area_diff(&b), 5);
        assert_eq!(b.area_diff(&a), 5);
    }

    #[test]
    fn test_contains_includes_boundary() {
        let outer = Mbr::new([0, 0], [10, 10]);
        assert!(outer.contains(&outer));
        assert!(outer.contains(&Mbr::new([0, 0], [10, 0])));
        assert!(!outer.contains(&Mbr::new([-1, 0], [5, 5])));
        assert!(!Mbr::new([0, 0], [10, 0]).contains(&outer));
    }

    #[test]
    fn test_intersects_closed_boxes() {
        let a = Mbr::new([0.0], [5.0]);
        assert!(a.intersects(&Mbr::new([5.0], [7.0])));
        assert!(a.intersects(&Mbr::new([2.0], [3.0])));
        assert!(!a.intersects(&Mbr::new([6.0], [7.0])));
    }

    #[test]
    fn test_dead_space_can_be_negative_in_one_dimension() {
        let a = Mbr::new([0.0], [4.0]);
        let b = Mbr::new([2.0], [6.0]);
        assert_eq!(a.dead_space(&b), -2.0);
    }

    #[test]
    fn test_geo_rect_round_trip() {
        let rect = geo::Rect::new(geo::coord! { x: 3, y: 9 }, geo::coord! { x: -1, y: 2 });
        let mbr = SpatialBox::from(rect);
        assert_eq!(mbr, Mbr::new([-1, 2], [3, 9]));
        assert_eq!(geo::Rect::from(mbr), rect);
    }
}
