//! # fnrtree-types
//!
//! Value types shared by the FNR-tree index and the code that feeds it.
//!
//! - **Boxes**: `Mbr`, the `Coordinate` trait and the box algebra (union,
//!   area, containment, intersection)
//! - **Segments**: `Segment`, `Orientation`, `TravelDirection` and the
//!   segment/rectangle clip used to confirm query hits
//! - **Time**: `TimeInterval`
//! - **Trajectories**: `TripSample`, `Trajectory`, `QueryWindow`
//!
//! ## Examples
//!
//! ```rust
//! use fnrtree_types::bbox::Mbr;
//! use fnrtree_types::segment::{Orientation, Segment};
//!
//! let road = Segment::new(10, 0, 0, 10);
//! assert_eq!(road.canonical_box(), Mbr::new([0, 0], [10, 10]));
//! assert_eq!(road.orientation(), Orientation::Descending);
//! ```

pub mod bbox;
pub mod interval;
pub mod segment;
pub mod trajectory;
