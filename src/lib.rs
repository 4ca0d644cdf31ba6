//! Fixed Network R-tree: a spatio-temporal index for objects moving on a road network.
//!
//! ```rust
//! use fnrtree::FnrTree;
//!
//! let mut index: FnrTree<u64> = FnrTree::new();
//! index.register_segment(0, 0, 100, 0, "Harbour Rd");
//! index.register_segment(100, 0, 100, 50, "Quay St");
//!
//! index.insert_trip(1, 0, 0, 100, 0, 0.0, 60.0);
//! index.insert_trip(1, 100, 0, 100, 50, 60.0, 90.0);
//! index.insert_trip(2, 100, 50, 100, 0, 10.0, 40.0);
//!
//! let seen = index.query(90, 10, 110, 20, 30.0, 70.0);
//! assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![1, 2]);
//! ```

pub mod builder;
pub mod compute;
pub mod db;
pub mod error;
pub mod ingest;
pub mod types;

pub use builder::FnrTreeBuilder;
pub use compute::rtree::{RTree, SearchMode};
pub use db::{FnrTree, SegmentEntry, TripEntry};
pub use error::{FnrError, Result};

pub use geo::{Line, Rect};

pub use fnrtree_types::bbox::{Coordinate, Mbr, SpatialBox, TemporalBox};
pub use fnrtree_types::interval::TimeInterval;
pub use fnrtree_types::segment::{Orientation, Segment, TravelDirection};
pub use fnrtree_types::trajectory::{QueryWindow, Trajectory, TripSample};

pub use types::{Config, IndexStats, NodeCapacity};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{FnrError, FnrTree, FnrTreeBuilder, Result};

    pub use crate::{Config, IndexStats, NodeCapacity};

    pub use crate::{Mbr, Orientation, Segment, TimeInterval, TravelDirection};

    pub use crate::{QueryWindow, TripSample};

    pub use crate::ingest::{RoadNetwork, TrajectoryFeed, run_queries};

    pub use geo::Rect;
}
