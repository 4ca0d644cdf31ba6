//! Loading a road network, trajectories and query batches into an index.
//!
//! These helpers work on values already in memory; reading them from files
//! is left to the caller.
//!
//! ```rust
//! use fnrtree::FnrTree;
//! use fnrtree::ingest::{RoadNetwork, TrajectoryFeed, run_queries};
//! use fnrtree_types::trajectory::{QueryWindow, TripSample};
//!
//! let mut network = RoadNetwork::new();
//! network.add_node(1, 0, 0);
//! network.add_node(2, 10, 0);
//! network.add_edge(100, 1, 2, "Main St");
//!
//! let mut index: FnrTree<u32> = FnrTree::new();
//! network.register_into(&mut index)?;
//!
//! let mut feed = TrajectoryFeed::new();
//! let summary = feed.extend(&mut index, [
//!     TripSample::start(7, 0.0, 0, 0),
//!     TripSample::new(7, 4.0, 10, 0),
//! ]);
//! assert_eq!(summary.matched, 1);
//!
//! let answers = run_queries(&index, &[QueryWindow::new(0, -1, 10, 1, 1.0, 2.0)]);
//! assert!(answers[0].contains(&7));
//! # Ok::<(), fnrtree::FnrError>(())
//! ```

use crate::db::FnrTree;
use crate::error::{FnrError, Result};
use fnrtree_types::segment::Segment;
use fnrtree_types::trajectory::{QueryWindow, TripSample};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::Hash;

/// A road edge between two network nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: i64,
    pub from: i64,
    pub to: i64,
    pub name: String,
}

/// Road network given as nodes with coordinates and edges between node ids.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    nodes: FxHashMap<i64, (i32, i32)>,
    edges: Vec<Edge>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. A node id that is already known keeps its first position.
    pub fn add_node(&mut self, id: i64, x: i32, y: i32) {
        if let Some(&(px, py)) = self.nodes.get(&id) {
            log::warn!(
                "Node {} already at ({}, {}); ignoring redefinition at ({}, {})",
                id,
                px,
                py,
                x,
                y
            );
            return;
        }
        self.nodes.insert(id, (x, y));
    }

    /// Add an edge between two node ids. The nodes may be added later.
    pub fn add_edge(&mut self, id: i64, from: i64, to: i64, name: impl Into<String>) {
        self.edges.push(Edge {
            id,
            from,
            to,
            name: name.into(),
        });
    }

    pub fn node(&self, id: i64) -> Option<(i32, i32)> {
        self.nodes.get(&id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Segment between the two endpoints of `edge`.
    pub fn resolve(&self, edge: &Edge) -> Result<Segment> {
        let lookup = |node: i64| {
            self.node(node).ok_or(FnrError::UnknownNode {
                edge: edge.id,
                node,
            })
        };
        let (x1, y1) = lookup(edge.from)?;
        let (x2, y2) = lookup(edge.to)?;
        Ok(Segment::new(x1, y1, x2, y2))
    }

    /// Register every edge as a segment of `index`, in the order the edges
    /// were added. Returns the number of registered segments.
    ///
    /// # Errors
    ///
    /// Returns [`FnrError::UnknownNode`] for the first edge that names a node
    /// that was never added; nothing is registered in that case.
    pub fn register_into<Id: Clone + Ord + Debug>(&self, index: &mut FnrTree<Id>) -> Result<usize> {
        let segments = self
            .edges
            .iter()
            .map(|edge| self.resolve(edge))
            .collect::<Result<Vec<_>>>()?;
        for (edge, segment) in self.edges.iter().zip(&segments) {
            index.register(segment, edge.name.as_str());
        }
        Ok(segments.len())
    }
}

/// Trips issued by a [`TrajectoryFeed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSummary {
    /// Legs handed to the index
    pub issued: usize,
    /// Legs that found their segment
    pub matched: usize,
}

/// Turns a stream of position reports into trips.
///
/// Reports are paired per object: every report after the first one of a trip
/// closes a leg that started at the object's previous report.
#[derive(Debug)]
pub struct TrajectoryFeed<Id> {
    last: FxHashMap<Id, TripSample<Id>>,
    summary: FeedSummary,
}

impl<Id: Clone + Ord + Hash + Debug> Default for TrajectoryFeed<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Clone + Ord + Hash + Debug> TrajectoryFeed<Id> {
    pub fn new() -> Self {
        Self {
            last: FxHashMap::default(),
            summary: FeedSummary::default(),
        }
    }

    /// Process one report.
    ///
    /// Returns `None` when the report only starts a trip, otherwise whether
    /// the leg it closes was matched to a segment. A report from an object
    /// without a previous report is treated as a start.
    pub fn push(&mut self, index: &mut FnrTree<Id>, sample: TripSample<Id>) -> Option<bool> {
        let previous = if sample.restart {
            None
        } else {
            self.last.get(&sample.object_id)
        };

        let outcome = match previous {
            Some(previous) => {
                let (leg, interval) = sample.leg_from(previous);
                let matched = index.insert_leg(sample.object_id.clone(), &leg, interval);
                self.summary.issued += 1;
                if matched {
                    self.summary.matched += 1;
                }
                Some(matched)
            }
            None => {
                if !sample.restart {
                    log::debug!(
                        "object {:?} has no open trip; starting one at t={}",
                        sample.object_id,
                        sample.timestamp
                    );
                }
                None
            }
        };

        self.last.insert(sample.object_id.clone(), sample);
        outcome
    }

    /// Process reports in order and return what this batch issued.
    pub fn extend<I>(&mut self, index: &mut FnrTree<Id>, samples: I) -> FeedSummary
    where
        I: IntoIterator<Item = TripSample<Id>>,
    {
        let before = self.summary;
        for sample in samples {
            self.push(index, sample);
        }
        FeedSummary {
            issued: self.summary.issued - before.issued,
            matched: self.summary.matched - before.matched,
        }
    }

    /// Totals since the feed was created.
    pub fn summary(&self) -> FeedSummary {
        self.summary
    }

    /// Number of objects with an open trip.
    pub fn open_trips(&self) -> usize {
        self.last.len()
    }
}

/// Answer `queries` in order.
pub fn run_queries<Id: Clone + Ord + Debug>(index: &FnrTree<Id>, queries: &[QueryWindow]) -> Vec<BTreeSet<Id>> {
    queries.iter().map(|window| index.query_window(window)).collect()
}
