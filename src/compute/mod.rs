//! Compute layer: the index structures the FNR tree is built from.
//!
//! [`rtree`] holds the generic balanced box tree. It knows nothing about
//! roads or trips; the two-level composition lives in [`crate::db`].

pub mod rtree;
