//! Index builder for flexible configuration
//!
//! This module provides a builder pattern for creating an [`FnrTree`] with
//! custom node capacities on either level.

use crate::db::FnrTree;
use crate::error::Result;
use crate::types::{Config, NodeCapacity};
use std::fmt::Debug;
use std::marker::PhantomData;

/// Builder for index configuration.
///
/// # Examples
///
/// ```rust
/// use fnrtree::{FnrTreeBuilder, NodeCapacity};
///
/// let index = FnrTreeBuilder::<u64>::new()
///     .spatial_capacity(NodeCapacity::new(16))
///     .temporal_capacity(NodeCapacity::new(32).with_min_entries(8))
///     .build()?;
/// assert_eq!(index.config().spatial.max_entries, 16);
/// # Ok::<(), fnrtree::FnrError>(())
/// ```
#[derive(Debug)]
pub struct FnrTreeBuilder<Id = i64> {
    config: Config,
    _id: PhantomData<Id>,
}

impl<Id: Clone + Ord + Debug> FnrTreeBuilder<Id> {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            _id: PhantomData,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replace the whole configuration with one read from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FnrError::Serialization`](crate::FnrError::Serialization) if
    /// the document does not parse or its capacities do not validate.
    pub fn config_json(self, json: &str) -> Result<Self> {
        let config = Config::from_json(json)?;
        Ok(self.config(config))
    }

    /// Fanout of the tree over segment boxes.
    pub fn spatial_capacity(mut self, capacity: NodeCapacity) -> Self {
        self.config.spatial = capacity;
        self
    }

    /// Fanout of every per-segment tree over trip intervals.
    pub fn temporal_capacity(mut self, capacity: NodeCapacity) -> Self {
        self.config.temporal = capacity;
        self
    }

    /// Build the index.
    ///
    /// # Errors
    ///
    /// Returns [`FnrError::InvalidConfig`](crate::FnrError::InvalidConfig) if
    /// the configuration does not validate.
    pub fn build(self) -> Result<FnrTree<Id>> {
        FnrTree::with_config(self.config)
    }
}

impl<Id: Clone + Ord + Debug> Default for FnrTreeBuilder<Id> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FnrError;

    #[test]
    fn test_builder_default_matches_new() {
        let index: FnrTree = FnrTreeBuilder::new().build().unwrap();
        assert_eq!(index.config(), &Config::default());
    }

    #[test]
    fn test_builder_custom_capacities() {
        let index: FnrTree<u32> = FnrTreeBuilder::new()
            .spatial_capacity(NodeCapacity::new(4))
            .temporal_capacity(NodeCapacity::new(3).with_min_entries(1))
            .build()
            .unwrap();
        assert_eq!(index.config().spatial, NodeCapacity::new(4));
        assert_eq!(index.config().temporal.min_entries, 1);
    }

    #[test]
    fn test_builder_from_json_config() {
        let config = Config::from_json(r#"{ "temporal": { "max_entries": 6, "min_entries": 3 } }"#).unwrap();
        let index: FnrTree = FnrTreeBuilder::new().config(config.clone()).build().unwrap();
        assert_eq!(index.config(), &config);
    }

    #[test]
    fn test_builder_config_json() {
        let index: FnrTree = FnrTreeBuilder::new()
            .config_json(r#"{ "spatial": { "max_entries": 12, "min_entries": 4 } }"#)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(index.config().spatial, NodeCapacity::new(12).with_min_entries(4));
        assert_eq!(index.config().temporal, NodeCapacity::default());
    }

    #[test]
    fn test_builder_config_json_errors_are_serialization() {
        let malformed = FnrTreeBuilder::<i64>::new().config_json("{ spatial: ");
        assert!(matches!(malformed, Err(FnrError::Serialization(_))));

        let invalid = FnrTreeBuilder::<i64>::new()
            .config_json(r#"{ "temporal": { "max_entries": 4, "min_entries": 3 } }"#);
        match invalid {
            Err(FnrError::Serialization(e)) => assert!(e.to_string().contains("temporal level")),
            other => panic!("expected Serialization, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_builder_rejects_invalid_capacity() {
        let result: Result<FnrTree> = FnrTreeBuilder::new()
            .spatial_capacity(NodeCapacity::new(10).with_min_entries(6))
            .build();
        match result {
            Err(FnrError::InvalidConfig(msg)) => assert!(msg.starts_with("spatial level")),
            other => panic!("expected InvalidConfig, got {:?}", other.map(|_| ())),
        }
    }
}
