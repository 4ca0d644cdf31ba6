//! Configuration and statistics types for the FNR-tree index.
//!
//! Everything here is serializable so a configuration can be kept next to
//! the data it indexes, in JSON or (with the `toml` feature) TOML.

use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Fanout bounds of one R-tree.
///
/// Every node except the root holds between `min_entries` and `max_entries`
/// entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCapacity {
    pub max_entries: usize,
    pub min_entries: usize,
}

impl NodeCapacity {
    /// Bounds with `min_entries = max_entries / 2`.
    pub const fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            min_entries: max_entries / 2,
        }
    }

    pub const fn with_min_entries(mut self, min_entries: usize) -> Self {
        self.min_entries = min_entries;
        self
    }

    /// A split distributes `max_entries + 1` entries over two nodes, so both
    /// halves can only be guaranteed `min_entries` when it is at most half of
    /// `max_entries`.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_entries < 2 {
            return Err(format!(
                "max_entries must be at least 2, got {}",
                self.max_entries
            ));
        }
        if self.min_entries == 0 {
            return Err("min_entries must be greater than zero".to_string());
        }
        if self.min_entries > self.max_entries / 2 {
            return Err(format!(
                "min_entries ({}) must not exceed max_entries / 2 ({})",
                self.min_entries,
                self.max_entries / 2
            ));
        }
        Ok(())
    }
}

impl Default for NodeCapacity {
    fn default() -> Self {
        Self::new(8)
    }
}

/// Index configuration.
///
/// # Example
///
/// ```rust
/// use fnrtree::{Config, NodeCapacity};
///
/// let config = Config::default();
/// assert_eq!(config.spatial, NodeCapacity::new(8));
///
/// let json = r#"{
///     "spatial": { "max_entries": 16, "min_entries": 6 }
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.spatial.max_entries, 16);
/// assert_eq!(config.temporal, NodeCapacity::default());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Fanout of the tree over segment boxes
    #[serde(default)]
    pub spatial: NodeCapacity,

    /// Fanout of every per-segment tree over trip intervals
    #[serde(default)]
    pub temporal: NodeCapacity,
}

impl Config {
    pub fn with_spatial_capacity(mut self, capacity: NodeCapacity) -> Self {
        self.spatial = capacity;
        self
    }

    pub fn with_temporal_capacity(mut self, capacity: NodeCapacity) -> Self {
        self.temporal = capacity;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        self.spatial
            .validate()
            .map_err(|e| format!("spatial level: {}", e))?;
        self.temporal
            .validate()
            .map_err(|e| format!("temporal level: {}", e))?;
        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Index statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of registered segments
    pub segments: usize,
    /// Trips stored across all segments
    pub trips: usize,
    /// Trips whose box matched no registered segment
    pub unmatched_trips: u64,
    /// Window queries answered
    pub queries: u64,
    /// Nodes of the spatial tree
    pub spatial_nodes: usize,
    /// Nodes of all temporal trees together
    pub temporal_nodes: usize,
    /// Approximate footprint in bytes
    pub memory_bytes: usize,
}

impl IndexStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_segment(&mut self) {
        self.segments += 1;
    }

    pub fn record_trip(&mut self) {
        self.trips += 1;
    }

    pub fn record_unmatched_trip(&mut self) {
        self.unmatched_trips += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity_halves_max() {
        let capacity = NodeCapacity::new(9);
        assert_eq!(capacity.min_entries, 4);
        assert!(capacity.validate().is_ok());
    }

    #[test]
    fn test_capacity_validation() {
        assert!(NodeCapacity::new(1).validate().is_err());
        assert!(NodeCapacity::new(8).with_min_entries(0).validate().is_err());
        assert!(NodeCapacity::new(8).with_min_entries(5).validate().is_err());
        assert!(NodeCapacity::new(2).validate().is_ok());
        assert!(NodeCapacity::new(8).with_min_entries(2).validate().is_ok());
    }

    #[test]
    fn test_config_validation_names_level() {
        let config = Config::default().with_temporal_capacity(NodeCapacity::new(1));
        let err = config.validate().unwrap_err();
        assert!(err.starts_with("temporal level"));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = Config::default()
            .with_spatial_capacity(NodeCapacity::new(12).with_min_entries(4))
            .with_temporal_capacity(NodeCapacity::new(32));
        let json = config.to_json().unwrap();
        let back = Config::from_json(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_config_from_json_rejects_invalid() {
        let json = r#"{ "spatial": { "max_entries": 4, "min_entries": 3 } }"#;
        assert!(Config::from_json(json).is_err());
    }

    #[test]
    fn test_config_from_empty_json_is_default() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml_round_trip() {
        let config = Config::default().with_spatial_capacity(NodeCapacity::new(10));
        let toml_str = config.to_toml().unwrap();
        let back = Config::from_toml(&toml_str).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_stats_counters() {
        let mut stats = IndexStats::new();
        stats.record_segment();
        stats.record_trip();
        stats.record_trip();
        stats.record_unmatched_trip();
        assert_eq!(stats.segments, 1);
        assert_eq!(stats.trips, 2);
        assert_eq!(stats.unmatched_trips, 1);
        assert_eq!(stats.queries, 0);
    }
}
