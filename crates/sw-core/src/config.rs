use serde::{Deserialize, Serialize};
use sw_ring::Evict;

/// Capacity used when a configuration omits one.
pub const DEFAULT_CAPACITY: usize = 64;

/// Window sizing, usually read from the `[window]` table of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// End that loses elements when the capacity shrinks.
    #[serde(default)]
    pub evict: Evict,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            evict: Evict::Front,
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

/// Point-in-time order statistics of a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStats<T> {
    pub len: usize,
    pub capacity: usize,
    pub min: Option<T>,
    pub median: Option<T>,
    pub max: Option<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: WindowConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, WindowConfig::default());
        assert_eq!(config.capacity, 64);
    }

    #[test]
    fn test_evict_is_snake_case() {
        let config: WindowConfig =
            serde_json::from_str(r#"{"capacity": 5, "evict": "back"}"#).unwrap();
        assert_eq!(config.capacity, 5);
        assert_eq!(config.evict, Evict::Back);
    }

    #[test]
    fn test_stats_serialize_empty_as_null() {
        let stats: WindowStats<i32> = WindowStats {
            len: 0,
            capacity: 4,
            min: None,
            median: None,
            max: None,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(
            json,
            r#"{"len":0,"capacity":4,"min":null,"median":null,"max":null}"#
        );
    }
}
