// Engine configuration.
//
// `EngineConfig` holds the few knobs of cache construction. It is a serde
// struct with per-field defaults, so a JSON file may set any subset of
// fields. Queries are not configurable: they are pure functions of the
// built tables.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Cache construction parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Build junction-table rows on the rayon thread pool.
    pub parallel_build: bool,
    /// Longest corridor walk accepted before the maze is declared to have a
    /// region with no junction. `None` means `2 * node_count + 1`, enough to
    /// walk any corridor and back.
    pub walk_limit: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_build: true,
            walk_limit: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a config from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.walk_limit == Some(0) {
            return Err(ConfigError::ZeroWalkLimit);
        }
        Ok(())
    }

    /// The walk limit to use for a maze of `node_count` nodes.
    pub fn walk_limit_for(&self, node_count: usize) -> usize {
        match self.walk_limit {
            Some(limit) => limit as usize,
            None => 2 * node_count + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = EngineConfig::default();
        let restored = EngineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = EngineConfig::from_json(r#"{ "walk_limit": 40 }"#).unwrap();
        assert!(config.parallel_build);
        assert_eq!(config.walk_limit_for(1000), 40);

        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config.walk_limit_for(10), 21);
    }

    #[test]
    fn zero_walk_limit_is_rejected() {
        let err = EngineConfig::from_json(r#"{ "walk_limit": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroWalkLimit));
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(
            EngineConfig::from_json("not json {{"),
            Err(ConfigError::Json(_))
        ));
    }
}
