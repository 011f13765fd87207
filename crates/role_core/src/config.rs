//! Selection settings, loadable from JSON or YAML.
//!
//! ```rust
//! use role_core::config::SelectionConfig;
//!
//! let config = SelectionConfig::default();
//! let casual = SelectionConfig::casual();
//! assert!(config.validate().is_ok());
//! assert!(casual.options.contains(role_core::SelectionOptions::ALLOW_SCP_OVERFLOW));
//! ```

use crate::error::{Result, SelectionError};
use crate::history::HISTORY_LENGTH;
use crate::options::SelectionOptions;
use crate::queue::{TeamQueue, DEFAULT_TEAM_QUEUE};
use crate::spawner::ScpSpawner;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Team rotation digits (default: "4014314031441404134041434414")
    pub team_queue: String,
    pub options: SelectionOptions,
    pub spawner: ScpSpawner,
    /// Human roles remembered per player (default: 5)
    pub history_length: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            team_queue: DEFAULT_TEAM_QUEUE.to_string(),
            options: SelectionOptions::default(),
            spawner: ScpSpawner::default(),
            history_length: HISTORY_LENGTH,
        }
    }
}

impl SelectionConfig {
    /// Event rounds: no cap on SCPs, nothing persisted.
    pub fn casual() -> Self {
        Self { options: SelectionOptions::ALLOW_SCP_OVERFLOW, ..Self::default() }
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if TeamQueue::parse(&self.team_queue).is_empty() {
            return Err(SelectionError::Config(format!(
                "team queue {:?} has no valid team digits",
                self.team_queue
            )));
        }

        let mut seen = HashSet::new();
        for rule in &self.spawner.rules {
            if !rule.role.is_scp() {
                return Err(SelectionError::Config(format!(
                    "{} is not an SCP role and cannot be in the spawn catalogue",
                    rule.role
                )));
            }
            if !seen.insert(rule.role) {
                return Err(SelectionError::Config(format!("{} is listed twice", rule.role)));
            }
        }

        if self.history_length == 0 {
            return Err(SelectionError::Config("history_length must be at least 1".into()));
        }

        Ok(())
    }
}
