//! SCP role metadata: which SCPs may spawn and how likely each one is.

use crate::team::RoleId;
use serde::{Deserialize, Serialize};

/// Default cap on SCPs per round.
pub const DEFAULT_MAX_SPAWNABLE_SCPS: usize = 5;

/// An SCP role that can be queued at round start.
pub trait SpawnableScp {
    fn role(&self) -> RoleId;

    /// Relative chance of queueing this role given the roles queued so far.
    fn spawn_chance(&self, already_queued: &[RoleId]) -> f32;
}

/// Data-driven spawn rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScpSpawnRule {
    pub role: RoleId,
    #[serde(default = "default_chance")]
    pub base_chance: f32,
    /// Never queued as the first SCP of a round.
    #[serde(default)]
    pub requires_company: bool,
}

fn default_chance() -> f32 {
    1.0
}

impl ScpSpawnRule {
    pub fn new(role: RoleId, base_chance: f32) -> Self {
        Self { role, base_chance, requires_company: false }
    }

    pub fn with_company(mut self) -> Self {
        self.requires_company = true;
        self
    }
}

impl SpawnableScp for ScpSpawnRule {
    fn role(&self) -> RoleId {
        self.role
    }

    fn spawn_chance(&self, already_queued: &[RoleId]) -> f32 {
        if self.requires_company && already_queued.is_empty() {
            return 0.0;
        }
        self.base_chance.max(0.0)
    }
}

/// Spawnable SCP catalogue and the per-round cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScpSpawner {
    #[serde(default = "default_max_scps")]
    pub max_spawnable_scps: usize,
    #[serde(default = "ScpSpawner::default_rules")]
    pub rules: Vec<ScpSpawnRule>,
}

fn default_max_scps() -> usize {
    DEFAULT_MAX_SPAWNABLE_SCPS
}

impl ScpSpawner {
    pub fn new(max_spawnable_scps: usize, rules: Vec<ScpSpawnRule>) -> Self {
        Self { max_spawnable_scps, rules }
    }

    pub fn default_rules() -> Vec<ScpSpawnRule> {
        vec![
            ScpSpawnRule::new(RoleId::Scp173, 1.0),
            ScpSpawnRule::new(RoleId::Scp106, 1.0),
            ScpSpawnRule::new(RoleId::Scp049, 1.0),
            ScpSpawnRule::new(RoleId::Scp079, 1.0).with_company(),
            ScpSpawnRule::new(RoleId::Scp096, 1.0),
            ScpSpawnRule::new(RoleId::Scp939, 1.0),
            ScpSpawnRule::new(RoleId::Scp3114, 0.0),
        ]
    }

    pub fn spawnable(&self) -> impl Iterator<Item = &dyn SpawnableScp> {
        self.rules.iter().map(|r| r as &dyn SpawnableScp)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for ScpSpawner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SPAWNABLE_SCPS, Self::default_rules())
    }
}
