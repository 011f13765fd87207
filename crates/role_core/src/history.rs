//! Human role history, used to rotate players through human roles.

use crate::player::PlayerId;
use crate::team::RoleId;
use std::collections::HashMap;

/// Number of past human roles remembered per player.
pub const HISTORY_LENGTH: usize = 5;

pub trait RoleHistoryStore {
    /// Past human roles of a player, oldest first.
    fn history(&self, player: PlayerId) -> &[RoleId];

    /// Appends a role, dropping the oldest entries beyond the store's limit.
    fn record(&mut self, player: PlayerId, role: RoleId);

    /// Times `role` appears in the player's remembered history.
    fn occurrences(&self, player: PlayerId, role: RoleId) -> usize {
        self.history(player).iter().filter(|r| **r == role).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryRoleHistory {
    limit: usize,
    entries: HashMap<PlayerId, Vec<RoleId>>,
}

impl InMemoryRoleHistory {
    pub fn new(limit: usize) -> Self {
        Self { limit, entries: HashMap::new() }
    }
}

impl Default for InMemoryRoleHistory {
    fn default() -> Self {
        Self::new(HISTORY_LENGTH)
    }
}

impl RoleHistoryStore for InMemoryRoleHistory {
    fn history(&self, player: PlayerId) -> &[RoleId] {
        self.entries.get(&player).map(Vec::as_slice).unwrap_or(&[])
    }

    fn record(&mut self, player: PlayerId, role: RoleId) {
        let limit = self.limit;
        let entry = self.entries.entry(player).or_default();
        entry.push(role);
        if entry.len() > limit {
            let excess = entry.len() - limit;
            entry.drain(..excess);
        }
    }
}
