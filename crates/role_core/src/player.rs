//! Player handles as seen by the selector.

use crate::team::RoleId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque player identity supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the selector needs to know about a connected player.
pub trait RolePlayer {
    fn id(&self) -> PlayerId;

    /// Unverified players (still authenticating) never receive a role.
    fn is_verified(&self) -> bool;

    /// Players who opted out of SCP play are skipped by SCP selection.
    fn is_scp_opted_out(&self) -> bool;

    /// Stated preference for a single SCP role.
    fn preference_points(&self, role: RoleId) -> i32;

    /// Preference for `role` relative to the other roles still waiting for
    /// a player: a strong preference for one of `others` counts against `role`.
    /// Saturates at the `i32` bounds.
    fn combined_preference_points(&self, role: RoleId, others: &[RoleId]) -> i32 {
        others.iter().fold(self.preference_points(role), |acc, other| {
            acc.saturating_sub(self.preference_points(*other))
        })
    }
}

/// Plain data player, as read from a roster file or built in tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: PlayerId,
    #[serde(default)]
    pub nickname: String,
    #[serde(default = "default_verified")]
    pub verified: bool,
    #[serde(default)]
    pub scp_opt_out: bool,
    /// Missing roles count as neutral (0).
    #[serde(default)]
    pub preferences: HashMap<RoleId, i32>,
}

fn default_verified() -> bool {
    true
}

impl PlayerProfile {
    pub fn new(id: u32) -> Self {
        Self {
            id: PlayerId(id),
            nickname: String::new(),
            verified: true,
            scp_opt_out: false,
            preferences: HashMap::new(),
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = nickname.into();
        self
    }

    pub fn with_preference(mut self, role: RoleId, points: i32) -> Self {
        self.preferences.insert(role, points);
        self
    }

    pub fn opted_out(mut self) -> Self {
        self.scp_opt_out = true;
        self
    }

    pub fn unverified(mut self) -> Self {
        self.verified = false;
        self
    }
}

impl RolePlayer for PlayerProfile {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn is_verified(&self) -> bool {
        self.verified
    }

    fn is_scp_opted_out(&self) -> bool {
        self.scp_opt_out
    }

    fn preference_points(&self, role: RoleId) -> i32 {
        self.preferences.get(&role).copied().unwrap_or(0)
    }
}

impl<T: RolePlayer + ?Sized> RolePlayer for &T {
    fn id(&self) -> PlayerId {
        (**self).id()
    }

    fn is_verified(&self) -> bool {
        (**self).is_verified()
    }

    fn is_scp_opted_out(&self) -> bool {
        (**self).is_scp_opted_out()
    }

    fn preference_points(&self, role: RoleId) -> i32 {
        (**self).preference_points(role)
    }

    fn combined_preference_points(&self, role: RoleId, others: &[RoleId]) -> i32 {
        (**self).combined_preference_points(role, others)
    }
}
