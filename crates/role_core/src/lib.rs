//! # role_core - Round-Start Role Selection Engine
//!
//! Decides which role every player spawns as at the start of a round.
//!
//! ## Features
//! - Ticket-weighted SCP selection (players who miss out gain tickets)
//! - Preference-weighted SCP role assignment with spawn-chance queueing
//! - Team queue rotation for human roles, with role history to spread them
//! - SCP overflow detection and hume shield compensation
//! - Deterministic with an injected RNG (same seed = same result)

// Role identifiers mirror the game's own naming.
#![allow(clippy::upper_case_acronyms)]
// Builder-style constructors take many positional parameters.
#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod context;
pub mod error;
pub mod history;
pub mod human;
pub mod options;
pub mod overflow;
pub mod player;
pub mod queue;
pub mod scp_players;
pub mod scp_roles;
pub mod selector;
pub mod spawner;
pub mod team;
pub mod tickets;
pub mod weighted;

pub use config::SelectionConfig;
pub use context::{RoleSelectorContext, ScpSelectionScratch};
pub use error::{Result, SelectionError};
pub use history::{InMemoryRoleHistory, RoleHistoryStore, HISTORY_LENGTH};
pub use human::{human_role_for, HumanRoleAssigner, HumanRoleSelector};
pub use options::SelectionOptions;
pub use overflow::{estimate_overflow, OverflowEstimate};
pub use player::{PlayerId, PlayerProfile, RolePlayer};
pub use queue::{TeamQueue, DEFAULT_TEAM_QUEUE};
pub use scp_players::ScpPlayerSelector;
pub use scp_roles::ScpRoleSelector;
pub use selector::{RoleSelector, RoleSelectorResult};
pub use spawner::{ScpSpawnRule, ScpSpawner, SpawnableScp, DEFAULT_MAX_SPAWNABLE_SCPS};
pub use team::{RoleId, Team};
pub use tickets::{InMemoryTicketStore, TicketSession, TicketStore, DEFAULT_TICKETS, TICKET_GAIN};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
