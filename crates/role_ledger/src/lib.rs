//! Role Ledger Library
//!
//! Persists SCP tickets and human role history between rounds, and runs
//! round selections against them.
//! Ledger → MessagePack → LZ4 → SHA256 sidecar

pub mod error;
pub mod ledger;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use role_core::{
    estimate_overflow, human_role_for, HumanRoleSelector, OverflowEstimate, PlayerId,
    PlayerProfile, RoleId, RoleSelector, RoleSelectorResult, SelectionConfig, Team, TeamQueue,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub use error::LedgerError;
pub use ledger::{
    metadata_path, verify_ledger, HistoryBook, Ledger, LedgerMetadata, TicketBook, LEDGER_VERSION,
};

/// Outcome of one round, as written by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub seed: u64,
    pub result: RoleSelectorResult,
    pub assignments: BTreeMap<PlayerId, RoleId>,
}

impl RoundReport {
    pub fn count(&self, role: RoleId) -> usize {
        self.assignments.values().filter(|r| **r == role).count()
    }

    pub fn scp_count(&self) -> usize {
        self.assignments.values().filter(|r| r.is_scp()).count()
    }
}

/// Runs one selection for `roster`, reading and updating `ledger`.
///
/// The ledger is changed in memory only; saving it is up to the caller.
pub fn run_round(
    ledger: &mut Ledger,
    roster: &[PlayerProfile],
    config: &SelectionConfig,
    seed: u64,
) -> Result<RoundReport, LedgerError> {
    ledger.history.set_limit(config.history_length);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut target = HashMap::new();

    let result = {
        let Ledger { tickets, history, .. } = ledger;
        let mut humans = HumanRoleSelector::new(history);
        let mut selector: RoleSelector<'_, PlayerProfile> =
            RoleSelector::new(&config.spawner, tickets, &mut humans);
        selector.select_roles(
            &mut target,
            roster,
            &|_| true,
            config.options,
            &config.team_queue,
            &mut rng,
        )?
    };

    log::info!(
        "Round {} selected {} roles ({} SCPs)",
        seed,
        target.len(),
        result.spawned_scps()
    );

    Ok(RoundReport { seed, result, assignments: target.into_iter().collect() })
}

/// How a rotation plays out for a given player count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuePreview {
    pub queue: TeamQueue,
    pub players: usize,
    pub estimate: OverflowEstimate,
    /// Human roles handed out, in first-seen order
    pub human_roles: Vec<(RoleId, usize)>,
}

/// Sizes the teams `queue` would produce for `players` eligible players.
pub fn preview_queue(
    queue: &str,
    players: usize,
    max_spawnable_scps: usize,
    allow_overflow: bool,
) -> QueuePreview {
    let queue = TeamQueue::parse_or_default(queue);
    let estimate = estimate_overflow(&queue.total, players, max_spawnable_scps, allow_overflow);

    let mut human_roles: Vec<(RoleId, usize)> = Vec::new();
    for slot in 0..players.saturating_sub(estimate.spawn_scp_count) {
        let team = if queue.human.is_empty() {
            Team::ClassD
        } else {
            queue.human[slot % queue.human.len()]
        };
        let role = human_role_for(team);
        match human_roles.iter_mut().find(|(r, _)| *r == role) {
            Some((_, count)) => *count += 1,
            None => human_roles.push((role, 1)),
        }
    }

    QueuePreview { queue, players, estimate, human_roles }
}

/// Reads a selection config; `.yaml`/`.yml` as YAML, anything else as JSON.
pub fn load_config(path: &Path) -> Result<SelectionConfig, LedgerError> {
    let source = std::fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let config = if is_yaml {
        SelectionConfig::from_yaml_str(&source)?
    } else {
        SelectionConfig::from_json_str(&source)?
    };
    Ok(config)
}

/// Reads a JSON array of player profiles.
pub fn load_roster(path: &Path) -> Result<Vec<PlayerProfile>, LedgerError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use role_core::{RoleHistoryStore, SelectionOptions, TicketStore, DEFAULT_TEAM_QUEUE};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn roster(count: u32) -> Vec<PlayerProfile> {
        (1..=count).map(PlayerProfile::new).collect()
    }

    #[test]
    fn test_run_round_updates_ledger() -> Result<(), LedgerError> {
        let mut ledger = Ledger::new();
        let players = roster(8);
        let report = run_round(&mut ledger, &players, &SelectionConfig::default(), 7)?;

        assert_eq!(report.assignments.len(), 8);
        // Slots 1 and 7 of the default rotation.
        assert_eq!(report.scp_count(), 2);
        for player in &players {
            let tickets = ledger.tickets.get_tickets(player.id, 0);
            if report.assignments[&player.id].is_scp() {
                assert_eq!(tickets, 10);
                assert!(ledger.history.history(player.id).is_empty());
            } else {
                assert_eq!(tickets, 12);
                assert_eq!(ledger.history.history(player.id).len(), 1);
            }
        }
        Ok(())
    }

    #[test]
    fn test_same_seed_same_report() -> Result<(), LedgerError> {
        let players = roster(20);
        let config = SelectionConfig::default();
        let a = run_round(&mut Ledger::new(), &players, &config, 99)?;
        let b = run_round(&mut Ledger::new(), &players, &config, 99)?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_casual_config_leaves_ledger_alone() -> Result<(), LedgerError> {
        let mut ledger = Ledger::new();
        run_round(&mut ledger, &roster(10), &SelectionConfig::casual(), 3)?;
        assert!(ledger.tickets.is_empty());
        assert!(ledger.history.is_empty());
        Ok(())
    }

    #[test]
    fn test_preview_default_rotation() {
        let preview = preview_queue(DEFAULT_TEAM_QUEUE, 8, 5, false);
        assert_eq!(preview.estimate.spawn_scp_count, 2);
        assert!(!preview.estimate.scps_overflowing);

        // Human slots: 4 1 4 3 1 4 -> 3 Class-D, 2 guards, 1 scientist.
        assert_eq!(
            preview.human_roles,
            vec![(RoleId::ClassD, 3), (RoleId::FacilityGuard, 2), (RoleId::Scientist, 1)]
        );
    }

    #[test]
    fn test_preview_overflow() {
        let preview = preview_queue("0", 10, 5, false);
        assert!(preview.estimate.scps_overflowing);
        assert!((preview.estimate.hume_shield_multiplier - 1.25).abs() < 1e-6);
        assert_eq!(preview.human_roles, vec![(RoleId::ClassD, 5)]);
    }

    #[test]
    fn test_load_yaml_config_and_roster() -> Result<(), LedgerError> {
        let mut config_file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        config_file.write_all(b"team_queue: \"0444\"\noptions: 1\nhistory_length: 3\n")?;
        let config = load_config(config_file.path())?;
        assert_eq!(config.team_queue, "0444");
        assert_eq!(config.options, SelectionOptions::MODIFY_SCP_TICKETS);
        assert_eq!(config.history_length, 3);

        let mut roster_file = NamedTempFile::new()?;
        roster_file.write_all(br#"[{ "id": 1 }, { "id": 2, "scp_opt_out": true }]"#)?;
        let players = load_roster(roster_file.path())?;
        assert_eq!(players.len(), 2);
        assert!(players[1].scp_opt_out);
        Ok(())
    }
}
