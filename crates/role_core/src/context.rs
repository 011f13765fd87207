//! Per-call selection state.

use crate::options::SelectionOptions;
use crate::player::{PlayerId, RolePlayer};
use crate::team::{RoleId, Team};
use std::collections::HashMap;

/// Inputs and output of one `select_roles` call.
pub struct RoleSelectorContext<'a, P> {
    /// Output map, filled in place.
    pub roles: &'a mut HashMap<PlayerId, RoleId>,
    pub players: &'a [P],
    predicate: &'a dyn Fn(&P) -> bool,
    pub human_queue: &'a [Team],
    pub total_queue: &'a [Team],
    pub options: SelectionOptions,
}

impl<'a, P: RolePlayer> RoleSelectorContext<'a, P> {
    pub fn new(
        roles: &'a mut HashMap<PlayerId, RoleId>,
        players: &'a [P],
        predicate: &'a dyn Fn(&P) -> bool,
        human_queue: &'a [Team],
        total_queue: &'a [Team],
        options: SelectionOptions,
    ) -> Self {
        Self { roles, players, predicate, human_queue, total_queue, options }
    }

    /// Verified, not yet assigned, and accepted by the caller's predicate.
    pub fn is_eligible(&self, player: &P) -> bool {
        player.is_verified() && !self.roles.contains_key(&player.id()) && (self.predicate)(player)
    }

    /// Indices of currently eligible players, in source order.
    pub fn eligible_indices(&self) -> Vec<usize> {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| self.is_eligible(p))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Eligible players that have not opted out of SCP play.
    pub fn scp_eligible_indices(&self) -> Vec<usize> {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| self.is_eligible(p) && !p.is_scp_opted_out())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn player(&self, idx: usize) -> &P {
        &self.players[idx]
    }

    pub fn assign(&mut self, idx: usize, role: RoleId) {
        let id = self.players[idx].id();
        self.roles.insert(id, role);
    }
}

/// Scratch buffers for one SCP selection pass.
///
/// Candidates are held as indices into the context's player slice.
#[derive(Debug, Default)]
pub struct ScpSelectionScratch {
    /// Candidate players for SCP slots.
    pub chosen: Vec<usize>,
    /// SCP roles queued but not yet assigned.
    pub roles: Vec<RoleId>,
    pub role_chances: Vec<(RoleId, f64)>,
    pub candidate_weights: Vec<(usize, f64)>,
    pub backup_roles: Vec<RoleId>,
}

impl ScpSelectionScratch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.chosen.clear();
        self.roles.clear();
        self.role_chances.clear();
        self.candidate_weights.clear();
        self.backup_roles.clear();
    }

    pub fn is_clear(&self) -> bool {
        self.chosen.is_empty()
            && self.roles.is_empty()
            && self.role_chances.is_empty()
            && self.candidate_weights.is_empty()
            && self.backup_roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerProfile;

    #[test]
    fn test_eligibility_combines_default_and_caller_predicate() {
        let players = vec![
            PlayerProfile::new(1),
            PlayerProfile::new(2).unverified(),
            PlayerProfile::new(3),
            PlayerProfile::new(4).opted_out(),
        ];
        let mut roles = HashMap::new();
        roles.insert(PlayerId(3), RoleId::ClassD);
        let skip_four = |p: &PlayerProfile| p.id != PlayerId(4);

        let ctx = RoleSelectorContext::new(
            &mut roles,
            &players,
            &skip_four,
            &[],
            &[],
            SelectionOptions::NONE,
        );

        assert_eq!(ctx.eligible_indices(), vec![0]);
        assert_eq!(ctx.scp_eligible_indices(), vec![0]);
    }

    #[test]
    fn test_scp_eligibility_excludes_opt_out() {
        let players = vec![PlayerProfile::new(1), PlayerProfile::new(2).opted_out()];
        let mut roles = HashMap::new();
        let any = |_: &PlayerProfile| true;
        let mut ctx =
            RoleSelectorContext::new(&mut roles, &players, &any, &[], &[], SelectionOptions::NONE);

        assert_eq!(ctx.eligible_indices(), vec![0, 1]);
        assert_eq!(ctx.scp_eligible_indices(), vec![0]);

        ctx.assign(0, RoleId::Scp173);
        assert_eq!(ctx.eligible_indices(), vec![1]);
        assert!(ctx.scp_eligible_indices().is_empty());
    }

    #[test]
    fn test_scratch_reset() {
        let mut scratch = ScpSelectionScratch::new();
        scratch.chosen.push(3);
        scratch.roles.push(RoleId::Scp096);
        scratch.backup_roles.push(RoleId::Scp173);
        assert!(!scratch.is_clear());

        scratch.reset();
        assert!(scratch.is_clear());
    }
}
