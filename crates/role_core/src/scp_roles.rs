//! Assignment of queued SCP roles to the chosen candidates.

use crate::context::{RoleSelectorContext, ScpSelectionScratch};
use crate::player::RolePlayer;
use crate::scp_players::ScpPlayerSelector;
use crate::spawner::ScpSpawner;
use crate::team::RoleId;
use crate::tickets::TicketStore;
use crate::weighted::pick_weighted;
use rand::{Rng, RngCore};
use tracing::{debug, warn};

pub struct ScpRoleSelector;

impl ScpRoleSelector {
    /// Queues `scps_to_select` SCP roles, picks candidates, and writes one
    /// role per candidate into `ctx.roles`. Returns the number assigned.
    pub fn select_roles<P: RolePlayer>(
        ctx: &mut RoleSelectorContext<'_, P>,
        spawner: &ScpSpawner,
        scps_to_select: usize,
        tickets: &mut dyn TicketStore,
        rng: &mut dyn RngCore,
    ) -> usize {
        let mut scratch = ScpSelectionScratch::new();

        for _ in 0..scps_to_select {
            match Self::get_next_role(spawner, &mut scratch, rng) {
                Some(role) => scratch.roles.push(role),
                None => {
                    warn!("no spawnable SCP roles configured, skipping SCP selection");
                    break;
                }
            }
        }
        debug!(queued = ?scratch.roles, "SCP roles queued");

        let queued = scratch.roles.len();
        ScpPlayerSelector::select_players(ctx, &mut scratch, queued, tickets, rng);

        let mut assigned = 0;
        while !scratch.roles.is_empty() {
            let role = scratch.roles.remove(0);
            if !Self::assign_role(ctx, &mut scratch, role, rng) {
                warn!(
                    unassigned = scratch.roles.len() + 1,
                    "ran out of SCP candidates before every queued role was filled"
                );
                break;
            }
            assigned += 1;
        }

        scratch.reset();
        assigned
    }

    /// Draws the next SCP role, weighting roles not yet queued by their
    /// spawn chance. `None` only when the catalogue is empty.
    pub fn get_next_role(
        spawner: &ScpSpawner,
        scratch: &mut ScpSelectionScratch,
        rng: &mut dyn RngCore,
    ) -> Option<RoleId> {
        scratch.role_chances.clear();
        let mut total_weight = 0.0;

        for scp in spawner.spawnable() {
            let role = scp.role();
            if scratch.roles.contains(&role) {
                continue;
            }
            let chance = f64::from(scp.spawn_chance(&scratch.roles));
            scratch.role_chances.push((role, chance));
            total_weight += chance;
        }

        let picked = if total_weight == 0.0 {
            Self::get_random_role(spawner, scratch, rng)
        } else {
            pick_weighted(&scratch.role_chances, total_weight, |(_, c)| *c, rng)
                .map(|pos| scratch.role_chances[pos].0)
        };

        scratch.role_chances.clear();
        picked
    }

    /// Uniform pick among the spawnable roles queued the fewest times so far.
    fn get_random_role(
        spawner: &ScpSpawner,
        scratch: &mut ScpSelectionScratch,
        rng: &mut dyn RngCore,
    ) -> Option<RoleId> {
        scratch.backup_roles.clear();
        let mut min_occurrences = usize::MAX;

        for scp in spawner.spawnable() {
            let role = scp.role();
            let occurrences = scratch.roles.iter().filter(|r| **r == role).count();
            if occurrences < min_occurrences {
                scratch.backup_roles.clear();
                min_occurrences = occurrences;
            }
            if occurrences == min_occurrences && !scratch.backup_roles.contains(&role) {
                scratch.backup_roles.push(role);
            }
        }

        if scratch.backup_roles.is_empty() {
            return None;
        }
        let role = scratch.backup_roles[rng.gen_range(0..scratch.backup_roles.len())];
        scratch.backup_roles.clear();
        Some(role)
    }

    /// Gives `role` to one of `scratch.chosen`, weighted by how much each
    /// candidate prefers it over the roles still waiting.
    fn assign_role<P: RolePlayer>(
        ctx: &mut RoleSelectorContext<'_, P>,
        scratch: &mut ScpSelectionScratch,
        role: RoleId,
        rng: &mut dyn RngCore,
    ) -> bool {
        if scratch.chosen.is_empty() {
            return false;
        }

        scratch.candidate_weights.clear();
        let mut min_score = f64::MAX;
        for &idx in &scratch.chosen {
            let score =
                f64::from(ctx.player(idx).combined_preference_points(role, &scratch.roles));
            min_score = min_score.min(score);
            scratch.candidate_weights.push((idx, score));
        }

        let candidate_count = scratch.candidate_weights.len() as i32;
        let mut total_weight = 0.0;
        for (_, weight) in scratch.candidate_weights.iter_mut() {
            *weight = (*weight - min_score + 1.0).powi(candidate_count);
            total_weight += *weight;
        }

        let Some(pos) = pick_weighted(&scratch.candidate_weights, total_weight, |(_, w)| *w, rng)
        else {
            return false;
        };
        let idx = scratch.candidate_weights[pos].0;
        scratch.candidate_weights.clear();

        debug!(player = %ctx.player(idx).id(), %role, "SCP role assigned");
        ctx.assign(idx, role);
        scratch.chosen.retain(|c| *c != idx);
        true
    }
}
