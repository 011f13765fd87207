//! Human role distribution over the players left after SCP selection.

use crate::context::RoleSelectorContext;
use crate::error::Result;
use crate::history::RoleHistoryStore;
use crate::options::SelectionOptions;
use crate::player::RolePlayer;
use crate::team::{RoleId, Team};
use rand::{Rng, RngCore};
use tracing::debug;

/// Fills every eligible player not yet present in the context's role map.
pub trait HumanRoleAssigner<P: RolePlayer> {
    /// Returns the number of players assigned.
    fn assign_humans(
        &mut self,
        ctx: &mut RoleSelectorContext<'_, P>,
        rng: &mut dyn RngCore,
    ) -> Result<usize>;
}

/// Round-start role for a human team.
pub fn human_role_for(team: Team) -> RoleId {
    match team {
        Team::ClassD => RoleId::ClassD,
        Team::Scientists => RoleId::Scientist,
        Team::FoundationForces => RoleId::FacilityGuard,
        Team::ChaosInsurgency => RoleId::ChaosConscript,
        _ => RoleId::ClassD,
    }
}

/// Walks the human queue and gives each slot's role to the player who has
/// had it least often recently.
pub struct HumanRoleSelector<'h> {
    history: &'h mut dyn RoleHistoryStore,
}

impl<'h> HumanRoleSelector<'h> {
    pub fn new(history: &'h mut dyn RoleHistoryStore) -> Self {
        Self { history }
    }
}

impl<P: RolePlayer> HumanRoleAssigner<P> for HumanRoleSelector<'_> {
    fn assign_humans(
        &mut self,
        ctx: &mut RoleSelectorContext<'_, P>,
        rng: &mut dyn RngCore,
    ) -> Result<usize> {
        let mut remaining = ctx.eligible_indices();
        let count = remaining.len();
        let record = ctx.options.contains(SelectionOptions::MODIFY_HUMAN_HISTORY);

        let mut tied = Vec::new();
        for slot in 0..count {
            let role = if ctx.human_queue.is_empty() {
                RoleId::ClassD
            } else {
                human_role_for(ctx.human_queue[slot % ctx.human_queue.len()])
            };

            let mut fewest = usize::MAX;
            tied.clear();
            for (pos, &idx) in remaining.iter().enumerate() {
                let seen = self.history.occurrences(ctx.player(idx).id(), role);
                if seen < fewest {
                    fewest = seen;
                    tied.clear();
                }
                if seen == fewest {
                    tied.push(pos);
                }
            }

            let pos = tied[rng.gen_range(0..tied.len())];
            let idx = remaining.remove(pos);
            let id = ctx.player(idx).id();
            ctx.assign(idx, role);
            if record {
                self.history.record(id, role);
            }
        }

        debug!(assigned = count, "human roles assigned");
        Ok(count)
    }
}
