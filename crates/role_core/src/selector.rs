//! Round-start entry point.

use crate::context::RoleSelectorContext;
use crate::error::{Result, SelectionError};
use crate::human::HumanRoleAssigner;
use crate::options::SelectionOptions;
use crate::overflow::{estimate_overflow, OverflowEstimate};
use crate::player::{PlayerId, RolePlayer};
use crate::queue::TeamQueue;
use crate::scp_roles::ScpRoleSelector;
use crate::spawner::ScpSpawner;
use crate::team::{RoleId, Team};
use crate::tickets::{TicketSession, TicketStore};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, info};

/// Outcome of one selection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSelectorResult {
    scps_overflowing: bool,
    hume_shield_multiplier: f32,
    human_queue: Vec<Team>,
    human_queue_length: usize,
    spawned_scps: usize,
}

impl RoleSelectorResult {
    fn new(estimate: OverflowEstimate, human_queue: Vec<Team>, spawned_scps: usize) -> Self {
        Self {
            scps_overflowing: estimate.scps_overflowing,
            hume_shield_multiplier: estimate.hume_shield_multiplier,
            human_queue_length: human_queue.len(),
            human_queue,
            spawned_scps,
        }
    }

    pub fn scps_overflowing(&self) -> bool {
        self.scps_overflowing
    }

    /// 1.0 unless the SCP cap was exceeded.
    pub fn hume_shield_multiplier(&self) -> f32 {
        self.hume_shield_multiplier
    }

    pub fn human_queue(&self) -> &[Team] {
        &self.human_queue
    }

    pub fn human_queue_length(&self) -> usize {
        self.human_queue_length
    }

    pub fn spawned_scps(&self) -> usize {
        self.spawned_scps
    }
}

/// Decides the role of every eligible player at round start.
pub struct RoleSelector<'e, P> {
    spawner: &'e ScpSpawner,
    tickets: &'e mut dyn TicketStore,
    humans: &'e mut dyn HumanRoleAssigner<P>,
}

impl<'e, P: RolePlayer> RoleSelector<'e, P> {
    pub fn new(
        spawner: &'e ScpSpawner,
        tickets: &'e mut dyn TicketStore,
        humans: &'e mut dyn HumanRoleAssigner<P>,
    ) -> Self {
        Self { spawner, tickets, humans }
    }

    /// Fills `target` with a role for every player that is verified, not
    /// already in `target`, and accepted by `predicate`.
    ///
    /// Ticket changes are committed only when the whole pass succeeds,
    /// including the ticket store's flush. On failure `target` may hold a
    /// partial assignment and must be discarded.
    ///
    /// Fails with [`SelectionError::InvalidArgument`] before touching `target`
    /// when two players share an id or the spawner lists a non-SCP role.
    pub fn select_roles(
        &mut self,
        target: &mut HashMap<PlayerId, RoleId>,
        players: &[P],
        predicate: &dyn Fn(&P) -> bool,
        options: SelectionOptions,
        team_queue: &str,
        rng: &mut dyn RngCore,
    ) -> Result<RoleSelectorResult> {
        if let Err(err) = self.check_arguments(players) {
            error!(options = ?options, team_queue, error = %err, "role selection rejected");
            return Err(err);
        }

        let queue = TeamQueue::parse_or_default(team_queue);
        let mut session = TicketSession::open(&mut *self.tickets);

        let outcome = {
            let mut ctx = RoleSelectorContext::new(
                &mut *target,
                players,
                predicate,
                &queue.human,
                &queue.total,
                options,
            );

            let eligible = ctx.eligible_indices().len();
            if eligible == 0 {
                debug!(players = players.len(), "no eligible players, nothing to select");
                return Ok(RoleSelectorResult::new(
                    OverflowEstimate::default(),
                    queue.human.clone(),
                    0,
                ));
            }

            let estimate = estimate_overflow(
                &queue.total,
                eligible,
                self.spawner.max_spawnable_scps,
                options.contains(SelectionOptions::ALLOW_SCP_OVERFLOW),
            );
            debug!(
                eligible,
                scp_slots = estimate.spawn_scp_count,
                overflowing = estimate.scps_overflowing,
                "team queue sized"
            );

            let spawned = if estimate.spawn_scp_count > 0 {
                ScpRoleSelector::select_roles(
                    &mut ctx,
                    self.spawner,
                    estimate.spawn_scp_count,
                    &mut session,
                    rng,
                )
            } else {
                0
            };

            self.humans
                .assign_humans(&mut ctx, rng)
                .map(|humans| (estimate, spawned, humans, eligible))
        };

        let committed = match outcome {
            Ok(summary) => session.commit().map(|_| summary),
            Err(err) => {
                session.discard();
                Err(err)
            }
        };

        match committed {
            Ok((estimate, spawned, humans, eligible)) => {
                info!(
                    eligible,
                    scps = spawned,
                    humans,
                    overflowing = estimate.scps_overflowing,
                    hume_shield_multiplier = estimate.hume_shield_multiplier,
                    "round roles selected"
                );
                Ok(RoleSelectorResult::new(estimate, queue.human, spawned))
            }
            Err(err) => {
                error!(
                    options = ?options,
                    team_queue,
                    assignments = ?target,
                    error = %err,
                    "role selection failed"
                );
                Err(err)
            }
        }
    }

    fn check_arguments(&self, players: &[P]) -> Result<()> {
        let mut seen = HashSet::with_capacity(players.len());
        for player in players {
            if !seen.insert(player.id()) {
                return Err(SelectionError::InvalidArgument(format!(
                    "player {} appears more than once in the roster",
                    player.id()
                )));
            }
        }

        if let Some(scp) = self.spawner.spawnable().find(|scp| !scp.role().is_scp()) {
            return Err(SelectionError::InvalidArgument(format!(
                "{} is not an SCP role and cannot be spawned as one",
                scp.role()
            )));
        }

        Ok(())
    }
}
