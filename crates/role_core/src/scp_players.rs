//! Ticket-weighted choice of which players become SCPs.

use crate::context::{RoleSelectorContext, ScpSelectionScratch};
use crate::options::SelectionOptions;
use crate::player::RolePlayer;
use crate::tickets::{TicketStore, DEFAULT_TICKETS, TICKET_GAIN};
use crate::weighted::pick_weighted;
use rand::{Rng, RngCore};
use tracing::{debug, warn};

pub struct ScpPlayerSelector;

impl ScpPlayerSelector {
    /// Fills `scratch.chosen` with up to `scp_count` candidates and, when the
    /// context asks for it, updates tickets of every SCP-eligible player.
    pub fn select_players<P: RolePlayer>(
        ctx: &RoleSelectorContext<'_, P>,
        scratch: &mut ScpSelectionScratch,
        scp_count: usize,
        tickets: &mut dyn TicketStore,
        rng: &mut dyn RngCore,
    ) {
        Self::generate_scps(ctx, scratch, scp_count, tickets, rng);

        if ctx.options.contains(SelectionOptions::MODIFY_SCP_TICKETS) {
            Self::update_tickets(ctx, scratch, tickets);
        }
    }

    fn generate_scps<P: RolePlayer>(
        ctx: &RoleSelectorContext<'_, P>,
        scratch: &mut ScpSelectionScratch,
        scp_count: usize,
        tickets: &dyn TicketStore,
        rng: &mut dyn RngCore,
    ) {
        scratch.chosen.clear();
        if scp_count < 1 {
            return;
        }

        let eligible = ctx.scp_eligible_indices();

        // Everyone tied at the highest ticket count.
        let mut ticket_count = 0;
        for &idx in &eligible {
            let value = tickets.get_tickets(ctx.player(idx).id(), DEFAULT_TICKETS);
            if value >= ticket_count {
                if value > ticket_count {
                    scratch.chosen.clear();
                    ticket_count = value;
                }
                scratch.chosen.push(idx);
            }
        }

        if scratch.chosen.len() > 1 {
            let keep = scratch.chosen[rng.gen_range(0..scratch.chosen.len())];
            scratch.chosen.clear();
            scratch.chosen.push(keep);
        }

        let mut remaining = scp_count.saturating_sub(scratch.chosen.len());
        debug!(
            highest_tickets = ticket_count,
            eligible = eligible.len(),
            remaining,
            "highest-ticket candidate picked"
        );
        if remaining == 0 {
            return;
        }

        // Tickets raised to the number of open slots, so lucky players are
        // strongly favoured for every extra slot.
        let exponent = remaining as i32;
        scratch.candidate_weights.clear();
        let mut total_weight = 0.0;
        for &idx in &eligible {
            if scratch.chosen.contains(&idx) {
                continue;
            }
            let value = tickets.get_tickets(ctx.player(idx).id(), DEFAULT_TICKETS);
            let weight = f64::from(value).powi(exponent);
            scratch.candidate_weights.push((idx, weight));
            total_weight += weight;
        }

        while remaining > 0 {
            let Some(pos) =
                pick_weighted(&scratch.candidate_weights, total_weight, |(_, w)| *w, rng)
            else {
                warn!(
                    missing = remaining,
                    requested = scp_count,
                    "not enough SCP candidates, spawning fewer SCPs"
                );
                break;
            };

            let (idx, weight) = scratch.candidate_weights.remove(pos);
            scratch.chosen.push(idx);
            total_weight -= weight;
            remaining -= 1;
        }

        scratch.candidate_weights.clear();
    }

    fn update_tickets<P: RolePlayer>(
        ctx: &RoleSelectorContext<'_, P>,
        scratch: &ScpSelectionScratch,
        tickets: &mut dyn TicketStore,
    ) {
        for idx in ctx.scp_eligible_indices() {
            let id = ctx.player(idx).id();
            if scratch.chosen.contains(&idx) {
                tickets.modify_tickets(id, DEFAULT_TICKETS);
            } else {
                let current = tickets.get_tickets(id, DEFAULT_TICKETS);
                tickets.modify_tickets(id, current + TICKET_GAIN);
            }
        }
    }
}
