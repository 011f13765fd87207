//! Property tests over random rosters and queues.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use role_core::{
    estimate_overflow, HumanRoleSelector, InMemoryRoleHistory, InMemoryTicketStore, PlayerId,
    PlayerProfile, RoleId, RoleSelector, ScpSpawner, SelectionOptions, TeamQueue, TicketStore,
    DEFAULT_TICKETS,
};
use std::collections::HashMap;

fn arb_player(id: u32) -> impl Strategy<Value = PlayerProfile> {
    (any::<bool>(), prop::bool::weighted(0.15), -5i32..5, -5i32..5).prop_map(
        move |(verified, opted_out, p173, p096)| {
            let mut player = PlayerProfile::new(id)
                .with_preference(RoleId::Scp173, p173)
                .with_preference(RoleId::Scp096, p096);
            player.verified = verified || id % 4 != 0;
            player.scp_opt_out = opted_out;
            player
        },
    )
}

fn arb_roster() -> impl Strategy<Value = Vec<PlayerProfile>> {
    (0usize..40).prop_flat_map(|count| {
        (1..=count as u32).map(arb_player).collect::<Vec<_>>()
    })
}

proptest! {
    /// Property: every verified player ends up with exactly one role
    #[test]
    fn prop_all_verified_players_assigned(
        players in arb_roster(),
        queue in "[0-7]{1,30}",
        cap in 0usize..8,
        seed in any::<u64>()
    ) {
        let spawner = ScpSpawner::new(cap, ScpSpawner::default_rules());
        let mut tickets = InMemoryTicketStore::new();
        let mut history = InMemoryRoleHistory::default();
        let mut humans = HumanRoleSelector::new(&mut history);
        let mut selector: RoleSelector<'_, PlayerProfile> =
            RoleSelector::new(&spawner, &mut tickets, &mut humans);
        let mut target = HashMap::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let result = selector
            .select_roles(&mut target, &players, &|_| true, SelectionOptions::default(), &queue, &mut rng)
            .unwrap();

        let verified: Vec<PlayerId> =
            players.iter().filter(|p| p.verified).map(|p| p.id).collect();
        prop_assert_eq!(target.len(), verified.len());
        for id in &verified {
            prop_assert!(target.contains_key(id));
        }

        let scps = target.values().filter(|r| r.is_scp()).count();
        prop_assert!(scps <= cap);
        prop_assert_eq!(scps, result.spawned_scps());
        for player in players.iter().filter(|p| p.scp_opt_out) {
            prop_assert!(target.get(&player.id).map_or(true, |r| !r.is_scp()));
        }
    }

    /// Property: SCP count is the rotation's slot count, capped, and limited by candidates
    #[test]
    fn prop_scp_count_matches_estimate(
        players in arb_roster(),
        queue in "[0-4]{1,20}",
        cap in 1usize..6,
        seed in any::<u64>()
    ) {
        let spawner = ScpSpawner::new(cap, ScpSpawner::default_rules());
        let mut tickets = InMemoryTicketStore::new();
        let mut history = InMemoryRoleHistory::default();
        let mut humans = HumanRoleSelector::new(&mut history);
        let mut selector: RoleSelector<'_, PlayerProfile> =
            RoleSelector::new(&spawner, &mut tickets, &mut humans);
        let mut target = HashMap::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        selector
            .select_roles(&mut target, &players, &|_| true, SelectionOptions::NONE, &queue, &mut rng)
            .unwrap();

        let decoded = TeamQueue::parse(&queue);
        let eligible = players.iter().filter(|p| p.verified).count();
        let candidates = players.iter().filter(|p| p.verified && !p.scp_opt_out).count();
        let estimate = estimate_overflow(&decoded.total, eligible, cap, false);

        let scps = target.values().filter(|r| r.is_scp()).count();
        prop_assert_eq!(scps, estimate.spawn_scp_count.min(candidates));
    }

    /// Property: a chosen SCP resets to the default, everyone else eligible gains 2
    #[test]
    fn prop_ticket_updates(
        players in arb_roster(),
        start in prop::collection::vec(0i32..60, 40),
        seed in any::<u64>()
    ) {
        let spawner = ScpSpawner::default();
        let mut tickets = InMemoryTicketStore::with_tickets(
            players.iter().map(|p| (p.id, start[p.id.0 as usize - 1])),
        );
        let before = tickets.clone();
        let mut history = InMemoryRoleHistory::default();
        let mut humans = HumanRoleSelector::new(&mut history);
        let mut target = HashMap::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        {
            let mut selector: RoleSelector<'_, PlayerProfile> =
                RoleSelector::new(&spawner, &mut tickets, &mut humans);
            selector
                .select_roles(&mut target, &players, &|_| true, SelectionOptions::MODIFY_SCP_TICKETS, "0", &mut rng)
                .unwrap();
        }

        for player in &players {
            let old = before.get_tickets(player.id, DEFAULT_TICKETS);
            let new = tickets.get_tickets(player.id, DEFAULT_TICKETS);
            if !player.verified || player.scp_opt_out {
                prop_assert_eq!(new, old);
            } else if target[&player.id].is_scp() {
                prop_assert_eq!(new, DEFAULT_TICKETS);
            } else {
                prop_assert_eq!(new, old + 2);
            }
        }
    }

    /// Property: the multiplier is 1.0 exactly when the round does not overflow
    #[test]
    fn prop_multiplier_tracks_overflow(
        queue in "[0-7]{1,30}",
        eligible in 0usize..80,
        cap in 0usize..8
    ) {
        let decoded = TeamQueue::parse(&queue);
        let estimate = estimate_overflow(&decoded.total, eligible, cap, false);

        prop_assert!(estimate.spawn_scp_count <= cap);
        if estimate.scps_overflowing {
            prop_assert!(estimate.hume_shield_multiplier > 1.0);
        } else {
            prop_assert_eq!(estimate.hume_shield_multiplier, 1.0);
        }
    }
}
