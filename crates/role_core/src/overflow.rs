//! SCP slot counting and overflow compensation.

use crate::team::Team;
use serde::{Deserialize, Serialize};

/// Hume Shield bonus per player left over once the SCP cap is hit.
pub const HUME_SHIELD_STEP: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverflowEstimate {
    /// SCP slots the round will actually spawn.
    pub spawn_scp_count: usize,
    pub scps_overflowing: bool,
    pub hume_shield_multiplier: f32,
}

impl Default for OverflowEstimate {
    fn default() -> Self {
        Self { spawn_scp_count: 0, scps_overflowing: false, hume_shield_multiplier: 1.0 }
    }
}

/// Walks `eligible_players` slots over the rotation and counts SCP slots.
///
/// An SCP slot reached while the count already equals `max_spawnable_scps`
/// marks the round as overflowing (unless `allow_overflow`) and ends the scan;
/// the multiplier grows with the players still unscanned at that point.
pub fn estimate_overflow(
    total_queue: &[Team],
    eligible_players: usize,
    max_spawnable_scps: usize,
    allow_overflow: bool,
) -> OverflowEstimate {
    let mut estimate = OverflowEstimate::default();
    if total_queue.is_empty() {
        return estimate;
    }

    for i in 0..eligible_players {
        if !total_queue[i % total_queue.len()].is_scp() {
            continue;
        }

        if estimate.spawn_scp_count == max_spawnable_scps && !allow_overflow {
            estimate.scps_overflowing = true;
            estimate.hume_shield_multiplier =
                1.0 + (eligible_players - i) as f32 * HUME_SHIELD_STEP;
            break;
        }

        estimate.spawn_scp_count += 1;
    }

    estimate
}
