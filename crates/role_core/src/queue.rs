//! Team queue decoding.
//!
//! A team queue is a digit string; each digit names a [`Team`] and the
//! string is read as a rotation that sizes every team for the round.

use crate::team::Team;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Rotation used when the caller does not supply one.
pub const DEFAULT_TEAM_QUEUE: &str = "4014314031441404134041434414";

/// Decoded team rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamQueue {
    /// Every accepted slot, SCP slots included.
    pub total: Vec<Team>,
    /// Accepted slots with SCP slots removed, relative order kept.
    pub human: Vec<Team>,
    /// Characters that were rejected, with their char index.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<(usize, char)>,
}

impl TeamQueue {
    /// Decodes a queue string. Characters that are not a defined team digit
    /// are skipped and recorded in [`TeamQueue::skipped`].
    pub fn parse(source: &str) -> Self {
        let mut total = Vec::with_capacity(source.len());
        let mut human = Vec::with_capacity(source.len());
        let mut skipped = Vec::new();

        for (idx, ch) in source.chars().enumerate() {
            let team = ch.to_digit(10).and_then(|d| u8::try_from(d).ok()).and_then(Team::from_u8);

            match team {
                Some(team) => {
                    total.push(team);
                    if !team.is_scp() {
                        human.push(team);
                    }
                }
                None => skipped.push((idx, ch)),
            }
        }

        if !skipped.is_empty() {
            warn!(
                queue = source,
                skipped = skipped.len(),
                "team queue contains characters that do not name a team; they were ignored"
            );
        }

        Self { total, human, skipped }
    }

    /// Decodes `source`, falling back to [`DEFAULT_TEAM_QUEUE`] when nothing
    /// in it could be decoded.
    pub fn parse_or_default(source: &str) -> Self {
        let queue = Self::parse(source);
        if queue.total.is_empty() {
            warn!(queue = source, "team queue is empty after decoding, using default rotation");
            return Self::parse(DEFAULT_TEAM_QUEUE);
        }
        queue
    }

    pub fn total_len(&self) -> usize {
        self.total.len()
    }

    pub fn human_len(&self) -> usize {
        self.human.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total.is_empty()
    }

    /// Re-encodes the accepted slots as a digit string.
    pub fn to_queue_string(&self) -> String {
        self.total.iter().map(Team::as_digit).collect()
    }
}

impl Default for TeamQueue {
    fn default() -> Self {
        Self::parse(DEFAULT_TEAM_QUEUE)
    }
}
