//! SCP ticket storage.
//!
//! Tickets are a per-player fairness counter: players who keep missing out
//! on SCP slots gain tickets, players who get picked are reset.

use crate::error::Result;
use crate::player::PlayerId;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, error, warn};

/// Ticket count assumed for players without a stored value.
pub const DEFAULT_TICKETS: i32 = 10;
/// Tickets gained per round a player was eligible but not picked.
pub const TICKET_GAIN: i32 = 2;

/// Persisted ticket counters.
pub trait TicketStore {
    fn get_tickets(&self, player: PlayerId, default: i32) -> i32;

    fn modify_tickets(&mut self, player: PlayerId, value: i32);

    /// Persists pending writes. Stores without a backing medium do nothing.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Ticket store kept in memory; used by tests and embedded hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryTicketStore {
    tickets: HashMap<PlayerId, i32>,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tickets(entries: impl IntoIterator<Item = (PlayerId, i32)>) -> Self {
        Self { tickets: entries.into_iter().collect() }
    }

    pub fn get(&self, player: PlayerId) -> Option<i32> {
        self.tickets.get(&player).copied()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

impl TicketStore for InMemoryTicketStore {
    fn get_tickets(&self, player: PlayerId, default: i32) -> i32 {
        self.tickets.get(&player).copied().unwrap_or(default)
    }

    fn modify_tickets(&mut self, player: PlayerId, value: i32) {
        self.tickets.insert(player, value.max(0));
    }
}

/// Batches ticket writes for one selection pass.
///
/// Reads see pending writes. Pending writes reach the underlying store on
/// [`TicketSession::commit`], or when the session is dropped.
pub struct TicketSession<'s> {
    store: &'s mut dyn TicketStore,
    pending: BTreeMap<PlayerId, i32>,
}

impl<'s> TicketSession<'s> {
    pub fn open(store: &'s mut dyn TicketStore) -> Self {
        Self { store, pending: BTreeMap::new() }
    }

    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Writes pending changes through and flushes the store.
    ///
    /// If the flush fails, every written player is set back to the value the
    /// store reported before the write. Players that had no stored value are
    /// set to [`DEFAULT_TICKETS`], which reads back the same.
    pub fn commit(mut self) -> Result<usize> {
        let previous: Vec<(PlayerId, i32)> = self
            .pending
            .keys()
            .map(|player| (*player, self.store.get_tickets(*player, DEFAULT_TICKETS)))
            .collect();

        let written = self.write_back();
        if let Err(err) = self.store.flush() {
            for (player, value) in previous {
                self.store.modify_tickets(player, value);
            }
            warn!(written, error = %err, "ticket flush failed, previous values restored");
            return Err(err);
        }

        debug!(written, "ticket session committed");
        Ok(written)
    }

    /// Drops pending changes without touching the store.
    pub fn discard(mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    fn write_back(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let written = pending.len();
        for (player, value) in pending {
            self.store.modify_tickets(player, value);
        }
        written
    }
}

impl TicketStore for TicketSession<'_> {
    fn get_tickets(&self, player: PlayerId, default: i32) -> i32 {
        match self.pending.get(&player) {
            Some(value) => *value,
            None => self.store.get_tickets(player, default),
        }
    }

    fn modify_tickets(&mut self, player: PlayerId, value: i32) {
        self.pending.insert(player, value.max(0));
    }
}

impl Drop for TicketSession<'_> {
    fn drop(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let written = self.write_back();
        if let Err(err) = self.store.flush() {
            error!(written, error = %err, "failed to flush tickets on session drop");
        }
    }
}
