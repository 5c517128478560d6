// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Fixed-capacity participant roster for the time server. One entry per
// registered identity, plus a per-tick "responded" flag used to drive the
// ACK barrier. Owned exclusively by the server's tick-loop thread, so this
// carries no internal locking — contrast `proto::service_registry`, which
// this is grounded on, and which does lock because multiple OS processes
// touch it concurrently.

use crate::error::TickBusError;
use crate::proto::id::ParticipantId;

#[derive(Clone, Copy)]
struct Entry {
    id: ParticipantId,
    responded: bool,
}

pub struct Roster<const N: usize> {
    slots: [Option<Entry>; N],
}

impl<const N: usize> Roster<N> {
    pub fn new() -> Self {
        Self { slots: [None; N] }
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Number of registered participants.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.slots
            .iter()
            .any(|s| s.map(|e| e.id == *id).unwrap_or(false))
    }

    /// Register a new participant in the first free slot.
    ///
    /// Fails `DuplicateId` if already present; fails `ProtocolError` if the
    /// roster has no free slot (the handshake loop replies `ERR` in that
    /// case).
    pub fn register(&mut self, id: ParticipantId) -> Result<usize, TickBusError> {
        if self.contains(&id) {
            return Err(TickBusError::DuplicateId);
        }
        let slot = self
            .slots
            .iter_mut()
            .position(|s| s.is_none())
            .ok_or_else(|| TickBusError::protocol_error("roster is full"))?;
        self.slots[slot] = Some(Entry {
            id,
            responded: false,
        });
        Ok(slot)
    }

    /// Clear every slot's `responded` flag at the start of a new tick.
    pub fn reset_responses(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            slot.responded = false;
        }
    }

    /// Mark `id` as having responded this tick. Idempotent. Returns `true`
    /// if `id` is a known roster member, `false` for an unknown id (the
    /// caller still replies `ACK`, but the barrier is not advanced).
    pub fn ack(&mut self, id: &ParticipantId) -> bool {
        for slot in self.slots.iter_mut().flatten() {
            if slot.id == *id {
                slot.responded = true;
                return true;
            }
        }
        false
    }

    /// Whether every registered slot has `responded == true`.
    pub fn all_responded(&self) -> bool {
        self.slots.iter().flatten().all(|e| e.responded)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ParticipantId> {
        self.slots.iter().filter_map(|s| s.as_ref().map(|e| &e.id))
    }
}

impl<const N: usize> Default for Roster<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ParticipantId {
        ParticipantId::new(s.as_bytes()).unwrap()
    }

    #[test]
    fn register_rejects_duplicate() {
        let mut r: Roster<4> = Roster::new();
        r.register(id("a")).unwrap();
        assert!(matches!(r.register(id("a")), Err(TickBusError::DuplicateId)));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn register_rejects_when_full() {
        let mut r: Roster<2> = Roster::new();
        r.register(id("a")).unwrap();
        r.register(id("b")).unwrap();
        assert!(r.is_full());
        assert!(r.register(id("c")).is_err());
    }

    #[test]
    fn barrier_tracks_unique_responses() {
        let mut r: Roster<2> = Roster::new();
        r.register(id("a")).unwrap();
        r.register(id("b")).unwrap();
        r.reset_responses();
        assert!(!r.all_responded());
        assert!(r.ack(&id("a")));
        assert!(!r.all_responded());
        assert!(r.ack(&id("a"))); // duplicate ACK is idempotent
        assert!(!r.all_responded());
        assert!(r.ack(&id("b")));
        assert!(r.all_responded());
    }

    #[test]
    fn unknown_ack_does_not_satisfy_barrier() {
        let mut r: Roster<2> = Roster::new();
        r.register(id("a")).unwrap();
        r.register(id("b")).unwrap();
        assert!(!r.ack(&id("ghost")));
        assert!(!r.all_responded());
    }
}
