// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Fixed-capacity indexed table of per-channel state, shared by every
// peripheral bus family below. Grounded on `proto::service_registry`'s
// array-of-entries-with-initialized-flag shape, with the PID-liveness
// tracking and spinlock dropped — each family table is owned by a single
// thread (the one driving that family's callback), so no internal
// synchronization is needed here.

use crate::error::{SlotId, TickBusError};

pub struct SlotTable<S, const N: usize> {
    slots: [Option<S>; N],
}

impl<S, const N: usize> SlotTable<S, N> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    pub fn capacity(&self) -> usize {
        N
    }

    fn check_range(id: SlotId) -> Result<usize, TickBusError> {
        let idx = id as usize;
        if idx >= N {
            log::warn!(id; "slot id out of range (capacity {N})");
            return Err(TickBusError::invalid_argument(format!(
                "slot id {id} out of range (capacity {N})"
            )));
        }
        Ok(idx)
    }

    /// Allocate slot `id`, running `make` to build its payload. Fails
    /// `AlreadyInitialized` if the slot is live; `make`'s own error (e.g.
    /// `InvalidConfig`) propagates unchanged, leaving the slot untouched.
    pub fn init<F>(&mut self, id: SlotId, make: F) -> Result<&mut S, TickBusError>
    where
        F: FnOnce() -> Result<S, TickBusError>,
    {
        let idx = Self::check_range(id)?;
        if self.slots[idx].is_some() {
            log::warn!(id; "slot already initialized");
            return Err(TickBusError::AlreadyInitialized { id });
        }
        self.slots[idx] = Some(make()?);
        Ok(self.slots[idx].as_mut().expect("just inserted"))
    }

    /// Free slot `id`, returning its payload. Fails `NotInitialized` if the
    /// slot was already free.
    pub fn close(&mut self, id: SlotId) -> Result<S, TickBusError> {
        let idx = Self::check_range(id)?;
        self.slots[idx].take().ok_or_else(|| {
            log::warn!(id; "slot not initialized");
            TickBusError::NotInitialized { id }
        })
    }

    pub fn get(&self, id: SlotId) -> Result<&S, TickBusError> {
        let idx = Self::check_range(id)?;
        self.slots[idx].as_ref().ok_or_else(|| {
            log::warn!(id; "slot not initialized");
            TickBusError::NotInitialized { id }
        })
    }

    pub fn get_mut(&mut self, id: SlotId) -> Result<&mut S, TickBusError> {
        let idx = Self::check_range(id)?;
        self.slots[idx].as_mut().ok_or_else(|| {
            log::warn!(id; "slot not initialized");
            TickBusError::NotInitialized { id }
        })
    }

    pub fn is_initialized(&self, id: SlotId) -> bool {
        (id as usize) < N && self.slots[id as usize].is_some()
    }
}

impl<S, const N: usize> Default for SlotTable<S, N> {
    fn default() -> Self {
        Self::new()
    }
}
