// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Participant identity: a nonempty byte string of bounded length, unique
// within one simulation run. Stored inline (no heap allocation) since the
// bound (63 bytes) is small and fixed.

use std::fmt;

use crate::error::TickBusError;

pub const MAX_ID_LEN: usize = 63;

#[derive(Clone, Copy)]
pub struct ParticipantId {
    bytes: [u8; MAX_ID_LEN],
    len: u8,
}

impl ParticipantId {
    /// Validate and construct an id. Fails `InvalidArgument` on an empty
    /// id or one longer than 63 bytes.
    pub fn new(raw: &[u8]) -> Result<Self, TickBusError> {
        if raw.is_empty() {
            return Err(TickBusError::invalid_argument("participant id is empty"));
        }
        if raw.len() > MAX_ID_LEN {
            return Err(TickBusError::invalid_argument(format!(
                "participant id is {} bytes, exceeds the {MAX_ID_LEN}-byte limit",
                raw.len()
            )));
        }
        let mut bytes = [0u8; MAX_ID_LEN];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self {
            bytes,
            len: raw.len() as u8,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(self.as_bytes()).unwrap_or("<non-utf8 id>")
    }
}

impl PartialEq for ParticipantId {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ParticipantId {}

impl fmt::Debug for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParticipantId({:?})", self.as_str())
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
