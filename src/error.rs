// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Language-neutral error kinds for the time-sync protocol and the
// peripheral bus families, unified into one enum so embedders match on a
// single type regardless of which layer raised it.

use std::fmt;
use thiserror::Error;

/// A bus or port index, logged alongside most error variants.
pub type SlotId = u32;

#[derive(Debug, Error)]
pub enum TickBusError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("failed to bind transport {address:?}: {source}")]
    TransportBindFailed {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to connect transport {address:?}: {source}")]
    TransportConnectFailed {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server unreachable: handshake timed out waiting for a reply")]
    ServerUnreachable,

    #[error("duplicate participant id rejected by server")]
    DuplicateId,

    #[error("protocol error: {message}")]
    ProtocolError { message: String },

    #[error("slot {id} already initialized")]
    AlreadyInitialized { id: SlotId },

    #[error("slot {id} not initialized")]
    NotInitialized { id: SlotId },

    #[error("invalid configuration for slot {id}: {message}")]
    InvalidConfig { id: SlotId, message: String },

    #[error("ring buffer full, record dropped")]
    BufferFull,
}

impl TickBusError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn protocol_error(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    pub fn invalid_config(id: SlotId, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            id,
            message: message.into(),
        }
    }

    /// Emits the one required structured log line for this error and
    /// returns `self`, so call sites can write `return Err(err.logged())`.
    pub fn logged(self) -> Self {
        match &self {
            Self::DuplicateId | Self::ServerUnreachable => {
                log::warn!(condition:% = self; "tick-bus condition")
            }
            _ => log::error!(condition:% = self; "tick-bus error"),
        }
        self
    }
}

/// Context helper: turns a transport-layer `io::Error` into a
/// `TransportBindFailed`/`TransportConnectFailed`, depending on call site.
pub(crate) trait TransportErrorExt<T> {
    fn bind_failed(self, address: impl fmt::Display) -> Result<T, TickBusError>;
    fn connect_failed(self, address: impl fmt::Display) -> Result<T, TickBusError>;
}

impl<T> TransportErrorExt<T> for std::io::Result<T> {
    fn bind_failed(self, address: impl fmt::Display) -> Result<T, TickBusError> {
        self.map_err(|source| TickBusError::TransportBindFailed {
            address: address.to_string(),
            source,
        })
    }

    fn connect_failed(self, address: impl fmt::Display) -> Result<T, TickBusError> {
        self.map_err(|source| TickBusError::TransportConnectFailed {
            address: address.to_string(),
            source,
        })
    }
}

pub type Result<T> = std::result::Result<T, TickBusError>;
