// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Binds a local identity, completes the handshake, receives ticks,
// invokes the embedder's per-tick callback, and acknowledges. Grounded
// on `examples/original_source/src/simulith_client.c`: a SUB-like
// broadcast receive followed by a blocking request/reply round-trip,
// where the act of receiving the reply *is* the client-side barrier —
// its content is never inspected.

use crate::channel::{Channel, Mode};
use crate::error::{TickBusError, TransportErrorExt};
use crate::proto::id::ParticipantId;
use crate::proto::mailbox::{Mailbox, RequestChannel};
use crate::shutdown::ShutdownFlag;

/// Reference handshake receive timeout.
const DEFAULT_HANDSHAKE_TIMEOUT_MS: u64 = 1_000;

/// How often a blocked broadcast `recv` wakes up to check the shutdown
/// flag, so an external `shutdown()` call (from another thread) can
/// interrupt a tick loop waiting for the next broadcast.
const SHUTDOWN_POLL_MS: u64 = 200;

fn tick_channel_name(base: &str) -> String {
    format!("{base}.tick")
}

/// Validated construction arguments for `TimeClient::connect`.
#[derive(Clone)]
pub struct ClientConfig {
    id: ParticipantId,
    rate_ns: u64,
    handshake_timeout_ms: u64,
}

impl ClientConfig {
    /// `rate_ns` is informational only: the server's clock is
    /// authoritative, this is never used to pace the tick loop.
    pub fn new(id: &[u8], rate_ns: u64) -> Result<Self, TickBusError> {
        let id = ParticipantId::new(id)?;
        if rate_ns == 0 {
            return Err(TickBusError::invalid_argument("rate_ns must be nonzero"));
        }
        Ok(Self {
            id,
            rate_ns,
            handshake_timeout_ms: DEFAULT_HANDSHAKE_TIMEOUT_MS,
        })
    }

    /// Overrides the reference 1s handshake receive timeout.
    pub fn with_handshake_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.handshake_timeout_ms = timeout_ms;
        self
    }

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn rate_ns(&self) -> u64 {
        self.rate_ns
    }
}

pub struct TimeClient {
    base: String,
    config: ClientConfig,
    tick_channel: Channel,
    requests: RequestChannel,
    mailbox: Mailbox,
    shutdown: ShutdownFlag,
}

impl TimeClient {
    /// Connects both channels and performs the handshake. The mailbox
    /// receiver is opened before anything is sent, since the client is the
    /// only side that knows its own id up front.
    pub fn connect(base: &str, config: ClientConfig) -> Result<Self, TickBusError> {
        let tick_name = tick_channel_name(base);
        let tick_channel = Channel::connect(&tick_name, Mode::Receiver).connect_failed(&tick_name)?;
        let mut requests = RequestChannel::connect(base)?;
        let mut mailbox = Mailbox::open_receiver(base, config.id())?;

        let mut ready = Vec::with_capacity(6 + config.id().as_bytes().len());
        ready.extend_from_slice(b"READY ");
        ready.extend_from_slice(config.id().as_bytes());
        requests.send(&ready)?;

        match mailbox.recv(Some(config.handshake_timeout_ms))? {
            Some(reply) if reply == b"ACK" => {
                log::debug!(id:% = config.id(); "handshake accepted");
            }
            Some(reply) if reply == b"DUP_ID" => {
                return Err(TickBusError::DuplicateId.logged());
            }
            Some(_other) => {
                return Err(TickBusError::protocol_error(
                    "unexpected handshake reply payload",
                )
                .logged());
            }
            None => {
                return Err(TickBusError::ServerUnreachable.logged());
            }
        }

        Ok(Self {
            base: base.to_string(),
            config,
            tick_channel,
            requests,
            mailbox,
            shutdown: ShutdownFlag::new(),
        })
    }

    /// A cloneable handle that another thread can use to call
    /// `ShutdownFlag::signal` without owning the client.
    pub fn shutdown_flag(&self) -> ShutdownFlag {
        self.shutdown.clone()
    }

    /// Runs the tick loop until `shutdown` is observed or a transport
    /// error occurs. Blocks the calling thread.
    ///
    /// The callback never runs ahead of the previous tick's ACK
    /// round-trip: `on_tick(T_k)` happens-before `send` of T_k's ACK,
    /// which happens-before the `recv` that unblocks the next iteration.
    pub fn run_loop(&mut self, mut on_tick: impl FnMut(u64)) -> Result<(), TickBusError> {
        while !self.shutdown.is_set() {
            let payload = self
                .tick_channel
                .recv(Some(SHUTDOWN_POLL_MS))
                .connect_failed(&self.base)?;
            if payload.len() != 8 {
                // Protocol drift on B is nonfatal; skip and wait for the
                // next broadcast.
                continue;
            }
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(payload.data());
            let t = u64::from_le_bytes(bytes);

            on_tick(t);

            if self.shutdown.is_set() {
                return Ok(());
            }
            self.requests
                .send(self.config.id().as_bytes())
                .connect_failed(&self.base)?;
            // The reply's content is never inspected; receiving it at all
            // is the client-side half of the barrier.
            let _ = self.mailbox.recv(None)?;
        }
        Ok(())
    }

    /// Shutdown from within the callback is permitted: the next `recv`
    /// will then exit the loop instead of blocking further. Also safe to
    /// call from another thread; the loop observes it within
    /// `SHUTDOWN_POLL_MS`.
    pub fn shutdown(&self) {
        if self.shutdown.is_set() {
            return;
        }
        self.shutdown.signal();
        log::debug!(id:% = self.config.id(); "time client shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_empty_id_and_zero_rate() {
        assert!(ClientConfig::new(b"", 1).is_err());
        assert!(ClientConfig::new(b"c1", 0).is_err());
        assert!(ClientConfig::new(b"c1", 1).is_ok());
    }
}
