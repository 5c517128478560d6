// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// The time authority. Owns the virtual clock, the expected-participant
// roster, the handshake acceptor, the broadcast loop, and the per-tick
// ACK barrier. Grounded on `examples/original_source/src/simulith_server.c`
// (the newer revision: tick-barrier server, `READY <id>` handshake,
// Δ-ns tick advance — see the duplicated-source-files note this repo's
// design ledger carries forward from the source material).

use crate::channel::{Channel, Mode};
use crate::error::{TickBusError, TransportErrorExt};
use crate::proto::id::ParticipantId;
use crate::proto::mailbox::{Mailbox, RequestChannel};
use crate::roster::Roster;
use crate::shutdown::ShutdownFlag;

/// Upper bound on the expected-participant count, matching the source's
/// `MAX_CLIENTS`.
pub const ROSTER_CAPACITY: usize = 32;

const HANDSHAKE_TOKEN: &[u8] = b"READY";
const REPLY_ACK: &[u8] = b"ACK";
const REPLY_DUP_ID: &[u8] = b"DUP_ID";
const REPLY_ERR: &[u8] = b"ERR";

/// How often a blocked `recv` wakes up to check the shutdown flag. The
/// protocol itself has no cancellation message, so this is the only way
/// an external `shutdown()` call (from another thread) can interrupt a
/// loop that would otherwise block forever.
const SHUTDOWN_POLL_MS: u64 = 200;

fn tick_channel_name(base: &str) -> String {
    format!("{base}.tick")
}

/// Validated construction arguments for `TimeServer::bind`.
#[derive(Clone, Copy, Debug)]
pub struct ServerConfig {
    expected_participants: usize,
    tick_increment_ns: u64,
}

impl ServerConfig {
    pub fn new(expected_participants: usize, tick_increment_ns: u64) -> Result<Self, TickBusError> {
        if expected_participants == 0 || expected_participants > ROSTER_CAPACITY {
            return Err(TickBusError::invalid_argument(format!(
                "expected_participants {expected_participants} out of range [1, {ROSTER_CAPACITY}]"
            )));
        }
        if tick_increment_ns == 0 {
            return Err(TickBusError::invalid_argument(
                "tick_increment_ns must be nonzero",
            ));
        }
        Ok(Self {
            expected_participants,
            tick_increment_ns,
        })
    }
}

/// Parses a `READY <id>` handshake request. Returns `None` for anything
/// that does not match the literal 5-byte token, a single space, and a
/// nonempty remainder.
fn parse_ready(request: &[u8]) -> Option<&[u8]> {
    let rest = request.strip_prefix(HANDSHAKE_TOKEN)?;
    let id = rest.strip_prefix(b" ")?;
    if id.is_empty() {
        return None;
    }
    Some(id)
}

/// Looser extraction used only to find an address worth replying `ERR` to
/// when `parse_ready` rejects a request. Still requires the literal token,
/// but tolerates a missing separator space: the id can't be registered
/// without proper spacing, but the sender is still reachable. Returns
/// `None` only when the request isn't token-prefixed at all, or nothing
/// follows the token, since there is then no candidate address.
fn extract_reply_candidate(request: &[u8]) -> Option<&[u8]> {
    let rest = request.strip_prefix(HANDSHAKE_TOKEN)?;
    let candidate = rest.strip_prefix(b" ").unwrap_or(rest);
    if candidate.is_empty() {
        return None;
    }
    Some(candidate)
}

pub struct TimeServer {
    base: String,
    config: ServerConfig,
    tick_channel: Channel,
    requests: RequestChannel,
    roster: Roster<ROSTER_CAPACITY>,
    shutdown: ShutdownFlag,
}

impl TimeServer {
    /// Binds the broadcast and request channels under `base`. A bind
    /// failure on either channel is `TransportBindFailed`.
    pub fn bind(base: &str, config: ServerConfig) -> Result<Self, TickBusError> {
        let tick_name = tick_channel_name(base);
        let tick_channel = Channel::connect(&tick_name, Mode::Sender).bind_failed(&tick_name)?;
        let requests = RequestChannel::bind(base)?;
        log::debug!(base; "time server bound");
        Ok(Self {
            base: base.to_string(),
            config,
            tick_channel,
            requests,
            roster: Roster::new(),
            shutdown: ShutdownFlag::new(),
        })
    }

    /// A cloneable handle that another thread can use to call
    /// `ShutdownFlag::signal` without owning the server.
    pub fn shutdown_flag(&self) -> ShutdownFlag {
        self.shutdown.clone()
    }

    /// Drives the handshake phase to completion, then the tick phase
    /// forever, until `shutdown` is observed. Blocks the calling thread.
    pub fn run(&mut self) -> Result<(), TickBusError> {
        self.handshake_phase()?;
        self.tick_phase()
    }

    fn reply(&mut self, id: &ParticipantId, payload: &[u8]) -> Result<(), TickBusError> {
        let mut mailbox = Mailbox::open_sender(&self.base, id)?;
        mailbox.send(payload)
    }

    /// One handshake iteration: exactly one `recv` then one `send` on Q.
    /// Loops until `ready_count == N`.
    fn handshake_phase(&mut self) -> Result<(), TickBusError> {
        while self.roster.len() < self.config.expected_participants {
            if self.shutdown.is_set() {
                return Ok(());
            }
            let request = match self.requests.recv(Some(SHUTDOWN_POLL_MS))? {
                Some(r) => r,
                None => continue,
            };

            let Some(raw_id) = parse_ready(&request) else {
                // No well-formed id to register, but a request of the form
                // `READY<id>` (missing the separator space) still names a
                // candidate address worth an `ERR` reply to. A request
                // that isn't token-prefixed at all, or carries no id
                // content whatsoever, has no address to reply to; the
                // requester's own handshake `recv` times out instead.
                match extract_reply_candidate(&request) {
                    Some(candidate) => {
                        log::warn!("malformed handshake request, replying ERR to best-effort address");
                        if let Ok(mut mailbox) = Mailbox::open_sender_for_raw_id(&self.base, candidate) {
                            let _ = mailbox.send(REPLY_ERR);
                        }
                    }
                    None => log::warn!("unaddressable handshake request dropped"),
                }
                continue;
            };

            let id = match ParticipantId::new(raw_id) {
                Ok(id) => id,
                Err(_) => {
                    log::warn!("oversized handshake id rejected");
                    if let Ok(mut mailbox) = Mailbox::open_sender_for_raw_id(&self.base, raw_id) {
                        let _ = mailbox.send(REPLY_ERR);
                    }
                    continue;
                }
            };

            if self.roster.contains(&id) {
                log::warn!(id:% = id; "duplicate handshake id rejected");
                self.reply(&id, REPLY_DUP_ID)?;
                continue;
            }

            match self.roster.register(id) {
                Ok(_slot) => {
                    log::debug!(id:% = id; "participant registered");
                    self.reply(&id, REPLY_ACK)?;
                }
                Err(_) => {
                    log::warn!(id:% = id; "roster full, rejecting handshake");
                    self.reply(&id, REPLY_ERR)?;
                }
            }
        }
        Ok(())
    }

    /// Strict barrier tick loop. Any transport error here is fatal.
    fn tick_phase(&mut self) -> Result<(), TickBusError> {
        let mut t: u64 = 0;
        while !self.shutdown.is_set() {
            self.tick_channel
                .send(&t.to_le_bytes(), 0)
                .connect_failed(&self.base)?;
            log::debug!(t; "tick broadcast");
            self.roster.reset_responses();

            while !self.roster.all_responded() {
                if self.shutdown.is_set() {
                    return Ok(());
                }
                let request = match self.requests.recv(Some(SHUTDOWN_POLL_MS))? {
                    Some(r) => r,
                    None => continue,
                };
                let Ok(id) = ParticipantId::new(&request) else {
                    continue;
                };
                if !self.roster.ack(&id) {
                    log::warn!(id:% = id, t; "ack from unknown participant, tolerated");
                }
                self.reply(&id, REPLY_ACK)?;
            }

            t += self.config.tick_increment_ns;
        }
        Ok(())
    }

    /// Idempotent. Safe to call from another thread while `run` is
    /// blocked in the tick loop; the loop observes it within
    /// `SHUTDOWN_POLL_MS`.
    pub fn shutdown(&self) {
        if self.shutdown.is_set() {
            return;
        }
        self.shutdown.signal();
        log::debug!("time server shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_out_of_range_participants() {
        assert!(ServerConfig::new(0, 1).is_err());
        assert!(ServerConfig::new(ROSTER_CAPACITY + 1, 1).is_err());
        assert!(ServerConfig::new(1, 0).is_err());
        assert!(ServerConfig::new(1, 1).is_ok());
    }

    #[test]
    fn parse_ready_accepts_well_formed_request() {
        assert_eq!(parse_ready(b"READY c1"), Some(&b"c1"[..]));
    }

    #[test]
    fn parse_ready_rejects_missing_space_or_empty_id() {
        assert_eq!(parse_ready(b"READYc1"), None);
        assert_eq!(parse_ready(b"READY "), None);
        assert_eq!(parse_ready(b"GARBAGE x"), None);
    }
}
