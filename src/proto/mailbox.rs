// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Realizes the request/reply channel Q on top of the named-shared-memory
// broadcast `Channel`: one shared inbound request
// channel that every participant sends into, plus one reply mailbox per
// participant id that only the server and that participant ever touch.
// Each request therefore gets exactly one reply, routed to the requester,
// without a connection-oriented transport underneath.

use crate::channel::{Channel, Mode};
use crate::error::{TickBusError, TransportErrorExt};
use crate::proto::id::ParticipantId;

/// How long a send blocks waiting for ring space before giving up. The
/// rings here never hold more than a handful of small in-flight messages,
/// so this is generous rather than tuned.
const SEND_TIMEOUT_MS: u64 = 5_000;

fn request_channel_name(base: &str) -> String {
    format!("{base}.request")
}

fn mailbox_channel_name(base: &str, id: &ParticipantId) -> String {
    mailbox_channel_name_raw(base, id.as_bytes())
}

/// Channel name for a reply mailbox addressed by raw id bytes rather than
/// a validated `ParticipantId`. Used both by the validated path above and
/// by the server's best-effort error reply to a handshake request whose id
/// didn't pass `ParticipantId` validation but still names an address.
fn mailbox_channel_name_raw(base: &str, raw_id: &[u8]) -> String {
    format!("{base}.reply.{}", String::from_utf8_lossy(raw_id))
}

/// The shared inbound side of Q: many senders (clients), one receiver
/// (the server).
pub struct RequestChannel {
    chan: Channel,
}

impl RequestChannel {
    /// Open the server-side (receiving) end.
    pub fn bind(base: &str) -> Result<Self, TickBusError> {
        let name = request_channel_name(base);
        let chan = Channel::connect(&name, Mode::Receiver).bind_failed(&name)?;
        Ok(Self { chan })
    }

    /// Open a client-side (sending) end.
    pub fn connect(base: &str) -> Result<Self, TickBusError> {
        let name = request_channel_name(base);
        let chan = Channel::connect(&name, Mode::Sender).connect_failed(&name)?;
        Ok(Self { chan })
    }

    /// Sends `payload`. Fails with `ProtocolError` if the ring reports no
    /// receiver accepted it within the send timeout (e.g. the server is
    /// not up yet).
    pub fn send(&mut self, payload: &[u8]) -> Result<(), TickBusError> {
        let name = self.chan.name().to_string();
        let delivered = self
            .chan
            .send(payload, SEND_TIMEOUT_MS)
            .connect_failed(&name)?;
        if !delivered {
            return Err(TickBusError::protocol_error(format!(
                "request channel {name:?} accepted no receiver within {SEND_TIMEOUT_MS}ms"
            )));
        }
        Ok(())
    }

    /// Receive one request. `timeout_ms = None` blocks until a message
    /// arrives; `Some(ms)` returns `Ok(None)` if nothing arrives in time.
    pub fn recv(&mut self, timeout_ms: Option<u64>) -> Result<Option<Vec<u8>>, TickBusError> {
        let name = self.chan.name().to_string();
        let buf = self.chan.recv(timeout_ms).connect_failed(&name)?;
        if buf.is_empty() {
            return Ok(None);
        }
        Ok(Some(buf.into_vec()))
    }

    pub fn clear_storage(base: &str) {
        Channel::clear_storage(&request_channel_name(base));
    }
}

/// One participant's private reply mailbox: the server is the sole sender,
/// the owning participant the sole receiver.
pub struct Mailbox {
    chan: Channel,
}

impl Mailbox {
    /// Open the receiving end. The client must do this *before* it sends
    /// its first request, since it is the only side that knows its own id
    /// in advance.
    pub fn open_receiver(base: &str, id: &ParticipantId) -> Result<Self, TickBusError> {
        let name = mailbox_channel_name(base, id);
        let chan = Channel::connect(&name, Mode::Receiver).connect_failed(&name)?;
        Ok(Self { chan })
    }

    /// Open (or reuse) the sending end. The server does this once it has
    /// parsed a request's id out of the request payload.
    pub fn open_sender(base: &str, id: &ParticipantId) -> Result<Self, TickBusError> {
        let name = mailbox_channel_name(base, id);
        let chan = Channel::connect(&name, Mode::Sender).connect_failed(&name)?;
        Ok(Self { chan })
    }

    pub fn send(&mut self, payload: &[u8]) -> Result<(), TickBusError> {
        let name = self.chan.name().to_string();
        let delivered = self
            .chan
            .send(payload, SEND_TIMEOUT_MS)
            .connect_failed(&name)?;
        if !delivered {
            return Err(TickBusError::protocol_error(format!(
                "mailbox {name:?} accepted no receiver within {SEND_TIMEOUT_MS}ms"
            )));
        }
        Ok(())
    }

    /// Receive the reply. `timeout_ms = None` blocks until a message
    /// arrives; `Some(ms)` returns `Ok(None)` if nothing arrives in time.
    pub fn recv(&mut self, timeout_ms: Option<u64>) -> Result<Option<Vec<u8>>, TickBusError> {
        let name = self.chan.name().to_string();
        let buf = self.chan.recv(timeout_ms).connect_failed(&name)?;
        if buf.is_empty() {
            return Ok(None);
        }
        Ok(Some(buf.into_vec()))
    }

    /// Open a sender addressed by raw, possibly-unvalidated id bytes. Lets
    /// the server reply to a handshake request whose id fails
    /// `ParticipantId` validation (e.g. exceeds the length limit) but is
    /// still a nonempty candidate address worth replying `ERR` to.
    pub fn open_sender_for_raw_id(base: &str, raw_id: &[u8]) -> Result<Self, TickBusError> {
        let name = mailbox_channel_name_raw(base, raw_id);
        let chan = Channel::connect(&name, Mode::Sender).connect_failed(&name)?;
        Ok(Self { chan })
    }

    pub fn clear_storage(base: &str, id: &ParticipantId) {
        Channel::clear_storage(&mailbox_channel_name(base, id));
    }
}
