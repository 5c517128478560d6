// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Higher-level protocol layer built on top of the core IPC transport:
// participant identity and the request/reply mailbox realization of the
// handshake/ACK channel.

pub mod id;
pub mod mailbox;

pub use id::ParticipantId;
pub use mailbox::{Mailbox, RequestChannel};
