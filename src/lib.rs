// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// A deterministic, lock-step time bus for co-simulating peripheral
// emulation processes: one server holds the virtual clock and a roster
// of participants, broadcasts ticks, and waits for every participant to
// acknowledge before advancing. Built on the same named-shared-memory
// primitives as cpp-ipc — binary-compatible shared memory and named
// mutex layout, same POSIX/Win32 syscalls — repurposed here to carry
// the tick broadcast and the handshake/ACK request-reply channel
// instead of a generic byte-queue IPC API.

pub mod shm_name;

mod platform;

mod shm;
pub use shm::{ShmHandle, ShmOpenMode};

mod mutex;
pub use mutex::IpcMutex;

mod scoped_access;
pub use scoped_access::ScopedAccess;

#[cfg(windows)]
mod semaphore;
#[cfg(windows)]
pub use semaphore::IpcSemaphore;

mod spin_lock;
pub use spin_lock::SpinLock;

mod rw_lock;
pub use rw_lock::RwLock;

mod waiter;
pub use waiter::Waiter;

mod condition;
pub use condition::IpcCondition;

mod buffer;
pub use buffer::IpcBuffer;

pub mod circ;

mod chunk_storage;

pub mod channel;
pub use channel::{Channel, Mode, Route};

pub mod ring;
pub use ring::RingBuffer;

pub mod error;
pub use error::{Result, TickBusError};

pub mod proto;
pub use proto::ParticipantId;

pub mod roster;
pub use roster::Roster;

pub mod bus;

mod shutdown;
pub use shutdown::ShutdownFlag;

pub mod server;
pub use server::{ServerConfig, TimeServer};

pub mod client;
pub use client::{ClientConfig, TimeClient};
