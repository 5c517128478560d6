// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// A cloneable cross-thread stop flag shared by `TimeServer` and
// `TimeClient`. The protocol itself has no cooperative cancellation
// channel: shutdown is ordinarily by process termination. This exists for
// the embedding case where server and client run as independent threads
// of one process, and something still needs a way to ask a blocked tick
// loop to stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn signal(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
