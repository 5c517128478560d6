// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Serial-byte (UART-like) peripheral bus family. Grounded on
// `examples/original_source/src/simulith_uart.c`: ports are paired by
// index (2k, 2k+1), and if both halves of a pair are live, `init`
// transparently promotes the caller into the next free pair in the
// extended range.
//
// Resolved open question: `send` both invokes the paired port's callback
// (if any) and unconditionally pushes the delivered bytes into the paired
// port's local ring, so `receive` observes delivery whether or not a
// callback is registered.

use crate::bus::slot_table::SlotTable;
use crate::error::{SlotId, TickBusError};
use crate::ring::RingBuffer;

/// Number of addressable base pairs; ports 0..2*BASE are the base range,
/// BASE..2*BASE is the extended (auto-reassigned) range.
pub const UART_BASE_PORTS: u32 = 16;
pub const UART_CAPACITY: usize = (UART_BASE_PORTS as usize) * 2;
pub const UART_RING_CAPACITY: usize = 1024;

pub type UartCallback = Box<dyn FnMut(SlotId, &[u8]) + Send>;

struct UartPort {
    rx_callback: Option<UartCallback>,
    ring: RingBuffer<u8, UART_RING_CAPACITY>,
}

pub struct UartBus {
    table: SlotTable<UartPort, UART_CAPACITY>,
}

impl UartBus {
    pub fn new() -> Self {
        Self {
            table: SlotTable::new(),
        }
    }

    fn pair_of(port: u32) -> u32 {
        if port % 2 == 0 {
            port + 1
        } else {
            port - 1
        }
    }

    /// Initialize `requested_port` (0..UART_BASE_PORTS). Returns the
    /// actual assigned port, which differs from the request when the
    /// requested pair is already fully occupied.
    pub fn init(
        &mut self,
        requested_port: SlotId,
        rx_callback: Option<UartCallback>,
    ) -> Result<SlotId, TickBusError> {
        if requested_port >= UART_BASE_PORTS {
            log::warn!(requested_port; "UART init rejected: port out of range (base capacity {UART_BASE_PORTS})");
            return Err(TickBusError::invalid_argument(format!(
                "UART port id {requested_port} out of range (base capacity {UART_BASE_PORTS})"
            )));
        }
        let pair = Self::pair_of(requested_port);
        let mut actual = requested_port;
        if self.table.is_initialized(requested_port) && self.table.is_initialized(pair) {
            actual = UART_BASE_PORTS + requested_port;
            if self.table.is_initialized(actual) {
                log::warn!(requested_port; "UART init rejected: no available ports in base or extended range");
                return Err(TickBusError::protocol_error("no available UART ports"));
            }
        }
        self.table.init(actual, || {
            Ok(UartPort {
                rx_callback,
                ring: RingBuffer::new(),
            })
        })?;
        Ok(actual)
    }

    /// Deliver `data` to the paired port. Returns the number of bytes
    /// accepted by the sender side (always `data.len()` — delivery to an
    /// unpaired or absent peer is a silent no-op, matching the source).
    pub fn send(&mut self, port: SlotId, data: &[u8]) -> Result<usize, TickBusError> {
        if data.is_empty() {
            log::warn!(port; "UART send rejected: empty payload");
            return Err(TickBusError::invalid_argument(
                "UART send requires a nonempty payload",
            ));
        }
        if !self.table.is_initialized(port) {
            log::warn!(port; "UART send rejected: port not initialized");
            return Err(TickBusError::NotInitialized { id: port });
        }
        let target = Self::pair_of(port);
        if self.table.is_initialized(target) {
            let peer = self.table.get_mut(target)?;
            for &b in data {
                let _ = peer.ring.push(b);
            }
            if let Some(cb) = peer.rx_callback.as_mut() {
                cb(target, data);
            }
        }
        Ok(data.len())
    }

    pub fn receive(&mut self, port: SlotId, buf: &mut [u8]) -> Result<usize, TickBusError> {
        let slot = self.table.get_mut(port)?;
        let mut n = 0;
        while n < buf.len() {
            match slot.ring.pop() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    pub fn available(&self, port: SlotId) -> Result<usize, TickBusError> {
        Ok(self.table.get(port)?.ring.len())
    }

    pub fn close(&mut self, port: SlotId) -> Result<(), TickBusError> {
        self.table.close(port)?;
        Ok(())
    }
}

impl Default for UartBus {
    fn default() -> Self {
        Self::new()
    }
}
