// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Addressed-register (I2C-like) peripheral bus family. Grounded on
// `examples/original_source/src/simulith_i2c.c`: no local state beyond a
// pair of callbacks per bus, pure passthrough.

use crate::bus::slot_table::SlotTable;
use crate::error::{SlotId, TickBusError};

pub const I2C_CAPACITY: usize = 8;

pub type I2cReadCallback = Box<dyn FnMut(u8, u8, &mut [u8]) -> Result<(), TickBusError> + Send>;
pub type I2cWriteCallback = Box<dyn FnMut(u8, u8, &[u8]) -> Result<(), TickBusError> + Send>;

struct I2cBus {
    read_cb: I2cReadCallback,
    write_cb: I2cWriteCallback,
}

pub struct I2cBusTable {
    table: SlotTable<I2cBus, I2C_CAPACITY>,
}

impl I2cBusTable {
    pub fn new() -> Self {
        Self {
            table: SlotTable::new(),
        }
    }

    pub fn init(
        &mut self,
        bus: SlotId,
        read_cb: I2cReadCallback,
        write_cb: I2cWriteCallback,
    ) -> Result<(), TickBusError> {
        self.table.init(bus, || Ok(I2cBus { read_cb, write_cb }))?;
        Ok(())
    }

    /// Delegates to the bus's registered read callback. `data.len()` is the
    /// requested byte count.
    pub fn read(&mut self, bus: SlotId, addr: u8, reg: u8, data: &mut [u8]) -> Result<(), TickBusError> {
        if data.is_empty() {
            log::warn!(bus; "I2C read rejected: requested length is 0");
            return Err(TickBusError::invalid_argument("I2C read requires len > 0"));
        }
        (self.table.get_mut(bus)?.read_cb)(addr, reg, data)
    }

    pub fn write(&mut self, bus: SlotId, addr: u8, reg: u8, data: &[u8]) -> Result<(), TickBusError> {
        if data.is_empty() {
            log::warn!(bus; "I2C write rejected: empty payload");
            return Err(TickBusError::invalid_argument("I2C write requires len > 0"));
        }
        (self.table.get_mut(bus)?.write_cb)(addr, reg, data)
    }

    pub fn close(&mut self, bus: SlotId) -> Result<(), TickBusError> {
        self.table.close(bus)?;
        Ok(())
    }
}

impl Default for I2cBusTable {
    fn default() -> Self {
        Self::new()
    }
}
