// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Digital-line (GPIO-like) peripheral bus family.
// Grounded on `examples/original_source/src/simulith_gpio.c`, flattened to
// a single slot-table index instead of the original's port/pin pair.

use crate::bus::slot_table::SlotTable;
use crate::error::{SlotId, TickBusError};

/// 8 ports of 32 pins each in the original source, flattened.
pub const GPIO_CAPACITY: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    InputFloating,
    InputPullup,
    InputPulldown,
    OutputPushPull,
    OutputOpenDrain,
}

impl Mode {
    fn is_output(self) -> bool {
        matches!(self, Mode::OutputPushPull | Mode::OutputOpenDrain)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GpioConfig {
    pub mode: Mode,
    /// Only consulted for output modes; must be 0 or 1.
    pub initial_state: u8,
}

struct Pin {
    mode: Mode,
    state: u8,
}

pub struct GpioBus {
    table: SlotTable<Pin, GPIO_CAPACITY>,
}

impl GpioBus {
    pub fn new() -> Self {
        Self {
            table: SlotTable::new(),
        }
    }

    pub fn init(&mut self, pin: SlotId, config: GpioConfig) -> Result<(), TickBusError> {
        if config.mode.is_output() && config.initial_state > 1 {
            log::warn!(pin; "GPIO init rejected: initial_state must be 0 or 1 for an output pin");
            return Err(TickBusError::invalid_config(
                pin,
                "initial_state must be 0 or 1 for an output pin",
            ));
        }
        let state = match config.mode {
            Mode::OutputPushPull | Mode::OutputOpenDrain => config.initial_state,
            Mode::InputPullup => 1,
            Mode::InputFloating | Mode::InputPulldown => 0,
        };
        self.table.init(pin, || {
            Ok(Pin {
                mode: config.mode,
                state,
            })
        })?;
        Ok(())
    }

    pub fn write(&mut self, pin: SlotId, value: u8) -> Result<(), TickBusError> {
        if value > 1 {
            log::warn!(pin, value; "GPIO write rejected: value must be 0 or 1");
            return Err(TickBusError::invalid_argument(format!(
                "GPIO value must be 0 or 1, got {value}"
            )));
        }
        let p = self.table.get_mut(pin)?;
        if !p.mode.is_output() {
            log::warn!(pin; "GPIO write rejected: pin is not configured as an output");
            return Err(TickBusError::invalid_argument(format!(
                "pin {pin} is not configured as an output"
            )));
        }
        p.state = value;
        Ok(())
    }

    pub fn read(&self, pin: SlotId) -> Result<u8, TickBusError> {
        Ok(self.table.get(pin)?.state)
    }

    pub fn toggle(&mut self, pin: SlotId) -> Result<(), TickBusError> {
        let p = self.table.get_mut(pin)?;
        if !p.mode.is_output() {
            log::warn!(pin; "GPIO toggle rejected: pin is not configured as an output");
            return Err(TickBusError::invalid_argument(format!(
                "pin {pin} is not configured as an output"
            )));
        }
        p.state = if p.state == 0 { 1 } else { 0 };
        Ok(())
    }

    pub fn close(&mut self, pin: SlotId) -> Result<(), TickBusError> {
        self.table.close(pin)?;
        Ok(())
    }
}

impl Default for GpioBus {
    fn default() -> Self {
        Self::new()
    }
}
