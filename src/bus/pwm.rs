// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Periodic-waveform (PWM-like) peripheral bus family. Grounded on
// `examples/original_source/src/simulith_pwm.c`.

use crate::bus::slot_table::SlotTable;
use crate::error::{SlotId, TickBusError};

pub const PWM_CAPACITY: usize = 16;
pub const PWM_MIN_FREQ_HZ: u32 = 1;
pub const PWM_MAX_FREQ_HZ: u32 = 1_000_000;

struct PwmChannel {
    running: bool,
    frequency_hz: u32,
    duty_cycle: u8,
    period_ns: u32,
    duty_ns: u32,
}

fn derive_timing(frequency_hz: u32, duty_cycle: u8) -> (u32, u32) {
    let period_ns = 1_000_000_000u32 / frequency_hz;
    let duty_ns = (period_ns as u64 * duty_cycle as u64 / 100) as u32;
    (period_ns, duty_ns)
}

fn validate_frequency(freq: u32, channel: SlotId) -> Result<(), TickBusError> {
    if !(PWM_MIN_FREQ_HZ..=PWM_MAX_FREQ_HZ).contains(&freq) {
        log::warn!(channel; "PWM rejected: frequency {freq} Hz out of range [{PWM_MIN_FREQ_HZ}, {PWM_MAX_FREQ_HZ}]");
        return Err(TickBusError::invalid_config(
            channel,
            format!("frequency {freq} Hz out of range [{PWM_MIN_FREQ_HZ}, {PWM_MAX_FREQ_HZ}]"),
        ));
    }
    Ok(())
}

fn validate_duty(duty: u8, channel: SlotId) -> Result<(), TickBusError> {
    if duty > 100 {
        log::warn!(channel; "PWM rejected: duty cycle {duty}% exceeds 100%");
        return Err(TickBusError::invalid_config(
            channel,
            format!("duty cycle {duty}% exceeds 100%"),
        ));
    }
    Ok(())
}

pub struct PwmBus {
    table: SlotTable<PwmChannel, PWM_CAPACITY>,
}

impl PwmBus {
    pub fn new() -> Self {
        Self {
            table: SlotTable::new(),
        }
    }

    pub fn init(
        &mut self,
        channel: SlotId,
        frequency_hz: u32,
        duty_cycle: u8,
    ) -> Result<(), TickBusError> {
        validate_frequency(frequency_hz, channel)?;
        validate_duty(duty_cycle, channel)?;
        let (period_ns, duty_ns) = derive_timing(frequency_hz, duty_cycle);
        self.table.init(channel, || {
            Ok(PwmChannel {
                running: false,
                frequency_hz,
                duty_cycle,
                period_ns,
                duty_ns,
            })
        })?;
        Ok(())
    }

    pub fn start(&mut self, channel: SlotId) -> Result<(), TickBusError> {
        self.table.get_mut(channel)?.running = true;
        Ok(())
    }

    pub fn stop(&mut self, channel: SlotId) -> Result<(), TickBusError> {
        self.table.get_mut(channel)?.running = false;
        Ok(())
    }

    pub fn set_duty(&mut self, channel: SlotId, duty_cycle: u8) -> Result<(), TickBusError> {
        validate_duty(duty_cycle, channel)?;
        let c = self.table.get_mut(channel)?;
        c.duty_cycle = duty_cycle;
        let (period_ns, duty_ns) = derive_timing(c.frequency_hz, c.duty_cycle);
        c.period_ns = period_ns;
        c.duty_ns = duty_ns;
        Ok(())
    }

    pub fn set_frequency(&mut self, channel: SlotId, frequency_hz: u32) -> Result<(), TickBusError> {
        validate_frequency(frequency_hz, channel)?;
        let c = self.table.get_mut(channel)?;
        c.frequency_hz = frequency_hz;
        let (period_ns, duty_ns) = derive_timing(c.frequency_hz, c.duty_cycle);
        c.period_ns = period_ns;
        c.duty_ns = duty_ns;
        Ok(())
    }

    pub fn period_ns(&self, channel: SlotId) -> Result<u32, TickBusError> {
        Ok(self.table.get(channel)?.period_ns)
    }

    pub fn duty_ns(&self, channel: SlotId) -> Result<u32, TickBusError> {
        Ok(self.table.get(channel)?.duty_ns)
    }

    pub fn is_running(&self, channel: SlotId) -> Result<bool, TickBusError> {
        Ok(self.table.get(channel)?.running)
    }

    /// Auto-stops the channel first, matching the source's `close`.
    pub fn close(&mut self, channel: SlotId) -> Result<(), TickBusError> {
        if let Ok(c) = self.table.get_mut(channel) {
            c.running = false;
        }
        self.table.close(channel)?;
        Ok(())
    }
}

impl Default for PwmBus {
    fn default() -> Self {
        Self::new()
    }
}
