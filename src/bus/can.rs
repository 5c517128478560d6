// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Framed-packet (CAN-like) peripheral bus family. Grounded on
// `examples/original_source/src/simulith_can.c`.
//
// Preserved as observed, not "fixed": the source computes
// `passes_filter || bus->rx_callback` as the gate for storing a sent
// message into the local RX ring, which is true whenever a callback is
// registered regardless of whether any filter actually matched, and the
// callback itself is never invoked (its pointer is only tested for
// presence). `examples/original_source/test/test_can.c` exercises this
// same shape without ever asserting the callback fired.

use crate::bus::slot_table::SlotTable;
use crate::error::{SlotId, TickBusError};
use crate::ring::RingBuffer;

pub const CAN_CAPACITY: usize = 8;
pub const CAN_MAX_FILTERS: usize = 16;
/// RingBuffer's usable capacity is `N - 1`; use 33 slots for a 32-message queue.
const CAN_RX_RING_SLOTS: usize = 33;

pub const CAN_BITRATE_MIN: u32 = 125_000;
pub const CAN_BITRATE_MAX: u32 = 1_000_000;
pub const CAN_ID_STD_MAX: u32 = 0x7FF;
pub const CAN_ID_EXT_MAX: u32 = 0x1FFF_FFFF;
pub const CAN_MAX_DLC: u8 = 8;

#[derive(Clone, Copy, Debug)]
pub struct CanConfig {
    pub bitrate: u32,
    pub sample_point: u8,
    pub sync_jump: u8,
}

#[derive(Clone, Copy, Debug)]
pub struct CanMessage {
    pub id: u32,
    pub is_extended: bool,
    pub is_rtr: bool,
    pub dlc: u8,
    pub data: [u8; 8],
}

#[derive(Clone, Copy, Debug)]
pub struct CanFilter {
    pub id: u32,
    pub mask: u32,
    pub is_extended: bool,
}

impl CanFilter {
    fn matches(&self, msg: &CanMessage) -> bool {
        msg.is_extended == self.is_extended && (msg.id & self.mask) == (self.id & self.mask)
    }
}

/// Present only to mirror the source's "register an RX callback" surface;
/// it is never invoked, see the module-level note.
pub type CanCallback = Box<dyn FnMut(SlotId, &CanMessage) + Send>;

#[derive(Clone, Copy)]
struct FilterSlot {
    filter: CanFilter,
    active: bool,
}

struct CanBus {
    rx_callback: Option<CanCallback>,
    filters: [FilterSlot; CAN_MAX_FILTERS],
    rx_ring: RingBuffer<CanMessage, CAN_RX_RING_SLOTS>,
}

fn validate_config(config: &CanConfig, bus: SlotId) -> Result<(), TickBusError> {
    if !(CAN_BITRATE_MIN..=CAN_BITRATE_MAX).contains(&config.bitrate) {
        log::warn!(bus; "CAN init rejected: bitrate {} out of range [{CAN_BITRATE_MIN}, {CAN_BITRATE_MAX}]", config.bitrate);
        return Err(TickBusError::invalid_config(
            bus,
            format!(
                "bitrate {} out of range [{CAN_BITRATE_MIN}, {CAN_BITRATE_MAX}]",
                config.bitrate
            ),
        ));
    }
    if !(50..=90).contains(&config.sample_point) {
        log::warn!(bus; "CAN init rejected: sample_point {} out of range [50, 90]", config.sample_point);
        return Err(TickBusError::invalid_config(
            bus,
            format!("sample_point {} out of range [50, 90]", config.sample_point),
        ));
    }
    if !(1..=4).contains(&config.sync_jump) {
        log::warn!(bus; "CAN init rejected: sync_jump {} out of range [1, 4]", config.sync_jump);
        return Err(TickBusError::invalid_config(
            bus,
            format!("sync_jump {} out of range [1, 4]", config.sync_jump),
        ));
    }
    Ok(())
}

fn validate_message(bus: SlotId, msg: &CanMessage) -> Result<(), TickBusError> {
    let id_max = if msg.is_extended {
        CAN_ID_EXT_MAX
    } else {
        CAN_ID_STD_MAX
    };
    if msg.id > id_max {
        log::warn!(bus; "CAN send rejected: id {:#x} exceeds the {} range (max {id_max:#x})", msg.id, if msg.is_extended { "extended" } else { "standard" });
        return Err(TickBusError::invalid_argument(format!(
            "CAN id {:#x} exceeds the {} range (max {id_max:#x})",
            msg.id,
            if msg.is_extended { "extended" } else { "standard" }
        )));
    }
    if msg.dlc > CAN_MAX_DLC {
        log::warn!(bus; "CAN send rejected: dlc {} exceeds {CAN_MAX_DLC}", msg.dlc);
        return Err(TickBusError::invalid_argument(format!(
            "CAN dlc {} exceeds {CAN_MAX_DLC}",
            msg.dlc
        )));
    }
    Ok(())
}

pub struct CanBusTable {
    table: SlotTable<CanBus, CAN_CAPACITY>,
}

impl CanBusTable {
    pub fn new() -> Self {
        Self {
            table: SlotTable::new(),
        }
    }

    pub fn init(
        &mut self,
        bus: SlotId,
        config: CanConfig,
        rx_callback: Option<CanCallback>,
    ) -> Result<(), TickBusError> {
        validate_config(&config, bus)?;
        self.table.init(bus, || {
            Ok(CanBus {
                rx_callback,
                filters: [FilterSlot {
                    filter: CanFilter {
                        id: 0,
                        mask: 0,
                        is_extended: false,
                    },
                    active: false,
                }; CAN_MAX_FILTERS],
                rx_ring: RingBuffer::new(),
            })
        })?;
        Ok(())
    }

    pub fn add_filter(&mut self, bus: SlotId, filter: CanFilter) -> Result<usize, TickBusError> {
        let b = self.table.get_mut(bus)?;
        let slot = b.filters.iter_mut().position(|f| !f.active).ok_or_else(|| {
            log::warn!(bus; "CAN add_filter rejected: no free filter slots");
            TickBusError::protocol_error("no free CAN filter slots")
        })?;
        b.filters[slot] = FilterSlot {
            filter,
            active: true,
        };
        Ok(slot)
    }

    pub fn remove_filter(&mut self, bus: SlotId, filter_id: usize) -> Result<(), TickBusError> {
        let b = self.table.get_mut(bus)?;
        let slot = b.filters.get_mut(filter_id).ok_or_else(|| {
            log::warn!(bus, filter_id; "CAN remove_filter rejected: filter id out of range");
            TickBusError::invalid_argument(format!("filter id {filter_id} out of range"))
        })?;
        if !slot.active {
            log::warn!(bus, filter_id; "CAN remove_filter rejected: filter is not active");
            return Err(TickBusError::invalid_argument(format!(
                "filter {filter_id} is not active"
            )));
        }
        slot.active = false;
        Ok(())
    }

    /// Send `msg`. The sending process's own RX ring receives a copy
    /// whenever a callback is registered on the bus, independent of
    /// whether `msg` actually passes any active filter.
    pub fn send(&mut self, bus: SlotId, msg: CanMessage) -> Result<(), TickBusError> {
        validate_message(bus, &msg)?;
        let b = self.table.get_mut(bus)?;
        if b.rx_callback.is_some() {
            let passes_filter = b
                .filters
                .iter()
                .any(|f| f.active && f.filter.matches(&msg));
            let _ = passes_filter; // observed gate is always true once a callback exists
            let _ = b.rx_ring.push(msg);
        }
        Ok(())
    }

    pub fn receive(&mut self, bus: SlotId) -> Result<Option<CanMessage>, TickBusError> {
        Ok(self.table.get_mut(bus)?.rx_ring.pop())
    }

    pub fn close(&mut self, bus: SlotId) -> Result<(), TickBusError> {
        self.table.close(bus)?;
        Ok(())
    }
}

impl Default for CanBusTable {
    fn default() -> Self {
        Self::new()
    }
}
