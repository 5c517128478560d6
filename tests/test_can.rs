// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Black-box coverage of the framed-packet (CAN-like) bus family: framed
// loopback and the preserved "a registered callback always stores,
// regardless of whether any filter actually matched" behavior.

use tickbus::bus::can::{CanConfig, CanFilter, CanMessage};
use tickbus::bus::CanBusTable;

fn config() -> CanConfig {
    CanConfig {
        bitrate: 500_000,
        sample_point: 75,
        sync_jump: 1,
    }
}

fn msg(id: u32) -> CanMessage {
    CanMessage {
        id,
        is_extended: false,
        is_rtr: false,
        dlc: 8,
        data: [1, 2, 3, 4, 5, 6, 7, 8],
    }
}

#[test]
fn framed_message_loops_back_when_filter_matches() {
    let mut bus = CanBusTable::new();
    bus.init(0, config(), Some(Box::new(|_, _| {}))).unwrap();
    bus.add_filter(
        0,
        CanFilter {
            id: 0x123,
            mask: 0x7FF,
            is_extended: false,
        },
    )
    .unwrap();

    bus.send(0, msg(0x123)).unwrap();
    let got = bus.receive(0).unwrap().expect("message queued");
    assert_eq!(got.id, 0x123);
    assert_eq!(got.dlc, 8);
    assert_eq!(got.data, [1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn message_is_stored_even_when_no_filter_matches() {
    let mut bus = CanBusTable::new();
    bus.init(0, config(), Some(Box::new(|_, _| {}))).unwrap();
    bus.add_filter(
        0,
        CanFilter {
            id: 0x123,
            mask: 0x7FF,
            is_extended: false,
        },
    )
    .unwrap();

    // 0x456 never matches the 0x123 filter, but a callback is registered
    // so the message is queued regardless.
    bus.send(0, msg(0x456)).unwrap();
    assert!(bus.receive(0).unwrap().is_some());
}

#[test]
fn no_callback_registered_means_nothing_is_queued() {
    let mut bus = CanBusTable::new();
    bus.init(0, config(), None).unwrap();
    bus.send(0, msg(0x123)).unwrap();
    assert!(bus.receive(0).unwrap().is_none());
}

#[test]
fn send_validates_id_range_and_dlc() {
    let mut bus = CanBusTable::new();
    bus.init(0, config(), None).unwrap();

    let mut bad = msg(0x800); // exceeds CAN_ID_STD_MAX
    assert!(bus.send(0, bad).is_err());

    bad = msg(0x123);
    bad.dlc = 9;
    assert!(bus.send(0, bad).is_err());
}

#[test]
fn invalid_bus_config_is_rejected() {
    let mut bus = CanBusTable::new();
    let mut bad = config();
    bad.bitrate = 10_000;
    assert!(bus.init(0, bad, None).is_err());
}

#[test]
fn removing_a_filter_twice_fails() {
    let mut bus = CanBusTable::new();
    bus.init(0, config(), None).unwrap();
    let id = bus
        .add_filter(
            0,
            CanFilter {
                id: 0x1,
                mask: 0x7FF,
                is_extended: false,
            },
        )
        .unwrap();
    bus.remove_filter(0, id).unwrap();
    assert!(bus.remove_filter(0, id).is_err());
}
