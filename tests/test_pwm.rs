// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Black-box coverage of the periodic-waveform (PWM-like) bus family:
// derived timing fields and their recomputation.

use tickbus::bus::PwmBus;

#[test]
fn period_and_duty_are_derived_from_frequency_and_duty_cycle() {
    let mut bus = PwmBus::new();
    bus.init(0, 1000, 25).unwrap();
    assert_eq!(bus.period_ns(0).unwrap(), 1_000_000);
    assert_eq!(bus.duty_ns(0).unwrap(), 250_000);
}

#[test]
fn setters_recompute_both_derived_fields() {
    let mut bus = PwmBus::new();
    bus.init(0, 1000, 25).unwrap();

    bus.set_frequency(0, 500).unwrap();
    assert_eq!(bus.period_ns(0).unwrap(), 2_000_000);
    assert_eq!(bus.duty_ns(0).unwrap(), 500_000);

    bus.set_duty(0, 50).unwrap();
    assert_eq!(bus.duty_ns(0).unwrap(), 1_000_000);
}

#[test]
fn start_stop_toggles_running_state() {
    let mut bus = PwmBus::new();
    bus.init(0, 1000, 50).unwrap();
    assert!(!bus.is_running(0).unwrap());
    bus.start(0).unwrap();
    assert!(bus.is_running(0).unwrap());
    bus.stop(0).unwrap();
    assert!(!bus.is_running(0).unwrap());
}

#[test]
fn close_auto_stops_a_running_channel() {
    let mut bus = PwmBus::new();
    bus.init(0, 1000, 50).unwrap();
    bus.start(0).unwrap();
    bus.close(0).unwrap();
    assert!(bus.is_running(0).is_err());
}

#[test]
fn out_of_range_frequency_and_duty_are_rejected() {
    let mut bus = PwmBus::new();
    assert!(bus.init(0, 0, 50).is_err());
    assert!(bus.init(0, 2_000_000, 50).is_err());
    assert!(bus.init(0, 1000, 150).is_err());
}

#[test]
fn set_duty_rejects_values_over_100_percent_without_mutating_state() {
    let mut bus = PwmBus::new();
    bus.init(0, 1000, 25).unwrap();
    assert!(bus.set_duty(0, 150).is_err());
    assert_eq!(bus.duty_ns(0).unwrap(), 250_000);
}
