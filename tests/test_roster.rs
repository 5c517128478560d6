// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Black-box coverage of the roster's uniqueness and barrier invariants.

use tickbus::proto::ParticipantId;
use tickbus::Roster;

fn id(s: &str) -> ParticipantId {
    ParticipantId::new(s.as_bytes()).unwrap()
}

#[test]
fn uniqueness_holds_once_handshake_completes() {
    let mut roster: Roster<32> = Roster::new();
    for name in ["a", "b", "c"] {
        roster.register(id(name)).unwrap();
    }
    let seen: Vec<&ParticipantId> = roster.ids().collect();
    for (i, a) in seen.iter().enumerate() {
        for b in seen.iter().skip(i + 1) {
            assert_ne!(a, b, "no two roster slots may share an id");
        }
    }
}

#[test]
fn barrier_requires_every_registered_id_to_respond() {
    let mut roster: Roster<3> = Roster::new();
    roster.register(id("a")).unwrap();
    roster.register(id("b")).unwrap();
    roster.register(id("c")).unwrap();

    roster.reset_responses();
    roster.ack(&id("a"));
    roster.ack(&id("b"));
    assert!(!roster.all_responded(), "c has not acked yet");
    roster.ack(&id("c"));
    assert!(roster.all_responded());

    roster.reset_responses();
    assert!(!roster.all_responded(), "reset must clear every slot");
}
