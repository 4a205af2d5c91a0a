// Host-side tests for mapping session notices onto page changes.

#![allow(dead_code)]
mod notice {
    include!("../src/notice.rs");
}

use glam::Vec2;
use notice::*;
use protocol_core::Notice;

#[test]
fn unlock_shows_a_banner_and_chimes() {
    let changes = page_changes(&Notice::Unlocked {
        name: "ELEVEN",
        label: "11:11",
    });
    assert_eq!(
        changes,
        vec![
            PageChange::Banner("\u{1F513} 11:11 MODE UNLOCKED".into()),
            PageChange::Chime
        ]
    );
}

#[test]
fn effect_lifecycle_toggles_a_body_class() {
    assert_eq!(
        page_changes(&Notice::Started("triangle_portal")),
        vec![PageChange::AddClass("fx-triangle-portal".into())]
    );
    assert_eq!(
        page_changes(&Notice::Ended("triangle_portal")),
        vec![PageChange::RemoveClass("fx-triangle-portal".into())]
    );
}

#[test]
fn pulses_flash_and_gestures_anchor() {
    assert_eq!(
        page_changes(&Notice::Pulse("reality_tear")),
        vec![PageChange::Flash("flash-reality-tear".into())]
    );
    assert_eq!(
        page_changes(&Notice::Gesture {
            name: "TRIANGLE",
            at: Vec2::new(200.4, 199.6),
        }),
        vec![PageChange::Anchor {
            x: "200px".into(),
            y: "200px".into()
        }]
    );
}
