// Host-side tests for front-end constants.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn chime_envelope_is_well_formed() {
    assert!(CHIME_BASE_HZ > 20.0 && CHIME_BASE_HZ < 20_000.0);
    assert!(CHIME_INTERVAL_RATIO > 1.0);
    assert!(CHIME_GAIN > 0.0 && CHIME_GAIN <= 0.5);
    assert!(CHIME_ATTACK_SEC > 0.0 && CHIME_ATTACK_SEC < CHIME_DURATION_SEC);
    assert!(CHIME_STAGGER_SEC < CHIME_DURATION_SEC);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn flashes_are_shorter_than_banners() {
    assert!(FLASH_VISIBLE_MS > 0);
    assert!(FLASH_VISIBLE_MS < BANNER_VISIBLE_MS);
}

#[test]
fn clear_color_is_opaque_and_dark() {
    let [r, g, b, a] = CLEAR_COLOR;
    assert_eq!(a, 1.0);
    for c in [r, g, b] {
        assert!((0.0..=0.1).contains(&c));
    }
}

#[test]
fn element_ids_are_plain_identifiers() {
    for id in [CANVAS_ID, NOTICE_CONTAINER_ID] {
        assert!(!id.is_empty());
        assert!(id.chars().all(|c| c.is_ascii_lowercase() || c == '-'), "{id}");
    }
}
