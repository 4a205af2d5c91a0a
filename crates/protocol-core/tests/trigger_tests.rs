// Matcher and unlock-gating tests for the trigger system.

use glam::Vec2;
use protocol_core::constants::{KONAMI_SEQUENCE, TEXT_COMMANDS, TRIGGER_ELEVEN, TRIGGER_KONAMI};
use protocol_core::trigger::*;
use protocol_core::SessionConfig;

fn type_keys(system: &mut TriggerSystem, text: &str) -> Vec<TriggerEvent> {
    text.chars()
        .flat_map(|c| system.key_down(&c.to_string()))
        .collect()
}

#[test]
fn text_buffer_is_as_long_as_the_longest_command() {
    let matcher = TextCommandMatcher::new(&TEXT_COMMANDS);
    assert_eq!(matcher.capacity(), "TRANSCEND".len());
}

#[test]
fn every_command_fires_exactly_once_per_session() {
    for command in TEXT_COMMANDS {
        let mut system = TriggerSystem::new(&SessionConfig::default());
        let first = type_keys(&mut system, command);
        let fired: Vec<_> = first.iter().filter(|e| e.name == command).collect();
        assert_eq!(fired.len(), 1, "{command} should fire once");
        assert_eq!(fired[0].kind, TriggerKind::Command);

        // Typing it again is a silent no-op
        let second = type_keys(&mut system, command);
        assert!(second.iter().all(|e| e.name != command));
        assert!(system.unlocks().contains(command));
    }
}

#[test]
fn command_matches_after_unrelated_prefix() {
    let mut system = TriggerSystem::new(&SessionConfig::default());
    // Up to N-1 unrelated letters before the command
    let events = type_keys(&mut system, "XYZWQMATRIX");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "MATRIX");
}

#[test]
fn text_matcher_upper_cases_and_ignores_non_letters() {
    let mut matcher = TextCommandMatcher::new(&TEXT_COMMANDS);
    for key in ["v", "Shift", "o", "1", "ArrowUp", "i"] {
        assert_eq!(matcher.push(key), None);
    }
    assert_eq!(matcher.buffer(), "VOI");
    assert_eq!(matcher.push("d"), Some("VOID"));
    // Cleared on match
    assert_eq!(matcher.buffer(), "");
}

#[test]
fn first_registered_command_wins_on_overlap() {
    let mut matcher = TextCommandMatcher::new(&["ABC", "BC"]);
    matcher.push("a");
    matcher.push("b");
    assert_eq!(matcher.push("c"), Some("ABC"));

    let mut reversed = TextCommandMatcher::new(&["BC", "ABC"]);
    reversed.push("a");
    reversed.push("b");
    assert_eq!(reversed.push("c"), Some("BC"));
}

#[test]
fn buffer_keeps_only_the_last_n_letters() {
    let mut matcher = TextCommandMatcher::new(&["VOID"]);
    for key in ["v", "o", "x", "x", "x"] {
        matcher.push(key);
    }
    assert_eq!(matcher.buffer(), "OXXX");
    assert_eq!(matcher.push("i"), None);
}

#[test]
fn konami_sequence_fires_on_exact_match_and_repeats() {
    let mut system = TriggerSystem::new(&SessionConfig::default());
    for round in 0..2 {
        let events: Vec<_> = KONAMI_SEQUENCE
            .iter()
            .flat_map(|k| system.key_down(k))
            .filter(|e| e.kind == TriggerKind::Sequence)
            .collect();
        assert_eq!(events.len(), 1, "round {round}");
        assert_eq!(events[0].name, TRIGGER_KONAMI);
    }
    // Never recorded as an unlock
    assert!(!system.unlocks().contains(TRIGGER_KONAMI));
}

#[test]
fn konami_sequence_rejects_any_differing_key() {
    let mut matcher = SequenceMatcher::new(&KONAMI_SEQUENCE);
    let mut keys = KONAMI_SEQUENCE.to_vec();
    keys[5] = "ArrowLeft";
    assert!(keys.iter().all(|k| !matcher.push(k)));

    // Case-sensitive on the trailing letters
    let mut matcher = SequenceMatcher::new(&KONAMI_SEQUENCE);
    let mut keys = KONAMI_SEQUENCE.to_vec();
    keys[8] = "B";
    assert!(keys.iter().all(|k| !matcher.push(k)));
}

#[test]
fn konami_sequence_matches_after_leading_noise() {
    let mut matcher = SequenceMatcher::new(&KONAMI_SEQUENCE);
    assert!(!matcher.push("ArrowUp"));
    assert!(!matcher.push("x"));
    let hits: Vec<bool> = KONAMI_SEQUENCE.iter().map(|k| matcher.push(k)).collect();
    assert_eq!(hits.iter().filter(|h| **h).count(), 1);
    assert!(hits[9]);
}

#[test]
fn shoelace_area() {
    let area = triangle_area(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 3.0));
    assert!((area - 6.0).abs() < 1e-6);
    // Winding order does not matter
    let area = triangle_area(Vec2::new(0.0, 3.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 0.0));
    assert!((area - 6.0).abs() < 1e-6);
}

#[test]
fn triangle_band_is_inclusive() {
    let band = 10_000.0..=50_000.0;

    // Area exactly 10000
    let mut matcher = TrianglePatternMatcher::new(2.0, band.clone());
    assert_eq!(matcher.push(Vec2::new(0.0, 0.0), 0.0), None);
    assert_eq!(matcher.push(Vec2::new(200.0, 0.0), 0.1), None);
    let centroid = matcher.push(Vec2::new(0.0, 100.0), 0.2);
    assert!(centroid.is_some());

    // Area exactly 50000
    let mut matcher = TrianglePatternMatcher::new(2.0, band.clone());
    matcher.push(Vec2::new(0.0, 0.0), 0.0);
    matcher.push(Vec2::new(500.0, 0.0), 0.1);
    assert!(matcher.push(Vec2::new(0.0, 200.0), 0.2).is_some());

    // Just outside
    let mut matcher = TrianglePatternMatcher::new(2.0, band);
    matcher.push(Vec2::new(0.0, 0.0), 0.0);
    matcher.push(Vec2::new(199.0, 0.0), 0.1);
    assert!(matcher.push(Vec2::new(0.0, 100.0), 0.2).is_none());
}

#[test]
fn triangle_reports_centroid() {
    let mut matcher = TrianglePatternMatcher::new(2.0, 10_000.0..=50_000.0);
    matcher.push(Vec2::new(0.0, 0.0), 0.0);
    matcher.push(Vec2::new(300.0, 0.0), 0.5);
    let centroid = matcher.push(Vec2::new(0.0, 300.0), 1.0).unwrap();
    assert!((centroid - Vec2::new(100.0, 100.0)).length() < 1e-3);
}

#[test]
fn stale_clicks_are_excluded_before_area_is_computed() {
    let mut matcher = TrianglePatternMatcher::new(2.0, 10_000.0..=50_000.0);
    matcher.push(Vec2::new(0.0, 0.0), 0.0);
    // 2.5 s later the first click has expired
    matcher.push(Vec2::new(200.0, 0.0), 2.5);
    assert_eq!(matcher.pending(), 1);
    assert!(matcher.push(Vec2::new(0.0, 100.0), 2.6).is_none());
    assert_eq!(matcher.pending(), 2);
    assert!(matcher.push(Vec2::new(200.0, 100.0), 2.7).is_some());
}

#[test]
fn triangle_buffer_clears_regardless_of_outcome() {
    let mut matcher = TrianglePatternMatcher::new(2.0, 10_000.0..=50_000.0);
    matcher.push(Vec2::new(0.0, 0.0), 0.0);
    matcher.push(Vec2::new(1.0, 0.0), 0.1);
    // Degenerate triangle misses but still clears
    assert!(matcher.push(Vec2::new(2.0, 0.0), 0.2).is_none());
    assert_eq!(matcher.pending(), 0);
}

#[test]
fn triangle_is_repeatable() {
    let mut system = TriggerSystem::new(&SessionConfig::default());
    for round in 0..3 {
        let t = round as f64 * 10.0;
        system.click(Vec2::new(0.0, 0.0), t);
        system.click(Vec2::new(300.0, 0.0), t + 0.6);
        let events = system.click(Vec2::new(0.0, 300.0), t + 1.2);
        assert!(events.iter().any(|e| e.kind == TriggerKind::Pattern));
    }
}

#[test]
fn triple_click_requires_short_gaps() {
    let mut burst = ClickBurstMatcher::new(0.5, 3);
    assert!(!burst.push(0.0));
    assert!(!burst.push(0.3));
    assert!(burst.push(0.6));

    // A slow second click restarts the count
    let mut burst = ClickBurstMatcher::new(0.5, 3);
    assert!(!burst.push(0.0));
    assert!(!burst.push(0.9));
    assert!(!burst.push(1.2));
    assert!(burst.push(1.5));
}

#[test]
fn triple_click_reports_last_position() {
    let mut system = TriggerSystem::new(&SessionConfig::default());
    system.click(Vec2::new(10.0, 10.0), 0.0);
    system.click(Vec2::new(11.0, 10.0), 0.2);
    let events = system.click(Vec2::new(12.0, 10.0), 0.4);
    let burst = events
        .iter()
        .find(|e| e.kind == TriggerKind::ClickBurst)
        .unwrap();
    assert_eq!(burst.at, Some(Vec2::new(12.0, 10.0)));
}

#[test]
fn time_of_day_fires_once_through_the_whole_minute() {
    let mut system = TriggerSystem::new(&SessionConfig::default());
    assert!(system.clock(11, 10).is_none());
    let event = system.clock(11, 11).unwrap();
    assert_eq!(event.name, TRIGGER_ELEVEN);
    assert_eq!(event.label, "11:11");
    assert!(event.is_unlock());
    // Polled again while still 11:11, and again the next day
    assert!(system.clock(11, 11).is_none());
    assert!(system.clock(11, 11).is_none());
}

#[test]
fn unlock_set_keeps_insertion_order() {
    let mut set = UnlockSet::new();
    assert!(set.insert("VOID"));
    assert!(set.insert("MATRIX"));
    assert!(!set.insert("VOID"));
    assert_eq!(set.iter().collect::<Vec<_>>(), vec!["VOID", "MATRIX"]);
    assert_eq!(set.len(), 2);
}
