use super::*;

// =============================================================================
// join / list_peers
// =============================================================================

#[test]
fn list_peers_unknown_room_is_empty() {
    let registry = RoomRegistry::new();
    assert!(registry.list_peers("nope").is_empty());
}

#[test]
fn list_peers_returns_every_distinct_joiner() {
    let mut registry = RoomRegistry::new();
    let ids = ["d", "a", "c", "b", "e"];
    for id in ids {
        registry.join("room", id).unwrap();
    }

    let mut expected: Vec<String> = ids.iter().map(ToString::to_string).collect();
    expected.sort();
    assert_eq!(registry.list_peers("room"), expected);
}

#[test]
fn join_reports_existing_members_only() {
    let mut registry = RoomRegistry::new();
    let first = registry.join("room", "a").unwrap();
    assert!(first.others.is_empty());
    assert!(!first.rejoined);

    let second = registry.join("room", "b").unwrap();
    assert_eq!(second.others, vec!["a".to_string()]);
}

#[test]
fn join_is_idempotent() {
    let mut registry = RoomRegistry::new();
    registry.join("room", "a").unwrap();
    registry.join("room", "b").unwrap();

    let again = registry.join("room", "a").unwrap();
    assert!(again.rejoined);
    assert_eq!(again.others, vec!["b".to_string()]);
    assert_eq!(registry.list_peers("room").len(), 2);
    assert_eq!(registry.rooms_of("a"), vec!["room".to_string()]);
}

#[test]
fn rooms_are_isolated() {
    let mut registry = RoomRegistry::new();
    registry.join("r1", "a").unwrap();
    registry.join("r2", "b").unwrap();
    assert_eq!(registry.list_peers("r1"), vec!["a".to_string()]);
    assert_eq!(registry.list_peers("r2"), vec!["b".to_string()]);
    assert_eq!(registry.room_count(), 2);
}

// =============================================================================
// leave
// =============================================================================

#[test]
fn leave_removes_peer_from_every_room() {
    let mut registry = RoomRegistry::new();
    registry.join("r1", "a").unwrap();
    registry.join("r1", "b").unwrap();
    registry.join("r2", "a").unwrap();
    registry.join("r2", "c").unwrap();

    let departures = registry.leave("a");
    assert_eq!(
        departures,
        vec![
            Departure { room_id: "r1".into(), remaining: vec!["b".into()] },
            Departure { room_id: "r2".into(), remaining: vec!["c".into()] },
        ]
    );
    assert_eq!(registry.list_peers("r1"), vec!["b".to_string()]);
    assert_eq!(registry.list_peers("r2"), vec!["c".to_string()]);
    assert!(registry.rooms_of("a").is_empty());
}

#[test]
fn leave_drops_empty_rooms() {
    let mut registry = RoomRegistry::new();
    registry.join("solo", "a").unwrap();
    let departures = registry.leave("a");

    assert_eq!(departures.len(), 1);
    assert!(departures[0].remaining.is_empty());
    assert_eq!(registry.room_count(), 0);
}

#[test]
fn leave_unknown_peer_is_noop() {
    let mut registry = RoomRegistry::new();
    registry.join("r", "a").unwrap();
    assert!(registry.leave("ghost").is_empty());
    assert_eq!(registry.list_peers("r"), vec!["a".to_string()]);
}

// =============================================================================
// capacity
// =============================================================================

#[test]
fn unbounded_registry_accepts_third_joiner() {
    let mut registry = RoomRegistry::new();
    assert_eq!(registry.capacity(), None);
    for id in ["a", "b", "c"] {
        registry.join("room", id).unwrap();
    }
    assert_eq!(registry.list_peers("room").len(), 3);
}

#[test]
fn capacity_refuses_new_joiner_when_full() {
    let mut registry = RoomRegistry::with_capacity(Some(2));
    registry.join("room", "a").unwrap();
    registry.join("room", "b").unwrap();

    let err = registry.join("room", "c").unwrap_err();
    assert_eq!(err, RegistryError::RoomFull { room_id: "room".into(), capacity: 2 });
    assert_eq!(err.error_code(), "E_ROOM_FULL");
    assert!(registry.rooms_of("c").is_empty());
    assert_eq!(registry.list_peers("room").len(), 2);
}

#[test]
fn capacity_allows_rejoin_and_frees_slot_on_leave() {
    let mut registry = RoomRegistry::with_capacity(Some(2));
    registry.join("room", "a").unwrap();
    registry.join("room", "b").unwrap();
    assert!(registry.join("room", "a").unwrap().rejoined);

    registry.leave("b");
    assert!(registry.join("room", "c").is_ok());
}
