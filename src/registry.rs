//! Room registry — in-memory room membership.
//!
//! DESIGN
//! ======
//! Rooms map to the set of connection ids currently inside them, with a
//! reverse index from connection to rooms so a disconnect can be cleaned
//! up without scanning every room. Rooms are created by the first join
//! and dropped as soon as they are empty.
//!
//! The registry is plain data. `AppState` wraps it in a lock so all
//! mutation happens under a single writer.

use std::collections::{HashMap, HashSet};

use crate::signal::{ErrorCode, PeerId, RoomId};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("room {room_id} is full ({capacity} peers)")]
    RoomFull { room_id: RoomId, capacity: usize },
}

impl ErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::RoomFull { .. } => "E_ROOM_FULL",
        }
    }
}

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    /// Members present before this join, excluding the joiner.
    pub others: Vec<PeerId>,
    /// The joiner was already a member; membership is unchanged.
    pub rejoined: bool,
}

/// A room that a departing peer was removed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room_id: RoomId,
    /// Members still in the room after removal.
    pub remaining: Vec<PeerId>,
}

#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, HashSet<PeerId>>,
    memberships: HashMap<PeerId, HashSet<RoomId>>,
    capacity: Option<usize>,
}

impl RoomRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that refuses a joiner once a room holds `capacity` peers.
    #[must_use]
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self { capacity, ..Self::default() }
    }

    /// Add `peer_id` to `room_id`, creating the room if needed.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::RoomFull` when a capacity is configured and a
    /// new peer would exceed it. Re-joining members are never refused.
    pub fn join(&mut self, room_id: &str, peer_id: &str) -> Result<Joined, RegistryError> {
        let members = self.rooms.get(room_id);
        let rejoined = members.is_some_and(|m| m.contains(peer_id));

        if let (Some(capacity), false) = (self.capacity, rejoined) {
            if members.map_or(0, HashSet::len) >= capacity {
                return Err(RegistryError::RoomFull { room_id: room_id.to_owned(), capacity });
            }
        }

        let members = self.rooms.entry(room_id.to_owned()).or_default();
        let mut others: Vec<PeerId> = members.iter().filter(|p| *p != peer_id).cloned().collect();
        others.sort_unstable();
        members.insert(peer_id.to_owned());

        self.memberships
            .entry(peer_id.to_owned())
            .or_default()
            .insert(room_id.to_owned());

        Ok(Joined { others, rejoined })
    }

    /// Current members of `room_id`. Unknown rooms are empty.
    #[must_use]
    pub fn list_peers(&self, room_id: &str) -> Vec<PeerId> {
        let mut peers: Vec<PeerId> = self
            .rooms
            .get(room_id)
            .map(|m| m.iter().cloned().collect())
            .unwrap_or_default();
        peers.sort_unstable();
        peers
    }

    /// Remove `peer_id` from every room it joined. Empty rooms are dropped.
    pub fn leave(&mut self, peer_id: &str) -> Vec<Departure> {
        let Some(room_ids) = self.memberships.remove(peer_id) else {
            return Vec::new();
        };

        let mut departures = Vec::with_capacity(room_ids.len());
        for room_id in room_ids {
            let Some(members) = self.rooms.get_mut(&room_id) else {
                continue;
            };
            members.remove(peer_id);
            let mut remaining: Vec<PeerId> = members.iter().cloned().collect();
            remaining.sort_unstable();
            if members.is_empty() {
                self.rooms.remove(&room_id);
            }
            departures.push(Departure { room_id, remaining });
        }
        departures.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        departures
    }

    /// Rooms `peer_id` currently belongs to.
    #[cfg(test)]
    #[must_use]
    pub fn rooms_of(&self, peer_id: &str) -> Vec<RoomId> {
        let mut rooms: Vec<RoomId> = self
            .memberships
            .get(peer_id)
            .map(|r| r.iter().cloned().collect())
            .unwrap_or_default();
        rooms.sort_unstable();
        rooms
    }

    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    #[cfg(test)]
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
