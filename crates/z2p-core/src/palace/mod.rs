//! Palace room graph
//!
//! A palace owns its room instances in an arena indexed by [`RoomId`].
//! Connections, drop links and linked pairs are all stored as ids, so rooms
//! never hold references to each other.

mod attach;
mod checks;
mod shuffle;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::room::{Direction, RoomId, RoomInstance, RoomRole};

/// Number of the great palace
pub const GREAT_PALACE: u8 = 7;

/// Palace group used when packing room data
pub fn palace_group(palace_number: u8) -> Result<u8, GenerationError> {
    match palace_number {
        1 | 2 | 5 => Ok(1),
        3 | 4 | 6 => Ok(2),
        7 => Ok(3),
        n => Err(GenerationError::InvalidPalaceNumber(n)),
    }
}

/// One dungeon's room graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palace {
    pub number: u8,
    pub group: u8,
    /// Target room count
    pub max_rooms: usize,
    /// Regeneration attempts spent producing this palace
    pub generations: u32,
    rooms: Vec<RoomInstance>,
    root: Option<RoomId>,
    boss: Option<RoomId>,
    item: Option<RoomId>,
    thunderbird: Option<RoomId>,
    links: BTreeMap<RoomId, RoomId>,
}

impl Palace {
    pub fn new(number: u8, max_rooms: usize) -> Result<Self, GenerationError> {
        Ok(Self {
            number,
            group: palace_group(number)?,
            max_rooms,
            generations: 0,
            rooms: Vec::with_capacity(max_rooms),
            root: None,
            boss: None,
            item: None,
            thunderbird: None,
            links: BTreeMap::new(),
        })
    }

    pub fn is_great_palace(&self) -> bool {
        self.number == GREAT_PALACE
    }

    pub fn rooms(&self) -> &[RoomInstance] {
        &self.rooms
    }

    pub fn room(&self, id: RoomId) -> &RoomInstance {
        &self.rooms[id.0]
    }

    pub(crate) fn room_mut(&mut self, id: RoomId) -> &mut RoomInstance {
        &mut self.rooms[id.0]
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Rooms still available before reaching the target size
    pub fn remaining_capacity(&self) -> usize {
        self.max_rooms.saturating_sub(self.rooms.len())
    }

    pub fn root(&self) -> Option<RoomId> {
        self.root
    }

    pub fn boss_room(&self) -> Option<RoomId> {
        self.boss
    }

    pub fn item_room(&self) -> Option<RoomId> {
        self.item
    }

    pub fn thunderbird(&self) -> Option<RoomId> {
        self.thunderbird
    }

    pub fn room_ids(&self) -> impl DoubleEndedIterator<Item = RoomId> {
        (0..self.rooms.len()).map(RoomId)
    }

    /// Register a room without connecting it, giving it the role's flag.
    pub fn push_room(&mut self, mut room: RoomInstance, role: RoomRole) -> RoomId {
        let id = RoomId(self.rooms.len());
        room.role |= role;
        if role.contains(RoomRole::ROOT) {
            self.root = Some(id);
        }
        if role.contains(RoomRole::BOSS) {
            self.boss = Some(id);
        }
        if role.contains(RoomRole::ITEM) && self.item.is_none() {
            self.item = Some(id);
        }
        if role.contains(RoomRole::THUNDERBIRD) {
            self.thunderbird = Some(id);
        }
        self.rooms.push(room);
        id
    }

    /// Pair two rooms as linked halves. Any earlier partner of either is detached.
    pub fn link(&mut self, a: RoomId, b: RoomId) {
        self.unlink(a);
        self.unlink(b);
        self.links.insert(a, b);
        self.links.insert(b, a);
    }

    /// Detach a room from its partner, on both sides
    pub fn unlink(&mut self, id: RoomId) {
        if let Some(partner) = self.links.remove(&id) {
            self.links.remove(&partner);
        }
    }

    pub fn linked(&self, id: RoomId) -> Option<RoomId> {
        self.links.get(&id).copied()
    }

    /// Number of rooms that still expose an unconnected exit
    pub fn open_room_count(&self) -> usize {
        self.rooms.iter().filter(|r| r.count_open_exits() > 0).count()
    }

    pub fn has_open_exits(&self) -> bool {
        self.rooms.iter().any(|r| r.count_open_exits() > 0)
    }

    /// Total enemy data this palace will occupy
    pub fn enemy_bytes(&self) -> usize {
        self.rooms.iter().map(|r| r.enemy_bytes().len()).sum()
    }

    /// Remove the most recently placed room and every connection to it.
    pub(crate) fn pop_room(&mut self) -> Option<RoomInstance> {
        let id = RoomId(self.rooms.len().checked_sub(1)?);
        let neighbours: Vec<_> = Direction::ALL
            .into_iter()
            .filter_map(|dir| self.rooms[id.0].connection(dir).map(|n| (dir, n)))
            .collect();
        for (dir, n) in neighbours {
            let is_drop = self.rooms[id.0].is_drop_exit(dir);
            let other = &mut self.rooms[n.0];
            if is_drop {
                other.set_dropped_from(None);
            } else {
                other.set_connection(dir.opposite(), None);
            }
        }
        if let Some(trigger) = self.rooms[id.0].dropped_from() {
            self.rooms[trigger.0].set_connection(Direction::Down, None);
        }
        self.unlink(id);
        for slot in [&mut self.root, &mut self.boss, &mut self.item, &mut self.thunderbird] {
            if *slot == Some(id) {
                *slot = None;
            }
        }
        self.rooms.pop()
    }
}
