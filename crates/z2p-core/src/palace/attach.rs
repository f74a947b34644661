//! Exit matching: attaching new rooms and consolidating loose exits

use crate::room::{Direction, RoomId, RoomInstance, RoomRole};

use super::Palace;

impl Palace {
    /// First room other than `except` exposing an open, non-drop exit in `dir`,
    /// preferring rooms not already connected to `avoid_neighbours_of`.
    fn find_open_exit(
        &self,
        dir: Direction,
        except: &[RoomId],
        avoid_neighbours_of: Option<RoomId>,
    ) -> Option<RoomId> {
        let mut candidates = self.room_ids().filter(|id| {
            let room = self.room(*id);
            !except.contains(id)
                && room.exits.has(dir)
                && room.connection(dir).is_none()
                && !room.is_drop_exit(dir)
        });
        match avoid_neighbours_of {
            Some(owner) => {
                let neighbours: Vec<RoomId> = self.room(owner).neighbours().collect();
                let mut fallback = None;
                for id in candidates {
                    if !neighbours.contains(&id) {
                        return Some(id);
                    }
                    fallback.get_or_insert(id);
                }
                fallback
            }
            None => candidates.next(),
        }
    }

    pub(crate) fn connect(&mut self, a: RoomId, dir: Direction, b: RoomId) {
        self.room_mut(a).set_connection(dir, Some(b));
        self.room_mut(b).set_connection(dir.opposite(), Some(a));
    }

    /// Try to attach a new room through the first of its exits that matches
    /// an open complementary exit of a placed room. Its other exits stay open.
    ///
    /// Drop exits never match here. On failure nothing changes.
    pub fn add_room(&mut self, room: RoomInstance) -> Option<RoomId> {
        let (dir, target) = room
            .exits
            .directions()
            .filter(|dir| !room.is_drop_exit(*dir))
            .find_map(|dir| self.find_open_exit(dir.opposite(), &[], None).map(|t| (dir, t)))?;
        let id = self.push_room(room, RoomRole::empty());
        self.connect(id, dir, target);
        Some(id)
    }

    /// Place a drop-zone room directly beneath `trigger`'s drop exit.
    pub fn attach_drop_zone(&mut self, trigger: RoomId, room: RoomInstance) -> Option<RoomId> {
        let source = self.room(trigger);
        if !room.is_drop_zone
            || !source.has_drop
            || !source.exits.has(Direction::Down)
            || source.connection(Direction::Down).is_some()
        {
            return None;
        }
        let id = self.push_room(room, RoomRole::empty());
        self.room_mut(trigger).set_connection(Direction::Down, Some(id));
        self.room_mut(id).set_dropped_from(Some(trigger));
        Some(id)
    }

    /// Resolve loose exits, newest rooms first: pair open exits of different
    /// rooms with each other, then seal leftovers as dead-end walls in rooms
    /// that keep at least two live exits. Stops once no more than `keep_open`
    /// rooms remain open.
    pub fn consolidate(&mut self, keep_open: usize) {
        for id in self.room_ids().rev().collect::<Vec<_>>() {
            if self.open_room_count() <= keep_open {
                return;
            }
            for dir in self.room(id).open_exits().directions() {
                // pairing can close two rooms at once; never drop below the target
                let open = self.open_room_count();
                if open <= keep_open || (keep_open > 0 && open == keep_open + 1) {
                    break;
                }
                if self.room(id).is_drop_exit(dir) || self.room(id).connection(dir).is_some() {
                    continue;
                }
                if let Some(target) = self.find_open_exit(dir.opposite(), &[id], Some(id)) {
                    self.connect(id, dir, target);
                }
            }
            if self.open_room_count() <= keep_open {
                return;
            }
            let room = self.room_mut(id);
            for dir in room.open_exits().directions() {
                if room.live_exit_count() <= 2 {
                    break;
                }
                room.seal(dir);
            }
        }
    }
}
