//! Structural checks over a finished room graph
//!
//! These only look at connections. Ability requirements are handled by
//! [`crate::clearance`].

use std::collections::VecDeque;

use crate::room::{Direction, RoomId};

use super::Palace;

impl Palace {
    fn connections_of(&self, id: RoomId) -> impl Iterator<Item = RoomId> + '_ {
        let room = self.room(id);
        Direction::ALL.into_iter().filter_map(|dir| room.connection(dir))
    }

    /// Rooms reachable from the root, following connections in their
    /// direction of travel. Drops lead down only. `skip` is treated as a wall.
    pub fn reachable_from_root(&self, skip: Option<RoomId>) -> Vec<bool> {
        let mut seen = vec![false; self.len()];
        let Some(root) = self.root() else {
            return seen;
        };
        if Some(root) == skip {
            return seen;
        }
        let mut queue = VecDeque::from([root]);
        seen[root.0] = true;
        while let Some(id) = queue.pop_front() {
            for next in self.connections_of(id) {
                if Some(next) == skip || seen[next.0] {
                    continue;
                }
                seen[next.0] = true;
                queue.push_back(next);
            }
        }
        seen
    }

    /// Every room can be reached from the root.
    pub fn all_reachable(&self) -> bool {
        !self.is_empty() && self.reachable_from_root(None).into_iter().all(|r| r)
    }

    /// True if some room has no way on to the boss room, such as a landing
    /// below a drop with no other exit.
    pub fn has_dead_end(&self) -> bool {
        let Some(boss) = self.boss_room() else {
            return false;
        };
        let mut entered_from: Vec<Vec<RoomId>> = vec![Vec::new(); self.len()];
        for id in self.room_ids() {
            for next in self.connections_of(id) {
                entered_from[next.0].push(id);
            }
        }
        let mut reaches_boss = vec![false; self.len()];
        reaches_boss[boss.0] = true;
        let mut queue = VecDeque::from([boss]);
        while let Some(id) = queue.pop_front() {
            for &prev in &entered_from[id.0] {
                if !reaches_boss[prev.0] {
                    reaches_boss[prev.0] = true;
                    queue.push_back(prev);
                }
            }
        }
        reaches_boss.into_iter().any(|r| !r)
    }

    /// The thunderbird room is reachable and cannot be walked around on the
    /// way to the boss.
    pub fn requires_thunderbird(&self) -> bool {
        let (Some(bird), Some(boss)) = (self.thunderbird(), self.boss_room()) else {
            return false;
        };
        self.reachable_from_root(None)[bird.0] && !self.reachable_from_root(Some(bird))[boss.0]
    }

    /// All structural acceptance checks for a finished palace
    pub fn is_structurally_sound(&self, require_thunderbird: bool) -> bool {
        !self.has_open_exits()
            && self.all_reachable()
            && !self.has_dead_end()
            && (!require_thunderbird || self.requires_thunderbird())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{drop_room, room};
    use super::*;
    use crate::room::{Exits, RoomRole};

    /// root - hall - boss, all horizontal
    fn corridor() -> Palace {
        let mut palace = Palace::new(1, 3).unwrap();
        palace.push_room(room("root", Exits::RIGHT), RoomRole::ROOT);
        palace.push_room(room("boss", Exits::LEFT), RoomRole::BOSS);
        palace.add_room(room("hall", Exits::LEFT | Exits::RIGHT)).unwrap();
        palace.consolidate(0);
        palace
    }

    #[test]
    fn test_corridor_is_sound() {
        let palace = corridor();
        assert!(palace.all_reachable());
        assert!(!palace.has_dead_end());
        assert!(palace.is_structurally_sound(false));
        assert!(!palace.requires_thunderbird());
    }

    #[test]
    fn test_disconnected_room() {
        let mut palace = corridor();
        palace.push_room(room("island", Exits::LEFT | Exits::RIGHT), RoomRole::empty());
        assert!(!palace.all_reachable());
        assert!(palace.has_dead_end());
    }

    #[test]
    fn test_drop_is_one_way() {
        let mut palace = Palace::new(1, 4).unwrap();
        palace.push_room(room("root", Exits::RIGHT), RoomRole::ROOT);
        let pit = palace
            .add_room(drop_room("pit", Exits::LEFT | Exits::DOWN, true, false))
            .unwrap();
        let zone = palace
            .attach_drop_zone(pit, drop_room("landing", Exits::RIGHT, false, true))
            .unwrap();
        let reach = palace.reachable_from_root(None);
        assert!(reach[zone.0]);
        // starting below, the pit is not reachable back through the drop
        assert_eq!(palace.room(zone).connection(Direction::Up), None);
        assert_eq!(palace.room(zone).neighbours().collect::<Vec<_>>(), vec![pit]);
    }

    #[test]
    fn test_landing_without_exit_is_dead_end() {
        let mut palace = Palace::new(1, 4).unwrap();
        palace.push_room(room("root", Exits::RIGHT), RoomRole::ROOT);
        let pit = palace
            .add_room(drop_room("pit", Exits::LEFT | Exits::RIGHT | Exits::DOWN, true, false))
            .unwrap();
        let boss = palace.push_room(room("boss", Exits::LEFT), RoomRole::BOSS);
        palace.connect(pit, Direction::Right, boss);
        assert!(!palace.has_dead_end());
        palace
            .attach_drop_zone(pit, drop_room("trap", Exits::empty(), false, true))
            .unwrap();
        assert!(palace.all_reachable());
        assert!(palace.has_dead_end());
    }

    #[test]
    fn test_side_rooms_are_not_dead_ends() {
        let mut palace = corridor();
        let closet = palace.push_room(room("closet", Exits::UP), RoomRole::empty());
        let hall = RoomId(2);
        palace.room_mut(hall).exits.insert(Exits::DOWN);
        palace.connect(hall, Direction::Down, closet);
        assert!(palace.is_structurally_sound(false));
    }

    #[test]
    fn test_requires_thunderbird() {
        let mut palace = Palace::new(7, 4).unwrap();
        let root = palace.push_room(room("root", Exits::RIGHT), RoomRole::ROOT);
        let bird = palace.push_room(
            room("bird", Exits::LEFT | Exits::RIGHT),
            RoomRole::THUNDERBIRD,
        );
        let boss = palace.push_room(room("boss", Exits::LEFT), RoomRole::BOSS);
        palace.connect(root, Direction::Right, bird);
        palace.connect(bird, Direction::Right, boss);
        assert!(palace.requires_thunderbird());
        assert!(palace.is_structurally_sound(true));

        // a second route around the bird
        let mut bypassed = Palace::new(7, 5).unwrap();
        let root = bypassed.push_room(room("root", Exits::RIGHT | Exits::UP), RoomRole::ROOT);
        let bird = bypassed.push_room(
            room("bird", Exits::LEFT | Exits::RIGHT),
            RoomRole::THUNDERBIRD,
        );
        let boss = bypassed.push_room(room("boss", Exits::LEFT | Exits::UP), RoomRole::BOSS);
        bypassed.connect(root, Direction::Right, bird);
        bypassed.connect(bird, Direction::Right, boss);
        let shaft = bypassed.push_room(room("shaft", Exits::DOWN), RoomRole::empty());
        bypassed.connect(root, Direction::Up, shaft);
        assert!(bypassed.requires_thunderbird());
        bypassed.room_mut(shaft).exits.insert(Exits::RIGHT);
        let ledge = bypassed.push_room(room("ledge", Exits::LEFT | Exits::DOWN), RoomRole::empty());
        bypassed.connect(shaft, Direction::Right, ledge);
        bypassed.connect(boss, Direction::Up, ledge);
        assert!(!bypassed.requires_thunderbird());
    }
}
