//! Rewiring: clearing, shuffling and name-based wiring of connections

use hashbrown::HashMap;

use crate::catalog::RoomPool;
use crate::error::GenerationError;
use crate::rng::GenRng;
use crate::room::{Direction, RoomId};

use super::Palace;

impl Palace {
    /// Clear every side and elevator connection. Drop links stay in place.
    pub fn reset_rooms(&mut self) {
        for id in self.room_ids().collect::<Vec<_>>() {
            let room = self.room_mut(id);
            for dir in Direction::ALL {
                if !room.is_drop_exit(dir) {
                    room.set_connection(dir, None);
                }
            }
        }
    }

    /// Clear the graph and pair every live exit with a randomly chosen
    /// complementary exit of another room.
    pub fn shuffle_rooms(&mut self, rng: &mut GenRng) {
        self.reset_rooms();
        self.pair_randomly(rng, Direction::Right);
        self.pair_randomly(rng, Direction::Up);
    }

    fn pair_randomly(&mut self, rng: &mut GenRng, dir: Direction) {
        let slots = |palace: &Palace, d: Direction| -> Vec<RoomId> {
            palace
                .room_ids()
                .filter(|id| {
                    let room = palace.room(*id);
                    room.exits.has(d) && !room.is_drop_exit(d)
                })
                .collect()
        };
        let from = slots(self, dir);
        let mut to = slots(self, dir.opposite());
        rng.shuffle(&mut to);

        for i in 0..from.len().min(to.len()) {
            if from[i] != to[i] {
                continue;
            }
            let swap = (0..to.len()).find(|&j| {
                j != i && to[j] != from[i] && from.get(j).is_none_or(|f| *f != to[i])
            });
            if let Some(j) = swap {
                to.swap(i, j);
            }
        }
        for (a, b) in from.into_iter().zip(to) {
            if a != b {
                self.connect(a, dir, b);
            }
        }
    }

    /// Wire rooms to the neighbours their templates name, then seal whatever
    /// stayed unconnected.
    ///
    /// `bypass` names a room left out of this palace; links pointing at it
    /// are carried through to the room on its far side.
    pub fn create_tree(
        &mut self,
        pool: &impl RoomPool,
        bypass: Option<&str>,
    ) -> Result<(), GenerationError> {
        let by_name: HashMap<String, RoomId> = self
            .room_ids()
            .map(|id| (self.room(id).name.clone(), id))
            .collect();
        let bypassed = bypass
            .map(|name| {
                pool.lookup_by_name(name)
                    .ok_or_else(|| GenerationError::UnknownRoom(name.to_string()))
            })
            .transpose()?;

        for id in self.room_ids().collect::<Vec<_>>() {
            let links = &pool.template(self.room(id).template).vanilla_links;
            for dir in self.room(id).exits.directions() {
                if self.room(id).connection(dir).is_some() {
                    continue;
                }
                let mut target = links.get(dir);
                if let Some(skipped) = bypassed
                    && target.is_some_and(|name| Some(name) == bypass)
                {
                    target = pool.template(skipped).vanilla_links.get(dir);
                }
                let Some(&other) = target.and_then(|name| by_name.get(name)) else {
                    continue;
                };
                if other == id {
                    continue;
                }
                if self.room(id).is_drop_exit(dir) {
                    let zone = self.room(other);
                    if zone.is_drop_zone && zone.dropped_from().is_none() {
                        self.room_mut(id).set_connection(dir, Some(other));
                        self.room_mut(other).set_dropped_from(Some(id));
                    }
                    continue;
                }
                let back = self.room(other);
                let opposite = dir.opposite();
                if back.exits.has(opposite)
                    && back.connection(opposite).is_none()
                    && !back.is_drop_exit(opposite)
                {
                    self.connect(id, dir, other);
                }
            }
        }

        for id in self.room_ids().collect::<Vec<_>>() {
            let room = self.room_mut(id);
            for dir in room.open_exits().directions() {
                room.seal(dir);
            }
        }
        Ok(())
    }
}
