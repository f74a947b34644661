//! Capability reachability
//!
//! Answers "could a player holding these abilities walk every room of this
//! palace?", where picking up the palace's own item may grant more.

use std::collections::VecDeque;

use crate::palace::Palace;
use crate::requirement::{Item, Requirements};
use crate::room::Direction;

/// Capability-reachability predicate used by cross-palace validation
pub trait ClearanceOracle {
    /// True if every room of `palace` can be reached holding `held`, where
    /// `gated` is the item withheld from the player until they find it in
    /// the palace itself.
    fn can_clear_all_rooms(&self, palace: &Palace, held: Requirements, gated: Item) -> bool;
}

/// Walks the room graph, entering a room only when one of its requirement
/// alternatives is met.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequirementClearance;

impl RequirementClearance {
    fn reachable(palace: &Palace, held: Requirements) -> Vec<bool> {
        let mut seen = vec![false; palace.len()];
        let Some(root) = palace.root() else {
            return seen;
        };
        if !palace.room(root).requirements.is_satisfied_by(held) {
            return seen;
        }
        seen[root.0] = true;
        let mut queue = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            let room = palace.room(id);
            for next in Direction::ALL.into_iter().filter_map(|dir| room.connection(dir)) {
                if seen[next.0] || !palace.room(next).requirements.is_satisfied_by(held) {
                    continue;
                }
                seen[next.0] = true;
                queue.push_back(next);
            }
        }
        seen
    }
}

impl ClearanceOracle for RequirementClearance {
    fn can_clear_all_rooms(&self, palace: &Palace, held: Requirements, gated: Item) -> bool {
        let mut held = held;
        loop {
            let seen = Self::reachable(palace, held);
            if seen.iter().all(|r| *r) {
                return true;
            }
            let found_item = palace
                .room_ids()
                .any(|id| seen[id.0] && palace.room(id).item == Some(gated));
            let gained = gated.ability();
            if !found_item || held.contains(gained) {
                return false;
            }
            held |= gained;
        }
    }
}
