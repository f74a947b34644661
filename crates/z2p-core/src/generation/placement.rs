//! Filling a palace skeleton with rooms from the pool, including drop chains

use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::catalog::RoomPool;
use crate::error::GenerationError;
use crate::options::PalaceOptions;
use crate::palace::Palace;
use crate::requirement::Requirements;
use crate::rng::GenRng;
use crate::room::{Direction, RoomId, TemplateId};

use super::skeleton::{MapCounters, instantiate, partner_of};

/// Failed placements allowed in one fill pass before it is abandoned
pub const ROOM_PLACEMENT_FAILURE_LIMIT: u32 = 200;
/// Failed drop-zone placements allowed before a drop chain is cut short
pub const DROP_PLACEMENT_FAILURE_LIMIT: u32 = 100;
/// Longest drop chain below one trigger
pub const MAX_DROP_CHAIN: usize = 5;

/// Template ids with O(1) random access and O(1) removal
#[derive(Debug, Clone, Default)]
struct IndexedSet {
    items: Vec<TemplateId>,
    positions: HashMap<TemplateId, usize>,
}

impl IndexedSet {
    fn insert(&mut self, id: TemplateId) {
        if !self.positions.contains_key(&id) {
            self.positions.insert(id, self.items.len());
            self.items.push(id);
        }
    }

    fn remove(&mut self, id: TemplateId) -> bool {
        let Some(index) = self.positions.remove(&id) else {
            return false;
        };
        self.items.swap_remove(index);
        if let Some(moved) = self.items.get(index) {
            self.positions.insert(*moved, index);
        }
        true
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn draw(&self, rng: &mut GenRng) -> Option<TemplateId> {
        rng.choose(&self.items).copied()
    }
}

/// Filler templates still available to one placement round
///
/// Every template can be drawn as filler; drop zones are also indexed on
/// their own for drawing landings below a drop.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    all: IndexedSet,
    drop_zones: IndexedSet,
}

impl CandidatePool {
    pub fn new(pool: &impl RoomPool, templates: impl IntoIterator<Item = TemplateId>) -> Self {
        let mut candidates = Self::default();
        for id in templates {
            candidates.all.insert(id);
            if pool.template(id).is_drop_zone {
                candidates.drop_zones.insert(id);
            }
        }
        candidates
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn drop_zone_count(&self) -> usize {
        self.drop_zones.len()
    }

    pub fn contains(&self, id: TemplateId) -> bool {
        self.all.positions.contains_key(&id)
    }

    /// Take a template out of circulation
    pub fn remove(&mut self, id: TemplateId) {
        self.all.remove(id);
        self.drop_zones.remove(id);
    }
}

/// How a fill pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The palace reached its target size
    Filled,
    /// Too many candidates failed to attach
    PlacementLimit,
    /// The round ran out of templates to draw
    PoolExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Placed,
    Rejected,
    /// A drop chain needed a landing and none was left
    OutOfDropZones,
}

/// Grows one palace from its skeleton
pub struct Placer<'a, P: RoomPool> {
    pool: &'a P,
    options: &'a PalaceOptions,
}

impl<'a, P: RoomPool> Placer<'a, P> {
    pub fn new(pool: &'a P, options: &'a PalaceOptions) -> Self {
        Self { pool, options }
    }

    /// Draw and attach rooms until the palace reaches its target size.
    ///
    /// Loose exits are consolidated whenever the rooms left to place could
    /// no longer absorb them.
    pub fn fill(
        &self,
        palace: &mut Palace,
        candidates: &mut CandidatePool,
        map: &mut MapCounters,
        rng: &mut GenRng,
    ) -> Result<RoundOutcome, GenerationError> {
        let mut failures = 0;
        while palace.len() < palace.max_rooms {
            let Some(id) = candidates.all.draw(rng) else {
                return Ok(RoundOutcome::PoolExhausted);
            };
            match self.try_place(palace, id, candidates, map, rng)? {
                Placement::Placed => {}
                Placement::Rejected => failures += 1,
                Placement::OutOfDropZones => return Ok(RoundOutcome::PoolExhausted),
            }
            if failures >= ROOM_PLACEMENT_FAILURE_LIMIT {
                return Ok(RoundOutcome::PlacementLimit);
            }
            let remaining = palace.remaining_capacity();
            if palace.open_room_count() >= remaining {
                palace.consolidate(remaining.div_ceil(2));
            }
        }
        Ok(RoundOutcome::Filled)
    }

    /// Pre-attachment filters. True if the template may be tried at all.
    ///
    /// A drop needs room for its own slots, at least one landing and one
    /// slot left after the chain.
    fn admissible(
        &self,
        palace: &Palace,
        id: TemplateId,
        partner: Option<TemplateId>,
        candidates: &CandidatePool,
    ) -> bool {
        let template = self.pool.template(id);
        let slots = 1 + usize::from(partner.is_some());
        let drops = template.has_drop || partner.is_some_and(|p| self.pool.template(p).has_drop);
        if drops && (candidates.drop_zone_count() == 0 || palace.remaining_capacity() < slots + 2) {
            return false;
        }
        if palace.remaining_capacity() < slots {
            return false;
        }
        if self.options.no_duplicate_rooms && partner.is_some_and(|p| already_placed(palace, p)) {
            return false;
        }
        if self.options.no_duplicate_rooms_by_layout
            && !template.layout.is_empty()
            && palace.rooms().iter().any(|r| r.layout == template.layout)
        {
            return false;
        }
        self.options.blockers_anywhere
            || Requirements::allowed_blockers(palace.number).contains(template.requirements.blockers())
    }

    fn try_place(
        &self,
        palace: &mut Palace,
        id: TemplateId,
        candidates: &mut CandidatePool,
        map: &mut MapCounters,
        rng: &mut GenRng,
    ) -> Result<Placement, GenerationError> {
        let partner = partner_of(self.pool, id)?;
        if !self.admissible(palace, id, partner, candidates) {
            return Ok(Placement::Rejected);
        }
        let map_no = map.current(palace.number);

        let room = instantiate(self.pool, id, palace.group, map_no);
        let Some(placed) = palace.add_room(room) else {
            return Ok(Placement::Rejected);
        };
        let mut partner_room = None;
        if let Some(partner) = partner {
            let half = instantiate(self.pool, partner, palace.group, map_no);
            match palace.add_room(half) {
                Some(half) => {
                    palace.link(placed, half);
                    partner_room = Some(half);
                }
                None => {
                    palace.pop_room();
                    return Ok(Placement::Rejected);
                }
            }
        }

        if self.options.no_duplicate_rooms {
            candidates.remove(id);
            if let Some(partner) = partner {
                candidates.remove(partner);
            }
        }
        map.advance(palace.number);

        let trigger = match partner_room {
            Some(half) if palace.room(half).has_drop => half,
            _ => placed,
        };
        if palace.room(trigger).has_drop && palace.room(trigger).exits.has(Direction::Down) {
            return self.drop_chain(palace, trigger, candidates, map, rng);
        }
        Ok(Placement::Placed)
    }

    /// Place landings end to end below `trigger`, continuing while the newest
    /// landing (or its linked half) drops again.
    fn drop_chain(
        &self,
        palace: &mut Palace,
        trigger: RoomId,
        candidates: &mut CandidatePool,
        map: &mut MapCounters,
        rng: &mut GenRng,
    ) -> Result<Placement, GenerationError> {
        let longest = palace
            .remaining_capacity()
            .saturating_sub(1)
            .min(MAX_DROP_CHAIN)
            .min(candidates.drop_zone_count() + 1);
        if longest == 0 {
            return Ok(Placement::Placed);
        }
        let length = rng.range(1, longest + 1);

        let mut trigger = trigger;
        let mut placed = 0;
        let mut failures = 0;
        while placed < length && palace.remaining_capacity() > 1 {
            let Some(zone_id) = candidates.drop_zones.draw(rng) else {
                debug!(palace = palace.number, "exhausted all available drop zones");
                return Ok(Placement::OutOfDropZones);
            };
            let partner = partner_of(self.pool, zone_id)?;
            let fits = match partner {
                Some(p) => {
                    palace.remaining_capacity() > 2
                        && !(self.options.no_duplicate_rooms && already_placed(palace, p))
                }
                None => true,
            };
            let map_no = map.current(palace.number);
            let landing = instantiate(self.pool, zone_id, palace.group, map_no);
            let attached = if fits {
                palace.attach_drop_zone(trigger, landing)
            } else {
                None
            };
            let Some(zone) = attached else {
                failures += 1;
                if failures > DROP_PLACEMENT_FAILURE_LIMIT {
                    trace!(palace = palace.number, "drop placement failure limit exceeded");
                    break;
                }
                continue;
            };

            if self.options.no_duplicate_rooms {
                candidates.remove(zone_id);
                if let Some(partner) = partner {
                    candidates.remove(partner);
                }
            }
            let mut next = palace.room(zone).has_drop.then_some(zone);
            if let Some(partner) = partner {
                let half = instantiate(self.pool, partner, palace.group, map_no);
                if let Some(half) = palace.add_room(half) {
                    palace.link(zone, half);
                    if next.is_none() && palace.room(half).has_drop {
                        next = Some(half);
                    }
                }
            }
            map.advance(palace.number);
            placed += 1;

            match next {
                Some(room) if palace.room(room).exits.has(Direction::Down) => trigger = room,
                _ => break,
            }
        }
        Ok(Placement::Placed)
    }
}

fn already_placed(palace: &Palace, id: TemplateId) -> bool {
    palace.rooms().iter().any(|r| r.template == id)
}
