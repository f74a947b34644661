//! Mandatory rooms of a palace and the pools they are drawn from

use tracing::debug;

use crate::catalog::RoomPool;
use crate::error::GenerationError;
use crate::options::PalaceOptions;
use crate::palace::{GREAT_PALACE, Palace};
use crate::requirement::Item;
use crate::rng::GenRng;
use crate::room::{Direction, RoomGroup, RoomId, RoomInstance, RoomRole, TemplateId};

/// Palace group the thunderbird room is always packed with
pub(crate) const THUNDERBIRD_GROUP: u8 = 3;

/// Map slot counters, one per track
///
/// Palaces 1-6 share the normal track; the great palace has its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapCounters {
    pub normal: usize,
    pub great: usize,
}

impl MapCounters {
    /// Starting slots for a palace, given the palaces already finished.
    ///
    /// Palaces 1, 2, 5 and 3, 4, 6 stack on two separate banks.
    pub fn starting_at(palace_number: u8, finished: &[Palace]) -> Self {
        let size = |n: usize| finished.get(n).map_or(0, Palace::len);
        let normal = match palace_number {
            2 => size(0),
            4 => size(2),
            5 => size(0) + size(1),
            6 => size(2) + size(3),
            _ => 0,
        };
        Self { normal, great: 0 }
    }

    pub fn current(&self, palace_number: u8) -> usize {
        if palace_number == GREAT_PALACE {
            self.great
        } else {
            self.normal
        }
    }

    pub fn advance(&mut self, palace_number: u8) {
        if palace_number == GREAT_PALACE {
            self.great += 1;
        } else {
            self.normal += 1;
        }
    }
}

/// Template pools for the mandatory rooms and the filler rooms, gathered
/// once per run from the enabled room groups.
#[derive(Debug, Clone, Default)]
pub struct RoomSources {
    entrances: [Vec<TemplateId>; 7],
    bosses: [Vec<TemplateId>; 7],
    thunderbirds: Vec<TemplateId>,
    items: [Vec<TemplateId>; 4],
    normal: Vec<TemplateId>,
    great: Vec<TemplateId>,
}

impl RoomSources {
    pub fn collect(pool: &impl RoomPool, options: &PalaceOptions) -> Self {
        let custom = options.use_custom_rooms;
        let mut sources = Self::default();

        for group in options.room_groups() {
            let entrances = pool.entrances(group, custom);
            let bosses = pool.boss_rooms(group, custom);
            for number in 1..=GREAT_PALACE {
                let slot = usize::from(number - 1);
                sources.entrances[slot].extend(
                    entrances
                        .iter()
                        .copied()
                        .filter(|id| pool.template(*id).fits_palace(number)),
                );
                // unrestricted boss rooms only serve palaces 1-5
                sources.bosses[slot].extend(bosses.iter().copied().filter(|id| {
                    match pool.template(*id).palace_number {
                        None => number < 6,
                        Some(n) => n == number,
                    }
                }));
            }
            sources.thunderbirds.extend(pool.thunderbird_rooms(group, custom));
            for dir in Direction::ITEM_ROOM_ORIENTATIONS {
                sources.items[dir.index()].extend(pool.item_rooms(group, dir, custom));
            }
            sources.normal.extend(pool.normal_rooms(group, custom));
            sources.great.extend(pool.great_palace_rooms(group, custom));
        }

        for number in 1..=GREAT_PALACE {
            let slot = usize::from(number - 1);
            if sources.entrances[slot].is_empty() {
                debug!(palace = number, "no entrances in enabled groups, using vanilla");
                sources.entrances[slot] = pool
                    .entrances(RoomGroup::Vanilla, custom)
                    .into_iter()
                    .filter(|id| pool.template(*id).palace_number == Some(number))
                    .collect();
            }
            if sources.bosses[slot].is_empty() {
                sources.bosses[slot].extend(pool.vanilla_boss_room(number));
            }
        }
        if sources.thunderbirds.is_empty() {
            sources
                .thunderbirds
                .extend(pool.thunderbird_rooms(RoomGroup::Vanilla, custom).first());
        }
        sources
    }

    pub fn entrances(&self, palace_number: u8) -> &[TemplateId] {
        &self.entrances[usize::from(palace_number - 1)]
    }

    pub fn bosses(&self, palace_number: u8) -> &[TemplateId] {
        &self.bosses[usize::from(palace_number - 1)]
    }

    pub fn thunderbirds(&self) -> &[TemplateId] {
        &self.thunderbirds
    }

    pub fn item_rooms(&self, orientation: Direction) -> &[TemplateId] {
        &self.items[orientation.index()]
    }

    /// Filler templates usable in the given palace
    pub fn filler(&self, pool: &impl RoomPool, palace_number: u8) -> Vec<TemplateId> {
        let source = if palace_number == GREAT_PALACE {
            &self.great
        } else {
            &self.normal
        };
        source
            .iter()
            .copied()
            .filter(|id| pool.template(*id).fits_palace(palace_number))
            .collect()
    }
}

/// Copy a template into a palace-ready instance
pub(crate) fn instantiate(
    pool: &impl RoomPool,
    id: TemplateId,
    palace_group: u8,
    map_no: usize,
) -> RoomInstance {
    let mut room = RoomInstance::from_template(id, pool.template(id));
    room.palace_group = palace_group;
    room.map_no = map_no;
    room
}

fn draw(
    rng: &mut GenRng,
    candidates: &[TemplateId],
    pool_name: &'static str,
    palace: u8,
) -> Result<TemplateId, GenerationError> {
    rng.choose(candidates)
        .copied()
        .ok_or(GenerationError::EmptyPool {
            pool: pool_name,
            palace,
        })
}

/// Look up a linked partner's template
pub(crate) fn partner_of(
    pool: &impl RoomPool,
    id: TemplateId,
) -> Result<Option<TemplateId>, GenerationError> {
    match &pool.template(id).linked_room {
        Some(name) => pool
            .lookup_by_name(name)
            .map(Some)
            .ok_or_else(|| GenerationError::UnknownRoom(name.clone())),
        None => Ok(None),
    }
}

/// Enemies the boss room carries: always those of the palace's vanilla boss.
pub(crate) fn boss_enemies(pool: &impl RoomPool, palace_number: u8) -> Option<Vec<u8>> {
    pool.vanilla_boss_room(palace_number)
        .map(|id| pool.template(id).enemies.clone())
}

/// Create a palace holding only its mandatory rooms: entrance, boss room,
/// then either the item room (and its linked half) or the thunderbird room.
pub fn build_skeleton(
    pool: &impl RoomPool,
    sources: &RoomSources,
    options: &PalaceOptions,
    palace_number: u8,
    max_rooms: usize,
    map: &mut MapCounters,
    rng: &mut GenRng,
) -> Result<Palace, GenerationError> {
    let mut palace = Palace::new(palace_number, max_rooms)?;
    let group = palace.group;

    let entrance = draw(rng, sources.entrances(palace_number), "entrance", palace_number)?;
    let boss = draw(rng, sources.bosses(palace_number), "boss", palace_number)?;

    let root = instantiate(pool, entrance, group, map.current(palace_number));
    palace.push_room(root, RoomRole::ROOT);
    map.advance(palace_number);

    let mut boss_room = instantiate(pool, boss, group, map.current(palace_number));
    boss_room.enemy_override = boss_enemies(pool, palace_number);
    boss_room.connects_outside = options.boss_room_connect;
    palace.push_room(boss_room, RoomRole::BOSS);
    map.advance(palace_number);

    if palace_number == GREAT_PALACE {
        if !options.remove_thunderbird {
            let bird = draw(rng, sources.thunderbirds(), "thunderbird", palace_number)?;
            let bird = instantiate(pool, bird, THUNDERBIRD_GROUP, map.current(palace_number));
            palace.push_room(bird, RoomRole::THUNDERBIRD);
            map.advance(palace_number);
        }
        return Ok(palace);
    }

    let item_template = draw_item_room(sources, palace_number, rng)?;
    let item = Item::for_palace(palace_number);
    let map_no = map.current(palace_number);
    let mut item_room = instantiate(pool, item_template, group, map_no);
    item_room.item = item;
    let item_id = palace.push_room(item_room, RoomRole::ITEM);
    map.advance(palace_number);

    if let Some(partner) = partner_of(pool, item_template)? {
        let mut half = instantiate(pool, partner, group, map_no);
        half.item = item;
        let half_id: RoomId = palace.push_room(half, RoomRole::ITEM);
        palace.link(item_id, half_id);
    }
    Ok(palace)
}

/// Pick an orientation uniformly, redrawing while its bucket is empty.
fn draw_item_room(
    sources: &RoomSources,
    palace_number: u8,
    rng: &mut GenRng,
) -> Result<TemplateId, GenerationError> {
    if Direction::ITEM_ROOM_ORIENTATIONS
        .iter()
        .all(|dir| sources.item_rooms(*dir).is_empty())
    {
        return Err(GenerationError::EmptyPool {
            pool: "item",
            palace: palace_number,
        });
    }
    loop {
        let orientation = Direction::ITEM_ROOM_ORIENTATIONS
            [rng.rn2(Direction::ITEM_ROOM_ORIENTATIONS.len())];
        if let Some(id) = rng.choose(sources.item_rooms(orientation)) {
            return Ok(*id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RoomCatalog;
    use crate::room::{Exits, RoomKind, RoomTemplate};

    fn template(name: &str, kind: RoomKind, exits: Exits, palace: Option<u8>) -> RoomTemplate {
        let mut t = RoomTemplate::new(name, kind, exits);
        t.palace_number = palace;
        t
    }

    fn catalog() -> RoomCatalog {
        let mut boss1 = template("boss 1", RoomKind::Boss, Exits::LEFT, Some(1));
        boss1.enemies = vec![7, 7];
        let mut generic_boss = template("generic boss", RoomKind::Boss, Exits::LEFT, None);
        generic_boss.group = RoomGroup::V4_0;
        generic_boss.enemies = vec![1];
        let mut item = template("item", RoomKind::Item, Exits::LEFT, Some(1));
        item.orientation = Some(Direction::Up);
        item.linked_room = Some("item half".to_string());
        RoomCatalog::new(vec![
            template("entrance 1", RoomKind::Entrance, Exits::RIGHT, Some(1)),
            template("entrance 7", RoomKind::Entrance, Exits::RIGHT, Some(7)),
            boss1,
            generic_boss,
            template("boss 7", RoomKind::Boss, Exits::LEFT, Some(7)),
            template("bird", RoomKind::Thunderbird, Exits::LEFT | Exits::RIGHT, None),
            item,
            // never drawn as filler
            template("item half", RoomKind::Normal, Exits::RIGHT, Some(99)),
        ])
        .unwrap()
    }

    #[test]
    fn test_map_counter_tracks() {
        let finished: Vec<Palace> = (1..=4)
            .map(|n| {
                let mut palace = Palace::new(n, 20).unwrap();
                for _ in 0..n {
                    palace.push_room(
                        RoomInstance::from_template(
                            TemplateId(0),
                            &RoomTemplate::new("x", RoomKind::Normal, Exits::LEFT),
                        ),
                        RoomRole::empty(),
                    );
                }
                palace
            })
            .collect();
        assert_eq!(MapCounters::starting_at(1, &finished).normal, 0);
        assert_eq!(MapCounters::starting_at(2, &finished).normal, 1);
        assert_eq!(MapCounters::starting_at(4, &finished).normal, 3);
        assert_eq!(MapCounters::starting_at(5, &finished).normal, 3);
        assert_eq!(MapCounters::starting_at(6, &finished).normal, 7);

        let mut map = MapCounters::default();
        map.advance(7);
        map.advance(3);
        assert_eq!(map, MapCounters { normal: 1, great: 1 });
        assert_eq!(map.current(7), 1);
    }

    #[test]
    fn test_sources_fall_back_to_vanilla() {
        let pool = catalog();
        let options = PalaceOptions {
            allow_vanilla_rooms: false,
            allow_v4_rooms: true,
            ..Default::default()
        };
        let sources = RoomSources::collect(&pool, &options);
        // v4.0 has no entrances, so vanilla entrances for the palace are used
        assert_eq!(sources.entrances(1), &[TemplateId(0)]);
        assert_eq!(sources.entrances(7), &[TemplateId(1)]);
        // the unrestricted v4.0 boss serves palaces 1-5 only
        assert_eq!(sources.bosses(1), &[TemplateId(3)]);
        assert_eq!(sources.bosses(6), &[] as &[TemplateId]);
        assert_eq!(sources.bosses(7), &[TemplateId(4)]);
        assert_eq!(sources.thunderbirds(), &[TemplateId(5)]);
    }

    #[test]
    fn test_skeleton_for_normal_palace() {
        let pool = catalog();
        let options = PalaceOptions {
            boss_room_connect: true,
            ..Default::default()
        };
        let sources = RoomSources::collect(&pool, &options);
        let mut map = MapCounters { normal: 10, great: 0 };
        let mut rng = GenRng::new(5);
        let palace = build_skeleton(&pool, &sources, &options, 1, 12, &mut map, &mut rng).unwrap();

        assert_eq!(palace.len(), 4);
        let root = palace.room(palace.root().unwrap());
        let boss = palace.room(palace.boss_room().unwrap());
        let item = palace.item_room().unwrap();
        let half = palace.linked(item).unwrap();
        assert_eq!(root.map_no, 10);
        assert_eq!(boss.map_no, 11);
        assert_eq!(boss.enemy_bytes(), &[7, 7]);
        assert!(boss.connects_outside);
        assert_eq!(palace.room(item).item, Some(Item::Candle));
        assert_eq!(palace.room(half).item, Some(Item::Candle));
        assert_eq!(palace.room(half).map_no, palace.room(item).map_no);
        assert_eq!(map.normal, 13);
        assert!(palace.rooms().iter().all(|r| r.palace_group == 1));
    }

    #[test]
    fn test_skeleton_for_great_palace() {
        let pool = catalog();
        let options = PalaceOptions::default();
        let sources = RoomSources::collect(&pool, &options);
        let mut map = MapCounters::default();
        let mut rng = GenRng::new(9);
        let palace = build_skeleton(&pool, &sources, &options, 7, 50, &mut map, &mut rng).unwrap();
        let bird = palace.room(palace.thunderbird().unwrap());
        assert_eq!(bird.palace_group, 3);
        assert_eq!(bird.map_no, 2);
        assert_eq!(palace.item_room(), None);
        assert_eq!(map, MapCounters { normal: 0, great: 3 });

        let removed = PalaceOptions {
            remove_thunderbird: true,
            ..Default::default()
        };
        let palace = build_skeleton(&pool, &sources, &removed, 7, 50, &mut map, &mut rng).unwrap();
        assert_eq!(palace.thunderbird(), None);
        assert_eq!(palace.len(), 2);
    }

    #[test]
    fn test_missing_pools_are_errors() {
        let pool = catalog();
        let options = PalaceOptions::default();
        let sources = RoomSources::collect(&pool, &options);
        let mut rng = GenRng::new(1);
        let err = build_skeleton(&pool, &sources, &options, 3, 12, &mut MapCounters::default(), &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            GenerationError::EmptyPool {
                pool: "entrance",
                palace: 3
            }
        );

        let empty = RoomSources::default();
        assert!(draw_item_room(&empty, 1, &mut rng).is_err());
    }
}
