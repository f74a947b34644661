//! Vanilla and shuffled palaces
//!
//! Both start from the unmodified room list wired by name. Shuffled palaces
//! then rewire it at random until the result is sound again.

use tracing::{info, warn};

use crate::catalog::RoomPool;
use crate::error::GenerationError;
use crate::options::PalaceStyle;
use crate::palace::{GREAT_PALACE, Palace};
use crate::requirement::Item;
use crate::rng::GenRng;
use crate::room::{RoomGroup, RoomRole, TemplateId};

use super::retry::{SHUFFLE_ATTEMPT_LIMIT, shuffle_until_sound};
use super::skeleton::{MapCounters, THUNDERBIRD_GROUP, boss_enemies, instantiate, partner_of};
use super::Generator;

impl<P: RoomPool> Generator<'_, P> {
    pub(super) fn vanilla(
        &self,
        palace_number: u8,
        style: PalaceStyle,
        start: MapCounters,
        rng: &mut GenRng,
    ) -> Result<Option<Palace>, GenerationError> {
        let mut palace = self.vanilla_layout(palace_number, start)?;
        let require_thunderbird = self.requires_thunderbird(palace_number);

        if style != PalaceStyle::Shuffled {
            return if palace.is_structurally_sound(require_thunderbird) {
                Ok(Some(palace))
            } else {
                Err(GenerationError::VanillaUnreachable(palace_number))
            };
        }

        if let Some(shuffles) = shuffle_until_sound(&mut palace, require_thunderbird, rng) {
            palace.generations = shuffles;
            info!(palace = palace_number, shuffles, "shuffled palace accepted");
            return Ok(Some(palace));
        }
        warn!(
            palace = palace_number,
            limit = SHUFFLE_ATTEMPT_LIMIT,
            "no sound shuffle of the vanilla palace"
        );
        Ok(None)
    }

    /// The unmodified palace, wired by its template links
    fn vanilla_layout(&self, palace_number: u8, start: MapCounters) -> Result<Palace, GenerationError> {
        let pool = self.pool;
        let custom = self.options.use_custom_rooms;
        let missing = |what: &'static str| GenerationError::EmptyPool {
            pool: what,
            palace: palace_number,
        };

        let mut palace = Palace::new(palace_number, 0)?;
        let group = palace.group;
        let mut map = start;

        let entrance = *self
            .sources
            .entrances(palace_number)
            .first()
            .ok_or_else(|| missing("entrance"))?;
        let root = instantiate(pool, entrance, group, map.current(palace_number));
        palace.push_room(root, RoomRole::ROOT);
        map.advance(palace_number);

        if palace_number != GREAT_PALACE {
            let item = pool
                .vanilla_item_room(palace_number)
                .ok_or_else(|| missing("vanilla item"))?;
            let mut item_room = instantiate(pool, item, group, map.current(palace_number));
            item_room.item = Item::for_palace(palace_number);
            palace.push_room(item_room, RoomRole::ITEM);
            map.advance(palace_number);
        }

        let boss = pool
            .vanilla_boss_room(palace_number)
            .ok_or_else(|| missing("vanilla boss"))?;
        let mut boss_room = instantiate(pool, boss, group, map.current(palace_number));
        boss_room.enemy_override = boss_enemies(pool, palace_number);
        boss_room.connects_outside = self.options.boss_room_connect;
        palace.push_room(boss_room, RoomRole::BOSS);
        map.advance(palace_number);

        let mut bypass = None;
        if palace_number == GREAT_PALACE {
            let bird = *pool
                .thunderbird_rooms(RoomGroup::Vanilla, custom)
                .first()
                .ok_or_else(|| missing("thunderbird"))?;
            if self.options.remove_thunderbird {
                bypass = Some(pool.template(bird).name.as_str());
            } else {
                let bird_room = instantiate(pool, bird, THUNDERBIRD_GROUP, map.current(palace_number));
                palace.push_room(bird_room, RoomRole::THUNDERBIRD);
                map.advance(palace_number);
            }
        }

        let filler: Vec<TemplateId> = pool.vanilla_palace_rooms(palace_number, custom);
        for &id in &filler {
            let map_no = map.current(palace_number);
            let placed = palace.push_room(instantiate(pool, id, group, map_no), RoomRole::empty());
            if let Some(partner) = partner_of(pool, id)?
                && !filler.contains(&partner)
            {
                let half = palace.push_room(instantiate(pool, partner, group, map_no), RoomRole::empty());
                palace.link(placed, half);
            }
            map.advance(palace_number);
        }

        palace.max_rooms = palace.len();
        palace.create_tree(pool, bypass)?;
        Ok(palace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::test_pool;
    use crate::options::PalaceOptions;
    use crate::room::Direction;

    #[test]
    fn test_vanilla_layout_follows_links() {
        let pool = test_pool::catalog();
        let options = PalaceOptions::default();
        let generator = Generator::new(&pool, &options);
        let palace = generator
            .vanilla(2, PalaceStyle::Vanilla, MapCounters { normal: 5, great: 0 }, &mut GenRng::new(0))
            .unwrap()
            .unwrap();
        assert_eq!(palace.len(), 4);
        assert_eq!(palace.max_rooms, 4);
        let root = palace.root().unwrap();
        let hub = palace.room(root).connection(Direction::Right).unwrap();
        assert_eq!(palace.room(hub).name, "hub 2");
        assert_eq!(palace.room(hub).connection(Direction::Right), palace.boss_room());
        assert_eq!(palace.room(hub).connection(Direction::Up), palace.item_room());
        assert_eq!(palace.room(palace.item_room().unwrap()).item, Some(Item::Glove));
        let slots: Vec<usize> = palace.rooms().iter().map(|r| r.map_no).collect();
        assert_eq!(slots, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_great_palace_bypasses_removed_bird() {
        let pool = test_pool::catalog();
        let options = PalaceOptions {
            remove_thunderbird: true,
            ..Default::default()
        };
        let generator = Generator::new(&pool, &options);
        let palace = generator
            .vanilla(7, PalaceStyle::Vanilla, MapCounters::default(), &mut GenRng::new(0))
            .unwrap()
            .unwrap();
        assert_eq!(palace.thunderbird(), None);
        let boss = palace.boss_room().unwrap();
        let hub = palace.room(boss).connection(Direction::Left).unwrap();
        assert_eq!(palace.room(hub).name, "hub 7");

        let kept = PalaceOptions::default();
        let generator = Generator::new(&pool, &kept);
        let palace = generator
            .vanilla(7, PalaceStyle::Vanilla, MapCounters::default(), &mut GenRng::new(0))
            .unwrap()
            .unwrap();
        assert!(palace.requires_thunderbird());
        assert_eq!(palace.room(palace.thunderbird().unwrap()).palace_group, 3);
    }

    #[test]
    fn test_shuffled_palace_is_sound() {
        let pool = test_pool::catalog();
        let options = PalaceOptions::default();
        let generator = Generator::new(&pool, &options);
        let mut rng = GenRng::new(8);
        for number in 1..=6 {
            if let Some(palace) = generator
                .vanilla(number, PalaceStyle::Shuffled, MapCounters::default(), &mut rng)
                .unwrap()
            {
                assert!(palace.is_structurally_sound(false));
                assert!(palace.generations >= 1);
            }
        }
    }
}
