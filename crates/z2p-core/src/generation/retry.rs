//! Bounded retry around reconstructed palace generation
//!
//! A palace is regenerated from scratch until one survives both placement
//! and shuffling. Each level has its own cap:
//! - regeneration attempts ([`REGENERATION_LIMIT`])
//! - placement rounds per attempt ([`ROUND_LIMIT`])
//! - shuffles per finished graph ([`SHUFFLE_ATTEMPT_LIMIT`])

use tracing::{debug, info, trace, warn};

use crate::cancel::CancelSignal;
use crate::catalog::RoomPool;
use crate::error::GenerationError;
use crate::palace::Palace;
use crate::rng::GenRng;
use crate::room::TemplateId;

use super::placement::{CandidatePool, RoundOutcome};
use super::skeleton::{MapCounters, build_skeleton};
use super::Generator;

/// Regeneration attempts for one palace
pub const REGENERATION_LIMIT: u32 = 100;
/// Shuffles tried on one placed graph before it is thrown away
pub const SHUFFLE_ATTEMPT_LIMIT: u32 = 100;
/// Placement rounds tried within one regeneration attempt
pub const ROUND_LIMIT: u32 = 100;

impl<P: RoomPool> Generator<'_, P> {
    /// Build a reconstructed palace of exactly `max_rooms` rooms.
    ///
    /// `Ok(None)` means cancelled or out of attempts.
    pub(super) fn reconstruct(
        &self,
        palace_number: u8,
        max_rooms: usize,
        start: MapCounters,
        cancel: &CancelSignal,
        rng: &mut GenRng,
    ) -> Result<Option<Palace>, GenerationError> {
        let filler = self.sources.filler(self.pool, palace_number);
        if filler.is_empty() {
            return Err(GenerationError::EmptyPool {
                pool: "palace room",
                palace: palace_number,
            });
        }
        let require_thunderbird = self.requires_thunderbird(palace_number);

        let mut total_shuffles = 0;
        for attempt in 1..=REGENERATION_LIMIT {
            if cancel.is_cancelled() {
                debug!(palace = palace_number, attempt, "generation cancelled");
                return Ok(None);
            }
            let Some(mut palace) = self.place_rounds(palace_number, max_rooms, start, &filler, rng)?
            else {
                debug!(palace = palace_number, attempt, "placement rounds exhausted");
                continue;
            };

            match shuffle_until_sound(&mut palace, require_thunderbird, rng) {
                Some(shuffles) => {
                    total_shuffles += shuffles;
                    palace.generations = total_shuffles;
                    info!(
                        palace = palace_number,
                        rooms = palace.len(),
                        attempts = attempt,
                        shuffles = total_shuffles,
                        "palace accepted"
                    );
                    return Ok(Some(palace));
                }
                None => total_shuffles += SHUFFLE_ATTEMPT_LIMIT,
            }
        }
        warn!(
            palace = palace_number,
            limit = REGENERATION_LIMIT,
            "palace regeneration limit exhausted"
        );
        Ok(None)
    }

    /// Run placement rounds until one fills the palace with nothing left
    /// open, starting each round from a fresh skeleton.
    fn place_rounds(
        &self,
        palace_number: u8,
        max_rooms: usize,
        start: MapCounters,
        filler: &[TemplateId],
        rng: &mut GenRng,
    ) -> Result<Option<Palace>, GenerationError> {
        for round in 1..=ROUND_LIMIT {
            let mut map = start;
            let mut palace = build_skeleton(
                self.pool,
                &self.sources,
                self.options,
                palace_number,
                max_rooms,
                &mut map,
                rng,
            )?;
            let mut candidates = CandidatePool::new(self.pool, filler.iter().copied());
            let outcome = self.placer.fill(&mut palace, &mut candidates, &mut map, rng)?;
            if outcome == RoundOutcome::Filled && !palace.has_open_exits() {
                return Ok(Some(palace));
            }
            trace!(
                palace = palace_number,
                round,
                ?outcome,
                open_rooms = palace.open_room_count(),
                "placement round failed"
            );
        }
        Ok(None)
    }
}

/// Reshuffle `palace` until it passes the structural checks. Returns the
/// number of shuffles it took, or `None` once [`SHUFFLE_ATTEMPT_LIMIT`] is hit.
pub(super) fn shuffle_until_sound(
    palace: &mut Palace,
    require_thunderbird: bool,
    rng: &mut GenRng,
) -> Option<u32> {
    for shuffles in 1..=SHUFFLE_ATTEMPT_LIMIT {
        palace.shuffle_rooms(rng);
        debug!(palace = palace.number, shuffles, "shuffled palace rooms");
        if palace.is_structurally_sound(require_thunderbird) {
            return Some(shuffles);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::test_pool;
    use crate::options::PalaceOptions;
    use crate::room::{Exits, RoomInstance, RoomKind, RoomRole, RoomTemplate};

    #[test]
    fn test_reconstructs_exact_size() {
        let pool = test_pool::catalog();
        let options = PalaceOptions::default();
        let generator = Generator::new(&pool, &options);
        let mut rng = GenRng::new(17);
        for (number, size) in [(1, 14), (5, 30), (7, 55)] {
            let palace = generator
                .reconstruct(number, size, MapCounters::default(), &CancelSignal::new(), &mut rng)
                .unwrap()
                .unwrap();
            assert_eq!(palace.len(), size);
            assert!(palace.generations >= 1);
            assert!(palace.is_structurally_sound(number == 7));
        }
    }

    #[test]
    fn test_shuffle_count_is_reported() {
        let mut palace = Palace::new(1, 2).unwrap();
        let entrance = RoomTemplate::new("entrance", RoomKind::Entrance, Exits::RIGHT);
        let boss = RoomTemplate::new("boss", RoomKind::Boss, Exits::LEFT);
        palace.push_room(RoomInstance::from_template(TemplateId(0), &entrance), RoomRole::ROOT);
        palace.push_room(RoomInstance::from_template(TemplateId(1), &boss), RoomRole::BOSS);
        let mut rng = GenRng::new(3);
        assert_eq!(shuffle_until_sound(&mut palace, false, &mut rng), Some(1));
        // no thunderbird to require
        assert_eq!(shuffle_until_sound(&mut palace, true, &mut rng), None);
    }

    #[test]
    fn test_generations_count_shuffles() {
        let pool = test_pool::catalog();
        let options = PalaceOptions::default();
        let generator = Generator::new(&pool, &options);
        let palace = generator
            .reconstruct(3, 15, MapCounters::default(), &CancelSignal::new(), &mut GenRng::new(5))
            .unwrap()
            .unwrap();
        assert!((1..=REGENERATION_LIMIT * SHUFFLE_ATTEMPT_LIMIT).contains(&palace.generations));
    }

    #[test]
    fn test_cancelled_returns_nothing() {
        let pool = test_pool::catalog();
        let options = PalaceOptions::default();
        let generator = Generator::new(&pool, &options);
        let cancel = CancelSignal::new();
        cancel.cancel();
        let result = generator.reconstruct(1, 12, MapCounters::default(), &cancel, &mut GenRng::new(1));
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_empty_filler_is_fatal() {
        let pool = test_pool::catalog();
        let options = PalaceOptions {
            allow_vanilla_rooms: false,
            allow_v4_rooms: true,
            ..Default::default()
        };
        let generator = Generator::new(&pool, &options);
        let result = generator.reconstruct(2, 20, MapCounters::default(), &CancelSignal::new(), &mut GenRng::new(1));
        assert_eq!(
            result,
            Err(GenerationError::EmptyPool {
                pool: "palace room",
                palace: 2
            })
        );
    }
}
