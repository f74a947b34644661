//! Palace generation
//!
//! Builds all seven palaces for one world:
//! 1. Roll a target size for every palace.
//! 2. Build each palace: reconstructed palaces grow from a skeleton under a
//!    bounded retry controller, vanilla and shuffled palaces are wired from
//!    the pool's vanilla layout.
//! 3. Validate the set as a whole, rerolling everything on rejection.

mod placement;
mod retry;
mod skeleton;
mod vanilla;

pub use placement::{
    CandidatePool, DROP_PLACEMENT_FAILURE_LIMIT, MAX_DROP_CHAIN, Placer,
    ROOM_PLACEMENT_FAILURE_LIMIT, RoundOutcome,
};
pub use retry::{REGENERATION_LIMIT, ROUND_LIMIT, SHUFFLE_ATTEMPT_LIMIT};
pub use skeleton::{MapCounters, RoomSources, build_skeleton};

use tracing::{info, warn};

use crate::cancel::CancelSignal;
use crate::catalog::RoomPool;
use crate::clearance::{ClearanceOracle, RequirementClearance};
use crate::error::GenerationError;
use crate::options::{PalaceOptions, PalaceStyle};
use crate::palace::{GREAT_PALACE, Palace};
use crate::rng::GenRng;
use crate::validation::validate_palaces;

/// Whole-set attempts before giving up on a world
pub const WORLD_ATTEMPT_LIMIT: u32 = 100;

/// Roll target room counts for palaces 1-7.
///
/// Palaces 5 and 6 take what their bank leaves after 1, 2 and 3, 4.
pub fn roll_sizes(rng: &mut GenRng, great_palace_style: PalaceStyle) -> [usize; 7] {
    let mut sizes = [0; 7];
    sizes[0] = rng.range(10, 17);
    sizes[1] = rng.range(16, 25);
    sizes[2] = rng.range(11, 18);
    sizes[3] = rng.range(16, 25);
    sizes[4] = rng.range(23, 63 - sizes[0] - sizes[1]);
    sizes[5] = rng.range(22, 63 - sizes[2] - sizes[3]);
    sizes[6] = if great_palace_style == PalaceStyle::ReconstructedShortened {
        rng.range(27, 41)
    } else {
        rng.range(54, 60)
    };
    sizes
}

/// Generate all seven palaces, checking them with [`RequirementClearance`].
///
/// Returns `Ok(None)` when cancelled or when every attempt was exhausted;
/// callers never see a partially built set.
pub fn generate_palaces<P: RoomPool>(
    cancel: &CancelSignal,
    rng: &mut GenRng,
    pool: &P,
    options: &PalaceOptions,
    raft_required: bool,
) -> Result<Option<Vec<Palace>>, GenerationError> {
    generate_palaces_with(cancel, rng, pool, options, raft_required, &RequirementClearance)
}

/// [`generate_palaces`] with a caller-supplied reachability oracle
pub fn generate_palaces_with<P: RoomPool, O: ClearanceOracle>(
    cancel: &CancelSignal,
    rng: &mut GenRng,
    pool: &P,
    options: &PalaceOptions,
    raft_required: bool,
    oracle: &O,
) -> Result<Option<Vec<Palace>>, GenerationError> {
    let generator = Generator::new(pool, options);

    for attempt in 1..=WORLD_ATTEMPT_LIMIT {
        if cancel.is_cancelled() {
            info!("palace generation cancelled");
            return Ok(None);
        }
        let sizes = roll_sizes(rng, options.great_palace_style);
        let mut palaces: Vec<Palace> = Vec::with_capacity(7);
        for number in 1..=GREAT_PALACE {
            let start = MapCounters::starting_at(number, &palaces);
            let size = sizes[usize::from(number - 1)];
            let Some(palace) = generator.build(number, size, start, cancel, rng)? else {
                return Ok(None);
            };
            palaces.push(palace);
        }

        match validate_palaces(options, raft_required, &palaces, oracle) {
            Ok(()) => {
                info!(attempt, seed = rng.seed(), "palace set accepted");
                return Ok(Some(palaces));
            }
            Err(reason) => info!(attempt, %reason, "palace set rejected"),
        }
    }
    warn!(limit = WORLD_ATTEMPT_LIMIT, "no valid palace set found");
    Ok(None)
}

/// Per-run state shared by every palace build
struct Generator<'a, P: RoomPool> {
    pool: &'a P,
    options: &'a PalaceOptions,
    sources: RoomSources,
    placer: Placer<'a, P>,
}

impl<'a, P: RoomPool> Generator<'a, P> {
    fn new(pool: &'a P, options: &'a PalaceOptions) -> Self {
        Self {
            pool,
            options,
            sources: RoomSources::collect(pool, options),
            placer: Placer::new(pool, options),
        }
    }

    /// The thunderbird must sit on every path to the boss
    fn requires_thunderbird(&self, palace_number: u8) -> bool {
        palace_number == GREAT_PALACE
            && self.options.require_thunderbird
            && !self.options.remove_thunderbird
    }

    fn build(
        &self,
        palace_number: u8,
        size: usize,
        start: MapCounters,
        cancel: &CancelSignal,
        rng: &mut GenRng,
    ) -> Result<Option<Palace>, GenerationError> {
        let style = self.options.style_for(palace_number);
        if style.is_reconstructed() {
            self.reconstruct(palace_number, size, start, cancel, rng)
        } else {
            self.vanilla(palace_number, style, start, rng)
        }
    }
}
