//! Cross-palace validation
//!
//! Rejects a finished set of seven palaces that would leave the game
//! unwinnable. Runs only after every palace passed its structural checks.

use thiserror::Error;

use crate::clearance::ClearanceOracle;
use crate::options::PalaceOptions;
use crate::palace::Palace;
use crate::requirement::{Item, Requirements};

/// Enemy data budget shared by palaces 1-6
pub const NORMAL_ENEMY_BUDGET: usize = 0x400;
/// Enemy data budget of the great palace
pub const GREAT_PALACE_ENEMY_BUDGET: usize = 0x2A9;

/// Why a palace set was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("expected 7 palaces, got {0}")]
    WrongPalaceCount(usize),

    #[error("enemy data for {which} is {bytes:#x} bytes, budget is {budget:#x}")]
    EnemyBudget {
        which: &'static str,
        bytes: usize,
        budget: usize,
    },

    #[error("palace 2 cannot be cleared without the glove")]
    GloveUnreachable,

    #[error("palace 3 cannot be cleared without the raft")]
    RaftUnreachable,

    #[error("no palace can be cleared without the glove")]
    NoPalaceForGlove,
}

/// Check a palace set against global solvability constraints.
///
/// The checks run in a fixed order; the first violation is returned.
pub fn validate_palaces(
    options: &PalaceOptions,
    raft_required: bool,
    palaces: &[Palace],
    oracle: &impl ClearanceOracle,
) -> Result<(), ValidationFailure> {
    if palaces.len() != 7 {
        return Err(ValidationFailure::WrongPalaceCount(palaces.len()));
    }
    check_enemy_budget(palaces)?;
    check_glove(options, &palaces[1], oracle)?;
    check_raft(options, raft_required, &palaces[1], &palaces[2], oracle)?;
    check_glove_placement(palaces, oracle)
}

fn check_enemy_budget(palaces: &[Palace]) -> Result<(), ValidationFailure> {
    let (great, normal): (Vec<&Palace>, Vec<&Palace>) =
        palaces.iter().partition(|p| p.is_great_palace());
    let normal_bytes: usize = normal.iter().map(|p| p.enemy_bytes()).sum();
    let great_bytes: usize = great.iter().map(|p| p.enemy_bytes()).sum();
    if normal_bytes > NORMAL_ENEMY_BUDGET {
        return Err(ValidationFailure::EnemyBudget {
            which: "palaces 1-6",
            bytes: normal_bytes,
            budget: NORMAL_ENEMY_BUDGET,
        });
    }
    if great_bytes > GREAT_PALACE_ENEMY_BUDGET {
        return Err(ValidationFailure::EnemyBudget {
            which: "the great palace",
            bytes: great_bytes,
            budget: GREAT_PALACE_ENEMY_BUDGET,
        });
    }
    Ok(())
}

/// With vanilla palace items, palace 2 must be clearable with what is
/// available before the glove.
fn check_glove(
    options: &PalaceOptions,
    palace2: &Palace,
    oracle: &impl ClearanceOracle,
) -> Result<(), ValidationFailure> {
    if options.shuffle_palace_items {
        return Ok(());
    }
    // Without overworld shuffle the key may sit behind the glove itself
    let mut held = Requirements::early_stab(options.swap_up_and_down_stab)
        | Requirements::JUMP
        | Requirements::FAIRY;
    if options.shuffle_overworld_items {
        held |= Requirements::KEY;
    }
    if oracle.can_clear_all_rooms(palace2, held, Item::Glove) {
        Ok(())
    } else {
        Err(ValidationFailure::GloveUnreachable)
    }
}

/// With vanilla palace items and a required raft, palace 3 must be
/// clearable with what the west side offers. Palace 2 is tested first: if it
/// can be cleared, its glove joins the held set.
fn check_raft(
    options: &PalaceOptions,
    raft_required: bool,
    palace2: &Palace,
    palace3: &Palace,
    oracle: &impl ClearanceOracle,
) -> Result<(), ValidationFailure> {
    if options.shuffle_palace_items || !raft_required {
        return Ok(());
    }
    let mut held = Requirements::JUMP
        | Requirements::FAIRY
        | Requirements::early_stab(options.swap_up_and_down_stab);
    if options.shuffle_overworld_items {
        held |= Requirements::KEY | Requirements::GLOVE;
    }
    if oracle.can_clear_all_rooms(palace2, held, Item::Glove) {
        held |= Requirements::GLOVE;
    }
    if oracle.can_clear_all_rooms(palace3, held, Item::Raft) {
        Ok(())
    } else {
        Err(ValidationFailure::RaftUnreachable)
    }
}

/// Some palace among the first six must be clearable without the glove, or
/// the glove has nowhere safe to go.
fn check_glove_placement(
    palaces: &[Palace],
    oracle: &impl ClearanceOracle,
) -> Result<(), ValidationFailure> {
    let held = Requirements::KEY
        | Requirements::UPSTAB
        | Requirements::DOWNSTAB
        | Requirements::JUMP
        | Requirements::FAIRY;
    if palaces
        .iter()
        .take(6)
        .any(|p| oracle.can_clear_all_rooms(p, held, Item::Glove))
    {
        Ok(())
    } else {
        Err(ValidationFailure::NoPalaceForGlove)
    }
}
