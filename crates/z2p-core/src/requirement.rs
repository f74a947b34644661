//! Abilities, blockers and palace items
//!
//! Abilities are pure predicate input: generation never grants or removes
//! them, it only asks whether a palace could be cleared holding a given set.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

bitflags! {
    /// Set of held (or required) abilities
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Requirements: u8 {
        const KEY = 0x01;
        const JUMP = 0x02;
        const GLOVE = 0x04;
        const FAIRY = 0x08;
        const UPSTAB = 0x10;
        const DOWNSTAB = 0x20;
    }
}

impl Requirements {
    /// Blockers a room may use in each palace when blockers are not allowed anywhere.
    pub const ALLOWED_BLOCKERS_BY_PALACE: [Requirements; 7] = [
        Requirements::KEY,
        Requirements::KEY.union(Requirements::JUMP).union(Requirements::GLOVE),
        Requirements::KEY
            .union(Requirements::DOWNSTAB)
            .union(Requirements::UPSTAB)
            .union(Requirements::GLOVE),
        Requirements::KEY.union(Requirements::FAIRY).union(Requirements::JUMP),
        Requirements::KEY.union(Requirements::FAIRY).union(Requirements::JUMP),
        Requirements::KEY
            .union(Requirements::FAIRY)
            .union(Requirements::JUMP)
            .union(Requirements::GLOVE),
        Requirements::FAIRY
            .union(Requirements::UPSTAB)
            .union(Requirements::DOWNSTAB)
            .union(Requirements::JUMP)
            .union(Requirements::GLOVE),
    ];

    /// Allowed blockers for a palace number (1-7). Unknown numbers allow nothing.
    pub fn allowed_blockers(palace_number: u8) -> Requirements {
        match palace_number {
            1..=7 => Self::ALLOWED_BLOCKERS_BY_PALACE[palace_number as usize - 1],
            _ => Requirements::empty(),
        }
    }

    /// The stab normally obtainable early, honoring the up/down stab swap.
    pub fn early_stab(swap_up_and_down_stab: bool) -> Requirements {
        if swap_up_and_down_stab {
            Requirements::UPSTAB
        } else {
            Requirements::DOWNSTAB
        }
    }
}

/// What it takes to pass through a room
///
/// Each entry is one way through (all of its abilities are needed). A room
/// with no entries is free to pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomRequirements {
    pub any_of: Vec<Requirements>,
}

impl RoomRequirements {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn single(req: Requirements) -> Self {
        Self { any_of: vec![req] }
    }

    /// True if the held abilities satisfy at least one way through.
    pub fn is_satisfied_by(&self, held: Requirements) -> bool {
        self.any_of.is_empty() || self.any_of.iter().any(|req| held.contains(*req))
    }

    /// Every ability mentioned anywhere in these requirements
    pub fn blockers(&self) -> Requirements {
        self.any_of
            .iter()
            .fold(Requirements::empty(), |acc, req| acc | *req)
    }
}

/// Collectible items held in palace item rooms
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Item {
    Candle,
    Glove,
    Raft,
    Boots,
    Flute,
    Cross,
}

impl Item {
    /// The item a standard palace (1-6) holds in vanilla placement.
    pub fn for_palace(palace_number: u8) -> Option<Item> {
        match palace_number {
            1 => Some(Item::Candle),
            2 => Some(Item::Glove),
            3 => Some(Item::Raft),
            4 => Some(Item::Boots),
            5 => Some(Item::Flute),
            6 => Some(Item::Cross),
            _ => None,
        }
    }

    /// Ability gained inside palaces by holding this item, if any.
    pub fn ability(self) -> Requirements {
        match self {
            Item::Glove => Requirements::GLOVE,
            _ => Requirements::empty(),
        }
    }
}
