//! Generation options
//!
//! The read-only configuration surface palace generation consumes. Loaded
//! from JSON by the command-line driver; every field has a default.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::room::RoomGroup;

/// How a palace's room graph is produced
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PalaceStyle {
    /// Unmodified layout
    #[default]
    Vanilla,
    /// Vanilla rooms with shuffled connections
    Shuffled,
    /// Built from the template pool
    Reconstructed,
    /// Built from the template pool, great palace at roughly half size
    ReconstructedShortened,
}

impl PalaceStyle {
    pub fn is_reconstructed(self) -> bool {
        matches!(
            self,
            PalaceStyle::Reconstructed | PalaceStyle::ReconstructedShortened
        )
    }
}

/// User-configurable palace generation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PalaceOptions {
    // Room sources
    pub allow_vanilla_rooms: bool,
    pub allow_v4_rooms: bool,
    pub allow_v4_4_rooms: bool,
    pub use_custom_rooms: bool,

    // Placement policy
    pub no_duplicate_rooms: bool,
    pub no_duplicate_rooms_by_layout: bool,
    pub blockers_anywhere: bool,
    pub boss_room_connect: bool,

    // Thunderbird
    pub require_thunderbird: bool,
    pub remove_thunderbird: bool,

    // Item logic
    pub shuffle_palace_items: bool,
    pub shuffle_overworld_items: bool,
    pub swap_up_and_down_stab: bool,

    // Styles
    pub normal_palace_style: PalaceStyle,
    pub great_palace_style: PalaceStyle,
}

impl Default for PalaceOptions {
    fn default() -> Self {
        Self {
            allow_vanilla_rooms: true,
            allow_v4_rooms: false,
            allow_v4_4_rooms: false,
            use_custom_rooms: false,

            no_duplicate_rooms: false,
            no_duplicate_rooms_by_layout: false,
            blockers_anywhere: false,
            boss_room_connect: false,

            require_thunderbird: true,
            remove_thunderbird: false,

            shuffle_palace_items: false,
            shuffle_overworld_items: false,
            swap_up_and_down_stab: false,

            normal_palace_style: PalaceStyle::Reconstructed,
            great_palace_style: PalaceStyle::Reconstructed,
        }
    }
}

impl PalaceOptions {
    /// Room groups enabled by the source switches, in accumulation order
    pub fn room_groups(&self) -> Vec<RoomGroup> {
        let mut groups = Vec::with_capacity(3);
        if self.allow_vanilla_rooms {
            groups.push(RoomGroup::Vanilla);
        }
        if self.allow_v4_rooms {
            groups.push(RoomGroup::V4_0);
        }
        if self.allow_v4_4_rooms {
            groups.push(RoomGroup::V4_4);
        }
        groups
    }

    /// Style governing the given palace number
    pub fn style_for(&self, palace_number: u8) -> PalaceStyle {
        if palace_number == 7 {
            self.great_palace_style
        } else {
            self.normal_palace_style
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
