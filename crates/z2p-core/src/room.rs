//! Room templates and placed room instances
//!
//! A [`RoomTemplate`] is immutable content owned by the room pool. A
//! [`RoomInstance`] is a mutable copy placed into one palace; it records the
//! connection state of each exit and the role it plays in the palace.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::requirement::{Item, RoomRequirements};

/// Exit direction of a sideview room
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Orientations an item room can be drawn for.
    pub const ITEM_ROOM_ORIENTATIONS: [Direction; 4] = Self::ALL;

    /// The exit on a neighbouring room that pairs with this one
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn exit(self) -> Exits {
        match self {
            Direction::Left => Exits::LEFT,
            Direction::Right => Exits::RIGHT,
            Direction::Up => Exits::UP,
            Direction::Down => Exits::DOWN,
        }
    }
}

bitflags! {
    /// Exits a room has
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Exits: u8 {
        const LEFT = 0x01;
        const RIGHT = 0x02;
        const UP = 0x04;
        const DOWN = 0x08;
    }
}

impl Exits {
    pub fn has(self, dir: Direction) -> bool {
        self.contains(dir.exit())
    }

    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.has(*d))
    }
}

/// Content set a template comes from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoomGroup {
    Vanilla,
    V4_0,
    V4_4,
}

/// Which pool a template belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    Entrance,
    Boss,
    Item,
    Thunderbird,
    /// Filler room for palaces 1-6
    Normal,
    /// Filler room for the great palace
    GreatPalace,
}

/// Vanilla neighbours by room name, used to wire non-reconstructed palaces
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VanillaLinks {
    pub left: Option<String>,
    pub right: Option<String>,
    pub up: Option<String>,
    pub down: Option<String>,
}

impl VanillaLinks {
    pub fn get(&self, dir: Direction) -> Option<&str> {
        match dir {
            Direction::Left => self.left.as_deref(),
            Direction::Right => self.right.as_deref(),
            Direction::Up => self.up.as_deref(),
            Direction::Down => self.down.as_deref(),
        }
    }
}

/// Index of a template in its pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateId(pub usize);

/// Immutable room definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTemplate {
    pub name: String,
    pub group: RoomGroup,
    pub kind: RoomKind,
    #[serde(default)]
    pub custom: bool,
    /// Rendered sideview bytes
    #[serde(default)]
    pub layout: Vec<u8>,
    pub exits: Exits,
    /// The down exit is a drop rather than an elevator
    #[serde(default)]
    pub has_drop: bool,
    /// Can be entered from above by a drop
    #[serde(default)]
    pub is_drop_zone: bool,
    #[serde(default)]
    pub palace_number: Option<u8>,
    #[serde(default)]
    pub linked_room: Option<String>,
    #[serde(default)]
    pub enemies: Vec<u8>,
    /// Item rooms only
    #[serde(default)]
    pub orientation: Option<Direction>,
    #[serde(default)]
    pub requirements: RoomRequirements,
    #[serde(default)]
    pub vanilla_links: VanillaLinks,
}

impl RoomTemplate {
    /// Bare template with the given exits; used to build pools in code.
    pub fn new(name: impl Into<String>, kind: RoomKind, exits: Exits) -> Self {
        Self {
            name: name.into(),
            group: RoomGroup::Vanilla,
            kind,
            custom: false,
            layout: Vec::new(),
            exits,
            has_drop: false,
            is_drop_zone: false,
            palace_number: None,
            linked_room: None,
            enemies: Vec::new(),
            orientation: None,
            requirements: RoomRequirements::none(),
            vanilla_links: VanillaLinks::default(),
        }
    }

    /// True if this template may be used in the given palace
    pub fn fits_palace(&self, palace_number: u8) -> bool {
        self.palace_number.is_none_or(|n| n == palace_number)
    }
}

/// Index of a room instance within its palace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub usize);

bitflags! {
    /// Role a room plays in its palace
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct RoomRole: u8 {
        const ROOT = 0x01;
        const BOSS = 0x02;
        const ITEM = 0x04;
        const THUNDERBIRD = 0x08;
    }
}

/// A room placed in a palace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInstance {
    pub template: TemplateId,
    pub name: String,
    /// Assigned map slot
    pub map_no: usize,
    /// Passed through untouched for later packing
    pub palace_group: u8,
    pub role: RoomRole,
    pub layout: Vec<u8>,
    /// Live exits: the template's exits minus any sealed by consolidation
    pub exits: Exits,
    pub sealed: Exits,
    pub has_drop: bool,
    pub is_drop_zone: bool,
    pub enemies: Vec<u8>,
    pub enemy_override: Option<Vec<u8>>,
    pub item: Option<Item>,
    pub requirements: RoomRequirements,
    /// The boss room leads out of the palace
    pub connects_outside: bool,
    connections: [Option<RoomId>; 4],
    dropped_from: Option<RoomId>,
}

impl RoomInstance {
    pub fn from_template(id: TemplateId, template: &RoomTemplate) -> Self {
        Self {
            template: id,
            name: template.name.clone(),
            map_no: 0,
            palace_group: 0,
            role: RoomRole::empty(),
            layout: template.layout.clone(),
            exits: template.exits,
            sealed: Exits::empty(),
            has_drop: template.has_drop,
            is_drop_zone: template.is_drop_zone,
            enemies: template.enemies.clone(),
            enemy_override: None,
            item: None,
            requirements: template.requirements.clone(),
            connects_outside: false,
            connections: [None; 4],
            dropped_from: None,
        }
    }

    pub fn connection(&self, dir: Direction) -> Option<RoomId> {
        self.connections[dir.index()]
    }

    pub(crate) fn set_connection(&mut self, dir: Direction, to: Option<RoomId>) {
        self.connections[dir.index()] = to;
    }

    pub fn dropped_from(&self) -> Option<RoomId> {
        self.dropped_from
    }

    pub(crate) fn set_dropped_from(&mut self, from: Option<RoomId>) {
        self.dropped_from = from;
    }

    /// True if this direction is a drop exit rather than an elevator
    pub fn is_drop_exit(&self, dir: Direction) -> bool {
        dir == Direction::Down && self.has_drop
    }

    /// Turn a live exit into a wall
    pub(crate) fn seal(&mut self, dir: Direction) {
        self.exits.remove(dir.exit());
        self.sealed.insert(dir.exit());
    }

    /// Exits present but not yet connected
    pub fn open_exits(&self) -> Exits {
        self.exits
            .directions()
            .filter(|d| self.connection(*d).is_none())
            .fold(Exits::empty(), |acc, d| acc | d.exit())
    }

    pub fn count_open_exits(&self) -> usize {
        self.open_exits().bits().count_ones() as usize
    }

    /// Number of exits that are not sealed
    pub fn live_exit_count(&self) -> usize {
        self.exits.bits().count_ones() as usize
    }

    /// Enemy bytes this room will contribute when packed
    pub fn enemy_bytes(&self) -> &[u8] {
        self.enemy_override.as_deref().unwrap_or(&self.enemies)
    }

    /// Rooms this one leads to or is reached from, in direction order
    pub fn neighbours(&self) -> impl Iterator<Item = RoomId> + '_ {
        self.connections.iter().flatten().copied().chain(self.dropped_from)
    }

    pub fn is_endpoint(&self) -> bool {
        self.role.intersects(RoomRole::ROOT | RoomRole::BOSS | RoomRole::ITEM | RoomRole::THUNDERBIRD)
    }
}
