//! Shared room pool for integration tests
//!
//! Every palace gets a vanilla layout with one drop:
//!
//! ```text
//! entrance -> hall -> nook
//!              |drop
//!   item  <- landing -> boss      (palace 7: landing -> thunderbird -> boss)
//! ```
//!
//! Filler rooms are mostly three- and four-way, with drop shafts, landings
//! that drop again, and linked pairs mixed in.

#![allow(dead_code)]

use z2p_core::{Direction, Exits, RoomCatalog, RoomTemplate};
use z2p_core::room::RoomKind;

const ALL: Exits = Exits::all();

fn template(name: &str, kind: RoomKind, exits: Exits, palace: Option<u8>) -> RoomTemplate {
    let mut t = RoomTemplate::new(name, kind, exits);
    t.palace_number = palace;
    t.enemies = vec![0x10, 0x20];
    t
}

fn links(mut t: RoomTemplate, to: &[(Direction, String)]) -> RoomTemplate {
    for (dir, name) in to {
        let slot = match dir {
            Direction::Left => &mut t.vanilla_links.left,
            Direction::Right => &mut t.vanilla_links.right,
            Direction::Up => &mut t.vanilla_links.up,
            Direction::Down => &mut t.vanilla_links.down,
        };
        *slot = Some(name.clone());
    }
    t
}

fn vanilla_palace(n: u8) -> Vec<RoomTemplate> {
    let kind = if n == 7 { RoomKind::GreatPalace } else { RoomKind::Normal };
    let name = |what: &str| format!("P{n} {what}");
    let beyond_landing = if n == 7 { "thunderbird".to_string() } else { name("boss") };

    let entrance = links(
        template(&name("entrance"), RoomKind::Entrance, Exits::RIGHT, Some(n)),
        &[(Direction::Right, name("hall"))],
    );
    let mut hall = links(
        template(&name("hall"), kind, Exits::LEFT | Exits::RIGHT | Exits::DOWN, Some(n)),
        &[
            (Direction::Left, name("entrance")),
            (Direction::Right, name("nook")),
            (Direction::Down, name("landing")),
        ],
    );
    hall.has_drop = true;
    let nook = links(
        template(&name("nook"), kind, Exits::LEFT, Some(n)),
        &[(Direction::Left, name("hall"))],
    );
    let mut landing = links(
        template(&name("landing"), kind, Exits::LEFT | Exits::RIGHT, Some(n)),
        &[(Direction::Left, name("item")), (Direction::Right, beyond_landing.clone())],
    );
    landing.is_drop_zone = true;
    let mut boss = links(
        template(&name("boss"), RoomKind::Boss, Exits::LEFT, Some(n)),
        &[(Direction::Left, if n == 7 { "thunderbird".to_string() } else { name("landing") })],
    );
    boss.enemies = vec![n; 6];

    let mut rooms = vec![entrance, hall, nook, landing, boss];
    if n == 7 {
        rooms.push(links(
            template(&name("item"), kind, Exits::RIGHT, Some(n)),
            &[(Direction::Right, name("landing"))],
        ));
    } else {
        let mut item = links(
            template(&name("item"), RoomKind::Item, Exits::RIGHT, Some(n)),
            &[(Direction::Right, name("landing"))],
        );
        item.orientation = Some(Direction::Right);
        rooms.push(item);
    }
    rooms
}

fn filler(kind: RoomKind, prefix: &str) -> Vec<RoomTemplate> {
    let shapes = [
        ALL,
        ALL,
        ALL - Exits::UP,
        ALL - Exits::DOWN,
        ALL - Exits::LEFT,
        ALL - Exits::RIGHT,
        Exits::LEFT | Exits::RIGHT,
    ];
    let mut rooms = Vec::new();
    for i in 0..60 {
        rooms.push(template(&format!("{prefix} room {i}"), kind, shapes[i % shapes.len()], None));
    }
    for i in 0..8 {
        let mut shaft = template(&format!("{prefix} shaft {i}"), kind, Exits::LEFT | Exits::RIGHT | Exits::DOWN, None);
        shaft.has_drop = true;
        rooms.push(shaft);
    }
    for i in 0..12 {
        let exits = if i % 3 == 0 { ALL - Exits::UP } else { Exits::LEFT | Exits::RIGHT };
        let mut landing = template(&format!("{prefix} landing {i}"), kind, exits, None);
        landing.is_drop_zone = true;
        landing.has_drop = exits.contains(Exits::DOWN);
        rooms.push(landing);
    }
    for i in 0..3 {
        let mut west = template(&format!("{prefix} west wing {i}"), kind, Exits::LEFT | Exits::RIGHT | Exits::UP, None);
        west.linked_room = Some(format!("{prefix} east wing {i}"));
        rooms.push(west);
        // reachable only as the west wing's partner
        rooms.push(template(&format!("{prefix} east wing {i}"), kind, Exits::LEFT | Exits::RIGHT, Some(99)));
    }
    rooms
}

fn item_rooms() -> Vec<RoomTemplate> {
    let mut rooms = Vec::new();
    for dir in Direction::ALL {
        let mut item = template(&format!("item {dir}"), RoomKind::Item, dir.exit(), None);
        item.orientation = Some(dir);
        rooms.push(item);
    }
    let mut vault = template("item vault", RoomKind::Item, Exits::LEFT, None);
    vault.orientation = Some(Direction::Left);
    vault.linked_room = Some("item vault annex".to_string());
    rooms.push(vault);
    rooms.push(template("item vault annex", RoomKind::Normal, Exits::LEFT | Exits::RIGHT, Some(99)));
    rooms
}

/// Full test pool
pub fn catalog() -> RoomCatalog {
    let mut templates = Vec::new();
    for n in 1..=7 {
        templates.extend(vanilla_palace(n));
    }
    templates.push(links(
        template("thunderbird", RoomKind::Thunderbird, Exits::LEFT | Exits::RIGHT, None),
        &[
            (Direction::Left, "P7 landing".to_string()),
            (Direction::Right, "P7 boss".to_string()),
        ],
    ));
    templates.extend(item_rooms());
    templates.extend(filler(RoomKind::Normal, "normal"));
    templates.extend(filler(RoomKind::GreatPalace, "great"));
    RoomCatalog::new(templates).expect("test catalog is consistent")
}
