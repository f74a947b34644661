//! z2p-core: Palace room-graph generation for a Zelda II randomizer
//!
//! Builds the room graphs of the seven palaces from a pool of room
//! templates, retries until every palace is structurally sound, and checks
//! the finished set against global solvability constraints.
//!
//! The crate does no I/O beyond loading a room catalog; the world is
//! produced entirely from a seeded [`GenRng`].

pub mod cancel;
pub mod catalog;
pub mod clearance;
pub mod error;
pub mod generation;
pub mod options;
pub mod palace;
pub mod requirement;
pub mod room;
pub mod validation;

mod rng;

pub use cancel::CancelSignal;
pub use catalog::{RoomCatalog, RoomPool};
pub use clearance::{ClearanceOracle, RequirementClearance};
pub use error::{CatalogError, GenerationError};
pub use generation::{generate_palaces, generate_palaces_with};
pub use options::{PalaceOptions, PalaceStyle};
pub use palace::{GREAT_PALACE, Palace};
pub use requirement::{Item, Requirements};
pub use rng::GenRng;
pub use room::{Direction, Exits, RoomId, RoomInstance, RoomRole, RoomTemplate, TemplateId};
pub use validation::{ValidationFailure, validate_palaces};
