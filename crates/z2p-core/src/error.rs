//! Error types
//!
//! Only configuration problems are errors. Structural placement failures are
//! retried by the generator and never surface here.

use thiserror::Error;

/// Fatal configuration errors raised while generating palaces
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("no {pool} rooms available for palace {palace}")]
    EmptyPool { pool: &'static str, palace: u8 },

    #[error("invalid palace number: {0}")]
    InvalidPalaceNumber(u8),

    #[error("room pool has no room named '{0}'")]
    UnknownRoom(String),

    #[error("vanilla palace {0} failed structural validation")]
    VanillaUnreachable(u8),
}

/// Errors loading a room catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("could not read room catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse room catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate room name '{0}' in catalog")]
    DuplicateName(String),

    #[error("room '{room}' links to unknown room '{target}'")]
    DanglingLink { room: String, target: String },
}
