//! Error type for grid construction, mutation and session actions
//!
//! Tracing itself is total and never returns an error.

use glam::IVec2;
use thiserror::Error;

use crate::sim::{MirrorId, MirrorKind};

#[derive(Error, Debug)]
pub enum PuzzleError {
    #[error("grid size {size} is outside 1..={max}")]
    InvalidSize { size: u32, max: u32 },

    #[error("{what} at ({}, {}) is outside a {size}x{size} grid", .cell.x, .cell.y)]
    OutOfBounds {
        what: &'static str,
        cell: IVec2,
        size: u32,
    },

    #[error("mirror id {0} is used more than once")]
    DuplicateMirrorId(MirrorId),

    #[error("mirrors {first} and {second} share cell ({}, {})", .cell.x, .cell.y)]
    MirrorCellConflict {
        first: MirrorId,
        second: MirrorId,
        cell: IVec2,
    },

    #[error("no mirror with id {0}")]
    UnknownMirror(MirrorId),

    #[error("every mirror id is in use")]
    MirrorIdsExhausted,

    #[error("cell ({}, {}) cannot hold a mirror", .cell.x, .cell.y)]
    NotPlaceable { cell: IVec2 },

    #[error("no {0:?} mirrors left in the inventory")]
    InventoryExhausted(MirrorKind),

    #[error("beam is still firing")]
    Busy,

    #[error("puzzle is already solved")]
    AlreadySolved,

    #[error("settings parse failed: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("settings read failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
