//! Deterministic beam simulation
//!
//! All puzzle logic lives here. Tracing is a pure function of a grid snapshot:
//! - No clocks or randomness
//! - Stable iteration order (mirrors by id, targets by index)
//! - No rendering or platform dependencies

pub mod direction;
pub mod grid;
pub mod session;
pub mod trace;

pub use direction::{Direction, MirrorKind};
pub use grid::{Emitter, Grid, GridConfig, Mirror, MirrorId};
pub use session::{MirrorInventory, Session, SessionEvent, SessionPhase};
pub use trace::{
    BeamTrace, FireResult, PathSample, Termination, fire, trace, trace_all,
    trace_all_with_ceiling, trace_with_ceiling,
};
