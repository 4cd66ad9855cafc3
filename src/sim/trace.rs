//! Beam tracing
//!
//! Pure functions of a grid snapshot and an emitter. Each step the beam moves
//! one cell, then checks in a fixed order: bounds, blocker, mirror, target.
//! A cell holding both a blocker and a mirror therefore stops the beam.

use std::collections::BTreeSet;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::grid::{Emitter, Grid};
use crate::consts::STEP_CEILING_FACTOR;
use crate::step_ceiling;

/// One cell the beam occupied, with the direction it entered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSample {
    pub cell: IVec2,
    pub direction: Direction,
}

/// Why a beam stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Next step would leave the grid
    ExitedGrid,
    /// Beam entered a blocker cell
    Blocked,
    /// Step ceiling reached (mirror loop)
    StepCeiling,
    /// Emitter origin is not on the grid. Grids reject such emitters at
    /// construction; a free-standing one passed to `trace` yields an empty
    /// path (not even the origin sample) so every returned sample is in bounds.
    OriginOutOfBounds,
}

/// Result of tracing a single emitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamTrace {
    pub emitter: Emitter,
    pub path: Vec<PathSample>,
    pub termination: Termination,
    /// Target indices this beam entered
    pub hit_targets: BTreeSet<usize>,
}

impl BeamTrace {
    /// Last cell the beam occupied
    pub fn end(&self) -> Option<IVec2> {
        self.path.last().map(|s| s.cell)
    }
}

/// Result of firing every emitter of a grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireResult {
    /// One trace per emitter, in emitter order
    pub traces: Vec<BeamTrace>,
    /// Union of hit target indices across all traces
    pub hit_targets: BTreeSet<usize>,
    pub target_count: usize,
}

impl FireResult {
    /// Every target index was hit
    pub fn is_won(&self) -> bool {
        self.hit_targets.len() == self.target_count
    }
}

/// Trace one emitter with the default step ceiling (`2 * size²`)
pub fn trace(grid: &Grid, emitter: &Emitter) -> BeamTrace {
    trace_with_ceiling(grid, emitter, step_ceiling(grid.size(), STEP_CEILING_FACTOR))
}

/// Trace one emitter, taking at most `max_steps` steps
pub fn trace_with_ceiling(grid: &Grid, emitter: &Emitter, max_steps: usize) -> BeamTrace {
    let mut hit_targets = BTreeSet::new();

    if !grid.in_bounds(emitter.origin) {
        log::warn!(
            "Emitter at ({}, {}) is off the grid",
            emitter.origin.x,
            emitter.origin.y
        );
        return BeamTrace {
            emitter: *emitter,
            path: Vec::new(),
            termination: Termination::OriginOutOfBounds,
            hit_targets,
        };
    }

    let mut pos = emitter.origin;
    let mut dir = emitter.direction;
    let mut path = vec![PathSample {
        cell: pos,
        direction: dir,
    }];

    let mut termination = Termination::StepCeiling;
    for _ in 0..max_steps {
        let next = pos + dir.vector();

        if !grid.in_bounds(next) {
            termination = Termination::ExitedGrid;
            break;
        }

        path.push(PathSample {
            cell: next,
            direction: dir,
        });

        if grid.has_blocker(next) {
            termination = Termination::Blocked;
            break;
        }

        if let Some(mirror) = grid.mirror_at(next) {
            dir = mirror.kind.reflect(dir);
        }

        hit_targets.extend(grid.targets_at(next));

        pos = next;
    }

    log::debug!(
        "Beam from ({}, {}) {}: {} cells, {:?}, hits {:?}",
        emitter.origin.x,
        emitter.origin.y,
        emitter.direction.as_str(),
        path.len(),
        termination,
        hit_targets
    );

    BeamTrace {
        emitter: *emitter,
        path,
        termination,
        hit_targets,
    }
}

/// Trace each emitter against the same grid and union the hits
pub fn trace_all(grid: &Grid, emitters: &[Emitter]) -> FireResult {
    trace_all_with_ceiling(
        grid,
        emitters,
        step_ceiling(grid.size(), STEP_CEILING_FACTOR),
    )
}

pub fn trace_all_with_ceiling(grid: &Grid, emitters: &[Emitter], max_steps: usize) -> FireResult {
    let traces: Vec<BeamTrace> = emitters
        .iter()
        .map(|e| trace_with_ceiling(grid, e, max_steps))
        .collect();
    let hit_targets = traces
        .iter()
        .flat_map(|t| t.hit_targets.iter().copied())
        .collect();
    FireResult {
        traces,
        hit_targets,
        target_count: grid.targets().len(),
    }
}

/// Fire every emitter the grid carries
pub fn fire(grid: &Grid) -> FireResult {
    trace_all(grid, grid.emitters())
}
