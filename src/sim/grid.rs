//! Grid model: blockers, mirrors, targets and emitters on a square board
//!
//! The grid is only mutated between traces. Mirrors carry a stable id so a
//! mirror being dragged can be told apart from another mirror on the drop cell.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::direction::{Direction, MirrorKind};
use crate::consts::MAX_GRID_SIZE;
use crate::error::{PuzzleError, Result};

/// Stable mirror identity, independent of the cell it sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MirrorId(pub u32);

impl fmt::Display for MirrorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A mirror entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mirror {
    pub id: MirrorId,
    pub cell: IVec2,
    pub kind: MirrorKind,
}

/// A laser source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emitter {
    pub origin: IVec2,
    pub direction: Direction,
}

impl Emitter {
    pub fn new(origin: IVec2, direction: Direction) -> Self {
        Self { origin, direction }
    }
}

/// Plain description used to build a [`Grid`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub size: u32,
    #[serde(default)]
    pub blockers: Vec<IVec2>,
    #[serde(default)]
    pub mirrors: Vec<Mirror>,
    /// Order is significant: list position is the target index
    #[serde(default)]
    pub targets: Vec<IVec2>,
    #[serde(default)]
    pub emitters: Vec<Emitter>,
    /// Cells a mirror may be dropped on (unrestricted when absent)
    #[serde(default)]
    pub placement_zone: Option<Vec<IVec2>>,
}

/// A validated puzzle grid
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: u32,
    blockers: HashSet<IVec2>,
    /// Mirrors by id (stable iteration order)
    mirrors: BTreeMap<MirrorId, Mirror>,
    /// Occupancy index, kept in sync with `mirrors`
    mirror_cells: HashMap<IVec2, MirrorId>,
    targets: Vec<IVec2>,
    emitters: Vec<Emitter>,
    placement_zone: Option<HashSet<IVec2>>,
}

impl Grid {
    /// Empty grid of the given side length
    pub fn new(size: u32) -> Result<Self> {
        if size == 0 || size > MAX_GRID_SIZE {
            return Err(PuzzleError::InvalidSize {
                size,
                max: MAX_GRID_SIZE,
            });
        }
        Ok(Self {
            size,
            blockers: HashSet::new(),
            mirrors: BTreeMap::new(),
            mirror_cells: HashMap::new(),
            targets: Vec::new(),
            emitters: Vec::new(),
            placement_zone: None,
        })
    }

    /// Build and validate a grid from its description
    ///
    /// Every listed cell must be in bounds, mirror ids must be unique and no two
    /// mirrors may share a cell. Different occupant kinds may overlap; the tracer
    /// resolves those by check order.
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        let mut grid = Self::new(config.size)?;

        for &cell in &config.blockers {
            grid.check_bounds("blocker", cell)?;
            grid.blockers.insert(cell);
        }

        for mirror in &config.mirrors {
            grid.check_bounds("mirror", mirror.cell)?;
            if grid.mirrors.contains_key(&mirror.id) {
                return Err(PuzzleError::DuplicateMirrorId(mirror.id));
            }
            if let Some(&other) = grid.mirror_cells.get(&mirror.cell) {
                return Err(PuzzleError::MirrorCellConflict {
                    first: other,
                    second: mirror.id,
                    cell: mirror.cell,
                });
            }
            grid.mirrors.insert(mirror.id, *mirror);
            grid.mirror_cells.insert(mirror.cell, mirror.id);
        }

        for &cell in &config.targets {
            grid.check_bounds("target", cell)?;
            grid.targets.push(cell);
        }

        for emitter in &config.emitters {
            grid.check_bounds("emitter", emitter.origin)?;
            grid.emitters.push(*emitter);
        }

        if let Some(zone) = &config.placement_zone {
            let mut cells = HashSet::with_capacity(zone.len());
            for &cell in zone {
                grid.check_bounds("placement cell", cell)?;
                cells.insert(cell);
            }
            grid.placement_zone = Some(cells);
        }

        log::debug!(
            "Grid {}x{}: {} blockers, {} mirrors, {} targets, {} emitters",
            grid.size,
            grid.size,
            grid.blockers.len(),
            grid.mirrors.len(),
            grid.targets.len(),
            grid.emitters.len()
        );

        Ok(grid)
    }

    /// Snapshot the current state as a description
    pub fn to_config(&self) -> GridConfig {
        let mut blockers: Vec<IVec2> = self.blockers.iter().copied().collect();
        blockers.sort_by_key(|c| (c.y, c.x));
        let placement_zone = self.placement_zone.as_ref().map(|zone| {
            let mut cells: Vec<IVec2> = zone.iter().copied().collect();
            cells.sort_by_key(|c| (c.y, c.x));
            cells
        });
        GridConfig {
            size: self.size,
            blockers,
            mirrors: self.mirrors.values().copied().collect(),
            targets: self.targets.clone(),
            emitters: self.emitters.clone(),
            placement_zone,
        }
    }

    fn check_bounds(&self, what: &'static str, cell: IVec2) -> Result<()> {
        if self.in_bounds(cell) {
            Ok(())
        } else {
            Err(PuzzleError::OutOfBounds {
                what,
                cell,
                size: self.size,
            })
        }
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, cell: IVec2) -> bool {
        crate::in_bounds(cell, self.size)
    }

    #[inline]
    pub fn has_blocker(&self, cell: IVec2) -> bool {
        self.blockers.contains(&cell)
    }

    pub fn blockers(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.blockers.iter().copied()
    }

    pub fn mirror(&self, id: MirrorId) -> Option<&Mirror> {
        self.mirrors.get(&id)
    }

    #[inline]
    pub fn mirror_at(&self, cell: IVec2) -> Option<&Mirror> {
        self.mirror_cells
            .get(&cell)
            .and_then(|id| self.mirrors.get(id))
    }

    /// Mirrors in id order
    pub fn mirrors(&self) -> impl Iterator<Item = &Mirror> {
        self.mirrors.values()
    }

    pub fn targets(&self) -> &[IVec2] {
        &self.targets
    }

    /// Indices of every target on `cell`
    pub fn targets_at(&self, cell: IVec2) -> impl Iterator<Item = usize> + '_ {
        self.targets
            .iter()
            .enumerate()
            .filter(move |(_, t)| **t == cell)
            .map(|(i, _)| i)
    }

    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    pub fn is_emitter_origin(&self, cell: IVec2) -> bool {
        self.emitters.iter().any(|e| e.origin == cell)
    }

    /// Whether a mirror may occupy `cell`
    ///
    /// `moving` names the mirror being dragged; its own cell counts as free.
    pub fn is_placeable(&self, cell: IVec2, moving: Option<MirrorId>) -> bool {
        if !self.in_bounds(cell)
            || self.has_blocker(cell)
            || self.is_emitter_origin(cell)
            || self.targets.contains(&cell)
        {
            return false;
        }
        if let Some(zone) = &self.placement_zone {
            if !zone.contains(&cell) {
                return false;
            }
        }
        match self.mirror_cells.get(&cell) {
            Some(&occupant) => Some(occupant) == moving,
            None => true,
        }
    }

    /// Move a mirror, leaving the grid untouched if the move is invalid
    pub fn move_mirror(&mut self, id: MirrorId, cell: IVec2) -> Result<()> {
        let Some(from) = self.mirrors.get(&id).map(|m| m.cell) else {
            log::warn!("Rejected move of unknown mirror {}", id);
            return Err(PuzzleError::UnknownMirror(id));
        };
        if !self.is_placeable(cell, Some(id)) {
            log::warn!("Rejected move of mirror {} to ({}, {})", id, cell.x, cell.y);
            return Err(PuzzleError::NotPlaceable { cell });
        }
        if from == cell {
            return Ok(());
        }

        self.mirror_cells.remove(&from);
        self.mirror_cells.insert(cell, id);
        if let Some(mirror) = self.mirrors.get_mut(&id) {
            mirror.cell = cell;
        }
        Ok(())
    }

    /// Place a new mirror, returning its freshly allocated id
    pub fn insert_mirror(&mut self, kind: MirrorKind, cell: IVec2) -> Result<MirrorId> {
        if !self.is_placeable(cell, None) {
            return Err(PuzzleError::NotPlaceable { cell });
        }
        let id = self.next_mirror_id()?;
        self.mirrors.insert(id, Mirror { id, cell, kind });
        self.mirror_cells.insert(cell, id);
        Ok(id)
    }

    pub fn remove_mirror(&mut self, id: MirrorId) -> Result<Mirror> {
        let mirror = self
            .mirrors
            .remove(&id)
            .ok_or(PuzzleError::UnknownMirror(id))?;
        self.mirror_cells.remove(&mirror.cell);
        Ok(mirror)
    }

    /// One past the highest id, or the lowest free id once `u32::MAX` is taken
    fn next_mirror_id(&self) -> Result<MirrorId> {
        let Some(last) = self.mirrors.keys().next_back() else {
            return Ok(MirrorId(1));
        };
        if let Some(next) = last.0.checked_add(1) {
            return Ok(MirrorId(next));
        }
        let mut candidate = 0u32;
        for id in self.mirrors.keys() {
            if id.0 != candidate {
                return Ok(MirrorId(candidate));
            }
            candidate = candidate.checked_add(1).ok_or(PuzzleError::MirrorIdsExhausted)?;
        }
        Err(PuzzleError::MirrorIdsExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirror(id: u32, x: i32, y: i32, kind: MirrorKind) -> Mirror {
        Mirror {
            id: MirrorId(id),
            cell: IVec2::new(x, y),
            kind,
        }
    }

    fn sample_grid() -> Grid {
        Grid::from_config(&GridConfig {
            size: 8,
            blockers: vec![IVec2::new(3, 3)],
            mirrors: vec![
                mirror(1, 2, 1, MirrorKind::ForwardSlash),
                mirror(2, 5, 5, MirrorKind::BackSlash),
            ],
            targets: vec![IVec2::new(7, 6)],
            emitters: vec![Emitter::new(IVec2::new(0, 1), Direction::Right)],
            placement_zone: None,
        })
        .unwrap()
    }

    #[test]
    fn test_new_rejects_bad_size() {
        assert!(matches!(
            Grid::new(0),
            Err(PuzzleError::InvalidSize { size: 0, .. })
        ));
        assert!(Grid::new(MAX_GRID_SIZE + 1).is_err());
        assert!(Grid::new(1).is_ok());
    }

    #[test]
    fn test_from_config_rejects_out_of_bounds() {
        let config = GridConfig {
            size: 4,
            emitters: vec![Emitter::new(IVec2::new(-1, 0), Direction::Right)],
            ..Default::default()
        };
        assert!(matches!(
            Grid::from_config(&config),
            Err(PuzzleError::OutOfBounds {
                what: "emitter",
                ..
            })
        ));

        let config = GridConfig {
            size: 4,
            targets: vec![IVec2::new(4, 0)],
            ..Default::default()
        };
        assert!(Grid::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_rejects_mirror_conflicts() {
        let config = GridConfig {
            size: 4,
            mirrors: vec![
                mirror(1, 1, 1, MirrorKind::ForwardSlash),
                mirror(1, 2, 2, MirrorKind::BackSlash),
            ],
            ..Default::default()
        };
        assert!(matches!(
            Grid::from_config(&config),
            Err(PuzzleError::DuplicateMirrorId(MirrorId(1)))
        ));

        let config = GridConfig {
            size: 4,
            mirrors: vec![
                mirror(1, 1, 1, MirrorKind::ForwardSlash),
                mirror(2, 1, 1, MirrorKind::BackSlash),
            ],
            ..Default::default()
        };
        assert!(matches!(
            Grid::from_config(&config),
            Err(PuzzleError::MirrorCellConflict { .. })
        ));
    }

    #[test]
    fn test_from_config_accepts_mixed_overlap() {
        let config = GridConfig {
            size: 4,
            blockers: vec![IVec2::new(2, 2)],
            mirrors: vec![mirror(1, 2, 2, MirrorKind::ForwardSlash)],
            targets: vec![IVec2::new(2, 2)],
            ..Default::default()
        };
        let grid = Grid::from_config(&config).unwrap();
        assert!(grid.has_blocker(IVec2::new(2, 2)));
        assert!(grid.mirror_at(IVec2::new(2, 2)).is_some());
    }

    #[test]
    fn test_is_placeable() {
        let grid = sample_grid();
        // Empty cell
        assert!(grid.is_placeable(IVec2::new(4, 4), None));
        // Out of bounds
        assert!(!grid.is_placeable(IVec2::new(8, 0), None));
        assert!(!grid.is_placeable(IVec2::new(0, -1), None));
        // Blocker, target, emitter origin
        assert!(!grid.is_placeable(IVec2::new(3, 3), None));
        assert!(!grid.is_placeable(IVec2::new(7, 6), None));
        assert!(!grid.is_placeable(IVec2::new(0, 1), None));
        // Occupied by another mirror
        assert!(!grid.is_placeable(IVec2::new(2, 1), None));
        assert!(!grid.is_placeable(IVec2::new(2, 1), Some(MirrorId(2))));
        // A mirror's own cell is free for itself
        assert!(grid.is_placeable(IVec2::new(2, 1), Some(MirrorId(1))));
    }

    #[test]
    fn test_placement_zone_restricts_drops() {
        let config = GridConfig {
            size: 4,
            placement_zone: Some(vec![IVec2::new(1, 1), IVec2::new(2, 1)]),
            ..Default::default()
        };
        let grid = Grid::from_config(&config).unwrap();
        assert!(grid.is_placeable(IVec2::new(1, 1), None));
        assert!(!grid.is_placeable(IVec2::new(3, 3), None));
    }

    #[test]
    fn test_move_mirror() {
        let mut grid = sample_grid();
        grid.move_mirror(MirrorId(1), IVec2::new(4, 1)).unwrap();
        assert!(grid.mirror_at(IVec2::new(2, 1)).is_none());
        assert_eq!(grid.mirror_at(IVec2::new(4, 1)).unwrap().id, MirrorId(1));
        assert_eq!(grid.mirror(MirrorId(1)).unwrap().cell, IVec2::new(4, 1));

        // Moving onto itself is a no-op
        grid.move_mirror(MirrorId(1), IVec2::new(4, 1)).unwrap();
        assert_eq!(grid.mirrors().count(), 2);
    }

    #[test]
    fn test_move_mirror_rejects_and_leaves_grid_unchanged() {
        let mut grid = sample_grid();
        let before = grid.clone();

        assert!(matches!(
            grid.move_mirror(MirrorId(1), IVec2::new(5, 5)),
            Err(PuzzleError::NotPlaceable { .. })
        ));
        assert!(grid.move_mirror(MirrorId(1), IVec2::new(3, 3)).is_err());
        assert!(grid.move_mirror(MirrorId(1), IVec2::new(-1, 3)).is_err());
        assert!(matches!(
            grid.move_mirror(MirrorId(9), IVec2::new(4, 4)),
            Err(PuzzleError::UnknownMirror(MirrorId(9)))
        ));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_insert_and_remove_mirror() {
        let mut grid = sample_grid();
        let id = grid
            .insert_mirror(MirrorKind::BackSlash, IVec2::new(6, 1))
            .unwrap();
        assert_eq!(id, MirrorId(3));
        assert_eq!(
            grid.mirror_at(IVec2::new(6, 1)).unwrap().kind,
            MirrorKind::BackSlash
        );
        assert!(
            grid.insert_mirror(MirrorKind::BackSlash, IVec2::new(6, 1))
                .is_err()
        );

        let removed = grid.remove_mirror(id).unwrap();
        assert_eq!(removed.cell, IVec2::new(6, 1));
        assert!(grid.mirror_at(IVec2::new(6, 1)).is_none());
        assert!(grid.remove_mirror(id).is_err());
    }

    #[test]
    fn test_insert_after_max_id_reuses_free_id() {
        let mut grid = Grid::from_config(&GridConfig {
            size: 4,
            mirrors: vec![
                mirror(0, 0, 0, MirrorKind::ForwardSlash),
                mirror(u32::MAX, 1, 1, MirrorKind::ForwardSlash),
            ],
            ..Default::default()
        })
        .unwrap();

        let id = grid
            .insert_mirror(MirrorKind::BackSlash, IVec2::new(2, 2))
            .unwrap();
        assert_eq!(id, MirrorId(1));
        assert_eq!(grid.mirror(MirrorId(u32::MAX)).unwrap().cell, IVec2::new(1, 1));
        assert_eq!(grid.mirror(id).unwrap().kind, MirrorKind::BackSlash);
        assert_eq!(grid.mirrors().count(), 3);
    }

    #[test]
    fn test_targets_at_reports_every_index() {
        let config = GridConfig {
            size: 4,
            targets: vec![IVec2::new(1, 0), IVec2::new(2, 0), IVec2::new(1, 0)],
            ..Default::default()
        };
        let grid = Grid::from_config(&config).unwrap();
        let hits: Vec<usize> = grid.targets_at(IVec2::new(1, 0)).collect();
        assert_eq!(hits, vec![0, 2]);
    }

    #[test]
    fn test_config_snapshot_round_trip() {
        let grid = sample_grid();
        let config = grid.to_config();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: GridConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(Grid::from_config(&parsed).unwrap(), grid);
    }
}
