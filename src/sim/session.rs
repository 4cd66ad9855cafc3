//! Puzzle session: fire/aim cycle around a grid
//!
//! Holds the grid the player edits, the mirrors still in hand and the phase
//! guard that locks edits while a fired beam is on display. Time advances
//! only through `update`, so the session stays deterministic.

use std::collections::BTreeMap;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::direction::MirrorKind;
use super::grid::{Grid, MirrorId};
use super::trace::{FireResult, trace_all_with_ceiling};
use crate::error::{PuzzleError, Result};
use crate::settings::Settings;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Player may move, place and remove mirrors, or fire
    Aiming,
    /// Beam on display, edits locked
    Firing,
    /// Every target was hit
    Solved,
}

/// Notifications produced by `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Firing lock released without a win
    FiringEnded,
    /// Winning shot confirmed
    Solved,
}

/// Mirrors the player still holds, by kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorInventory {
    counts: BTreeMap<MirrorKind, u32>,
}

impl MirrorInventory {
    pub fn new(forward_slash: u32, back_slash: u32) -> Self {
        let mut counts = BTreeMap::new();
        counts.insert(MirrorKind::ForwardSlash, forward_slash);
        counts.insert(MirrorKind::BackSlash, back_slash);
        Self { counts }
    }

    pub fn available(&self, kind: MirrorKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    fn take(&mut self, kind: MirrorKind) -> Result<()> {
        match self.counts.get_mut(&kind) {
            Some(n) if *n > 0 => {
                *n -= 1;
                Ok(())
            }
            _ => Err(PuzzleError::InventoryExhausted(kind)),
        }
    }

    fn give_back(&mut self, kind: MirrorKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }
}

/// A puzzle in progress
#[derive(Debug, Clone)]
pub struct Session {
    grid: Grid,
    inventory: MirrorInventory,
    /// Starting layout restored by `reset`
    initial_grid: Grid,
    initial_inventory: MirrorInventory,
    settings: Settings,
    phase: SessionPhase,
    /// Seconds since the last shot
    fire_elapsed: f32,
    last_fire: Option<FireResult>,
}

impl Session {
    pub fn new(grid: Grid, inventory: MirrorInventory, settings: Settings) -> Self {
        Self {
            initial_grid: grid.clone(),
            initial_inventory: inventory.clone(),
            grid,
            inventory,
            settings,
            phase: SessionPhase::Aiming,
            fire_elapsed: 0.0,
            last_fire: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn inventory(&self) -> &MirrorInventory {
        &self.inventory
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Result of the most recent shot
    pub fn last_fire(&self) -> Option<&FireResult> {
        self.last_fire.as_ref()
    }

    /// (targets hit by the last shot, total targets)
    pub fn hit_counter(&self) -> (usize, usize) {
        let hit = self.last_fire.as_ref().map_or(0, |r| r.hit_targets.len());
        (hit, self.grid.targets().len())
    }

    fn ensure_aiming(&self) -> Result<()> {
        match self.phase {
            SessionPhase::Aiming => Ok(()),
            SessionPhase::Firing => Err(PuzzleError::Busy),
            SessionPhase::Solved => Err(PuzzleError::AlreadySolved),
        }
    }

    /// Trace every emitter and lock edits until the display period ends
    pub fn fire(&mut self) -> Result<&FireResult> {
        self.ensure_aiming()?;

        let ceiling = self.settings.step_ceiling(self.grid.size());
        let result = trace_all_with_ceiling(&self.grid, self.grid.emitters(), ceiling);
        log::info!(
            "Fired {} beam(s): {}/{} targets hit",
            result.traces.len(),
            result.hit_targets.len(),
            result.target_count
        );

        self.phase = SessionPhase::Firing;
        self.fire_elapsed = 0.0;
        Ok(&*self.last_fire.insert(result))
    }

    /// Advance session timers by `dt` seconds
    pub fn update(&mut self, dt: f32) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.phase != SessionPhase::Firing {
            return events;
        }

        self.fire_elapsed += dt.max(0.0);
        let won = self.last_fire.as_ref().is_some_and(|r| r.is_won());

        if won {
            if self.fire_elapsed >= self.settings.win_reveal_delay_secs {
                log::info!("Puzzle solved");
                self.phase = SessionPhase::Solved;
                events.push(SessionEvent::Solved);
            }
        } else if self.fire_elapsed >= self.settings.fire_duration_secs {
            self.phase = SessionPhase::Aiming;
            events.push(SessionEvent::FiringEnded);
        }

        events
    }

    pub fn move_mirror(&mut self, id: MirrorId, cell: IVec2) -> Result<()> {
        self.ensure_aiming()?;
        self.grid.move_mirror(id, cell)
    }

    /// Place a mirror from the inventory
    pub fn place_mirror(&mut self, kind: MirrorKind, cell: IVec2) -> Result<MirrorId> {
        self.ensure_aiming()?;
        if self.inventory.available(kind) == 0 {
            return Err(PuzzleError::InventoryExhausted(kind));
        }
        let id = self.grid.insert_mirror(kind, cell)?;
        self.inventory.take(kind)?;
        Ok(id)
    }

    /// Pick a mirror up and return it to the inventory
    pub fn remove_mirror(&mut self, id: MirrorId) -> Result<()> {
        self.ensure_aiming()?;
        let mirror = self.grid.remove_mirror(id)?;
        self.inventory.give_back(mirror.kind);
        Ok(())
    }

    /// Restore the starting layout
    pub fn reset(&mut self) {
        log::info!("Session reset");
        self.grid = self.initial_grid.clone();
        self.inventory = self.initial_inventory.clone();
        self.phase = SessionPhase::Aiming;
        self.fire_elapsed = 0.0;
        self.last_fire = None;
    }
}
