//! Shared interactor doubles for the unit test suites.
//! This module exists to avoid repeating fake interactor plumbing across modules.
//! It does not own production protocol logic.

use std::collections::VecDeque;

use crate::error::ProtocolError;
use crate::grid::KnowledgeGrid;
use crate::protocol::{Interactor, MoveProtocol, Observation};
use crate::types::{CellState, Coord, HazardActor, VisionVariant};

/// Accepts every move and never reports anything.
#[derive(Debug, Default)]
pub(crate) struct SilentInteractor {
    pub(crate) requests: Vec<Coord>,
}

impl Interactor for SilentInteractor {
    fn request_move(&mut self, to: Coord) -> Result<Vec<Observation>, ProtocolError> {
        self.requests.push(to);
        Ok(Vec::new())
    }
}

/// Plays back canned replies in order, then falls silent.
#[derive(Debug)]
pub(crate) struct ScriptedReplies {
    replies: VecDeque<Vec<Observation>>,
}

impl ScriptedReplies {
    pub(crate) fn new(replies: Vec<Vec<Observation>>) -> Self {
        Self { replies: replies.into() }
    }
}

impl Interactor for ScriptedReplies {
    fn request_move(&mut self, _to: Coord) -> Result<Vec<Observation>, ProtocolError> {
        Ok(self.replies.pop_front().unwrap_or_default())
    }
}

/// A silent protocol over a grid whose obstacles are already known.
pub(crate) fn known_grid_protocol(
    size: usize,
    obstacles: &[Coord],
    start: Coord,
) -> MoveProtocol<SilentInteractor> {
    let mut grid = KnowledgeGrid::new(size);
    for coord in obstacles {
        grid.reveal(*coord, CellState::Obstacle(HazardActor::Hulk)).expect("fixture obstacle");
    }
    MoveProtocol::new(SilentInteractor::default(), grid, start, VisionVariant::Near)
}

/// Row 1 blocked except its last cell, so reaching row 2 needs a long detour.
pub(crate) fn gap_wall_obstacles(size: usize) -> Vec<Coord> {
    (0..size as i32 - 1).map(|col| Coord::new(1, col)).collect()
}
