//! The single boundary that turns requested steps into interactor exchanges.
//! This module exists so every physical move is validated, recorded, and folded into map
//! knowledge in one place. It does not decide where to go next.

use std::hash::Hasher;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use xxhash_rust::xxh3::Xxh3;

use crate::error::ProtocolError;
use crate::grid::KnowledgeGrid;
use crate::neighborhood::perception_footprint;
use crate::types::{CellState, Coord, VisionVariant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub coord: Coord,
    pub state: CellState,
}

impl Observation {
    pub fn new(coord: Coord, state: CellState) -> Self {
        Self { coord, state }
    }
}

/// Something that answers move requests with newly visible cells.
///
/// Exactly one request is outstanding at a time; implementations block until the reply
/// has been read in full.
pub trait Interactor {
    fn request_move(&mut self, to: Coord) -> Result<Vec<Observation>, ProtocolError>;
}

impl<T: Interactor + ?Sized> Interactor for &mut T {
    fn request_move(&mut self, to: Coord) -> Result<Vec<Observation>, ProtocolError> {
        (**self).request_move(to)
    }
}

/// Every request issued to the interactor, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTrace {
    moves: Vec<Coord>,
}

impl MoveTrace {
    pub fn moves(&self) -> &[Coord] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// True when no request jumps more than one cell from the previous one.
    pub fn is_contiguous(&self) -> bool {
        self.moves.windows(2).all(|pair| pair[0].manhattan(pair[1]) <= 1)
    }

    pub fn digest(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.moves.len() as u64);
        for step in &self.moves {
            hasher.write_i32(step.row);
            hasher.write_i32(step.col);
        }
        hasher.finish()
    }

    fn push(&mut self, step: Coord) {
        self.moves.push(step);
    }
}

pub struct MoveProtocol<I> {
    interactor: I,
    grid: KnowledgeGrid,
    position: Coord,
    variant: VisionVariant,
    trace: MoveTrace,
}

impl<I: Interactor> MoveProtocol<I> {
    pub fn new(interactor: I, grid: KnowledgeGrid, start: Coord, variant: VisionVariant) -> Self {
        assert!(grid.in_bounds(start), "start {start} outside the {0}x{0} grid", grid.size());
        Self { interactor, grid, position: start, variant, trace: MoveTrace::default() }
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn grid(&self) -> &KnowledgeGrid {
        &self.grid
    }

    pub fn trace(&self) -> &MoveTrace {
        &self.trace
    }

    pub fn into_parts(self) -> (I, KnowledgeGrid, MoveTrace) {
        (self.interactor, self.grid, self.trace)
    }

    /// Records knowledge that arrives outside move replies, such as the handshake goal.
    pub fn note(&mut self, coord: Coord, state: CellState) -> Result<bool, ProtocolError> {
        self.check_reported(coord)?;
        Ok(self.grid.reveal(coord, state)?)
    }

    /// Requests the current cell once to learn the initial surroundings.
    pub fn look(&mut self) -> Result<usize, ProtocolError> {
        let here = self.position;
        self.exchange(here)
    }

    pub fn move_to(&mut self, to: Coord) -> Result<usize, ProtocolError> {
        assert!(self.grid.in_bounds(to), "move target {to} outside the grid");
        assert_eq!(
            self.position.manhattan(to),
            1,
            "non-adjacent move from {} to {to} with known cell {:?}",
            self.position,
            self.grid.get(to)
        );
        self.exchange(to)
    }

    /// Drops every known zone, then re-projects zones the pickup does not nullify.
    /// Returns `(cleared, reprojected)` cell counts.
    pub fn clear_zones_after_pickup(&mut self) -> (usize, usize) {
        let cleared = self.grid.clear_zones();
        let mut reprojected = 0;
        for (center, actor) in self.grid.actors() {
            if actor.zone_survives_pickup() {
                reprojected += self.grid.project_zone(actor, center);
            }
        }
        debug!(cleared, reprojected, "zones cleared after pickup");
        (cleared, reprojected)
    }

    fn exchange(&mut self, to: Coord) -> Result<usize, ProtocolError> {
        let observations = self.interactor.request_move(to)?;
        self.trace.push(to);
        self.position = to;

        let mut changed = 0;
        for observation in &observations {
            self.check_reported(observation.coord)?;
            if self.grid.reveal(observation.coord, observation.state)? {
                changed += 1;
            }
        }
        // The interactor lists only non-empty cells, so silence inside the footprint means empty.
        let silent = perception_footprint(self.variant, to)
            .into_iter()
            .chain([to])
            .filter(|coord| self.grid.in_bounds(*coord))
            .filter(|coord| self.grid.get(*coord) == CellState::Unknown)
            .collect::<Vec<_>>();
        for coord in silent {
            self.grid.reveal(coord, CellState::Empty)?;
            changed += 1;
        }

        trace!(to = %to, reported = observations.len(), changed, "move exchanged");
        Ok(changed)
    }

    fn check_reported(&self, coord: Coord) -> Result<(), ProtocolError> {
        if self.grid.in_bounds(coord) {
            Ok(())
        } else {
            Err(ProtocolError::OutOfBounds { coord, size: self.grid.size() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedReplies, SilentInteractor};
    use crate::types::HazardActor;

    #[test]
    fn move_folds_reports_and_marks_silent_footprint_empty() {
        let replies = ScriptedReplies::new(vec![vec![
            Observation::new(Coord::new(1, 1), CellState::HazardZone),
            Observation::new(Coord::new(2, 2), CellState::Obstacle(HazardActor::Hulk)),
        ]]);
        let mut protocol =
            MoveProtocol::new(replies, KnowledgeGrid::new(9), Coord::new(0, 0), VisionVariant::Far);

        let changed = protocol.look().expect("look");
        let grid = protocol.grid();
        assert_eq!(grid.get(Coord::new(1, 1)), CellState::HazardZone);
        assert_eq!(grid.get(Coord::new(2, 2)), CellState::Obstacle(HazardActor::Hulk));
        assert_eq!(grid.get(Coord::new(0, 1)), CellState::Empty);
        assert_eq!(grid.get(Coord::new(1, 0)), CellState::Empty);
        assert_eq!(grid.get(Coord::new(0, 0)), CellState::Empty);
        assert_eq!(grid.get(Coord::new(0, 2)), CellState::Unknown);
        assert_eq!(changed, 5);
        assert_eq!(protocol.trace().moves(), &[Coord::new(0, 0)]);
    }

    #[test]
    fn contradictory_report_fails_fast() {
        let replies = ScriptedReplies::new(vec![
            vec![],
            vec![Observation::new(Coord::new(0, 1), CellState::Obstacle(HazardActor::Thor))],
        ]);
        let grid = KnowledgeGrid::new(9);
        let mut protocol = MoveProtocol::new(replies, grid, Coord::new(0, 0), VisionVariant::Near);
        protocol.look().expect("look");

        let err = protocol.move_to(Coord::new(1, 0)).expect_err("empty cell turned into Thor");
        assert!(matches!(err, ProtocolError::Conflict(_)), "unexpected error {err:?}");
    }

    #[test]
    fn out_of_bounds_report_is_rejected() {
        let replies = ScriptedReplies::new(vec![vec![Observation::new(
            Coord::new(9, 0),
            CellState::HazardZone,
        )]]);
        let grid = KnowledgeGrid::new(9);
        let mut protocol = MoveProtocol::new(replies, grid, Coord::new(0, 0), VisionVariant::Near);
        let err = protocol.look().expect_err("row 9 is outside a 9x9 grid");
        assert!(matches!(err, ProtocolError::OutOfBounds { size: 9, .. }));
    }

    #[test]
    #[should_panic(expected = "non-adjacent move")]
    fn non_adjacent_move_is_a_programming_error() {
        let mut protocol = MoveProtocol::new(
            SilentInteractor::default(),
            KnowledgeGrid::new(9),
            Coord::new(0, 0),
            VisionVariant::Near,
        );
        let _ = protocol.move_to(Coord::new(1, 1));
    }

    #[test]
    fn clearing_after_pickup_keeps_marvel_zone() {
        let mut protocol = MoveProtocol::new(
            SilentInteractor::default(),
            KnowledgeGrid::new(9),
            Coord::new(0, 0),
            VisionVariant::Near,
        );
        let marvel = Coord::new(4, 4);
        protocol.note(marvel, CellState::Obstacle(HazardActor::CaptainMarvel)).expect("marvel");
        protocol.note(Coord::new(8, 8), CellState::Obstacle(HazardActor::Hulk)).expect("hulk");
        protocol.note(Coord::new(8, 7), CellState::HazardZone).expect("hulk zone");
        protocol.note(Coord::new(4, 6), CellState::HazardZone).expect("marvel zone");
        protocol.note(Coord::new(3, 4), CellState::HazardZone).expect("marvel zone");

        let (cleared, reprojected) = protocol.clear_zones_after_pickup();
        assert_eq!(cleared, 3);
        assert_eq!(reprojected, 2, "only cells known empty are re-projected");
        assert_eq!(protocol.grid().get(Coord::new(2, 4)), CellState::Unknown);
        assert_eq!(protocol.grid().get(Coord::new(8, 7)), CellState::Empty);
        assert_eq!(protocol.grid().get(Coord::new(4, 6)), CellState::HazardZone);
    }

    #[test]
    fn trace_digest_depends_on_order() {
        let mut forward = MoveProtocol::new(
            SilentInteractor::default(),
            KnowledgeGrid::new(9),
            Coord::new(0, 0),
            VisionVariant::Near,
        );
        forward.move_to(Coord::new(0, 1)).expect("step");
        forward.move_to(Coord::new(1, 1)).expect("step");

        let mut other = MoveProtocol::new(
            SilentInteractor::default(),
            KnowledgeGrid::new(9),
            Coord::new(0, 0),
            VisionVariant::Near,
        );
        other.move_to(Coord::new(1, 0)).expect("step");
        other.move_to(Coord::new(1, 1)).expect("step");

        assert!(forward.trace().is_contiguous());
        assert_ne!(forward.trace().digest(), other.trace().digest());
        assert_eq!(forward.position(), other.position());
    }
}
