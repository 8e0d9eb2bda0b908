//! Top-level strategy: the direct route versus a detour through the pickup.
//! This module exists to sequence the search phases and pick the shorter composed route.
//! It does not perform any I/O beyond what the protocol issues.

use serde::Serialize;
use tracing::info;

use crate::config::AgentConfig;
use crate::error::ProtocolError;
use crate::grid::KnowledgeGrid;
use crate::protocol::{Interactor, MoveProtocol, MoveTrace};
use crate::search::{Path, SearchOutcome, SearchPolicy, search};
use crate::types::{CellState, Coord, Handshake, LogEvent, Phase};
use crate::walker::relocate;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RouteReport {
    /// The chosen route, start and goal inclusive. `None` when the goal is unreachable.
    pub path: Option<Path>,
    pub direct: Path,
    pub via_pickup: Option<Path>,
    pub pickup: Option<Coord>,
    pub trace: MoveTrace,
    pub log: Vec<LogEvent>,
}

impl RouteReport {
    pub fn edges(&self) -> Option<u32> {
        self.path.as_ref().map(|path| path.len() as u32 - 1)
    }

    /// The integer printed after `e`: the edge count or `-1`.
    pub fn answer(&self) -> i64 {
        self.edges().map_or(-1, i64::from)
    }

    pub fn moves(&self) -> usize {
        self.trace.len()
    }

    pub fn trace_digest(&self) -> u64 {
        self.trace.digest()
    }
}

pub struct RouteComposer<I> {
    protocol: MoveProtocol<I>,
    start: Coord,
    goal: Coord,
    log: Vec<LogEvent>,
}

impl<I: Interactor> RouteComposer<I> {
    pub fn new(interactor: I, config: &AgentConfig, handshake: Handshake) -> Self {
        let grid = KnowledgeGrid::new(config.grid_size);
        let protocol = MoveProtocol::new(interactor, grid, config.start, handshake.variant);
        Self { protocol, start: config.start, goal: handshake.goal, log: Vec::new() }
    }

    pub fn run(mut self) -> Result<RouteReport, ProtocolError> {
        self.protocol.note(self.goal, CellState::Goal)?;
        self.protocol.look()?;

        let direct = self.run_phase(Phase::Direct, self.start, self.goal, SearchPolicy::DIRECT)?;
        let pickup = self.protocol.grid().find_pickup();
        let mut via_pickup = None;

        if let Some(pickup) = pickup {
            self.log.push(LogEvent::PickupSpotted { at: pickup });
            let moves = relocate(&mut self.protocol, &direct.forest, self.start)?;
            self.log.push(LogEvent::ReturnedToStart { moves });

            let to_pickup =
                self.run_phase(Phase::ToPickup, self.start, pickup, SearchPolicy::TO_PICKUP)?;
            if to_pickup.is_reachable() {
                let (cleared, reprojected) = self.protocol.clear_zones_after_pickup();
                self.log.push(LogEvent::ZonesCleared { cleared, reprojected });
                // Clearing also wiped the zones reported around the pickup itself.
                self.protocol.look()?;

                let from_pickup =
                    self.run_phase(Phase::FromPickup, pickup, self.goal, SearchPolicy::DIRECT)?;
                if from_pickup.is_reachable() {
                    via_pickup = Some(compose(to_pickup.path, from_pickup.path));
                }
            }
        }

        let path = choose(&direct.path, via_pickup.as_ref());
        let (_, _, trace) = self.protocol.into_parts();
        let report =
            RouteReport { path, direct: direct.path, via_pickup, pickup, trace, log: self.log };
        info!(
            answer = report.answer(),
            moves = report.moves(),
            digest = report.trace_digest(),
            "route decided"
        );
        Ok(report)
    }

    fn run_phase(
        &mut self,
        phase: Phase,
        from: Coord,
        to: Coord,
        policy: SearchPolicy,
    ) -> Result<SearchOutcome, ProtocolError> {
        self.log.push(LogEvent::PhaseStarted { phase, from, to });
        let outcome = search(&mut self.protocol, from, to, policy)?;
        self.log.push(LogEvent::PhaseFinished {
            phase,
            edges: outcome.edges(),
            expanded: outcome.expanded,
        });
        info!(?phase, edges = ?outcome.edges(), expanded = outcome.expanded, "phase finished");
        Ok(outcome)
    }
}

/// Joins the two legs, keeping the pickup cell once.
fn compose(mut to_pickup: Path, from_pickup: Path) -> Path {
    to_pickup.pop();
    to_pickup.extend(from_pickup);
    to_pickup
}

/// The detour wins only when strictly shorter.
fn choose(direct: &Path, via_pickup: Option<&Path>) -> Option<Path> {
    match via_pickup {
        Some(via) if direct.is_empty() || via.len() < direct.len() => Some(via.clone()),
        _ if !direct.is_empty() => Some(direct.clone()),
        _ => None,
    }
}
