//! Interactive A* over partially known terrain.
//! This module exists so the shortest-path rules stay in one deterministic place while the agent
//! physically visits every node it expands. It does not choose between routes or phases.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::ProtocolError;
use crate::grid::KnowledgeGrid;
use crate::neighborhood::neighbors;
use crate::protocol::{Interactor, MoveProtocol};
use crate::types::{CellState, Coord};
use crate::walker::relocate;

/// Start and goal inclusive; empty when the goal is unreachable.
pub type Path = Vec<Coord>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchPolicy {
    /// The pickup cell may be entered. Off while hunting the goal directly.
    pub allow_pickup: bool,
    /// Known hazard zones count as passable.
    pub bypass_zones: bool,
}

impl SearchPolicy {
    pub const DIRECT: SearchPolicy = SearchPolicy { allow_pickup: false, bypass_zones: false };
    pub const TO_PICKUP: SearchPolicy = SearchPolicy { allow_pickup: true, bypass_zones: false };

    pub fn permits(self, grid: &KnowledgeGrid, coord: Coord) -> bool {
        grid.in_bounds(coord)
            && grid.is_passable(coord, self.bypass_zones)
            && (self.allow_pickup || grid.get(coord) != CellState::Pickup)
    }
}

/// Parent links recorded while expanding, rooted at the search start.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParentForest {
    parents: BTreeMap<Coord, Coord>,
}

impl ParentForest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parent(&self, coord: Coord) -> Option<Coord> {
        self.parents.get(&coord).copied()
    }

    pub fn link(&mut self, child: Coord, parent: Coord) {
        self.parents.insert(child, parent);
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Chain from the root down to `coord`, both ends included.
    pub fn lineage(&self, coord: Coord) -> Vec<Coord> {
        let mut chain = vec![coord];
        let mut current = coord;
        while let Some(parent) = self.parent(current) {
            assert!(chain.len() <= self.parents.len(), "parent links form a cycle through {coord}");
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub path: Path,
    pub forest: ParentForest,
    /// Nodes the agent physically visited while searching.
    pub expanded: usize,
}

impl SearchOutcome {
    pub fn is_reachable(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn edges(&self) -> Option<u32> {
        self.path.len().checked_sub(1).map(|edges| edges as u32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    seq: u64,
    g: u32,
    pos: Coord,
}

/// g-score of cells not reached yet: `size³`, saturating at `u32::MAX`.
fn unreached_score(size: usize) -> u32 {
    size.checked_pow(3).and_then(|cube| u32::try_from(cube).ok()).unwrap_or(u32::MAX)
}

/// Runs A* from `start`, walking the agent to every node before expanding it.
///
/// Equal `f` values pop in insertion order. Entries whose `g` no longer matches the best known
/// score are skipped, as are nodes that became impassable after they were queued.
pub fn search<I: Interactor>(
    protocol: &mut MoveProtocol<I>,
    start: Coord,
    goal: Coord,
    policy: SearchPolicy,
) -> Result<SearchOutcome, ProtocolError> {
    assert_eq!(protocol.position(), start, "search must begin where the agent stands");
    let size = protocol.grid().size();
    let unreached = unreached_score(size);
    let index = |c: Coord| (c.row as usize) * size + (c.col as usize);

    let mut g_score = vec![unreached; size * size];
    let mut forest = ParentForest::new();
    let mut open_set = BTreeSet::new();
    let mut seq = 0u64;
    let mut expanded = 0;

    g_score[index(start)] = 0;
    open_set.insert(OpenNode { f: start.manhattan(goal), seq, g: 0, pos: start });

    while let Some(node) = open_set.pop_first() {
        if node.g != g_score[index(node.pos)] {
            continue;
        }
        if node.pos != start && !policy.permits(protocol.grid(), node.pos) {
            continue;
        }
        relocate(protocol, &forest, node.pos)?;
        expanded += 1;

        if node.pos == goal {
            let path = forest.lineage(goal);
            debug!(from = %start, to = %goal, edges = path.len() - 1, expanded, "goal reached");
            return Ok(SearchOutcome { path, forest, expanded });
        }

        for next in neighbors(node.pos) {
            if !policy.permits(protocol.grid(), next) {
                continue;
            }
            let tentative = node.g + 1;
            if tentative < g_score[index(next)] {
                forest.link(next, node.pos);
                g_score[index(next)] = tentative;
                seq += 1;
                open_set.insert(OpenNode {
                    f: tentative + next.manhattan(goal),
                    seq,
                    g: tentative,
                    pos: next,
                });
            }
        }
    }

    debug!(from = %start, to = %goal, expanded, "goal unreachable");
    Ok(SearchOutcome { path: Vec::new(), forest, expanded })
}
