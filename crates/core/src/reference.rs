//! Full-knowledge breadth-first distances used to judge the interactive agent.
//! This module exists so tests and tools can compute the true answer for a map.
//! It does not issue moves.

use std::collections::{BTreeMap, VecDeque};

use crate::neighborhood::neighbors;
use crate::types::{CellState, Coord};
use crate::world::WorldMap;

/// Which cells a reference walk may enter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// Zones block; the pickup cell is off limits so the walk never collects it.
    Unshielded,
    /// After the pickup: only zones that survive it still block.
    Shielded,
    /// Zones are ignored entirely; only actors block.
    IgnoreZones,
}

impl Traversal {
    fn permits(self, map: &WorldMap, coord: Coord, target: Coord) -> bool {
        if !map.in_bounds(coord) {
            return false;
        }
        let state = match self {
            Traversal::Unshielded | Traversal::IgnoreZones => map.truth(coord, false),
            Traversal::Shielded => map.truth(coord, true),
        };
        match state {
            CellState::Obstacle(_) => false,
            CellState::HazardZone => self == Traversal::IgnoreZones,
            CellState::Pickup => self != Traversal::Unshielded || coord == target,
            _ => true,
        }
    }
}

/// Fewest edges from `from` to `to`, or `None` when no walk exists.
pub fn shortest_edges(map: &WorldMap, from: Coord, to: Coord, traversal: Traversal) -> Option<u32> {
    let mut dist = BTreeMap::new();
    let mut queue = VecDeque::new();
    dist.insert(from, 0u32);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        let d = dist[&current];
        if current == to {
            return Some(d);
        }
        for next in neighbors(current) {
            if traversal.permits(map, next, to) && !dist.contains_key(&next) {
                dist.insert(next, d + 1);
                queue.push_back(next);
            }
        }
    }
    None
}

/// The optimal answer with full knowledge: direct, or through the pickup when strictly shorter.
pub fn reference_answer(map: &WorldMap, start: Coord) -> Option<u32> {
    let goal = map.goal();
    let direct = shortest_edges(map, start, goal, Traversal::Unshielded);
    let via_pickup = map.pickup().and_then(|pickup| {
        let to_pickup = shortest_edges(map, start, pickup, Traversal::Unshielded)?;
        let from_pickup = shortest_edges(map, pickup, goal, Traversal::Shielded)?;
        Some(to_pickup + from_pickup)
    });
    match (direct, via_pickup) {
        (Some(direct), Some(via)) => Some(direct.min(via)),
        (direct, via) => direct.or(via),
    }
}

/// No route can beat the shortest walk that treats every zone as open.
pub fn lower_bound(map: &WorldMap, start: Coord) -> Option<u32> {
    shortest_edges(map, start, map.goal(), Traversal::IgnoreZones)
}
