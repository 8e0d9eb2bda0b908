//! Ground-truth maps and an in-process interactor that validates every move against them.
//! This module exists so the agent can be exercised end to end without an external judge.
//! It does not plan routes.

use tracing::debug;

use crate::error::{ProtocolError, WorldMapError};
use crate::neighborhood::{in_bounds, perception_footprint, zone_contains};
use crate::protocol::{Interactor, Observation};
use crate::types::{CellState, Coord, HazardActor, VisionVariant};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WorldCell {
    #[default]
    Empty,
    Actor(HazardActor),
    Pickup,
    Goal,
}

impl WorldCell {
    /// Map text symbol. Zones are derived from actors, so `P` and the agent marker `A` read as
    /// empty.
    pub fn from_symbol(symbol: char) -> Option<WorldCell> {
        match symbol {
            '.' | 'P' | 'A' => Some(WorldCell::Empty),
            'H' => Some(WorldCell::Actor(HazardActor::Hulk)),
            'T' => Some(WorldCell::Actor(HazardActor::Thor)),
            'M' => Some(WorldCell::Actor(HazardActor::CaptainMarvel)),
            'S' => Some(WorldCell::Pickup),
            'I' => Some(WorldCell::Goal),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldMap {
    size: usize,
    cells: Vec<WorldCell>,
    goal: Coord,
}

impl WorldMap {
    /// An actor-free map with only the goal placed.
    pub fn new(size: usize, goal: Coord) -> Self {
        let mut map = Self { size, cells: vec![WorldCell::Empty; size * size], goal };
        map.set(goal, WorldCell::Goal);
        map
    }

    /// Parses whitespace-separated rows of single-character symbols.
    pub fn parse(text: &str) -> Result<Self, WorldMapError> {
        let rows: Vec<Vec<&str>> = text
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        let size = rows.len();
        if size == 0 {
            return Err(WorldMapError::Empty);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(WorldMapError::RaggedRow { row: r, found: row.len(), expected: size });
            }
            for (c, token) in row.iter().enumerate() {
                let coord = Coord::new(r as i32, c as i32);
                let mut chars = token.chars();
                let cell = match (chars.next(), chars.next()) {
                    (Some(symbol), None) => WorldCell::from_symbol(symbol),
                    _ => None,
                };
                let cell = cell.ok_or_else(|| WorldMapError::UnknownSymbol {
                    symbol: token.to_string(),
                    coord,
                })?;
                cells.push(cell);
            }
        }

        let find = |wanted: WorldCell| -> Vec<Coord> {
            cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| **cell == wanted)
                .map(|(i, _)| Coord::new((i / size) as i32, (i % size) as i32))
                .collect()
        };
        let goals = find(WorldCell::Goal);
        let [goal] = goals.as_slice() else {
            return Err(WorldMapError::GoalCount { count: goals.len() });
        };
        let pickups = find(WorldCell::Pickup).len();
        if pickups > 1 {
            return Err(WorldMapError::PickupCount { count: pickups });
        }
        Ok(Self { size, goal: *goal, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn goal(&self) -> Coord {
        self.goal
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        in_bounds(self.size, coord)
    }

    pub fn get(&self, coord: Coord) -> WorldCell {
        self.cells[self.index(coord)]
    }

    /// Places a cell. Placing a goal moves the goal.
    pub fn set(&mut self, coord: Coord, cell: WorldCell) {
        if cell == WorldCell::Goal && coord != self.goal {
            let old = self.index(self.goal);
            if self.cells[old] == WorldCell::Goal {
                self.cells[old] = WorldCell::Empty;
            }
            self.goal = coord;
        }
        let idx = self.index(coord);
        self.cells[idx] = cell;
    }

    pub fn pickup(&self) -> Option<Coord> {
        self.coords().find(|coord| self.get(*coord) == WorldCell::Pickup)
    }

    pub fn actors(&self) -> Vec<(Coord, HazardActor)> {
        self.coords()
            .filter_map(|coord| match self.get(coord) {
                WorldCell::Actor(actor) => Some((coord, actor)),
                _ => None,
            })
            .collect()
    }

    /// Whether some actor's zone covers `coord` for an agent with the given shield status.
    pub fn zone_at(&self, coord: Coord, shielded: bool) -> bool {
        self.actors().into_iter().any(|(center, actor)| {
            (!shielded || actor.zone_survives_pickup()) && zone_contains(actor, center, coord)
        })
    }

    /// The state the interactor reports for `coord`. Actors and features shadow zones.
    pub fn truth(&self, coord: Coord, shielded: bool) -> CellState {
        match self.get(coord) {
            WorldCell::Actor(actor) => CellState::Obstacle(actor),
            WorldCell::Pickup => CellState::Pickup,
            WorldCell::Goal => CellState::Goal,
            WorldCell::Empty if self.zone_at(coord, shielded) => CellState::HazardZone,
            WorldCell::Empty => CellState::Empty,
        }
    }

    pub fn is_enterable(&self, coord: Coord, shielded: bool) -> bool {
        self.in_bounds(coord)
            && !matches!(
                self.truth(coord, shielded),
                CellState::Obstacle(_) | CellState::HazardZone
            )
    }

    /// Unshielded view, one row per line.
    pub fn render(&self) -> String {
        let mut text = String::new();
        for row in 0..self.size as i32 {
            let line: Vec<String> = (0..self.size as i32)
                .map(|col| {
                    let state = self.truth(Coord::new(row, col), false);
                    state.symbol().unwrap_or('?').to_string()
                })
                .collect();
            text.push_str(&line.join(" "));
            text.push('\n');
        }
        text
    }

    fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let size = self.size as i32;
        (0..size).flat_map(move |row| (0..size).map(move |col| Coord::new(row, col)))
    }

    fn index(&self, coord: Coord) -> usize {
        assert!(self.in_bounds(coord), "coordinate {coord} outside the {0}x{0} map", self.size);
        (coord.row as usize) * self.size + (coord.col as usize)
    }
}

/// Plays the interactor against a known map, refusing any illegal step.
#[derive(Clone, Debug)]
pub struct ScriptedWorld {
    map: WorldMap,
    variant: VisionVariant,
    position: Coord,
    shielded: bool,
    accepted: Vec<Coord>,
}

impl ScriptedWorld {
    pub fn new(map: WorldMap, variant: VisionVariant, start: Coord) -> Self {
        Self { map, variant, position: start, shielded: false, accepted: Vec::new() }
    }

    pub fn is_shielded(&self) -> bool {
        self.shielded
    }

    pub fn accepted_moves(&self) -> &[Coord] {
        &self.accepted
    }

    fn surroundings(&self, center: Coord) -> Vec<Observation> {
        perception_footprint(self.variant, center)
            .into_iter()
            .filter(|coord| self.map.in_bounds(*coord))
            .filter_map(|coord| match self.map.truth(coord, self.shielded) {
                CellState::Empty => None,
                state => Some(Observation::new(coord, state)),
            })
            .collect()
    }
}

impl Interactor for ScriptedWorld {
    fn request_move(&mut self, to: Coord) -> Result<Vec<Observation>, ProtocolError> {
        let from = self.position;
        let reject = |reason| ProtocolError::Rejected { from, to, reason };
        if !self.map.in_bounds(to) {
            return Err(reject("target outside the map"));
        }
        if from.manhattan(to) > 1 {
            return Err(reject("target is not adjacent"));
        }
        match self.map.truth(to, self.shielded) {
            CellState::Obstacle(_) => return Err(reject("target holds an actor")),
            CellState::HazardZone => return Err(reject("target lies in a perception zone")),
            _ => {}
        }

        self.position = to;
        self.accepted.push(to);
        if self.map.get(to) == WorldCell::Pickup && !self.shielded {
            self.shielded = true;
            debug!(at = %to, "pickup collected");
        }
        Ok(self.surroundings(to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
        A . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . . . . . .
        . . . . M . . . .
        . . . . . . . . .
        . . S . . . . . .
        . . . . . . . H .
        . . . . . . . . I
    ";

    #[test]
    fn parse_reads_cells_goal_and_pickup() {
        let map = WorldMap::parse(SAMPLE).expect("sample map");
        assert_eq!(map.size(), 9);
        assert_eq!(map.goal(), Coord::new(8, 8));
        assert_eq!(map.pickup(), Some(Coord::new(6, 2)));
        assert_eq!(
            map.actors(),
            vec![
                (Coord::new(4, 4), HazardActor::CaptainMarvel),
                (Coord::new(7, 7), HazardActor::Hulk)
            ]
        );
    }

    #[test]
    fn parse_rejects_malformed_maps() {
        assert_eq!(WorldMap::parse("  \n"), Err(WorldMapError::Empty));
        assert_eq!(
            WorldMap::parse(". .\nI"),
            Err(WorldMapError::RaggedRow { row: 1, found: 1, expected: 2 })
        );
        assert!(matches!(WorldMap::parse(". x\nI ."), Err(WorldMapError::UnknownSymbol { .. })));
        assert_eq!(WorldMap::parse(". .\n. ."), Err(WorldMapError::GoalCount { count: 0 }));
        assert_eq!(WorldMap::parse("S S\n. I"), Err(WorldMapError::PickupCount { count: 2 }));
    }

    #[test]
    fn shield_nullifies_every_zone_but_marvels() {
        let map = WorldMap::parse(SAMPLE).expect("sample map");
        let hulk_zone = Coord::new(7, 8);
        let marvel_zone = Coord::new(4, 6);
        assert_eq!(map.truth(hulk_zone, false), CellState::HazardZone);
        assert_eq!(map.truth(hulk_zone, true), CellState::Empty);
        assert_eq!(map.truth(marvel_zone, true), CellState::HazardZone);
        assert_eq!(map.truth(Coord::new(8, 8), false), CellState::Goal);
    }

    #[test]
    fn world_rejects_teleports_and_unsafe_cells() {
        let mut map = WorldMap::new(5, Coord::new(4, 4));
        map.set(Coord::new(0, 2), WorldCell::Actor(HazardActor::Hulk));
        let mut world = ScriptedWorld::new(map, VisionVariant::Near, Coord::new(0, 0));

        let teleport = world.request_move(Coord::new(2, 0));
        assert!(matches!(teleport, Err(ProtocolError::Rejected { .. })));
        let seen = world.request_move(Coord::new(0, 0)).expect("look in place");
        assert_eq!(seen, vec![Observation::new(Coord::new(0, 1), CellState::HazardZone)]);
        let into_zone = world.request_move(Coord::new(0, 1));
        assert!(matches!(into_zone, Err(ProtocolError::Rejected { .. })));

        let seen = world.request_move(Coord::new(1, 0)).expect("safe step");
        assert_eq!(seen, vec![Observation::new(Coord::new(0, 1), CellState::HazardZone)]);
        assert_eq!(world.accepted_moves(), &[Coord::new(0, 0), Coord::new(1, 0)]);
    }

    #[test]
    fn stepping_on_the_pickup_shields_the_agent() {
        let mut map = WorldMap::new(5, Coord::new(4, 4));
        map.set(Coord::new(0, 1), WorldCell::Pickup);
        map.set(Coord::new(2, 1), WorldCell::Actor(HazardActor::Thor));
        let mut world = ScriptedWorld::new(map, VisionVariant::Near, Coord::new(0, 0));

        let before = world.request_move(Coord::new(0, 0)).expect("look");
        assert!(before.contains(&Observation::new(Coord::new(1, 1), CellState::HazardZone)));
        let after = world.request_move(Coord::new(0, 1)).expect("pickup");
        assert!(world.is_shielded());
        assert!(after.iter().all(|obs| obs.state != CellState::HazardZone));
        world.request_move(Coord::new(1, 1)).expect("zone is harmless now");
    }

    #[test]
    fn set_goal_moves_it() {
        let mut map = WorldMap::new(3, Coord::new(2, 2));
        map.set(Coord::new(0, 2), WorldCell::Goal);
        assert_eq!(map.goal(), Coord::new(0, 2));
        assert_eq!(map.get(Coord::new(2, 2)), WorldCell::Empty);
        assert_eq!(map.render(), ". . I\n. . .\n. . .\n");
    }
}
