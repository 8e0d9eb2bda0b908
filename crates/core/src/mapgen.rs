//! Seeded random world maps with the classic placement rules.
//! This module exists so tools and fuzz tests draw from the same reproducible map family.
//! It does not validate that a generated goal is reachable.

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

use crate::neighborhood::{in_moore, in_von_neumann};
use crate::types::{Coord, DEFAULT_GRID_SIZE, HazardActor};
use crate::world::{WorldCell, WorldMap};

const MAX_DRAWS: usize = 10_000;

/// Where each feature landed, kept alongside the map for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub thor: Coord,
    pub hulk: Coord,
    pub marvel: Coord,
    pub pickup: Coord,
    pub goal: Coord,
}

pub struct MapGenerator {
    rng: ChaCha8Rng,
    size: usize,
    start: Coord,
}

impl MapGenerator {
    pub fn new(seed: u64) -> Self {
        Self::with_size(seed, DEFAULT_GRID_SIZE, Coord::new(0, 0))
    }

    pub fn with_size(seed: u64, size: usize, start: Coord) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), size, start }
    }

    /// Draws one placement. `None` when the grid is too small to satisfy every rule.
    pub fn place(&mut self) -> Option<Placement> {
        let start = self.start;
        let thor = self.draw(|c| !in_moore(c, start, 1))?;
        let hulk = self.draw(|c| c != thor && !in_von_neumann(c, start, 1))?;
        let marvel = self.draw(|c| c != thor && c != hulk && !in_von_neumann(c, start, 2))?;
        let clear_of_zones = move |c: Coord| {
            !in_von_neumann(c, marvel, 2) && !in_von_neumann(c, hulk, 1) && !in_moore(c, thor, 1)
        };
        let pickup = self.draw(|c| clear_of_zones(c) && c != start)?;
        let goal = self.draw(|c| clear_of_zones(c) && c != start && c != pickup)?;
        Some(Placement { thor, hulk, marvel, pickup, goal })
    }

    pub fn generate(&mut self) -> Option<(WorldMap, Placement)> {
        let placement = self.place()?;
        let mut map = WorldMap::new(self.size, placement.goal);
        map.set(placement.thor, WorldCell::Actor(HazardActor::Thor));
        map.set(placement.hulk, WorldCell::Actor(HazardActor::Hulk));
        map.set(placement.marvel, WorldCell::Actor(HazardActor::CaptainMarvel));
        map.set(placement.pickup, WorldCell::Pickup);
        Some((map, placement))
    }

    fn draw(&mut self, accept: impl Fn(Coord) -> bool) -> Option<Coord> {
        let size = self.size as u64;
        if size == 0 {
            return None;
        }
        for _ in 0..MAX_DRAWS {
            let row = (self.rng.next_u64() % size) as i32;
            let col = (self.rng.next_u64() % size) as i32;
            let candidate = Coord::new(row, col);
            if accept(candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

/// One map from a seed on the default 9×9 grid.
pub fn generate_map(seed: u64) -> Option<WorldMap> {
    MapGenerator::new(seed).generate().map(|(map, _)| map)
}
