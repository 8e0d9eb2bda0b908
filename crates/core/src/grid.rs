//! Partial knowledge of the N×N map as revealed by the interactor.

use crate::error::RevealConflict;
use crate::neighborhood::{in_bounds, zone_cells};
use crate::types::{CellState, Coord, HazardActor};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnowledgeGrid {
    size: usize,
    cells: Vec<CellState>,
}

impl KnowledgeGrid {
    pub fn new(size: usize) -> Self {
        Self { size, cells: vec![CellState::Unknown; size * size] }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        in_bounds(self.size, coord)
    }

    pub fn get(&self, coord: Coord) -> CellState {
        self.cells[self.index(coord)]
    }

    /// Unknown cells count as passable: planning is optimistic about fog.
    pub fn is_passable(&self, coord: Coord, bypass_zones: bool) -> bool {
        match self.get(coord) {
            CellState::Obstacle(_) => false,
            CellState::HazardZone => bypass_zones,
            _ => true,
        }
    }

    /// Records a reported state. Returns whether the cell changed.
    pub fn reveal(&mut self, coord: Coord, state: CellState) -> Result<bool, RevealConflict> {
        let idx = self.index(coord);
        let current = self.cells[idx];
        if current == state {
            return Ok(false);
        }
        let allowed = matches!(
            (current, state),
            (CellState::Unknown, _)
                | (CellState::HazardZone, CellState::Empty)
                | (CellState::Empty, CellState::HazardZone)
        );
        if !allowed {
            return Err(RevealConflict { coord, current, reported: state });
        }
        self.cells[idx] = state;
        Ok(true)
    }

    pub fn clear_zones(&mut self) -> usize {
        let mut cleared = 0;
        for cell in &mut self.cells {
            if *cell == CellState::HazardZone {
                *cell = CellState::Empty;
                cleared += 1;
            }
        }
        cleared
    }

    /// Marks the actor's zone around `center` on cells already known to be empty.
    /// Unknown cells are left alone since they may still hide an actor or feature.
    pub fn project_zone(&mut self, actor: HazardActor, center: Coord) -> usize {
        let mut projected = 0;
        for coord in zone_cells(actor, center, self.size) {
            let idx = self.index(coord);
            if self.cells[idx] == CellState::Empty {
                self.cells[idx] = CellState::HazardZone;
                projected += 1;
            }
        }
        projected
    }

    pub fn find_pickup(&self) -> Option<Coord> {
        self.coords().find(|coord| self.get(*coord) == CellState::Pickup)
    }

    pub fn actors(&self) -> Vec<(Coord, HazardActor)> {
        self.coords()
            .filter_map(|coord| match self.get(coord) {
                CellState::Obstacle(actor) => Some((coord, actor)),
                _ => None,
            })
            .collect()
    }

    /// Row-major iteration over every coordinate.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let size = self.size as i32;
        (0..size).flat_map(move |row| (0..size).map(move |col| Coord::new(row, col)))
    }

    pub fn render(&self) -> String {
        let mut text = String::new();
        for row in 0..self.size {
            let line: Vec<String> = (0..self.size)
                .map(|col| {
                    let state = self.get(Coord::new(row as i32, col as i32));
                    state.symbol().unwrap_or('?').to_string()
                })
                .collect();
            text.push_str(&line.join(" "));
            text.push('\n');
        }
        text
    }

    fn index(&self, coord: Coord) -> usize {
        assert!(
            self.in_bounds(coord),
            "coordinate {coord} outside the {}x{} grid",
            self.size,
            self.size
        );
        (coord.row as usize) * self.size + (coord.col as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_cells_are_passable_until_revealed() {
        let mut grid = KnowledgeGrid::new(9);
        let cell = Coord::new(2, 3);
        assert!(grid.is_passable(cell, false));

        grid.reveal(cell, CellState::Obstacle(HazardActor::Thor)).expect("first reveal");
        assert!(!grid.is_passable(cell, false));
        assert!(!grid.is_passable(cell, true), "bypass never opens obstacles");
    }

    #[test]
    fn hazard_zone_is_passable_only_with_bypass() {
        let mut grid = KnowledgeGrid::new(9);
        let cell = Coord::new(1, 1);
        grid.reveal(cell, CellState::HazardZone).expect("zone reveal");
        assert!(!grid.is_passable(cell, false));
        assert!(grid.is_passable(cell, true));
    }

    #[test]
    fn reveal_rejects_contradictions_and_keeps_state() {
        let mut grid = KnowledgeGrid::new(9);
        let cell = Coord::new(4, 4);
        grid.reveal(cell, CellState::Empty).expect("empty reveal");

        let err = grid
            .reveal(cell, CellState::Obstacle(HazardActor::Hulk))
            .expect_err("empty cell cannot become an obstacle");
        assert_eq!(err.current, CellState::Empty);
        assert_eq!(grid.get(cell), CellState::Empty);

        assert_eq!(grid.reveal(cell, CellState::Empty), Ok(false));
        assert_eq!(grid.reveal(cell, CellState::HazardZone), Ok(true));
        assert_eq!(grid.reveal(cell, CellState::Empty), Ok(true));
        assert!(grid.reveal(cell, CellState::Unknown).is_err());
    }

    #[test]
    fn clearing_zones_then_projecting_marvel_restores_only_her_zone() {
        let mut grid = KnowledgeGrid::new(9);
        let marvel = Coord::new(6, 6);
        let hulk = Coord::new(1, 1);
        grid.reveal(marvel, CellState::Obstacle(HazardActor::CaptainMarvel)).expect("marvel");
        grid.reveal(hulk, CellState::Obstacle(HazardActor::Hulk)).expect("hulk");
        grid.reveal(Coord::new(1, 2), CellState::HazardZone).expect("hulk zone");
        grid.reveal(Coord::new(6, 4), CellState::HazardZone).expect("marvel zone");
        grid.reveal(Coord::new(6, 8), CellState::Goal).expect("goal");
        grid.reveal(Coord::new(5, 6), CellState::Empty).expect("empty");

        assert_eq!(grid.clear_zones(), 2);
        assert_eq!(grid.get(Coord::new(1, 2)), CellState::Empty);

        let projected = grid.project_zone(HazardActor::CaptainMarvel, marvel);
        assert_eq!(projected, 2);
        assert_eq!(grid.get(Coord::new(6, 4)), CellState::HazardZone);
        assert_eq!(grid.get(Coord::new(5, 6)), CellState::HazardZone);
        assert_eq!(grid.get(Coord::new(6, 8)), CellState::Goal);
        assert_eq!(grid.get(Coord::new(7, 6)), CellState::Unknown);
        assert_eq!(grid.get(Coord::new(1, 2)), CellState::Empty);
    }

    #[test]
    fn pickup_and_actor_queries_scan_row_major() {
        let mut grid = KnowledgeGrid::new(5);
        assert_eq!(grid.find_pickup(), None);
        grid.reveal(Coord::new(3, 1), CellState::Pickup).expect("pickup");
        grid.reveal(Coord::new(0, 4), CellState::Obstacle(HazardActor::Thor)).expect("thor");
        grid.reveal(Coord::new(2, 2), CellState::Obstacle(HazardActor::Hulk)).expect("hulk");

        assert_eq!(grid.find_pickup(), Some(Coord::new(3, 1)));
        assert_eq!(
            grid.actors(),
            vec![(Coord::new(0, 4), HazardActor::Thor), (Coord::new(2, 2), HazardActor::Hulk)]
        );
    }

    #[test]
    fn render_marks_unknown_cells() {
        let mut grid = KnowledgeGrid::new(3);
        grid.reveal(Coord::new(0, 0), CellState::Empty).expect("empty");
        grid.reveal(Coord::new(1, 1), CellState::Pickup).expect("pickup");
        assert_eq!(grid.render(), ". ? ?\n? S ?\n? ? ?\n");
    }

    #[test]
    #[should_panic(expected = "outside the 9x9 grid")]
    fn out_of_bounds_access_is_a_programming_error() {
        let grid = KnowledgeGrid::new(9);
        let _ = grid.get(Coord::new(9, 0));
    }
}
