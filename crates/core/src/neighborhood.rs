//! Pure geometric predicates over grid coordinates.
//! This module exists so movement adjacency, perception footprints, and hazard-zone projection
//! share one definition. It does not read or write map knowledge.

use crate::types::{Coord, HazardActor, VisionVariant, ZoneShape};

const MOORE_RING: [(i32, i32); 8] =
    [(1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)];
const FAR_CORNERS: [(i32, i32); 4] = [(2, 2), (-2, 2), (-2, -2), (2, -2)];

/// Movement neighbors in expansion order: down, right, up, left.
pub fn neighbors(c: Coord) -> [Coord; 4] {
    [c.offset(1, 0), c.offset(0, 1), c.offset(-1, 0), c.offset(0, -1)]
}

pub fn in_bounds(size: usize, c: Coord) -> bool {
    c.row >= 0 && c.col >= 0 && (c.row as usize) < size && (c.col as usize) < size
}

pub fn in_moore(point: Coord, center: Coord, r: u32) -> bool {
    point.row.abs_diff(center.row) <= r && point.col.abs_diff(center.col) <= r
}

pub fn in_von_neumann(point: Coord, center: Coord, r: u32) -> bool {
    point.manhattan(center) <= r
}

/// Cells reported to the agent after it lands on `center`, not clipped to the grid.
pub fn perception_footprint(variant: VisionVariant, center: Coord) -> Vec<Coord> {
    let mut cells: Vec<Coord> = MOORE_RING.iter().map(|(dr, dc)| center.offset(*dr, *dc)).collect();
    if variant == VisionVariant::Far {
        cells.extend(FAR_CORNERS.iter().map(|(dr, dc)| center.offset(*dr, *dc)));
    }
    cells
}

pub fn zone_contains(actor: HazardActor, center: Coord, point: Coord) -> bool {
    if point == center {
        return false;
    }
    match actor.zone_shape() {
        ZoneShape::Moore(r) => in_moore(point, center, r),
        ZoneShape::VonNeumann(r) => in_von_neumann(point, center, r),
    }
}

/// In-bounds zone cells of an actor standing on `center`, in row-major order.
pub fn zone_cells(actor: HazardActor, center: Coord, size: usize) -> Vec<Coord> {
    let reach = match actor.zone_shape() {
        ZoneShape::Moore(r) | ZoneShape::VonNeumann(r) => r as i32,
    };
    let mut cells = Vec::new();
    for row in (center.row - reach)..=(center.row + reach) {
        for col in (center.col - reach)..=(center.col + reach) {
            let point = Coord::new(row, col);
            if in_bounds(size, point) && zone_contains(actor, center, point) {
                cells.push(point);
            }
        }
    }
    cells
}
