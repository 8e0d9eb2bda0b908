use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_GRID_SIZE: usize = 9;
/// Largest grid whose `size³` search sentinel still fits in a `u32`.
pub const MAX_GRID_SIZE: usize = 1625;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn manhattan(self, other: Coord) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Coord {
        Coord { row: self.row + d_row, col: self.col + d_col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.row, self.col)
    }
}

/// Impassable map features. Each one projects a perception zone around itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HazardActor {
    Hulk,
    Thor,
    CaptainMarvel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneShape {
    Moore(u32),
    VonNeumann(u32),
}

impl HazardActor {
    pub const ALL: [HazardActor; 3] =
        [HazardActor::Hulk, HazardActor::Thor, HazardActor::CaptainMarvel];

    pub fn zone_shape(self) -> ZoneShape {
        match self {
            HazardActor::Hulk => ZoneShape::VonNeumann(1),
            HazardActor::Thor => ZoneShape::Moore(1),
            HazardActor::CaptainMarvel => ZoneShape::VonNeumann(2),
        }
    }

    /// Whether the zone stays impassable after the pickup has been collected.
    pub fn zone_survives_pickup(self) -> bool {
        matches!(self, HazardActor::CaptainMarvel)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Unknown,
    Empty,
    Obstacle(HazardActor),
    HazardZone,
    Pickup,
    Goal,
}

/// Wire alphabet. `Unknown` never travels over the wire.
pub const SYMBOL_TABLE: [(char, CellState); 7] = [
    ('H', CellState::Obstacle(HazardActor::Hulk)),
    ('T', CellState::Obstacle(HazardActor::Thor)),
    ('M', CellState::Obstacle(HazardActor::CaptainMarvel)),
    ('P', CellState::HazardZone),
    ('S', CellState::Pickup),
    ('I', CellState::Goal),
    ('.', CellState::Empty),
];

impl CellState {
    pub fn from_symbol(symbol: char) -> Option<CellState> {
        SYMBOL_TABLE.iter().find(|(c, _)| *c == symbol).map(|(_, state)| *state)
    }

    pub fn symbol(self) -> Option<char> {
        SYMBOL_TABLE.iter().find(|(_, state)| *state == self).map(|(c, _)| *c)
    }
}

/// How far the agent sees after each move. Selected by the interactor handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisionVariant {
    Near,
    Far,
}

impl VisionVariant {
    pub fn from_selector(selector: u8) -> Option<VisionVariant> {
        match selector {
            1 => Some(VisionVariant::Near),
            2 => Some(VisionVariant::Far),
            _ => None,
        }
    }

    pub fn selector(self) -> u8 {
        match self {
            VisionVariant::Near => 1,
            VisionVariant::Far => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handshake {
    pub variant: VisionVariant,
    pub goal: Coord,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Direct,
    ToPickup,
    FromPickup,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEvent {
    PhaseStarted { phase: Phase, from: Coord, to: Coord },
    PhaseFinished { phase: Phase, edges: Option<u32>, expanded: usize },
    PickupSpotted { at: Coord },
    ZonesCleared { cleared: usize, reprojected: usize },
    ReturnedToStart { moves: usize },
}
