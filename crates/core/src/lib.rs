pub mod config;
pub mod error;
pub mod grid;
pub mod mapgen;
pub mod neighborhood;
pub mod protocol;
pub mod reference;
pub mod route;
pub mod search;
pub mod types;
pub mod walker;
pub mod wire;
pub mod world;

#[cfg(test)]
mod test_support;

pub use config::AgentConfig;
pub use error::{ConfigError, ProtocolError, RevealConflict, WorldMapError};
pub use grid::KnowledgeGrid;
pub use protocol::{Interactor, MoveProtocol, MoveTrace, Observation};
pub use route::{RouteComposer, RouteReport};
pub use search::{ParentForest, Path, SearchOutcome, SearchPolicy};
pub use types::*;
pub use wire::LineInteractor;
pub use world::{ScriptedWorld, WorldCell, WorldMap};
