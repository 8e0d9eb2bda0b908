//! Physical relocation through already visited cells.
//! This module exists so the agent can reach the next node A* wants to expand without stepping on
//! ground it has not proven safe. It does not pick targets.

use tracing::trace;

use crate::error::ProtocolError;
use crate::protocol::{Interactor, MoveProtocol};
use crate::search::ParentForest;
use crate::types::Coord;

/// Moves the agent to `target`, returning the number of moves issued.
///
/// Adjacent targets take one direct step. Otherwise the agent retreats along its own lineage to
/// the deepest ancestor it shares with `target`, then advances down the target's lineage.
pub fn relocate<I: Interactor>(
    protocol: &mut MoveProtocol<I>,
    forest: &ParentForest,
    target: Coord,
) -> Result<usize, ProtocolError> {
    let here = protocol.position();
    if here == target {
        return Ok(0);
    }
    if here.manhattan(target) == 1 {
        protocol.move_to(target)?;
        return Ok(1);
    }

    let behind = forest.lineage(here);
    let ahead = forest.lineage(target);
    let shared = behind.iter().zip(&ahead).take_while(|(a, b)| a == b).count();
    assert!(shared > 0, "{here} and {target} do not share a search root");

    let mut moves = 0;
    for step in behind[shared - 1..behind.len() - 1].iter().rev() {
        protocol.move_to(*step)?;
        moves += 1;
    }
    for step in &ahead[shared..] {
        protocol.move_to(*step)?;
        moves += 1;
    }
    trace!(from = %here, to = %target, moves, "relocated");
    Ok(moves)
}
