//! The interactive agent session: handshake, route composition, final answer.
//! This module exists so the binary and its tests drive the exact same session over any stream
//! pair. It does not install logging or parse command-line flags.

use std::io::{BufRead, Write};

use stonepath_core::{AgentConfig, LineInteractor, ProtocolError, RouteComposer, RouteReport};
use tracing::info;

/// Runs one full session over `reader`/`writer` and returns the report after the answer is sent.
pub fn run_session<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    config: &AgentConfig,
) -> Result<RouteReport, ProtocolError> {
    let mut interactor = LineInteractor::new(reader, writer, config.grid_size);
    let handshake = interactor.read_handshake()?;
    info!(variant = ?handshake.variant, goal = %handshake.goal, "handshake received");

    let report = RouteComposer::new(&mut interactor, config, handshake).run()?;
    interactor.send_answer(report.edges())?;
    Ok(report)
}
