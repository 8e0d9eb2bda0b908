//! Line-oriented text codec for the interactor channel.
//!
//! Outgoing lines are `m <row> <col>` for a move and `e <edges>` (or `e -1`) for the final answer.
//! The interactor opens with the vision selector and the goal coordinate, then answers each move
//! with a count line followed by that many `<row> <col> <symbol>` lines.

use std::io::{BufRead, Write};

use tracing::trace;

use crate::error::ProtocolError;
use crate::neighborhood::in_bounds;
use crate::protocol::{Interactor, Observation};
use crate::types::{CellState, Coord, Handshake, VisionVariant};

pub fn format_move(to: Coord) -> String {
    format!("m {to}")
}

pub fn format_answer(edges: Option<u32>) -> String {
    match edges {
        Some(edges) => format!("e {edges}"),
        None => "e -1".to_string(),
    }
}

pub fn parse_count(line: &str) -> Result<usize, ProtocolError> {
    line.trim().parse().map_err(|_| ProtocolError::malformed(line, "expected an observation count"))
}

fn parse_coord(row: &str, col: &str, line: &str, size: usize) -> Result<Coord, ProtocolError> {
    let row = row.parse().map_err(|_| ProtocolError::malformed(line, "row is not an integer"))?;
    let col = col.parse().map_err(|_| ProtocolError::malformed(line, "column is not an integer"))?;
    let coord = Coord::new(row, col);
    if !in_bounds(size, coord) {
        return Err(ProtocolError::OutOfBounds { coord, size });
    }
    Ok(coord)
}

pub fn parse_observation(line: &str, size: usize) -> Result<Observation, ProtocolError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [row, col, symbol] = fields.as_slice() else {
        return Err(ProtocolError::malformed(line, "expected `<row> <col> <symbol>`"));
    };
    let coord = parse_coord(row, col, line, size)?;
    let mut chars = symbol.chars();
    let state = match (chars.next(), chars.next()) {
        (Some(c), None) => CellState::from_symbol(c),
        _ => None,
    };
    let state = state.ok_or_else(|| ProtocolError::UnknownSymbol {
        symbol: symbol.to_string(),
        line: line.to_string(),
    })?;
    Ok(Observation::new(coord, state))
}

pub fn parse_handshake(
    variant_line: &str,
    goal_line: &str,
    size: usize,
) -> Result<Handshake, ProtocolError> {
    let variant = variant_line
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(VisionVariant::from_selector)
        .ok_or_else(|| ProtocolError::malformed(variant_line, "unknown vision selector"))?;
    let fields: Vec<&str> = goal_line.split_whitespace().collect();
    let [row, col] = fields.as_slice() else {
        return Err(ProtocolError::malformed(goal_line, "expected `<row> <col>`"));
    };
    let goal = parse_coord(row, col, goal_line, size)?;
    Ok(Handshake { variant, goal })
}

/// Speaks the line protocol over any buffered reader and writer pair.
pub struct LineInteractor<R, W> {
    reader: R,
    writer: W,
    size: usize,
}

impl<R: BufRead, W: Write> LineInteractor<R, W> {
    pub fn new(reader: R, writer: W, size: usize) -> Self {
        Self { reader, writer, size }
    }

    pub fn read_handshake(&mut self) -> Result<Handshake, ProtocolError> {
        let variant_line = self.read_line("the vision selector")?;
        let goal_line = self.read_line("the goal coordinate")?;
        parse_handshake(&variant_line, &goal_line, self.size)
    }

    pub fn send_answer(&mut self, edges: Option<u32>) -> Result<(), ProtocolError> {
        self.send(&format_answer(edges))
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    fn send(&mut self, line: &str) -> Result<(), ProtocolError> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        trace!(line, "sent");
        Ok(())
    }

    fn read_line(&mut self, expected: &'static str) -> Result<String, ProtocolError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ProtocolError::UnexpectedEof { expected });
        }
        Ok(line.trim_end().to_string())
    }
}

impl<R: BufRead, W: Write> Interactor for LineInteractor<R, W> {
    fn request_move(&mut self, to: Coord) -> Result<Vec<Observation>, ProtocolError> {
        self.send(&format_move(to))?;
        let count_line = self.read_line("an observation count")?;
        let count = parse_count(&count_line)?;
        if count > self.size * self.size {
            return Err(ProtocolError::malformed(&count_line, "observation count exceeds the grid"));
        }
        let mut observations = Vec::with_capacity(count);
        for _ in 0..count {
            let line = self.read_line("an observation line")?;
            observations.push(parse_observation(&line, self.size)?);
        }
        Ok(observations)
    }
}
