//! Headless replay of recorded landmark frames.
//!
//! Input is JSON lines: `null` for a tick without a face, a single
//! `FaceLandmarkFrame` object, or a list of faces of which only the first is
//! used. Each processed tick is written out as one `TickOutput` JSON line.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::{BufRead, Write};
use tracing::{info, warn};

use crate::session::Session;
use crate::types::FaceLandmarkFrame;

#[derive(Deserialize)]
#[serde(untagged)]
enum ReplayLine {
    Faces(Vec<FaceLandmarkFrame>),
    Face(FaceLandmarkFrame),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub ticks: u64,
    pub skipped_lines: u64,
    pub selected: bool,
}

/// Parses one line into the face for that tick.
pub fn parse_line(line: &str) -> serde_json::Result<Option<FaceLandmarkFrame>> {
    let parsed: Option<ReplayLine> = serde_json::from_str(line)?;
    Ok(match parsed {
        None => None,
        Some(ReplayLine::Face(face)) => Some(face),
        Some(ReplayLine::Faces(faces)) => faces.into_iter().next(),
    })
}

/// Feeds every line through `session`. Blank lines are ignored; malformed
/// lines are skipped like a failed frame read.
pub fn run<R: BufRead, W: Write>(session: &mut Session, input: R, mut output: W) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();
    for (line_no, line) in input.lines().enumerate() {
        let line = line.context("Failed to read replay input")?;
        if line.trim().is_empty() {
            continue;
        }
        let frame = match parse_line(&line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(line = line_no + 1, "Skipping unreadable frame: {}", e);
                summary.skipped_lines += 1;
                continue;
            }
        };

        let tick = session.tick(frame.as_ref());
        serde_json::to_writer(&mut output, &tick)?;
        writeln!(output)?;

        summary.ticks += 1;
        summary.selected = tick.selected;
    }
    output.flush()?;

    info!(
        ticks = summary.ticks,
        skipped = summary.skipped_lines,
        selected = summary.selected,
        "Replay finished"
    );
    Ok(summary)
}
