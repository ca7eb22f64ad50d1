//! Drawing a session frame with crossterm.
//!
//! Each grid cell is two terminal columns wide so cells come out roughly
//! square. The grid sits below a one-line header; the status message,
//! playback line and key help follow it.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use pathviz_core::{Pos, Status};
use pathviz_playback::{PlaybackState, PlaybackView};
use pathviz_search::AlgorithmId;

use crate::input::HELP;

/// Terminal column of the grid's left edge.
pub const ORIGIN_X: u16 = 1;
/// Terminal row of the grid's top edge.
pub const ORIGIN_Y: u16 = 2;
/// Terminal columns per grid cell.
pub const CELL_WIDTH: u16 = 2;

const fn rgb(hex: u32) -> Color {
    Color::Rgb {
        r: (hex >> 16) as u8,
        g: (hex >> 8) as u8,
        b: hex as u8,
    }
}

const EMPTY: Color = rgb(0xf1f5f9);
const WALL: Color = rgb(0x475569);
const START: Color = rgb(0x22c55e);
const END: Color = rgb(0xef4444);
const VISITED: Color = rgb(0x93c5fd);
const VISITING: Color = rgb(0xf472b6);
const PATH: Color = rgb(0xfacc15);
const CURSOR_FG: Color = rgb(0x0f172a);

/// Fill colour of a cell.
pub fn status_color(status: Status) -> Color {
    match status {
        Status::Empty => EMPTY,
        Status::Wall => WALL,
        Status::Start => START,
        Status::End => END,
        Status::Visited => VISITED,
        Status::Visiting => VISITING,
        Status::Path => PATH,
    }
}

/// The grid cell under terminal position (`x`, `y`), if any.
pub fn cell_at(x: u16, y: u16, rows: i32, cols: i32) -> Option<Pos> {
    if x < ORIGIN_X || y < ORIGIN_Y {
        return None;
    }
    let p = Pos::new(
        i32::from(y - ORIGIN_Y),
        i32::from((x - ORIGIN_X) / CELL_WIDTH),
    );
    (p.row < rows && p.col < cols).then_some(p)
}

/// Everything drawn besides the playback view.
pub struct Overlay<'a> {
    pub algorithm: AlgorithmId,
    pub wall_density: u8,
    pub cursor: Pos,
    /// Transient feedback, such as a refused edit.
    pub note: Option<&'a str>,
}

/// Draw a full frame.
pub fn draw(out: &mut impl Write, view: &PlaybackView<'_>, overlay: &Overlay<'_>) -> io::Result<()> {
    queue!(out, ResetColor, terminal::Clear(ClearType::All))?;
    queue!(
        out,
        cursor::MoveTo(ORIGIN_X, 0),
        Print(format!(
            "Pathfinding Visualizer | {} | walls {}%",
            overlay.algorithm.label(),
            overlay.wall_density
        ))
    )?;

    let grid = view.grid;
    for row in 0..grid.rows() {
        queue!(out, cursor::MoveTo(ORIGIN_X, ORIGIN_Y + row as u16))?;
        for (col, cell) in grid.row(row).unwrap_or_default().iter().enumerate() {
            let p = Pos::new(row, col as i32);
            let glyph = if p == overlay.cursor { "[]" } else { "  " };
            queue!(
                out,
                SetBackgroundColor(status_color(cell.status)),
                SetForegroundColor(CURSOR_FG),
                Print(glyph)
            )?;
        }
        queue!(out, ResetColor)?;
    }

    let below = ORIGIN_Y + grid.rows() as u16 + 1;
    queue!(out, cursor::MoveTo(ORIGIN_X, below), Print(view.message))?;
    queue!(
        out,
        cursor::MoveTo(ORIGIN_X, below + 1),
        Print(playback_line(view))
    )?;
    if let Some(note) = overlay.note {
        queue!(
            out,
            cursor::MoveTo(ORIGIN_X, below + 2),
            SetForegroundColor(END),
            Print(note),
            ResetColor
        )?;
    }
    queue!(out, cursor::MoveTo(ORIGIN_X, below + 3), Print(HELP))?;
    out.flush()
}

fn playback_line(view: &PlaybackView<'_>) -> String {
    let state = match view.state {
        PlaybackState::Idle => "idle",
        PlaybackState::Running => "running",
        PlaybackState::Paused => "paused",
        PlaybackState::Finished => "done",
    };
    if view.len == 0 {
        format!("{state} | speed {}", view.speed)
    } else {
        format!(
            "{state} | step {}/{} | speed {}",
            view.index.min(view.len),
            view.len,
            view.speed
        )
    }
}
